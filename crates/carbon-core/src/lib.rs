// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Carbon Core
//!
//! Value-type geometry used by the engine's visibility culling: planes,
//! axis-aligned boxes, view frustums, extruded shadow volumes and least-squares
//! plane fitting.
//!
//! Everything here is a plain `Copy` value with no shared state, so any number
//! of threads can classify against the same frustum concurrently.

#![warn(missing_docs)]

pub mod math;

pub use math::{
    BoundingBox, CubeFace, CullCache, ExtrudedBoundingBox, Frustum, LeastSquaresSums, Mat4,
    MathError, Plane, PlaneQuery, Vec3, Vec4, VolumeCorner, VolumePlane, VolumeQuery,
};
