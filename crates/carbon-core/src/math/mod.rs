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

//! Geometric primitives for visibility culling and volume queries.
//!
//! The module is built around a small set of value types: [`Plane`],
//! [`BoundingBox`], [`Frustum`] and [`ExtrudedBoundingBox`], plus the
//! [`LeastSquaresSums`] accumulator for fitting planes to point clouds.
//!
//! # Conventions
//!
//! * Plane distances are evaluated as `dot(normal, point) + distance`.
//! * Volume planes (frustum and box faces) have **inward** normals, so a point is
//!   inside a volume when its distance to every plane is non-negative.
//! * Matrices are column-major and transform column vectors
//!   (`clip = proj * view * point`).
//!
//! Malformed numeric input (non-invertible matrices, zero-length normals, empty
//! point sets) is a caller precondition. Such input yields NaN or infinite
//! results rather than errors; each affected operation documents this.

// --- Fundamental Constants ---

/// A small constant for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

/// Default half-width of the band in which a point is classified as lying
/// on a plane.
pub const PLANE_EPSILON: f32 = EPSILON;

// --- Declare Sub-Modules ---

pub mod bounding_box;
pub mod error;
pub mod extruded_bounding_box;
pub mod frustum;
pub mod least_squares;
pub mod matrix;
pub mod plane;
pub mod vector;
pub mod volume;

// --- Re-export Principal Types ---

pub use self::bounding_box::BoundingBox;
pub use self::error::MathError;
pub use self::extruded_bounding_box::ExtrudedBoundingBox;
pub use self::frustum::{CullCache, Frustum};
pub use self::least_squares::LeastSquaresSums;
pub use self::matrix::Mat4;
pub use self::plane::Plane;
pub use self::vector::{Vec3, Vec4};
pub use self::volume::{CubeFace, PlaneQuery, VolumeCorner, VolumePlane, VolumeQuery};

// --- Utility Functions ---

/// Performs an approximate equality comparison between two floats with a custom tolerance.
///
/// # Examples
///
/// ```
/// use carbon_core::math::approx_eq_eps;
/// assert!(approx_eq_eps(0.001, 0.002, 1e-2));
/// assert!(!approx_eq_eps(0.001, 0.002, 1e-4));
/// ```
#[inline]
pub fn approx_eq_eps(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Performs an approximate equality comparison using the module's default [`EPSILON`].
///
/// # Examples
///
/// ```
/// use carbon_core::math::{approx_eq, EPSILON};
/// assert!(approx_eq(1.0, 1.0 + EPSILON / 2.0));
/// assert!(!approx_eq(1.0, 1.0 + EPSILON * 2.0));
/// ```
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    approx_eq_eps(a, b, EPSILON)
}
