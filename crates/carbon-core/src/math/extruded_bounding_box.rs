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

//! Provides [`ExtrudedBoundingBox`], the volume swept by a box when it is
//! projected away from a point, such as the shadow cast by an occluder from a
//! light source.

use super::bounding_box::BoundingBox;
use super::plane::Plane;
use super::volume::{clip_segment, VolumeCorner, VolumePlane};
use super::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// A convex volume bounded by the planes through a box's silhouette edges,
/// as seen from a projection point.
///
/// The volume is open-ended: it has no cap at the source box or at the end
/// of the projection range. Build a fresh value whenever the box or the
/// projection point changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtrudedBoundingBox {
    source_min: Vec3,
    source_max: Vec3,
    projection_point: Vec3,
    projection_range: f32,
    extruded_planes: [Plane; 6],
    silhouette_edges: [[VolumeCorner; 2]; 6],
    edge_count: usize,
}

impl ExtrudedBoundingBox {
    /// Extrudes `bounds` away from `projection_point` over `range` units.
    ///
    /// When `transform` is given, the box is first re-fitted into the
    /// transformed space with [`BoundingBox::transform`]. The projection
    /// point must already be expressed in that space.
    ///
    /// A projection point inside the box (or on its surface) has no
    /// silhouette, and the result has no planes.
    pub fn extrude(
        bounds: &BoundingBox,
        projection_point: Vec3,
        range: f32,
        transform: Option<&Mat4>,
    ) -> Self {
        let source = match transform {
            Some(m) => bounds.transform(m),
            None => *bounds,
        };

        // A face is visible when the point lies strictly outside it.
        let visible =
            |face: VolumePlane| source.plane(face).signed_distance(projection_point) < 0.0;
        let center = source.center();

        let mut extruded_planes = [Plane::new(Vec3::ZERO, 0.0); 6];
        let mut silhouette_edges = [[VolumeCorner::RightBottomFar; 2]; 6];
        let mut edge_count = 0;

        for edge in VolumeCorner::EDGES {
            let [face_a, face_b] = VolumeCorner::shared_planes(edge);
            if visible(face_a) == visible(face_b) {
                continue;
            }
            if edge_count == extruded_planes.len() {
                break;
            }

            let p1 = source.corner(edge[0]);
            let p2 = source.corner(edge[1]);
            let mut plane = Plane::from_points(projection_point, p1, p2);
            if plane.signed_distance(center) < 0.0 {
                plane = Plane::new(-plane.normal, -plane.distance);
            }

            extruded_planes[edge_count] = plane;
            silhouette_edges[edge_count] = edge;
            edge_count += 1;
        }

        if edge_count == 0 {
            log::trace!(
                "Extrusion point {:?} lies within the source box; volume has no planes",
                projection_point
            );
        }

        Self {
            source_min: source.min,
            source_max: source.max,
            projection_point,
            projection_range: range,
            extruded_planes,
            silhouette_edges,
            edge_count,
        }
    }

    /// Tests whether the segment `start -> end` touches the volume.
    ///
    /// An extrusion without planes contains nothing.
    pub fn test_line(&self, start: Vec3, end: Vec3) -> bool {
        self.edge_count > 0 && clip_segment(self.planes(), start, end).is_some()
    }

    /// Tests whether a sphere touches the volume.
    ///
    /// Conservative near the volume's edges. An extrusion without planes
    /// contains nothing.
    pub fn test_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.edge_count > 0
            && self
                .planes()
                .iter()
                .all(|plane| plane.signed_distance(center) >= -radius)
    }

    /// The minimum corner of the (possibly transformed) source box.
    #[inline]
    pub fn source_min(&self) -> Vec3 {
        self.source_min
    }

    /// The maximum corner of the (possibly transformed) source box.
    #[inline]
    pub fn source_max(&self) -> Vec3 {
        self.source_max
    }

    /// The (possibly transformed) source box.
    #[inline]
    pub fn source_box(&self) -> BoundingBox {
        BoundingBox {
            min: self.source_min,
            max: self.source_max,
        }
    }

    /// The point the box is projected away from.
    #[inline]
    pub fn projection_point(&self) -> Vec3 {
        self.projection_point
    }

    /// How far the volume reaches from the projection point.
    #[inline]
    pub fn projection_range(&self) -> f32 {
        self.projection_range
    }

    /// The number of silhouette edges, and so of bounding planes (`0..=6`).
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// The bounding planes, with normals pointing into the volume.
    #[inline]
    pub fn planes(&self) -> &[Plane] {
        &self.extruded_planes[..self.edge_count]
    }

    /// Returns the corner labels of silhouette edge `index`, or `None` if
    /// `index >= edge_count()`.
    #[inline]
    pub fn silhouette_edge(&self, index: usize) -> Option<[VolumeCorner; 2]> {
        self.silhouette_edges[..self.edge_count].get(index).copied()
    }

    /// Returns the endpoints of silhouette edge `index`, or `None` if
    /// `index >= edge_count()`.
    pub fn edge(&self, index: usize) -> Option<(Vec3, Vec3)> {
        let [a, b] = self.silhouette_edge(index)?;
        let source = self.source_box();
        Some((source.corner(a), source.corner(b)))
    }
}
