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

//! Provides the axis-aligned [`BoundingBox`] used as the culling volume of
//! scene objects.

use super::plane::Plane;
use super::volume::{PlaneQuery, VolumeCorner, VolumePlane, VolumeQuery};
use super::{Mat4, Vec3, Vec4, EPSILON};
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box defined by its minimum and maximum corners.
///
/// Corner and face labels map onto the axes as Left = `min.x`,
/// Right = `max.x`, Bottom = `min.y`, Top = `max.y`, Near = `min.z` and
/// Far = `max.z`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct BoundingBox {
    /// The corner of the box with the smallest coordinates on all axes.
    pub min: Vec3,
    /// The corner of the box with the largest coordinates on all axes.
    pub max: Vec3,
}

impl BoundingBox {
    /// The empty box: `min` is `f32::MAX` and `max` is `-f32::MAX` on every axis.
    ///
    /// Adding a point to an empty box yields a degenerate box at that point,
    /// and merging a box into it yields that box.
    pub const EMPTY: Self = Self {
        min: Vec3::new(f32::MAX, f32::MAX, f32::MAX),
        max: Vec3::new(-f32::MAX, -f32::MAX, -f32::MAX),
    };

    /// Creates a new box from two corner points.
    ///
    /// The points may be given in any order; `min` and `max` are taken
    /// component-wise.
    #[inline]
    pub fn from_min_max(min_pt: Vec3, max_pt: Vec3) -> Self {
        Self {
            min: min_pt.min(max_pt),
            max: min_pt.max(max_pt),
        }
    }

    /// Creates a new box from a center point and its half-extents.
    ///
    /// The provided `half_extents` are made non-negative.
    #[inline]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let safe_half_extents = half_extents.abs();
        Self {
            min: center - safe_half_extents,
            max: center + safe_half_extents,
        }
    }

    /// Creates a degenerate box containing a single point.
    #[inline]
    pub fn from_point(point: Vec3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Creates the tightest box enclosing a set of points.
    ///
    /// # Returns
    ///
    /// Returns `Some(BoundingBox)` if the input slice is not empty, otherwise `None`.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(
            rest.iter()
                .fold(Self::from_point(*first), |acc, p| acc.merged_with_point(*p)),
        )
    }

    /// Returns the box to the [`EMPTY`](Self::EMPTY) state.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::EMPTY;
    }

    /// Grows the box in place to include `point`.
    #[inline]
    pub fn add_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Whether the box has left the [`EMPTY`](Self::EMPTY) state.
    #[inline]
    pub fn is_populated(&self) -> bool {
        *self != Self::EMPTY
    }

    /// Whether the box has no extent on any axis (within [`EPSILON`]).
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        let size = self.size().abs();
        size.x < EPSILON && size.y < EPSILON && size.z < EPSILON
    }

    /// Calculates the center point of the box.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Calculates the half-extents (half the size on each axis) of the box.
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Calculates the full size (width, height, depth) of the box.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Checks if the box is valid (i.e., `min` <= `max` on all axes).
    /// Degenerate boxes where `min == max` are considered valid.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Checks if a point is contained within or on the boundary of the box.
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.contains_point_with_tolerance(point, Vec3::ZERO)
    }

    /// Checks if a point lies within the box grown by `tolerance` on each axis.
    #[inline]
    pub fn contains_point_with_tolerance(&self, point: Vec3, tolerance: Vec3) -> bool {
        point.x >= self.min.x - tolerance.x
            && point.x <= self.max.x + tolerance.x
            && point.y >= self.min.y - tolerance.y
            && point.y <= self.max.y + tolerance.y
            && point.z >= self.min.z - tolerance.z
            && point.z <= self.max.z + tolerance.z
    }

    /// Checks if this box intersects with another box.
    ///
    /// Boxes that only touch at the boundary are considered to be intersecting.
    #[inline]
    pub fn intersects_aabb(&self, other: &BoundingBox) -> bool {
        (self.min.x <= other.max.x && self.max.x >= other.min.x)
            && (self.min.y <= other.max.y && self.max.y >= other.min.y)
            && (self.min.z <= other.max.z && self.max.z >= other.min.z)
    }

    /// Checks if this box intersects another with both boxes grown by `tolerance`.
    #[inline]
    pub fn intersects_aabb_with_tolerance(&self, other: &BoundingBox, tolerance: Vec3) -> bool {
        self.inflate_by(tolerance)
            .intersects_aabb(&other.inflate_by(tolerance))
    }

    /// Returns the overlapping region of two boxes, or `None` if they are disjoint.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let overlap = Self {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        };
        overlap.is_valid().then_some(overlap)
    }

    /// Checks if `other` lies entirely within this box.
    #[inline]
    pub fn contains_aabb(&self, other: &BoundingBox) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    /// Returns the point of the box closest to `point`.
    ///
    /// Points inside the box are returned unchanged.
    #[inline]
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.max(self.min).min(self.max)
    }

    /// Casts the ray `origin + velocity * t` against the solid box.
    ///
    /// Returns the smallest non-negative `t` at which the ray is inside the
    /// box, or `Some(0.0)` when the origin already is. With
    /// `restrict_range` set, hits beyond `t = 1` (past the end of
    /// `velocity`) are discarded.
    pub fn intersect_ray(&self, origin: Vec3, velocity: Vec3, restrict_range: bool) -> Option<f32> {
        if self.contains_point(origin) {
            return Some(0.0);
        }

        let mut t_min = -f32::MAX;
        let mut t_max = f32::MAX;

        for axis in 0..3 {
            let o = origin[axis];
            let v = velocity[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if v.abs() > EPSILON {
                let inv = 1.0 / v;
                let mut t1 = (hi - o) * inv;
                let mut t2 = (lo - o) * inv;
                if t1 > t2 {
                    std::mem::swap(&mut t1, &mut t2);
                }
                t_min = t_min.max(t1);
                t_max = t_max.min(t2);
                if t_min > t_max || t_max < 0.0 {
                    return None;
                }
            } else if o < lo || o > hi {
                // Parallel to the slab and outside it.
                return None;
            }
        }

        let t = if t_min > 0.0 { t_min } else { t_max };
        if t < 0.0 || (restrict_range && t > 1.0) {
            return None;
        }
        Some(t)
    }

    /// Returns the box grown by `amount` on every side. Negative values shrink it.
    #[inline]
    pub fn inflate(&self, amount: f32) -> Self {
        self.inflate_by(Vec3::splat(amount))
    }

    /// Returns the box grown by a per-axis amount on every side.
    #[inline]
    pub fn inflate_by(&self, amount: Vec3) -> Self {
        Self {
            min: self.min - amount,
            max: self.max + amount,
        }
    }

    /// Returns the box moved by `offset`.
    #[inline]
    pub fn translate(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Returns the box with both corners scaled about the origin.
    #[inline]
    pub fn scale(&self, factor: f32) -> Self {
        Self::from_min_max(self.min * factor, self.max * factor)
    }

    /// Creates a new box that encompasses both this box and another one.
    #[inline]
    pub fn merge(&self, other: &BoundingBox) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Creates a new box that encompasses both this box and an additional point.
    #[inline]
    pub fn merged_with_point(&self, point: Vec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Computes the box that encloses this one after a transformation.
    ///
    /// The center is transformed and the new extents are found by projecting
    /// the old extents onto the transformed axes, which is exact for affine
    /// matrices and conservative otherwise.
    pub fn transform(&self, matrix: &Mat4) -> Self {
        let center = self.center();
        let half_extents = self.half_extents();
        let transformed_center_v4 = *matrix * Vec4::from_vec3(center, 1.0);

        let transformed_center = if (transformed_center_v4.w - 1.0).abs() > EPSILON
            && transformed_center_v4.w.abs() > EPSILON
        {
            transformed_center_v4.truncate() / transformed_center_v4.w
        } else {
            transformed_center_v4.truncate()
        };

        let x_abs_col = matrix.cols[0].truncate().abs();
        let y_abs_col = matrix.cols[1].truncate().abs();
        let z_abs_col = matrix.cols[2].truncate().abs();

        let new_half_extents =
            x_abs_col * half_extents.x + y_abs_col * half_extents.y + z_abs_col * half_extents.z;

        BoundingBox::from_center_half_extents(transformed_center, new_half_extents)
    }

    /// Returns the position of a labelled corner.
    #[inline]
    pub fn corner(&self, corner: VolumeCorner) -> Vec3 {
        Vec3::new(
            if corner.is_left() { self.min.x } else { self.max.x },
            if corner.is_top() { self.max.y } else { self.min.y },
            if corner.is_near() { self.min.z } else { self.max.z },
        )
    }

    /// Returns all eight corners in [`VolumeCorner`] order.
    #[inline]
    pub fn corners(&self) -> [Vec3; 8] {
        VolumeCorner::ALL.map(|c| self.corner(c))
    }

    /// Returns the endpoints of edge `index` in [`VolumeCorner::EDGES`] order,
    /// or `None` if `index >= 12`.
    #[inline]
    pub fn edge(&self, index: usize) -> Option<(Vec3, Vec3)> {
        let [a, b] = *VolumeCorner::EDGES.get(index)?;
        Some((self.corner(a), self.corner(b)))
    }

    /// Returns the plane of a face, with its normal pointing into the box.
    pub fn plane(&self, face: VolumePlane) -> Plane {
        match face {
            VolumePlane::Left => Plane::new(Vec3::X, -self.min.x),
            VolumePlane::Right => Plane::new(-Vec3::X, self.max.x),
            VolumePlane::Top => Plane::new(-Vec3::Y, self.max.y),
            VolumePlane::Bottom => Plane::new(Vec3::Y, -self.min.y),
            VolumePlane::Near => Plane::new(Vec3::Z, -self.min.z),
            VolumePlane::Far => Plane::new(-Vec3::Z, self.max.z),
        }
    }

    /// Returns the corners furthest along and against the plane normal, as
    /// `(positive, negative)`.
    #[inline]
    fn extreme_vertices(&self, plane: &Plane) -> (Vec3, Vec3) {
        let n = plane.normal;
        let pick = |axis: usize| {
            if n[axis] >= 0.0 {
                (self.max[axis], self.min[axis])
            } else {
                (self.min[axis], self.max[axis])
            }
        };
        let (px, nx) = pick(0);
        let (py, ny) = pick(1);
        let (pz, nz) = pick(2);
        (Vec3::new(px, py, pz), Vec3::new(nx, ny, nz))
    }

    /// Classifies the box against the non-negative half-space of `plane`.
    ///
    /// Returns `Outside` when even the positive vertex is behind the plane,
    /// `Inside` when the negative vertex is on or in front of it, and
    /// `Intersect` otherwise. A box touching the plane from behind is
    /// therefore `Intersect`.
    #[inline]
    pub fn classify_plane(&self, plane: &Plane) -> VolumeQuery {
        let (pv, nv) = self.extreme_vertices(plane);
        if plane.signed_distance(pv) < 0.0 {
            VolumeQuery::Outside
        } else if plane.signed_distance(nv) >= 0.0 {
            VolumeQuery::Inside
        } else {
            VolumeQuery::Intersect
        }
    }

    /// Reports which side of `plane` the box is on.
    ///
    /// Same decision as [`BoundingBox::classify_plane`], expressed as
    /// `Front`, `Back` or `Spanning`.
    #[inline]
    pub fn classify_plane_side(&self, plane: &Plane) -> PlaneQuery {
        match self.classify_plane(plane) {
            VolumeQuery::Inside => PlaneQuery::Front,
            VolumeQuery::Outside => PlaneQuery::Back,
            VolumeQuery::Intersect => PlaneQuery::Spanning,
        }
    }
}

impl Default for BoundingBox {
    /// Returns [`BoundingBox::EMPTY`].
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}
