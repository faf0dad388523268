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

//! Provides the [`Plane`] type and point/segment side classification.

use super::matrix::Mat4;
use super::vector::{Vec3, Vec4};
use super::volume::PlaneQuery;
use super::{EPSILON, PLANE_EPSILON};
use serde::{Deserialize, Serialize};

/// An infinite plane `dot(normal, p) + distance = 0`.
///
/// The normal is expected to be unit length. This is not enforced, and signed
/// distances from a non-unit plane are scaled by the normal's length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// The plane normal. Points on the side it faces have positive distance.
    pub normal: Vec3,
    /// The plane constant, `-dot(normal, p)` for any point `p` on the plane.
    pub distance: f32,
}

impl Plane {
    /// Creates a plane from a normal and a plane constant.
    #[inline]
    pub const fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Creates a plane with the given normal passing through `point`.
    #[inline]
    pub fn from_normal_and_point(normal: Vec3, point: Vec3) -> Self {
        Self::new(normal, -normal.dot(point))
    }

    /// Creates the plane through three points, with the normal
    /// `normalize((b - a) x (c - a))`.
    ///
    /// A degenerate triangle (coincident or collinear points) yields a plane
    /// with a zero normal.
    #[inline]
    pub fn from_points(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let normal = (b - a).cross(c - a).normalize();
        Self::from_normal_and_point(normal, a)
    }

    /// Interprets `(x, y, z)` as the normal and `w` as the distance.
    #[inline]
    pub fn from_vec4(v: Vec4) -> Self {
        Self::new(v.truncate(), v.w)
    }

    /// Packs the plane as `(normal, distance)`.
    #[inline]
    pub fn to_vec4(&self) -> Vec4 {
        Vec4::from_vec3(self.normal, self.distance)
    }

    /// Returns the signed distance from the plane to `point`.
    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    /// Returns the dot product of the normal with a direction vector.
    #[inline]
    pub fn dot_normal(&self, v: Vec3) -> f32 {
        self.normal.dot(v)
    }

    /// Classifies a point as in front of, behind, or on the plane.
    ///
    /// The point is [`PlaneQuery::On`] when `|d| <= epsilon`.
    #[inline]
    pub fn classify_point(&self, point: Vec3, epsilon: f32) -> PlaneQuery {
        let d = self.signed_distance(point);
        if d.abs() <= epsilon {
            PlaneQuery::On
        } else if d > 0.0 {
            PlaneQuery::Front
        } else {
            PlaneQuery::Back
        }
    }

    /// [`Plane::classify_point`] with [`PLANE_EPSILON`].
    #[inline]
    pub fn classify_point_default(&self, point: Vec3) -> PlaneQuery {
        self.classify_point(point, PLANE_EPSILON)
    }

    /// Classifies the segment `a -> b` against the plane.
    ///
    /// An end lying on the plane does not make the segment span it.
    pub fn classify_segment(&self, a: Vec3, b: Vec3, epsilon: f32) -> PlaneQuery {
        match (self.classify_point(a, epsilon), self.classify_point(b, epsilon)) {
            (PlaneQuery::On, PlaneQuery::On) => PlaneQuery::On,
            (PlaneQuery::Front | PlaneQuery::On, PlaneQuery::Front | PlaneQuery::On) => {
                PlaneQuery::Front
            }
            (PlaneQuery::Back | PlaneQuery::On, PlaneQuery::Back | PlaneQuery::On) => {
                PlaneQuery::Back
            }
            _ => PlaneQuery::Spanning,
        }
    }

    /// Rescales the plane so the normal has unit length.
    ///
    /// A zero normal is returned unchanged.
    #[inline]
    pub fn normalize(&self) -> Self {
        let len = self.normal.length();
        if len < EPSILON {
            return *self;
        }
        let inv = 1.0 / len;
        Self::new(self.normal * inv, self.distance * inv)
    }

    /// Transforms the plane by a matrix, using its inverse-transpose, and
    /// renormalizes the result.
    ///
    /// # Preconditions
    ///
    /// `m` must be invertible. A singular matrix logs a warning and produces a
    /// plane of NaNs.
    pub fn transform(&self, m: &Mat4) -> Self {
        let inverse = m.inverse().unwrap_or_else(|| {
            log::warn!("Plane transformed by a non-invertible matrix; result is undefined");
            Mat4::NAN
        });
        let inv_t = inverse.transpose();
        Self::from_vec4(inv_t * self.to_vec4()).normalize()
    }

    /// Returns the point shared by three planes.
    ///
    /// # Preconditions
    ///
    /// The normals must be linearly independent. Parallel planes divide by zero
    /// and produce infinite or NaN coordinates.
    pub fn intersect_three(p0: &Plane, p1: &Plane, p2: &Plane) -> Vec3 {
        let n12 = p1.normal.cross(p2.normal);
        let n20 = p2.normal.cross(p0.normal);
        let n01 = p0.normal.cross(p1.normal);
        let denom = p0.normal.dot(n12);
        -(n12 * p0.distance + n20 * p1.distance + n01 * p2.distance) / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;
    use approx::assert_relative_eq;

    fn vec3_approx_eq(a: Vec3, b: Vec3) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    #[test]
    fn test_from_points_winding() {
        let p = Plane::from_points(Vec3::ZERO, Vec3::X, Vec3::Y);
        assert_eq!(p.normal, Vec3::Z);
        assert_eq!(p.distance, 0.0);

        let shifted = Plane::from_points(
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(1.0, 0.0, 2.0),
            Vec3::new(0.0, 1.0, 2.0),
        );
        assert_relative_eq!(shifted.distance, -2.0);
        assert_relative_eq!(shifted.signed_distance(Vec3::new(5.0, 5.0, 3.0)), 1.0);
    }

    #[test]
    fn test_from_points_degenerate() {
        let p = Plane::from_points(Vec3::ONE, Vec3::ONE, Vec3::new(2.0, 2.0, 2.0));
        assert_eq!(p.normal, Vec3::ZERO);
        assert!(p.distance.is_finite());
    }

    #[test]
    fn test_classify_point_band() {
        let p = Plane::new(Vec3::Y, -1.0);
        assert_eq!(p.classify_point(Vec3::new(0.0, 2.0, 0.0), 0.01), PlaneQuery::Front);
        assert_eq!(p.classify_point(Vec3::new(0.0, 0.0, 0.0), 0.01), PlaneQuery::Back);
        assert_eq!(p.classify_point(Vec3::new(3.0, 1.005, 0.0), 0.01), PlaneQuery::On);
        assert_eq!(p.classify_point_default(Vec3::new(7.0, 1.0, -4.0)), PlaneQuery::On);
        // Band edge is inclusive.
        assert_eq!(p.classify_point(Vec3::new(0.0, 1.5, 0.0), 0.5), PlaneQuery::On);
    }

    #[test]
    fn test_classify_segment() {
        let p = Plane::new(Vec3::X, 0.0);
        let eps = PLANE_EPSILON;
        assert_eq!(p.classify_segment(Vec3::ZERO, Vec3::Y, eps), PlaneQuery::On);
        assert_eq!(p.classify_segment(Vec3::ZERO, Vec3::ONE, eps), PlaneQuery::Front);
        assert_eq!(p.classify_segment(-Vec3::ONE, -Vec3::X, eps), PlaneQuery::Back);
        assert_eq!(p.classify_segment(-Vec3::ONE, Vec3::ONE, eps), PlaneQuery::Spanning);
    }

    #[test]
    fn test_normalize() {
        let p = Plane::new(Vec3::new(0.0, 2.0, 0.0), 4.0).normalize();
        assert_eq!(p.normal, Vec3::Y);
        assert_relative_eq!(p.distance, 2.0);

        let zero = Plane::new(Vec3::ZERO, 3.0);
        assert_eq!(zero.normalize(), zero);
    }

    #[test]
    fn test_vec4_packing() {
        let p = Plane::new(Vec3::new(0.0, 0.0, 1.0), -3.0);
        assert_eq!(Plane::from_vec4(p.to_vec4()), p);
        assert_relative_eq!(p.dot_normal(Vec3::new(1.0, 1.0, 2.0)), 2.0);
    }

    #[test]
    fn test_transform_keeps_incidence() {
        let p = Plane::from_normal_and_point(Vec3::Y, Vec3::new(0.0, 1.0, 0.0));
        let m = Mat4::from_translation(Vec3::new(3.0, 4.0, 0.0)) * Mat4::from_rotation_z(0.5);
        let moved = p.transform(&m);

        let on_plane = Vec3::new(2.0, 1.0, -1.0);
        let above = Vec3::new(0.0, 3.0, 0.0);
        assert_relative_eq!(
            moved.signed_distance(m.transform_point(on_plane)),
            0.0,
            epsilon = 1e-4
        );
        assert_relative_eq!(
            moved.signed_distance(m.transform_point(above)),
            2.0,
            epsilon = 1e-4
        );
        assert_relative_eq!(moved.normal.length(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_transform_singular_is_nan() {
        let p = Plane::new(Vec3::X, 0.0);
        let moved = p.transform(&Mat4::from_scale(Vec3::new(0.0, 1.0, 1.0)));
        assert!(moved.distance.is_nan());
    }

    #[test]
    fn test_intersect_three() {
        let px = Plane::new(Vec3::X, -1.0);
        let py = Plane::new(Vec3::Y, -2.0);
        let pz = Plane::new(Vec3::Z, 3.0);
        let p = Plane::intersect_three(&px, &py, &pz);
        assert!(vec3_approx_eq(p, Vec3::new(1.0, 2.0, -3.0)));
    }
}
