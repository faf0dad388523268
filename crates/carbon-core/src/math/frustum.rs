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

//! Provides the six-plane [`Frustum`] used for visibility culling, and the
//! [`CullCache`] that carries plane results between related queries.
//!
//! A frustum is usually rebuilt once per camera per frame, then queried for
//! every candidate object. Plane normals point into the volume, so the inside
//! of a frustum is the set of points with non-negative distance to all six
//! planes.

use super::bounding_box::BoundingBox;
use super::extruded_bounding_box::ExtrudedBoundingBox;
use super::plane::Plane;
use super::volume::{clip_segment, CubeFace, VolumeCorner, VolumePlane, VolumeQuery};
use super::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_1_SQRT_2;

/// Per-object state for coherent frustum culling.
///
/// Bit `i` of `inside_mask` (with `i` the [`VolumePlane::index`]) marks a plane
/// the object, or the parent node it was copied from, is already entirely
/// inside; those planes are skipped. `last_outside` remembers the plane that
/// most recently rejected the object and is tested first next time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CullCache {
    /// Planes already known to contain the object.
    pub inside_mask: u8,
    /// The plane that rejected the object last time, if any.
    pub last_outside: Option<VolumePlane>,
}

impl CullCache {
    /// Creates an empty cache.
    #[inline]
    pub const fn new() -> Self {
        Self {
            inside_mask: 0,
            last_outside: None,
        }
    }

    /// Whether `plane` is marked as containing the object.
    #[inline]
    pub fn is_inside(&self, plane: VolumePlane) -> bool {
        self.inside_mask & (1 << plane.index()) != 0
    }

    #[inline]
    fn mark_inside(&mut self, plane: VolumePlane) {
        self.inside_mask |= 1 << plane.index();
    }
}

/// A convex volume bounded by six planes, with its eight corner points and
/// the position it was built from.
///
/// Corners are always derived from the planes, so both stay consistent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frustum {
    planes: [Plane; 6],
    points: [Vec3; 8],
    position: Vec3,
}

impl Frustum {
    /// Builds the frustum of a camera from its view and projection matrices.
    ///
    /// The projection must use a zero-to-one depth range (as produced by
    /// [`Mat4::perspective_rh_zo`] and [`Mat4::orthographic_rh_zo`]). The
    /// position is the eye recovered from the view matrix, which is expected
    /// to be rigid.
    pub fn from_view_projection(view: &Mat4, proj: &Mat4) -> Self {
        let m = *proj * *view;
        let r0 = m.get_row(0);
        let r1 = m.get_row(1);
        let r2 = m.get_row(2);
        let r3 = m.get_row(3);

        let mut planes = [Plane::new(Vec3::ZERO, 0.0); 6];
        planes[VolumePlane::Left.index()] = Plane::from_vec4(r3 + r0);
        planes[VolumePlane::Right.index()] = Plane::from_vec4(r3 - r0);
        planes[VolumePlane::Top.index()] = Plane::from_vec4(r3 - r1);
        planes[VolumePlane::Bottom.index()] = Plane::from_vec4(r3 + r1);
        planes[VolumePlane::Near.index()] = Plane::from_vec4(r2);
        planes[VolumePlane::Far.index()] = Plane::from_vec4(r3 - r2);

        Self::from_planes(planes, eye_position(view))
    }

    /// Builds a frustum whose planes are the faces of `bounds`.
    ///
    /// The corners are the box corners and the position is the box center.
    pub fn from_box(bounds: &BoundingBox) -> Self {
        Self {
            planes: VolumePlane::ALL.map(|face| bounds.plane(face)),
            points: bounds.corners(),
            position: bounds.center(),
        }
    }

    /// Builds the 90 degree frustum looking out of one face of a cube map
    /// centered on `origin`.
    ///
    /// The four side planes pass through `origin` at 45 degrees to the face
    /// axis, and the near and far planes sit `near` and `far` units along it,
    /// in that argument order. Callers without a specific near distance
    /// conventionally pass `1.0`.
    pub fn from_cube_face(face: CubeFace, origin: Vec3, near: f32, far: f32) -> Self {
        let c = FRAC_1_SQRT_2;
        let [left, right, top, bottom] = match face {
            CubeFace::PositiveX => [
                Vec3::new(c, 0.0, -c),
                Vec3::new(c, 0.0, c),
                Vec3::new(c, -c, 0.0),
                Vec3::new(c, c, 0.0),
            ],
            CubeFace::NegativeX => [
                Vec3::new(-c, 0.0, c),
                Vec3::new(-c, 0.0, -c),
                Vec3::new(-c, -c, 0.0),
                Vec3::new(-c, c, 0.0),
            ],
            CubeFace::PositiveY => [
                Vec3::new(c, c, 0.0),
                Vec3::new(-c, c, 0.0),
                Vec3::new(0.0, c, c),
                Vec3::new(0.0, c, -c),
            ],
            CubeFace::NegativeY => [
                Vec3::new(c, -c, 0.0),
                Vec3::new(-c, -c, 0.0),
                Vec3::new(0.0, -c, -c),
                Vec3::new(0.0, -c, c),
            ],
            CubeFace::PositiveZ => [
                Vec3::new(c, 0.0, c),
                Vec3::new(-c, 0.0, c),
                Vec3::new(0.0, -c, c),
                Vec3::new(0.0, c, c),
            ],
            CubeFace::NegativeZ => [
                Vec3::new(-c, 0.0, -c),
                Vec3::new(c, 0.0, -c),
                Vec3::new(0.0, -c, -c),
                Vec3::new(0.0, c, -c),
            ],
        };
        let axis = face.direction();

        let planes = [
            Plane::from_normal_and_point(left, origin),
            Plane::from_normal_and_point(right, origin),
            Plane::from_normal_and_point(top, origin),
            Plane::from_normal_and_point(bottom, origin),
            Plane::from_normal_and_point(axis, origin + axis * near),
            Plane::from_normal_and_point(-axis, origin + axis * far),
        ];

        Self::from_planes(planes, origin)
    }

    /// Builds a frustum from six planes in [`VolumePlane`] order.
    ///
    /// The planes are normalized and the corners recomputed from them.
    ///
    /// # Preconditions
    ///
    /// Each triple of planes meeting at a corner must intersect in a single
    /// point; otherwise the corner is infinite or NaN.
    pub fn from_planes(planes: [Plane; 6], position: Vec3) -> Self {
        let planes = planes.map(|p| p.normalize());
        Self {
            planes,
            points: corner_points(&planes),
            position,
        }
    }

    /// Rebuilds this frustum in place from new camera matrices.
    pub fn update(&mut self, view: &Mat4, proj: &Mat4) {
        *self = Self::from_view_projection(view, proj);
    }

    /// Returns one of the bounding planes.
    #[inline]
    pub fn plane(&self, plane: VolumePlane) -> &Plane {
        &self.planes[plane.index()]
    }

    /// Returns all bounding planes in [`VolumePlane`] order.
    #[inline]
    pub fn planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    /// Returns one of the corner points.
    #[inline]
    pub fn point(&self, corner: VolumeCorner) -> Vec3 {
        self.points[corner.index()]
    }

    /// Returns all corner points in [`VolumeCorner`] order.
    #[inline]
    pub fn points(&self) -> &[Vec3; 8] {
        &self.points
    }

    /// Returns the position the frustum was built from (camera eye, box
    /// center or cube map origin).
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    // --- Classification ---

    /// Classifies a box against the frustum.
    ///
    /// Planes are tested in [`VolumePlane`] order and the first plane that
    /// rejects the box ends the test.
    pub fn classify_aabb(&self, bounds: &BoundingBox) -> VolumeQuery {
        let mut result = VolumeQuery::Inside;
        for plane in &self.planes {
            match bounds.classify_plane(plane) {
                VolumeQuery::Outside => return VolumeQuery::Outside,
                VolumeQuery::Intersect => result = VolumeQuery::Intersect,
                VolumeQuery::Inside => {}
            }
        }
        result
    }

    /// Classifies a box after re-fitting it through `transform`.
    pub fn classify_aabb_transformed(&self, bounds: &BoundingBox, transform: &Mat4) -> VolumeQuery {
        self.classify_aabb(&bounds.transform(transform))
    }

    /// Classifies a box, reusing and updating the plane results in `cache`.
    ///
    /// Starting from an empty cache the result equals
    /// [`Frustum::classify_aabb`]. A cache copied from a parent node whose
    /// box contains this one stays valid, so children skip the planes the
    /// parent was already inside.
    pub fn classify_aabb_coherent(&self, bounds: &BoundingBox, cache: &mut CullCache) -> VolumeQuery {
        let mut result = VolumeQuery::Inside;

        if let Some(last) = cache.last_outside {
            if !cache.is_inside(last) {
                match bounds.classify_plane(self.plane(last)) {
                    VolumeQuery::Outside => return VolumeQuery::Outside,
                    VolumeQuery::Intersect => result = VolumeQuery::Intersect,
                    VolumeQuery::Inside => cache.mark_inside(last),
                }
            }
        }

        for face in VolumePlane::ALL {
            if cache.is_inside(face) || cache.last_outside == Some(face) {
                continue;
            }
            match bounds.classify_plane(self.plane(face)) {
                VolumeQuery::Outside => {
                    cache.last_outside = Some(face);
                    return VolumeQuery::Outside;
                }
                VolumeQuery::Intersect => result = VolumeQuery::Intersect,
                VolumeQuery::Inside => cache.mark_inside(face),
            }
        }

        cache.last_outside = None;
        result
    }

    /// [`Frustum::classify_aabb_coherent`] on a box re-fitted through `transform`.
    pub fn classify_aabb_coherent_transformed(
        &self,
        bounds: &BoundingBox,
        transform: &Mat4,
        cache: &mut CullCache,
    ) -> VolumeQuery {
        self.classify_aabb_coherent(&bounds.transform(transform), cache)
    }

    /// Classifies a sphere against the frustum.
    pub fn classify_sphere(&self, center: Vec3, radius: f32) -> VolumeQuery {
        let mut result = VolumeQuery::Inside;
        for plane in &self.planes {
            let d = plane.signed_distance(center);
            if d < -radius {
                return VolumeQuery::Outside;
            }
            if d < radius {
                result = VolumeQuery::Intersect;
            }
        }
        result
    }

    /// Reports where the frustum lies relative to `plane`.
    ///
    /// `Inside` means all eight corners are strictly on the positive side,
    /// `Outside` all strictly on the negative side. Corners exactly on the
    /// plane count for neither, so a frustum touching the plane is `Intersect`.
    pub fn classify_plane(&self, plane: &Plane) -> VolumeQuery {
        let mut in_front = 0;
        let mut behind = 0;
        for point in &self.points {
            let d = plane.signed_distance(*point);
            if d > 0.0 {
                in_front += 1;
            } else if d < 0.0 {
                behind += 1;
            }
        }

        if in_front == self.points.len() {
            VolumeQuery::Inside
        } else if behind == self.points.len() {
            VolumeQuery::Outside
        } else {
            VolumeQuery::Intersect
        }
    }

    // --- Boolean tests ---

    /// Tests whether a point lies inside or on the frustum.
    #[inline]
    pub fn test_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|p| p.signed_distance(point) >= 0.0)
    }

    /// Tests whether a box is at least partially inside the frustum.
    #[inline]
    pub fn test_aabb(&self, bounds: &BoundingBox) -> bool {
        self.planes
            .iter()
            .all(|p| bounds.classify_plane(p) != VolumeQuery::Outside)
    }

    /// [`Frustum::test_aabb`] on a box re-fitted through `transform`.
    #[inline]
    pub fn test_aabb_transformed(&self, bounds: &BoundingBox, transform: &Mat4) -> bool {
        self.test_aabb(&bounds.transform(transform))
    }

    /// Tests whether a sphere is at least partially inside the frustum.
    #[inline]
    pub fn test_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|p| p.signed_distance(center) >= -radius)
    }

    /// Tests whether the segment `start -> end` touches the frustum.
    #[inline]
    pub fn test_line(&self, start: Vec3, end: Vec3) -> bool {
        clip_segment(&self.planes, start, end).is_some()
    }

    /// Tests whether two frusta overlap, by clipping the edges of each
    /// against the other.
    pub fn test_frustum(&self, other: &Frustum) -> bool {
        let crosses = |volume: &Frustum, edges_of: &Frustum| {
            VolumeCorner::EDGES
                .iter()
                .any(|[a, b]| volume.test_line(edges_of.point(*a), edges_of.point(*b)))
        };
        crosses(self, other) || crosses(other, self)
    }

    /// Tests whether an extruded box reaches into the frustum.
    ///
    /// Used to find shadow casters outside the view that still cast into it.
    pub fn test_extruded_aabb(&self, extruded: &ExtrudedBoundingBox) -> bool {
        let origin = extruded.projection_point();
        let range = extruded.projection_range();

        // Nothing beyond the projection range is affected.
        if !self.test_sphere(origin, range) {
            return false;
        }

        let frustum_edge_hit = VolumeCorner::EDGES
            .iter()
            .any(|[a, b]| extruded.test_line(self.point(*a), self.point(*b)));
        if frustum_edge_hit {
            return true;
        }

        (0..extruded.edge_count())
            .filter_map(|i| extruded.edge(i))
            .any(|(p1, p2)| {
                [p1, p2].into_iter().any(|p| {
                    let reach = origin + (p - origin).normalize() * range;
                    self.test_line(p, reach)
                })
            })
    }

    /// Returns the interval of `t` during which a sphere at
    /// `center + sweep * t` is no further than `radius` behind `plane`.
    ///
    /// The interval may be unbounded on either side. Returns `None` when the
    /// sweep runs parallel to the plane and the sphere never reaches it.
    pub fn swept_sphere_intersect_plane(
        plane: &Plane,
        center: Vec3,
        radius: f32,
        sweep: Vec3,
    ) -> Option<(f32, f32)> {
        let b = plane.signed_distance(center);
        let dn = plane.dot_normal(sweep);

        if dn == 0.0 {
            return (b >= -radius).then_some((f32::NEG_INFINITY, f32::INFINITY));
        }

        let t = (-radius - b) / dn;
        if dn > 0.0 {
            Some((t, f32::INFINITY))
        } else {
            Some((f32::NEG_INFINITY, t))
        }
    }

    /// Tests whether a sphere swept from `center` to `center + sweep`
    /// touches the frustum at some point of the sweep.
    pub fn test_swept_sphere(&self, center: Vec3, radius: f32, sweep: Vec3) -> bool {
        let mut t_enter = 0.0f32;
        let mut t_exit = 1.0f32;
        for plane in &self.planes {
            let Some((t0, t1)) = Self::swept_sphere_intersect_plane(plane, center, radius, sweep)
            else {
                return false;
            };
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return false;
            }
        }
        true
    }

    // --- Transformation and comparison ---

    /// Returns the frustum transformed by `m`.
    ///
    /// Planes go through the inverse-transpose and are renormalized, while the
    /// corners and the position go through `m` itself.
    ///
    /// # Preconditions
    ///
    /// `m` must be invertible. A singular matrix logs a warning and yields
    /// NaN planes.
    pub fn transform(&self, m: &Mat4) -> Frustum {
        let inverse = m.inverse().unwrap_or_else(|| {
            log::warn!("Frustum transformed by a non-invertible matrix; planes are undefined");
            Mat4::NAN
        });
        let inv_t = inverse.transpose();

        Frustum {
            planes: self
                .planes
                .map(|p| Plane::from_vec4(inv_t * p.to_vec4()).normalize()),
            points: self.points.map(|p| m.transform_point(p)),
            position: m.transform_point(self.position),
        }
    }

    /// Whether all six planes match those of `other` within `epsilon`.
    pub fn approx_eq(&self, other: &Frustum, epsilon: f32) -> bool {
        self.planes
            .iter()
            .zip(other.planes.iter())
            .all(|(a, b)| {
                let delta: Vec4 = a.to_vec4() - b.to_vec4();
                (0..4).all(|i| delta.get(i).abs() <= epsilon)
            })
    }
}

/// Computes each corner as the intersection of its three planes.
fn corner_points(planes: &[Plane; 6]) -> [Vec3; 8] {
    VolumeCorner::ALL.map(|corner| {
        let [x, y, z] = corner.planes();
        Plane::intersect_three(
            &planes[x.index()],
            &planes[y.index()],
            &planes[z.index()],
        )
    })
}

/// Recovers the eye position `-(R^T t)` from a rigid view matrix.
fn eye_position(view: &Mat4) -> Vec3 {
    let t = view.cols[3];
    -(view.get_row(0).truncate() * t.x
        + view.get_row(1).truncate() * t.y
        + view.get_row(2).truncate() * t.z)
}
