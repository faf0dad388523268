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

//! The shared vocabulary of convex volumes: query results, plane and corner
//! labels, cube faces, and segment clipping against a set of planes.

use super::error::MathError;
use super::plane::Plane;
use super::vector::Vec3;
use serde::{Deserialize, Serialize};

/// The result of classifying one volume against another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolumeQuery {
    /// Entirely inside the tested volume.
    Inside,
    /// Entirely outside the tested volume.
    Outside,
    /// Partially inside.
    Intersect,
}

/// The result of classifying a point, segment or box against a single plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaneQuery {
    /// On the side the normal points to.
    Front,
    /// On the side opposite to the normal.
    Back,
    /// Within the epsilon band around the plane.
    On,
    /// Crossing the plane.
    Spanning,
}

/// Labels the six bounding planes of a box-like volume.
///
/// The discriminant is the plane's index in a `[Plane; 6]` array, and also
/// the bit index used by [`CullCache`](super::CullCache) masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum VolumePlane {
    /// The `-X` face of a box.
    Left = 0,
    /// The `+X` face of a box.
    Right = 1,
    /// The `+Y` face of a box.
    Top = 2,
    /// The `-Y` face of a box.
    Bottom = 3,
    /// The `-Z` face of a box.
    Near = 4,
    /// The `+Z` face of a box.
    Far = 5,
}

impl VolumePlane {
    /// All planes in index order.
    pub const ALL: [VolumePlane; 6] = [
        VolumePlane::Left,
        VolumePlane::Right,
        VolumePlane::Top,
        VolumePlane::Bottom,
        VolumePlane::Near,
        VolumePlane::Far,
    ];

    /// Returns the array index of this plane.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the plane facing the opposite direction.
    #[inline]
    pub const fn opposite(self) -> VolumePlane {
        match self {
            VolumePlane::Left => VolumePlane::Right,
            VolumePlane::Right => VolumePlane::Left,
            VolumePlane::Top => VolumePlane::Bottom,
            VolumePlane::Bottom => VolumePlane::Top,
            VolumePlane::Near => VolumePlane::Far,
            VolumePlane::Far => VolumePlane::Near,
        }
    }

    /// Returns the axis (0 = X, 1 = Y, 2 = Z) this plane is perpendicular to
    /// when it bounds a box.
    #[inline]
    pub const fn axis(self) -> usize {
        self.index() / 2
    }
}

impl TryFrom<u8> for VolumePlane {
    type Error = MathError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        VolumePlane::ALL
            .get(value as usize)
            .copied()
            .ok_or(MathError::InvalidVolumePlane(value))
    }
}

/// Labels the eight corners of a box-like volume.
///
/// Bit 0 of the discriminant selects Near (else Far), bit 1 Top (else Bottom)
/// and bit 2 Left (else Right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum VolumeCorner {
    /// The right bottom far corner.
    RightBottomFar = 0,
    /// The right bottom near corner.
    RightBottomNear = 1,
    /// The right top far corner.
    RightTopFar = 2,
    /// The right top near corner.
    RightTopNear = 3,
    /// The left bottom far corner.
    LeftBottomFar = 4,
    /// The left bottom near corner.
    LeftBottomNear = 5,
    /// The left top far corner.
    LeftTopFar = 6,
    /// The left top near corner.
    LeftTopNear = 7,
}

impl VolumeCorner {
    /// All corners in index order.
    pub const ALL: [VolumeCorner; 8] = [
        VolumeCorner::RightBottomFar,
        VolumeCorner::RightBottomNear,
        VolumeCorner::RightTopFar,
        VolumeCorner::RightTopNear,
        VolumeCorner::LeftBottomFar,
        VolumeCorner::LeftBottomNear,
        VolumeCorner::LeftTopFar,
        VolumeCorner::LeftTopNear,
    ];

    /// The twelve edges of a box-like volume: four along X, then four along
    /// Y, then four along Z.
    pub const EDGES: [[VolumeCorner; 2]; 12] = {
        use VolumeCorner::*;
        [
            [RightBottomFar, LeftBottomFar],
            [RightBottomNear, LeftBottomNear],
            [RightTopFar, LeftTopFar],
            [RightTopNear, LeftTopNear],
            [RightBottomFar, RightTopFar],
            [RightBottomNear, RightTopNear],
            [LeftBottomFar, LeftTopFar],
            [LeftBottomNear, LeftTopNear],
            [RightBottomFar, RightBottomNear],
            [RightTopFar, RightTopNear],
            [LeftBottomFar, LeftBottomNear],
            [LeftTopFar, LeftTopNear],
        ]
    };

    /// Returns the array index of this corner.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether the corner lies on the Near plane.
    #[inline]
    pub const fn is_near(self) -> bool {
        (self as u8) & 0b001 != 0
    }

    /// Whether the corner lies on the Top plane.
    #[inline]
    pub const fn is_top(self) -> bool {
        (self as u8) & 0b010 != 0
    }

    /// Whether the corner lies on the Left plane.
    #[inline]
    pub const fn is_left(self) -> bool {
        (self as u8) & 0b100 != 0
    }

    /// Returns the three planes meeting at this corner, ordered by axis
    /// (X plane, Y plane, Z plane).
    #[inline]
    pub const fn planes(self) -> [VolumePlane; 3] {
        [
            if self.is_left() {
                VolumePlane::Left
            } else {
                VolumePlane::Right
            },
            if self.is_top() {
                VolumePlane::Top
            } else {
                VolumePlane::Bottom
            },
            if self.is_near() {
                VolumePlane::Near
            } else {
                VolumePlane::Far
            },
        ]
    }

    /// Returns the two planes shared by the corners of an edge.
    ///
    /// For an edge from [`VolumeCorner::EDGES`] these are the two faces
    /// adjacent to the edge.
    pub fn shared_planes(edge: [VolumeCorner; 2]) -> [VolumePlane; 2] {
        let a = edge[0].planes();
        let b = edge[1].planes();
        let mut shared = [VolumePlane::Left; 2];
        let mut count = 0;
        for axis in 0..3 {
            if a[axis] == b[axis] && count < 2 {
                shared[count] = a[axis];
                count += 1;
            }
        }
        shared
    }
}

impl TryFrom<u8> for VolumeCorner {
    type Error = MathError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        VolumeCorner::ALL
            .get(value as usize)
            .copied()
            .ok_or(MathError::InvalidVolumeCorner(value))
    }
}

/// One face of a cube map, named by the axis direction it looks along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CubeFace {
    /// Looks along `+X`.
    PositiveX = 0,
    /// Looks along `-X`.
    NegativeX = 1,
    /// Looks along `+Y`.
    PositiveY = 2,
    /// Looks along `-Y`.
    NegativeY = 3,
    /// Looks along `+Z`.
    PositiveZ = 4,
    /// Looks along `-Z`.
    NegativeZ = 5,
}

impl CubeFace {
    /// All faces in index order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    /// Returns the unit direction this face looks along.
    #[inline]
    pub fn direction(self) -> Vec3 {
        match self {
            CubeFace::PositiveX => Vec3::X,
            CubeFace::NegativeX => -Vec3::X,
            CubeFace::PositiveY => Vec3::Y,
            CubeFace::NegativeY => -Vec3::Y,
            CubeFace::PositiveZ => Vec3::Z,
            CubeFace::NegativeZ => -Vec3::Z,
        }
    }
}

impl TryFrom<u8> for CubeFace {
    type Error = MathError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        CubeFace::ALL
            .get(value as usize)
            .copied()
            .ok_or(MathError::InvalidCubeFace(value))
    }
}

/// Clips the segment `start -> end` against the intersection of the
/// non-negative half-spaces of `planes`.
///
/// Returns the parametric interval `(t_enter, t_exit)` within `[0, 1]` that
/// lies inside every plane, or `None` if the segment misses the volume. An
/// empty plane set accepts the whole segment.
pub fn clip_segment(planes: &[Plane], start: Vec3, end: Vec3) -> Option<(f32, f32)> {
    let mut t_enter = 0.0f32;
    let mut t_exit = 1.0f32;

    for plane in planes {
        let d_start = plane.signed_distance(start);
        let d_end = plane.signed_distance(end);

        if d_start < 0.0 && d_end < 0.0 {
            return None;
        }
        if d_start >= 0.0 && d_end >= 0.0 {
            continue;
        }

        let t = d_start / (d_start - d_end);
        if d_start < 0.0 {
            t_enter = t_enter.max(t);
        } else {
            t_exit = t_exit.min(t);
        }
        if t_enter > t_exit {
            return None;
        }
    }

    Some((t_enter, t_exit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_corner_bits() {
        for corner in VolumeCorner::ALL {
            let [x, y, z] = corner.planes();
            assert_eq!(x == VolumePlane::Left, corner.is_left());
            assert_eq!(y == VolumePlane::Top, corner.is_top());
            assert_eq!(z == VolumePlane::Near, corner.is_near());
        }
        assert_eq!(VolumeCorner::LeftTopNear.index(), 7);
        assert!(!VolumeCorner::RightBottomFar.is_near());
    }

    #[test]
    fn test_edges_share_two_planes() {
        for (i, edge) in VolumeCorner::EDGES.iter().enumerate() {
            let differing = (edge[0] as u8) ^ (edge[1] as u8);
            assert_eq!(differing.count_ones(), 1, "edge {i} is not a box edge");
            let shared = VolumeCorner::shared_planes(*edge);
            assert_ne!(shared[0], shared[1]);
            for plane in shared {
                assert!(edge[0].planes().contains(&plane));
                assert!(edge[1].planes().contains(&plane));
            }
        }
        let [a, b] = VolumeCorner::shared_planes(VolumeCorner::EDGES[0]);
        assert_eq!((a, b), (VolumePlane::Bottom, VolumePlane::Far));
    }

    #[test]
    fn test_try_from_rejects_out_of_range() {
        assert_eq!(CubeFace::try_from(3), Ok(CubeFace::NegativeY));
        assert_eq!(CubeFace::try_from(6), Err(MathError::InvalidCubeFace(6)));
        assert_eq!(VolumePlane::try_from(5), Ok(VolumePlane::Far));
        assert_eq!(
            VolumePlane::try_from(200),
            Err(MathError::InvalidVolumePlane(200))
        );
        assert_eq!(VolumeCorner::try_from(7), Ok(VolumeCorner::LeftTopNear));
        assert_eq!(
            VolumeCorner::try_from(8),
            Err(MathError::InvalidVolumeCorner(8))
        );
    }

    #[test]
    fn test_plane_opposites() {
        for plane in VolumePlane::ALL {
            assert_eq!(plane.opposite().opposite(), plane);
            assert_eq!(plane.opposite().axis(), plane.axis());
        }
    }

    #[test]
    fn test_clip_segment_slab() {
        // Slab 0 <= x <= 1.
        let planes = [
            Plane::new(Vec3::X, 0.0),
            Plane::new(-Vec3::X, 1.0),
        ];
        let (t0, t1) = clip_segment(&planes, Vec3::new(-1.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0))
            .unwrap();
        assert_relative_eq!(t0, 0.25);
        assert_relative_eq!(t1, 0.5);

        assert!(clip_segment(&planes, Vec3::new(2.0, 0.0, 0.0), Vec3::new(5.0, 1.0, 0.0)).is_none());
        assert_eq!(
            clip_segment(&[], Vec3::ZERO, Vec3::ONE),
            Some((0.0, 1.0))
        );
    }
}
