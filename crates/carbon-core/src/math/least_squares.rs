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

//! Provides [`LeastSquaresSums`], an additive accumulator for fitting a plane
//! to a height-field point cloud.

use super::plane::Plane;
use super::vector::Vec3;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Running sums over a set of points, from which the best-fit plane
/// `y = a*x + b*z + c` (Y up) can be derived.
///
/// Sums are kept in `f64` and combine by plain addition, so partial sums
/// built per tile or per thread can be merged in any order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LeastSquaresSums {
    /// Sum of x.
    pub x: f64,
    /// Sum of y.
    pub y: f64,
    /// Sum of z.
    pub z: f64,
    /// Sum of x * x.
    pub xx: f64,
    /// Sum of x * y.
    pub xy: f64,
    /// Sum of x * z.
    pub xz: f64,
    /// Sum of z * y.
    pub zy: f64,
    /// Sum of z * z.
    pub zz: f64,
    /// Number of accumulated points.
    pub samples: u32,
}

impl LeastSquaresSums {
    /// Creates an empty accumulator.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets all sums to zero.
    #[inline]
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Accumulates one point.
    pub fn add_point(&mut self, point: Vec3) {
        let (x, y, z) = (point.x as f64, point.y as f64, point.z as f64);
        self.x += x;
        self.y += y;
        self.z += z;
        self.xx += x * x;
        self.xy += x * y;
        self.xz += x * z;
        self.zy += z * y;
        self.zz += z * z;
        self.samples += 1;
    }

    /// The number of accumulated points.
    #[inline]
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Derives the best-fit plane through the accumulated points.
    ///
    /// The normal faces up (positive Y) and the plane passes through the
    /// centroid of the samples.
    ///
    /// # Preconditions
    ///
    /// The system is only solvable with at least three samples that are not
    /// collinear and do not form a vertical wall. Otherwise the denominator
    /// vanishes and the plane is NaN or infinite; check [`samples`] or the
    /// finiteness of the result.
    ///
    /// [`samples`]: LeastSquaresSums::samples
    pub fn compute_plane(&self) -> Plane {
        let n = self.samples as f64;

        // Centered second moments.
        let sxx = self.xx - self.x * self.x / n;
        let sxz = self.xz - self.x * self.z / n;
        let szz = self.zz - self.z * self.z / n;
        let sxy = self.xy - self.x * self.y / n;
        let szy = self.zy - self.z * self.y / n;

        let denom = sxx * szz - sxz * sxz;
        let a = (sxy * szz - szy * sxz) / denom;
        let b = (szy * sxx - sxy * sxz) / denom;

        // Length is at least one for any finite fit; a degenerate fit must stay
        // non-finite, which `Vec3::normalize` would clamp to zero.
        let len = (a * a + 1.0 + b * b).sqrt();
        let normal = Vec3::new((-a / len) as f32, (1.0 / len) as f32, (-b / len) as f32);
        let centroid = Vec3::new((self.x / n) as f32, (self.y / n) as f32, (self.z / n) as f32);
        Plane::from_normal_and_point(normal, centroid)
    }
}

impl AddAssign for LeastSquaresSums {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
        self.xx += rhs.xx;
        self.xy += rhs.xy;
        self.xz += rhs.xz;
        self.zy += rhs.zy;
        self.zz += rhs.zz;
        self.samples += rhs.samples;
    }
}

impl Add for LeastSquaresSums {
    type Output = Self;
    #[inline]
    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl Sum for LeastSquaresSums {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl FromIterator<Vec3> for LeastSquaresSums {
    fn from_iter<I: IntoIterator<Item = Vec3>>(iter: I) -> Self {
        let mut sums = Self::new();
        for point in iter {
            sums.add_point(point);
        }
        sums
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid_on(a: f32, b: f32, c: f32) -> Vec<Vec3> {
        let mut points = Vec::new();
        for i in -3..=3 {
            for j in -3..=3 {
                let (x, z) = (i as f32, j as f32);
                points.push(Vec3::new(x, a * x + b * z + c, z));
            }
        }
        points
    }

    #[test]
    fn test_flat_ground() {
        let sums: LeastSquaresSums = grid_on(0.0, 0.0, 2.0).into_iter().collect();
        let plane = sums.compute_plane();
        assert_eq!(plane.normal, Vec3::Y);
        assert_relative_eq!(plane.distance, -2.0);
        assert_eq!(sums.samples(), 49);
    }

    #[test]
    fn test_sloped_plane_is_exact() {
        let sums: LeastSquaresSums = grid_on(0.5, -0.25, 1.0).into_iter().collect();
        let plane = sums.compute_plane();
        for p in grid_on(0.5, -0.25, 1.0) {
            assert_relative_eq!(plane.signed_distance(p), 0.0, epsilon = 1e-4);
        }
        assert!(plane.normal.y > 0.0);
        assert_relative_eq!(plane.normal.length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let points = grid_on(0.3, 0.1, -4.0);
        let whole: LeastSquaresSums = points.iter().copied().collect();

        let (left, right) = points.split_at(20);
        let mut merged: LeastSquaresSums = right.iter().copied().collect();
        merged += left.iter().copied().collect::<LeastSquaresSums>();
        assert_eq!(merged.samples(), whole.samples());
        assert_eq!(merged.compute_plane(), whole.compute_plane());

        let summed: LeastSquaresSums = points
            .chunks(7)
            .map(|chunk| chunk.iter().copied().collect::<LeastSquaresSums>())
            .sum();
        assert_eq!(summed.compute_plane(), whole.compute_plane());
    }

    #[test]
    fn test_clear() {
        let mut sums: LeastSquaresSums = grid_on(1.0, 1.0, 1.0).into_iter().collect();
        sums.clear();
        assert_eq!(sums, LeastSquaresSums::new());
        assert_eq!(sums.samples(), 0);
    }

    #[test]
    fn test_degenerate_input_is_not_finite() {
        let mut sums = LeastSquaresSums::new();
        sums.add_point(Vec3::new(0.0, 1.0, 0.0));
        sums.add_point(Vec3::new(1.0, 2.0, 1.0));
        let plane = sums.compute_plane();
        assert!(!plane.normal.is_finite() || !plane.distance.is_finite());
        assert!(plane.signed_distance(Vec3::new(5.0, -3.0, 7.0)).is_nan());
    }
}
