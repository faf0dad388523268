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

//! Integration tests for least-squares plane fitting over terrain tiles.

use carbon_core::{LeastSquaresSums, Vec3};
use std::thread;

/// Heights of a tilted terrain patch, sampled on a regular grid.
fn terrain_samples(size: i32) -> Vec<Vec3> {
    let mut samples = Vec::new();
    for ix in 0..size {
        for iz in 0..size {
            let (x, z) = (ix as f32, iz as f32);
            samples.push(Vec3::new(x, 0.25 * x - 0.5 * z + 12.0, z));
        }
    }
    samples
}

#[test]
fn test_fit_is_exact_for_planar_samples() {
    let samples = terrain_samples(16);
    let plane = samples.iter().copied().collect::<LeastSquaresSums>().compute_plane();

    for p in &samples {
        assert!(plane.signed_distance(*p).abs() < 1e-3, "{p:?} off plane");
    }
    // y = 0.25x - 0.5z + 12 has the upward normal (-0.25, 1, 0.5) before normalization.
    let expected = Vec3::new(-0.25, 1.0, 0.5).normalize();
    assert!((plane.normal - expected).length() < 1e-5);
}

#[test]
fn test_fit_is_order_invariant() {
    let samples = terrain_samples(12);
    let forward: LeastSquaresSums = samples.iter().copied().collect();
    let backward: LeastSquaresSums = samples.iter().rev().copied().collect();
    let interleaved: LeastSquaresSums = samples
        .iter()
        .step_by(2)
        .chain(samples.iter().skip(1).step_by(2))
        .copied()
        .collect();

    assert_eq!(forward, backward);
    assert_eq!(forward, interleaved);
    assert_eq!(forward.compute_plane(), backward.compute_plane());
}

#[test]
fn test_parallel_tile_reduction() {
    let samples = terrain_samples(32);
    let serial: LeastSquaresSums = samples.iter().copied().collect();

    let parallel: LeastSquaresSums = thread::scope(|scope| {
        let handles: Vec<_> = samples
            .chunks(samples.len() / 4)
            .map(|tile| scope.spawn(move || tile.iter().copied().collect::<LeastSquaresSums>()))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("tile worker panicked"))
            .sum()
    });

    assert_eq!(parallel.samples(), serial.samples());
    assert_eq!(parallel, serial);
    assert_eq!(parallel.compute_plane(), serial.compute_plane());
}

#[test]
fn test_too_few_samples_is_flagged_by_finiteness() {
    let sums: LeastSquaresSums = [Vec3::ZERO, Vec3::ONE].into_iter().collect();
    assert!(sums.samples() < 3);
    let plane = sums.compute_plane();
    assert!(!(plane.normal.is_finite() && plane.distance.is_finite()));
}
