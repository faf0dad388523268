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

use carbon_core::{BoundingBox, CullCache, ExtrudedBoundingBox, Frustum, Mat4, Vec3, VolumeQuery};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn scene_boxes() -> Vec<BoundingBox> {
    let mut boxes = Vec::with_capacity(10_000);
    for i in 0..100 {
        for j in 0..100 {
            let center = Vec3::new(i as f32 * 4.0 - 200.0, ((i * j) % 7) as f32, j as f32 * -4.0);
            boxes.push(BoundingBox::from_center_half_extents(center, Vec3::splat(1.0)));
        }
    }
    boxes
}

fn camera() -> Frustum {
    let view = Mat4::look_at_rh(Vec3::new(0.0, 10.0, 20.0), Vec3::new(0.0, 0.0, -100.0), Vec3::Y)
        .unwrap_or_default();
    let proj = Mat4::perspective_rh_zo(1.0, 16.0 / 9.0, 0.1, 300.0);
    Frustum::from_view_projection(&view, &proj)
}

fn bench_culling(c: &mut Criterion) {
    let frustum = camera();
    let boxes = scene_boxes();

    let mut group = c.benchmark_group("Frustum Culling");

    group.bench_function("classify_aabb (10k boxes)", |b| {
        b.iter(|| {
            let mut visible = 0;
            for bounds in &boxes {
                if frustum.classify_aabb(black_box(bounds)) != VolumeQuery::Outside {
                    visible += 1;
                }
            }
            black_box(visible);
        });
    });

    // Caches persist across frames, as they would per object.
    let mut caches = vec![CullCache::new(); boxes.len()];
    group.bench_function("classify_aabb_coherent (10k boxes)", |b| {
        b.iter(|| {
            let mut visible = 0;
            for (bounds, cache) in boxes.iter().zip(caches.iter_mut()) {
                if frustum.classify_aabb_coherent(black_box(bounds), cache) != VolumeQuery::Outside {
                    visible += 1;
                }
            }
            black_box(visible);
        });
    });

    let light = Vec3::new(0.0, 80.0, -50.0);
    group.bench_function("test_extruded_aabb (1k casters)", |b| {
        b.iter(|| {
            let mut casting = 0;
            for bounds in boxes.iter().step_by(10) {
                let shadow = ExtrudedBoundingBox::extrude(bounds, light, 250.0, None);
                if frustum.test_extruded_aabb(black_box(&shadow)) {
                    casting += 1;
                }
            }
            black_box(casting);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_culling);
criterion_main!(benches);
