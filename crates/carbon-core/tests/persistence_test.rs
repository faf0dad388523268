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

//! Integration tests for storing culling volumes in binary scene data.

use bincode::config;
use carbon_core::{BoundingBox, CullCache, Frustum, Mat4, Vec3, VolumePlane, VolumeQuery};

#[test]
fn test_frustum_survives_serde_encoding() -> anyhow::Result<()> {
    let view = Mat4::look_at_rh(Vec3::new(0.0, 2.0, 8.0), Vec3::ZERO, Vec3::Y)
        .ok_or_else(|| anyhow::anyhow!("degenerate camera"))?;
    let proj = Mat4::perspective_rh_zo(1.0, 1.5, 0.1, 50.0);
    let frustum = Frustum::from_view_projection(&view, &proj);

    let bytes = bincode::serde::encode_to_vec(frustum, config::standard())?;
    let (decoded, read): (Frustum, usize) =
        bincode::serde::decode_from_slice(&bytes, config::standard())?;

    assert_eq!(read, bytes.len());
    assert_eq!(decoded, frustum);

    let inner = BoundingBox::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5));
    assert_eq!(decoded.classify_aabb(&inner), VolumeQuery::Inside);
    Ok(())
}

#[test]
fn test_cull_cache_survives_serde_encoding() -> anyhow::Result<()> {
    let cache = CullCache {
        inside_mask: 0b01_0110,
        last_outside: Some(VolumePlane::Far),
    };
    let bytes = bincode::serde::encode_to_vec(cache, config::standard())?;
    let (decoded, _): (CullCache, usize) =
        bincode::serde::decode_from_slice(&bytes, config::standard())?;
    assert_eq!(decoded, cache);
    Ok(())
}

#[test]
fn test_vectors_use_native_encoding() -> anyhow::Result<()> {
    let points = vec![Vec3::new(1.0, -2.0, 3.5), Vec3::ZERO, Vec3::splat(f32::MAX)];
    let bytes = bincode::encode_to_vec(&points, config::standard())?;
    let (decoded, _): (Vec<Vec3>, usize) = bincode::decode_from_slice(&bytes, config::standard())?;
    assert_eq!(decoded, points);

    // The same points upload to the GPU as a flat float buffer.
    let floats: &[f32] = bytemuck::cast_slice(points.as_slice());
    assert_eq!(floats.len(), 9);
    assert_eq!(floats[2], 3.5);
    Ok(())
}
