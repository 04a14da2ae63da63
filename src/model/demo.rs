//! Procedural demo asset: a textured cube that pulses over a short loop
//!
//! Stands in for a loaded character model so the viewer and tests have a
//! keyframed mesh without any file parsing.

use super::animation::AnimationClip;
use super::mesh::{Mesh, MeshData};
use crate::error::RenderResult;
use crate::rasterizer::{Color, Polygon, TexCoord, Vector4, Vertex};

pub const PULSE_FRAMES: usize = 8;
const TEXTURE_SIZE: usize = 16;

/// The clip that plays the whole pulse loop
pub fn pulse_clip() -> AnimationClip {
    AnimationClip::new("pulse", 0, PULSE_FRAMES, 8.0)
}

/// Cube corners; faces below wind counter-clockwise seen from outside
const CORNERS: [[f32; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// Quads as (a, b, c, d); each becomes triangles (a, b, c) and (a, c, d)
const QUADS: [[usize; 4]; 6] = [
    [4, 5, 6, 7], // front (+z)
    [1, 0, 3, 2], // back (-z)
    [5, 1, 2, 6], // right (+x)
    [0, 4, 7, 3], // left (-x)
    [7, 6, 2, 3], // top (+y)
    [0, 1, 5, 4], // bottom (-y)
];

/// Checkerboard skin over a 256-entry gradient palette
fn checker_skin() -> (Vec<Color>, Vec<u8>) {
    let palette = (0..=255u8)
        .map(|i| Color::new(i, 255 - i, 128u8.wrapping_add(i / 2)))
        .collect();

    let mut texels = Vec::with_capacity(TEXTURE_SIZE * TEXTURE_SIZE);
    for y in 0..TEXTURE_SIZE {
        for x in 0..TEXTURE_SIZE {
            let checker = ((x / 4) + (y / 4)) % 2 == 0;
            texels.push(if checker { 40 } else { 220 });
        }
    }
    (palette, texels)
}

/// Build the pulsing cube. `half_size` is the rest half-extent.
pub fn pulsing_cube(half_size: f32) -> RenderResult<Mesh> {
    let mut faces = Vec::with_capacity(QUADS.len() * 2);
    for quad in &QUADS {
        faces.push(Polygon::new([quad[0], quad[1], quad[2]], [0, 1, 2]));
        faces.push(Polygon::new([quad[0], quad[2], quad[3]], [0, 2, 3]));
    }

    let edge = (TEXTURE_SIZE - 1) as f32;
    let texcoords = vec![
        TexCoord::new(0.0, 0.0),
        TexCoord::new(edge, 0.0),
        TexCoord::new(edge, edge),
        TexCoord::new(0.0, edge),
    ];

    let keyframes = (0..PULSE_FRAMES)
        .map(|frame| {
            let phase = frame as f32 / PULSE_FRAMES as f32 * std::f32::consts::TAU;
            let scale = half_size * (1.0 + 0.25 * phase.sin());
            CORNERS
                .iter()
                .map(|&[x, y, z]| {
                    Vertex::with_normal(
                        Vector4::point(x * scale, y * scale, z * scale),
                        Vector4::direction(x, y, z).normalized(),
                    )
                })
                .collect()
        })
        .collect();

    let (palette, texture_indices) = checker_skin();

    Mesh::new(MeshData {
        num_verts: CORNERS.len(),
        num_polys: faces.len(),
        num_uvs: texcoords.len(),
        texture_width: TEXTURE_SIZE,
        faces,
        texcoords,
        palette,
        texture_indices,
        keyframes,
    })
}
