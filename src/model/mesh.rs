//! Decoded keyframe mesh
//!
//! The loader hands over fully decoded data (`MeshData`); `Mesh::new`
//! validates every index once so the per-tick pipeline can index freely.

use crate::error::{RenderError, RenderResult};
use crate::rasterizer::{Color, Polygon, TexCoord, Vertex};
use tracing::{info, warn};

/// Palette-indexed texture: `indices[y * width + x]` selects a palette entry
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedTexture {
    width: usize,
    height: usize,
    indices: Vec<u8>,
    palette: Vec<Color>,
}

impl IndexedTexture {
    pub fn new(width: usize, indices: Vec<u8>, palette: Vec<Color>) -> RenderResult<Self> {
        if width == 0 {
            return Err(RenderError::invalid_mesh("texture width is zero"));
        }
        if indices.is_empty() || indices.len() % width != 0 {
            return Err(RenderError::invalid_mesh(format!(
                "texture has {} texels, not a whole number of {}-wide rows",
                indices.len(),
                width
            )));
        }
        if palette.is_empty() {
            return Err(RenderError::invalid_mesh("palette is empty"));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= palette.len()) {
            return Err(RenderError::invalid_mesh(format!(
                "texel references palette entry {} but palette has {} colors",
                bad,
                palette.len()
            )));
        }

        let height = indices.len() / width;
        Ok(Self { width, height, indices, palette })
    }

    /// 1x1 texture with a single palette entry
    pub fn solid(color: Color) -> Self {
        Self {
            width: 1,
            height: 1,
            indices: vec![0],
            palette: vec![color],
        }
    }

    /// Stand-in used when the skin could not be loaded
    pub fn fallback() -> Self {
        Self::solid(Color::MAGENTA)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    /// Texel index for texel-space (u, v), clamped into the texture
    pub fn texel_index(&self, u: f32, v: f32) -> usize {
        let x = (u.floor().max(0.0) as usize).min(self.width - 1);
        let y = (v.floor().max(0.0) as usize).min(self.height - 1);
        x + y * self.width
    }

    /// Nearest texel lookup through the palette
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let index = self.indices[self.texel_index(u, v)];
        self.palette[index as usize]
    }
}

/// Everything the ingestion step produces
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub num_verts: usize,
    pub num_polys: usize,
    pub num_uvs: usize,
    pub texture_width: usize,
    pub faces: Vec<Polygon>,
    pub texcoords: Vec<TexCoord>,
    pub palette: Vec<Color>,
    pub texture_indices: Vec<u8>,
    /// One vertex array (position + normal) per animation frame
    pub keyframes: Vec<Vec<Vertex>>,
}

/// Validated, immutable mesh
#[derive(Debug, Clone)]
pub struct Mesh {
    num_verts: usize,
    faces: Vec<Polygon>,
    texcoords: Vec<TexCoord>,
    texture: IndexedTexture,
    keyframes: Vec<Vec<Vertex>>,
}

impl Mesh {
    pub fn new(data: MeshData) -> RenderResult<Self> {
        let MeshData {
            num_verts,
            num_polys,
            num_uvs,
            texture_width,
            faces,
            texcoords,
            palette,
            texture_indices,
            keyframes,
        } = data;

        if faces.len() != num_polys {
            return Err(RenderError::invalid_mesh(format!(
                "declared {} polygons but got {}",
                num_polys,
                faces.len()
            )));
        }
        if texcoords.len() != num_uvs {
            return Err(RenderError::invalid_mesh(format!(
                "declared {} texture coordinates but got {}",
                num_uvs,
                texcoords.len()
            )));
        }
        if keyframes.is_empty() {
            return Err(RenderError::invalid_mesh("mesh has no keyframes"));
        }
        if let Some((frame, verts)) = keyframes.iter().enumerate().find(|(_, f)| f.len() != num_verts) {
            return Err(RenderError::invalid_mesh(format!(
                "keyframe {} has {} vertices, expected {}",
                frame,
                verts.len(),
                num_verts
            )));
        }
        for (i, face) in faces.iter().enumerate() {
            if let Some(&v) = face.indices.iter().find(|&&v| v >= num_verts) {
                return Err(RenderError::invalid_mesh(format!(
                    "polygon {} references vertex {} of {}",
                    i, v, num_verts
                )));
            }
            if let Some(&t) = face.uv_indices.iter().find(|&&t| t >= num_uvs) {
                return Err(RenderError::invalid_mesh(format!(
                    "polygon {} references texture coordinate {} of {}",
                    i, t, num_uvs
                )));
            }
        }

        let texture = if palette.is_empty() || texture_indices.is_empty() {
            warn!("mesh has no skin, using fallback texture");
            IndexedTexture::fallback()
        } else {
            IndexedTexture::new(texture_width, texture_indices, palette)?
        };

        info!(
            verts = num_verts,
            polys = num_polys,
            uvs = num_uvs,
            frames = keyframes.len(),
            texture = %format!("{}x{}", texture.width(), texture.height()),
            "mesh loaded"
        );

        Ok(Self {
            num_verts,
            faces,
            texcoords,
            texture,
            keyframes,
        })
    }

    pub fn num_verts(&self) -> usize {
        self.num_verts
    }

    pub fn num_polys(&self) -> usize {
        self.faces.len()
    }

    pub fn num_uvs(&self) -> usize {
        self.texcoords.len()
    }

    pub fn num_frames(&self) -> usize {
        self.keyframes.len()
    }

    pub fn faces(&self) -> &[Polygon] {
        &self.faces
    }

    pub fn texcoords(&self) -> &[TexCoord] {
        &self.texcoords
    }

    pub fn texture(&self) -> &IndexedTexture {
        &self.texture
    }

    pub fn keyframe(&self, frame: usize) -> Option<&[Vertex]> {
        self.keyframes.get(frame).map(Vec::as_slice)
    }
}
