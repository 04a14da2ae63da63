//! Working buffers owned by one render pass

use crate::model::Mesh;
use crate::rasterizer::{Matrix4, Polygon, Vertex};

/// Which buffer a transform reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformMode {
    /// Rewrite the animated source positions in place
    Local,
    /// Read the source buffer, write the transformed buffer
    LocalToTransformed,
    /// Rewrite the transformed buffer in place
    Transformed,
}

/// Per-mesh pipeline state.
///
/// `local` holds the animated pose, `transformed` is the working set every
/// later stage rewrites, `faces` carries the per-tick derived fields and
/// `draw_order` is the painter's order produced by the depth sort.
#[derive(Debug, Clone)]
pub struct PipelineState {
    pub local: Vec<Vertex>,
    pub transformed: Vec<Vertex>,
    pub faces: Vec<Polygon>,
    pub draw_order: Vec<usize>,
}

impl PipelineState {
    pub fn new(mesh: &Mesh) -> Self {
        let pose = mesh.keyframe(0).map(<[Vertex]>::to_vec).unwrap_or_default();
        Self {
            transformed: pose.clone(),
            local: pose,
            faces: mesh.faces().to_vec(),
            draw_order: (0..mesh.num_polys()).collect(),
        }
    }

    /// Build a state straight from vertex and face lists
    pub fn from_parts(vertices: Vec<Vertex>, faces: Vec<Polygon>) -> Self {
        Self {
            transformed: vertices.clone(),
            local: vertices,
            draw_order: (0..faces.len()).collect(),
            faces,
        }
    }

    pub fn transform(&mut self, matrix: &Matrix4, mode: TransformMode) {
        match mode {
            TransformMode::Local => {
                for v in &mut self.local {
                    v.position = matrix.transform(v.position);
                }
            }
            TransformMode::LocalToTransformed => {
                for (dst, src) in self.transformed.iter_mut().zip(&self.local) {
                    *dst = *src;
                    dst.position = matrix.transform(src.position);
                }
            }
            TransformMode::Transformed => {
                for v in &mut self.transformed {
                    v.position = matrix.transform(v.position);
                }
            }
        }
    }

    /// Divide every transformed position by its own w. Run exactly once,
    /// between the perspective and screen transforms. Vertices with w == 0
    /// are left as they are.
    pub fn dehomogenise(&mut self) {
        for v in &mut self.transformed {
            let w = v.position.w;
            if w != 0.0 {
                v.position = v.position / w;
            }
        }
    }
}
