//! Face normals, back-face classification and smoothed vertex normals

use super::state::PipelineState;
use crate::rasterizer::Vector4;

impl PipelineState {
    /// Compute each face normal as `normalize((A - C) x (A - B))` from the
    /// transformed positions and flag the face back-facing when
    /// `(A - camera_position) . normal < 0`.
    ///
    /// `camera_position` is the world-space camera position, compared
    /// against whatever space the transformed buffer is currently in.
    pub fn calculate_backfacing(&mut self, camera_position: Vector4) {
        let verts = &self.transformed;
        for face in &mut self.faces {
            let a = verts[face.indices[0]].position;
            let b = verts[face.indices[1]].position;
            let c = verts[face.indices[2]].position;

            let normal = (a - c).cross(a - b).normalized();
            face.normal = normal;

            let eye = a - camera_position;
            face.backfacing = eye.dot(normal) < 0.0;
        }
    }

    /// Average the normals of every face touching a vertex, then
    /// renormalize. Vertices no face references end up with a zero normal.
    pub fn calculate_vertex_normals(&mut self) {
        let mut contributions = vec![0u32; self.transformed.len()];
        for v in &mut self.transformed {
            v.normal = Vector4::ZERO;
        }

        for face in &self.faces {
            for &idx in &face.indices {
                contributions[idx] += 1;
                self.transformed[idx].normal += face.normal;
            }
        }

        for (v, &count) in self.transformed.iter_mut().zip(&contributions) {
            if count == 0 {
                continue;
            }
            v.normal = v.normal / count as f32;
            v.normal.normalize();
        }
    }

    /// Number of faces not flagged back-facing
    pub fn visible_faces(&self) -> usize {
        self.faces.iter().filter(|f| !f.backfacing).count()
    }
}
