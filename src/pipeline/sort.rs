//! Painter's-order depth sort

use super::state::PipelineState;

impl PipelineState {
    /// Refresh each face's `average_z` from the transformed positions and
    /// rebuild `draw_order` ascending by it, so the most negative (farthest
    /// in camera space) face is drawn first. Ties keep their mesh order.
    pub fn sort_by_depth(&mut self) {
        let verts = &self.transformed;
        for face in &mut self.faces {
            let sum: f32 = face.indices.iter().map(|&i| verts[i].position.z).sum();
            face.average_z = sum / 3.0;
        }

        let faces = &self.faces;
        self.draw_order.clear();
        self.draw_order.extend(0..faces.len());
        self.draw_order
            .sort_by(|&a, &b| faces[a].average_z.total_cmp(&faces[b].average_z));
    }
}
