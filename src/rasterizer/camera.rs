//! Fixed camera and the matrices derived from it

use super::math::{Matrix4, Vector4};

/// Camera state. The derived matrices are built once and reused every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vector4,
    /// Rotation angles in radians
    pub direction: Vector4,
    /// Stored but not used by any matrix
    pub near_z: f32,
    pub far_z: f32,
    /// Radians
    pub field_of_view: f32,
    pub view_distance: f32,
    pub aspect_ratio: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Camera {
    /// `fov_degrees` is the full field of view; direction angles are radians.
    pub fn new(
        position: Vector4,
        direction: Vector4,
        near_z: f32,
        far_z: f32,
        fov_degrees: f32,
        width: f32,
        height: f32,
    ) -> Self {
        let field_of_view = fov_degrees.to_radians();
        let view_plane_width = 2.0;
        Self {
            position,
            direction,
            near_z,
            far_z,
            field_of_view,
            view_distance: ((field_of_view / 2.0) * (view_plane_width * 0.5)).tan(),
            aspect_ratio: width / height,
            viewport_width: width,
            viewport_height: height,
        }
    }

    /// Moves the world so the camera sits at the origin looking down -Z.
    pub fn build_camera_transform(&self) -> Matrix4 {
        let translate = Matrix4::translation(-self.position.x, -self.position.y, -self.position.z);
        let rotate = Matrix4::rotation(-self.direction.x, -self.direction.y, -self.direction.z);
        translate * rotate
    }

    /// Projection whose w row is (0, 0, -1, 0), so the later divide is by -z.
    pub fn build_perspective(&self) -> Matrix4 {
        let d = self.view_distance;
        Matrix4::new([
            [d, 0.0, 0.0, 0.0],
            [0.0, d * self.aspect_ratio, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }

    /// Maps post-divide coordinates to pixels, flipping Y so it grows downward.
    pub fn build_screen(&self) -> Matrix4 {
        let sw = self.viewport_width * 0.5 - 0.5;
        let sh = self.viewport_height * 0.5 - 0.5;
        Matrix4::new([
            [sw, 0.0, 0.0, sw],
            [0.0, -sh, 0.0, sh],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }
}
