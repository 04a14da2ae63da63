//! One complete render pass per tick
//!
//! Stage order: animate, model transform, back-face test, vertex normals,
//! lighting, camera transform, depth sort, perspective, dehomogenise,
//! screen transform, rasterize. The frame buffer is only valid once `tick`
//! returns.

use super::lighting::{Light, LightingModel};
use super::state::{PipelineState, TransformMode};
use crate::error::RenderResult;
use crate::model::{AnimationClip, Animator, Mesh};
use crate::rasterizer::{Camera, Color, Framebuffer, Matrix4, RasterMode, Rasterizer};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Per-scene switches for a render pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub lighting: LightingModel,
    pub raster_mode: RasterMode,
    pub backface_culling: bool,
    pub clear_color: Color,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            lighting: LightingModel::Gouraud,
            raster_mode: RasterMode::Textured,
            backface_culling: true,
            clear_color: Color::CORNFLOWER,
        }
    }
}

pub struct Renderer {
    mesh: Mesh,
    camera: Camera,
    camera_transform: Matrix4,
    perspective: Matrix4,
    screen: Matrix4,
    state: PipelineState,
    animator: Animator,
    rasterizer: Rasterizer,
    framebuffer: Framebuffer,
    pub settings: RenderSettings,
    frame_count: u64,
}

impl Renderer {
    /// Build a renderer for one mesh seen through `camera`. The camera's
    /// matrices are derived here once. Fails if `clip` does not fit the mesh.
    pub fn new(mesh: Mesh, camera: Camera, clip: AnimationClip, settings: RenderSettings) -> RenderResult<Self> {
        clip.validate(mesh.num_frames())?;

        let width = camera.viewport_width.max(1.0) as usize;
        let height = camera.viewport_height.max(1.0) as usize;

        Ok(Self {
            camera_transform: camera.build_camera_transform(),
            perspective: camera.build_perspective(),
            screen: camera.build_screen(),
            state: PipelineState::new(&mesh),
            animator: Animator::new(clip),
            rasterizer: Rasterizer::new(height, settings.raster_mode),
            framebuffer: Framebuffer::with_color(width, height, settings.clear_color),
            mesh,
            camera,
            settings,
            frame_count: 0,
        })
    }

    /// Switch to another clip of the same mesh
    pub fn select_clip(&mut self, clip: AnimationClip) -> RenderResult<()> {
        clip.validate(self.mesh.num_frames())?;
        self.animator.set_clip(clip);
        Ok(())
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    /// Completed passes so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Run one full pass: advance the animation by `dt` seconds, place the
    /// mesh with `model`, light it with `lights` and rasterize the result.
    pub fn tick(&mut self, lights: &[Light], model: &Matrix4, dt: f32) -> &Framebuffer {
        self.animator.animate(&self.mesh, dt, &mut self.state.local);

        self.state.transform(model, TransformMode::LocalToTransformed);
        self.state.calculate_backfacing(self.camera.position);
        self.state.calculate_vertex_normals();
        self.settings.lighting.apply(&mut self.state, lights);

        self.state.transform(&self.camera_transform, TransformMode::Transformed);
        self.state.sort_by_depth();
        self.state.transform(&self.perspective, TransformMode::Transformed);
        self.state.dehomogenise();
        self.state.transform(&self.screen, TransformMode::Transformed);

        self.framebuffer.clear(self.settings.clear_color);
        self.rasterizer.mode = self.settings.raster_mode;
        let drawn = self.rasterizer.draw_mesh(
            &mut self.framebuffer,
            &self.state.faces,
            &self.state.draw_order,
            &self.state.transformed,
            self.mesh.texcoords(),
            self.mesh.texture(),
            self.settings.backface_culling,
            self.settings.lighting == LightingModel::Flat,
        );

        self.frame_count += 1;
        debug!(
            frame = self.frame_count,
            keyframe = self.animator.current_frame(),
            visible = self.state.visible_faces(),
            drawn,
            "frame rendered"
        );
        trace!(interpolation = self.animator.interpolation(), "tick done");

        &self.framebuffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{pulse_clip, pulsing_cube, MeshData};
    use crate::rasterizer::{Polygon, TexCoord, Vector4, Vertex};

    const W: usize = 320;
    const H: usize = 240;

    fn reference_camera() -> Camera {
        Camera::new(
            Vector4::point(0.0, 0.0, 80.0),
            Vector4::ZERO,
            -10.0,
            -500.0,
            90.0,
            W as f32,
            H as f32,
        )
    }

    /// One stationary triangle in the z = 0 plane with a white skin
    fn triangle_mesh() -> Mesh {
        Mesh::new(MeshData {
            num_verts: 3,
            num_polys: 1,
            num_uvs: 1,
            texture_width: 1,
            faces: vec![Polygon::new([0, 1, 2], [0; 3])],
            texcoords: vec![TexCoord::new(0.0, 0.0)],
            palette: vec![Color::WHITE],
            texture_indices: vec![0],
            keyframes: vec![vec![
                Vertex::new(-20.0, -20.0, 0.0),
                Vertex::new(20.0, -20.0, 0.0),
                Vertex::new(0.0, 20.0, 0.0),
            ]],
        })
        .unwrap()
    }

    fn triangle_renderer() -> Renderer {
        Renderer::new(
            triangle_mesh(),
            reference_camera(),
            AnimationClip::new("still", 0, 1, 1.0),
            RenderSettings::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_triangle_is_lit_by_ambient() {
        let mut r = triangle_renderer();
        let fb = r.tick(&[Light::ambient(32, 32, 32)], &Matrix4::identity(), 0.016);

        assert_eq!(fb.get_pixel(W / 2, H / 2), Some(Color::new(31, 31, 31)));
        assert_eq!(fb.get_pixel(5, 5), Some(Color::CORNFLOWER));
        assert_eq!(r.state().visible_faces(), 1);
        assert_eq!(r.frame_count(), 1);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let lights = [Light::ambient(32, 32, 32)];
        let mut a = triangle_renderer();
        let mut b = triangle_renderer();
        let first = a.tick(&lights, &Matrix4::identity(), 0.016).as_bytes().to_vec();
        let second = b.tick(&lights, &Matrix4::identity(), 0.016).as_bytes().to_vec();
        assert_eq!(first, second);

        let again = a.tick(&lights, &Matrix4::identity(), 0.0).as_bytes().to_vec();
        assert_eq!(first, again);
    }

    #[test]
    fn test_turned_away_triangle_is_culled() {
        let mut r = triangle_renderer();
        let flip = Matrix4::rotation(0.0, std::f32::consts::PI, 0.0);
        let fb = r.tick(&[Light::ambient(32, 32, 32)], &flip, 0.016);
        assert_eq!(fb.get_pixel(W / 2, H / 2), Some(Color::CORNFLOWER));
        assert_eq!(r.state().visible_faces(), 0);
    }

    #[test]
    fn test_culling_off_draws_back_faces() {
        let mut r = triangle_renderer();
        r.settings.backface_culling = false;
        let flip = Matrix4::rotation(0.0, std::f32::consts::PI, 0.0);
        let fb = r.tick(&[Light::ambient(32, 32, 32)], &flip, 0.016);
        // Unlit, so the blended white vertex color shows through
        assert_eq!(fb.get_pixel(W / 2, H / 2), Some(Color::WHITE));
    }

    #[test]
    fn test_flat_lighting_fills_one_color() {
        let mut r = triangle_renderer();
        r.settings.lighting = LightingModel::Flat;
        let fb = r.tick(&[Light::ambient(64, 0, 0)], &Matrix4::identity(), 0.016);
        assert_eq!(fb.get_pixel(W / 2, H / 2), Some(Color::new(64, 0, 0)));
    }

    #[test]
    fn test_rejects_clip_past_last_frame() {
        let result = Renderer::new(
            triangle_mesh(),
            reference_camera(),
            AnimationClip::new("long", 0, 4, 10.0),
            RenderSettings::default(),
        );
        assert!(result.is_err());

        let mut r = triangle_renderer();
        assert!(r.select_clip(AnimationClip::new("long", 0, 4, 10.0)).is_err());
    }

    #[test]
    fn test_cube_spins_through_clip() {
        let mut r = Renderer::new(
            pulsing_cube(20.0).unwrap(),
            reference_camera(),
            pulse_clip(),
            RenderSettings::default(),
        )
        .unwrap();
        let lights = [
            Light::ambient(32, 32, 32),
            Light::directional(Color::RED, Vector4::direction(0.0, -1.0, -1.0)),
        ];

        for step in 0..64 {
            let angle = (step as f32).to_radians();
            r.tick(&lights, &Matrix4::rotation(0.0, angle, 0.0), 1.0 / 30.0);
            let visible = r.state().visible_faces();
            assert!(visible > 0 && visible < 12, "step {step}: {visible} faces visible");
        }

        let fb = r.framebuffer();
        assert_ne!(fb.get_pixel(W / 2, H / 2), Some(Color::CORNFLOWER));
        assert_eq!(fb.get_pixel(2, 2), Some(Color::CORNFLOWER));
        assert!(r.animator().current_frame() < crate::model::PULSE_FRAMES);
    }
}
