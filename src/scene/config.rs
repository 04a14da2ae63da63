//! Scene description and its RON loading and saving

use crate::error::{RenderError, RenderResult};
use crate::model::{find_standard_clip, pulse_clip, AnimationClip};
use crate::pipeline::{Attenuation, Light, LightingModel, RenderSettings};
use crate::rasterizer::{Camera, Color, Matrix4, RasterMode, Vector4, HEIGHT, WIDTH};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Camera as written in a scene file. Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub direction: [f32; 3],
    pub near: f32,
    pub far: f32,
    pub fov: f32,
    pub width: usize,
    pub height: usize,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 80.0],
            direction: [0.0, 0.0, 0.0],
            near: -10.0,
            far: -500.0,
            fov: 90.0,
            width: WIDTH,
            height: HEIGHT,
        }
    }
}

/// Everything the host needs to run a scene. Missing fields take the
/// reference scene's values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    /// Summed in order
    pub lights: Vec<Light>,
    pub clip: String,
    /// Searched before the standard clip table
    pub custom_clips: Vec<AnimationClip>,
    pub spin_degrees_per_second: f32,
    pub clear_color: Color,
    pub lighting: LightingModel,
    pub raster_mode: RasterMode,
    pub backface_culling: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            lights: vec![
                Light::ambient(32, 32, 32),
                Light::directional(Color::RED, Vector4::direction(0.0, -1.0, -1.0)),
                Light::point(
                    Color::MAGENTA,
                    Vector4::point(0.0, -80.0, 0.0),
                    Attenuation::new(0.0, 1.0, 0.0),
                ),
            ],
            clip: "pulse".to_string(),
            custom_clips: vec![pulse_clip()],
            // One degree per tick at 60 ticks a second
            spin_degrees_per_second: 60.0,
            clear_color: Color::CORNFLOWER,
            lighting: LightingModel::Gouraud,
            raster_mode: RasterMode::Textured,
            backface_culling: true,
        }
    }
}

impl SceneConfig {
    pub fn build_camera(&self) -> Camera {
        let [px, py, pz] = self.camera.position;
        let [dx, dy, dz] = self.camera.direction;
        Camera::new(
            Vector4::point(px, py, pz),
            Vector4::direction(dx.to_radians(), dy.to_radians(), dz.to_radians()),
            self.camera.near,
            self.camera.far,
            self.camera.fov,
            self.camera.width as f32,
            self.camera.height as f32,
        )
    }

    /// Look up `name` among the custom clips, then the standard table
    pub fn find_clip(&self, name: &str) -> RenderResult<AnimationClip> {
        self.custom_clips
            .iter()
            .find(|c| c.name == name)
            .cloned()
            .or_else(|| find_standard_clip(name))
            .ok_or_else(|| RenderError::UnknownClip(name.to_string()))
    }

    /// The clip named by `clip`
    pub fn resolve_clip(&self) -> RenderResult<AnimationClip> {
        self.find_clip(&self.clip)
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            lighting: self.lighting,
            raster_mode: self.raster_mode,
            backface_culling: self.backface_culling,
            clear_color: self.clear_color,
        }
    }

    /// Model matrix after `seconds` of spinning about Y
    pub fn model_transform(&self, seconds: f32) -> Matrix4 {
        let angle = (self.spin_degrees_per_second * seconds).to_radians();
        Matrix4::rotation(0.0, angle, 0.0)
    }
}

/// Load a scene from a RON file
pub fn load_scene<P: AsRef<Path>>(path: P) -> RenderResult<SceneConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let scene: SceneConfig = ron::from_str(&contents)?;
    info!(path = %path.display(), lights = scene.lights.len(), clip = %scene.clip, "scene loaded");
    Ok(scene)
}

/// Save a scene to a RON file
pub fn save_scene<P: AsRef<Path>>(scene: &SceneConfig, path: P) -> RenderResult<()> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(scene, config)?;
    fs::write(path.as_ref(), contents)?;
    info!(path = %path.as_ref().display(), "scene saved");
    Ok(())
}

/// Load a scene from a RON string (for embedded scenes or testing)
pub fn load_scene_from_str(s: &str) -> RenderResult<SceneConfig> {
    let scene: SceneConfig = ron::from_str(s)?;
    info!(lights = scene.lights.len(), clip = %scene.clip, "scene parsed");
    Ok(scene)
}
