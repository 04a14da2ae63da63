//! softrender viewer
//!
//! Drives one pipeline pass per frame and shows the finished frame buffer,
//! scaled up with nearest filtering. Usage: `softrender [scene.ron]`
//!
//! Keys: L lighting model, T textured/solid, C back-face culling,
//! S save a PNG of the current frame.

use macroquad::prelude::*;
use softrender::model::pulsing_cube;
use softrender::pipeline::{LightingModel, Renderer};
use softrender::rasterizer::RasterMode;
use softrender::scene::{load_scene, SceneConfig};
use softrender::{RenderResult, VERSION};
use tracing::{error, info};

fn window_conf() -> Conf {
    Conf {
        window_title: format!("softrender v{}", VERSION),
        window_width: softrender::rasterizer::WIDTH as i32 * 3,
        window_height: softrender::rasterizer::HEIGHT as i32 * 3,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn load_config() -> RenderResult<SceneConfig> {
    match std::env::args().nth(1) {
        Some(path) => load_scene(path),
        None => Ok(SceneConfig::default()),
    }
}

fn build_renderer(scene: &SceneConfig) -> RenderResult<Renderer> {
    let mesh = pulsing_cube(20.0)?;
    Renderer::new(mesh, scene.build_camera(), scene.resolve_clip()?, scene.render_settings())
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt::init();

    let scene = match load_config() {
        Ok(scene) => scene,
        Err(e) => {
            error!("failed to load scene: {}", e);
            return;
        }
    };
    let mut renderer = match build_renderer(&scene) {
        Ok(r) => r,
        Err(e) => {
            error!("failed to build renderer: {}", e);
            return;
        }
    };

    let mut elapsed = 0.0f32;
    let mut saved = 0u32;

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if is_key_pressed(KeyCode::L) {
            renderer.settings.lighting = match renderer.settings.lighting {
                LightingModel::Gouraud => LightingModel::Flat,
                LightingModel::Flat => LightingModel::Gouraud,
            };
            info!(lighting = ?renderer.settings.lighting, "lighting model");
        }
        if is_key_pressed(KeyCode::T) {
            renderer.settings.raster_mode = match renderer.settings.raster_mode {
                RasterMode::Textured => RasterMode::Solid,
                RasterMode::Solid => RasterMode::Textured,
            };
            info!(mode = ?renderer.settings.raster_mode, "raster mode");
        }
        if is_key_pressed(KeyCode::C) {
            renderer.settings.backface_culling = !renderer.settings.backface_culling;
            info!(enabled = renderer.settings.backface_culling, "back-face culling");
        }

        let dt = get_frame_time();
        elapsed += dt;
        let model = scene.model_transform(elapsed);
        let fb = renderer.tick(&scene.lights, &model, dt);

        if is_key_pressed(KeyCode::S) {
            saved += 1;
            let path = format!("softrender_{:03}.png", saved);
            match fb.save_png(&path) {
                Ok(()) => info!(path = %path, "frame saved"),
                Err(e) => error!("failed to save {}: {}", path, e),
            }
        }

        clear_background(BLACK);

        let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, fb.as_bytes());
        texture.set_filter(FilterMode::Nearest);

        // Fit the window, keeping the aspect ratio
        let scale = (screen_width() / fb.width as f32).min(screen_height() / fb.height as f32);
        let draw_w = fb.width as f32 * scale;
        let draw_h = fb.height as f32 * scale;
        draw_texture_ex(
            &texture,
            (screen_width() - draw_w) * 0.5,
            (screen_height() - draw_h) * 0.5,
            WHITE,
            DrawTextureParams {
                dest_size: Some(Vec2::new(draw_w, draw_h)),
                ..Default::default()
            },
        );

        next_frame().await;
    }
}
