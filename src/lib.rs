//! softrender: a software 3D rendering pipeline
//!
//! Takes a keyframed, palette-textured triangle mesh through the classic
//! fixed-function stages on the CPU:
//! - Keyframe blending driven by named animation clips
//! - Back-face classification and smoothed vertex normals
//! - Ambient, directional and point lights (Gouraud or flat)
//! - Painter's-order depth sort, perspective and screen mapping
//! - Scanline rasterization into an RGBA8 frame buffer

pub mod error;
pub mod model;
pub mod pipeline;
pub mod rasterizer;
pub mod scene;

pub use error::{RenderError, RenderResult};

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
