//! Software rasterizer core
//!
//! Features:
//! - Homogeneous 4D vector and row-major 4x4 matrix math
//! - Fixed camera with view, perspective and screen matrices
//! - RGBA8 frame buffer with PNG export
//! - Scanline triangle fill with Gouraud color interpolation and affine
//!   palette-texture mapping (no depth buffer, painter's order)

mod camera;
mod framebuffer;
mod math;
mod render;
mod types;

pub use camera::*;
pub use framebuffer::*;
pub use math::*;
pub use render::*;
pub use types::*;

/// Default frame dimensions
pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 240;
