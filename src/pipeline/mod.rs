//! Per-tick geometry pipeline
//!
//! - `state`: the working vertex buffers and face list owned by one pass
//! - `visibility`: face normals, back-face flags, smoothed vertex normals
//! - `lighting`: light sources and the flat / Gouraud models
//! - `sort`: painter's order
//! - `renderer`: runs every stage in order and rasterizes the result

mod lighting;
mod renderer;
mod sort;
mod state;
mod visibility;

pub use lighting::*;
pub use renderer::*;
pub use state::*;
