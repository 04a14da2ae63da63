//! Mesh data model and keyframe animation
//!
//! - `mesh`: validated, immutable decoded mesh plus its palette texture
//! - `animation`: clips, the standard clip table, and the frame blender
//! - `demo`: a procedural keyframed mesh

mod animation;
mod demo;
mod mesh;

pub use animation::*;
pub use demo::*;
pub use mesh::*;
