//! Scene configuration
//!
//! Uses RON (Rusty Object Notation) for human-readable scene files.

mod config;

pub use config::*;
