//! Crate error type
//!
//! Everything that can fail does so at load/configuration time. The per-tick
//! pipeline is total and never produces one of these.

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("invalid animation clip: {0}")]
    InvalidClip(String),

    #[error("unknown animation clip: {0}")]
    UnknownClip(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("serialize error: {0}")]
    Serialize(#[from] ron::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl RenderError {
    pub fn invalid_mesh(msg: impl Into<String>) -> Self {
        Self::InvalidMesh(msg.into())
    }

    pub fn invalid_clip(msg: impl Into<String>) -> Self {
        Self::InvalidClip(msg.into())
    }
}
