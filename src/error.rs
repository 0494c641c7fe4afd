//! Error kinds of the preview core.
//!
//! None of these are fatal: every variant degrades rendering (aspect
//! substitution or the diagnostic fallback) instead of stopping the loop.
//! Startup failures outside the core are reported as `anyhow::Error`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreviewError {
    /// The viewport aspect ratio was zero, negative or not finite.
    #[error("invalid viewport aspect ratio {aspect}")]
    InvalidAspect { aspect: f32 },

    #[error("texture '{name}' failed to load: {reason}")]
    TextureLoadFailed { name: String, reason: String },

    #[error("mesh '{name}' is not in the mesh registry")]
    MeshNotFound { name: String },

    /// A texture name that is not part of the configured texture list.
    #[error("texture '{name}' is not one of the configured textures")]
    TextureNotListed { name: String },
}
