//! Error types for the star layer.

use thiserror::Error;

use crate::backend::ShaderStage;

/// Failures while building GPU resources. All of them are non-fatal: the
/// layer logs the diagnostic, keeps no resources, and renders as a no-op
/// from then on. Nothing propagates into the host's render loop.
#[derive(Debug, Error)]
pub enum LayerError {
    /// The graphics backend rejected a shader source.
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    /// The graphics backend rejected the linked program.
    #[error("sky program failed to link: {log}")]
    ProgramLink { log: String },

    /// The graphics backend could not allocate a buffer.
    #[error("buffer allocation failed: {0}")]
    BufferAllocation(String),
}

/// Rejected configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum OptionsError {
    #[error("intensity must be a positive finite value, got {0}")]
    InvalidIntensity(f32),

    #[error("density must lie in [0, 1], got {0}")]
    InvalidDensity(f32),
}
