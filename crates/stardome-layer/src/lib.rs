//! Star background layer for a globe map renderer.
//!
//! The layer draws a procedural starry sky behind the globe while the
//! host camera is transitioning into or fully in globe projection. It
//! plugs into the host's custom-layer mechanism: the host calls
//! [`StarLayer::attach`] once with a graphics context, then
//! [`StarLayer::render`] every frame with the current transform snapshot,
//! and finally [`StarLayer::detach`]. All mutable render state touched
//! during the draw is restored before `render` returns, so the host's
//! renderer never observes a change.
//!
//! The graphics device sits behind the [`RenderBackend`] trait;
//! [`GlowBackend`] is the OpenGL implementation.

pub mod backend;
pub mod error;
pub mod gl;
pub mod guard;
pub mod layer;
pub mod options;
pub mod quad;

#[cfg(test)]
pub(crate) mod mock;

pub use backend::{BlendFactor, DepthFunc, RenderBackend, ShaderStage};
pub use error::{LayerError, OptionsError};
pub use gl::GlowBackend;
pub use layer::StarLayer;
pub use options::StarOptions;
