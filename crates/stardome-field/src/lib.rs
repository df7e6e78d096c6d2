//! Procedural star field: deterministic star placement on a fixed spherical
//! grid, a pure per-ray shading function, the GLSL templates that mirror
//! it on the GPU, and a CPU preview baker.

pub mod field;
pub mod hash;
pub mod preview;
pub mod shader;

pub use field::{
    GRID_RESOLUTION, STAR_SIZE_MIN, STAR_SIZE_SPREAD, Star, StarField,
};
pub use hash::cell_hash;
pub use preview::render_preview;
