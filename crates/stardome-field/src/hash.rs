//! Grid cell hashing: deterministic pseudo-random scalars in [0, 1)
//! derived from integer cell coordinates via the classic sine scatter
//! `fract(sin(dot(cell, key)) * 43758.5453)`.
//!
//! The sine and product run in f64 and only the final value is narrowed
//! to f32: the scatter constant amplifies libm differences in the last
//! bits of a f32 sine past the fract, so f32 evaluation would not be
//! reproducible across platforms. The GPU mirror evaluates the same
//! formula in `highp float`.

use glam::{DVec2, IVec2};

/// Scatter constant of the sine hash.
pub const HASH_SCALE: f64 = 43758.5453;

/// Key for the star presence hash.
pub const PRESENCE_KEY: DVec2 = DVec2::new(12.9898, 78.233);
/// Key for the horizontal in-cell star offset.
pub const OFFSET_X_KEY: DVec2 = DVec2::new(127.1, 311.7);
/// Key for the vertical in-cell star offset.
pub const OFFSET_Y_KEY: DVec2 = DVec2::new(269.5, 183.3);
/// Key for the star size hash, reused as the brightness hash.
pub const SIZE_KEY: DVec2 = DVec2::new(419.2, 371.9);

/// Hash a grid cell with one of the fixed keys.
///
/// Pure function of the cell coordinates and the key: repeated evaluation
/// is bit-identical, and the pattern never varies frame to frame.
pub fn cell_hash(cell: IVec2, key: DVec2) -> f32 {
    let dot = f64::from(cell.x) * key.x + f64::from(cell.y) * key.y;
    let scattered = dot.sin() * HASH_SCALE;
    (scattered - scattered.floor()) as f32
}
