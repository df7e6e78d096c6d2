//! The star field itself: which cells hold a star, where the star sits
//! inside its cell, and how bright a given ray direction is.
//!
//! Everything here is pure and device-free so the same math that runs in
//! the fragment shader can be exercised directly with synthetic rays.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{IVec2, Vec2, Vec3};

use crate::hash::{OFFSET_X_KEY, OFFSET_Y_KEY, PRESENCE_KEY, SIZE_KEY, cell_hash};

/// Cells per unit of normalized spherical UV space, in both axes.
pub const GRID_RESOLUTION: f32 = 200.0;

/// Smallest star radius, in cell units.
pub const STAR_SIZE_MIN: f32 = 0.015;
/// Spread added on top of [`STAR_SIZE_MIN`] by the size hash. The other
/// observed tuning is min 0.01 with spread 0.05; both read fine, this one
/// keeps the sky a little more even.
pub const STAR_SIZE_SPREAD: f32 = 0.025;

/// A star resolved for one grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    /// Position inside the cell, each component in [0, 1).
    pub offset: Vec2,
    /// Radius in cell units.
    pub size: f32,
    /// Peak brightness factor in [0.5, 1.0).
    pub brightness: f32,
}

/// Deterministic star field over the fixed spherical grid.
///
/// `density` is the probability that a cell holds a star; `intensity`
/// scales the final color. Both are fixed at construction; the field has
/// no other state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarField {
    density: f32,
    intensity: f32,
}

impl StarField {
    pub fn new(density: f32, intensity: f32) -> Self {
        Self { density, intensity }
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Resolve the star in `cell`, if the presence hash clears the
    /// density threshold. A pure function of the cell coordinates.
    pub fn star_in(&self, cell: IVec2) -> Option<Star> {
        let presence = cell_hash(cell, PRESENCE_KEY);
        if presence <= 1.0 - self.density {
            return None;
        }
        let size_hash = cell_hash(cell, SIZE_KEY);
        Some(Star {
            offset: Vec2::new(
                cell_hash(cell, OFFSET_X_KEY),
                cell_hash(cell, OFFSET_Y_KEY),
            ),
            size: STAR_SIZE_MIN + STAR_SIZE_SPREAD * size_hash,
            brightness: 0.5 + 0.5 * size_hash,
        })
    }

    /// Shade a globe-local ray direction given as (longitude, latitude)
    /// in radians. Returns white scaled by the star strength; zero where
    /// no star covers the ray. Never negative, never NaN for finite
    /// input.
    pub fn shade(&self, lng: f32, lat: f32) -> Vec3 {
        let u = lng / PI * 0.5 + 0.5;
        let v = lat / FRAC_PI_2 * 0.5 + 0.5;
        let scaled = Vec2::new(u, v) * GRID_RESOLUTION;
        let cell_pos = scaled.floor();

        let Some(star) = self.star_in(cell_pos.as_ivec2()) else {
            return Vec3::ZERO;
        };

        let local = scaled - cell_pos;
        let mut delta = (local - star.offset) / GRID_RESOLUTION;
        // Longitude lines converge toward the poles; widen stars there so
        // they stay round. The vertical axis compensates the 2:1
        // compression of latitude into UV.
        delta.x /= lat.cos().max(0.3);
        delta.y *= 2.0;

        let dist = delta.length() * GRID_RESOLUTION;
        let falloff = 1.0 - smoothstep(0.0, star.size, dist);
        let strength = falloff.powi(4) * star.brightness;
        Vec3::splat(strength * self.intensity)
    }
}

/// Hermite step matching the GLSL builtin: 0 at or below `edge0`, 1 at or
/// above `edge1`.
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
