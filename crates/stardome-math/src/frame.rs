//! Per-frame camera state: the host transform snapshot and the uniforms
//! derived from it.

use std::f32::consts::TAU;

use glam::{Mat4, Vec2, Vec3, Vec4};

/// Snapshot of the host camera for one frame. Read from the host, never
/// owned or mutated here.
///
/// Matrices are 4x4 column-major single precision. `pitch`, `bearing` and
/// `roll` are radians; `center_lng`/`center_lat` are degrees, matching the
/// host's own units for those fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransform {
    /// Forward projection-view matrix.
    pub projection: Mat4,
    /// Inverse projection-view matrix used for ray casting.
    pub inv_projection: Mat4,
    /// World circumference in the host's unit system.
    pub world_size: f32,
    /// Camera center longitude in degrees.
    pub center_lng: f64,
    /// Camera center latitude in degrees.
    pub center_lat: f64,
    /// Camera pitch in radians.
    pub pitch: f32,
    /// Camera bearing in radians.
    pub bearing: f32,
    /// Camera roll in radians.
    pub roll: f32,
    /// Blend progress between flat and globe projection; 0 is fully flat.
    pub projection_transition: f32,
}

/// Uniforms derived from a [`FrameTransform`], recomputed every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    /// Globe origin in the ray-casting frame.
    pub globe_position: Vec3,
    /// Globe radius in the same units as `globe_position`.
    pub globe_radius: f32,
    /// Globe center (longitude, latitude) in radians.
    pub globe_center: Vec2,
    /// (pitch, -bearing, -roll) in radians. The bearing and roll sign
    /// flips compensate the host's rotation handedness; without them the
    /// sky appears mirrored against camera motion.
    pub camera_angles: Vec3,
}

impl FrameUniforms {
    /// Extract the per-frame uniform values from a host snapshot.
    pub fn derive(frame: &FrameTransform) -> Self {
        // Recover the globe origin in the ray-casting frame: push the
        // view-space origin through the forward matrix and back through
        // the inverse one, perspective-dividing after each step. The two
        // matrices are not exact inverses of each other during the
        // projection transition, which is what makes this round trip
        // meaningful.
        let clip = frame.projection * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        let cast = frame.inv_projection * ndc;
        let globe_position = (cast / cast.w).truncate();

        let lat_rad = frame.center_lat.to_radians();
        let globe_radius = frame.world_size / TAU * lat_rad.cos() as f32;

        Self {
            globe_position,
            globe_radius,
            globe_center: Vec2::new(
                frame.center_lng.to_radians() as f32,
                lat_rad as f32,
            ),
            camera_angles: Vec3::new(frame.pitch, -frame.bearing, -frame.roll),
        }
    }
}
