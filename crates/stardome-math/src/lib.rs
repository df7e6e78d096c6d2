//! Coordinate transforms for globe-anchored sky rendering: screen-ray
//! rotation into globe-local spherical coordinates, and per-frame camera
//! state extraction from a host transform snapshot.

pub mod frame;
pub mod rotate;

pub use frame::{FrameTransform, FrameUniforms};
pub use rotate::{globe_local_ray, ray_to_spherical, rotate_x, rotate_y, rotate_z};
