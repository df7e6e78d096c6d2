//! Axis rotations and the fixed camera/globe rotation chain.
//!
//! The chain order is load-bearing: rotations do not commute, and the star
//! grid is addressed in the frame produced by applying them exactly as
//! [`globe_local_ray`] does.

use glam::{Vec2, Vec3};

/// Rotate `v` around the X axis by `angle` radians.
pub fn rotate_x(v: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(v.x, c * v.y - s * v.z, s * v.y + c * v.z)
}

/// Rotate `v` around the Y axis by `angle` radians.
pub fn rotate_y(v: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(c * v.x + s * v.z, v.y, -s * v.x + c * v.z)
}

/// Rotate `v` around the Z axis by `angle` radians.
pub fn rotate_z(v: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(c * v.x - s * v.y, s * v.x + c * v.y, v.z)
}

/// Rotate a view ray into the globe-local frame.
///
/// `camera_angles` holds (pitch, -bearing, -roll) in radians, already
/// sign-adjusted for the host's rotation handedness; `globe_center` holds
/// (longitude, latitude) in radians. The ray is normalized first, then the
/// camera orientation is undone (X by pitch, Y by bearing, Z by roll) and
/// the result is tilted into the globe frame (X by latitude, Y by
/// longitude).
///
/// With all angles zero the output equals the normalized input ray.
pub fn globe_local_ray(ray: Vec3, camera_angles: Vec3, globe_center: Vec2) -> Vec3 {
    let mut dir = ray.normalize();
    dir = rotate_x(dir, camera_angles.x);
    dir = rotate_y(dir, camera_angles.y);
    dir = rotate_z(dir, camera_angles.z);
    dir = rotate_x(dir, globe_center.y);
    dir = rotate_y(dir, globe_center.x);
    dir
}

/// Spherical coordinates (longitude, latitude) in radians of a unit
/// direction, with `lng = atan2(x, z)` and `lat = asin(y)`.
pub fn ray_to_spherical(dir: Vec3) -> (f32, f32) {
    (dir.x.atan2(dir.z), dir.y.clamp(-1.0, 1.0).asin())
}
