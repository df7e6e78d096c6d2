//! CPU bake of the field into an equirectangular RGBA8 image, for offline
//! inspection and for exercising the full shading path without a device.

use std::f32::consts::{PI, TAU};

use crate::field::StarField;

/// Render `field` into a `width` x `height` equirectangular RGBA8 buffer.
/// Row 0 is the north edge; longitude spans [-PI, PI) left to right.
pub fn render_preview(field: &StarField, width: u32, height: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        let lat = (0.5 - (y as f32 + 0.5) / height as f32) * PI;
        for x in 0..width {
            let lng = ((x as f32 + 0.5) / width as f32 - 0.5) * TAU;
            let color = field.shade(lng, lat);
            pixels.push(to_byte(color.x));
            pixels.push(to_byte(color.y));
            pixels.push(to_byte(color.z));
            pixels.push(255);
        }
    }
    pixels
}

fn to_byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0) as u8
}
