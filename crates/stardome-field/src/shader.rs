//! GLSL 300 es sources for the sky pass.
//!
//! The fragment stage is the GPU mirror of [`crate::field::StarField`]:
//! same hashes, same grid, same falloff. Density is baked into the source
//! as a literal when the program is built, so changing it means
//! recompiling the program; intensity stays a uniform and can move every
//! frame.

/// Uniform names shared between the templates and the layer that feeds
/// them.
pub mod uniforms {
    pub const INV_MATRIX: &str = "u_inv_matrix";
    pub const GLOBE_POSITION: &str = "u_globe_position";
    pub const GLOBE_RADIUS: &str = "u_globe_radius";
    pub const GLOBE_CENTER: &str = "u_globe_center";
    pub const CAMERA_ANGLES: &str = "u_camera_angles";
    pub const INTENSITY: &str = "u_intensity";
}

/// Full-screen quad pass-through. The fragment stage reconstructs the
/// view ray from the interpolated NDC coordinate.
pub const VERTEX_SHADER_SOURCE: &str = r#"#version 300 es

layout(location = 0) in vec2 a_pos;

out vec2 v_ndc;

void main() {
    v_ndc = a_pos;
    gl_Position = vec4(a_pos, 1.0, 1.0);
}
"#;

const DENSITY_MARKER: &str = "__DENSITY__";

const FRAGMENT_SHADER_TEMPLATE: &str = r#"#version 300 es
precision highp float;

uniform mat4 u_inv_matrix;
uniform vec3 u_globe_position;
uniform float u_globe_radius;
uniform vec2 u_globe_center;
uniform vec3 u_camera_angles;
uniform float u_intensity;

in vec2 v_ndc;

out vec4 frag_color;

const float PI = 3.14159265358979;
const float GRID_RESOLUTION = 200.0;
const float STAR_SIZE_MIN = 0.015;
const float STAR_SIZE_SPREAD = 0.025;
const float DENSITY = __DENSITY__;

float cell_hash(vec2 cell, vec2 key) {
    return fract(sin(dot(cell, key)) * 43758.5453);
}

vec3 rotate_x(vec3 v, float a) {
    float s = sin(a);
    float c = cos(a);
    return vec3(v.x, c * v.y - s * v.z, s * v.y + c * v.z);
}

vec3 rotate_y(vec3 v, float a) {
    float s = sin(a);
    float c = cos(a);
    return vec3(c * v.x + s * v.z, v.y, -s * v.x + c * v.z);
}

vec3 rotate_z(vec3 v, float a) {
    float s = sin(a);
    float c = cos(a);
    return vec3(c * v.x - s * v.y, s * v.x + c * v.y, v.z);
}

float star_strength(float lng, float lat) {
    float u = lng / PI * 0.5 + 0.5;
    float v = lat / (PI * 0.5) * 0.5 + 0.5;
    vec2 scaled = vec2(u, v) * GRID_RESOLUTION;
    vec2 cell = floor(scaled);

    float presence = cell_hash(cell, vec2(12.9898, 78.233));
    if (presence <= 1.0 - DENSITY) {
        return 0.0;
    }

    vec2 offset = vec2(
        cell_hash(cell, vec2(127.1, 311.7)),
        cell_hash(cell, vec2(269.5, 183.3)));
    float size_hash = cell_hash(cell, vec2(419.2, 371.9));

    vec2 delta = (fract(scaled) - offset) / GRID_RESOLUTION;
    delta.x /= max(0.3, cos(lat));
    delta.y *= 2.0;

    float dist = length(delta) * GRID_RESOLUTION;
    float star_size = STAR_SIZE_MIN + STAR_SIZE_SPREAD * size_hash;
    float falloff = 1.0 - smoothstep(0.0, star_size, dist);
    falloff = falloff * falloff * falloff * falloff;
    return falloff * (0.5 + 0.5 * size_hash);
}

void main() {
    vec4 far_point = u_inv_matrix * vec4(v_ndc, 1.0, 1.0);
    vec3 point = far_point.xyz / far_point.w;

    // Hide stars behind the planet disc. The globe itself draws later,
    // but partially transparent frames during the projection transition
    // would otherwise show stars through it.
    vec3 view_dir = normalize(point);
    float along = dot(view_dir, u_globe_position);
    vec3 closest = view_dir * along - u_globe_position;
    if (along > 0.0 && dot(closest, closest) < u_globe_radius * u_globe_radius) {
        frag_color = vec4(0.0);
        return;
    }

    vec3 ray = normalize(point - u_globe_position);
    ray = rotate_x(ray, u_camera_angles.x);
    ray = rotate_y(ray, u_camera_angles.y);
    ray = rotate_z(ray, u_camera_angles.z);
    ray = rotate_x(ray, u_globe_center.y);
    ray = rotate_y(ray, u_globe_center.x);

    float lng = atan(ray.x, ray.z);
    float lat = asin(clamp(ray.y, -1.0, 1.0));

    float strength = star_strength(lng, lat) * u_intensity;
    frag_color = vec4(vec3(strength), clamp(strength, 0.0, 1.0));
}
"#;

/// Build the fragment source with `density` baked in as a literal.
pub fn fragment_shader_source(density: f32) -> String {
    FRAGMENT_SHADER_TEMPLATE.replace(DENSITY_MARKER, &format!("{density:.6}"))
}
