//! The device seam: a narrow trait covering exactly what the star pass
//! needs from a graphics context. Shader and buffer lifecycle, uniform
//! upload, one indexed draw, and get/set access to the five pieces of
//! mutable render state the pass touches.
//!
//! Keeping the seam this small lets the layer run against a recording
//! test double as easily as against a live GL context.

use std::fmt;

use glam::{Mat4, Vec2, Vec3};

use crate::error::LayerError;

/// Shader pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Depth comparison function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthFunc {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

/// Blend equation factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    DstColor,
    OneMinusDstColor,
}

/// Graphics context capability the layer renders through.
///
/// State setters take effect immediately; uniform setters require the
/// owning program to be current. Handle types are plain copyable keys,
/// mirroring how GL object names behave.
pub trait RenderBackend {
    type Program: Copy + PartialEq + fmt::Debug;
    type Shader: Copy + fmt::Debug;
    type Buffer: Copy + fmt::Debug;
    type UniformLocation: Clone + fmt::Debug;

    // Shader and program lifecycle.
    fn compile_shader(
        &mut self,
        stage: ShaderStage,
        source: &str,
    ) -> Result<Self::Shader, LayerError>;
    fn link_program(
        &mut self,
        vertex: Self::Shader,
        fragment: Self::Shader,
    ) -> Result<Self::Program, LayerError>;
    fn delete_shader(&mut self, shader: Self::Shader);
    fn delete_program(&mut self, program: Self::Program);

    // Buffer lifecycle.
    fn create_vertex_buffer(&mut self, data: &[u8]) -> Result<Self::Buffer, LayerError>;
    fn create_index_buffer(&mut self, data: &[u16]) -> Result<Self::Buffer, LayerError>;
    fn delete_buffer(&mut self, buffer: Self::Buffer);

    // Uniforms.
    fn uniform_location(
        &mut self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation>;
    fn set_uniform_f32(&mut self, location: &Self::UniformLocation, value: f32);
    fn set_uniform_vec2(&mut self, location: &Self::UniformLocation, value: Vec2);
    fn set_uniform_vec3(&mut self, location: &Self::UniformLocation, value: Vec3);
    fn set_uniform_mat4(&mut self, location: &Self::UniformLocation, value: &Mat4);

    // The five pieces of shared mutable state the pass touches, as
    // get/set pairs so a scope can snapshot and restore them.
    fn current_program(&self) -> Option<Self::Program>;
    fn use_program(&mut self, program: Option<Self::Program>);
    fn depth_func(&self) -> DepthFunc;
    fn set_depth_func(&mut self, func: DepthFunc);
    fn depth_write(&self) -> bool;
    fn set_depth_write(&mut self, enabled: bool);
    fn blend_enabled(&self) -> bool;
    fn set_blend_enabled(&mut self, enabled: bool);
    fn blend_func(&self) -> (BlendFactor, BlendFactor);
    fn set_blend_func(&mut self, src: BlendFactor, dst: BlendFactor);

    // Geometry binding and the draw itself.
    fn bind_quad(&mut self, vertices: Self::Buffer, indices: Self::Buffer);
    fn draw_triangles(&mut self, index_count: i32);
}
