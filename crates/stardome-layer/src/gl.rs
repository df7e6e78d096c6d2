//! OpenGL implementation of the backend seam, over `glow`.
//!
//! All raw GL calls live here. State getters go through parameter
//! queries so the guard snapshots whatever the host left active, not a
//! shadow copy.

use std::num::NonZeroU32;

use glam::{Mat4, Vec2, Vec3};
use glow::HasContext;

use crate::backend::{BlendFactor, DepthFunc, RenderBackend, ShaderStage};
use crate::error::LayerError;

pub struct GlowBackend {
    gl: glow::Context,
    vertex_array: Option<glow::VertexArray>,
}

impl GlowBackend {
    /// Wrap a live context. One vertex array object is created up front
    /// and reused for the quad attribute setup on every draw.
    pub fn new(gl: glow::Context) -> Self {
        let vertex_array = unsafe { gl.create_vertex_array().ok() };
        Self { gl, vertex_array }
    }

    pub fn context(&self) -> &glow::Context {
        &self.gl
    }
}

fn depth_func_to_gl(func: DepthFunc) -> u32 {
    match func {
        DepthFunc::Never => glow::NEVER,
        DepthFunc::Less => glow::LESS,
        DepthFunc::Equal => glow::EQUAL,
        DepthFunc::LessEqual => glow::LEQUAL,
        DepthFunc::Greater => glow::GREATER,
        DepthFunc::NotEqual => glow::NOTEQUAL,
        DepthFunc::GreaterEqual => glow::GEQUAL,
        DepthFunc::Always => glow::ALWAYS,
    }
}

fn depth_func_from_gl(raw: u32) -> DepthFunc {
    match raw {
        glow::NEVER => DepthFunc::Never,
        glow::EQUAL => DepthFunc::Equal,
        glow::LEQUAL => DepthFunc::LessEqual,
        glow::GREATER => DepthFunc::Greater,
        glow::NOTEQUAL => DepthFunc::NotEqual,
        glow::GEQUAL => DepthFunc::GreaterEqual,
        glow::ALWAYS => DepthFunc::Always,
        // GL only ever reports one of the eight comparison functions;
        // LESS is the context default.
        _ => DepthFunc::Less,
    }
}

fn blend_factor_to_gl(factor: BlendFactor) -> u32 {
    match factor {
        BlendFactor::Zero => glow::ZERO,
        BlendFactor::One => glow::ONE,
        BlendFactor::SrcColor => glow::SRC_COLOR,
        BlendFactor::OneMinusSrcColor => glow::ONE_MINUS_SRC_COLOR,
        BlendFactor::SrcAlpha => glow::SRC_ALPHA,
        BlendFactor::OneMinusSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
        BlendFactor::DstAlpha => glow::DST_ALPHA,
        BlendFactor::OneMinusDstAlpha => glow::ONE_MINUS_DST_ALPHA,
        BlendFactor::DstColor => glow::DST_COLOR,
        BlendFactor::OneMinusDstColor => glow::ONE_MINUS_DST_COLOR,
    }
}

fn blend_factor_from_gl(raw: u32) -> BlendFactor {
    match raw {
        glow::ZERO => BlendFactor::Zero,
        glow::SRC_COLOR => BlendFactor::SrcColor,
        glow::ONE_MINUS_SRC_COLOR => BlendFactor::OneMinusSrcColor,
        glow::SRC_ALPHA => BlendFactor::SrcAlpha,
        glow::ONE_MINUS_SRC_ALPHA => BlendFactor::OneMinusSrcAlpha,
        glow::DST_ALPHA => BlendFactor::DstAlpha,
        glow::ONE_MINUS_DST_ALPHA => BlendFactor::OneMinusDstAlpha,
        glow::DST_COLOR => BlendFactor::DstColor,
        glow::ONE_MINUS_DST_COLOR => BlendFactor::OneMinusDstColor,
        _ => BlendFactor::One,
    }
}

impl RenderBackend for GlowBackend {
    type Program = glow::Program;
    type Shader = glow::Shader;
    type Buffer = glow::Buffer;
    type UniformLocation = glow::UniformLocation;

    fn compile_shader(
        &mut self,
        stage: ShaderStage,
        source: &str,
    ) -> Result<Self::Shader, LayerError> {
        let kind = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe {
            let shader = self
                .gl
                .create_shader(kind)
                .map_err(|log| LayerError::ShaderCompile { stage, log })?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if !self.gl.get_shader_compile_status(shader) {
                let log = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                return Err(LayerError::ShaderCompile { stage, log });
            }
            Ok(shader)
        }
    }

    fn link_program(
        &mut self,
        vertex: Self::Shader,
        fragment: Self::Shader,
    ) -> Result<Self::Program, LayerError> {
        unsafe {
            let program = self
                .gl
                .create_program()
                .map_err(|log| LayerError::ProgramLink { log })?;
            self.gl.attach_shader(program, vertex);
            self.gl.attach_shader(program, fragment);
            self.gl.link_program(program);
            if !self.gl.get_program_link_status(program) {
                let log = self.gl.get_program_info_log(program);
                self.gl.delete_program(program);
                return Err(LayerError::ProgramLink { log });
            }
            Ok(program)
        }
    }

    fn delete_shader(&mut self, shader: Self::Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn delete_program(&mut self, program: Self::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn create_vertex_buffer(&mut self, data: &[u8]) -> Result<Self::Buffer, LayerError> {
        unsafe {
            let buffer = self
                .gl
                .create_buffer()
                .map_err(LayerError::BufferAllocation)?;
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl
                .buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
            Ok(buffer)
        }
    }

    fn create_index_buffer(&mut self, data: &[u16]) -> Result<Self::Buffer, LayerError> {
        unsafe {
            let buffer = self
                .gl
                .create_buffer()
                .map_err(LayerError::BufferAllocation)?;
            // The element binding is part of vertex array state; go
            // through our own VAO so the host's stays untouched.
            self.gl.bind_vertex_array(self.vertex_array);
            self.gl
                .bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(data),
                glow::STATIC_DRAW,
            );
            self.gl.bind_vertex_array(None);
            Ok(buffer)
        }
    }

    fn delete_buffer(&mut self, buffer: Self::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) }
    }

    fn uniform_location(
        &mut self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn set_uniform_f32(&mut self, location: &Self::UniformLocation, value: f32) {
        unsafe { self.gl.uniform_1_f32(Some(location), value) }
    }

    fn set_uniform_vec2(&mut self, location: &Self::UniformLocation, value: Vec2) {
        unsafe { self.gl.uniform_2_f32(Some(location), value.x, value.y) }
    }

    fn set_uniform_vec3(&mut self, location: &Self::UniformLocation, value: Vec3) {
        unsafe {
            self.gl
                .uniform_3_f32(Some(location), value.x, value.y, value.z)
        }
    }

    fn set_uniform_mat4(&mut self, location: &Self::UniformLocation, value: &Mat4) {
        unsafe {
            self.gl
                .uniform_matrix_4_f32_slice(Some(location), false, &value.to_cols_array())
        }
    }

    fn current_program(&self) -> Option<Self::Program> {
        let raw = unsafe { self.gl.get_parameter_i32(glow::CURRENT_PROGRAM) };
        NonZeroU32::new(raw as u32).map(glow::NativeProgram)
    }

    fn use_program(&mut self, program: Option<Self::Program>) {
        unsafe { self.gl.use_program(program) }
    }

    fn depth_func(&self) -> DepthFunc {
        depth_func_from_gl(unsafe { self.gl.get_parameter_i32(glow::DEPTH_FUNC) } as u32)
    }

    fn set_depth_func(&mut self, func: DepthFunc) {
        unsafe { self.gl.depth_func(depth_func_to_gl(func)) }
    }

    fn depth_write(&self) -> bool {
        unsafe { self.gl.get_parameter_i32(glow::DEPTH_WRITEMASK) != 0 }
    }

    fn set_depth_write(&mut self, enabled: bool) {
        unsafe { self.gl.depth_mask(enabled) }
    }

    fn blend_enabled(&self) -> bool {
        unsafe { self.gl.is_enabled(glow::BLEND) }
    }

    fn set_blend_enabled(&mut self, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(glow::BLEND);
            } else {
                self.gl.disable(glow::BLEND);
            }
        }
    }

    fn blend_func(&self) -> (BlendFactor, BlendFactor) {
        unsafe {
            (
                blend_factor_from_gl(self.gl.get_parameter_i32(glow::BLEND_SRC_RGB) as u32),
                blend_factor_from_gl(self.gl.get_parameter_i32(glow::BLEND_DST_RGB) as u32),
            )
        }
    }

    fn set_blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        unsafe {
            self.gl
                .blend_func(blend_factor_to_gl(src), blend_factor_to_gl(dst))
        }
    }

    fn bind_quad(&mut self, vertices: Self::Buffer, indices: Self::Buffer) {
        unsafe {
            self.gl.bind_vertex_array(self.vertex_array);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertices));
            self.gl
                .bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(indices));
            self.gl.enable_vertex_attrib_array(0);
            self.gl
                .vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, 8, 0);
        }
    }

    fn draw_triangles(&mut self, index_count: i32) {
        unsafe {
            self.gl
                .draw_elements(glow::TRIANGLES, index_count, glow::UNSIGNED_SHORT, 0)
        }
    }
}
