//! Recording backend used by the unit tests: plain integers for handles,
//! a full event log for ordering assertions, and switches that force the
//! failure paths.

use std::collections::HashMap;

use glam::{Mat4, Vec2, Vec3};

use crate::backend::{BlendFactor, DepthFunc, RenderBackend, ShaderStage};
use crate::error::LayerError;
use crate::guard::DrawState;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    UseProgram(Option<u32>),
    SetDepthFunc(DepthFunc),
    SetDepthWrite(bool),
    SetBlendEnabled(bool),
    SetBlendFunc(BlendFactor, BlendFactor),
    Uniform(u32),
    BindQuad(u32, u32),
    Draw(i32),
}

pub struct MockBackend {
    next_id: u32,
    next_location: u32,
    locations: HashMap<String, u32>,

    pub state: DrawState<u32>,
    pub events: Vec<Event>,
    pub draw_calls: usize,
    pub states_at_draw: Vec<DrawState<u32>>,

    pub live_shaders: Vec<u32>,
    pub live_programs: Vec<u32>,
    pub live_buffers: Vec<u32>,
    pub buffer_sizes: HashMap<u32, usize>,
    pub compiled_sources: Vec<(ShaderStage, String)>,

    pub fail_compile: Option<ShaderStage>,
    pub fail_link: bool,
    pub fail_index_buffer: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            next_location: 0,
            locations: HashMap::new(),
            state: DrawState {
                program: None,
                depth_func: DepthFunc::Less,
                depth_write: true,
                blend_enabled: false,
                blend_func: (BlendFactor::One, BlendFactor::Zero),
            },
            events: Vec::new(),
            draw_calls: 0,
            states_at_draw: Vec::new(),
            live_shaders: Vec::new(),
            live_programs: Vec::new(),
            live_buffers: Vec::new(),
            buffer_sizes: HashMap::new(),
            compiled_sources: Vec::new(),
            fail_compile: None,
            fail_link: false,
            fail_index_buffer: false,
        }
    }

    fn fresh_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl RenderBackend for MockBackend {
    type Program = u32;
    type Shader = u32;
    type Buffer = u32;
    type UniformLocation = u32;

    fn compile_shader(
        &mut self,
        stage: ShaderStage,
        source: &str,
    ) -> Result<u32, LayerError> {
        if self.fail_compile == Some(stage) {
            return Err(LayerError::ShaderCompile {
                stage,
                log: "forced compile failure".into(),
            });
        }
        let id = self.fresh_id();
        self.live_shaders.push(id);
        self.compiled_sources.push((stage, source.to_string()));
        Ok(id)
    }

    fn link_program(&mut self, _vertex: u32, _fragment: u32) -> Result<u32, LayerError> {
        if self.fail_link {
            return Err(LayerError::ProgramLink {
                log: "forced link failure".into(),
            });
        }
        let id = self.fresh_id();
        self.live_programs.push(id);
        Ok(id)
    }

    fn delete_shader(&mut self, shader: u32) {
        self.live_shaders.retain(|&s| s != shader);
    }

    fn delete_program(&mut self, program: u32) {
        self.live_programs.retain(|&p| p != program);
    }

    fn create_vertex_buffer(&mut self, data: &[u8]) -> Result<u32, LayerError> {
        let id = self.fresh_id();
        self.live_buffers.push(id);
        self.buffer_sizes.insert(id, data.len());
        Ok(id)
    }

    fn create_index_buffer(&mut self, data: &[u16]) -> Result<u32, LayerError> {
        if self.fail_index_buffer {
            return Err(LayerError::BufferAllocation(
                "forced index buffer failure".into(),
            ));
        }
        let id = self.fresh_id();
        self.live_buffers.push(id);
        self.buffer_sizes.insert(id, data.len() * 2);
        Ok(id)
    }

    fn delete_buffer(&mut self, buffer: u32) {
        self.live_buffers.retain(|&b| b != buffer);
        self.buffer_sizes.remove(&buffer);
    }

    fn uniform_location(&mut self, _program: u32, name: &str) -> Option<u32> {
        if let Some(&location) = self.locations.get(name) {
            return Some(location);
        }
        let location = self.next_location;
        self.next_location += 1;
        self.locations.insert(name.to_string(), location);
        Some(location)
    }

    fn set_uniform_f32(&mut self, location: &u32, _value: f32) {
        self.events.push(Event::Uniform(*location));
    }

    fn set_uniform_vec2(&mut self, location: &u32, _value: Vec2) {
        self.events.push(Event::Uniform(*location));
    }

    fn set_uniform_vec3(&mut self, location: &u32, _value: Vec3) {
        self.events.push(Event::Uniform(*location));
    }

    fn set_uniform_mat4(&mut self, location: &u32, _value: &Mat4) {
        self.events.push(Event::Uniform(*location));
    }

    fn current_program(&self) -> Option<u32> {
        self.state.program
    }

    fn use_program(&mut self, program: Option<u32>) {
        self.state.program = program;
        self.events.push(Event::UseProgram(program));
    }

    fn depth_func(&self) -> DepthFunc {
        self.state.depth_func
    }

    fn set_depth_func(&mut self, func: DepthFunc) {
        self.state.depth_func = func;
        self.events.push(Event::SetDepthFunc(func));
    }

    fn depth_write(&self) -> bool {
        self.state.depth_write
    }

    fn set_depth_write(&mut self, enabled: bool) {
        self.state.depth_write = enabled;
        self.events.push(Event::SetDepthWrite(enabled));
    }

    fn blend_enabled(&self) -> bool {
        self.state.blend_enabled
    }

    fn set_blend_enabled(&mut self, enabled: bool) {
        self.state.blend_enabled = enabled;
        self.events.push(Event::SetBlendEnabled(enabled));
    }

    fn blend_func(&self) -> (BlendFactor, BlendFactor) {
        self.state.blend_func
    }

    fn set_blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.state.blend_func = (src, dst);
        self.events.push(Event::SetBlendFunc(src, dst));
    }

    fn bind_quad(&mut self, vertices: u32, indices: u32) {
        self.events.push(Event::BindQuad(vertices, indices));
    }

    fn draw_triangles(&mut self, index_count: i32) {
        self.draw_calls += 1;
        self.states_at_draw.push(self.state);
        self.events.push(Event::Draw(index_count));
    }
}
