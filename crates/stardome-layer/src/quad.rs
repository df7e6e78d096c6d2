//! The static full-screen quad: four clip-space corners, two triangles,
//! built once at attach and immutable afterwards.

use bytemuck::{Pod, Zeroable};

use crate::backend::RenderBackend;
use crate::error::LayerError;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
}

pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, -1.0] },
    QuadVertex { position: [1.0, 1.0] },
    QuadVertex { position: [-1.0, 1.0] },
];

pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Vertex and index buffers of the quad, owned by the layer resources.
pub struct QuadBuffer<B: RenderBackend> {
    pub vertex_buffer: B::Buffer,
    pub index_buffer: B::Buffer,
    pub index_count: i32,
}

impl<B: RenderBackend> QuadBuffer<B> {
    pub fn create(gl: &mut B) -> Result<Self, LayerError> {
        let vertex_buffer = gl.create_vertex_buffer(bytemuck::cast_slice(&QUAD_VERTICES))?;
        let index_buffer = match gl.create_index_buffer(&QUAD_INDICES) {
            Ok(buffer) => buffer,
            Err(err) => {
                gl.delete_buffer(vertex_buffer);
                return Err(err);
            }
        };
        Ok(Self {
            vertex_buffer,
            index_buffer,
            index_count: QUAD_INDICES.len() as i32,
        })
    }

    pub fn bind(&self, gl: &mut B) {
        gl.bind_quad(self.vertex_buffer, self.index_buffer);
    }

    pub fn draw(&self, gl: &mut B) {
        gl.draw_triangles(self.index_count);
    }

    pub fn destroy(self, gl: &mut B) {
        gl.delete_buffer(self.vertex_buffer);
        gl.delete_buffer(self.index_buffer);
    }
}
