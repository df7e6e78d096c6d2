//! Scoped save/restore of shared render state.
//!
//! The host renderer assumes its state is untouched across custom-layer
//! callbacks, so the draw runs inside a [`StateScope`]: snapshot on
//! entry, restore on every exit path, including early returns and unwind.

use std::ops::{Deref, DerefMut};

use crate::backend::{BlendFactor, DepthFunc, RenderBackend};

/// The five mutable state values the sky pass touches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawState<P> {
    pub program: Option<P>,
    pub depth_func: DepthFunc,
    pub depth_write: bool,
    pub blend_enabled: bool,
    pub blend_func: (BlendFactor, BlendFactor),
}

/// Borrows the backend for the duration of the draw; restores the
/// captured state on drop, in capture order.
pub struct StateScope<'a, B: RenderBackend> {
    gl: &'a mut B,
    saved: DrawState<B::Program>,
}

impl<'a, B: RenderBackend> StateScope<'a, B> {
    pub fn begin(gl: &'a mut B) -> Self {
        let saved = DrawState {
            program: gl.current_program(),
            depth_func: gl.depth_func(),
            depth_write: gl.depth_write(),
            blend_enabled: gl.blend_enabled(),
            blend_func: gl.blend_func(),
        };
        Self { gl, saved }
    }

    pub fn saved(&self) -> &DrawState<B::Program> {
        &self.saved
    }
}

impl<B: RenderBackend> Drop for StateScope<'_, B> {
    fn drop(&mut self) {
        self.gl.use_program(self.saved.program);
        self.gl.set_depth_func(self.saved.depth_func);
        self.gl.set_depth_write(self.saved.depth_write);
        self.gl.set_blend_enabled(self.saved.blend_enabled);
        let (src, dst) = self.saved.blend_func;
        self.gl.set_blend_func(src, dst);
    }
}

impl<B: RenderBackend> Deref for StateScope<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.gl
    }
}

impl<B: RenderBackend> DerefMut for StateScope<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.gl
    }
}
