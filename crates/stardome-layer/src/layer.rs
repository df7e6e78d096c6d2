//! The star layer: lifecycle, per-frame gate, and the single guarded
//! draw.

use log::{info, warn};

use stardome_field::shader::{self, VERTEX_SHADER_SOURCE, fragment_shader_source};
use stardome_math::{FrameTransform, FrameUniforms};

use crate::backend::{BlendFactor, DepthFunc, RenderBackend, ShaderStage};
use crate::error::{LayerError, OptionsError};
use crate::guard::StateScope;
use crate::options::StarOptions;
use crate::quad::QuadBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    Attached,
    Detached,
}

struct UniformSet<L> {
    inv_matrix: Option<L>,
    globe_position: Option<L>,
    globe_radius: Option<L>,
    globe_center: Option<L>,
    camera_angles: Option<L>,
    intensity: Option<L>,
}

struct Resources<B: RenderBackend> {
    program: B::Program,
    vertex_shader: B::Shader,
    fragment_shader: B::Shader,
    quad: QuadBuffer<B>,
    uniforms: UniformSet<B::UniformLocation>,
}

/// Procedural starry background behind the globe.
///
/// Lifecycle is `Uninitialized -> Attached -> Detached` and detached is
/// terminal; build a fresh layer to re-attach. The host should register
/// the layer first in its layer stack so everything else draws on top,
/// and must call `render` once per displayed frame while the layer is
/// active.
///
/// A failed shader build disables the layer instead of failing the host:
/// the diagnostic is logged once and every subsequent `render` is a
/// no-op.
pub struct StarLayer<B: RenderBackend> {
    options: StarOptions,
    state: Lifecycle,
    resources: Option<Resources<B>>,
}

impl<B: RenderBackend> StarLayer<B> {
    /// Build a layer with validated options.
    pub fn new(options: StarOptions) -> Result<Self, OptionsError> {
        options.validate()?;
        Ok(Self {
            options,
            state: Lifecycle::Uninitialized,
            resources: None,
        })
    }

    /// Build a layer with the default options.
    pub fn with_defaults() -> Self {
        Self {
            options: StarOptions::default(),
            state: Lifecycle::Uninitialized,
            resources: None,
        }
    }

    pub fn intensity(&self) -> f32 {
        self.options.intensity
    }

    /// The density compiled into the sky program. Immutable after
    /// construction; changing it requires a fresh layer.
    pub fn density(&self) -> f32 {
        self.options.density
    }

    /// Change the brightness multiplier. Takes effect on the next frame;
    /// no resources are rebuilt.
    pub fn set_intensity(&mut self, intensity: f32) -> Result<(), OptionsError> {
        let updated = StarOptions {
            intensity,
            ..self.options
        };
        updated.validate()?;
        self.options = updated;
        Ok(())
    }

    /// Compile the sky program and build the quad. Called by the host
    /// once when the layer is added.
    pub fn attach(&mut self, gl: &mut B) {
        if self.state != Lifecycle::Uninitialized {
            warn!("star layer attach ignored: layer already used");
            return;
        }
        self.state = Lifecycle::Attached;
        match build_resources(gl, self.options.density) {
            Ok(resources) => {
                info!(
                    "star layer attached (density {}, intensity {})",
                    self.options.density, self.options.intensity
                );
                self.resources = Some(resources);
            }
            Err(err) => {
                warn!("star layer disabled: {err}");
            }
        }
    }

    /// Draw the sky for this frame. No-op before attach, after detach,
    /// after a failed attach, and whenever the host is fully in flat
    /// projection.
    pub fn render(&mut self, gl: &mut B, frame: &FrameTransform) {
        if self.state != Lifecycle::Attached {
            return;
        }
        let Some(resources) = self.resources.as_ref() else {
            return;
        };
        // Fully flat projection: the sky is invisible, skip the frame
        // without touching any state.
        if frame.projection_transition == 0.0 {
            return;
        }

        let uniforms = FrameUniforms::derive(frame);

        let mut scope = StateScope::begin(gl);
        scope.use_program(Some(resources.program));
        // Stars sit at infinity: never write depth, never lose to it.
        scope.set_depth_func(DepthFunc::Always);
        scope.set_depth_write(false);
        scope.set_blend_enabled(true);
        scope.set_blend_func(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);

        let set = &resources.uniforms;
        if let Some(loc) = &set.inv_matrix {
            scope.set_uniform_mat4(loc, &frame.inv_projection);
        }
        if let Some(loc) = &set.globe_position {
            scope.set_uniform_vec3(loc, uniforms.globe_position);
        }
        if let Some(loc) = &set.globe_radius {
            scope.set_uniform_f32(loc, uniforms.globe_radius);
        }
        if let Some(loc) = &set.globe_center {
            scope.set_uniform_vec2(loc, uniforms.globe_center);
        }
        if let Some(loc) = &set.camera_angles {
            scope.set_uniform_vec3(loc, uniforms.camera_angles);
        }
        if let Some(loc) = &set.intensity {
            scope.set_uniform_f32(loc, self.options.intensity);
        }

        resources.quad.bind(&mut scope);
        resources.quad.draw(&mut scope);
    }

    /// Release every GPU resource. Called by the host when the layer is
    /// removed; the layer cannot be re-attached afterwards.
    pub fn detach(&mut self, gl: &mut B) {
        if let Some(resources) = self.resources.take() {
            gl.delete_program(resources.program);
            gl.delete_shader(resources.vertex_shader);
            gl.delete_shader(resources.fragment_shader);
            resources.quad.destroy(gl);
            info!("star layer detached");
        }
        self.state = Lifecycle::Detached;
    }
}

fn build_resources<B: RenderBackend>(
    gl: &mut B,
    density: f32,
) -> Result<Resources<B>, LayerError> {
    let vertex_shader = gl.compile_shader(ShaderStage::Vertex, VERTEX_SHADER_SOURCE)?;
    let fragment_shader =
        match gl.compile_shader(ShaderStage::Fragment, &fragment_shader_source(density)) {
            Ok(shader) => shader,
            Err(err) => {
                gl.delete_shader(vertex_shader);
                return Err(err);
            }
        };
    let program = match gl.link_program(vertex_shader, fragment_shader) {
        Ok(program) => program,
        Err(err) => {
            gl.delete_shader(vertex_shader);
            gl.delete_shader(fragment_shader);
            return Err(err);
        }
    };
    let quad = match QuadBuffer::create(gl) {
        Ok(quad) => quad,
        Err(err) => {
            gl.delete_program(program);
            gl.delete_shader(vertex_shader);
            gl.delete_shader(fragment_shader);
            return Err(err);
        }
    };

    let uniforms = UniformSet {
        inv_matrix: gl.uniform_location(program, shader::uniforms::INV_MATRIX),
        globe_position: gl.uniform_location(program, shader::uniforms::GLOBE_POSITION),
        globe_radius: gl.uniform_location(program, shader::uniforms::GLOBE_RADIUS),
        globe_center: gl.uniform_location(program, shader::uniforms::GLOBE_CENTER),
        camera_angles: gl.uniform_location(program, shader::uniforms::CAMERA_ANGLES),
        intensity: gl.uniform_location(program, shader::uniforms::INTENSITY),
    };

    Ok(Resources {
        program,
        vertex_shader,
        fragment_shader,
        quad,
        uniforms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Event, MockBackend};
    use glam::Mat4;

    fn frame(transition: f32) -> FrameTransform {
        FrameTransform {
            projection: Mat4::IDENTITY,
            inv_projection: Mat4::IDENTITY,
            world_size: 512.0,
            center_lng: 12.0,
            center_lat: 48.0,
            pitch: 0.2,
            bearing: 0.4,
            roll: 0.0,
            projection_transition: transition,
        }
    }

    fn attached_layer(gl: &mut MockBackend) -> StarLayer<MockBackend> {
        let mut layer = StarLayer::with_defaults();
        layer.attach(gl);
        layer
    }

    #[test]
    fn test_render_skipped_when_projection_is_flat() {
        let mut gl = MockBackend::new();
        let mut layer = attached_layer(&mut gl);
        gl.events.clear();

        layer.render(&mut gl, &frame(0.0));
        assert_eq!(gl.draw_calls, 0);
        assert!(gl.events.is_empty(), "flat frame must not touch any state");
    }

    #[test]
    fn test_render_issues_exactly_one_draw() {
        let mut gl = MockBackend::new();
        let mut layer = attached_layer(&mut gl);

        layer.render(&mut gl, &frame(0.5));
        assert_eq!(gl.draw_calls, 1);

        layer.render(&mut gl, &frame(1.0));
        assert_eq!(gl.draw_calls, 2);
    }

    #[test]
    fn test_render_restores_arbitrary_prior_state() {
        let mut gl = MockBackend::new();
        let mut layer = attached_layer(&mut gl);

        gl.use_program(Some(77));
        gl.set_depth_func(DepthFunc::Greater);
        gl.set_depth_write(true);
        gl.set_blend_enabled(false);
        gl.set_blend_func(BlendFactor::DstAlpha, BlendFactor::SrcColor);
        let before = gl.state;

        layer.render(&mut gl, &frame(1.0));
        assert_eq!(gl.state, before, "render must leave state exactly as found");
    }

    #[test]
    fn test_draw_runs_with_sky_state() {
        let mut gl = MockBackend::new();
        let mut layer = attached_layer(&mut gl);
        gl.events.clear();

        layer.render(&mut gl, &frame(1.0));

        let draw_at = gl
            .events
            .iter()
            .position(|e| matches!(e, Event::Draw(_)))
            .expect("one draw recorded");
        let state_at_draw = &gl.states_at_draw[0];
        assert_eq!(state_at_draw.depth_func, DepthFunc::Always);
        assert!(!state_at_draw.depth_write);
        assert!(state_at_draw.blend_enabled);
        assert_eq!(
            state_at_draw.blend_func,
            (BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha)
        );
        assert!(draw_at > 0);
    }

    #[test]
    fn test_uniforms_uploaded_each_frame() {
        let mut gl = MockBackend::new();
        let mut layer = attached_layer(&mut gl);
        gl.events.clear();

        layer.render(&mut gl, &frame(1.0));
        let uploads = gl
            .events
            .iter()
            .filter(|e| matches!(e, Event::Uniform(_)))
            .count();
        assert_eq!(uploads, 6);
    }

    #[test]
    fn test_render_before_attach_is_noop() {
        let mut gl = MockBackend::new();
        let mut layer: StarLayer<MockBackend> = StarLayer::with_defaults();
        layer.render(&mut gl, &frame(1.0));
        assert_eq!(gl.draw_calls, 0);
    }

    #[test]
    fn test_render_after_detach_is_noop() {
        let mut gl = MockBackend::new();
        let mut layer = attached_layer(&mut gl);
        layer.detach(&mut gl);
        layer.render(&mut gl, &frame(1.0));
        assert_eq!(gl.draw_calls, 0);
    }

    #[test]
    fn test_detach_releases_every_resource() {
        let mut gl = MockBackend::new();
        let mut layer = attached_layer(&mut gl);
        assert_eq!(gl.live_programs.len(), 1);
        assert_eq!(gl.live_shaders.len(), 2);
        assert_eq!(gl.live_buffers.len(), 2);

        layer.detach(&mut gl);
        assert!(gl.live_programs.is_empty());
        assert!(gl.live_shaders.is_empty());
        assert!(gl.live_buffers.is_empty());
    }

    #[test]
    fn test_second_attach_is_rejected() {
        let mut gl = MockBackend::new();
        let mut layer = attached_layer(&mut gl);
        layer.attach(&mut gl);
        assert_eq!(gl.live_programs.len(), 1, "no duplicate resources");

        layer.detach(&mut gl);
        layer.attach(&mut gl);
        assert!(gl.live_programs.is_empty(), "detached is terminal");
    }

    #[test]
    fn test_compile_failure_degrades_to_noop() {
        let mut gl = MockBackend::new();
        gl.fail_compile = Some(ShaderStage::Fragment);
        let mut layer = StarLayer::with_defaults();
        layer.attach(&mut gl);
        // The vertex shader compiled before the failure and must not
        // leak.
        assert!(gl.live_shaders.is_empty());
        assert!(gl.live_programs.is_empty());

        layer.render(&mut gl, &frame(1.0));
        assert_eq!(gl.draw_calls, 0);
    }

    #[test]
    fn test_link_failure_degrades_to_noop() {
        let mut gl = MockBackend::new();
        gl.fail_link = true;
        let mut layer = StarLayer::with_defaults();
        layer.attach(&mut gl);
        assert!(gl.live_shaders.is_empty());
        assert!(gl.live_programs.is_empty());

        layer.render(&mut gl, &frame(1.0));
        assert_eq!(gl.draw_calls, 0);
    }

    #[test]
    fn test_fragment_source_bakes_layer_density() {
        let mut gl = MockBackend::new();
        let mut layer = StarLayer::new(StarOptions {
            density: 0.4,
            ..StarOptions::default()
        })
        .unwrap();
        layer.attach(&mut gl);
        let fragment = gl
            .compiled_sources
            .iter()
            .find(|(stage, _)| *stage == ShaderStage::Fragment)
            .map(|(_, source)| source.clone())
            .expect("fragment shader compiled");
        assert!(fragment.contains("const float DENSITY = 0.400000;"));
    }

    #[test]
    fn test_set_intensity_validates_and_applies() {
        let mut layer: StarLayer<MockBackend> = StarLayer::with_defaults();
        assert!(layer.set_intensity(5.0).is_ok());
        assert_eq!(layer.intensity(), 5.0);

        assert!(layer.set_intensity(0.0).is_err());
        assert!(layer.set_intensity(f32::NAN).is_err());
        assert_eq!(layer.intensity(), 5.0, "rejected values must not stick");
    }

    #[test]
    fn test_new_rejects_invalid_options() {
        let result: Result<StarLayer<MockBackend>, _> = StarLayer::new(StarOptions {
            density: 2.0,
            ..StarOptions::default()
        });
        assert!(result.is_err());
    }
}
