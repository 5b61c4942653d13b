//! One-shot scene setup: shaders, program slots, vertex buffer, clear color.

use crate::config::SceneConfig;
use crate::error::Error;
use crate::frame::{FrameClock, FrameDriver, RunFlag};
use crate::loader::ShaderSource;
use crate::render::backend::GlBackend;
use crate::render::buffer::create_vbo;
use crate::render::program::ProgramParameter;
use crate::render::shader::{compile_shader, link_program, ShaderStage};

/// A bootstrapped scene, ready to render.
#[derive(Debug)]
pub struct Scene<B: GlBackend> {
    config: SceneConfig,
    vbo: B::Buffer,
    driver: FrameDriver<B>,
}

impl<B: GlBackend> Scene<B> {
    /// Builds everything the frame driver needs from loaded shader sources.
    ///
    /// Both shaders are compiled before anything is linked, so a broken
    /// vertex shader does not hide errors in the fragment shader. `start_ms`
    /// is the timestamp the frame clock measures from.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for an invalid configuration, `Error::Shader`
    /// for the first compile or link failure, `Error::AttributeNotFound` if
    /// the vertex shader has no active attribute named
    /// `config.position_attribute`, or `Error::Resource` if the vertex
    /// buffer cannot be allocated.
    pub fn bootstrap(
        gl: &B,
        source: &ShaderSource,
        config: &SceneConfig,
        start_ms: f64,
    ) -> Result<Self, Error> {
        config.validate()?;

        let vertex = compile_shader(gl, &source.vertex, ShaderStage::Vertex);
        let fragment = compile_shader(gl, &source.fragment, ShaderStage::Fragment);
        let program = match (vertex, fragment) {
            (Ok(vs), Ok(fs)) => {
                let linked = link_program(gl, Some(vs), Some(fs));
                gl.delete_shader(vs);
                gl.delete_shader(fs);
                linked?
            }
            (Err(e), other) | (other, Err(e)) => {
                if let Ok(shader) = other {
                    gl.delete_shader(shader);
                }
                return Err(e.into());
            }
        };

        let mut prg = ProgramParameter::new(program);
        let vbo = match prg
            .add_attribute(gl, &config.position_attribute, config.stride)
            .and_then(|_| create_vbo(gl, &config.positions))
        {
            Ok(vbo) => vbo,
            Err(e) => {
                gl.delete_program(program);
                return Err(e);
            }
        };

        let [r, g, b, a] = config.clear_color;
        gl.clear_color(r, g, b, a);

        let driver = FrameDriver::new(
            prg,
            vec![vbo],
            config.vertex_count(),
            FrameClock::new(start_ms),
            RunFlag::new(config.animate),
        );
        log::info!(
            "scene ready: {} vertices, animate={}",
            config.vertex_count(),
            config.animate
        );

        Ok(Self {
            config: config.clone(),
            vbo,
            driver,
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn driver(&self) -> &FrameDriver<B> {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut FrameDriver<B> {
        &mut self.driver
    }

    /// Deletes the program and vertex buffer.
    pub fn destroy(&self, gl: &B) {
        gl.delete_buffer(self.vbo);
        gl.delete_program(self.driver.program().program());
    }
}
