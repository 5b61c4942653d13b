//! WebGL 1 / OpenGL ES 2 rendering primitives.
//!
//! Everything here is generic over [`GlBackend`], so the same code drives a
//! browser `WebGlRenderingContext` (through `glow`) and the recording backend
//! the tests use.
//!
//! # Module overview
//!
//! - [`backend`] -- The GL call surface and its `glow` implementation.
//! - [`shader`] -- Shader compilation, linking, and error formatting.
//! - [`program`] -- Program descriptor with attribute and uniform slots.
//! - [`buffer`] -- Static vertex and index buffers.
//! - [`attribute`] -- Per-draw attribute binding.
//! - [`texture`] -- Texture configuration and creation helpers.
//! - [`framebuffer`] -- Standard and floating-point off-screen targets.
//! - [`context`] -- GPU context wrapper with capability detection.

pub mod attribute;
pub mod backend;
pub mod buffer;
pub mod context;
pub mod framebuffer;
pub mod program;
pub mod shader;
pub mod texture;

// Re-export key types at the render module level for convenience.
pub use attribute::set_attribute;
pub use backend::{GlBackend, GlowBackend};
pub use buffer::{create_ibo, create_ibo_u32, create_vbo, draw_indexed, IndexBuffer};
pub use context::{Extensions, GpuContext};
pub use framebuffer::{FloatFramebuffer, Framebuffer};
pub use program::{AttributeSlot, ProgramParameter, UniformSlot, UniformType, UniformValue};
pub use shader::{
    compile_program, compile_shader, format_shader_error, link_program, ShaderError, ShaderStage,
};
#[cfg(feature = "png")]
pub use texture::decode_png;
pub use texture::{create_image_texture, create_texture, ImagePixels, TextureConfig};
