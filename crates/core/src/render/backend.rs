//! The narrow graphics-API surface used by the bootstrap helpers.
//!
//! `GlBackend` lists exactly the WebGL 1 / GLES 2 calls the helpers in this
//! crate issue, with safe signatures. The real implementation is
//! [`GlowBackend`], a thin wrapper over `glow::Context`; tests drive the same
//! helpers through a recording backend instead of a live GPU context.
//!
//! Enum arguments are raw GL constants (`glow::ARRAY_BUFFER`,
//! `glow::TRIANGLES`, ...), exactly as `glow` takes them.

use std::fmt::Debug;

use super::program::UniformValue;

/// Graphics-API operations required by shader, buffer, framebuffer and frame
/// helpers.
///
/// Object-creation calls return `Err` with the driver's message when the
/// context refuses to allocate; everything else is fire-and-forget, as in GL.
pub trait GlBackend {
    type Shader: Copy + Debug + PartialEq;
    type Program: Copy + Debug + PartialEq;
    type Buffer: Copy + Debug + PartialEq;
    type Texture: Copy + Debug + PartialEq;
    type Framebuffer: Copy + Debug + PartialEq;
    type Renderbuffer: Copy + Debug + PartialEq;
    type UniformLocation: Clone + Debug;

    /// Whether the named extension was reported by the context.
    fn has_extension(&self, name: &str) -> bool;

    // -- shaders and programs --

    fn create_shader(&self, shader_type: u32) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn use_program(&self, program: Option<Self::Program>);
    fn delete_program(&self, program: Self::Program);

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;
    fn uniform_location(&self, program: Self::Program, name: &str)
        -> Option<Self::UniformLocation>;
    fn uniform(&self, location: &Self::UniformLocation, value: &UniformValue);

    // -- buffers and vertex attributes --

    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>);
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32);
    fn delete_buffer(&self, buffer: Self::Buffer);
    fn enable_vertex_attrib_array(&self, index: u32);
    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );

    // -- textures --

    fn create_texture(&self) -> Result<Self::Texture, String>;
    fn bind_texture(&self, target: u32, texture: Option<Self::Texture>);
    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &self,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        pixel_type: u32,
        pixels: Option<&[u8]>,
    );
    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32);
    fn generate_mipmap(&self, target: u32);
    fn delete_texture(&self, texture: Self::Texture);

    // -- framebuffers and renderbuffers --

    fn create_framebuffer(&self) -> Result<Self::Framebuffer, String>;
    fn bind_framebuffer(&self, target: u32, framebuffer: Option<Self::Framebuffer>);
    fn framebuffer_texture_2d(
        &self,
        target: u32,
        attachment: u32,
        texture_target: u32,
        texture: Option<Self::Texture>,
        level: i32,
    );
    fn framebuffer_renderbuffer(
        &self,
        target: u32,
        attachment: u32,
        renderbuffer_target: u32,
        renderbuffer: Option<Self::Renderbuffer>,
    );
    fn check_framebuffer_status(&self, target: u32) -> u32;
    fn delete_framebuffer(&self, framebuffer: Self::Framebuffer);

    fn create_renderbuffer(&self) -> Result<Self::Renderbuffer, String>;
    fn bind_renderbuffer(&self, target: u32, renderbuffer: Option<Self::Renderbuffer>);
    fn renderbuffer_storage(&self, target: u32, internal_format: u32, width: i32, height: i32);
    fn delete_renderbuffer(&self, renderbuffer: Self::Renderbuffer);

    // -- per-frame state --

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32);
    fn clear(&self, mask: u32);
    fn draw_arrays(&self, mode: u32, first: i32, count: i32);
    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32);
    fn flush(&self);
}

/// [`GlBackend`] over a live `glow::Context`.
///
/// Created by the host once the platform context exists (a WebGL 1 context
/// in the browser).
pub struct GlowBackend {
    gl: glow::Context,
}

impl GlowBackend {
    /// Wraps an existing `glow::Context`.
    pub fn new(gl: glow::Context) -> Self {
        Self { gl }
    }

    /// Returns a reference to the underlying `glow::Context`.
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// Consumes this wrapper and returns the underlying `glow::Context`.
    pub fn into_gl(self) -> glow::Context {
        self.gl
    }
}

// SAFETY (for every block below): glow marks raw GL entry points as unsafe.
// Handles passed in were produced by this same context, and enum arguments
// are GL constants chosen by the helpers in this crate.
#[allow(unsafe_code)]
impl GlBackend for GlowBackend {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type Buffer = glow::Buffer;
    type Texture = glow::Texture;
    type Framebuffer = glow::Framebuffer;
    type Renderbuffer = glow::Renderbuffer;
    type UniformLocation = glow::UniformLocation;

    fn has_extension(&self, name: &str) -> bool {
        use glow::HasContext;
        self.gl.supported_extensions().contains(name)
    }

    fn create_shader(&self, shader_type: u32) -> Result<Self::Shader, String> {
        use glow::HasContext;
        unsafe { self.gl.create_shader(shader_type) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        use glow::HasContext;
        unsafe { self.gl.shader_source(shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        use glow::HasContext;
        unsafe { self.gl.compile_shader(shader) }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        use glow::HasContext;
        unsafe { self.gl.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        use glow::HasContext;
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        use glow::HasContext;
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        use glow::HasContext;
        unsafe { self.gl.create_program() }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        use glow::HasContext;
        unsafe { self.gl.attach_shader(program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        use glow::HasContext;
        unsafe { self.gl.link_program(program) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        use glow::HasContext;
        unsafe { self.gl.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        use glow::HasContext;
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        use glow::HasContext;
        unsafe { self.gl.use_program(program) }
    }

    fn delete_program(&self, program: Self::Program) {
        use glow::HasContext;
        unsafe { self.gl.delete_program(program) }
    }

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        use glow::HasContext;
        unsafe { self.gl.get_attrib_location(program, name) }
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        use glow::HasContext;
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn uniform(&self, location: &Self::UniformLocation, value: &UniformValue) {
        use glow::HasContext;
        let location = Some(location);
        unsafe {
            match *value {
                UniformValue::Float(x) => self.gl.uniform_1_f32(location, x),
                UniformValue::Vec2([x, y]) => self.gl.uniform_2_f32(location, x, y),
                UniformValue::Vec3([x, y, z]) => self.gl.uniform_3_f32(location, x, y, z),
                UniformValue::Vec4([x, y, z, w]) => self.gl.uniform_4_f32(location, x, y, z, w),
                UniformValue::Int(x) => self.gl.uniform_1_i32(location, x),
                UniformValue::Mat4(ref m) => {
                    self.gl.uniform_matrix_4_f32_slice(location, false, m)
                }
            }
        }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        use glow::HasContext;
        unsafe { self.gl.create_buffer() }
    }

    fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>) {
        use glow::HasContext;
        unsafe { self.gl.bind_buffer(target, buffer) }
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        use glow::HasContext;
        unsafe { self.gl.buffer_data_u8_slice(target, data, usage) }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        use glow::HasContext;
        unsafe { self.gl.delete_buffer(buffer) }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        use glow::HasContext;
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        use glow::HasContext;
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, size, data_type, normalized, stride, offset)
        }
    }

    fn create_texture(&self) -> Result<Self::Texture, String> {
        use glow::HasContext;
        unsafe { self.gl.create_texture() }
    }

    fn bind_texture(&self, target: u32, texture: Option<Self::Texture>) {
        use glow::HasContext;
        unsafe { self.gl.bind_texture(target, texture) }
    }

    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &self,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        pixel_type: u32,
        pixels: Option<&[u8]>,
    ) {
        use glow::HasContext;
        unsafe {
            self.gl.tex_image_2d(
                target,
                level,
                internal_format,
                width,
                height,
                0,
                format,
                pixel_type,
                glow::PixelUnpackData::Slice(pixels),
            )
        }
    }

    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        use glow::HasContext;
        unsafe { self.gl.tex_parameter_i32(target, parameter, value) }
    }

    fn generate_mipmap(&self, target: u32) {
        use glow::HasContext;
        unsafe { self.gl.generate_mipmap(target) }
    }

    fn delete_texture(&self, texture: Self::Texture) {
        use glow::HasContext;
        unsafe { self.gl.delete_texture(texture) }
    }

    fn create_framebuffer(&self) -> Result<Self::Framebuffer, String> {
        use glow::HasContext;
        unsafe { self.gl.create_framebuffer() }
    }

    fn bind_framebuffer(&self, target: u32, framebuffer: Option<Self::Framebuffer>) {
        use glow::HasContext;
        unsafe { self.gl.bind_framebuffer(target, framebuffer) }
    }

    fn framebuffer_texture_2d(
        &self,
        target: u32,
        attachment: u32,
        texture_target: u32,
        texture: Option<Self::Texture>,
        level: i32,
    ) {
        use glow::HasContext;
        unsafe {
            self.gl
                .framebuffer_texture_2d(target, attachment, texture_target, texture, level)
        }
    }

    fn framebuffer_renderbuffer(
        &self,
        target: u32,
        attachment: u32,
        renderbuffer_target: u32,
        renderbuffer: Option<Self::Renderbuffer>,
    ) {
        use glow::HasContext;
        unsafe {
            self.gl
                .framebuffer_renderbuffer(target, attachment, renderbuffer_target, renderbuffer)
        }
    }

    fn check_framebuffer_status(&self, target: u32) -> u32 {
        use glow::HasContext;
        unsafe { self.gl.check_framebuffer_status(target) }
    }

    fn delete_framebuffer(&self, framebuffer: Self::Framebuffer) {
        use glow::HasContext;
        unsafe { self.gl.delete_framebuffer(framebuffer) }
    }

    fn create_renderbuffer(&self) -> Result<Self::Renderbuffer, String> {
        use glow::HasContext;
        unsafe { self.gl.create_renderbuffer() }
    }

    fn bind_renderbuffer(&self, target: u32, renderbuffer: Option<Self::Renderbuffer>) {
        use glow::HasContext;
        unsafe { self.gl.bind_renderbuffer(target, renderbuffer) }
    }

    fn renderbuffer_storage(&self, target: u32, internal_format: u32, width: i32, height: i32) {
        use glow::HasContext;
        unsafe {
            self.gl
                .renderbuffer_storage(target, internal_format, width, height)
        }
    }

    fn delete_renderbuffer(&self, renderbuffer: Self::Renderbuffer) {
        use glow::HasContext;
        unsafe { self.gl.delete_renderbuffer(renderbuffer) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        use glow::HasContext;
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        use glow::HasContext;
        unsafe { self.gl.clear_color(red, green, blue, alpha) }
    }

    fn clear(&self, mask: u32) {
        use glow::HasContext;
        unsafe { self.gl.clear(mask) }
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        use glow::HasContext;
        unsafe { self.gl.draw_arrays(mode, first, count) }
    }

    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32) {
        use glow::HasContext;
        unsafe { self.gl.draw_elements(mode, count, element_type, offset) }
    }

    fn flush(&self) {
        use glow::HasContext;
        unsafe { self.gl.flush() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // GlowBackend requires a live GL context, so integration tests are ignored.

    #[test]
    fn glow_backend_exposes_wrapped_context() {
        // Compile-time check that the public API exists.
        fn _assert_api(backend: &GlowBackend) {
            let _gl: &glow::Context = backend.gl();
            let _ext: bool = backend.has_extension("OES_texture_float");
        }
    }

    #[test]
    #[ignore = "requires GL context"]
    fn create_shader_returns_handle_on_live_context() {
        // Would test: GlowBackend::create_shader(VERTEX_SHADER) returns Ok.
    }
}
