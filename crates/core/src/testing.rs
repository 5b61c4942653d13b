//! Recording [`GlBackend`] used by unit tests in place of a live context.
//!
//! Every state-changing call is appended to a call log that tests inspect.
//! Compilation is simulated: a source "compiles" when its braces and
//! parentheses balance and it declares `main`. Attribute and uniform
//! locations are resolved by scanning `attribute`/`uniform` declarations in
//! the sources attached to a program.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::render::backend::GlBackend;
use crate::render::program::UniformValue;

/// Handle type for every object kind.
pub type Handle = u32;

/// One recorded GL call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(Handle),
    CompileShader(Handle),
    DeleteShader(Handle),
    CreateProgram(Handle),
    AttachShader(Handle, Handle),
    LinkProgram(Handle),
    UseProgram(Option<Handle>),
    DeleteProgram(Handle),
    Uniform(String, UniformValue),
    CreateBuffer(Handle),
    BindBuffer(u32, Option<Handle>),
    BufferData(u32, Vec<u8>, u32),
    DeleteBuffer(Handle),
    EnableVertexAttribArray(u32),
    VertexAttribPointer {
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    },
    CreateTexture(Handle),
    BindTexture(u32, Option<Handle>),
    TexImage2d {
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        pixel_type: u32,
        has_pixels: bool,
    },
    TexParameter(u32, u32, i32),
    GenerateMipmap(u32),
    DeleteTexture(Handle),
    CreateFramebuffer(Handle),
    BindFramebuffer(u32, Option<Handle>),
    FramebufferTexture2d(u32, Option<Handle>),
    FramebufferRenderbuffer(u32, Option<Handle>),
    DeleteFramebuffer(Handle),
    CreateRenderbuffer(Handle),
    BindRenderbuffer(u32, Option<Handle>),
    RenderbufferStorage(u32, i32, i32),
    DeleteRenderbuffer(Handle),
    Viewport(i32, i32, i32, i32),
    ClearColor([f32; 4]),
    Clear(u32),
    DrawArrays(u32, i32, i32),
    DrawElements(u32, i32, u32, i32),
    Flush,
}

#[derive(Debug, Default)]
struct State {
    next_handle: Handle,
    calls: Vec<Call>,
    extensions: HashSet<String>,
    shader_sources: HashMap<Handle, String>,
    compiled: HashMap<Handle, Result<(), String>>,
    program_sources: HashMap<Handle, Vec<String>>,
    current_program: Option<Handle>,
    link_failure: Option<String>,
    linked: HashMap<Handle, bool>,
    framebuffer_status: Option<u32>,
    refuse_create: Option<&'static str>,
}

/// In-memory GL stand-in that records calls.
#[derive(Debug, Default)]
pub struct RecordingGl {
    state: RefCell<State>,
}

impl RecordingGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that reports the given extensions as supported.
    pub fn with_extensions(names: &[&str]) -> Self {
        let gl = Self::new();
        gl.state.borrow_mut().extensions = names.iter().map(|n| n.to_string()).collect();
        gl
    }

    /// Snapshot of the call log.
    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn current_program(&self) -> Option<Handle> {
        self.state.borrow().current_program
    }

    /// Makes the next link attempt fail with `log`.
    pub fn fail_next_link(&self, log: &str) {
        self.state.borrow_mut().link_failure = Some(log.to_string());
    }

    /// Overrides the value returned by `check_framebuffer_status`.
    pub fn set_framebuffer_status(&self, status: u32) {
        self.state.borrow_mut().framebuffer_status = Some(status);
    }

    /// Makes every `create_*` call for `kind` ("buffer", "texture", ...) fail.
    pub fn refuse_create(&self, kind: &'static str) {
        self.state.borrow_mut().refuse_create = Some(kind);
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }

    fn allocate(&self, kind: &'static str) -> Result<Handle, String> {
        let mut state = self.state.borrow_mut();
        if state.refuse_create == Some(kind) {
            return Err(format!("out of {kind} objects"));
        }
        state.next_handle += 1;
        Ok(state.next_handle)
    }

    fn declared(sources: &[String], qualifier: &str) -> Vec<String> {
        sources
            .iter()
            .flat_map(|src| src.split(';'))
            .filter_map(|statement| {
                let tokens: Vec<&str> = statement.split_whitespace().collect();
                match tokens.as_slice() {
                    [first, .., last] if *first == qualifier && tokens.len() >= 3 => {
                        Some(last.to_string())
                    }
                    _ => None,
                }
            })
            .collect()
    }
}

fn check_syntax(source: &str) -> Result<(), String> {
    let mut depth = 0i32;
    for ch in source.chars() {
        match ch {
            '{' | '(' => depth += 1,
            '}' | ')' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return Err("ERROR: 0:1: unexpected closing bracket".into());
        }
    }
    if depth != 0 {
        return Err("ERROR: 0:1: unbalanced brackets, unexpected end of file".into());
    }
    if !source.contains("main") {
        return Err("ERROR: missing main function".into());
    }
    Ok(())
}

impl GlBackend for RecordingGl {
    type Shader = Handle;
    type Program = Handle;
    type Buffer = Handle;
    type Texture = Handle;
    type Framebuffer = Handle;
    type Renderbuffer = Handle;
    type UniformLocation = String;

    fn has_extension(&self, name: &str) -> bool {
        self.state.borrow().extensions.contains(name)
    }

    fn create_shader(&self, _shader_type: u32) -> Result<Handle, String> {
        let shader = self.allocate("shader")?;
        self.record(Call::CreateShader(shader));
        Ok(shader)
    }

    fn shader_source(&self, shader: Handle, source: &str) {
        self.state
            .borrow_mut()
            .shader_sources
            .insert(shader, source.to_string());
    }

    fn compile_shader(&self, shader: Handle) {
        let result = {
            let state = self.state.borrow();
            check_syntax(state.shader_sources.get(&shader).map_or("", String::as_str))
        };
        self.state.borrow_mut().compiled.insert(shader, result);
        self.record(Call::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: Handle) -> bool {
        matches!(self.state.borrow().compiled.get(&shader), Some(Ok(())))
    }

    fn shader_info_log(&self, shader: Handle) -> String {
        match self.state.borrow().compiled.get(&shader) {
            Some(Err(log)) => log.clone(),
            _ => String::new(),
        }
    }

    fn delete_shader(&self, shader: Handle) {
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<Handle, String> {
        let program = self.allocate("program")?;
        self.record(Call::CreateProgram(program));
        Ok(program)
    }

    fn attach_shader(&self, program: Handle, shader: Handle) {
        {
            let mut state = self.state.borrow_mut();
            let source = state.shader_sources.get(&shader).cloned().unwrap_or_default();
            state.program_sources.entry(program).or_default().push(source);
        }
        self.record(Call::AttachShader(program, shader));
    }

    fn link_program(&self, program: Handle) {
        {
            let mut state = self.state.borrow_mut();
            let ok = state.link_failure.is_none();
            state.linked.insert(program, ok);
        }
        self.record(Call::LinkProgram(program));
    }

    fn program_link_status(&self, program: Handle) -> bool {
        self.state.borrow().linked.get(&program).copied().unwrap_or(false)
    }

    fn program_info_log(&self, _program: Handle) -> String {
        self.state.borrow_mut().link_failure.take().unwrap_or_default()
    }

    fn use_program(&self, program: Option<Handle>) {
        self.state.borrow_mut().current_program = program;
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: Handle) {
        self.record(Call::DeleteProgram(program));
    }

    fn attrib_location(&self, program: Handle, name: &str) -> Option<u32> {
        let state = self.state.borrow();
        let sources = state.program_sources.get(&program)?;
        Self::declared(sources, "attribute")
            .iter()
            .position(|n| n == name)
            .map(|i| i as u32)
    }

    fn uniform_location(&self, program: Handle, name: &str) -> Option<String> {
        let state = self.state.borrow();
        let sources = state.program_sources.get(&program)?;
        Self::declared(sources, "uniform")
            .into_iter()
            .find(|n| n == name)
    }

    fn uniform(&self, location: &String, value: &UniformValue) {
        self.record(Call::Uniform(location.clone(), *value));
    }

    fn create_buffer(&self) -> Result<Handle, String> {
        let buffer = self.allocate("buffer")?;
        self.record(Call::CreateBuffer(buffer));
        Ok(buffer)
    }

    fn bind_buffer(&self, target: u32, buffer: Option<Handle>) {
        self.record(Call::BindBuffer(target, buffer));
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        self.record(Call::BufferData(target, data.to_vec(), usage));
    }

    fn delete_buffer(&self, buffer: Handle) {
        self.record(Call::DeleteBuffer(buffer));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::EnableVertexAttribArray(index));
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
        self.record(Call::VertexAttribPointer {
            index,
            size,
            data_type,
            normalized,
            stride,
            offset,
        });
    }

    fn create_texture(&self) -> Result<Handle, String> {
        let texture = self.allocate("texture")?;
        self.record(Call::CreateTexture(texture));
        Ok(texture)
    }

    fn bind_texture(&self, target: u32, texture: Option<Handle>) {
        self.record(Call::BindTexture(target, texture));
    }

    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &self,
        _target: u32,
        _level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        pixel_type: u32,
        pixels: Option<&[u8]>,
    ) {
        self.record(Call::TexImage2d {
            internal_format,
            width,
            height,
            format,
            pixel_type,
            has_pixels: pixels.is_some(),
        });
    }

    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        self.record(Call::TexParameter(target, parameter, value));
    }

    fn generate_mipmap(&self, target: u32) {
        self.record(Call::GenerateMipmap(target));
    }

    fn delete_texture(&self, texture: Handle) {
        self.record(Call::DeleteTexture(texture));
    }

    fn create_framebuffer(&self) -> Result<Handle, String> {
        let framebuffer = self.allocate("framebuffer")?;
        self.record(Call::CreateFramebuffer(framebuffer));
        Ok(framebuffer)
    }

    fn bind_framebuffer(&self, target: u32, framebuffer: Option<Handle>) {
        self.record(Call::BindFramebuffer(target, framebuffer));
    }

    fn framebuffer_texture_2d(
        &self,
        _target: u32,
        attachment: u32,
        _texture_target: u32,
        texture: Option<Handle>,
        _level: i32,
    ) {
        self.record(Call::FramebufferTexture2d(attachment, texture));
    }

    fn framebuffer_renderbuffer(
        &self,
        _target: u32,
        attachment: u32,
        _renderbuffer_target: u32,
        renderbuffer: Option<Handle>,
    ) {
        self.record(Call::FramebufferRenderbuffer(attachment, renderbuffer));
    }

    fn check_framebuffer_status(&self, _target: u32) -> u32 {
        self.state
            .borrow()
            .framebuffer_status
            .unwrap_or(glow::FRAMEBUFFER_COMPLETE)
    }

    fn delete_framebuffer(&self, framebuffer: Handle) {
        self.record(Call::DeleteFramebuffer(framebuffer));
    }

    fn create_renderbuffer(&self) -> Result<Handle, String> {
        let renderbuffer = self.allocate("renderbuffer")?;
        self.record(Call::CreateRenderbuffer(renderbuffer));
        Ok(renderbuffer)
    }

    fn bind_renderbuffer(&self, target: u32, renderbuffer: Option<Handle>) {
        self.record(Call::BindRenderbuffer(target, renderbuffer));
    }

    fn renderbuffer_storage(&self, _target: u32, internal_format: u32, width: i32, height: i32) {
        self.record(Call::RenderbufferStorage(internal_format, width, height));
    }

    fn delete_renderbuffer(&self, renderbuffer: Handle) {
        self.record(Call::DeleteRenderbuffer(renderbuffer));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Call::Viewport(x, y, width, height));
    }

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.record(Call::ClearColor([red, green, blue, alpha]));
    }

    fn clear(&self, mask: u32) {
        self.record(Call::Clear(mask));
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        self.record(Call::DrawArrays(mode, first, count));
    }

    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32) {
        self.record(Call::DrawElements(mode, count, element_type, offset));
    }

    fn flush(&self) {
        self.record(Call::Flush);
    }
}
