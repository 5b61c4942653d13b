//! Error types for the first-triangle core.

use thiserror::Error;

use crate::loader::LoadError;
use crate::render::shader::ShaderError;

/// Errors produced while bootstrapping or driving the graphics pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// The host could not hand out a rendering context.
    #[error("rendering context unsupported: {0}")]
    UnsupportedContext(String),

    /// Shader compilation or program linking failed.
    #[error(transparent)]
    Shader(#[from] ShaderError),

    /// A feature was requested that needs an extension the context lacks.
    #[error("extension not supported: {0}")]
    UnsupportedExtension(&'static str),

    /// The context refused to allocate a GL object.
    #[error("failed to create {kind}: {reason}")]
    Resource { kind: &'static str, reason: String },

    /// A framebuffer was not complete after attaching its images.
    #[error("framebuffer incomplete: status 0x{0:04X}")]
    IncompleteFramebuffer(u32),

    /// The program has no active attribute with this name.
    #[error("attribute not found: {0}")]
    AttributeNotFound(String),

    /// The program has no active uniform with this name.
    #[error("uniform not found: {0}")]
    UniformNotFound(String),

    /// A uniform value did not match the slot's declared type.
    #[error("uniform type mismatch for '{name}': expected {expected}, got {got}")]
    UniformTypeMismatch {
        name: String,
        expected: &'static str,
        got: &'static str,
    },

    /// Vertex buffers and attribute slots were not the same length.
    #[error("attribute count mismatch: {buffers} buffers for {slots} attribute slots")]
    AttributeCountMismatch { buffers: usize, slots: usize },

    /// More uniform values were pushed than the program has slots for.
    #[error("uniform count mismatch: {values} values for {slots} uniform slots")]
    UniformCountMismatch { values: usize, slots: usize },

    /// An element count does not fit the `GLsizei` range of a draw call.
    #[error("{0} elements exceed the GL count limit of {max}", max = i32::MAX)]
    ElementCount(usize),

    /// Pixel data length did not match the declared dimensions.
    #[error("image data is {len} bytes, expected {expected} for {width}x{height} RGBA")]
    ImageSize {
        width: u32,
        height: u32,
        len: usize,
        expected: usize,
    },

    /// An image could not be decoded.
    #[error("image decode failed: {0}")]
    ImageDecode(String),

    /// Fetching shader sources failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The scene configuration is invalid or unreadable.
    #[error("invalid scene config: {0}")]
    Config(String),
}

impl Error {
    /// Builds an [`Error::Resource`] from a context allocation failure.
    pub(crate) fn resource(kind: &'static str, reason: String) -> Self {
        Error::Resource { kind, reason }
    }
}
