//! GPU context wrapper with capability detection.
//!
//! `GpuContext` owns a [`GlBackend`] together with the [`Extensions`] it
//! reported at startup. Helpers that depend on optional features (32-bit
//! index buffers, float framebuffers) take the capability set explicitly so
//! they can fail fast instead of issuing calls the context cannot honour.

use super::backend::GlBackend;

/// `OES_element_index_uint`: `UNSIGNED_INT` element indices.
pub const ELEMENT_INDEX_UINT: &str = "OES_element_index_uint";
/// `OES_texture_float`: `FLOAT` texel storage.
pub const TEXTURE_FLOAT: &str = "OES_texture_float";
/// `OES_texture_half_float`: `HALF_FLOAT_OES` texel storage.
pub const TEXTURE_HALF_FLOAT: &str = "OES_texture_half_float";

/// Pixel type enum exposed by `OES_texture_half_float`.
///
/// Differs from the WebGL2 / GLES3 core `HALF_FLOAT` (0x140B).
pub const HALF_FLOAT_OES: u32 = 0x8D61;

/// Optional capabilities queried once at startup. Read-only afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extensions {
    pub element_index_uint: bool,
    pub texture_float: bool,
    pub texture_half_float: bool,
}

impl Extensions {
    /// Queries the three capabilities this crate cares about.
    pub fn query<B: GlBackend>(gl: &B) -> Self {
        let ext = Self {
            element_index_uint: gl.has_extension(ELEMENT_INDEX_UINT),
            texture_float: gl.has_extension(TEXTURE_FLOAT),
            texture_half_float: gl.has_extension(TEXTURE_HALF_FLOAT),
        };
        log::debug!("extensions: {ext:?}");
        ext
    }

    /// Pixel type for floating-point color targets, preferring full `FLOAT`.
    ///
    /// `None` when neither float texture extension is available.
    pub fn float_texture_pixel_type(&self) -> Option<u32> {
        if self.texture_float {
            Some(glow::FLOAT)
        } else if self.texture_half_float {
            Some(HALF_FLOAT_OES)
        } else {
            None
        }
    }
}

/// Wraps a [`GlBackend`] with detected GPU capabilities.
///
/// Created once at initialization, after the host has acquired its rendering
/// context.
pub struct GpuContext<B: GlBackend> {
    gl: B,
    extensions: Extensions,
}

impl<B: GlBackend> GpuContext<B> {
    /// Wraps the given backend and queries its extensions.
    pub fn new(gl: B) -> Self {
        let extensions = Extensions::query(&gl);
        Self { gl, extensions }
    }

    /// Returns a reference to the underlying backend.
    pub fn gl(&self) -> &B {
        &self.gl
    }

    /// Consumes this wrapper and returns the underlying backend.
    pub fn into_gl(self) -> B {
        self.gl
    }

    /// Capabilities reported at creation.
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}
