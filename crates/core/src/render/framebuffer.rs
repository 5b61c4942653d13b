//! Off-screen render targets (framebuffer + attachments).
//!
//! [`Framebuffer`] is the standard target: an RGBA8 color texture plus a
//! 16-bit depth renderbuffer. [`FloatFramebuffer`] is color-only with
//! floating-point texels and depends on `OES_texture_float` or
//! `OES_texture_half_float`.

use super::backend::GlBackend;
use super::context::Extensions;
use super::texture::{create_texture, TextureConfig};
use crate::error::Error;

/// An off-screen target with an RGBA8 color texture and a depth renderbuffer.
#[derive(Debug)]
pub struct Framebuffer<B: GlBackend> {
    pub framebuffer: B::Framebuffer,
    pub renderbuffer: B::Renderbuffer,
    pub texture: B::Texture,
    width: u32,
    height: u32,
}

impl<B: GlBackend> Framebuffer<B> {
    /// Creates a `width` x `height` target with color and depth attachments.
    ///
    /// All bindings are reset to none on return.
    ///
    /// # Errors
    ///
    /// Returns `Error::Resource` if any object cannot be created, or
    /// `Error::IncompleteFramebuffer` if the attachments are rejected.
    pub fn new(gl: &B, width: u32, height: u32) -> Result<Self, Error> {
        let framebuffer = gl
            .create_framebuffer()
            .map_err(|reason| Error::resource("framebuffer", reason))?;
        gl.bind_framebuffer(glow::FRAMEBUFFER, Some(framebuffer));

        let renderbuffer = match gl.create_renderbuffer() {
            Ok(rb) => rb,
            Err(reason) => {
                gl.bind_framebuffer(glow::FRAMEBUFFER, None);
                gl.delete_framebuffer(framebuffer);
                return Err(Error::resource("renderbuffer", reason));
            }
        };
        gl.bind_renderbuffer(glow::RENDERBUFFER, Some(renderbuffer));
        gl.renderbuffer_storage(
            glow::RENDERBUFFER,
            glow::DEPTH_COMPONENT16,
            width as i32,
            height as i32,
        );
        gl.framebuffer_renderbuffer(
            glow::FRAMEBUFFER,
            glow::DEPTH_ATTACHMENT,
            glow::RENDERBUFFER,
            Some(renderbuffer),
        );

        let texture = match create_texture(gl, &TextureConfig::rgba8(width, height)) {
            Ok(tex) => tex,
            Err(e) => {
                gl.bind_renderbuffer(glow::RENDERBUFFER, None);
                gl.bind_framebuffer(glow::FRAMEBUFFER, None);
                gl.delete_renderbuffer(renderbuffer);
                gl.delete_framebuffer(framebuffer);
                return Err(e);
            }
        };
        gl.framebuffer_texture_2d(
            glow::FRAMEBUFFER,
            glow::COLOR_ATTACHMENT0,
            glow::TEXTURE_2D,
            Some(texture),
            0,
        );

        let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
        gl.bind_renderbuffer(glow::RENDERBUFFER, None);
        gl.bind_framebuffer(glow::FRAMEBUFFER, None);

        let target = Self {
            framebuffer,
            renderbuffer,
            texture,
            width,
            height,
        };
        if status != glow::FRAMEBUFFER_COMPLETE {
            target.destroy(gl);
            return Err(Error::IncompleteFramebuffer(status));
        }
        Ok(target)
    }

    /// Binds this target for drawing and sets the viewport to its size.
    pub fn bind(&self, gl: &B) {
        gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.framebuffer));
        gl.viewport(0, 0, self.width as i32, self.height as i32);
    }

    /// Returns the width of this render target in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of this render target in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Deletes the framebuffer and both attachments.
    ///
    /// The GL context does not clean up individual objects on drop, so call
    /// this when the target is no longer needed.
    pub fn destroy(&self, gl: &B) {
        gl.delete_framebuffer(self.framebuffer);
        gl.delete_renderbuffer(self.renderbuffer);
        gl.delete_texture(self.texture);
    }
}

/// Either extension enables [`FloatFramebuffer`].
pub const FLOAT_TEXTURE_EXTENSIONS: &str = "OES_texture_float or OES_texture_half_float";

/// A color-only off-screen target with floating-point texels.
#[derive(Debug)]
pub struct FloatFramebuffer<B: GlBackend> {
    pub framebuffer: B::Framebuffer,
    pub texture: B::Texture,
    /// `FLOAT` or `HALF_FLOAT_OES`, whichever the context supports.
    pub pixel_type: u32,
    width: u32,
    height: u32,
}

impl<B: GlBackend> FloatFramebuffer<B> {
    /// Creates a `width` x `height` float color target.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedExtension` when neither float texture
    /// extension is available (nothing is sent to the context), plus the
    /// creation and completeness errors of [`Framebuffer::new`].
    pub fn new(gl: &B, extensions: &Extensions, width: u32, height: u32) -> Result<Self, Error> {
        let Some(pixel_type) = extensions.float_texture_pixel_type() else {
            log::warn!("float texture not supported");
            return Err(Error::UnsupportedExtension(FLOAT_TEXTURE_EXTENSIONS));
        };

        let framebuffer = gl
            .create_framebuffer()
            .map_err(|reason| Error::resource("framebuffer", reason))?;
        gl.bind_framebuffer(glow::FRAMEBUFFER, Some(framebuffer));

        let config = TextureConfig::float(width, height, pixel_type);
        let texture = match create_texture(gl, &config) {
            Ok(tex) => tex,
            Err(e) => {
                gl.bind_framebuffer(glow::FRAMEBUFFER, None);
                gl.delete_framebuffer(framebuffer);
                return Err(e);
            }
        };
        gl.framebuffer_texture_2d(
            glow::FRAMEBUFFER,
            glow::COLOR_ATTACHMENT0,
            glow::TEXTURE_2D,
            Some(texture),
            0,
        );

        let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
        gl.bind_framebuffer(glow::FRAMEBUFFER, None);

        let target = Self {
            framebuffer,
            texture,
            pixel_type,
            width,
            height,
        };
        if status != glow::FRAMEBUFFER_COMPLETE {
            target.destroy(gl);
            return Err(Error::IncompleteFramebuffer(status));
        }
        Ok(target)
    }

    /// Binds this target for drawing and sets the viewport to its size.
    pub fn bind(&self, gl: &B) {
        gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.framebuffer));
        gl.viewport(0, 0, self.width as i32, self.height as i32);
    }

    /// Returns the width of this render target in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of this render target in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Deletes the framebuffer and its color texture.
    pub fn destroy(&self, gl: &B) {
        gl.delete_framebuffer(self.framebuffer);
        gl.delete_texture(self.texture);
    }
}
