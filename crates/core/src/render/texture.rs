//! Texture creation helpers for WebGL / OpenGL ES.
//!
//! Provides `TextureConfig` for render-target color attachments,
//! `create_texture` for allocating empty storage, and
//! `create_image_texture` for uploading decoded RGBA8 images.

use super::backend::GlBackend;
use crate::error::Error;

/// Configuration for creating an empty GPU texture.
///
/// Use the convenience constructors for the two render-target layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureConfig {
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
    /// Texel upload type (`UNSIGNED_BYTE`, `FLOAT`, `HALF_FLOAT_OES`).
    pub pixel_type: u32,
    /// Min and mag filter (`LINEAR` or `NEAREST`).
    pub filter: u32,
    /// Wrap mode on both axes.
    pub wrap: u32,
}

impl TextureConfig {
    /// RGBA8 color target: linear filtering, clamped to edge.
    pub fn rgba8(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixel_type: glow::UNSIGNED_BYTE,
            filter: glow::LINEAR,
            wrap: glow::CLAMP_TO_EDGE,
        }
    }

    /// Floating-point color target with the given texel type.
    ///
    /// Uses `NEAREST` filtering; linear filtering of float textures needs a
    /// further extension that is not universally available.
    pub fn float(width: u32, height: u32, pixel_type: u32) -> Self {
        Self {
            width,
            height,
            pixel_type,
            filter: glow::NEAREST,
            wrap: glow::CLAMP_TO_EDGE,
        }
    }
}

fn set_sampling<B: GlBackend>(gl: &B, filter: u32, wrap: u32) {
    gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, filter as i32);
    gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, filter as i32);
    gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap as i32);
    gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap as i32);
}

/// Creates an RGBA texture with uninitialised storage from `config`.
///
/// WebGL 1 requires the internal format to equal the upload format, so both
/// are `RGBA`; `config.pixel_type` selects byte or float texels.
///
/// # Errors
///
/// Returns `Error::Resource` if the GL context fails to create the texture.
pub fn create_texture<B: GlBackend>(gl: &B, config: &TextureConfig) -> Result<B::Texture, Error> {
    let texture = gl
        .create_texture()
        .map_err(|reason| Error::resource("texture", reason))?;

    gl.bind_texture(glow::TEXTURE_2D, Some(texture));
    gl.tex_image_2d(
        glow::TEXTURE_2D,
        0,
        glow::RGBA as i32,
        config.width as i32,
        config.height as i32,
        glow::RGBA,
        config.pixel_type,
        None,
    );
    set_sampling(gl, config.filter, config.wrap);
    gl.bind_texture(glow::TEXTURE_2D, None);

    Ok(texture)
}

/// A decoded RGBA8 image ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePixels {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

impl ImagePixels {
    /// Wraps raw RGBA8 pixels after checking the buffer length.
    ///
    /// # Errors
    ///
    /// Returns `Error::ImageSize` if `rgba.len() != width * height * 4`.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, Error> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(Error::ImageSize {
                width,
                height,
                len: rgba.len(),
                expected,
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }
}

/// Decodes a PNG (or any format the `image` crate detects) into RGBA8.
///
/// # Errors
///
/// Returns `Error::ImageDecode` if the bytes cannot be decoded.
#[cfg(feature = "png")]
pub fn decode_png(bytes: &[u8]) -> Result<ImagePixels, Error> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| Error::ImageDecode(e.to_string()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    ImagePixels::new(width, height, img.into_raw())
}

/// Uploads an image as a mipmapped texture with linear filtering and
/// `REPEAT` wrapping.
///
/// # Errors
///
/// Returns `Error::Resource` if the GL context fails to create the texture.
pub fn create_image_texture<B: GlBackend>(
    gl: &B,
    image: &ImagePixels,
) -> Result<B::Texture, Error> {
    let texture = gl
        .create_texture()
        .map_err(|reason| Error::resource("texture", reason))?;

    gl.bind_texture(glow::TEXTURE_2D, Some(texture));
    gl.tex_image_2d(
        glow::TEXTURE_2D,
        0,
        glow::RGBA as i32,
        image.width as i32,
        image.height as i32,
        glow::RGBA,
        glow::UNSIGNED_BYTE,
        Some(image.rgba.as_slice()),
    );
    gl.generate_mipmap(glow::TEXTURE_2D);
    set_sampling(gl, glow::LINEAR, glow::REPEAT);
    gl.bind_texture(glow::TEXTURE_2D, None);

    Ok(texture)
}
