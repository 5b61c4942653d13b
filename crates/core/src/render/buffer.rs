//! Static vertex (VBO) and index (IBO) buffer builders.
//!
//! Buffers are uploaded once with `STATIC_DRAW` and left unbound; the
//! attribute binder rebinds them every frame.

use super::backend::GlBackend;
use super::context::{Extensions, ELEMENT_INDEX_UINT};
use crate::error::Error;

/// An uploaded index buffer together with its element type and length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexBuffer<Buf> {
    pub buffer: Buf,
    /// `UNSIGNED_SHORT` or `UNSIGNED_INT`.
    pub element_type: u32,
    pub count: i32,
}

/// Converts an element count to the `GLsizei` a draw call takes.
fn element_count(len: usize) -> Result<i32, Error> {
    i32::try_from(len).map_err(|_| Error::ElementCount(len))
}

fn upload<B: GlBackend>(gl: &B, target: u32, bytes: &[u8]) -> Result<B::Buffer, Error> {
    let buffer = gl
        .create_buffer()
        .map_err(|reason| Error::resource("buffer", reason))?;
    gl.bind_buffer(target, Some(buffer));
    gl.buffer_data(target, bytes, glow::STATIC_DRAW);
    gl.bind_buffer(target, None);
    Ok(buffer)
}

/// Uploads vertex attribute data as a static `ARRAY_BUFFER`.
///
/// # Errors
///
/// Returns `Error::Resource` if the context cannot allocate a buffer.
pub fn create_vbo<B: GlBackend>(gl: &B, data: &[f32]) -> Result<B::Buffer, Error> {
    upload(gl, glow::ARRAY_BUFFER, bytemuck::cast_slice(data))
}

/// Uploads 16-bit indices as a static `ELEMENT_ARRAY_BUFFER`.
///
/// # Errors
///
/// Returns `Error::ElementCount` if `data` has more than `i32::MAX`
/// indices, or `Error::Resource` if the context cannot allocate a buffer.
pub fn create_ibo<B: GlBackend>(gl: &B, data: &[u16]) -> Result<IndexBuffer<B::Buffer>, Error> {
    let count = element_count(data.len())?;
    let buffer = upload(gl, glow::ELEMENT_ARRAY_BUFFER, bytemuck::cast_slice(data))?;
    Ok(IndexBuffer {
        buffer,
        element_type: glow::UNSIGNED_SHORT,
        count,
    })
}

/// Uploads 32-bit indices as a static `ELEMENT_ARRAY_BUFFER`.
///
/// Needs `OES_element_index_uint`; without it nothing is sent to the context.
///
/// # Errors
///
/// Returns `Error::UnsupportedExtension` when the capability is absent,
/// `Error::ElementCount` for more than `i32::MAX` indices, or
/// `Error::Resource` if the context cannot allocate a buffer.
pub fn create_ibo_u32<B: GlBackend>(
    gl: &B,
    extensions: &Extensions,
    data: &[u32],
) -> Result<IndexBuffer<B::Buffer>, Error> {
    if !extensions.element_index_uint {
        log::warn!("{ELEMENT_INDEX_UINT} not supported, refusing 32-bit index buffer");
        return Err(Error::UnsupportedExtension(ELEMENT_INDEX_UINT));
    }
    let count = element_count(data.len())?;
    let buffer = upload(gl, glow::ELEMENT_ARRAY_BUFFER, bytemuck::cast_slice(data))?;
    Ok(IndexBuffer {
        buffer,
        element_type: glow::UNSIGNED_INT,
        count,
    })
}

/// Draws `ibo.count` indexed triangles from the currently bound element buffer.
pub fn draw_indexed<B: GlBackend>(gl: &B, ibo: &IndexBuffer<B::Buffer>) {
    gl.draw_elements(glow::TRIANGLES, ibo.count, ibo.element_type, 0);
}
