//! Per-frame vertex attribute binding.
//!
//! Binding state does not survive between draws in the context model this
//! crate targets (no VAOs in WebGL 1), so [`set_attribute`] runs every frame
//! before the draw call.

use super::backend::GlBackend;
use super::program::AttributeSlot;
use crate::error::Error;

/// Binds each vertex buffer to its attribute slot, then the optional index
/// buffer.
///
/// Buffer `i` feeds `slots[i]`: bind as `ARRAY_BUFFER`, enable the location,
/// and describe it as tightly packed `f32` data with `slots[i].stride`
/// components per vertex.
///
/// # Errors
///
/// Returns `Error::AttributeCountMismatch` when `vbos` and `slots` differ in
/// length. No calls are issued in that case.
pub fn set_attribute<B: GlBackend>(
    gl: &B,
    vbos: &[B::Buffer],
    slots: &[AttributeSlot],
    ibo: Option<B::Buffer>,
) -> Result<(), Error> {
    if vbos.len() != slots.len() {
        return Err(Error::AttributeCountMismatch {
            buffers: vbos.len(),
            slots: slots.len(),
        });
    }

    for (vbo, slot) in vbos.iter().zip(slots) {
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(*vbo));
        gl.enable_vertex_attrib_array(slot.location);
        gl.vertex_attrib_pointer_f32(slot.location, slot.stride, glow::FLOAT, false, 0, 0);
    }

    if let Some(ibo) = ibo {
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
    }

    Ok(())
}
