//! Program descriptor: a linked program plus its attribute and uniform slots.
//!
//! Attribute slots pair a location with a component count ("stride"), uniform
//! slots pair a location with a type tag. Both live in a single `Vec` of
//! structs, so index `i` always names the same logical input across location
//! and stride (or location and type).

use super::backend::GlBackend;
use crate::error::Error;

/// Type tag for a uniform slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformType {
    Float,
    Vec2,
    Vec3,
    Vec4,
    Int,
    Mat4,
}

impl UniformType {
    /// GLSL spelling of the type, used in diagnostics.
    pub fn glsl_name(self) -> &'static str {
        match self {
            UniformType::Float => "float",
            UniformType::Vec2 => "vec2",
            UniformType::Vec3 => "vec3",
            UniformType::Vec4 => "vec4",
            UniformType::Int => "int",
            UniformType::Mat4 => "mat4",
        }
    }
}

/// A value to upload into a uniform slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    /// Also used for sampler units.
    Int(i32),
    /// Column-major.
    Mat4([f32; 16]),
}

impl UniformValue {
    /// The type tag this value satisfies.
    pub fn uniform_type(&self) -> UniformType {
        match self {
            UniformValue::Float(_) => UniformType::Float,
            UniformValue::Vec2(_) => UniformType::Vec2,
            UniformValue::Vec3(_) => UniformType::Vec3,
            UniformValue::Vec4(_) => UniformType::Vec4,
            UniformValue::Int(_) => UniformType::Int,
            UniformValue::Mat4(_) => UniformType::Mat4,
        }
    }
}

impl From<f32> for UniformValue {
    fn from(x: f32) -> Self {
        UniformValue::Float(x)
    }
}

impl From<i32> for UniformValue {
    fn from(x: i32) -> Self {
        UniformValue::Int(x)
    }
}

impl From<glam::Vec2> for UniformValue {
    fn from(v: glam::Vec2) -> Self {
        UniformValue::Vec2(v.to_array())
    }
}

impl From<glam::Vec3> for UniformValue {
    fn from(v: glam::Vec3) -> Self {
        UniformValue::Vec3(v.to_array())
    }
}

impl From<glam::Vec4> for UniformValue {
    fn from(v: glam::Vec4) -> Self {
        UniformValue::Vec4(v.to_array())
    }
}

impl From<glam::Mat4> for UniformValue {
    fn from(m: glam::Mat4) -> Self {
        UniformValue::Mat4(m.to_cols_array())
    }
}

/// A vertex attribute input: where it is bound and how many `f32`
/// components each vertex carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSlot {
    pub location: u32,
    pub stride: i32,
}

/// A uniform input: its resolved location and declared type.
#[derive(Debug, Clone)]
pub struct UniformSlot<L> {
    pub name: String,
    pub location: L,
    pub uniform_type: UniformType,
}

/// Linked program plus the attribute and uniform slots resolved against it.
#[derive(Debug)]
pub struct ProgramParameter<B: GlBackend> {
    program: B::Program,
    attributes: Vec<AttributeSlot>,
    uniforms: Vec<UniformSlot<B::UniformLocation>>,
}

impl<B: GlBackend> ProgramParameter<B> {
    /// Wraps a linked program with no slots registered yet.
    pub fn new(program: B::Program) -> Self {
        Self {
            program,
            attributes: Vec::new(),
            uniforms: Vec::new(),
        }
    }

    /// The linked program handle.
    pub fn program(&self) -> B::Program {
        self.program
    }

    /// Registered attribute slots, in registration order.
    pub fn attributes(&self) -> &[AttributeSlot] {
        &self.attributes
    }

    /// Registered uniform slots, in registration order.
    pub fn uniforms(&self) -> &[UniformSlot<B::UniformLocation>] {
        &self.uniforms
    }

    /// Looks up the attribute `name` and appends a slot for it.
    ///
    /// Returns the slot index.
    ///
    /// # Errors
    ///
    /// Returns `Error::AttributeNotFound` if the linked program has no active
    /// attribute with that name (unused attributes are stripped by the linker).
    pub fn add_attribute(&mut self, gl: &B, name: &str, stride: i32) -> Result<usize, Error> {
        let location = gl
            .attrib_location(self.program, name)
            .ok_or_else(|| Error::AttributeNotFound(name.to_string()))?;
        self.attributes.push(AttributeSlot { location, stride });
        log::debug!("attribute '{name}' -> location {location}, stride {stride}");
        Ok(self.attributes.len() - 1)
    }

    /// Looks up the uniform `name` and appends a slot with its type tag.
    ///
    /// # Errors
    ///
    /// Returns `Error::UniformNotFound` if the program has no active uniform
    /// with that name.
    pub fn add_uniform(
        &mut self,
        gl: &B,
        name: &str,
        uniform_type: UniformType,
    ) -> Result<usize, Error> {
        let location = gl
            .uniform_location(self.program, name)
            .ok_or_else(|| Error::UniformNotFound(name.to_string()))?;
        self.uniforms.push(UniformSlot {
            name: name.to_string(),
            location,
            uniform_type,
        });
        Ok(self.uniforms.len() - 1)
    }

    /// Uploads one value per registered uniform, in slot order.
    ///
    /// The program must be current. Values past the last slot are an error;
    /// fewer values than slots leave the trailing uniforms untouched.
    ///
    /// # Errors
    ///
    /// Returns `Error::UniformTypeMismatch` when a value does not match its
    /// slot's type, or `Error::UniformCountMismatch` when there are more
    /// values than slots.
    /// Nothing is uploaded in either case.
    pub fn push_uniforms(&self, gl: &B, values: &[UniformValue]) -> Result<(), Error> {
        if values.len() > self.uniforms.len() {
            return Err(Error::UniformCountMismatch {
                values: values.len(),
                slots: self.uniforms.len(),
            });
        }
        for (slot, value) in self.uniforms.iter().zip(values) {
            if slot.uniform_type != value.uniform_type() {
                return Err(Error::UniformTypeMismatch {
                    name: slot.name.clone(),
                    expected: slot.uniform_type.glsl_name(),
                    got: value.uniform_type().glsl_name(),
                });
            }
        }
        for (slot, value) in self.uniforms.iter().zip(values) {
            gl.uniform(&slot.location, value);
        }
        Ok(())
    }
}
