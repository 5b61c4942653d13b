//! Scene configuration.
//!
//! Everything the bootstrap needs besides the shader text itself: where the
//! shader files live, the clear color, the vertex positions, and whether the
//! frame loop keeps running after the first frame. Every field has a default,
//! so an empty JSON object yields the stock single-triangle scene.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The stock triangle: three `(x, y, z)` vertices.
pub const TRIANGLE_POSITIONS: [f32; 9] = [
    0.0, 0.0, 0.0, //
    1.0, 1.0, 0.0, //
    -1.0, 1.0, 0.0,
];

/// Settings for one scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Vertex shader locator, relative to the page (or working directory).
    pub vertex_shader: String,
    /// Fragment shader locator.
    pub fragment_shader: String,
    /// RGBA clear color, each channel in [0, 1].
    pub clear_color: [f32; 4],
    /// Name of the position attribute in the vertex shader.
    pub position_attribute: String,
    /// Components per vertex in `positions`.
    pub stride: i32,
    /// Flat vertex positions, `stride` floats per vertex.
    pub positions: Vec<f32>,
    /// Keep rendering after the first frame until stopped.
    pub animate: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            vertex_shader: "./shader/scene.vert".into(),
            fragment_shader: "./shader/scene.frag".into(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            position_attribute: "position".into(),
            stride: 3,
            positions: TRIANGLE_POSITIONS.to_vec(),
            animate: false,
        }
    }
}

impl SceneConfig {
    /// Parses and validates a JSON configuration. Missing keys take their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for malformed JSON or invalid values.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file cannot be read or is invalid.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    /// Checks the invariants the frame driver relies on.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` describing the first violated invariant.
    pub fn validate(&self) -> Result<(), Error> {
        if !(1..=4).contains(&self.stride) {
            return Err(Error::Config(format!(
                "stride must be between 1 and 4, got {}",
                self.stride
            )));
        }
        if self.positions.is_empty() {
            return Err(Error::Config("positions must not be empty".into()));
        }
        if self.positions.len() % self.stride as usize != 0 {
            return Err(Error::Config(format!(
                "{} positions is not a multiple of stride {}",
                self.positions.len(),
                self.stride
            )));
        }
        let vertices = self.positions.len() / self.stride as usize;
        if i32::try_from(vertices).is_err() {
            return Err(Error::ElementCount(vertices));
        }
        if let Some(c) = self.clear_color.iter().find(|c| !(0.0..=1.0).contains(*c)) {
            return Err(Error::Config(format!(
                "clear color channel {c} outside [0, 1]"
            )));
        }
        if self.position_attribute.is_empty() {
            return Err(Error::Config("position attribute name is empty".into()));
        }
        Ok(())
    }

    /// Number of vertices drawn per frame.
    ///
    /// Saturates at `i32::MAX`; [`validate`](Self::validate) rejects
    /// configurations that large.
    pub fn vertex_count(&self) -> i32 {
        let vertices = self.positions.len() / self.stride.max(1) as usize;
        i32::try_from(vertices).unwrap_or(i32::MAX)
    }
}
