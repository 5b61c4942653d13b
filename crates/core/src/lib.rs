#![deny(unsafe_code)]
//! Core of the first-triangle WebGL bootstrap.
//!
//! Loads a vertex/fragment shader pair, compiles and links it, uploads a
//! triangle, and drives a frame loop that clears and draws until the run flag
//! is cleared. Rendering goes through the [`render::GlBackend`] trait; hosts
//! supply the context, the surface, and the clock.

pub mod config;
pub mod error;
pub mod frame;
pub mod loader;
pub mod render;
pub mod scene;

#[cfg(test)]
mod testing;

pub use config::SceneConfig;
pub use error::Error;
pub use frame::{FrameClock, FrameDriver, FrameState, RunFlag, Surface};
pub use loader::{
    load_shader_source, load_shader_source_then, FileFetcher, LoadError, ShaderSource,
    SourceFetcher,
};
pub use scene::Scene;
