//! Frame clock, run flag and the per-frame draw sequence.
//!
//! The driver moves through `Idle -> Rendering -> ScheduledNext | Stopped`.
//! Hosts call [`FrameDriver::render_frame`] from their refresh callback and
//! request another callback only while it returns `ScheduledNext`; native
//! hosts and tests can use [`FrameDriver::run_until_stopped`] instead.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::Error;
use crate::render::attribute::set_attribute;
use crate::render::backend::GlBackend;
use crate::render::program::ProgramParameter;

/// Key name (as reported by `KeyboardEvent.key`) that stops the loop.
pub const ESCAPE_KEY: &str = "Escape";

/// Elapsed time since a fixed start timestamp.
///
/// Timestamps are wall-clock milliseconds supplied by the host
/// (`Date.now()` in the browser). Elapsed time never decreases, even if
/// the wall clock is stepped backwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    start_ms: f64,
    elapsed: f32,
}

impl FrameClock {
    /// Starts a clock at the wall-clock timestamp `start_ms`.
    pub fn new(start_ms: f64) -> Self {
        Self {
            start_ms,
            elapsed: 0.0,
        }
    }

    /// Recomputes elapsed seconds for a frame starting at `now_ms`.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let seconds = ((now_ms - self.start_ms) / 1000.0) as f32;
        self.elapsed = self.elapsed.max(seconds);
        self.elapsed
    }

    /// Seconds elapsed as of the last tick.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// The timestamp elapsed time is measured from.
    pub fn start_ms(&self) -> f64 {
        self.start_ms
    }
}

/// Shared "keep rendering" flag.
///
/// Cloned into the keyboard handler; the driver reads it at the end of each
/// frame, so clearing it never interrupts a frame in progress.
#[derive(Debug, Clone)]
pub struct RunFlag(Arc<AtomicBool>);

impl RunFlag {
    /// Creates a flag, initially set to `running`.
    pub fn new(running: bool) -> Self {
        Self(Arc::new(AtomicBool::new(running)))
    }

    /// Whether another frame should be scheduled.
    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Sets or clears the flag.
    pub fn set(&self, running: bool) {
        self.0.store(running, Ordering::Relaxed);
    }

    /// Clears the flag; the frame in progress still completes.
    pub fn stop(&self) {
        self.set(false);
    }

    /// Keyboard hook: Escape clears the flag, other keys are ignored.
    ///
    /// Returns whether the key was handled.
    pub fn handle_key(&self, key: &str) -> bool {
        if key == ESCAPE_KEY {
            log::info!("escape pressed, stopping after this frame");
            self.stop();
            true
        } else {
            false
        }
    }
}

/// The drawable the frame driver renders into.
pub trait Surface {
    /// Current size of the host window in pixels.
    fn window_size(&self) -> (u32, u32);

    /// Resizes the backing drawable.
    fn resize(&mut self, width: u32, height: u32);
}

/// Where the driver is in its frame cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// Constructed, no frame rendered yet.
    Idle,
    /// Inside `render_frame`.
    Rendering,
    /// The host should request another refresh callback.
    ScheduledNext,
    /// Terminal: the run flag was clear at the end of the last frame.
    Stopped,
}

/// Owns everything one frame needs: program, vertex buffers, clock, run flag.
#[derive(Debug)]
pub struct FrameDriver<B: GlBackend> {
    program: ProgramParameter<B>,
    vbos: Vec<B::Buffer>,
    vertex_count: i32,
    clock: FrameClock,
    run: RunFlag,
    state: FrameState,
    frames: u64,
}

impl<B: GlBackend> FrameDriver<B> {
    pub fn new(
        program: ProgramParameter<B>,
        vbos: Vec<B::Buffer>,
        vertex_count: i32,
        clock: FrameClock,
        run: RunFlag,
    ) -> Self {
        Self {
            program,
            vbos,
            vertex_count,
            clock,
            run,
            state: FrameState::Idle,
            frames: 0,
        }
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    /// A handle to the run flag, for wiring up input.
    pub fn run_flag(&self) -> RunFlag {
        self.run.clone()
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn program(&self) -> &ProgramParameter<B> {
        &self.program
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Renders one frame and decides whether another should follow.
    ///
    /// Sizes the surface and viewport to the window, selects the program,
    /// rebinds attributes, clears, draws `TRIANGLES` over every vertex and
    /// flushes. Once `Stopped`, further calls do nothing.
    ///
    /// # Errors
    ///
    /// Returns `Error::AttributeCountMismatch` if the buffers no longer match
    /// the program's attribute slots; the driver stops in that case.
    pub fn render_frame<S: Surface>(
        &mut self,
        gl: &B,
        surface: &mut S,
        now_ms: f64,
    ) -> Result<FrameState, Error> {
        if self.state == FrameState::Stopped {
            return Ok(FrameState::Stopped);
        }
        self.state = FrameState::Rendering;

        self.clock.tick(now_ms);

        let (width, height) = surface.window_size();
        surface.resize(width, height);
        gl.viewport(0, 0, width as i32, height as i32);

        gl.use_program(Some(self.program.program()));
        if let Err(e) = set_attribute(gl, &self.vbos, self.program.attributes(), None) {
            self.state = FrameState::Stopped;
            return Err(e);
        }

        gl.clear(glow::COLOR_BUFFER_BIT);
        gl.draw_arrays(glow::TRIANGLES, 0, self.vertex_count);
        gl.flush();
        self.frames += 1;

        self.state = if self.run.is_running() {
            FrameState::ScheduledNext
        } else {
            FrameState::Stopped
        };
        log::debug!(
            "frame {} at {:.3}s ({width}x{height}) -> {:?}",
            self.frames,
            self.clock.elapsed(),
            self.state
        );
        Ok(self.state)
    }

    /// Renders frames back to back until the driver stops.
    ///
    /// `now_ms` is sampled once per frame. Returns the total number of frames
    /// rendered.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`render_frame`](Self::render_frame).
    pub fn run_until_stopped<S, C>(
        &mut self,
        gl: &B,
        surface: &mut S,
        mut now_ms: C,
    ) -> Result<u64, Error>
    where
        S: Surface,
        C: FnMut() -> f64,
    {
        while self.render_frame(gl, surface, now_ms())? != FrameState::Stopped {}
        Ok(self.frames)
    }
}
