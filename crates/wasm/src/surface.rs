//! Canvas that tracks the browser window size.

use first_triangle_core::Surface;
use web_sys::{HtmlCanvasElement, Window};

pub struct CanvasSurface {
    window: Window,
    canvas: HtmlCanvasElement,
}

impl CanvasSurface {
    pub fn new(window: Window, canvas: HtmlCanvasElement) -> Self {
        Self { window, canvas }
    }
}

impl Surface for CanvasSurface {
    fn window_size(&self) -> (u32, u32) {
        let width = self.window.inner_width().ok().and_then(|v| v.as_f64());
        let height = self.window.inner_height().ok().and_then(|v| v.as_f64());
        match (width, height) {
            (Some(w), Some(h)) => (w as u32, h as u32),
            // Keep the current drawable size if the window cannot be measured.
            _ => (self.canvas.width(), self.canvas.height()),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.canvas.width() != width {
            self.canvas.set_width(width);
        }
        if self.canvas.height() != height {
            self.canvas.set_height(height);
        }
    }
}
