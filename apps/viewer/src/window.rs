use abmviz_core::ViewerConfig;
use abmviz_renderer::Canvas;
use minifb::{Key, Window, WindowOptions};

use crate::error::ViewerError;

/// Where finished frames go.
pub trait FrameSink {
    /// False once the user has closed the surface.
    fn is_open(&self) -> bool;

    fn present(&mut self, canvas: &Canvas) -> Result<(), ViewerError>;

    /// Service window events between frames.
    fn idle(&mut self) -> Result<(), ViewerError>;
}

/// An on-screen window sized to the canvas. Escape closes it.
pub struct WindowSink {
    window: Window,
}

impl WindowSink {
    pub fn open(config: &ViewerConfig) -> Result<Self, ViewerError> {
        let window = Window::new(
            &config.window_title,
            config.canvas_width,
            config.canvas_height,
            WindowOptions::default(),
        )
        .map_err(|e| ViewerError::Window(e.to_string()))?;
        log::info!(
            "Opened {}x{} viewport window",
            config.canvas_width,
            config.canvas_height
        );
        Ok(Self { window })
    }
}

impl FrameSink for WindowSink {
    fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    fn present(&mut self, canvas: &Canvas) -> Result<(), ViewerError> {
        self.window
            .update_with_buffer(canvas.pixels(), canvas.width(), canvas.height())
            .map_err(|e| ViewerError::Window(e.to_string()))
    }

    fn idle(&mut self) -> Result<(), ViewerError> {
        self.window.update();
        Ok(())
    }
}
