//! # abmviz Renderer
//!
//! Turns a [`RenderState`](abmviz_core::RenderState) into pixels.
//!
//! Each tick builds a [`RenderFrame`], an ordered list of JSON-serializable
//! draw commands, and rasterizes it onto a [`Canvas`] of `0x00RRGGBB` pixels
//! that any framebuffer window can present. [`FrameClock`] paces the ticks.

pub mod canvas;
pub mod frame_clock;
pub mod render_data;

pub use canvas::Canvas;
pub use frame_clock::FrameClock;
pub use render_data::{DrawCommand, RenderFrame, RenderStyle};
