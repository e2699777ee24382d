//! # abmviz Core
//!
//! Data model shared by the debug viewer: the render state pushed by the
//! simulation server, the inbound message envelope it arrives in, and the
//! viewer settings.
//!
//! Nothing in this crate touches the network or a drawing surface.

pub mod colour;
pub mod config;
pub mod geometry;
pub mod message;
pub mod state;

pub use colour::Colour;
pub use config::{ConfigError, ViewerConfig};
pub use geometry::{Point, Position};
pub use message::{InboundMessage, MessageError, RenderPayload};
pub use state::RenderState;
