//! # abmviz Client
//!
//! The receive-only side of the viewer: one WebSocket connection to the
//! simulation server whose text frames are applied to a
//! [`RenderState`](abmviz_core::RenderState).
//!
//! The socket is non-blocking after the handshake so the caller can
//! interleave [`RenderFeed::pump`] with render ticks on a single thread.

pub mod connection;

pub use connection::{
    Connection, ConnectionError, ConnectionState, ConnectionStats, RenderFeed, DEFAULT_FRAME_BUDGET,
};
