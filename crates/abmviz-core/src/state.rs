use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::{InboundMessage, MessageError, RenderPayload};
use crate::{Colour, Point};

/// What [`RenderState::apply`] did with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// A `render` payload replaced the state.
    Replaced { points: usize },
    /// The message kind is not consumed here; state untouched.
    Ignored { kind: String },
}

/// The latest visualisation payload received from the server.
///
/// Created once at startup and owned by the viewer loop, which lends it
/// mutably to the connection and immutably to the renderer. A `render`
/// message always replaces all three fields together.
///
/// Equality compares the drawable content only, not how many payloads
/// produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderState {
    /// Points in draw order.
    pub points: Vec<Point>,
    /// Opaque viewport metadata from the server.
    pub viewport_meta: Vec<Value>,
    pub background: Colour,
    /// Number of `render` payloads applied so far.
    #[serde(skip)]
    revision: u64,
}

impl RenderState {
    pub fn new(background: Colour) -> Self {
        Self {
            points: Vec::new(),
            viewport_meta: Vec::new(),
            background,
            revision: 0,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn replace(&mut self, payload: RenderPayload) {
        self.points = payload.cpp;
        self.viewport_meta = payload.vp;
        self.background = payload.bg;
        self.revision += 1;
    }

    pub fn apply(&mut self, message: InboundMessage) -> Applied {
        match message {
            InboundMessage::Render(payload) => {
                self.replace(payload);
                log::debug!(
                    "Render payload applied: {} points, revision {}",
                    self.points.len(),
                    self.revision
                );
                Applied::Replaced {
                    points: self.points.len(),
                }
            }
            InboundMessage::Other { kind } => {
                log::debug!("Ignoring message of kind '{}'", kind);
                Applied::Ignored { kind }
            }
        }
    }

    /// Parse a raw text frame and apply it. On error the state is unchanged.
    pub fn apply_text(&mut self, text: &str, limit: usize) -> Result<Applied, MessageError> {
        let message = InboundMessage::parse_bounded(text, limit)?;
        Ok(self.apply(message))
    }
}

impl PartialEq for RenderState {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points
            && self.viewport_meta == other.viewport_meta
            && self.background == other.background
    }
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new(Colour::BLACK)
    }
}
