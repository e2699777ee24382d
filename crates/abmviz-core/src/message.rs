//! Inbound wire messages.
//!
//! Every text frame from the server is a JSON object tagged by `type`:
//!
//! ```text
//! { "type": "render", "data": { "cpp": [Point...], "vp": [...], "bg": Colour } }
//! ```
//!
//! Only `render` carries a payload this viewer consumes. Any other tag parses
//! to [`InboundMessage::Other`] so newer servers can add message kinds freely.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{Colour, Point};

pub const RENDER_KIND: &str = "render";

// ── Errors ────────────────────────────────────────────────────────────

/// A frame that could not be turned into an [`InboundMessage`].
#[derive(Error, Debug)]
pub enum MessageError {
    #[error("Malformed message: invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Malformed message: expected an object with a string `type`")]
    MissingType,

    #[error("Malformed message: `render` message has no `data`")]
    MissingPayload,

    #[error("Malformed message: invalid `render` payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    #[error("Malformed message: {len} bytes exceeds the {limit} byte limit")]
    TooLarge { len: usize, limit: usize },
}

// ── Messages ──────────────────────────────────────────────────────────

/// Body of a `render` message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPayload {
    /// Points to draw, in draw order.
    pub cpp: Vec<Point>,
    /// Viewport metadata, passed through untouched. Absent or `null` reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub vp: Vec<Value>,
    /// Background colour.
    pub bg: Colour,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    Render(RenderPayload),
    /// Any tag other than `render`. Carries the tag for logging only.
    Other { kind: String },
}

impl InboundMessage {
    /// Parse one text frame.
    pub fn parse(text: &str) -> Result<Self, MessageError> {
        let value: Value = serde_json::from_str(text).map_err(MessageError::InvalidJson)?;
        Self::from_value(value)
    }

    /// Parse one text frame, rejecting it up front if it is longer than `limit` bytes.
    pub fn parse_bounded(text: &str, limit: usize) -> Result<Self, MessageError> {
        if text.len() > limit {
            return Err(MessageError::TooLarge {
                len: text.len(),
                limit,
            });
        }
        Self::parse(text)
    }

    pub fn from_value(mut value: Value) -> Result<Self, MessageError> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(MessageError::MissingType)?
            .to_string();

        if kind != RENDER_KIND {
            return Ok(InboundMessage::Other { kind });
        }

        let data = match value.get_mut("data").map(Value::take) {
            None | Some(Value::Null) => return Err(MessageError::MissingPayload),
            Some(data) => data,
        };
        let payload = serde_json::from_value(data).map_err(MessageError::InvalidPayload)?;
        Ok(InboundMessage::Render(payload))
    }
}
