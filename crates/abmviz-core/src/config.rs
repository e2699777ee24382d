use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Colour;

pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8080/ws";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid viewer config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Canvas size must be non-zero, got {width}x{height}")]
    EmptyCanvas { width: usize, height: usize },

    #[error("Frame rate must be at least 1 per second")]
    ZeroFrameRate,

    #[error("Point diameter must be positive, got {0}")]
    InvalidDiameter(f64),

    #[error("Stroke weight must be zero or positive, got {0}")]
    InvalidStrokeWeight(f64),
}

/// Settings for the debug viewer.
///
/// Every field has a default, so a partial JSON document only overrides the
/// keys it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub endpoint: String,
    pub window_title: String,
    pub canvas_width: usize,
    pub canvas_height: usize,
    /// Redraws per second.
    pub frame_rate: u32,
    pub point_diameter: f64,
    pub stroke_weight: f64,
    pub stroke: Colour,
    /// Background shown until the first `render` message arrives.
    pub initial_background: Colour,
    pub max_message_bytes: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            window_title: "abm viewport".to_string(),
            canvas_width: 600,
            canvas_height: 400,
            frame_rate: 5,
            point_diameter: 15.0,
            stroke_weight: 1.0,
            stroke: Colour::WHITE,
            initial_background: Colour::BLACK,
            max_message_bytes: 4 * 1024 * 1024,
        }
    }
}

impl ViewerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(ConfigError::EmptyCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        if self.frame_rate == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }
        // Written as negations so NaN is rejected too.
        if !(self.point_diameter > 0.0) {
            return Err(ConfigError::InvalidDiameter(self.point_diameter));
        }
        if !(self.stroke_weight >= 0.0) {
            return Err(ConfigError::InvalidStrokeWeight(self.stroke_weight));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
