use serde::{Deserialize, Serialize};

use crate::Colour;

/// A 2D position in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One drawable marker. The British spelling of `colour` is the wire name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub position: Position,
    pub colour: Colour,
}

impl Point {
    pub fn new(x: f64, y: f64, colour: Colour) -> Self {
        Self {
            position: Position::new(x, y),
            colour,
        }
    }
}
