use abmviz_core::{Colour, Position, RenderState, ViewerConfig};
use serde::{Deserialize, Serialize};

/// Fixed drawing parameters applied to every point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    pub point_diameter: f64,
    pub stroke_weight: f64,
    pub stroke: Colour,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default())
    }
}

impl RenderStyle {
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            point_diameter: config.point_diameter,
            stroke_weight: config.stroke_weight,
            stroke: config.stroke,
        }
    }
}

/// A single drawing operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Fill the whole surface.
    Clear { colour: Colour },
    /// Filled circle with an outline centred on its edge.
    Circle {
        center: Position,
        diameter: f64,
        fill: Colour,
        stroke: Colour,
        stroke_weight: f64,
    },
}

/// Everything needed to paint one frame, in paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub commands: Vec<DrawCommand>,
}

impl RenderFrame {
    /// Background first, then one circle per point in sequence order, so
    /// later points overlay earlier ones.
    pub fn from_state(state: &RenderState, style: &RenderStyle) -> Self {
        let mut commands = Vec::with_capacity(state.points.len() + 1);
        commands.push(DrawCommand::Clear {
            colour: state.background,
        });
        commands.extend(state.points.iter().map(|p| DrawCommand::Circle {
            center: p.position,
            diameter: style.point_diameter,
            fill: p.colour,
            stroke: style.stroke,
            stroke_weight: style.stroke_weight,
        }));
        Self { commands }
    }

    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count()
    }
}
