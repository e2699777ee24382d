use abmviz_core::{Colour, Position};

use crate::render_data::{DrawCommand, RenderFrame};

/// A fixed-size software drawing surface.
///
/// Pixels are `0x00RRGGBB`, row-major, so the buffer can be handed directly
/// to a framebuffer window. Pixel `(i, j)` is sampled at its centre
/// `(i + 0.5, j + 0.5)` in canvas units.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, fill: Colour) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill.to_rgb_u32(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Colour at pixel `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Colour> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(Colour::from_rgb_u32(self.pixels[y * self.width + x]))
    }

    pub fn clear(&mut self, colour: Colour) {
        self.pixels.fill(colour.to_rgb_u32());
    }

    /// Draw a filled circle with an outline straddling its edge.
    ///
    /// Anything outside the surface is clipped; non-finite input draws nothing.
    pub fn draw_circle(
        &mut self,
        center: Position,
        diameter: f64,
        fill: Colour,
        stroke: Colour,
        stroke_weight: f64,
    ) {
        if !center.is_finite() || !diameter.is_finite() || !stroke_weight.is_finite() {
            log::trace!("Skipping circle with non-finite geometry at {:?}", center);
            return;
        }
        if self.width == 0 || self.height == 0 {
            return;
        }

        let radius = diameter / 2.0;
        let half_stroke = stroke_weight.max(0.0) / 2.0;
        let outer = radius + half_stroke;

        let x0 = ((center.x - outer).floor() as i64).max(0);
        let y0 = ((center.y - outer).floor() as i64).max(0);
        let x1 = ((center.x + outer).ceil() as i64).min(self.width as i64 - 1);
        let y1 = ((center.y + outer).ceil() as i64).min(self.height as i64 - 1);
        if x0 > x1 || y0 > y1 {
            return;
        }

        let fill = fill.to_rgb_u32();
        let stroke = stroke.to_rgb_u32();
        for y in y0..=y1 {
            let row = y as usize * self.width;
            for x in x0..=x1 {
                let sample = Position::new(x as f64 + 0.5, y as f64 + 0.5);
                let d = sample.distance_to(&center);
                if half_stroke > 0.0 && (d - radius).abs() <= half_stroke {
                    self.pixels[row + x as usize] = stroke;
                } else if d <= radius {
                    self.pixels[row + x as usize] = fill;
                }
            }
        }
    }

    pub fn execute(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::Clear { colour } => self.clear(*colour),
            DrawCommand::Circle {
                center,
                diameter,
                fill,
                stroke,
                stroke_weight,
            } => self.draw_circle(*center, *diameter, *fill, *stroke, *stroke_weight),
        }
    }

    pub fn render(&mut self, frame: &RenderFrame) {
        for command in &frame.commands {
            self.execute(command);
        }
    }
}
