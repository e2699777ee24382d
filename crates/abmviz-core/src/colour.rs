use serde::{Deserialize, Serialize};

/// RGB colour as it travels on the wire: `{"red": .., "green": .., "blue": ..}`.
///
/// Channels are `u8`, so values outside `0..=255` are rejected when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Colour {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Colour {
    pub const BLACK: Colour = Colour::new(0, 0, 0);
    pub const WHITE: Colour = Colour::new(255, 255, 255);
    /// Surface colour before the first frame is drawn.
    pub const SETUP: Colour = Colour::new(255, 255, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Pack into a `0x00RRGGBB` pixel.
    pub fn to_rgb_u32(&self) -> u32 {
        ((self.red as u32) << 16) | ((self.green as u32) << 8) | self.blue as u32
    }

    pub fn from_rgb_u32(pixel: u32) -> Self {
        Self {
            red: ((pixel >> 16) & 0xFF) as u8,
            green: ((pixel >> 8) & 0xFF) as u8,
            blue: (pixel & 0xFF) as u8,
        }
    }
}
