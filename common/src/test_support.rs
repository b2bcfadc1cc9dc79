//! Host-side helpers shared by the unit tests.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Frame buffer that records how many pixels were drawn.
pub struct CountingDisplay {
    pub pixels: std::vec::Vec<Rgb565>,
    pub drawn: usize,
    pub out_of_bounds: usize,
}

impl CountingDisplay {
    pub fn new() -> Self {
        Self {
            pixels: vec![Rgb565::WHITE; (SCREEN_WIDTH * SCREEN_HEIGHT) as usize],
            drawn: 0,
            out_of_bounds: 0,
        }
    }

    pub fn pixel(
        &self,
        x: i32,
        y: i32,
    ) -> Option<Rgb565> {
        if x < 0 || y < 0 || x >= SCREEN_WIDTH as i32 || y >= SCREEN_HEIGHT as i32 {
            return None;
        }
        self.pixels.get((y as u32 * SCREEN_WIDTH + x as u32) as usize).copied()
    }

    /// Number of pixels with exactly `color`.
    pub fn count_color(
        &self,
        color: Rgb565,
    ) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }
}

impl OriginDimensions for CountingDisplay {
    fn size(&self) -> Size { Size::new(SCREEN_WIDTH, SCREEN_HEIGHT) }
}

impl DrawTarget for CountingDisplay {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, color) in pixels {
            if p.x < 0 || p.y < 0 || p.x >= SCREEN_WIDTH as i32 || p.y >= SCREEN_HEIGHT as i32 {
                self.out_of_bounds += 1;
                continue;
            }
            self.pixels[(p.y as u32 * SCREEN_WIDTH + p.x as u32) as usize] = color;
            self.drawn += 1;
        }
        Ok(())
    }
}
