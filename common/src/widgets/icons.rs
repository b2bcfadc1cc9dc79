//! Line-art device glyphs.
//!
//! Each glyph is a static table of strokes in icon units, spanning roughly
//! -7..7 on both axes around the icon center, drawn over a filled background
//! circle of radius 7 units. [`ICON_SCALE`] converts units to pixels.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Arc, Circle, CornerRadii, Line, PrimitiveStyle, Rectangle, RoundedRectangle};

use crate::colors::{BATTERY_BG, BLACK, GRID_BG, HOUSE_BG, INVERTER_BG, METER_BG, PV_BG, WHITE};
use crate::config::ICON_SCALE;
use crate::geometry::Vec2;

/// Radius of the background circle in icon units.
const BACKGROUND_RADIUS: f32 = 7.0;

/// Stroke width in icon units.
const STROKE_UNITS: f32 = 0.5;

#[derive(Clone, Copy, Debug)]
enum Stroke {
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
    /// Corner radii clockwise from top left.
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radii: [f32; 4],
    },
    /// Angles in degrees, sweep signed.
    Arc {
        x: f32,
        y: f32,
        r: f32,
        start: f32,
        sweep: f32,
    },
}

const fn line(
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
) -> Stroke {
    Stroke::Line { x1, y1, x2, y2 }
}

const fn rect(
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    radii: [f32; 4],
) -> Stroke {
    Stroke::Rect { x, y, w, h, radii }
}

// =============================================================================
// Shape Tables
// =============================================================================

static HOUSE: [Stroke; 3] = [
    rect(-4.0, -2.0, 8.0, 7.0, [0.0, 0.0, 2.0, 2.0]),
    line(-5.0, -1.0, 0.0, -6.0),
    line(5.0, -1.0, 0.0, -6.0),
];

static POLE: [Stroke; 7] = [
    line(-4.0, 5.0, 0.0, -6.0),
    line(4.0, 5.0, 0.0, -6.0),
    line(-4.0, 5.0, 2.0, 0.0),
    line(4.0, 5.0, -2.0, 0.0),
    line(-2.0, -0.5, 2.0, -0.5),
    line(-5.0, -2.0, 5.0, -2.0),
    line(-3.0, -4.0, 3.0, -4.0),
];

static METER: [Stroke; 2] = [
    rect(-4.0, -5.0, 8.0, 10.0, [1.0; 4]),
    rect(-3.0, -2.0, 6.0, 4.0, [0.0; 4]),
];

static INVERTER: [Stroke; 6] = [
    rect(-4.0, -5.0, 8.0, 10.0, [2.0; 4]),
    line(-2.0, 3.0, 2.0, -3.0),
    line(-3.0, -3.0, -2.0, -3.0),
    line(-3.0, -2.0, -2.0, -2.0),
    Stroke::Arc {
        x: 1.0,
        y: 3.0,
        r: 1.5,
        start: 225.0,
        sweep: -110.0,
    },
    Stroke::Arc {
        x: 2.0,
        y: 1.0,
        r: 1.5,
        start: 75.0,
        sweep: -120.0,
    },
];

static PV: [Stroke; 6] = [
    line(-3.0, -3.0, 3.0, -3.0),
    line(-5.0, 3.0, 5.0, 3.0),
    line(-3.0, -3.0, -5.0, 3.0),
    line(3.0, -3.0, 5.0, 3.0),
    line(-4.0, -1.0, 4.0, -1.0),
    line(0.0, -3.0, 1.0, 3.0),
];

static BATTERY: [Stroke; 2] = [
    rect(-2.0, -4.0, 4.0, 8.0, [1.0; 4]),
    rect(-1.0, -5.0, 2.0, 1.0, [0.0; 4]),
];

// =============================================================================
// Icons
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Icon {
    House,
    Pole,
    Meter,
    Inverter,
    Pv,
    Battery,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IconStyle {
    pub color: Rgb565,
    pub background: Option<Rgb565>,
}

impl Icon {
    fn strokes(self) -> &'static [Stroke] {
        match self {
            Self::House => &HOUSE,
            Self::Pole => &POLE,
            Self::Meter => &METER,
            Self::Inverter => &INVERTER,
            Self::Pv => &PV,
            Self::Battery => &BATTERY,
        }
    }

    /// Default look on the overview page.
    pub const fn style(self) -> IconStyle {
        let (color, background) = match self {
            Self::House => (BLACK, HOUSE_BG),
            Self::Pole => (WHITE, GRID_BG),
            Self::Meter => (BLACK, METER_BG),
            Self::Inverter => (BLACK, INVERTER_BG),
            Self::Pv => (BLACK, PV_BG),
            Self::Battery => (BLACK, BATTERY_BG),
        };
        IconStyle {
            color,
            background: Some(background),
        }
    }
}

#[inline]
fn to_px(
    center: Vec2,
    x: f32,
    y: f32,
) -> Point {
    Vec2::new(center.x + x * ICON_SCALE, center.y + y * ICON_SCALE).to_point()
}

#[inline]
fn units_to_px(units: f32) -> u32 { micromath::F32(units * ICON_SCALE).round().0.max(0.0) as u32 }

/// Draw `icon` centered on `center` (screen coordinates).
pub fn draw_icon<D>(
    display: &mut D,
    icon: Icon,
    center: Vec2,
    style: IconStyle,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if let Some(bg) = style.background {
        Circle::with_center(center.to_point(), units_to_px(BACKGROUND_RADIUS * 2.0))
            .into_styled(PrimitiveStyle::with_fill(bg))
            .draw(display)
            .ok();
    }

    let pen = PrimitiveStyle::with_stroke(style.color, units_to_px(STROKE_UNITS).max(1));
    for stroke in icon.strokes() {
        match *stroke {
            Stroke::Line { x1, y1, x2, y2 } => {
                Line::new(to_px(center, x1, y1), to_px(center, x2, y2))
                    .into_styled(pen)
                    .draw(display)
                    .ok();
            }
            Stroke::Rect { x, y, w, h, radii } => {
                let bounds = Rectangle::new(to_px(center, x, y), Size::new(units_to_px(w), units_to_px(h)));
                let corner = |r: f32| Size::new(units_to_px(r), units_to_px(r));
                let radii = CornerRadii {
                    top_left: corner(radii[0]),
                    top_right: corner(radii[1]),
                    bottom_right: corner(radii[2]),
                    bottom_left: corner(radii[3]),
                };
                RoundedRectangle::new(bounds, radii).into_styled(pen).draw(display).ok();
            }
            Stroke::Arc { x, y, r, start, sweep } => {
                let top_left = to_px(center, x - r, y - r);
                Arc::new(top_left, units_to_px(r * 2.0), Angle::from_degrees(start), Angle::from_degrees(sweep))
                    .into_styled(pen)
                    .draw(display)
                    .ok();
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CountingDisplay;

    const ALL: [Icon; 6] = [Icon::House, Icon::Pole, Icon::Meter, Icon::Inverter, Icon::Pv, Icon::Battery];

    #[test]
    fn test_icons_draw_background_and_strokes() {
        for icon in ALL {
            let mut display = CountingDisplay::new();
            let style = icon.style();
            draw_icon(&mut display, icon, Vec2::new(120.0, 120.0), style);
            assert_eq!(display.pixel(111, 120), style.background, "{icon:?}");
            assert!(display.count_color(style.color) > 0, "{icon:?}");
            assert_eq!(display.out_of_bounds, 0);
        }
    }

    #[test]
    fn test_icon_without_background() {
        let mut display = CountingDisplay::new();
        let style = IconStyle {
            color: BLACK,
            background: None,
        };
        draw_icon(&mut display, Icon::Meter, Vec2::new(50.0, 50.0), style);
        assert_eq!(display.pixel(41, 50), Some(WHITE));
        assert!(display.count_color(BLACK) > 0);
    }

    #[test]
    fn test_icon_partly_off_screen() {
        let mut display = CountingDisplay::new();
        draw_icon(&mut display, Icon::House, Vec2::new(-2.0, 5.0), Icon::House.style());
        assert!(display.drawn > 0);
        assert_eq!(display.pixel(5, 5), Some(HOUSE_BG));
    }
}
