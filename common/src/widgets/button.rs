//! Touch button with an idle/hovered/pressed state machine.
//!
//! A button captures a touch that starts inside it. While captured, the
//! button shows pressed when the finger is over it; releasing over the
//! button is a click. A touch that started elsewhere only hovers.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, RoundedRectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyle, TextStyleBuilder};

use crate::colors::{BLACK, BUTTON_HOVER, BUTTON_IDLE, BUTTON_PRESSED};
use crate::geometry::{Rect, Vec2};
use crate::styles::LABEL_FONT;
use crate::touch::{TouchInfo, TouchPhase};

const LABEL_STYLE: TextStyle = TextStyleBuilder::new().alignment(Alignment::Center).baseline(Baseline::Middle).build();

const CORNER_RADIUS: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Idle,
    Hovered,
    Pressed,
}

/// Outcome of feeding one touch frame to a button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ButtonResponse {
    /// The button owns this touch; page-level dragging must not react.
    pub handled: bool,
    /// The touch was released over the button.
    pub clicked: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct Button {
    /// Bounds in page coordinates.
    pub rect: Rect,
    pub label: &'static str,
    state: ButtonState,
    captured: bool,
}

impl Button {
    pub const fn new(
        rect: Rect,
        label: &'static str,
    ) -> Self {
        Self {
            rect,
            label,
            state: ButtonState::Idle,
            captured: false,
        }
    }

    #[inline]
    pub const fn state(&self) -> ButtonState { self.state }

    /// Update from a touch frame. `x_offset` is the page's current horizontal offset.
    pub fn handle_touch(
        &mut self,
        touch: &TouchInfo,
        x_offset: f32,
    ) -> ButtonResponse {
        let inside = self.rect.translate(x_offset, 0.0).contains(touch.pos);
        let mut response = ButtonResponse::default();

        match touch.phase {
            TouchPhase::None => {
                self.state = ButtonState::Idle;
                self.captured = false;
            }
            TouchPhase::Started => {
                self.captured = inside;
                self.state = if inside { ButtonState::Pressed } else { ButtonState::Idle };
                response.handled = inside;
            }
            TouchPhase::Continuing => {
                self.state = match (self.captured, inside) {
                    (true, true) => ButtonState::Pressed,
                    (false, true) => ButtonState::Hovered,
                    (_, false) => ButtonState::Idle,
                };
                response.handled = self.captured;
            }
            TouchPhase::Ended => {
                response.handled = self.captured;
                response.clicked = self.captured && inside;
                self.state = ButtonState::Idle;
                self.captured = false;
            }
        }
        response
    }

    /// Draw at the page's horizontal offset. `selected` marks the active choice of a group.
    pub fn draw<D>(
        &self,
        display: &mut D,
        x_offset: f32,
        selected: bool,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let fill = match self.state {
            ButtonState::Pressed => BUTTON_PRESSED,
            ButtonState::Hovered => BUTTON_HOVER,
            ButtonState::Idle if selected => BUTTON_HOVER,
            ButtonState::Idle => BUTTON_IDLE,
        };
        let rect = self.rect.translate(x_offset, 0.0);
        let style = PrimitiveStyleBuilder::new()
            .fill_color(fill)
            .stroke_color(BLACK)
            .stroke_width(if selected { 2 } else { 1 })
            .build();
        RoundedRectangle::with_equal_corners(rect.to_rectangle(), Size::new(CORNER_RADIUS, CORNER_RADIUS))
            .into_styled(style)
            .draw(display)
            .ok();

        let center: Vec2 = rect.center();
        Text::with_text_style(self.label, center.to_point(), MonoTextStyle::new(LABEL_FONT, BLACK), LABEL_STYLE)
            .draw(display)
            .ok();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CountingDisplay;

    fn touch(
        prev: Option<(f32, f32)>,
        cur: Option<(f32, f32)>,
    ) -> TouchInfo {
        TouchInfo::from_samples(prev.map(|(x, y)| Vec2::new(x, y)), cur.map(|(x, y)| Vec2::new(x, y)))
    }

    fn button() -> Button { Button::new(Rect::new(10.0, 10.0, 40.0, 20.0), "OK") }

    #[test]
    fn test_tap_clicks() {
        let mut b = button();
        let r = b.handle_touch(&touch(None, Some((20.0, 20.0))), 0.0);
        assert!(r.handled && !r.clicked);
        assert_eq!(b.state(), ButtonState::Pressed);
        let r = b.handle_touch(&touch(Some((20.0, 20.0)), None), 0.0);
        assert!(r.handled && r.clicked);
        assert_eq!(b.state(), ButtonState::Idle);
    }

    #[test]
    fn test_release_outside_cancels() {
        let mut b = button();
        b.handle_touch(&touch(None, Some((20.0, 20.0))), 0.0);
        let r = b.handle_touch(&touch(Some((20.0, 20.0)), Some((100.0, 20.0))), 0.0);
        assert!(r.handled);
        assert_eq!(b.state(), ButtonState::Idle);
        let r = b.handle_touch(&touch(Some((100.0, 20.0)), None), 0.0);
        assert!(r.handled && !r.clicked);
    }

    #[test]
    fn test_foreign_touch_only_hovers() {
        let mut b = button();
        let r = b.handle_touch(&touch(None, Some((100.0, 20.0))), 0.0);
        assert!(!r.handled);
        let r = b.handle_touch(&touch(Some((100.0, 20.0)), Some((20.0, 20.0))), 0.0);
        assert!(!r.handled);
        assert_eq!(b.state(), ButtonState::Hovered);
        let r = b.handle_touch(&touch(Some((20.0, 20.0)), None), 0.0);
        assert!(!r.clicked);
    }

    #[test]
    fn test_page_offset_moves_hit_area() {
        let mut b = button();
        let r = b.handle_touch(&touch(None, Some((20.0, 20.0))), 240.0);
        assert!(!r.handled);
        let r = b.handle_touch(&touch(None, Some((260.0, 20.0))), 240.0);
        assert!(r.handled);
    }

    #[test]
    fn test_draw_fills_rect() {
        let mut display = CountingDisplay::new();
        button().draw(&mut display, 0.0, false);
        assert_eq!(display.pixel(15, 15), Some(BUTTON_IDLE));
        assert_eq!(display.out_of_bounds, 0);
    }
}
