//! Pre-computed static text styles to avoid per-frame object construction.
//!
//! Styles that need a dynamic color use [`LABEL_FONT`] with
//! `MonoTextStyle::new(LABEL_FONT, color)`.

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::Rgb565,
    text::{Alignment, TextStyle, TextStyleBuilder},
};
use profont::{PROFONT_9_POINT, PROFONT_12_POINT};

use crate::colors::BLACK;

// =============================================================================
// Text Alignment Styles
// =============================================================================

/// Centered text alignment. Used for button labels and titles.
pub const CENTERED: TextStyle = TextStyleBuilder::new().alignment(Alignment::Center).build();

/// Left-aligned text. Used for lists and legends.
pub const LEFT_ALIGNED: TextStyle = TextStyleBuilder::new().alignment(Alignment::Left).build();

/// Right-aligned text. Used for axis labels and the FPS readout.
pub const RIGHT_ALIGNED: TextStyle = TextStyleBuilder::new().alignment(Alignment::Right).build();

// =============================================================================
// Fonts
// =============================================================================

/// Small font for labels, power readouts and buttons.
pub const LABEL_FONT: &MonoFont<'static> = &PROFONT_9_POINT;

/// Page title font.
pub const TITLE_FONT: &MonoFont<'static> = &PROFONT_12_POINT;

// =============================================================================
// Pre-built Styles
// =============================================================================

pub const LABEL_STYLE_BLACK: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(LABEL_FONT, BLACK);

pub const TITLE_STYLE_BLACK: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(TITLE_FONT, BLACK);
