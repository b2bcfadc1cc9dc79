//! Color constants for the energy monitor display.
//!
//! Rgb565 uses 16 bits per pixel: 5 bits red, 6 bits green, 5 bits blue.
//! Custom colors are given directly in that range, e.g. `Rgb565::new(31, 52, 12)`
//! is roughly RGB888 (255, 210, 100).

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

// =============================================================================
// Standard Colors (from RgbColor trait)
// =============================================================================

/// Pure black. Used for line art, wiring and text.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white. Page background.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Pure red. Error text on the settings page.
pub const RED: Rgb565 = Rgb565::RED;

// =============================================================================
// Wiring and UI
// =============================================================================

/// Wiring lines between devices.
pub const WIRE: Rgb565 = Rgb565::new(12, 24, 12);

/// Graph grid and axis lines.
pub const GRAY: Rgb565 = Rgb565::new(20, 40, 20);

/// Idle button face.
pub const BUTTON_IDLE: Rgb565 = Rgb565::new(26, 52, 26);

/// Button face while a touch hovers over it.
pub const BUTTON_HOVER: Rgb565 = Rgb565::new(22, 46, 28);

/// Button face while pressed, also used for the selected toggle.
pub const BUTTON_PRESSED: Rgb565 = Rgb565::new(12, 30, 28);

// =============================================================================
// Device Icon Backgrounds
// =============================================================================

/// House icon background, warm yellow.
pub const HOUSE_BG: Rgb565 = Rgb565::new(31, 52, 12);

/// Grid pole icon background, light blue.
pub const GRID_BG: Rgb565 = Rgb565::new(12, 25, 31);

/// Smart meter icon background, light gray.
pub const METER_BG: Rgb565 = Rgb565::new(25, 50, 25);

/// Inverter icon background, pale red.
pub const INVERTER_BG: Rgb565 = Rgb565::new(31, 50, 25);

/// PV panel icon background, pale yellow.
pub const PV_BG: Rgb565 = Rgb565::new(31, 63, 25);

/// Battery icon background, light green.
pub const BATTERY_BG: Rgb565 = Rgb565::new(12, 63, 12);

// =============================================================================
// Energy Blob Colors (by source device)
// =============================================================================

/// Energy coming from the grid side.
pub const GRID_BLOB: Rgb565 = Rgb565::new(4, 20, 31);

/// Energy leaving the house (house exporting).
pub const HOUSE_BLOB: Rgb565 = Rgb565::new(31, 32, 0);

/// Energy produced by PV strings.
pub const PV_BLOB: Rgb565 = Rgb565::new(31, 56, 0);

/// Energy discharged from or charged into a battery.
pub const BATTERY_BLOB: Rgb565 = Rgb565::new(0, 48, 8);

/// Energy exported by an inverter onto the AC bus.
pub const INVERTER_BLOB: Rgb565 = Rgb565::new(28, 12, 10);
