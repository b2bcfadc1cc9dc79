//! Display, layout and topology constants.
//!
//! All coordinates are in display pixels of the 240x240 panel. Positions inside
//! the inverter region (`x <= X_INV_CONN`) are content coordinates: the user can
//! scroll that region vertically, so their screen y is `y + y_offset`.

use crate::geometry::Rect;

// =============================================================================
// Display Configuration
// =============================================================================

/// Display width in pixels.
pub const SCREEN_WIDTH: u32 = 240;

/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 240;

/// Width of one page in the horizontal page strip.
pub const PAGE_WIDTH: f32 = SCREEN_WIDTH as f32;

/// Number of pages in the strip (overview, history, settings).
pub const PAGE_COUNT: usize = 3;

/// Touch panel resolution divided by display resolution.
pub const TOUCH_SCALE: f32 = 2.0;

/// Height of the title strip at the top of each page.
pub const HEADER_HEIGHT: f32 = 24.0;

// =============================================================================
// Frame Pacing
// =============================================================================

/// Frame budget in milliseconds (~60 FPS).
pub const FRAME_BUDGET_MS: u32 = 16;

/// Touch sampling period in milliseconds (~20 Hz).
pub const TOUCH_PERIOD_MS: u32 = 50;

/// Weight of the new value in the page and scroll smoothing filters.
pub const OFFSET_SMOOTHING: f32 = 0.2;

/// Weight of the new frame time in the FPS smoothing filter.
pub const FRAME_TIME_SMOOTHING: f32 = 0.1;

// =============================================================================
// Overview Topology
// =============================================================================

/// Main horizontal bus line.
pub const Y_BUS: f32 = 160.0;

/// Vertical inverter bus connecting every inverter group to the main bus.
pub const X_INV_CONN: f32 = 80.0;

/// Vertical connector from the main bus up to the house.
pub const X_HOUSE_CONN: f32 = 140.0;

/// House anchor at the top of the house connector.
pub const Y_HOUSE: f32 = 105.0;

/// Smart meter anchor on the main bus.
pub const X_METER: f32 = 185.0;

/// Grid pole anchor at the right end of the main bus.
pub const X_GRID: f32 = 220.0;

/// PV string anchor on an inverter group branch.
pub const X_PV: f32 = 12.0;

/// Battery anchor on an inverter group branch.
pub const X_BAT: f32 = 35.0;

/// Inverter anchor on an inverter group branch.
pub const X_INV: f32 = 58.0;

/// Vertical distance between two inverter group branches.
pub const GROUP_HEIGHT: f32 = 36.0;

/// Scale applied to icon shape tables (shapes span roughly -7..7 units).
pub const ICON_SCALE: f32 = 1.5;

/// Scrollable viewport holding the inverter groups.
pub const INVERTER_VIEW: Rect = Rect::new(0.0, HEADER_HEIGHT, X_INV_CONN + 12.0, SCREEN_HEIGHT as f32 - HEADER_HEIGHT);

/// Viewport blobs are clipped to.
pub const BLOB_VIEW: Rect = Rect::new(0.0, HEADER_HEIGHT, PAGE_WIDTH, SCREEN_HEIGHT as f32 - HEADER_HEIGHT);

// Compile-time validation: the topology must be ordered left to right
const _: () = assert!(X_PV < X_BAT);
const _: () = assert!(X_BAT < X_INV);
const _: () = assert!(X_INV < X_INV_CONN);
const _: () = assert!(X_INV_CONN < X_HOUSE_CONN);
const _: () = assert!(X_HOUSE_CONN < X_METER);
const _: () = assert!(X_METER < X_GRID);
const _: () = assert!(Y_HOUSE < Y_BUS);
