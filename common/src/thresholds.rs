//! Energy simulation thresholds and capacities.
//!
//! None of these are configurable at runtime. Capacities size the fixed
//! collections; exceeding them is a logged, lossy condition.

use crate::config::{GROUP_HEIGHT, Y_BUS};

// =============================================================================
// Spawning and Matching
// =============================================================================

/// Minimum energy (watt-seconds) a blob or a match must exceed.
pub const SPAWN_THRESHOLD_WS: f32 = 5.0;

/// Simulated time between two spawn ticks.
pub const SPAWN_PERIOD_MS: u32 = 1000;

/// Unmatched inverter export above this is reported as a warning.
pub const UNMATCHED_WARN_WS: f32 = 100.0;

// =============================================================================
// Blob Movement
// =============================================================================

/// Blob travel speed in pixels per millisecond.
pub const BLOB_SPEED_PX_PER_MS: f32 = 0.05;

/// Manhattan distance below which a blob counts as delivered.
pub const ARRIVAL_DISTANCE: f32 = 3.0;

/// Lower bound of sane blob coordinates.
pub const STRAY_MIN: f32 = -100.0;

/// Upper bound of sane blob coordinates.
pub const STRAY_MAX: f32 = 300.0;

/// Blob radius is this factor times the square root of its energy.
pub const BLOB_RADIUS_FACTOR: f32 = 0.2;

// =============================================================================
// Capacities
// =============================================================================

/// Maximum number of blobs in flight.
pub const MAX_BLOBS: usize = 32;

/// Maximum number of generic (non house/meter) accumulators.
pub const MAX_ACCUMULATORS: usize = 32;

/// Maximum number of inverter groups drawn and simulated.
pub const MAX_INVERTER_GROUPS: usize = 8;

/// Samples kept per history curve and range.
pub const MAX_HISTORY_SAMPLES: usize = 512;

/// Distinct units (axis scales) on the history page.
pub const MAX_CURVE_SCALES: usize = 12;

/// Configured inverter IP addresses.
pub const MAX_CONFIGURED_IPS: usize = 32;

// Compile-time validation
const _: () = assert!(SPAWN_THRESHOLD_WS < UNMATCHED_WARN_WS);
const _: () = assert!(ARRIVAL_DISTANCE > 0.0);
const _: () = assert!(STRAY_MIN < STRAY_MAX);
// Every group member needs an accumulator
const _: () = assert!(MAX_INVERTER_GROUPS * 3 <= MAX_ACCUMULATORS);
// The outermost group branches must stay inside the sane region
const _: () = assert!(Y_BUS + GROUP_HEIGHT * (MAX_INVERTER_GROUPS as f32 - 1.0) / 2.0 < STRAY_MAX);
const _: () = assert!(Y_BUS - GROUP_HEIGHT * (MAX_INVERTER_GROUPS as f32 - 1.0) / 2.0 > STRAY_MIN);
