//! Timing constants for the simulator.
//!
//! These constants use `std::time::Duration` which is not available in `no_std`
//! environments, so they are defined here rather than in the common crate.

use std::time::Duration;

use emm_common::config::TOUCH_PERIOD_MS;

/// Period of the touch sampling thread.
pub const TOUCH_PERIOD: Duration = Duration::from_millis(TOUCH_PERIOD_MS as u64);

/// Interval between two history samples.
pub const HISTORY_PERIOD: Duration = Duration::from_secs(1);
