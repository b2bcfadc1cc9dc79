//! Frame timing for the render loop.
//!
//! The render loop runs at a capped rate: after the work of a frame it sleeps
//! out the remainder of a fixed budget. Frames that overrun simply run late.

use crate::config::{FRAME_BUDGET_MS, FRAME_TIME_SMOOTHING, OFFSET_SMOOTHING};

/// Wall time handed to the pages each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeInfo {
    /// Milliseconds since start.
    pub ms: u32,
    /// Milliseconds since the previous frame.
    pub delta_ms: u32,
}

/// Tracks frame deltas and a smoothed frame time for the FPS readout.
#[derive(Debug)]
pub struct FrameClock {
    last_ms: Option<u32>,
    smoothed_ms: f32,
}

impl FrameClock {
    pub const fn new() -> Self {
        Self {
            last_ms: None,
            smoothed_ms: 0.0,
        }
    }

    /// Start a new frame at `now_ms`.
    pub fn tick(
        &mut self,
        now_ms: u32,
    ) -> TimeInfo {
        let delta_ms = self.last_ms.map_or(0, |last| now_ms.wrapping_sub(last));
        self.last_ms = Some(now_ms);
        self.smoothed_ms = (1.0 - FRAME_TIME_SMOOTHING) * self.smoothed_ms + FRAME_TIME_SMOOTHING * delta_ms as f32;
        TimeInfo { ms: now_ms, delta_ms }
    }

    /// Smoothed frames per second.
    pub fn fps(&self) -> f32 { 1000.0 / self.smoothed_ms.max(1.0) }
}

impl Default for FrameClock {
    fn default() -> Self { Self::new() }
}

/// Milliseconds left in the frame budget after `work_ms` of work.
#[inline]
pub fn remaining_budget_ms(work_ms: u32) -> u32 { FRAME_BUDGET_MS - work_ms.min(FRAME_BUDGET_MS) }

/// Exponential smoothing step moving `current` toward `target`.
#[inline]
pub fn smooth_toward(
    current: f32,
    target: f32,
) -> f32 {
    (1.0 - OFFSET_SMOOTHING) * current + OFFSET_SMOOTHING * target
}

// =============================================================================
// Unit Tests
// =============================================================================
