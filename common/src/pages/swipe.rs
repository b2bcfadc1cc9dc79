//! Horizontal page swiping on the touch task.
//!
//! The touch task and the render loop share one value: the target page
//! offset. The touch task writes it, the render loop reads it and eases the
//! displayed offset toward it. Last writer wins; no ordering beyond atomicity
//! is needed.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::config::{PAGE_COUNT, PAGE_WIDTH, TOUCH_SCALE};
use crate::geometry::Vec2;
use crate::touch::{TouchPhase, TouchTracker};

/// An `f32` shared between tasks, stored as its bit pattern.
#[derive(Debug)]
pub struct SharedOffset(AtomicU32);

impl SharedOffset {
    pub const fn new(value: f32) -> Self { Self(AtomicU32::new(value.to_bits())) }

    #[inline]
    pub fn load(&self) -> f32 { f32::from_bits(self.0.load(Ordering::Relaxed)) }

    #[inline]
    pub fn store(
        &self,
        value: f32,
    ) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

impl Default for SharedOffset {
    fn default() -> Self { Self::new(0.0) }
}

/// Offset of the page nearest to `offset`, clamped to the page strip.
pub fn snap_offset(offset: f32) -> f32 {
    let last = -((PAGE_COUNT - 1) as f32);
    let page = micromath::F32(offset / PAGE_WIDTH).round().0.clamp(last, 0.0);
    page * PAGE_WIDTH
}

/// Drag-to-swipe state machine fed with raw panel samples.
#[derive(Debug)]
pub struct PageSwipe {
    tracker: TouchTracker,
}

impl PageSwipe {
    pub const fn new() -> Self {
        Self {
            tracker: TouchTracker::new(TOUCH_SCALE),
        }
    }

    /// Process one raw sample (panel coordinates).
    ///
    /// Drags move the shared offset unless a widget owns the touch; a release
    /// snaps it to the nearest page.
    pub fn sample(
        &mut self,
        raw: Option<Vec2>,
        widget_grab: bool,
        offset: &SharedOffset,
    ) {
        let touch = self.tracker.update(raw);
        match touch.phase {
            TouchPhase::Continuing if !widget_grab => offset.store(offset.load() + touch.delta().x),
            TouchPhase::Ended => offset.store(snap_offset(offset.load())),
            _ => {}
        }
    }
}

impl Default for PageSwipe {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_nearest_page() {
        assert_eq!(snap_offset(-100.0), 0.0);
        assert_eq!(snap_offset(-130.0), -240.0);
        assert_eq!(snap_offset(-400.0), -480.0);
        assert_eq!(snap_offset(-900.0), -480.0);
        assert_eq!(snap_offset(50.0), 0.0);
    }

    #[test]
    fn test_drag_then_release() {
        let offset = SharedOffset::new(0.0);
        let mut swipe = PageSwipe::new();
        swipe.sample(Some(Vec2::new(400.0, 200.0)), false, &offset);
        assert_eq!(offset.load(), 0.0);
        // 300 raw px left is 150 display px
        swipe.sample(Some(Vec2::new(100.0, 200.0)), false, &offset);
        assert_eq!(offset.load(), -150.0);
        swipe.sample(None, false, &offset);
        assert_eq!(offset.load(), -240.0);
    }

    #[test]
    fn test_widget_grab_blocks_drag() {
        let offset = SharedOffset::new(-240.0);
        let mut swipe = PageSwipe::new();
        swipe.sample(Some(Vec2::new(400.0, 200.0)), true, &offset);
        swipe.sample(Some(Vec2::new(100.0, 200.0)), true, &offset);
        assert_eq!(offset.load(), -240.0);
        swipe.sample(None, true, &offset);
        assert_eq!(offset.load(), -240.0);
    }
}
