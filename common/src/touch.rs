//! Single-finger touch model.
//!
//! The touch driver delivers either a raw panel coordinate or nothing for each
//! sample. Comparing the previous and current sample yields one of four phases.

use crate::geometry::Vec2;

/// Phase of the current touch, derived from the previous and current sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TouchPhase {
    /// No finger down in either sample.
    #[default]
    None,
    /// Finger down now, was up before.
    Started,
    /// Finger down in both samples.
    Continuing,
    /// Finger up now, was down before.
    Ended,
}

/// One frame of touch input in display coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct TouchInfo {
    pub phase: TouchPhase,
    /// Current position, or the last known position once the touch ended.
    pub pos: Vec2,
    /// Position in the previous sample.
    pub prev: Vec2,
}

impl TouchInfo {
    /// Derive the touch phase from two consecutive samples.
    pub fn from_samples(
        prev: Option<Vec2>,
        cur: Option<Vec2>,
    ) -> Self {
        match (prev, cur) {
            (None, None) => Self::default(),
            (None, Some(c)) => Self {
                phase: TouchPhase::Started,
                pos: c,
                prev: c,
            },
            (Some(p), Some(c)) => Self {
                phase: TouchPhase::Continuing,
                pos: c,
                prev: p,
            },
            (Some(p), None) => Self {
                phase: TouchPhase::Ended,
                pos: p,
                prev: p,
            },
        }
    }

    /// Movement since the previous sample. Zero unless the touch continues.
    #[inline]
    pub fn delta(&self) -> Vec2 {
        if self.phase == TouchPhase::Continuing {
            self.pos - self.prev
        } else {
            Vec2::ZERO
        }
    }

    /// Whether a finger is currently down.
    #[inline]
    pub fn is_down(&self) -> bool { matches!(self.phase, TouchPhase::Started | TouchPhase::Continuing) }
}

/// Turns raw panel samples into [`TouchInfo`] frames.
#[derive(Debug)]
pub struct TouchTracker {
    last: Option<Vec2>,
    scale: f32,
}

impl TouchTracker {
    /// `scale` is the panel resolution divided by the display resolution.
    pub const fn new(scale: f32) -> Self { Self { last: None, scale } }

    pub fn update(
        &mut self,
        raw: Option<Vec2>,
    ) -> TouchInfo {
        let cur = raw.map(|p| p.div(self.scale));
        let info = TouchInfo::from_samples(self.last, cur);
        self.last = cur;
        info
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
