//! Floating point geometry used by the simulation and the page layouts.
//!
//! The simulation works in sub-pixel `f32` coordinates; conversion to
//! `embedded_graphics` integer types happens only at draw time.

use core::ops::{Add, Sub};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};

/// A point or displacement in display space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(
        x: f32,
        y: f32,
    ) -> Self {
        Self { x, y }
    }

    /// Return this point moved by `(dx, dy)`.
    #[inline]
    pub fn translate(
        self,
        dx: f32,
        dy: f32,
    ) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Manhattan (L1) distance to `other`.
    #[inline]
    pub fn manhattan(
        self,
        other: Self,
    ) -> f32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Scale both components by `1 / divisor`.
    #[inline]
    pub fn div(
        self,
        divisor: f32,
    ) -> Self {
        Self::new(self.x / divisor, self.y / divisor)
    }

    /// Round to the nearest integer pixel.
    #[inline]
    pub fn to_point(self) -> Point {
        Point::new(
            micromath::F32(self.x).round().0 as i32,
            micromath::F32(self.y).round().0 as i32,
        )
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(
        self,
        rhs: Self,
    ) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(
        self,
        rhs: Self,
    ) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned rectangle, origin at the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    ) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 { self.x + self.w }

    #[inline]
    pub fn bottom(&self) -> f32 { self.y + self.h }

    #[inline]
    pub fn center(&self) -> Vec2 { Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0) }

    /// Whether `p` lies inside. The right and bottom edges are exclusive.
    #[inline]
    pub fn contains(
        &self,
        p: Vec2,
    ) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Return this rectangle moved by `(dx, dy)`.
    #[inline]
    pub fn translate(
        &self,
        dx: f32,
        dy: f32,
    ) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Whether any part of the rectangle overlaps `other`.
    pub fn intersects(
        &self,
        other: &Self,
    ) -> bool {
        self.x < other.right() && other.x < self.right() && self.y < other.bottom() && other.y < self.bottom()
    }

    /// Convert to an integer rectangle for drawing and clipping.
    pub fn to_rectangle(&self) -> Rectangle {
        let top_left = Vec2::new(self.x, self.y).to_point();
        let w = micromath::F32(self.w.max(0.0)).round().0 as u32;
        let h = micromath::F32(self.h.max(0.0)).round().0 as u32;
        Rectangle::new(top_left, Size::new(w, h))
    }
}

/// A straight wire between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Vec2,
    pub to: Vec2,
}

impl Segment {
    pub const fn new(
        from: Vec2,
        to: Vec2,
    ) -> Self {
        Self { from, to }
    }

    /// Draw the segment shifted by `offset`.
    pub fn draw<D>(
        &self,
        display: &mut D,
        offset: Vec2,
        color: Rgb565,
        width: u32,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        Line::new((self.from + offset).to_point(), (self.to + offset).to_point())
            .into_styled(PrimitiveStyle::with_stroke(color, width))
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

    #[test]
    fn test_manhattan() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, -2.0);
        assert_eq!(a.manhattan(b), 7.0);
        assert_eq!(b.manhattan(a), 7.0);
    }

    #[test]
    fn test_rect_contains_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert!(r.contains(Vec2::new(10.0, 20.0)));
        assert!(r.contains(Vec2::new(39.9, 59.9)));
        assert!(!r.contains(Vec2::new(40.0, 30.0)));
        assert!(!r.contains(Vec2::new(15.0, 60.0)));
    }

    #[test]
    fn test_rect_translate_keeps_size() {
        let r = Rect::new(0.0, 0.0, 5.0, 6.0).translate(-240.0, 3.0);
        assert_eq!(r, Rect::new(-240.0, 3.0, 5.0, 6.0));
    }

    #[test]
    fn test_rect_intersects() {
        let screen = Rect::new(0.0, 0.0, 240.0, 240.0);
        assert!(screen.intersects(&Rect::new(200.0, 10.0, 100.0, 10.0)));
        assert!(!screen.intersects(&Rect::new(240.0, 10.0, 100.0, 10.0)));
    }

    #[test]
    fn test_to_point_rounds() {
        assert_eq!(Vec2::new(1.4, 2.6).to_point(), Point::new(1, 3));
        assert_eq!(Vec2::new(-1.6, 0.0).to_point(), Point::new(-2, 0));
    }
}
