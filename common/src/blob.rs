//! Energy blobs and the bounded pool holding them.

use embedded_graphics::pixelcolor::Rgb565;
use heapless::Vec;

use crate::device::DeviceId;
use crate::error::EmmError;
use crate::geometry::Vec2;
use crate::thresholds::{BLOB_RADIUS_FACTOR, MAX_BLOBS};

/// Direction a blob is currently moving in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    #[inline]
    pub const fn is_vertical(self) -> bool { matches!(self, Self::Up | Self::Down) }

    /// Displacement of `dist` pixels in this direction (screen y grows downward).
    #[inline]
    pub fn step(
        self,
        dist: f32,
    ) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, -dist),
            Self::Right => Vec2::new(dist, 0.0),
            Self::Down => Vec2::new(0.0, dist),
            Self::Left => Vec2::new(-dist, 0.0),
        }
    }

    /// Vertical direction from `from` toward `to`: greater picks `Up`.
    #[inline]
    pub fn vertical_toward(
        from: f32,
        to: f32,
    ) -> Self {
        if from > to { Self::Up } else { Self::Down }
    }

    /// Horizontal direction from `from` toward `to`: greater picks `Left`.
    #[inline]
    pub fn horizontal_toward(
        from: f32,
        to: f32,
    ) -> Self {
        if from > to { Self::Left } else { Self::Right }
    }
}

/// One in-flight quantity of energy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnergyBlob {
    /// Watt-seconds carried.
    pub energy_amount: f32,
    /// Stored position; content coordinates while in the inverter region.
    pub position: Vec2,
    /// Destination device, or [`DeviceId::ABSENT`] once marked for removal.
    pub end_device_id: DeviceId,
    pub color: Rgb565,
    pub direction: Direction,
}

impl EnergyBlob {
    #[inline]
    pub const fn is_removed(&self) -> bool { self.end_device_id.is_absent() }

    #[inline]
    pub fn mark_removed(&mut self) { self.end_device_id = DeviceId::ABSENT; }

    /// Drawn radius, growing with the square root of the energy.
    pub fn radius(&self) -> f32 { BLOB_RADIUS_FACTOR * micromath::F32(self.energy_amount.max(0.0)).sqrt().0 }
}

/// Fixed-capacity collection of blobs.
#[derive(Debug, Default)]
pub struct BlobPool {
    blobs: Vec<EnergyBlob, MAX_BLOBS>,
}

impl BlobPool {
    pub const fn new() -> Self { Self { blobs: Vec::new() } }

    /// Add a blob. Fails without side effects when the pool is full.
    pub fn spawn(
        &mut self,
        blob: EnergyBlob,
    ) -> Result<&mut EnergyBlob, EmmError> {
        self.blobs.push(blob).map_err(|_| EmmError::BlobCapacity)?;
        let last = self.blobs.len() - 1;
        Ok(&mut self.blobs[last])
    }

    /// Drop every blob marked for removal.
    ///
    /// Walks the pool back to front and moves the last element into each
    /// removed slot, so order is not preserved. Returns the number removed.
    pub fn compact(&mut self) -> usize {
        let before = self.blobs.len();
        for i in (0..self.blobs.len()).rev() {
            if self.blobs[i].is_removed() {
                self.blobs.swap_remove(i);
            }
        }
        before - self.blobs.len()
    }

    #[inline]
    pub fn len(&self) -> usize { self.blobs.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.blobs.is_empty() }

    #[inline]
    pub fn is_full(&self) -> bool { self.blobs.is_full() }

    #[inline]
    pub fn as_slice(&self) -> &[EnergyBlob] { &self.blobs }

    #[inline]
    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, EnergyBlob> { self.blobs.iter_mut() }

    pub fn clear(&mut self) { self.blobs.clear(); }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::GRID_BLOB;

    fn blob(target: i32) -> EnergyBlob {
        EnergyBlob {
            energy_amount: 10.0,
            position: Vec2::ZERO,
            end_device_id: DeviceId(target),
            color: GRID_BLOB,
            direction: Direction::Right,
        }
    }

    #[test]
    fn test_spawn_until_full() {
        let mut pool = BlobPool::new();
        for i in 0..MAX_BLOBS {
            assert!(pool.spawn(blob(i as i32)).is_ok());
        }
        assert!(pool.is_full());
        assert_eq!(pool.spawn(blob(99)), Err(EmmError::BlobCapacity));
        assert_eq!(pool.len(), MAX_BLOBS);
    }

    #[test]
    fn test_compact_removes_every_marked_blob() {
        let mut pool = BlobPool::new();
        for i in 0..10 {
            pool.spawn(blob(i)).ok();
        }
        for (i, b) in pool.iter_mut().enumerate() {
            if i % 3 == 0 || i == 9 {
                b.mark_removed();
            }
        }
        let removed = pool.compact();
        assert_eq!(removed, 4);
        assert_eq!(pool.len(), 6);
        assert!(pool.as_slice().iter().all(|b| !b.is_removed()));

        let mut ids: std::vec::Vec<i32> = pool.as_slice().iter().map(|b| b.end_device_id.0).collect();
        ids.sort_unstable();
        assert_eq!(ids, [1, 2, 4, 5, 7, 8]);
    }

    #[test]
    fn test_compact_frees_capacity() {
        let mut pool = BlobPool::new();
        for i in 0..MAX_BLOBS {
            pool.spawn(blob(i as i32)).ok();
        }
        if let Some(b) = pool.iter_mut().next() {
            b.mark_removed();
        }
        pool.compact();
        assert!(pool.spawn(blob(99)).is_ok());
    }

    #[test]
    fn test_radius_grows_with_sqrt_energy() {
        let mut b = blob(1);
        b.energy_amount = 100.0;
        assert!((b.radius() - 2.0).abs() < 1e-3);
        b.energy_amount = 400.0;
        assert!((b.radius() - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_direction_choice() {
        assert_eq!(Direction::vertical_toward(170.0, 160.0), Direction::Up);
        assert_eq!(Direction::vertical_toward(150.0, 160.0), Direction::Down);
        assert_eq!(Direction::horizontal_toward(200.0, 140.0), Direction::Left);
        assert_eq!(Direction::horizontal_toward(80.0, 140.0), Direction::Right);
    }
}
