//! Device identity, power samples and inverter groups.
//!
//! Every energy endpoint has a small integer id. House, grid and smart meter
//! use reserved ids; everything else is handed out by a [`DeviceIdAllocator`]
//! owned by whoever assembles the device topology.

use core::fmt;

/// Unique id of an energy endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceId(pub i32);

impl DeviceId {
    /// "No device". Also marks a blob for removal.
    pub const ABSENT: Self = Self(-1);
    pub const HOUSE: Self = Self(0);
    pub const GRID: Self = Self(1);
    pub const METER: Self = Self(2);

    /// First id handed out by the allocator.
    pub const FIRST_DYNAMIC: i32 = 3;

    #[inline]
    pub const fn is_absent(self) -> bool { self.0 == Self::ABSENT.0 }

    #[inline]
    pub const fn is_reserved(self) -> bool { self.0 >= 0 && self.0 < Self::FIRST_DYNAMIC }
}

impl fmt::Display for DeviceId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match *self {
            Self::ABSENT => f.write_str("absent"),
            Self::HOUSE => f.write_str("house"),
            Self::GRID => f.write_str("grid"),
            Self::METER => f.write_str("meter"),
            Self(id) => write!(f, "#{id}"),
        }
    }
}

/// Hands out monotonically increasing device ids. Ids are never reused.
#[derive(Debug)]
pub struct DeviceIdAllocator {
    next: i32,
}

impl DeviceIdAllocator {
    pub const fn new() -> Self {
        Self {
            next: DeviceId::FIRST_DYNAMIC,
        }
    }

    pub fn allocate(&mut self) -> DeviceId {
        let id = DeviceId(self.next);
        self.next += 1;
        id
    }
}

impl Default for DeviceIdAllocator {
    fn default() -> Self { Self::new() }
}

/// Instantaneous power reading of one device for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerSample {
    pub device_id: DeviceId,
    pub imported_watts: f32,
    pub exported_watts: f32,
}

impl PowerSample {
    pub const fn new(
        device_id: DeviceId,
        imported_watts: f32,
        exported_watts: f32,
    ) -> Self {
        Self {
            device_id,
            imported_watts,
            exported_watts,
        }
    }

    /// A sample with zero power for `device_id`.
    pub const fn idle(device_id: DeviceId) -> Self { Self::new(device_id, 0.0, 0.0) }

    /// Split a signed reading: positive is import, negative is export.
    pub fn from_signed(
        device_id: DeviceId,
        watts: f32,
    ) -> Self {
        if watts >= 0.0 {
            Self::new(device_id, watts, 0.0)
        } else {
            Self::new(device_id, 0.0, -watts)
        }
    }
}

/// Which member of an inverter group a device is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupMember {
    Inverter,
    Pv,
    Battery,
}

/// An inverter with its PV string and battery, drawn as one branch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InverterGroup {
    pub inverter: PowerSample,
    pub pv: PowerSample,
    pub battery: PowerSample,
}

impl InverterGroup {
    /// Create an idle group with three fresh ids.
    pub fn allocate(ids: &mut DeviceIdAllocator) -> Self {
        Self {
            inverter: PowerSample::idle(ids.allocate()),
            pv: PowerSample::idle(ids.allocate()),
            battery: PowerSample::idle(ids.allocate()),
        }
    }

    /// Which member of this group `id` belongs to, if any.
    pub fn member(
        &self,
        id: DeviceId,
    ) -> Option<GroupMember> {
        if id.is_absent() {
            None
        } else if id == self.inverter.device_id {
            Some(GroupMember::Inverter)
        } else if id == self.pv.device_id {
            Some(GroupMember::Pv)
        } else if id == self.battery.device_id {
            Some(GroupMember::Battery)
        } else {
            None
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_starts_after_reserved() {
        let mut ids = DeviceIdAllocator::new();
        let first = ids.allocate();
        assert_eq!(first, DeviceId(DeviceId::FIRST_DYNAMIC));
        assert!(!first.is_reserved());
        assert!(DeviceId::HOUSE.is_reserved());
        assert!(DeviceId::METER.is_reserved());
    }

    #[test]
    fn test_allocator_is_monotonic() {
        let mut ids = DeviceIdAllocator::new();
        let a = ids.allocate();
        let b = ids.allocate();
        let c = ids.allocate();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_group_members() {
        let mut ids = DeviceIdAllocator::new();
        let group = InverterGroup::allocate(&mut ids);
        assert_eq!(group.member(group.inverter.device_id), Some(GroupMember::Inverter));
        assert_eq!(group.member(group.pv.device_id), Some(GroupMember::Pv));
        assert_eq!(group.member(group.battery.device_id), Some(GroupMember::Battery));
        assert_eq!(group.member(DeviceId::HOUSE), None);
        assert_eq!(group.member(DeviceId::ABSENT), None);
    }

    #[test]
    fn test_from_signed() {
        let id = DeviceId::METER;
        assert_eq!(PowerSample::from_signed(id, 120.0), PowerSample::new(id, 120.0, 0.0));
        assert_eq!(PowerSample::from_signed(id, -80.0), PowerSample::new(id, 0.0, 80.0));
    }
}
