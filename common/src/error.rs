//! Error type for the fallible core operations.
//!
//! Nothing in the per-frame path is fatal: callers log these and carry on.

use core::fmt;

use crate::device::DeviceId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmmError {
    /// The accumulator collection is full and the device has none yet.
    AccumulatorCapacity(DeviceId),
    /// The blob collection is full.
    BlobCapacity,
    /// No anchor exists for the device (removed or never registered).
    UnknownDevice(DeviceId),
    /// The sample carries the absent-device sentinel.
    AbsentDevice,
    /// Text is not a dotted-quad IPv4 address.
    InvalidIp,
    /// The configured IP list is full.
    IpCapacity,
}

impl fmt::Display for EmmError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::AccumulatorCapacity(id) => write!(f, "no accumulator slot for device {id}"),
            Self::BlobCapacity => f.write_str("blob pool full"),
            Self::UnknownDevice(id) => write!(f, "unknown device {id}"),
            Self::AbsentDevice => f.write_str("absent device"),
            Self::InvalidIp => f.write_str("invalid IP address"),
            Self::IpCapacity => f.write_str("IP list full"),
        }
    }
}
