//! Per-device energy accounting.
//!
//! Each device's instantaneous power is integrated into imported and exported
//! energy (watt-seconds). The spawner later drains these totals when it turns
//! them into blobs. House and meter are always present and live in dedicated
//! fields; every other device gets a slot in a bounded collection on its first
//! sample.

use heapless::Vec;

use crate::device::{DeviceId, PowerSample};
use crate::error::EmmError;
use crate::thresholds::MAX_ACCUMULATORS;

/// Running energy totals of one device since they were last drained.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnergyAccumulator {
    pub device_id: DeviceId,
    pub is_inverter: bool,
    /// Watt-seconds.
    pub imported_energy: f32,
    /// Watt-seconds.
    pub exported_energy: f32,
}

impl EnergyAccumulator {
    pub const fn new(
        device_id: DeviceId,
        is_inverter: bool,
    ) -> Self {
        Self {
            device_id,
            is_inverter,
            imported_energy: 0.0,
            exported_energy: 0.0,
        }
    }

    /// Add `power * elapsed_s` to both totals.
    #[inline]
    pub fn add_power(
        &mut self,
        sample: &PowerSample,
        elapsed_s: f32,
    ) {
        self.imported_energy += sample.imported_watts * elapsed_s;
        self.exported_energy += sample.exported_watts * elapsed_s;
    }
}

/// All accumulators of the overview page.
#[derive(Debug)]
pub struct EnergyLedger {
    pub house: EnergyAccumulator,
    pub meter: EnergyAccumulator,
    devices: Vec<EnergyAccumulator, MAX_ACCUMULATORS>,
}

impl EnergyLedger {
    pub const fn new() -> Self {
        Self {
            house: EnergyAccumulator::new(DeviceId::HOUSE, false),
            meter: EnergyAccumulator::new(DeviceId::METER, false),
            devices: Vec::new(),
        }
    }

    /// Integrate one sample over `elapsed_s` seconds.
    ///
    /// Finds or creates the device's accumulator. Fails for the absent
    /// sentinel and when a new device does not fit; in both cases nothing
    /// is modified.
    pub fn integrate(
        &mut self,
        sample: &PowerSample,
        is_inverter: bool,
        elapsed_s: f32,
    ) -> Result<&mut EnergyAccumulator, EmmError> {
        let acc = self.slot(sample.device_id, is_inverter)?;
        acc.add_power(sample, elapsed_s);
        Ok(acc)
    }

    fn slot(
        &mut self,
        id: DeviceId,
        is_inverter: bool,
    ) -> Result<&mut EnergyAccumulator, EmmError> {
        match id {
            DeviceId::ABSENT => Err(EmmError::AbsentDevice),
            DeviceId::HOUSE => Ok(&mut self.house),
            DeviceId::METER => Ok(&mut self.meter),
            _ => {
                if let Some(idx) = self.devices.iter().position(|a| a.device_id == id) {
                    return Ok(&mut self.devices[idx]);
                }
                self.devices
                    .push(EnergyAccumulator::new(id, is_inverter))
                    .map_err(|_| EmmError::AccumulatorCapacity(id))?;
                let last = self.devices.len() - 1;
                Ok(&mut self.devices[last])
            }
        }
    }

    pub fn get(
        &self,
        id: DeviceId,
    ) -> Option<&EnergyAccumulator> {
        match id {
            DeviceId::ABSENT => None,
            DeviceId::HOUSE => Some(&self.house),
            DeviceId::METER => Some(&self.meter),
            _ => self.devices.iter().find(|a| a.device_id == id),
        }
    }

    pub fn get_mut(
        &mut self,
        id: DeviceId,
    ) -> Option<&mut EnergyAccumulator> {
        match id {
            DeviceId::ABSENT => None,
            DeviceId::HOUSE => Some(&mut self.house),
            DeviceId::METER => Some(&mut self.meter),
            _ => self.devices.iter_mut().find(|a| a.device_id == id),
        }
    }

    /// Generic accumulators in creation order.
    #[inline]
    pub fn devices(&self) -> &[EnergyAccumulator] { &self.devices }

    /// Ids of inverter accumulators in creation order.
    pub fn inverter_ids(&self) -> impl Iterator<Item = DeviceId> + '_ {
        self.devices.iter().filter(|a| a.is_inverter).map(|a| a.device_id)
    }

    #[inline]
    pub fn is_full(&self) -> bool { self.devices.is_full() }
}

impl Default for EnergyLedger {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================
