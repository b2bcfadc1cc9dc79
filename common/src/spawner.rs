//! Turning accumulated energy into blobs.
//!
//! Once per simulated second the spawner drains the ledger:
//!
//! 1. meter import and export each become one blob (meter to grid, grid to meter)
//! 2. meter and house surplus is matched against house, meter and inverter needs
//! 3. per inverter group (last group first): PV and battery flows to and from
//!    the inverter, then the inverter's export is matched against other
//!    inverters, house and meter
//!
//! Every blob and every match carries more than [`SPAWN_THRESHOLD_WS`].
//! Accumulators are debited even when the blob pool is full; that loss is
//! logged.

use embedded_graphics::pixelcolor::Rgb565;
use heapless::Vec;

use crate::blob::{BlobPool, EnergyBlob};
use crate::colors::{BATTERY_BLOB, GRID_BLOB, HOUSE_BLOB, INVERTER_BLOB, PV_BLOB};
use crate::device::{DeviceId, GroupMember, InverterGroup};
use crate::energy::EnergyLedger;
use crate::error::EmmError;
use crate::geometry::Vec2;
use crate::log_buffer::LogBuffer;
use crate::router::initial_direction;
use crate::thresholds::{MAX_ACCUMULATORS, SPAWN_PERIOD_MS, SPAWN_THRESHOLD_WS, UNMATCHED_WARN_WS};
use crate::topology::{GRID_ANCHOR, HOUSE_ANCHOR, METER_ANCHOR, bus_point, device_anchor, member_anchor};

/// House, meter and every generic accumulator.
const MAX_SINKS: usize = MAX_ACCUMULATORS + 2;

type SinkList = Vec<DeviceId, MAX_SINKS>;

// =============================================================================
// Spawn Clock
// =============================================================================

/// Fixed-period tick source that keeps the overshoot of each period.
#[derive(Debug, Default)]
pub struct SpawnClock {
    carry_ms: u32,
}

impl SpawnClock {
    pub const fn new() -> Self { Self { carry_ms: 0 } }

    /// Add elapsed time. Returns true when a spawn tick is due.
    pub fn advance(
        &mut self,
        delta_ms: u32,
    ) -> bool {
        self.carry_ms = self.carry_ms.saturating_add(delta_ms);
        if self.carry_ms >= SPAWN_PERIOD_MS {
            self.carry_ms -= SPAWN_PERIOD_MS;
            true
        } else {
            false
        }
    }

    #[inline]
    pub const fn carry_ms(&self) -> u32 { self.carry_ms }
}

// =============================================================================
// Spawner
// =============================================================================

/// Everything one spawn tick reads and writes.
pub struct Spawner<'a> {
    pub ledger: &'a mut EnergyLedger,
    pub blobs: &'a mut BlobPool,
    pub groups: &'a [InverterGroup],
    pub y_offset: f32,
    pub log: &'a mut LogBuffer,
}

impl Spawner<'_> {
    /// Run one full spawn tick.
    pub fn tick(&mut self) {
        self.drain_meter();

        let sinks = self.primary_sinks();
        for source in [DeviceId::METER, DeviceId::HOUSE] {
            let (from, color) = if source == DeviceId::METER { (METER_ANCHOR, GRID_BLOB) } else { (HOUSE_ANCHOR, HOUSE_BLOB) };
            self.distribute(source, from, color, &sinks);
        }

        let count = self.groups.len();
        for index in (0..count).rev() {
            self.drain_group(index, count);
        }
    }

    fn drain_meter(&mut self) {
        let meter = self.ledger.meter;
        if meter.imported_energy > SPAWN_THRESHOLD_WS {
            self.ledger.meter.imported_energy = 0.0;
            self.emit(METER_ANCHOR, DeviceId::GRID, meter.imported_energy, GRID_BLOB);
        }
        if meter.exported_energy > SPAWN_THRESHOLD_WS {
            self.ledger.meter.exported_energy = 0.0;
            self.emit(GRID_ANCHOR, DeviceId::METER, meter.exported_energy, GRID_BLOB);
        }
    }

    /// House, meter, then inverters in ledger order.
    fn primary_sinks(&self) -> SinkList {
        let mut sinks = SinkList::new();
        sinks.push(DeviceId::HOUSE).ok();
        sinks.push(DeviceId::METER).ok();
        for id in self.ledger.inverter_ids() {
            sinks.push(id).ok();
        }
        sinks
    }

    /// Other inverters in ledger order, then house, then meter.
    fn inverter_sinks(
        &self,
        source: DeviceId,
    ) -> SinkList {
        let mut sinks = SinkList::new();
        for id in self.ledger.inverter_ids().filter(|&id| id != source) {
            sinks.push(id).ok();
        }
        sinks.push(DeviceId::HOUSE).ok();
        sinks.push(DeviceId::METER).ok();
        sinks
    }

    /// Greedily match the export surplus of `source` against the import need
    /// of `sinks`, in order. Returns the unmatched surplus.
    pub fn distribute(
        &mut self,
        source: DeviceId,
        from: Vec2,
        color: Rgb565,
        sinks: &[DeviceId],
    ) -> f32 {
        let Some(mut remaining) = self.ledger.get(source).map(|a| a.exported_energy) else {
            return 0.0;
        };

        for &sink in sinks.iter().filter(|&&s| s != source) {
            if remaining <= SPAWN_THRESHOLD_WS {
                break;
            }
            let Some(acc) = self.ledger.get_mut(sink) else {
                continue;
            };
            let amount = remaining.min(acc.imported_energy);
            if amount <= SPAWN_THRESHOLD_WS {
                continue;
            }
            acc.imported_energy -= amount;
            remaining -= amount;
            if let Some(src) = self.ledger.get_mut(source) {
                src.exported_energy -= amount;
            }
            self.emit(from, sink, amount, color);
        }
        remaining
    }

    fn drain_group(
        &mut self,
        index: usize,
        count: usize,
    ) {
        let group = self.groups[index];
        let inverter = group.inverter.device_id;
        let inverter_at = member_anchor(GroupMember::Inverter, index, count);

        // PV never draws energy, so both totals go
        let pv = group.pv.device_id;
        let pv_export = self.exported(pv);
        if pv_export > SPAWN_THRESHOLD_WS {
            if let Some(acc) = self.ledger.get_mut(pv) {
                acc.imported_energy = 0.0;
                acc.exported_energy = 0.0;
            }
            self.emit(member_anchor(GroupMember::Pv, index, count), inverter, pv_export, PV_BLOB);
        }

        let battery = group.battery.device_id;
        let discharge = self.exported(battery);
        if discharge > SPAWN_THRESHOLD_WS {
            if let Some(acc) = self.ledger.get_mut(battery) {
                acc.exported_energy = 0.0;
            }
            self.emit(member_anchor(GroupMember::Battery, index, count), inverter, discharge, BATTERY_BLOB);
        }
        let charge = self.imported(battery);
        if charge > SPAWN_THRESHOLD_WS {
            if let Some(acc) = self.ledger.get_mut(battery) {
                acc.imported_energy = 0.0;
            }
            self.emit(bus_point(index, count), battery, charge, BATTERY_BLOB);
        }

        if self.exported(inverter) > SPAWN_THRESHOLD_WS {
            let sinks = self.inverter_sinks(inverter);
            let rest = self.distribute(inverter, inverter_at, INVERTER_BLOB, &sinks);
            if let Some(acc) = self.ledger.get_mut(inverter) {
                acc.exported_energy = 0.0;
            }
            if rest > UNMATCHED_WARN_WS {
                log_warn!(self.log, "Unmatched {:.0} Ws from inverter {}", rest, inverter);
            }
        }
    }

    fn exported(
        &self,
        id: DeviceId,
    ) -> f32 {
        self.ledger.get(id).map_or(0.0, |a| a.exported_energy)
    }

    fn imported(
        &self,
        id: DeviceId,
    ) -> f32 {
        self.ledger.get(id).map_or(0.0, |a| a.imported_energy)
    }

    /// Spawn a blob at `from` heading for `to`. Failures are logged only.
    fn emit(
        &mut self,
        from: Vec2,
        to: DeviceId,
        energy: f32,
        color: Rgb565,
    ) {
        if let Err(err) = self.try_emit(from, to, energy, color) {
            log_error!(self.log, "Dropped {:.0} Ws blob: {}", energy, err);
        }
    }

    fn try_emit(
        &mut self,
        from: Vec2,
        to: DeviceId,
        energy: f32,
        color: Rgb565,
    ) -> Result<(), EmmError> {
        let goal = device_anchor(to, self.groups).ok_or(EmmError::UnknownDevice(to))?;
        self.blobs.spawn(EnergyBlob {
            energy_amount: energy,
            position: from,
            end_device_id: to,
            color,
            direction: initial_direction(from, goal, self.y_offset),
        })?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
