//! Fake power readings for the simulator.
//!
//! Every inverter group gets a PV string following a slow sine, a battery
//! absorbing part of the PV swing and an inverter feeding the rest to the AC
//! bus. The meter closes the balance against the house load.

use emm_common::colors::{GRID_BLOB, HOUSE_BLOB, PV_BLOB};
use emm_common::pages::{CurveInfo, HistoryRange};
use emm_common::{DeviceId, InverterGroup, PowerSample};

/// Power samples for one frame.
pub struct DemoReadings {
    pub home: PowerSample,
    pub meter: PowerSample,
}

/// Oscillates between `min` and `max` with angular frequency `freq`.
fn fake_signal(
    t: f32,
    min: f32,
    max: f32,
    freq: f32,
) -> f32 {
    let normalized = (t * freq).sin().mul_add(0.5, 0.5);
    min + normalized * (max - min)
}

/// Fill `groups` with readings for time `t` (seconds) and return house and meter.
pub fn update_readings(
    t: f32,
    groups: &mut [InverterGroup],
) -> DemoReadings {
    let home_watts = fake_signal(t, 300.0, 1800.0, 0.11);

    let mut ac_total = 0.0;
    for (i, group) in groups.iter_mut().enumerate() {
        let phase = i as f32 * 1.3;
        let pv_watts = fake_signal(t + phase, 0.0, 2400.0, 0.05);
        // Positive: charging, negative: discharging
        let battery_watts = fake_signal(t + phase, -600.0, 900.0, 0.07);
        let ac_watts = pv_watts - battery_watts;

        group.pv = PowerSample::new(group.pv.device_id, 0.0, pv_watts);
        group.battery = PowerSample::from_signed(group.battery.device_id, battery_watts);
        group.inverter = PowerSample::from_signed(group.inverter.device_id, -ac_watts);
        ac_total += ac_watts;
    }

    DemoReadings {
        home: PowerSample::new(DeviceId::HOUSE, home_watts, 0.0),
        meter: PowerSample::from_signed(DeviceId::METER, home_watts - ac_total),
    }
}

/// Curves shown on the history page: house load, PV yield and grid import.
pub fn demo_curves() -> [CurveInfo; 3] {
    [
        CurveInfo::new("House", "W", HOUSE_BLOB),
        CurveInfo::new("PV", "W", PV_BLOB),
        CurveInfo::new("Grid", "W", GRID_BLOB),
    ]
}

/// Samples taken every history tick per range. Coarser ranges take fewer samples.
const RANGE_DIVIDERS: [u32; HistoryRange::COUNT] = [1, 7, 30, 365];

/// Record one history tick into `curves`.
pub fn record_history(
    tick: u32,
    curves: &mut [CurveInfo; 3],
    groups: &[InverterGroup],
    readings: &DemoReadings,
) {
    let pv_watts: f32 = groups.iter().map(|g| g.pv.exported_watts).sum();
    let values = [readings.home.imported_watts, pv_watts, readings.meter.imported_watts];

    for range in HistoryRange::ALL {
        if tick % RANGE_DIVIDERS[range.index()] != 0 {
            continue;
        }
        for (curve, value) in curves.iter_mut().zip(values) {
            curve.push(range, value.clamp(0.0, f32::from(u16::MAX)) as u16);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use emm_common::DeviceIdAllocator;

    use super::*;

    #[test]
    fn test_readings_balance() {
        let mut ids = DeviceIdAllocator::new();
        let mut groups = [InverterGroup::allocate(&mut ids), InverterGroup::allocate(&mut ids)];
        for step in 0..50 {
            let readings = update_readings(step as f32 * 0.7, &mut groups);
            let ac: f32 = groups
                .iter()
                .map(|g| g.inverter.exported_watts - g.inverter.imported_watts)
                .sum();
            let meter = readings.meter.imported_watts - readings.meter.exported_watts;
            assert!((readings.home.imported_watts - (meter + ac)).abs() < 0.01);
        }
    }

    #[test]
    fn test_history_dividers() {
        let mut ids = DeviceIdAllocator::new();
        let mut groups = [InverterGroup::allocate(&mut ids)];
        let mut curves = demo_curves();
        for tick in 0..8 {
            let readings = update_readings(tick as f32, &mut groups);
            record_history(tick, &mut curves, &groups, &readings);
        }
        assert_eq!(curves[0].samples(HistoryRange::Daily).len(), 8);
        assert_eq!(curves[0].samples(HistoryRange::Weekly).len(), 2);
        assert_eq!(curves[0].samples(HistoryRange::Yearly).len(), 1);
    }
}
