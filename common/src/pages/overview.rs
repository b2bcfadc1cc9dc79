//! Overview page: live energy flow between house, grid and inverter groups.
//!
//! Per frame, in this order:
//!
//! 1. ease the inverter region scroll toward its target
//! 2. integrate the power samples, advance the spawn clock
//! 3. on a spawn tick, turn accumulated energy into blobs
//! 4. move the blobs and drop the finished ones
//! 5. draw (skipped while the page is off screen)
//!
//! Steps 1 to 4 run whether or not the page is visible.

use core::fmt::Write;

use embedded_graphics::draw_target::DrawTargetExt;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle};
use embedded_graphics::text::Text;
use heapless::String;

use crate::blob::BlobPool;
use crate::colors::WIRE;
use crate::config::{BLOB_VIEW, GROUP_HEIGHT, INVERTER_VIEW, PAGE_WIDTH};
use crate::device::{DeviceId, GroupMember, InverterGroup, PowerSample};
use crate::energy::EnergyLedger;
use crate::error::EmmError;
use crate::frame::{TimeInfo, smooth_toward};
use crate::geometry::Vec2;
use crate::log_buffer::LogBuffer;
use crate::router;
use crate::spawner::{SpawnClock, Spawner};
use crate::styles::{CENTERED, LABEL_STYLE_BLACK, TITLE_STYLE_BLACK};
use crate::thresholds::MAX_INVERTER_GROUPS;
use crate::topology::{
    GRID_ANCHOR,
    HOUSE_ANCHOR,
    HOUSE_CONNECTOR,
    MAIN_BUS,
    METER_ANCHOR,
    branch,
    inverter_bus,
    member_anchor,
    to_screen,
    view_height,
};
use crate::touch::{TouchInfo, TouchPhase};
use crate::widgets::{Icon, draw_icon};

const WIRE_WIDTH: u32 = 2;

/// Vertical distance of the power readouts from their icons.
const LABEL_GAP: f32 = 16.0;

pub struct OverviewPage {
    /// Horizontal position of this page in the page strip.
    pub base_offset: f32,
    y_offset: f32,
    target_y_offset: f32,
    /// Scrollable height measured during the last draw.
    view_height: f32,
    dragging: bool,
    clock: SpawnClock,
    ledger: EnergyLedger,
    blobs: BlobPool,
    log: LogBuffer,
    home_watts: f32,
    meter_watts: f32,
    truncated_groups: usize,
}

impl OverviewPage {
    pub const fn new() -> Self {
        Self {
            base_offset: 0.0,
            y_offset: 0.0,
            target_y_offset: 0.0,
            view_height: GROUP_HEIGHT,
            dragging: false,
            clock: SpawnClock::new(),
            ledger: EnergyLedger::new(),
            blobs: BlobPool::new(),
            log: LogBuffer::new(),
            home_watts: 0.0,
            meter_watts: 0.0,
            truncated_groups: 0,
        }
    }

    #[inline]
    pub fn blobs(&self) -> &BlobPool { &self.blobs }

    #[inline]
    pub fn ledger(&self) -> &EnergyLedger { &self.ledger }

    #[inline]
    pub fn log(&self) -> &LogBuffer { &self.log }

    #[inline]
    pub fn y_offset(&self) -> f32 { self.y_offset }

    #[inline]
    pub fn target_y_offset(&self) -> f32 { self.target_y_offset }

    /// Groups beyond the supported count are ignored, with one warning per change.
    fn supported<'g>(
        &mut self,
        groups: &'g [InverterGroup],
    ) -> &'g [InverterGroup] {
        let dropped = groups.len().saturating_sub(MAX_INVERTER_GROUPS);
        if dropped != self.truncated_groups {
            self.truncated_groups = dropped;
            if dropped > 0 {
                log_warn!(self.log, "Ignoring {} inverter groups", dropped);
            }
        }
        &groups[..groups.len() - dropped]
    }

    fn integrate(
        &mut self,
        sample: &PowerSample,
        is_inverter: bool,
        elapsed_s: f32,
    ) {
        match self.ledger.integrate(sample, is_inverter, elapsed_s) {
            Ok(_) | Err(EmmError::AbsentDevice) => {}
            Err(err) => log_error!(self.log, "{}", err),
        }
    }

    /// Run the simulation steps of one frame.
    pub fn update(
        &mut self,
        time: TimeInfo,
        groups: &[InverterGroup],
        home: PowerSample,
        meter: PowerSample,
    ) {
        let groups = self.supported(groups);
        self.log.set_time(time.ms);

        self.y_offset = smooth_toward(self.y_offset, self.target_y_offset);

        let spawn_due = self.clock.advance(time.delta_ms);
        let elapsed_s = time.delta_ms as f32 / 1000.0;
        let home = PowerSample {
            device_id: DeviceId::HOUSE,
            ..home
        };
        let meter = PowerSample {
            device_id: DeviceId::METER,
            ..meter
        };
        self.home_watts = home.imported_watts - home.exported_watts;
        self.meter_watts = meter.imported_watts - meter.exported_watts;
        self.integrate(&home, false, elapsed_s);
        self.integrate(&meter, false, elapsed_s);
        for group in groups {
            self.integrate(&group.inverter, true, elapsed_s);
            self.integrate(&group.pv, false, elapsed_s);
            self.integrate(&group.battery, false, elapsed_s);
        }

        if spawn_due {
            Spawner {
                ledger: &mut self.ledger,
                blobs: &mut self.blobs,
                groups,
                y_offset: self.y_offset,
                log: &mut self.log,
            }
            .tick();
        }

        router::advance_all(&mut self.blobs, groups, time.delta_ms, self.y_offset, &mut self.log);
    }

    /// Draw the page shifted by `x_offset`. Nothing is drawn while off screen.
    pub fn draw<D>(
        &mut self,
        display: &mut D,
        x_offset: f32,
        groups: &[InverterGroup],
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let ox = self.base_offset + x_offset;
        if ox > PAGE_WIDTH || ox + PAGE_WIDTH < 0.0 {
            return;
        }
        let groups = &groups[..groups.len().min(MAX_INVERTER_GROUPS)];
        let count = groups.len();
        let shift = Vec2::new(ox, 0.0);

        Text::with_text_style("Overview", Point::new((ox + PAGE_WIDTH / 2.0) as i32, 16), TITLE_STYLE_BLACK, CENTERED)
            .draw(display)
            .ok();

        MAIN_BUS.draw(display, shift, WIRE, WIRE_WIDTH);
        HOUSE_CONNECTOR.draw(display, shift, WIRE, WIRE_WIDTH);

        let inverter_view = INVERTER_VIEW.translate(ox, 0.0).to_rectangle();
        let scroll = Vec2::new(ox, self.y_offset);
        {
            let mut view = display.clipped(&inverter_view);
            if count > 0 {
                inverter_bus(count).draw(&mut view, scroll, WIRE, WIRE_WIDTH);
            }
            for i in 0..count {
                branch(i, count).draw(&mut view, scroll, WIRE, WIRE_WIDTH);
            }
        }
        self.view_height = view_height(count);

        {
            let mut view = display.clipped(&BLOB_VIEW.translate(ox, 0.0).to_rectangle());
            for blob in self.blobs.as_slice() {
                let center = to_screen(blob.position, self.y_offset) + shift;
                let diameter = micromath::F32(blob.radius() * 2.0).round().0.max(1.0) as u32;
                Circle::with_center(center.to_point(), diameter)
                    .into_styled(PrimitiveStyle::with_fill(blob.color))
                    .draw(&mut view)
                    .ok();
            }
        }

        for (icon, anchor) in [(Icon::House, HOUSE_ANCHOR), (Icon::Meter, METER_ANCHOR), (Icon::Pole, GRID_ANCHOR)] {
            draw_icon(display, icon, anchor + shift, icon.style());
        }
        {
            let mut view = display.clipped(&inverter_view);
            for i in 0..count {
                for (icon, member) in [
                    (Icon::Pv, GroupMember::Pv),
                    (Icon::Battery, GroupMember::Battery),
                    (Icon::Inverter, GroupMember::Inverter),
                ] {
                    let center = to_screen(member_anchor(member, i, count), self.y_offset) + shift;
                    draw_icon(&mut view, icon, center, icon.style());
                }
            }
        }

        draw_power(display, HOUSE_ANCHOR + shift + Vec2::new(0.0, -LABEL_GAP), self.home_watts);
        draw_power(display, METER_ANCHOR + shift + Vec2::new(0.0, LABEL_GAP + 4.0), self.meter_watts);
    }

    /// Update then draw.
    pub fn frame<D>(
        &mut self,
        display: &mut D,
        time: TimeInfo,
        x_offset: f32,
        groups: &[InverterGroup],
        home: PowerSample,
        meter: PowerSample,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        self.update(time, groups, home, meter);
        self.draw(display, x_offset, groups);
    }

    /// Vertical drag of the inverter region. Returns true while the page owns the touch.
    pub fn handle_touch(
        &mut self,
        touch: &TouchInfo,
        x_offset: f32,
    ) -> bool {
        match touch.phase {
            TouchPhase::Started => {
                self.dragging = INVERTER_VIEW.translate(self.base_offset + x_offset, 0.0).contains(touch.pos);
                self.dragging
            }
            TouchPhase::Continuing if self.dragging => {
                self.target_y_offset += touch.delta().y;
                true
            }
            TouchPhase::Ended if self.dragging => {
                self.dragging = false;
                let half = self.view_height / 2.0;
                self.target_y_offset = self.target_y_offset.clamp(-half, half);
                true
            }
            _ => false,
        }
    }
}

impl Default for OverviewPage {
    fn default() -> Self { Self::new() }
}

fn draw_power<D>(
    display: &mut D,
    at: Vec2,
    watts: f32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let mut text: String<16> = String::new();
    if write!(text, "{watts:.0} W").is_ok() {
        Text::with_text_style(&text, at.to_point(), LABEL_STYLE_BLACK, CENTERED)
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
    use crate::colors::GRID_BLOB;
    use crate::config::Y_BUS;
    use crate::device::DeviceIdAllocator;
    use crate::log_buffer::LogLevel;
    use crate::test_support::CountingDisplay;

    fn groups(n: usize) -> std::vec::Vec<InverterGroup> {
        let mut ids = DeviceIdAllocator::new();
        (0..n).map(|_| InverterGroup::allocate(&mut ids)).collect()
    }

    fn time(
        ms: u32,
        delta_ms: u32,
    ) -> TimeInfo {
        TimeInfo { ms, delta_ms }
    }

    fn importing(watts: f32) -> PowerSample { PowerSample::new(DeviceId::METER, watts, 0.0) }

    fn touch(
        prev: Option<(f32, f32)>,
        cur: Option<(f32, f32)>,
    ) -> TouchInfo {
        TouchInfo::from_samples(prev.map(|(x, y)| Vec2::new(x, y)), cur.map(|(x, y)| Vec2::new(x, y)))
    }

    #[test]
    fn test_spawns_on_tick_and_keeps_running_off_screen() {
        let mut page = OverviewPage::new();
        let g = groups(1);
        let home = PowerSample::idle(DeviceId::HOUSE);
        let mut display = CountingDisplay::new();

        page.frame(&mut display, time(500, 500), -480.0, &g, home, importing(10.0));
        assert!(page.blobs().is_empty());
        page.frame(&mut display, time(1000, 500), -480.0, &g, home, importing(10.0));
        assert_eq!(page.blobs().len(), 1);
        assert_eq!(page.blobs().as_slice()[0].end_device_id, DeviceId::GRID);
        assert_eq!(page.ledger().meter.imported_energy, 0.0);
        assert_eq!(display.drawn, 0);

        let x = page.blobs().as_slice()[0].position.x;
        page.frame(&mut display, time(1100, 100), -480.0, &g, home, importing(0.0));
        assert!(page.blobs().as_slice()[0].position.x > x);
    }

    #[test]
    fn test_draw_shows_topology_and_blobs() {
        let mut page = OverviewPage::new();
        let g = groups(2);
        let home = PowerSample::new(DeviceId::HOUSE, 300.0, 0.0);
        let mut display = CountingDisplay::new();

        page.update(time(999, 999), &g, home, importing(400.0));
        page.update(time(1000, 1), &g, home, importing(400.0));
        page.update(time(1300, 300), &g, home, importing(400.0));
        page.draw(&mut display, 0.0, &g);

        assert!(display.drawn > 0);
        assert_eq!(display.pixel(200, Y_BUS as i32), Some(GRID_BLOB));
        assert_eq!(display.pixel(120, Y_BUS as i32), Some(WIRE));
    }

    #[test]
    fn test_scroll_drag_and_clamp() {
        let mut page = OverviewPage::new();
        assert!(page.handle_touch(&touch(None, Some((40.0, 100.0))), 0.0));
        assert!(page.handle_touch(&touch(Some((40.0, 100.0)), Some((40.0, 130.0))), 0.0));
        assert_eq!(page.target_y_offset(), 30.0);
        assert!(page.handle_touch(&touch(Some((40.0, 130.0)), None), 0.0));
        assert_eq!(page.target_y_offset(), GROUP_HEIGHT / 2.0);

        page.update(time(16, 16), &[], PowerSample::idle(DeviceId::HOUSE), importing(0.0));
        assert!((page.y_offset() - 0.2 * GROUP_HEIGHT / 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_touch_outside_region_is_ignored() {
        let mut page = OverviewPage::new();
        assert!(!page.handle_touch(&touch(None, Some((150.0, 100.0))), 0.0));
        assert!(!page.handle_touch(&touch(Some((150.0, 100.0)), Some((150.0, 140.0))), 0.0));
        assert_eq!(page.target_y_offset(), 0.0);
        // Region of a page that is scrolled away
        assert!(!page.handle_touch(&touch(None, Some((40.0, 100.0))), -240.0));
    }

    #[test]
    fn test_excess_groups_are_ignored_with_one_warning() {
        let mut page = OverviewPage::new();
        let g = groups(MAX_INVERTER_GROUPS + 2);
        let home = PowerSample::idle(DeviceId::HOUSE);
        page.update(time(16, 16), &g, home, importing(0.0));
        page.update(time(32, 16), &g, home, importing(0.0));
        assert_eq!(page.log().count_level(LogLevel::Warn), 1);
        assert_eq!(page.ledger().devices().len(), MAX_INVERTER_GROUPS * 3);
    }
}
