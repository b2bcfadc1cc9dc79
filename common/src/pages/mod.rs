//! The three pages of the horizontal page strip and their dispatch.
//!
//! Pages sit side by side at fixed base offsets; the strip is shifted by the
//! shared horizontal offset (0 shows the overview, -480 the settings). Every
//! page owns its state and is handed its inputs explicitly each frame.

pub mod history;
pub mod overview;
pub mod settings;
pub mod swipe;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

pub use history::{CurveInfo, HistoryPage, HistoryRange, VisType};
pub use overview::OverviewPage;
pub use settings::{Settings, SettingsPage, format_ipv4, parse_ipv4};
pub use swipe::{PageSwipe, SharedOffset, snap_offset};

use crate::config::{PAGE_COUNT, PAGE_WIDTH};
use crate::device::{InverterGroup, PowerSample};
use crate::frame::TimeInfo;
use crate::touch::TouchInfo;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Overview,
    History,
    Settings,
}

impl Page {
    pub const ALL: [Self; PAGE_COUNT] = [Self::Overview, Self::History, Self::Settings];

    /// Position of the page in the strip.
    #[inline]
    pub const fn base_offset(self) -> f32 { self as usize as f32 * PAGE_WIDTH }

    /// Page nearest to the center of the screen at strip offset `x_offset`.
    pub fn at_offset(x_offset: f32) -> Self {
        let index = micromath::F32(-x_offset / PAGE_WIDTH).round().0;
        let index = index.clamp(0.0, (PAGE_COUNT - 1) as f32) as usize;
        Self::ALL[index]
    }
}

/// Everything the pages consume in one frame.
pub struct FrameInput<'a> {
    pub time: TimeInfo,
    /// Horizontal strip offset.
    pub x_offset: f32,
    pub groups: &'a [InverterGroup],
    pub home: PowerSample,
    pub meter: PowerSample,
    pub curves: &'a [CurveInfo],
    pub settings: &'a Settings,
}

pub struct Pages {
    pub overview: OverviewPage,
    pub history: HistoryPage,
    pub settings: SettingsPage,
}

impl Pages {
    pub fn new() -> Self {
        let mut pages = Self {
            overview: OverviewPage::new(),
            history: HistoryPage::new(),
            settings: SettingsPage::new(),
        };
        pages.overview.base_offset = Page::Overview.base_offset();
        pages.history.base_offset = Page::History.base_offset();
        pages.settings.base_offset = Page::Settings.base_offset();
        pages
    }

    /// Simulate and draw one frame of every page.
    pub fn frame<D>(
        &mut self,
        display: &mut D,
        input: &FrameInput<'_>,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        self.overview
            .frame(display, input.time, input.x_offset, input.groups, input.home, input.meter);
        self.history.draw(display, input.x_offset, input.curves);
        self.settings.draw(display, input.x_offset, input.settings);
    }

    /// Dispatch a touch to every page. Returns true when any widget consumed it.
    pub fn handle_touch(
        &mut self,
        touch: &TouchInfo,
        x_offset: f32,
        settings: &mut Settings,
    ) -> bool {
        // Every page must see every phase so captures are released
        let overview_grab = self.overview.handle_touch(touch, x_offset);
        let history_grab = self.history.handle_touch(touch, x_offset);
        let settings_grab = self.settings.handle_touch(touch, x_offset, settings);
        overview_grab || history_grab || settings_grab
    }
}

impl Default for Pages {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================
