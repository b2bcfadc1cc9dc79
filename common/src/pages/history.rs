//! History page: recorded power curves over four time ranges.
//!
//! Curves sharing a unit share one vertical scale. "Per component" draws
//! every curve on its own; "balance" stacks the curves of a unit on top of
//! each other so the top line is their sum.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use embedded_graphics::text::Text;
use heapless::{String, Vec};

use crate::colors::BLACK;
use crate::config::PAGE_WIDTH;
use crate::geometry::Rect;
use crate::log_buffer::LogBuffer;
use crate::styles::{CENTERED, LABEL_FONT, LEFT_ALIGNED, RIGHT_ALIGNED, TITLE_STYLE_BLACK};
use crate::thresholds::{MAX_CURVE_SCALES, MAX_HISTORY_SAMPLES};
use crate::touch::TouchInfo;
use crate::widgets::Button;

/// Plot area in page coordinates.
const GRAPH: Rect = Rect::new(30.0, 30.0, 202.0, 150.0);

const LEGEND_Y: i32 = 194;

const BUTTON_Y: f32 = 204.0;
const BUTTON_W: f32 = 44.0;
const BUTTON_H: f32 = 28.0;

const fn button_rect(index: usize) -> Rect { Rect::new(4.0 + index as f32 * (BUTTON_W + 3.0), BUTTON_Y, BUTTON_W, BUTTON_H) }

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HistoryRange {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl HistoryRange {
    pub const COUNT: usize = 4;
    pub const ALL: [Self; Self::COUNT] = [Self::Daily, Self::Weekly, Self::Monthly, Self::Yearly];

    #[inline]
    pub const fn index(self) -> usize { self as usize }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VisType {
    #[default]
    PowerPerComponent,
    PowerBalance,
}

impl VisType {
    const fn toggled(self) -> Self {
        match self {
            Self::PowerPerComponent => Self::PowerBalance,
            Self::PowerBalance => Self::PowerPerComponent,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::PowerPerComponent => "Comp",
            Self::PowerBalance => "Bal",
        }
    }
}

/// One recorded quantity with a sample series per range.
#[derive(Debug)]
pub struct CurveInfo {
    pub name: &'static str,
    pub unit_name: &'static str,
    pub color: Rgb565,
    pub data: [Vec<u16, MAX_HISTORY_SAMPLES>; HistoryRange::COUNT],
}

impl CurveInfo {
    pub const fn new(
        name: &'static str,
        unit_name: &'static str,
        color: Rgb565,
    ) -> Self {
        Self {
            name,
            unit_name,
            color,
            data: [const { Vec::new() }; HistoryRange::COUNT],
        }
    }

    /// Append a sample, dropping the oldest one when the series is full.
    pub fn push(
        &mut self,
        range: HistoryRange,
        value: u16,
    ) {
        let series = &mut self.data[range.index()];
        if series.is_full() {
            series.remove(0);
        }
        series.push(value).ok();
    }

    #[inline]
    pub fn samples(
        &self,
        range: HistoryRange,
    ) -> &[u16] {
        &self.data[range.index()]
    }
}

/// Value range of all curves with one unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveScale {
    pub unit_name: &'static str,
    pub min_value: f32,
    pub max_value: f32,
}

/// Buttons along the bottom edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryButton {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Vis,
}

impl HistoryButton {
    pub const COUNT: usize = 5;
    pub const ALL: [Self; Self::COUNT] = [Self::Daily, Self::Weekly, Self::Monthly, Self::Yearly, Self::Vis];

    #[inline]
    pub const fn index(self) -> usize { self as usize }

    const fn range(self) -> Option<HistoryRange> {
        match self {
            Self::Daily => Some(HistoryRange::Daily),
            Self::Weekly => Some(HistoryRange::Weekly),
            Self::Monthly => Some(HistoryRange::Monthly),
            Self::Yearly => Some(HistoryRange::Yearly),
            Self::Vis => None,
        }
    }
}

pub struct HistoryPage {
    pub base_offset: f32,
    pub range: HistoryRange,
    pub vis_type: VisType,
    curve_scales: Vec<CurveScale, MAX_CURVE_SCALES>,
    buttons: [Button; HistoryButton::COUNT],
    log: LogBuffer,
}

impl HistoryPage {
    pub const fn new() -> Self {
        Self {
            base_offset: PAGE_WIDTH,
            range: HistoryRange::Daily,
            vis_type: VisType::PowerPerComponent,
            curve_scales: Vec::new(),
            buttons: [
                Button::new(button_rect(0), "Day"),
                Button::new(button_rect(1), "Week"),
                Button::new(button_rect(2), "Month"),
                Button::new(button_rect(3), "Year"),
                Button::new(button_rect(4), VisType::PowerPerComponent.label()),
            ],
            log: LogBuffer::new(),
        }
    }

    #[inline]
    pub fn button(
        &self,
        which: HistoryButton,
    ) -> &Button {
        &self.buttons[which.index()]
    }

    #[inline]
    pub fn curve_scales(&self) -> &[CurveScale] { &self.curve_scales }

    #[inline]
    pub fn log(&self) -> &LogBuffer { &self.log }

    fn scale_for(
        &self,
        unit_name: &str,
    ) -> Option<&CurveScale> {
        self.curve_scales.iter().find(|s| s.unit_name == unit_name)
    }

    /// Recompute the per-unit scales for the current range and visualization.
    pub fn update_scales(
        &mut self,
        curves: &[CurveInfo],
    ) {
        self.curve_scales.clear();
        for (k, curve) in curves.iter().enumerate() {
            let samples = curve.samples(self.range);
            if samples.is_empty() {
                continue;
            }
            let (lo, hi) = match self.vis_type {
                VisType::PowerPerComponent => samples
                    .iter()
                    .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v as f32), hi.max(v as f32))),
                VisType::PowerBalance => {
                    let top = (0..samples.len()).map(|i| stacked(curves, k, self.range, i)).fold(0.0, f32::max);
                    (0.0, top)
                }
            };
            if let Some(scale) = self.curve_scales.iter_mut().find(|s| s.unit_name == curve.unit_name) {
                scale.min_value = scale.min_value.min(lo);
                scale.max_value = scale.max_value.max(hi);
            } else if self
                .curve_scales
                .push(CurveScale {
                    unit_name: curve.unit_name,
                    min_value: lo,
                    max_value: hi,
                })
                .is_err()
            {
                log_warn!(self.log, "No scale left for unit {}", curve.unit_name);
            }
        }
    }

    pub fn draw<D>(
        &mut self,
        display: &mut D,
        x_offset: f32,
        curves: &[CurveInfo],
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let ox = self.base_offset + x_offset;
        if ox > PAGE_WIDTH || ox + PAGE_WIDTH < 0.0 {
            return;
        }
        self.update_scales(curves);

        let mut title: String<24> = String::new();
        title.push_str("History ").ok();
        title.push_str(self.range.title()).ok();
        Text::with_text_style(&title, Point::new((ox + PAGE_WIDTH / 2.0) as i32, 16), TITLE_STYLE_BLACK, CENTERED)
            .draw(display)
            .ok();

        let area = GRAPH.translate(ox, 0.0);
        area.to_rectangle()
            .into_styled(PrimitiveStyle::with_stroke(BLACK, 1))
            .draw(display)
            .ok();

        if let Some(scale) = self.curve_scales.first() {
            draw_axis_label(display, scale.max_value, area.x - 2.0, area.y + 8.0);
            draw_axis_label(display, scale.min_value, area.x - 2.0, area.bottom());
        }

        let mut legend_x = ox as i32 + 4;
        for (k, curve) in curves.iter().enumerate() {
            let samples = curve.samples(self.range);
            if let Some(scale) = self.scale_for(curve.unit_name) {
                match self.vis_type {
                    VisType::PowerPerComponent => {
                        draw_series(display, area, samples.len(), |i| samples[i] as f32, scale, curve.color);
                    }
                    VisType::PowerBalance => {
                        let range = self.range;
                        draw_series(display, area, samples.len(), |i| stacked(curves, k, range, i), scale, curve.color);
                    }
                }
            }
            let style = MonoTextStyle::new(LABEL_FONT, curve.color);
            legend_x = Text::with_text_style(curve.name, Point::new(legend_x, LEGEND_Y), style, LEFT_ALIGNED)
                .draw(display)
                .map_or(legend_x, |next| next.x + 6);
        }

        for which in HistoryButton::ALL {
            let selected = which.range() == Some(self.range);
            self.buttons[which.index()].draw(display, ox, selected);
        }
    }

    /// Returns true when a button owns the touch.
    pub fn handle_touch(
        &mut self,
        touch: &TouchInfo,
        x_offset: f32,
    ) -> bool {
        let ox = self.base_offset + x_offset;
        let mut handled = false;
        let mut clicked = None;
        for which in HistoryButton::ALL {
            let response = self.buttons[which.index()].handle_touch(touch, ox);
            handled |= response.handled;
            if response.clicked {
                clicked = Some(which);
            }
        }
        match clicked {
            Some(HistoryButton::Vis) => {
                self.vis_type = self.vis_type.toggled();
                self.buttons[HistoryButton::Vis.index()].label = self.vis_type.label();
            }
            Some(which) => {
                if let Some(range) = which.range() {
                    self.range = range;
                }
            }
            None => {}
        }
        handled
    }
}

impl Default for HistoryPage {
    fn default() -> Self { Self::new() }
}

/// Sum of sample `i` over curve `k` and every earlier curve with the same unit.
fn stacked(
    curves: &[CurveInfo],
    k: usize,
    range: HistoryRange,
    i: usize,
) -> f32 {
    let unit = curves[k].unit_name;
    curves[..=k]
        .iter()
        .filter(|c| c.unit_name == unit)
        .filter_map(|c| c.samples(range).get(i))
        .map(|&v| v as f32)
        .sum()
}

fn draw_axis_label<D>(
    display: &mut D,
    value: f32,
    right: f32,
    baseline: f32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    use core::fmt::Write;

    let mut text: String<12> = String::new();
    if write!(text, "{value:.0}").is_ok() {
        Text::with_text_style(
            &text,
            Point::new(right as i32, baseline as i32),
            MonoTextStyle::new(LABEL_FONT, BLACK),
            RIGHT_ALIGNED,
        )
        .draw(display)
        .ok();
    }
}

/// Polyline of `count` values scaled into `area`.
fn draw_series<D, F>(
    display: &mut D,
    area: Rect,
    count: usize,
    value: F,
    scale: &CurveScale,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
    F: Fn(usize) -> f32,
{
    if count < 2 || area.w < 5.0 || area.h < 5.0 {
        return;
    }

    let graph_x = area.x as i32 + 2;
    let graph_y = area.y as i32 + 2;
    let graph_width = area.w as i32 - 4;
    let graph_height = area.h as i32 - 4;
    let max_x = graph_x + graph_width - 1;
    let max_y = graph_y + graph_height - 1;

    let data_range = scale.max_value - scale.min_value;
    let y_scale = if data_range > 0.1 { (graph_height - 1) as f32 / data_range } else { 0.0 };
    let x_step = (graph_width - 1) as f32 / (count - 1) as f32;

    let style = PrimitiveStyle::with_stroke(color, 1);
    let mut prev: Option<Point> = None;
    for i in 0..count {
        let x = (graph_x + (i as f32 * x_step) as i32).min(max_x);
        let y = if y_scale > 0.0 {
            (graph_y + graph_height - 1 - ((value(i) - scale.min_value) * y_scale) as i32).clamp(graph_y, max_y)
        } else {
            graph_y + (graph_height - 1) / 2
        };
        let point = Point::new(x, y);
        if let Some(p) = prev {
            Line::new(p, point).into_styled(style).draw(display).ok();
        }
        prev = Some(point);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BATTERY_BLOB, HOUSE_BLOB, PV_BLOB};
    use crate::geometry::Vec2;
    use crate::log_buffer::LogLevel;
    use crate::test_support::CountingDisplay;

    fn curves() -> std::vec::Vec<CurveInfo> {
        let mut pv = CurveInfo::new("PV", "W", PV_BLOB);
        let mut house = CurveInfo::new("House", "W", HOUSE_BLOB);
        let mut soc = CurveInfo::new("SoC", "%", BATTERY_BLOB);
        for (a, b, c) in [(100, 300, 40), (500, 200, 45), (300, 250, 50)] {
            pv.push(HistoryRange::Daily, a);
            house.push(HistoryRange::Daily, b);
            soc.push(HistoryRange::Daily, c);
        }
        std::vec![pv, house, soc]
    }

    fn tap(
        page: &mut HistoryPage,
        which: HistoryButton,
        x_offset: f32,
    ) -> bool {
        let center = page.button(which).rect.center() + Vec2::new(page.base_offset + x_offset, 0.0);
        let down = TouchInfo::from_samples(None, Some(center));
        let up = TouchInfo::from_samples(Some(center), None);
        page.handle_touch(&down, x_offset) && page.handle_touch(&up, x_offset)
    }

    #[test]
    fn test_scales_shared_per_unit() {
        let mut page = HistoryPage::new();
        page.update_scales(&curves());
        assert_eq!(
            page.curve_scales(),
            [
                CurveScale {
                    unit_name: "W",
                    min_value: 100.0,
                    max_value: 500.0
                },
                CurveScale {
                    unit_name: "%",
                    min_value: 40.0,
                    max_value: 50.0
                },
            ]
        );
    }

    #[test]
    fn test_balance_scale_is_stacked_sum() {
        let mut page = HistoryPage::new();
        page.vis_type = VisType::PowerBalance;
        let c = curves();
        page.update_scales(&c);
        assert_eq!(page.curve_scales()[0].max_value, 700.0);
        assert_eq!(page.curve_scales()[0].min_value, 0.0);
        assert_eq!(stacked(&c, 1, HistoryRange::Daily, 2), 550.0);
        assert_eq!(stacked(&c, 2, HistoryRange::Daily, 2), 50.0);
    }

    #[test]
    fn test_empty_range_has_no_scales() {
        let mut page = HistoryPage::new();
        page.range = HistoryRange::Yearly;
        page.update_scales(&curves());
        assert!(page.curve_scales().is_empty());
    }

    #[test]
    fn test_scale_overflow_is_logged() {
        const UNITS: [&str; MAX_CURVE_SCALES + 1] = ["W", "%", "V", "A", "Hz", "Wh", "kWh", "C", "s", "VA", "var", "pf", "Ah"];
        let curves: std::vec::Vec<CurveInfo> = UNITS
            .iter()
            .map(|&unit| {
                let mut curve = CurveInfo::new("X", unit, PV_BLOB);
                curve.push(HistoryRange::Daily, 10);
                curve
            })
            .collect();
        let mut page = HistoryPage::new();
        page.update_scales(&curves);
        assert_eq!(page.curve_scales().len(), MAX_CURVE_SCALES);
        assert_eq!(page.log().count_level(LogLevel::Warn), 1);
    }

    #[test]
    fn test_series_rolls_over() {
        let mut curve = CurveInfo::new("PV", "W", PV_BLOB);
        for v in 0..(MAX_HISTORY_SAMPLES as u16 + 3) {
            curve.push(HistoryRange::Weekly, v);
        }
        let samples = curve.samples(HistoryRange::Weekly);
        assert_eq!(samples.len(), MAX_HISTORY_SAMPLES);
        assert_eq!(samples[0], 3);
    }

    #[test]
    fn test_buttons_switch_range_and_vis() {
        let mut page = HistoryPage::new();
        assert!(tap(&mut page, HistoryButton::Monthly, -PAGE_WIDTH));
        assert_eq!(page.range, HistoryRange::Monthly);
        assert!(tap(&mut page, HistoryButton::Vis, -PAGE_WIDTH));
        assert_eq!(page.vis_type, VisType::PowerBalance);
        assert_eq!(page.button(HistoryButton::Vis).label, "Bal");
    }

    #[test]
    fn test_draw_only_when_visible() {
        let mut page = HistoryPage::new();
        let c = curves();
        let mut display = CountingDisplay::new();
        page.draw(&mut display, 100.0, &c);
        assert_eq!(display.drawn, 0);
        page.draw(&mut display, -PAGE_WIDTH, &c);
        assert!(display.count_color(HOUSE_BLOB) > 0);
        assert!(display.count_color(PV_BLOB) > 0);
    }
}
