//! Home energy monitor simulator for desktop.
//!
//! Runs the shared page logic in an SDL2 window through the
//! embedded-graphics-simulator crate. The mouse acts as the touch panel.
//!
//! Keys:
//! - `A`: add an inverter group
//! - `D`: remove the last inverter group
//! - `F`: toggle the FPS readout

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]

mod demo;
mod timing;
mod touch_panel;

use std::fmt::Write;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::{Duration, Instant};

use emm_common::colors::WHITE;
use emm_common::config::{SCREEN_HEIGHT, SCREEN_WIDTH, TOUCH_SCALE};
use emm_common::frame::{FrameClock, remaining_budget_ms, smooth_toward};
use emm_common::pages::{FrameInput, Settings};
use emm_common::styles::{LABEL_STYLE_BLACK, RIGHT_ALIGNED};
use emm_common::thresholds::MAX_INVERTER_GROUPS;
use emm_common::touch::TouchTracker;
use emm_common::{DeviceIdAllocator, InverterGroup, Page, Pages};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};

use crate::demo::{demo_curves, record_history, update_readings};
use crate::timing::HISTORY_PERIOD;
use crate::touch_panel::{TouchPanel, TouchTask};

/// Inverter groups present at start.
const INITIAL_GROUPS: usize = 2;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    let output_settings = OutputSettingsBuilder::new().scale(2).build();
    let mut window = Window::new("Home Energy Monitor Sim", &output_settings);

    display.clear(WHITE).ok();
    window.update(&display);

    // Device topology
    let mut ids = DeviceIdAllocator::new();
    let mut groups: Vec<InverterGroup> = (0..INITIAL_GROUPS).map(|_| InverterGroup::allocate(&mut ids)).collect();

    // Pages and their inputs
    let mut pages = Pages::new();
    let mut settings = Settings::new();
    let mut curves = demo_curves();
    let mut history_tick = 0u32;
    let mut last_history = Instant::now();

    // Touch
    let panel = TouchPanel::new();
    let touch_task = TouchTask::spawn(panel.clone());
    let mut tracker = TouchTracker::new(TOUCH_SCALE);
    let mut x_offset = 0.0f32;
    let mut last_page = Page::Overview;

    // Timing
    let start = Instant::now();
    let mut clock = FrameClock::new();
    let mut show_fps = true;

    log::info!("Simulator started with {} inverter groups", groups.len());

    loop {
        let frame_start = Instant::now();

        // Handle events
        for ev in window.events() {
            if panel.handle_event(&ev) {
                continue;
            }
            match ev {
                SimulatorEvent::Quit => return,
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    match keycode {
                        Keycode::A => {
                            groups.push(InverterGroup::allocate(&mut ids));
                            if groups.len() > MAX_INVERTER_GROUPS {
                                log::warn!("{} groups exceed the supported {}", groups.len(), MAX_INVERTER_GROUPS);
                            } else {
                                log::info!("Added inverter {}", groups.len());
                            }
                        }
                        Keycode::D => {
                            if let Some(group) = groups.pop() {
                                log::info!("Removed inverter {}", group.inverter.device_id);
                            }
                        }
                        Keycode::F => show_fps = !show_fps,
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        // Touch: widgets first, the touch thread swipes unless a widget holds the finger
        let touch = tracker.update(panel.read());
        let grabbed = pages.handle_touch(&touch, x_offset, &mut settings);
        touch_task.widget_grab.store(grabbed && touch.is_down(), Ordering::Relaxed);

        x_offset = smooth_toward(x_offset, touch_task.offset.load());
        let page = Page::at_offset(x_offset);
        if page != last_page {
            log::debug!("Page: {page:?}");
            last_page = page;
        }

        // Fake readings
        let t = start.elapsed().as_secs_f32();
        let readings = update_readings(t, &mut groups);
        if last_history.elapsed() >= HISTORY_PERIOD {
            last_history = Instant::now();
            record_history(history_tick, &mut curves, &groups, &readings);
            history_tick = history_tick.wrapping_add(1);
        }

        // Simulate and render
        let time = clock.tick(start.elapsed().as_millis() as u32);
        display.clear(WHITE).ok();
        pages.frame(
            &mut display,
            &FrameInput {
                time,
                x_offset,
                groups: &groups,
                home: readings.home,
                meter: readings.meter,
                curves: &curves,
                settings: &settings,
            },
        );

        if show_fps {
            let mut fps_text: heapless::String<12> = heapless::String::new();
            write!(fps_text, "{:.0}fps", clock.fps()).ok();
            Text::with_text_style(
                &fps_text,
                Point::new(SCREEN_WIDTH as i32 - 2, SCREEN_HEIGHT as i32 - 3),
                LABEL_STYLE_BLACK,
                RIGHT_ALIGNED,
            )
            .draw(&mut display)
            .ok();
        }

        window.update(&display);

        let work_ms = frame_start.elapsed().as_millis() as u32;
        let sleep_ms = remaining_budget_ms(work_ms);
        if sleep_ms > 0 {
            thread::sleep(Duration::from_millis(u64::from(sleep_ms)));
        }
    }
}
