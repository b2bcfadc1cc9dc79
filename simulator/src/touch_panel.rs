//! Mouse-driven stand-in for the capacitive touch panel.
//!
//! The window's mouse events update a shared sample in panel coordinates
//! (display coordinates times the touch scale). Both the render loop and the
//! touch thread read it, like they would poll the real controller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use emm_common::Vec2;
use emm_common::config::TOUCH_SCALE;
use emm_common::pages::{PageSwipe, SharedOffset};
use embedded_graphics::prelude::Point;
use embedded_graphics_simulator::SimulatorEvent;
use embedded_graphics_simulator::sdl2::MouseButton;

use crate::timing::TOUCH_PERIOD;

/// Current panel sample shared between the window and the touch thread.
#[derive(Clone, Default)]
pub struct TouchPanel {
    sample: Arc<Mutex<Option<Vec2>>>,
}

impl TouchPanel {
    pub fn new() -> Self { Self::default() }

    /// Latest raw sample, `None` while no finger is down.
    pub fn read(&self) -> Option<Vec2> { self.sample.lock().map_or(None, |sample| *sample) }

    fn write(
        &self,
        value: Option<Vec2>,
    ) {
        if let Ok(mut sample) = self.sample.lock() {
            *sample = value;
        }
    }

    /// Feed a window event. Returns true when the event was a touch event.
    pub fn handle_event(
        &self,
        event: &SimulatorEvent,
    ) -> bool {
        match *event {
            SimulatorEvent::MouseButtonDown {
                mouse_btn: MouseButton::Left,
                point,
            } => self.write(Some(to_panel(point))),
            SimulatorEvent::MouseMove { point } => {
                if self.read().is_some() {
                    self.write(Some(to_panel(point)));
                }
            }
            SimulatorEvent::MouseButtonUp {
                mouse_btn: MouseButton::Left,
                ..
            } => self.write(None),
            _ => return false,
        }
        true
    }
}

fn to_panel(point: Point) -> Vec2 { Vec2::new(point.x as f32 * TOUCH_SCALE, point.y as f32 * TOUCH_SCALE) }

/// Handles shared with the touch thread.
pub struct TouchTask {
    pub offset: Arc<SharedOffset>,
    pub widget_grab: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TouchTask {
    /// Spawn the sampling thread. It runs the page swipe on every panel sample.
    pub fn spawn(panel: TouchPanel) -> Self {
        let offset = Arc::new(SharedOffset::default());
        let widget_grab = Arc::new(AtomicBool::new(false));
        let running = Arc::new(AtomicBool::new(true));

        let handle = {
            let offset = Arc::clone(&offset);
            let widget_grab = Arc::clone(&widget_grab);
            let running = Arc::clone(&running);
            thread::spawn(move || {
                let mut swipe = PageSwipe::new();
                while running.load(Ordering::Relaxed) {
                    swipe.sample(panel.read(), widget_grab.load(Ordering::Relaxed), &offset);
                    thread::sleep(TOUCH_PERIOD);
                }
            })
        };

        Self {
            offset,
            widget_grab,
            running,
            handle: Some(handle),
        }
    }
}

impl Drop for TouchTask {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            log::error!("Touch thread panicked");
        }
    }
}
