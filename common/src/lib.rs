//! Core logic for the home energy monitor display.
//!
//! This crate contains everything the firmware and the desktop simulator share:
//!
//! - [`geometry`], [`colors`], [`config`], [`thresholds`]: value types and compile-time constants
//! - [`device`]: device ids, power samples and inverter groups
//! - [`energy`]: per-device energy accumulation
//! - [`blob`], [`spawner`], [`router`], [`topology`]: the energy-blob simulation
//! - [`touch`], [`widgets`]: touch model, buttons, icons and text styles
//! - [`pages`]: overview, history and settings pages plus horizontal paging
//! - [`frame`]: frame timing helpers
//! - [`log_buffer`]: bounded in-memory log mirrored to the `log` facade
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test -p emm-common
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), allowing use of the standard
//! test framework while the firmware build stays `no_std`.

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

#[macro_use]
pub mod log_buffer;

pub mod blob;
pub mod colors;
pub mod config;
pub mod device;
pub mod energy;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod pages;
pub mod router;
pub mod spawner;
pub mod styles;
pub mod thresholds;
pub mod topology;
pub mod touch;
pub mod widgets;

#[cfg(test)]
mod test_support;

// Re-export commonly used items
pub use device::{DeviceId, DeviceIdAllocator, InverterGroup, PowerSample};
pub use error::EmmError;
pub use geometry::{Rect, Vec2};
pub use pages::{Page, Pages};
