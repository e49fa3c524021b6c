//! Aksdark watch face for the PineTime.
//!
//! Everything that decides what ends up on screen lives in this library so it
//! can be exercised on the host with `cargo test`. The firmware binary
//! (`src/main.rs`, `embedded` feature) only feeds hardware readings into the
//! shared controller state and pushes the widget tree to the LCD.

#![cfg_attr(not(test), no_std)]

// This must go first so the logging macros are visible to every other module.
mod fmt;

pub mod battery;
pub mod config;
pub mod controllers;
pub mod time;
pub mod ui;

pub use config::WatchFaceConfig;
pub use controllers::{Controllers, Snapshot};
pub use ui::{aksdark::AksdarkWatchface, widget::Screen, WatchFace};
