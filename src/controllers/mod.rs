//! Read-only views of the firmware controllers the watch face draws from.
//!
//! Each controller is reached through a small trait so the watch face can run
//! against the shared state in [`state`] on the device and against plain test
//! doubles on the host.

use chrono::NaiveDateTime;

pub mod state;

/// Wall clock, already in local time.
pub trait DateTimeController {
    fn current_date_time(&self) -> NaiveDateTime;
}

pub trait BatteryController {
    /// Remaining charge in percent (0–100)
    fn percent_remaining(&self) -> u8;
    /// External power connected
    fn is_power_present(&self) -> bool;
    fn is_charging(&self) -> bool;
}

pub trait BleController {
    fn is_connected(&self) -> bool;
    fn is_radio_enabled(&self) -> bool;
}

pub trait NotificationController {
    fn are_new_notifications_available(&self) -> bool;
}

/// Heart rate measurement state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HeartRateState {
    Stopped,
    NotEnoughData,
    NoTouch,
    Running,
}

pub trait HeartRateController {
    /// Last measured heart rate in beats per minute
    fn heart_rate(&self) -> u8;
    fn state(&self) -> HeartRateState;
}

pub trait MotionController {
    fn step_count(&self) -> u32;
    fn is_sensor_ok(&self) -> bool;
}

/// Settings sink the watch face registers itself with.
pub trait Settings {
    fn set_clock_face(&self, face: u8);
}

/// The set of controllers a watch face reads from.
#[derive(Clone, Copy)]
pub struct Controllers<'a> {
    pub date_time: &'a dyn DateTimeController,
    pub battery: &'a dyn BatteryController,
    pub ble: &'a dyn BleController,
    pub notifications: &'a dyn NotificationController,
    pub heart_rate: &'a dyn HeartRateController,
    pub motion: &'a dyn MotionController,
}

/// A value together with whether it changed since the reader last looked.
///
/// A new snapshot starts out updated, so the first observation always counts
/// as a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot<T> {
    value: T,
    updated: bool,
}

impl<T> Snapshot<T>
where
    T: Copy + PartialEq,
{
    pub const fn new(value: T) -> Self {
        Self { value, updated: true }
    }

    /// Store a fresh reading. Only a different value marks the snapshot updated.
    pub fn set(&mut self, value: T) {
        if self.value != value {
            self.value = value;
            self.updated = true;
        }
    }

    /// Return whether the value changed and mark it as seen.
    pub fn take_updated(&mut self) -> bool {
        core::mem::replace(&mut self.updated, false)
    }

    /// Current value without touching the updated flag.
    pub fn peek(&self) -> T {
        self.value
    }
}
