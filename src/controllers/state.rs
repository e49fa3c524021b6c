//! Shared controller state.
//!
//! Firmware tasks write the latest readings into these `static`-friendly
//! structs and the watch face reads them through the controller traits. Each
//! struct keeps its readings in one critical-section mutex, so a reader always
//! sees a complete write.

use core::cell::Cell;

use chrono::NaiveDateTime;
use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};

use super::{
    BatteryController, BleController, DateTimeController, HeartRateController, HeartRateState,
    MotionController, NotificationController, Settings,
};

type Shared<T> = Mutex<CriticalSectionRawMutex, Cell<T>>;

/// Local wall time. Reads 1970-01-01 00:00:00 until first set.
pub struct ClockState {
    time: Shared<Option<NaiveDateTime>>,
}

impl ClockState {
    pub const fn new() -> Self {
        Self {
            time: Mutex::new(Cell::new(None)),
        }
    }

    pub fn set(&self, time: NaiveDateTime) {
        self.time.lock(|cell| cell.set(Some(time)));
    }
}

impl Default for ClockState {
    fn default() -> Self {
        Self::new()
    }
}

impl DateTimeController for ClockState {
    fn current_date_time(&self) -> NaiveDateTime {
        self.time.lock(Cell::get).unwrap_or_default()
    }
}

/// One battery measurement
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryReading {
    /// Remaining charge, capped at 100
    pub percent: u8,
    pub power_present: bool,
    pub charging: bool,
}

pub struct BatteryState {
    reading: Shared<BatteryReading>,
}

impl BatteryState {
    pub const fn new() -> Self {
        Self {
            reading: Mutex::new(Cell::new(BatteryReading {
                percent: 0,
                power_present: false,
                charging: false,
            })),
        }
    }

    /// Store a new reading, returning whether anything changed.
    pub fn update(&self, percent: u8, power_present: bool, charging: bool) -> bool {
        let reading = BatteryReading {
            percent: percent.min(100),
            power_present,
            charging,
        };
        self.reading.lock(|cell| cell.replace(reading) != reading)
    }

    /// All three values of the last update together
    pub fn reading(&self) -> BatteryReading {
        self.reading.lock(Cell::get)
    }
}

impl Default for BatteryState {
    fn default() -> Self {
        Self::new()
    }
}

impl BatteryController for BatteryState {
    fn percent_remaining(&self) -> u8 {
        self.reading().percent
    }

    fn is_power_present(&self) -> bool {
        self.reading().power_present
    }

    fn is_charging(&self) -> bool {
        self.reading().charging
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct BleReading {
    connected: bool,
    radio_enabled: bool,
}

pub struct BleState {
    reading: Shared<BleReading>,
}

impl BleState {
    pub const fn new() -> Self {
        Self {
            reading: Mutex::new(Cell::new(BleReading {
                connected: false,
                radio_enabled: false,
            })),
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.reading.lock(|cell| {
            cell.set(BleReading {
                connected,
                ..cell.get()
            })
        });
    }

    pub fn set_radio_enabled(&self, enabled: bool) {
        self.reading.lock(|cell| {
            cell.set(BleReading {
                radio_enabled: enabled,
                ..cell.get()
            })
        });
    }
}

impl Default for BleState {
    fn default() -> Self {
        Self::new()
    }
}

impl BleController for BleState {
    fn is_connected(&self) -> bool {
        self.reading.lock(Cell::get).connected
    }

    fn is_radio_enabled(&self) -> bool {
        self.reading.lock(Cell::get).radio_enabled
    }
}

pub struct NotificationState {
    unread: Shared<bool>,
}

impl NotificationState {
    pub const fn new() -> Self {
        Self {
            unread: Mutex::new(Cell::new(false)),
        }
    }

    pub fn set_unread(&self, unread: bool) {
        self.unread.lock(|cell| cell.set(unread));
    }
}

impl Default for NotificationState {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationController for NotificationState {
    fn are_new_notifications_available(&self) -> bool {
        self.unread.lock(Cell::get)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeartRateReading {
    bpm: u8,
    state: HeartRateState,
}

pub struct HeartRateMonitorState {
    reading: Shared<HeartRateReading>,
}

impl HeartRateMonitorState {
    pub const fn new() -> Self {
        Self {
            reading: Mutex::new(Cell::new(HeartRateReading {
                bpm: 0,
                state: HeartRateState::Stopped,
            })),
        }
    }

    pub fn set_heart_rate(&self, bpm: u8) {
        self.reading.lock(|cell| cell.set(HeartRateReading { bpm, ..cell.get() }));
    }

    pub fn set_state(&self, state: HeartRateState) {
        self.reading.lock(|cell| cell.set(HeartRateReading { state, ..cell.get() }));
    }
}

impl Default for HeartRateMonitorState {
    fn default() -> Self {
        Self::new()
    }
}

impl HeartRateController for HeartRateMonitorState {
    fn heart_rate(&self) -> u8 {
        self.reading.lock(Cell::get).bpm
    }

    fn state(&self) -> HeartRateState {
        self.reading.lock(Cell::get).state
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct MotionReading {
    steps: u32,
    sensor_ok: bool,
}

pub struct MotionState {
    reading: Shared<MotionReading>,
}

impl MotionState {
    pub const fn new() -> Self {
        Self {
            reading: Mutex::new(Cell::new(MotionReading {
                steps: 0,
                sensor_ok: false,
            })),
        }
    }

    pub fn set_step_count(&self, steps: u32) {
        self.reading.lock(|cell| cell.set(MotionReading { steps, ..cell.get() }));
    }

    pub fn set_sensor_ok(&self, ok: bool) {
        self.reading.lock(|cell| {
            cell.set(MotionReading {
                sensor_ok: ok,
                ..cell.get()
            })
        });
    }
}

impl Default for MotionState {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionController for MotionState {
    fn step_count(&self) -> u32 {
        self.reading.lock(Cell::get).steps
    }

    fn is_sensor_ok(&self) -> bool {
        self.reading.lock(Cell::get).sensor_ok
    }
}

/// Persistent settings, currently only the selected clock face.
pub struct SettingsState {
    clock_face: Shared<u8>,
}

impl SettingsState {
    pub const fn new() -> Self {
        Self {
            clock_face: Mutex::new(Cell::new(0)),
        }
    }

    pub fn clock_face(&self) -> u8 {
        self.clock_face.lock(Cell::get)
    }
}

impl Default for SettingsState {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings for SettingsState {
    fn set_clock_face(&self, face: u8) {
        self.clock_face.lock(|cell| cell.set(face));
    }
}
