//! Time keeping for the watch face

use core::time::Duration;

use chrono::{Datelike, Month, NaiveDateTime, TimeDelta, Timelike, Weekday};

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// A wall-clock instant broken down into the fields the watch face displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeComponents {
    pub year: i32,
    pub month: Month,
    /// Day of the month (1–31)
    pub day: u8,
    /// ISO weekday, Monday = 1
    pub day_of_week: Weekday,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTimeComponents {
    /// Decompose a naive instant. The value is taken as local wall time,
    /// no time zone conversion happens here.
    pub fn from_date_time(time: &NaiveDateTime) -> Self {
        let date = time.date();
        Self {
            year: date.year(),
            month: MONTHS[date.month0() as usize],
            day: date.day() as u8,
            day_of_week: date.weekday(),
            hour: time.hour() as u8,
            minute: time.minute() as u8,
            second: time.second() as u8,
        }
    }

    /// Month number, January = 1
    pub fn month_number(&self) -> u8 {
        self.month.number_from_month() as u8
    }
}

/// Wall-clock time anchored to a point of system uptime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeReference {
    /// Clock time
    time: NaiveDateTime,
    /// Uptime at which `time` was valid
    uptime: Duration,
}

impl TimeReference {
    /// Create new time reference from NaiveDateTime
    pub fn from_date_time(time: NaiveDateTime, uptime: Duration) -> Self {
        Self { time, uptime }
    }
}

/// Derives the current wall-clock time from system uptime.
#[derive(Debug)]
pub struct TimeManager {
    reference: TimeReference,
}

impl TimeManager {
    pub fn new(reference: TimeReference) -> Self {
        Self { reference }
    }

    /// Wall-clock time at the given uptime.
    ///
    /// Uptimes earlier than the reference yield the reference time.
    pub fn time_at(&self, uptime: Duration) -> NaiveDateTime {
        let elapsed = uptime.saturating_sub(self.reference.uptime);
        TimeDelta::from_std(elapsed)
            .ok()
            .and_then(|delta| self.reference.time.checked_add_signed(delta))
            .unwrap_or(self.reference.time)
    }
}
