//! Battery charge estimation
//!
//! Implementation based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/battery.rs
//! and https://wiki.pine64.org/wiki/PineTime.

/// Largest value a 12-bit SAADC conversion can produce.
const ADC_MAX: i16 = 4095;

/// Convert a raw 12-bit ADC measurement of the battery divider into millivolts.
pub fn millivolts_from_adc(raw_measurement: i16) -> Result<u16, Error> {
    match raw_measurement {
        0..=ADC_MAX => {
            // For detailed explanation of formula check https://wiki.pine64.org/wiki/PineTime
            // Use u32 during calculation to prevent overflow
            Ok((raw_measurement as u32 * 2000 / 1241) as u16)
        }
        _ => Err(Error::InvalidMeasurement),
    }
}

/// Estimate the remaining battery capacity in percent (0–100).
pub fn percent_from_millivolts(voltage: u16) -> u8 {
    // Use fixed data points and linear interpolation in between
    // to estimate battery capacity.
    (match voltage {
        0..=3449 => 0,
        3450..=3699 => (voltage - 3450) / 5,
        3700..=4199 => 50 + (voltage - 3700) / 10,
        _ => 100,
    }) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    InvalidMeasurement,
}
