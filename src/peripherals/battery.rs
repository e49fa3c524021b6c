//! Battery status check
//!
//! Implementation based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/battery.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use embassy_nrf::{
    gpio::Input,
    peripherals::{P0_12, P0_19},
    saadc::Saadc,
};

use pinetime_aksdark::battery::{self, millivolts_from_adc, percent_from_millivolts};

/// One reading of the battery hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct BatterySample {
    pub percent: u8,
    pub power_present: bool,
    pub charging: bool,
}

/// Battery API
pub struct Battery<'a> {
    /// ADC instance for battery voltage measurement
    adc: Saadc<'a, 1>,
    /// Charge indication pin:
    /// high = battery, low = charging
    pin_charge_indication: Input<'a, P0_12>,
    /// Power presence pin:
    /// high = battery, low = external power
    pin_power_presence: Input<'a, P0_19>,
}

impl<'a> Battery<'a> {
    /// Configure battery settings on boot
    pub fn init(
        adc: Saadc<'a, 1>,
        charge_pin: Input<'a, P0_12>,
        power_pin: Input<'a, P0_19>,
    ) -> Self {
        Self {
            adc,
            pin_charge_indication: charge_pin,
            pin_power_presence: power_pin,
        }
    }

    /// Read charge level and power state from the hardware.
    pub async fn sample(&mut self) -> Result<BatterySample, battery::Error> {
        let mut buf = [0; 1];
        self.adc.sample(&mut buf).await;
        let voltage = millivolts_from_adc(buf[0])?;

        Ok(BatterySample {
            percent: percent_from_millivolts(voltage),
            power_present: self.pin_power_presence.is_low(),
            charging: self.pin_charge_indication.is_low(),
        })
    }
}
