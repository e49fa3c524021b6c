#![no_std]
#![no_main]

mod peripherals;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use embassy_executor::Spawner;
use embassy_nrf::{
    bind_interrupts,
    config::{Config, Debug, HfclkSource, LfclkSource},
    gpio::{Input, Level, Output, OutputDrive, Pull},
    interrupt::Priority,
    peripherals::SPI2,
    saadc::{self, ChannelConfig, Resolution, Saadc},
    spim,
};
use embassy_time::{Duration, Instant, Ticker, Timer};

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use peripherals::{backlight::Backlight, battery::Battery, display::Display};
use pinetime_aksdark::{
    config::{Palette, LCD_H, LCD_W, REFRESH_PERIOD},
    controllers::{
        state::{
            BatteryState, BleState, ClockState, HeartRateMonitorState, MotionState,
            NotificationState, SettingsState,
        },
        Controllers,
    },
    time::{TimeManager, TimeReference},
    ui::task::RefreshScheduler,
    AksdarkWatchface, Screen, WatchFace, WatchFaceConfig,
};

// Others
use chrono::{DateTime, Timelike};
use embedded_graphics::geometry::Size;

// Local wall time at build, the clock starts from it
include!(concat!(env!("OUT_DIR"), "/utc.rs"));

// Shared controller state
static BATTERY: BatteryState = BatteryState::new();
static BLE: BleState = BleState::new();
static CLOCK: ClockState = ClockState::new();
static HEART_RATE: HeartRateMonitorState = HeartRateMonitorState::new();
static MOTION: MotionState = MotionState::new();
static NOTIFICATIONS: NotificationState = NotificationState::new();
static SETTINGS: SettingsState = SettingsState::new();

/// System uptime as a core duration
fn uptime() -> core::time::Duration {
    core::time::Duration::from_micros(Instant::now().as_micros())
}

/// Chip configuration
fn system_config() -> Config {
    // Config is `non_exhaustive`, start from the defaults
    let mut config = Config::default();

    // Set high-frequency and low-frequency clock sources to external
    config.hfclk_source = HfclkSource::ExternalXtal;
    config.lfclk_source = LfclkSource::ExternalXtal;

    // Enable DC/DC regulator to massively reduce runtime current consumption
    config.dcdc.reg1 = true;

    // Keep priorities 0, 1 and 4 free for a future SoftDevice
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;

    config.debug = Debug::Allowed;

    config
}

/// Fetch the battery status from the hardware.
#[embassy_executor::task(pool_size = 1)]
async fn update_battery_status(mut battery: Battery<'static>) {
    loop {
        match battery.sample().await {
            Ok(sample) => {
                if BATTERY.update(sample.percent, sample.power_present, sample.charging) {
                    defmt::info!(
                        "Battery status: {}% ({})",
                        sample.percent,
                        if sample.charging { "charging" } else { "discharging" }
                    );
                }
            }
            Err(e) => defmt::warn!("Battery measurement failed: {}", e),
        }

        // Re-schedule the timer interrupt in 1s
        Timer::after(Duration::from_secs(1)).await;
    }
}

/// Keep the shared clock in step with system uptime.
#[embassy_executor::task(pool_size = 1)]
async fn update_time() {
    let build_time = DateTime::from_timestamp(BUILD_LOCAL_EPOCH, 0)
        .map(|time| time.naive_utc())
        .unwrap_or_default();
    let manager = TimeManager::new(TimeReference::from_date_time(build_time, uptime()));

    let mut tick = Ticker::every(Duration::from_millis(250));
    loop {
        let now = manager.time_at(uptime());
        CLOCK.set(now);
        defmt::trace!("Time updated: {}:{}:{}", now.hour(), now.minute(), now.second());

        tick.next().await;
    }
}

/// Drive the watch face and push its changes to the LCD.
#[embassy_executor::task(pool_size = 1)]
async fn update_lcd(mut display: Display<'static, SPI2>) {
    let config = WatchFaceConfig::default();
    let mut screen = Screen::new(Size::new(LCD_W, LCD_H), Palette::AKSDARK.background);
    let mut scheduler: RefreshScheduler<1> = RefreshScheduler::new();

    let controllers = Controllers {
        date_time: &CLOCK,
        battery: &BATTERY,
        ble: &BLE,
        notifications: &NOTIFICATIONS,
        heart_rate: &HEART_RATE,
        motion: &MOTION,
    };
    let mut face = unwrap!(AksdarkWatchface::new(
        controllers,
        &SETTINGS,
        &mut screen,
        &mut scheduler,
        &config,
    ));

    let mut tick = Ticker::every(Duration::from_millis(REFRESH_PERIOD.as_millis() as u64));
    loop {
        for handle in scheduler.poll(uptime()) {
            if handle == face.task() {
                face.refresh(&mut screen);
            }
        }

        if screen.needs_render() {
            if let Err(e) = display.render(&mut screen) {
                defmt::warn!("Display update failed: {}", e);
            }
        }

        tick.next().await;
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let mut p = embassy_nrf::init(system_config());
    defmt::info!("Initializing");

    // Initialize SAADC
    let mut saadc_config = saadc::Config::default();
    // Set resolution to 12bit, necessary for correct battery status calculation
    saadc_config.resolution = Resolution::_12BIT;
    // Pin P0.31: Voltage level
    let channel_config = ChannelConfig::single_ended(&mut p.P0_31);
    let saadc = Saadc::new(p.SAADC, Irqs, saadc_config, [channel_config]);
    saadc.calibrate().await;

    // Initialize Backlight
    let backlight = unwrap!(Backlight::init(
        Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        Output::new(p.P0_22, Level::High, OutputDrive::Standard),
        Output::new(p.P0_23, Level::High, OutputDrive::Standard),
        2,
    ));

    // Initialize Battery
    let battery = Battery::init(
        saadc,
        Input::new(p.P0_12, Pull::None),
        Input::new(p.P0_19, Pull::None),
    );

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let display = unwrap!(Display::init(
        spim,
        Output::new(p.P0_25, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
    ));

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(update_battery_status(battery)));
    unwrap!(spawner.spawn(update_time()));
    unwrap!(spawner.spawn(update_lcd(display)));

    // Keep the backlight pins driven for the lifetime of the firmware
    core::mem::forget(backlight);
}
