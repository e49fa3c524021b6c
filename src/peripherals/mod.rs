//! PineTime peripherals used by the watch face firmware

pub(crate) mod backlight;
pub(crate) mod battery;
pub(crate) mod display;
