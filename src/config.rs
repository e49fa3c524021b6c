//! Watch face configuration

use core::time::Duration;

use embedded_graphics::pixelcolor::Rgb565;

use crate::ui::layout::Layout;

pub const LCD_W: u32 = 240;
pub const LCD_H: u32 = 240;

/// Period of the display refresh task
pub const REFRESH_PERIOD: Duration = Duration::from_millis(20);

/// Convert a 24-bit `0xRRGGBB` color to the panel's RGB565 format.
pub const fn hex(rgb: u32) -> Rgb565 {
    let r = ((rgb >> 16) & 0xff) as u8;
    let g = ((rgb >> 8) & 0xff) as u8;
    let b = (rgb & 0xff) as u8;
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

/// Colors used by the watch face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb565,
    pub battery: Rgb565,
    pub time: Rgb565,
    pub date: Rgb565,
    pub steps: Rgb565,
    pub heartbeat: Rgb565,
    pub notification_unread: Rgb565,
    pub notification_cleared: Rgb565,
    pub ble_connected: Rgb565,
    pub ble_disconnected: Rgb565,
    pub ble_disabled: Rgb565,
}

impl Palette {
    pub const AKSDARK: Self = Self {
        background: hex(0x202020),
        battery: hex(0x6ccc2d),
        time: hex(0x21c7ca),
        date: hex(0x8394ff),
        steps: hex(0xffbf40),
        heartbeat: hex(0xff716a),
        notification_unread: hex(0xfd2e59),
        notification_cleared: hex(0x21c7ca),
        ble_connected: hex(0x3b96ff),
        ble_disconnected: hex(0xff1aba),
        ble_disabled: hex(0xfd2e59),
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchFaceConfig {
    pub refresh_period: Duration,
    pub palette: Palette,
    pub layout: Layout,
}

impl Default for WatchFaceConfig {
    fn default() -> Self {
        Self {
            refresh_period: REFRESH_PERIOD,
            palette: Palette::AKSDARK,
            layout: Layout::AKSDARK,
        }
    }
}
