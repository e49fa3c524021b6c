//! Element placement

use embedded_graphics::geometry::{Point, Size};

/// Reference point on the canvas that element offsets are measured from.
///
/// Elements are placed with their left edge and vertical center on the
/// resolved point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    LeftMid,
    Center,
}

impl Anchor {
    pub fn resolve(self, canvas: Size, offset: Point) -> Point {
        let base = match self {
            Anchor::TopLeft => Point::zero(),
            Anchor::LeftMid => Point::new(0, canvas.height as i32 / 2),
            Anchor::Center => Point::new(canvas.width as i32 / 2, canvas.height as i32 / 2),
        };
        base + offset
    }
}

const BATTERY: Point = Point::new(200, -100);
const TIME: Point = Point::new(20, -40);
const STEP: Point = Point::new(40, 100);
const HEARTBEAT: Point = Point::new(STEP.x + 160, STEP.y);

/// Offsets of every element of the watch face relative to `anchor`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub anchor: Anchor,
    pub battery_value: Point,
    /// Shared by the battery gauge and the charge icon
    pub battery_icon: Point,
    pub time: Point,
    pub date: Point,
    pub step_value: Point,
    pub step_icon: Point,
    pub heartbeat_value: Point,
    pub heartbeat_icon: Point,
    pub notification_icon: Point,
    pub bluetooth_icon: Point,
    /// Explicit "charging" text, shown while the battery charges
    pub charging_text: Option<Point>,
}

impl Layout {
    pub const AKSDARK: Self = Self {
        anchor: Anchor::LeftMid,
        battery_value: BATTERY,
        battery_icon: Point::new(BATTERY.x - 29, BATTERY.y),
        time: TIME,
        date: Point::new(TIME.x + 40, TIME.y + 40),
        step_value: STEP,
        step_icon: Point::new(STEP.x - 27, STEP.y),
        heartbeat_value: HEARTBEAT,
        heartbeat_icon: Point::new(HEARTBEAT.x - 25, HEARTBEAT.y),
        notification_icon: Point::new(110, 40),
        bluetooth_icon: Point::new(20, -100),
        charging_text: None,
    };

    /// Variant that also spells out the charging state next to the bluetooth icon
    pub const AKSDARK_CHARGING_TEXT: Self = Self {
        charging_text: Some(Point::new(60, -100)),
        ..Self::AKSDARK
    };
}

impl Default for Layout {
    fn default() -> Self {
        Self::AKSDARK
    }
}
