//! Aksdark watchface
//!
//! Dark face showing time, date, battery, bluetooth, notification, heart rate
//! and step count. Every refresh compares the controller readings with what is
//! on screen and only touches the elements whose source changed.

use chrono::{Month, NaiveDateTime, Weekday};
use embedded_graphics::{geometry::Point, pixelcolor::Rgb565};

use super::{
    symbols::Symbol,
    task::{Scheduler, TaskHandle},
    widget::{Font, Screen, Widget, WidgetId},
    Error, WatchFace,
};
use crate::{
    config::{Palette, WatchFaceConfig},
    controllers::{Controllers, HeartRateState, Settings, Snapshot},
    time::DateTimeComponents,
};

/// Shown instead of a reading while the heart rate sensor is stopped
pub const HEART_RATE_PLACEHOLDER: &str = "-";

/// Shown next to the battery while charging, if the layout has room for it
pub const CHARGING_TEXT: &str = "CHG";

/// Time and date fields currently on screen
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderState {
    pub hour: Option<u8>,
    pub minute: Option<u8>,
    pub second: Option<u8>,
    pub year: Option<i32>,
    pub month: Option<Month>,
    pub day_of_week: Option<Weekday>,
    pub day: Option<u8>,
}

impl RenderState {
    fn time_differs(&self, now: &DateTimeComponents) -> bool {
        self.hour != Some(now.hour)
            || self.minute != Some(now.minute)
            || self.second != Some(now.second)
    }

    fn date_differs(&self, now: &DateTimeComponents) -> bool {
        self.year != Some(now.year)
            || self.month != Some(now.month)
            || self.day_of_week != Some(now.day_of_week)
            || self.day != Some(now.day)
    }
}

/// Elements of the watch face on the screen
#[derive(Debug, Clone, Copy)]
pub struct AksdarkWidgets {
    pub background: WidgetId,
    pub battery_value: WidgetId,
    pub charge_icon: WidgetId,
    pub battery_icon: WidgetId,
    pub time: WidgetId,
    pub date: WidgetId,
    pub step_value: WidgetId,
    pub step_icon: WidgetId,
    pub heartbeat_value: WidgetId,
    pub heartbeat_icon: WidgetId,
    pub notification_icon: WidgetId,
    pub bluetooth_icon: WidgetId,
    pub charging_text: Option<WidgetId>,
}

pub struct AksdarkWatchface<'a> {
    controllers: Controllers<'a>,
    palette: Palette,
    widgets: AksdarkWidgets,
    task: TaskHandle,
    render_state: RenderState,

    percent_remaining: Snapshot<u8>,
    power_present: Snapshot<bool>,
    charging: Snapshot<bool>,
    ble_connected: Snapshot<bool>,
    ble_radio_enabled: Snapshot<bool>,
    notification_state: Snapshot<bool>,
    current_date_time: Snapshot<NaiveDateTime>,
    heartbeat: Snapshot<u8>,
    heartbeat_running: Snapshot<bool>,
    step_count: Snapshot<u32>,
    motion_sensor_ok: Snapshot<bool>,
}

impl<'a> AksdarkWatchface<'a> {
    /// Build the face on `screen`, register it with the settings and the
    /// scheduler, and draw the first frame.
    ///
    /// On error the scheduler, the screen and the settings are left as if
    /// the face had never been built.
    pub fn new<S>(
        controllers: Controllers<'a>,
        settings: &dyn Settings,
        screen: &mut Screen,
        scheduler: &mut S,
        config: &WatchFaceConfig,
    ) -> Result<Self, Error>
    where
        S: Scheduler,
    {
        let task = scheduler.schedule_recurring(config.refresh_period)?;

        screen.clean();
        let widgets = match create_widgets(screen, config) {
            Ok(widgets) => widgets,
            Err(e) => {
                warn!("Aksdark watchface does not fit the screen");
                screen.clean();
                scheduler.cancel(task);
                return Err(e);
            }
        };
        settings.set_clock_face(Self::ID);

        let mut face = Self {
            controllers,
            palette: config.palette,
            widgets,
            task,
            render_state: RenderState::default(),
            percent_remaining: Snapshot::new(0),
            power_present: Snapshot::new(false),
            charging: Snapshot::new(false),
            ble_connected: Snapshot::new(false),
            ble_radio_enabled: Snapshot::new(false),
            notification_state: Snapshot::new(false),
            current_date_time: Snapshot::new(NaiveDateTime::default()),
            heartbeat: Snapshot::new(0),
            heartbeat_running: Snapshot::new(false),
            step_count: Snapshot::new(0),
            motion_sensor_ok: Snapshot::new(false),
        };
        info!("Aksdark watchface created with {} widgets", screen.len());

        face.refresh(screen);
        Ok(face)
    }

    /// Stop refreshing and remove the face from the screen.
    ///
    /// The timer is cancelled before any widget goes away.
    pub fn teardown<S>(self, screen: &mut Screen, scheduler: &mut S)
    where
        S: Scheduler,
    {
        scheduler.cancel(self.task);
        screen.clean();
        info!("Aksdark watchface removed");
    }

    pub fn widgets(&self) -> &AksdarkWidgets {
        &self.widgets
    }

    pub fn render_state(&self) -> &RenderState {
        &self.render_state
    }

    fn refresh_battery(&mut self, screen: &mut Screen) {
        let battery = self.controllers.battery;
        self.power_present.set(battery.is_power_present());
        self.percent_remaining.set(battery.percent_remaining());
        // Non-short-circuiting so both flags are consumed
        if self.percent_remaining.take_updated() | self.power_present.take_updated() {
            let percent = self.percent_remaining.peek();
            trace!("Battery at {}%", percent);
            screen.set_text_fmt(self.widgets.battery_value, format_args!("{}%", percent));
            screen.set_battery_percent(self.widgets.battery_icon, percent);
        }

        self.charging.set(battery.is_charging());
        if self.charging.take_updated() {
            let charging = self.charging.peek();
            trace!("Charging: {}", charging);
            screen.set_hidden(self.widgets.battery_icon, charging);
            screen.set_hidden(self.widgets.charge_icon, !charging);
            if let Some(text) = self.widgets.charging_text {
                screen.set_hidden(text, !charging);
            }
            if !charging {
                let percent = self.percent_remaining.peek();
                screen.set_battery_percent(self.widgets.battery_icon, percent);
            }
        }
    }

    fn refresh_ble(&mut self, screen: &mut Screen) {
        let ble = self.controllers.ble;
        self.ble_connected.set(ble.is_connected());
        self.ble_radio_enabled.set(ble.is_radio_enabled());
        if self.ble_connected.take_updated() | self.ble_radio_enabled.take_updated() {
            let color = connectivity_color(
                &self.palette,
                self.ble_radio_enabled.peek(),
                self.ble_connected.peek(),
            );
            screen.set_color(self.widgets.bluetooth_icon, color);
        }
    }

    fn refresh_notifications(&mut self, screen: &mut Screen) {
        self.notification_state
            .set(self.controllers.notifications.are_new_notifications_available());
        if self.notification_state.take_updated() {
            let (symbol, color) = if self.notification_state.peek() {
                (Symbol::Info, self.palette.notification_unread)
            } else {
                (Symbol::Check, self.palette.notification_cleared)
            };
            screen.set_symbol(self.widgets.notification_icon, symbol);
            screen.set_color(self.widgets.notification_icon, color);
        }
    }

    fn refresh_date_time(&mut self, screen: &mut Screen) {
        self.current_date_time
            .set(self.controllers.date_time.current_date_time());
        if !self.current_date_time.take_updated() {
            return;
        }
        let now = DateTimeComponents::from_date_time(&self.current_date_time.peek());

        if self.render_state.time_differs(&now) {
            screen.set_text_fmt(
                self.widgets.time,
                format_args!("{:02}:{:02}:{:02}", now.hour, now.minute, now.second),
            );
            self.render_state.hour = Some(now.hour);
            self.render_state.minute = Some(now.minute);
            self.render_state.second = Some(now.second);
        }

        if self.render_state.date_differs(&now) {
            screen.set_text_fmt(
                self.widgets.date,
                format_args!("{:02}-{:02}-{:04}", now.day, now.month_number(), now.year),
            );
            debug!("Date changed to {}-{}-{}", now.day, now.month_number(), now.year);
            self.render_state.year = Some(now.year);
            self.render_state.month = Some(now.month);
            self.render_state.day_of_week = Some(now.day_of_week);
            self.render_state.day = Some(now.day);
        }
    }

    fn refresh_heart_rate(&mut self, screen: &mut Screen) {
        let heart_rate = self.controllers.heart_rate;
        self.heartbeat.set(heart_rate.heart_rate());
        self.heartbeat_running
            .set(heart_rate.state() != HeartRateState::Stopped);
        if self.heartbeat.take_updated() | self.heartbeat_running.take_updated() {
            if self.heartbeat_running.peek() {
                let bpm = self.heartbeat.peek();
                screen.set_text_fmt(self.widgets.heartbeat_value, format_args!("{}", bpm));
            } else {
                screen.set_text(self.widgets.heartbeat_value, HEART_RATE_PLACEHOLDER);
            }
        }
    }

    fn refresh_motion(&mut self, screen: &mut Screen) {
        let motion = self.controllers.motion;
        self.step_count.set(motion.step_count());
        self.motion_sensor_ok.set(motion.is_sensor_ok());
        // A sensor fault redraws the count but is not shown differently
        if self.step_count.take_updated() | self.motion_sensor_ok.take_updated() {
            let steps = self.step_count.peek();
            screen.set_text_fmt(self.widgets.step_value, format_args!("{}", steps));
        }
    }
}

impl<'a> WatchFace for AksdarkWatchface<'a> {
    const ID: u8 = 3;

    fn task(&self) -> TaskHandle {
        self.task
    }

    fn refresh(&mut self, screen: &mut Screen) {
        self.refresh_battery(screen);
        self.refresh_ble(screen);
        self.refresh_notifications(screen);
        self.refresh_date_time(screen);
        self.refresh_heart_rate(screen);
        self.refresh_motion(screen);
    }
}

/// Bluetooth icon color. A disabled radio wins over the connection state.
pub fn connectivity_color(palette: &Palette, radio_enabled: bool, connected: bool) -> Rgb565 {
    match (radio_enabled, connected) {
        (false, _) => palette.ble_disabled,
        (true, true) => palette.ble_connected,
        (true, false) => palette.ble_disconnected,
    }
}

/// Create every element of the face, bottom to top.
fn create_widgets(screen: &mut Screen, config: &WatchFaceConfig) -> Result<AksdarkWidgets, Error> {
    let palette = &config.palette;
    let layout = &config.layout;
    let canvas = screen.size();
    let at = |offset: Point| layout.anchor.resolve(canvas, offset);

    let background = screen.create(Widget::panel(Point::zero(), canvas, palette.background))?;

    let battery_value =
        setup_label(screen, at(layout.battery_value), Font::Small, palette.battery)?;
    let (battery_icon, charge_icon) =
        setup_battery_icon(screen, at(layout.battery_icon), palette.battery)?;
    let charging_text = match layout.charging_text {
        Some(offset) => {
            let label = setup_label(screen, at(offset), Font::Small, palette.battery)?;
            screen.set_text(label, CHARGING_TEXT);
            Some(label)
        }
        None => None,
    };

    let time = setup_label(screen, at(layout.time), Font::Large, palette.time)?;
    let date = setup_label(screen, at(layout.date), Font::Small, palette.date)?;

    let step_value = setup_label(screen, at(layout.step_value), Font::Small, palette.steps)?;
    let step_icon = setup_icon(screen, at(layout.step_icon), palette.steps, Symbol::Shoe)?;

    let heartbeat_value =
        setup_label(screen, at(layout.heartbeat_value), Font::Small, palette.heartbeat)?;
    let heartbeat_icon =
        setup_icon(screen, at(layout.heartbeat_icon), palette.heartbeat, Symbol::HeartBeat)?;

    let notification_icon = setup_icon(
        screen,
        at(layout.notification_icon),
        palette.notification_cleared,
        Symbol::Info,
    )?;
    let bluetooth_icon = setup_icon(
        screen,
        at(layout.bluetooth_icon),
        palette.ble_connected,
        Symbol::Bluetooth,
    )?;

    Ok(AksdarkWidgets {
        background,
        battery_value,
        charge_icon,
        battery_icon,
        time,
        date,
        step_value,
        step_icon,
        heartbeat_value,
        heartbeat_icon,
        notification_icon,
        bluetooth_icon,
        charging_text,
    })
}

fn setup_label(
    screen: &mut Screen,
    position: Point,
    font: Font,
    color: Rgb565,
) -> Result<WidgetId, Error> {
    screen.create(Widget::label(position, font, color))
}

fn setup_icon(
    screen: &mut Screen,
    position: Point,
    color: Rgb565,
    symbol: Symbol,
) -> Result<WidgetId, Error> {
    screen.create(Widget::symbol(position, symbol, color))
}

/// Create the battery gauge and the charge icon sharing its place.
/// Returns `(gauge, charge icon)`.
fn setup_battery_icon(
    screen: &mut Screen,
    position: Point,
    color: Rgb565,
) -> Result<(WidgetId, WidgetId), Error> {
    let charge_icon = setup_icon(screen, position, color, Symbol::Plug)?;
    let gauge = screen.create(Widget::battery(position, color))?;
    Ok((gauge, charge_icon))
}
