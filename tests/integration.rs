//! End-to-end behaviour of the Aksdark watch face against test controllers.
//!
//! Run with: `cargo test --test integration`

use std::cell::Cell;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use embedded_graphics::{geometry::Size, pixelcolor::Rgb565, prelude::RgbColor};

use pinetime_aksdark::{
    config::Palette,
    controllers::{
        BatteryController, BleController, Controllers, DateTimeController, HeartRateController,
        HeartRateState, MotionController, NotificationController, Settings,
    },
    ui::{
        aksdark::HEART_RATE_PLACEHOLDER,
        symbols::Symbol,
        task::RefreshScheduler,
        widget::WidgetId,
    },
    AksdarkWatchface, Screen, WatchFace, WatchFaceConfig,
};

// ════════════════════════════════════════════════════════════════════════════
// Test controllers
// ════════════════════════════════════════════════════════════════════════════

struct Watch {
    now: Cell<NaiveDateTime>,
    percent: Cell<u8>,
    power_present: Cell<bool>,
    charging: Cell<bool>,
    connected: Cell<bool>,
    radio_enabled: Cell<bool>,
    unread: Cell<bool>,
    bpm: Cell<u8>,
    hr_state: Cell<HeartRateState>,
    steps: Cell<u32>,
    sensor_ok: Cell<bool>,
    clock_face: Cell<Option<u8>>,
}

impl Watch {
    fn new() -> Self {
        Self {
            now: Cell::new(at(2024, 3, 3, 10, 0, 0)),
            percent: Cell::new(64),
            power_present: Cell::new(false),
            charging: Cell::new(false),
            connected: Cell::new(true),
            radio_enabled: Cell::new(true),
            unread: Cell::new(false),
            bpm: Cell::new(0),
            hr_state: Cell::new(HeartRateState::Stopped),
            steps: Cell::new(0),
            sensor_ok: Cell::new(true),
            clock_face: Cell::new(None),
        }
    }

    fn controllers(&self) -> Controllers<'_> {
        Controllers {
            date_time: self,
            battery: self,
            ble: self,
            notifications: self,
            heart_rate: self,
            motion: self,
        }
    }
}

impl DateTimeController for Watch {
    fn current_date_time(&self) -> NaiveDateTime {
        self.now.get()
    }
}

impl BatteryController for Watch {
    fn percent_remaining(&self) -> u8 {
        self.percent.get()
    }
    fn is_power_present(&self) -> bool {
        self.power_present.get()
    }
    fn is_charging(&self) -> bool {
        self.charging.get()
    }
}

impl BleController for Watch {
    fn is_connected(&self) -> bool {
        self.connected.get()
    }
    fn is_radio_enabled(&self) -> bool {
        self.radio_enabled.get()
    }
}

impl NotificationController for Watch {
    fn are_new_notifications_available(&self) -> bool {
        self.unread.get()
    }
}

impl HeartRateController for Watch {
    fn heart_rate(&self) -> u8 {
        self.bpm.get()
    }
    fn state(&self) -> HeartRateState {
        self.hr_state.get()
    }
}

impl MotionController for Watch {
    fn step_count(&self) -> u32 {
        self.steps.get()
    }
    fn is_sensor_ok(&self) -> bool {
        self.sensor_ok.get()
    }
}

impl Settings for Watch {
    fn set_clock_face(&self, face: u8) {
        self.clock_face.set(Some(face));
    }
}

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

struct Harness<'a> {
    screen: Screen,
    scheduler: RefreshScheduler<2>,
    face: AksdarkWatchface<'a>,
}

impl<'a> Harness<'a> {
    fn new(watch: &'a Watch) -> Self {
        let mut screen = Screen::new(Size::new(240, 240), Rgb565::BLACK);
        let mut scheduler = RefreshScheduler::new();
        let face = AksdarkWatchface::new(
            watch.controllers(),
            watch,
            &mut screen,
            &mut scheduler,
            &WatchFaceConfig::default(),
        )
        .unwrap();
        Self { screen, scheduler, face }
    }

    fn refresh(&mut self) {
        self.face.refresh(&mut self.screen);
    }

    fn text(&self, id: WidgetId) -> &str {
        self.screen.widget(id).unwrap().text().unwrap()
    }

    fn revision(&self, id: WidgetId) -> u32 {
        self.screen.widget(id).unwrap().revision()
    }

    fn hidden(&self, id: WidgetId) -> bool {
        self.screen.widget(id).unwrap().is_hidden()
    }

    fn color(&self, id: WidgetId) -> Rgb565 {
        self.screen.widget(id).unwrap().color()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Construction
// ════════════════════════════════════════════════════════════════════════════

#[test]
fn registers_as_clock_face_three() {
    let watch = Watch::new();
    let _harness = Harness::new(&watch);
    assert_eq!(watch.clock_face.get(), Some(3));
}

#[test]
fn first_frame_is_complete() {
    let watch = Watch::new();
    watch.hr_state.set(HeartRateState::Running);
    watch.bpm.set(72);
    watch.steps.set(4321);
    let harness = Harness::new(&watch);
    let widgets = *harness.face.widgets();

    assert_eq!(harness.text(widgets.time), "10:00:00");
    assert_eq!(harness.text(widgets.date), "03-03-2024");
    assert_eq!(harness.text(widgets.battery_value), "64%");
    assert_eq!(harness.text(widgets.heartbeat_value), "72");
    assert_eq!(harness.text(widgets.step_value), "4321");
    assert_eq!(harness.screen.widget(widgets.battery_icon).unwrap().battery_percent(), Some(64));
    assert_eq!(harness.color(widgets.bluetooth_icon), Palette::AKSDARK.ble_connected);
    assert!(harness.screen.needs_render());
}

// ════════════════════════════════════════════════════════════════════════════
// Idempotence
// ════════════════════════════════════════════════════════════════════════════

#[test]
fn refresh_without_changes_mutates_nothing() {
    let watch = Watch::new();
    let mut harness = Harness::new(&watch);
    let after_first = harness.screen.mutations();

    harness.refresh();
    harness.refresh();
    assert_eq!(harness.screen.mutations(), after_first);
}

#[test]
fn power_present_change_redraws_once() {
    let watch = Watch::new();
    let mut harness = Harness::new(&watch);
    let battery_value = harness.face.widgets().battery_value;
    let revision = harness.revision(battery_value);

    watch.power_present.set(true);
    harness.refresh();
    assert_eq!(harness.revision(battery_value), revision + 1);

    harness.refresh();
    assert_eq!(harness.revision(battery_value), revision + 1);
}

// ════════════════════════════════════════════════════════════════════════════
// Field isolation
// ════════════════════════════════════════════════════════════════════════════

#[test]
fn seconds_tick_redraws_only_time() {
    let watch = Watch::new();
    let mut harness = Harness::new(&watch);
    let widgets = *harness.face.widgets();
    let date_revision = harness.revision(widgets.date);
    let time_revision = harness.revision(widgets.time);

    watch.now.set(at(2024, 3, 3, 10, 0, 1));
    harness.refresh();

    assert_eq!(harness.text(widgets.time), "10:00:01");
    assert_eq!(harness.revision(widgets.time), time_revision + 1);
    assert_eq!(harness.revision(widgets.date), date_revision);
}

#[test]
fn midnight_redraws_time_and_date() {
    let watch = Watch::new();
    watch.now.set(at(2024, 12, 31, 23, 59, 59));
    let mut harness = Harness::new(&watch);
    let widgets = *harness.face.widgets();
    let date_revision = harness.revision(widgets.date);
    let time_revision = harness.revision(widgets.time);

    watch.now.set(at(2025, 1, 1, 0, 0, 0));
    harness.refresh();

    assert_eq!(harness.text(widgets.time), "00:00:00");
    assert_eq!(harness.text(widgets.date), "01-01-2025");
    assert_eq!(harness.revision(widgets.time), time_revision + 1);
    assert_eq!(harness.revision(widgets.date), date_revision + 1);
}

#[test]
fn date_change_at_same_time_of_day_redraws_only_date() {
    let watch = Watch::new();
    let mut harness = Harness::new(&watch);
    let widgets = *harness.face.widgets();
    let time_revision = harness.revision(widgets.time);

    watch.now.set(at(2024, 3, 4, 10, 0, 0));
    harness.refresh();

    assert_eq!(harness.text(widgets.date), "04-03-2024");
    assert_eq!(harness.revision(widgets.time), time_revision);
}

#[test]
fn sub_second_change_draws_nothing() {
    let watch = Watch::new();
    let mut harness = Harness::new(&watch);
    let mutations = harness.screen.mutations();

    let later = NaiveDate::from_ymd_opt(2024, 3, 3)
        .unwrap()
        .and_hms_milli_opt(10, 0, 0, 500)
        .unwrap();
    watch.now.set(later);
    harness.refresh();

    assert_eq!(harness.screen.mutations(), mutations);
}

#[test]
fn battery_change_leaves_other_widgets_alone() {
    let watch = Watch::new();
    let mut harness = Harness::new(&watch);
    let widgets = *harness.face.widgets();
    let mutations = harness.screen.mutations();
    let untouched = [
        widgets.time,
        widgets.date,
        widgets.step_value,
        widgets.heartbeat_value,
        widgets.notification_icon,
        widgets.bluetooth_icon,
    ];
    let revisions: Vec<u32> = untouched.iter().map(|id| harness.revision(*id)).collect();

    watch.percent.set(63);
    harness.refresh();

    assert_eq!(harness.text(widgets.battery_value), "63%");
    assert_eq!(harness.screen.mutations(), mutations + 2);
    let after: Vec<u32> = untouched.iter().map(|id| harness.revision(*id)).collect();
    assert_eq!(revisions, after);
}

// ════════════════════════════════════════════════════════════════════════════
// Battery
// ════════════════════════════════════════════════════════════════════════════

#[test]
fn gauge_follows_percentage() {
    let watch = Watch::new();
    let mut harness = Harness::new(&watch);
    let gauge = harness.face.widgets().battery_icon;

    for percent in [0, 20, 40, 60, 80, 100] {
        watch.percent.set(percent);
        harness.refresh();
        assert_eq!(harness.screen.widget(gauge).unwrap().battery_percent(), Some(percent));
    }
}

#[test]
fn charging_icons_are_mutually_exclusive() {
    let watch = Watch::new();
    let mut harness = Harness::new(&watch);
    let widgets = *harness.face.widgets();

    assert!(!harness.hidden(widgets.battery_icon));
    assert!(harness.hidden(widgets.charge_icon));

    watch.charging.set(true);
    harness.refresh();
    assert!(harness.hidden(widgets.battery_icon));
    assert!(!harness.hidden(widgets.charge_icon));

    watch.charging.set(false);
    watch.percent.set(90);
    harness.refresh();
    assert!(!harness.hidden(widgets.battery_icon));
    assert!(harness.hidden(widgets.charge_icon));
    assert_eq!(harness.screen.widget(widgets.battery_icon).unwrap().battery_percent(), Some(90));
}

// ════════════════════════════════════════════════════════════════════════════
// Connectivity & notifications
// ════════════════════════════════════════════════════════════════════════════

#[test]
fn disabled_radio_wins_over_connection() {
    let watch = Watch::new();
    let mut harness = Harness::new(&watch);
    let icon = harness.face.widgets().bluetooth_icon;
    let palette = Palette::AKSDARK;

    watch.radio_enabled.set(false);
    watch.connected.set(true);
    harness.refresh();
    assert_eq!(harness.color(icon), palette.ble_disabled);

    watch.radio_enabled.set(true);
    harness.refresh();
    assert_eq!(harness.color(icon), palette.ble_connected);

    watch.connected.set(false);
    harness.refresh();
    assert_eq!(harness.color(icon), palette.ble_disconnected);
}

#[test]
fn notification_icon_swaps_glyph_and_color() {
    let watch = Watch::new();
    let mut harness = Harness::new(&watch);
    let icon = harness.face.widgets().notification_icon;
    let palette = Palette::AKSDARK;

    assert_eq!(harness.screen.widget(icon).unwrap().symbol_kind(), Some(Symbol::Check));
    assert_eq!(harness.color(icon), palette.notification_cleared);

    watch.unread.set(true);
    harness.refresh();
    assert_eq!(harness.screen.widget(icon).unwrap().symbol_kind(), Some(Symbol::Info));
    assert_eq!(harness.color(icon), palette.notification_unread);
}

// ════════════════════════════════════════════════════════════════════════════
// Heart rate & steps
// ════════════════════════════════════════════════════════════════════════════

#[test]
fn stopped_sensor_shows_placeholder() {
    let watch = Watch::new();
    watch.hr_state.set(HeartRateState::Running);
    watch.bpm.set(88);
    let mut harness = Harness::new(&watch);
    let value = harness.face.widgets().heartbeat_value;
    assert_eq!(harness.text(value), "88");

    watch.hr_state.set(HeartRateState::Stopped);
    harness.refresh();
    assert_eq!(harness.text(value), HEART_RATE_PLACEHOLDER);

    // A late reading while stopped still shows the placeholder
    watch.bpm.set(90);
    harness.refresh();
    assert_eq!(harness.text(value), HEART_RATE_PLACEHOLDER);
}

#[test]
fn non_stopped_states_count_as_running() {
    let watch = Watch::new();
    watch.bpm.set(61);
    watch.hr_state.set(HeartRateState::NotEnoughData);
    let harness = Harness::new(&watch);
    assert_eq!(harness.text(harness.face.widgets().heartbeat_value), "61");
}

#[test]
fn step_count_updates() {
    let watch = Watch::new();
    let mut harness = Harness::new(&watch);
    let value = harness.face.widgets().step_value;

    watch.steps.set(u32::MAX);
    harness.refresh();
    assert_eq!(harness.text(value), "4294967295");
}

// ════════════════════════════════════════════════════════════════════════════
// Scheduling & teardown
// ════════════════════════════════════════════════════════════════════════════

#[test]
fn scheduler_drives_refresh() {
    let watch = Watch::new();
    let mut harness = Harness::new(&watch);
    let time = harness.face.widgets().time;

    watch.now.set(at(2024, 3, 3, 10, 0, 1));
    for tick in 1..=3u64 {
        for handle in harness.scheduler.poll(Duration::from_millis(20 * tick)) {
            assert_eq!(handle, harness.face.task());
            harness.face.refresh(&mut harness.screen);
        }
    }
    assert_eq!(harness.text(time), "10:00:01");
}

#[test]
fn teardown_stops_all_mutation() {
    let watch = Watch::new();
    let harness = Harness::new(&watch);
    let Harness {
        mut screen,
        mut scheduler,
        face,
    } = harness;
    let task = face.task();

    face.teardown(&mut screen, &mut scheduler);
    assert!(!scheduler.is_scheduled(task));
    assert_eq!(scheduler.active(), 0);
    assert!(screen.is_empty());

    let mutations = screen.mutations();
    watch.now.set(at(2030, 1, 1, 0, 0, 0));
    watch.percent.set(1);
    assert!(scheduler.poll(Duration::from_secs(10)).is_empty());
    assert_eq!(screen.mutations(), mutations);
}

#[test]
fn new_face_after_teardown_reuses_screen() {
    let watch = Watch::new();
    let Harness {
        mut screen,
        mut scheduler,
        face,
    } = Harness::new(&watch);
    face.teardown(&mut screen, &mut scheduler);

    let face = AksdarkWatchface::new(
        watch.controllers(),
        &watch,
        &mut screen,
        &mut scheduler,
        &WatchFaceConfig::default(),
    )
    .unwrap();
    assert_eq!(screen.len(), 12);
    assert_eq!(scheduler.active(), 1);
    assert_eq!(screen.widget(face.widgets().time).unwrap().text(), Some("10:00:00"));
}
