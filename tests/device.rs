use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use lantern::prelude::*;

/// Collects everything the device dispatches.
struct Recorder {
    events: Rc<RefCell<Vec<Event>>>,
}

impl EventReceiver for Recorder {
    fn on_event(&mut self, event: &Event) -> bool {
        self.events.borrow_mut().push(*event);
        true
    }
}

fn null_device() -> (Device, Rc<RefCell<Vec<Event>>>) {
    let _ = env_logger::try_init();

    let events = Rc::new(RefCell::new(Vec::new()));
    let params = DeviceParams {
        driver_type: DriverType::Null,
        event_receiver: Some(Box::new(Recorder {
            events: events.clone(),
        })),
        ..DeviceParams::default()
    };

    let device = Device::new(params).expect("null device");
    (device, events)
}

#[test]
fn a_null_device_comes_up_with_the_null_driver() {
    let (device, _) = null_device();

    let driver = device.driver().expect("driver");
    assert_eq!(driver.driver_type(), DriverType::Null);
    assert_eq!(driver.name(), "null");
    assert_eq!(device.dimensions(), Vector2::new(800, 600));
}

#[test]
fn run_keeps_reporting_running_until_an_explicit_close() {
    let (mut device, _) = null_device();

    assert!(device.run());
    assert!(device.run());

    device.close();
    assert!(!device.run());
    assert!(!device.run());
}

#[test]
fn user_events_round_trip_through_the_event_queue() {
    let (mut device, events) = null_device();

    device.post_user_event(7, -3);
    device.post_user_event(42, 0);
    assert!(device.run());

    let events = events.borrow();
    assert_eq!(
        *events,
        vec![
            Event::User(UserEvent { data1: 7, data2: -3 }),
            Event::User(UserEvent { data1: 42, data2: 0 }),
        ]
    );
}

#[test]
fn window_operations_are_no_ops_under_the_null_driver() {
    let (mut device, _) = null_device();

    device.set_window_caption("never shown");
    device.set_resizable(true);
    device.minimize_window();
    device.maximize_window();
    device.restore_window();
    device.set_window_size(Vector2::new(640, 480));
    assert_eq!(device.dimensions(), Vector2::new(640, 480));

    assert!(!device.is_window_active());
    assert!(!device.is_window_focused());
    assert!(!device.is_window_minimized());
    assert_eq!(device.window_position(), Vector2::new(0, 0));
    assert!(device.video_modes().is_empty());
}

#[test]
fn an_unsupported_driver_type_yields_no_driver_but_never_a_crash() {
    let _ = env_logger::try_init();

    let params = DeviceParams {
        driver_type: DriverType::Software,
        ..DeviceParams::default()
    };
    let mut device = Device::new(params).expect("device without driver");

    assert!(device.driver().is_none());

    // The device is still orderly: it keeps running until it is asked to
    // close, and shuts down cleanly.
    assert!(device.run());
    device.close();
    assert!(!device.run());
}

#[test]
fn sleeping_with_a_paused_timer_hides_the_idle_wait() {
    let (mut device, _) = null_device();

    device.run();
    let before = device.timer().time();

    device.sleep(Duration::from_millis(30), true);

    device.run();
    let after = device.timer().time();

    // Some time passes around the sleep itself, but the 30ms wait must
    // not be part of it.
    assert!((after - before) < Duration::from_millis(30));
}

#[test]
fn cursor_queries_work_without_a_window() {
    let (mut device, _) = null_device();

    assert_eq!(device.cursor_position(), Vector2::new(0, 0));
    assert!(device.is_cursor_visible());

    device.set_cursor_position(Vector2::new(10_000, 10));
    // Clamped into the client area.
    assert_eq!(device.cursor_position(), Vector2::new(800, 10));

    device.set_cursor_reference_rect(Some(Rect::with_dimensions(Point2::new(0, 0), 100, 100)));
    assert_eq!(
        device.cursor_relative_position(),
        Vector2::new(8.0, 10.0 / 100.0)
    );
}

#[test]
fn the_default_color_format_tracks_the_color_depth() {
    let (device, _) = null_device();
    assert_eq!(device.color_format(), ColorFormat::A8R8G8B8);

    let params = DeviceParams {
        driver_type: DriverType::Null,
        bits: 16,
        ..DeviceParams::default()
    };
    let device = Device::new(params).expect("null device");
    assert_eq!(device.color_format(), ColorFormat::R5G6B5);
}

#[test]
fn joystick_activation_is_a_safe_one_shot() {
    let (mut device, _) = null_device();

    // No assumption about attached hardware; the call must simply come
    // back with a consistent descriptor list.
    let descriptors = device.activate_joysticks();
    assert!(descriptors.len() <= 32);
    for descriptor in &descriptors {
        assert!((descriptor.joystick as usize) < 32);
    }

    assert!(device.run());
}
