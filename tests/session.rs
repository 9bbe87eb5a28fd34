use haptic_bridge::pointer::{NullPointer, PointerEvent, RecordingPointer};
use haptic_bridge::simulator::{FailPoints, SimulatedDriver};
use haptic_bridge::{codec, Buttons, Calibration, DeviceSession, MappingMode, Vec3, WorkspaceMapper};

#[test]
fn device_id_tracks_driver_count() {
    for count in 0..4 {
        let session = DeviceSession::new(SimulatedDriver::with_device_count(count), NullPointer);
        assert_eq!(session.device_count(), count);
        assert_eq!(session.device_id(), count - 1);
    }
}

#[test]
fn no_device_never_opens() {
    let driver = SimulatedDriver::with_device_count(0);
    let probe = driver.handle();
    let mut session = DeviceSession::new(driver, NullPointer);

    assert!(!session.open());
    assert_eq!(session.position(), "Not initialized");
    assert!(!session.send_force("1,2,3"));
    assert_eq!(probe.calls().set_force, 0);
}

#[test]
fn double_open_calls_driver_once() {
    let driver = SimulatedDriver::new();
    let probe = driver.handle();
    let mut session = DeviceSession::new(driver, NullPointer);

    assert!(session.open());
    assert!(session.open());
    assert!(session.is_open());
    assert_eq!(probe.calls().open, 1);
}

#[test]
fn send_force_submits_z_x_negated_y() {
    let driver = SimulatedDriver::new();
    let probe = driver.handle();
    let mut session = DeviceSession::new(driver, NullPointer);

    session.open();
    assert!(session.send_force("1.0,2.0,3.0"));
    assert_eq!(probe.state().last_force, Some([3.0, 1.0, -2.0]));
}

#[test]
fn failed_open_can_be_retried_by_caller() {
    let driver = SimulatedDriver::new();
    let probe = driver.handle();
    let mut session = DeviceSession::new(driver, NullPointer);

    probe.set_failing(FailPoints::OPEN);
    assert!(!session.open());
    probe.set_failing(FailPoints::empty());
    assert!(session.open());
    assert_eq!(probe.calls().open, 2);
}

#[test]
fn screen_mode_follows_stylus_and_clicks() {
    let driver = SimulatedDriver::new();
    let probe = driver.handle();
    let pointer = RecordingPointer::new();
    let mut session = DeviceSession::new(driver, pointer.clone());

    session.open();
    assert!(session.set_mode("2d"));

    probe.set_position(Vec3::new(0.0, 0.02, 0.05));
    session.position();
    probe.set_buttons(Buttons::RIGHT);
    session.position();
    probe.set_buttons(Buttons::LEFT);
    session.position();

    let events = pointer.events();
    let clicks = events
        .iter()
        .filter(|e| **e == PointerEvent::LeftClick)
        .count();
    let moves = events
        .iter()
        .filter(|e| matches!(e, PointerEvent::MoveTo { .. }))
        .count();
    assert_eq!(moves, 3);
    assert_eq!(clicks, 1);
    assert_eq!(events.last(), Some(&PointerEvent::LeftClick));
}

#[test]
fn rejected_mode_keeps_previous_mode() {
    let mut session = DeviceSession::new(SimulatedDriver::new(), NullPointer);
    assert!(session.set_mode("2d"));
    assert!(!session.set_mode("xyz"));
    assert!(!session.set_mode(""));
    assert_eq!(session.mode(), MappingMode::Screen2d);
}

#[test]
fn alternate_calibration_changes_pitch() {
    let cal = Calibration {
        screen_resolution: [1920, 1080],
        workspace_size: Vec3::new(0.16, 0.12, 0.07),
        max_force: 3.0,
    };
    let mapper = WorkspaceMapper::new(cal);
    // 0.16/1920 * 1080 = 0.09 fits within 0.12, so width binds.
    assert_eq!(mapper.pixel_pitch(), 0.16 / 1920.0);

    let session = DeviceSession::with_calibration(SimulatedDriver::new(), NullPointer, cal);
    assert_eq!(session.max_force(), 3.0);
    assert_eq!(session.workspace_size(), "0.16,0.12,0.07");
}

#[test]
fn drop_releases_device() {
    let driver = SimulatedDriver::new();
    let probe = driver.handle();
    {
        let mut session = DeviceSession::new(driver, NullPointer);
        assert!(session.open());
    }
    assert_eq!(probe.state().opened, None);
    assert_eq!(probe.calls().close, 1);
    assert_eq!(probe.calls().stop_servo, 1);
}

#[test]
fn position_string_roundtrips_through_codec() {
    let driver = SimulatedDriver::new();
    let probe = driver.handle();
    let mut session = DeviceSession::new(driver, NullPointer);
    session.open();

    probe.set_position(Vec3::new(-0.25, 0.5, 0.125));
    let reported = session.position();
    let parsed = codec::string_to_array(&reported).unwrap();
    assert_eq!(parsed, Vec3::new(0.5, -0.125, 0.25));
    assert_eq!(codec::array_to_string(&parsed), reported);
}
