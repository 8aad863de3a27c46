//! Whole-session scenarios driven through the public API only.

use std::time::Duration;

use glam::Vec2;
use orrery_app::{HEADLESS_DT, SessionHost};
use orrery_config::Config;
use orrery_input::{JoystickKind, PointerId};

const FRAME: Duration = Duration::from_millis(16);

fn started(config: &Config) -> SessionHost {
    let mut host = SessionHost::from_config(config);
    assert!(host.start());
    host
}

fn run_frames(host: &mut SessionHost, frames: u32, dt: Duration) {
    for _ in 0..frames {
        host.frame(dt);
    }
}

fn speed(host: &SessionHost) -> f32 {
    host.session()
        .expect("session running")
        .flight()
        .kinematics()
        .speed()
}

#[test]
fn test_forward_for_one_second() {
    let mut host = started(&Config::default());
    let start = host.session().expect("session running").flight().position();

    host.bridge().ship().set_forward(true);
    run_frames(&mut host, 63, FRAME);

    let session = host.session().expect("session running");
    let position = session.flight().position();
    let speed = session.flight().kinematics().speed();
    assert!(speed > 0.0);
    assert!(speed < 1000.0, "speed {speed} should stay below the cap");
    assert!(position.z < start.z, "z {} should decrease from {}", position.z, start.z);
}

#[test]
fn test_speed_never_exceeds_turbo_cap() {
    let mut config = Config::default();
    config.flight.max_speed = 20.0;
    let mut host = started(&config);
    host.bridge().ship().set_forward(true);
    host.bridge().ship().set_turbo(true);
    for _ in 0..600 {
        host.frame(HEADLESS_DT);
        assert!(speed(&host) <= 30.0 + 1e-3);
    }
    assert!(speed(&host) > 29.0);
}

#[test]
fn test_turbo_and_brake_cancel() {
    let config = Config::default();
    let mut plain = started(&config);
    let mut both = started(&config);
    plain.bridge().ship().set_forward(true);
    both.bridge().ship().set_forward(true);
    both.bridge().ship().set_turbo(true);
    both.bridge().ship().set_brake(true);

    run_frames(&mut plain, 120, FRAME);
    run_frames(&mut both, 120, FRAME);
    assert!((speed(&plain) - speed(&both)).abs() < 1e-4);
}

#[test]
fn test_zoom_in_sixty_times_clamps() {
    let mut host = started(&Config::default());
    for _ in 0..60 {
        assert!(host.bridge().camera().zoom_in());
    }
    host.frame(FRAME);
    let distance = host
        .session()
        .expect("session running")
        .camera()
        .state()
        .distance;
    assert!((distance - 30.0).abs() < 1e-5, "distance {distance}");
}

#[test]
fn test_camera_elevation_clamped() {
    let mut host = started(&Config::default());
    host.bridge().camera().rotate(100.0, 0.0);
    host.frame(FRAME);
    let state = host.session().expect("session running").camera().state();
    assert!((state.rotation_x - 1.2).abs() < 1e-6);

    host.bridge().camera().rotate(-1.0e6, 0.0);
    host.frame(FRAME);
    let state = host.session().expect("session running").camera().state();
    assert!((state.rotation_x + 1.2).abs() < 1e-6);
}

#[test]
fn test_reset_restores_defaults() {
    let mut host = started(&Config::default());
    host.bridge().camera().zoom_out();
    host.bridge().camera().rotate(0.4, 2.5);
    host.frame(FRAME);
    host.bridge().camera().reset();
    host.frame(FRAME);
    let state = host.session().expect("session running").camera().state();
    assert!((state.distance - 50.0).abs() < 1e-6);
    assert!((state.rotation_x - 0.5).abs() < 1e-6);
    assert!((state.rotation_y - 1.0).abs() < 1e-6);
}

#[test]
fn test_nearest_body_at_one_au_is_earth() {
    let mut config = Config::default();
    config.flight.start_position = [1000.0, 0.0, 0.0];
    let mut host = started(&config);
    run_frames(&mut host, 30, FRAME);
    let snapshot = host.feed().latest();
    assert_eq!(snapshot.nearest_body, "Earth");
    assert!((snapshot.distance_au - 1.0).abs() < 1e-9);
}

#[test]
fn test_camera_follows_ship() {
    let mut host = started(&Config::default());
    host.bridge().ship().set_forward(true);
    let mut last = None;
    for _ in 0..30 {
        last = host.frame(FRAME).and_then(|report| report.pose);
    }
    let pose = last.expect("camera attached at session start");
    let ship = host.session().expect("session running").flight().position();
    assert!(pose.look_at.distance(ship) < 1e-4);
    assert!((pose.eye.distance(ship) - 50.0).abs() < 1e-3);
}

#[test]
fn test_camera_attaches_exactly_once() {
    let mut host = started(&Config::default());
    let session = host.session_mut().expect("session running");
    assert!(session.camera().is_attached());
    assert!(!session.attach_camera());
}

#[test]
fn test_bridge_is_noop_after_session_ends() {
    let mut host = started(&Config::default());
    let ui = host.bridge().clone();
    assert!(ui.ship().set_forward(true));
    host.end();
    assert!(!ui.is_open());
    assert!(!ui.ship().set_forward(true));
    assert!(!ui.ship().pulse_turbo());
    assert!(!ui.camera().zoom_in());
    assert!(!ui.camera().rotate(0.1, 0.1));
    assert!(host.frame(FRAME).is_none());
}

#[test]
fn test_new_session_ignores_stale_commands() {
    let mut host = started(&Config::default());
    host.bridge().camera().zoom_out();
    host.end();
    host.start();
    let report = host.frame(FRAME).expect("session running");
    assert_eq!(report.commands, 0);
    let distance = host
        .session()
        .expect("session running")
        .camera()
        .state()
        .distance;
    assert!((distance - 50.0).abs() < 1e-6);
}

#[test]
fn test_teardown_detaches_listeners_and_cancels_pulses() {
    let mut host = started(&Config::default());
    let ship = host.layout().center(JoystickKind::Ship);
    host.pointer_down(PointerId::Touch(1), ship + Vec2::new(20.0, 0.0));
    host.pointer_down(PointerId::Mouse, Vec2::new(600.0, 300.0));
    host.bridge().ship().pulse_brake();
    host.frame(FRAME);
    assert_eq!(host.session().expect("session running").listener_count(), 4);

    let teardown = host.end().expect("session was running");
    assert_eq!(teardown.detached_listeners, 4);
    assert_eq!(teardown.cancelled_actions, 1);
    assert_eq!(host.feed().latest().nearest_body, "Sun");
}

#[test]
fn test_ship_drifts_without_thrust() {
    let mut host = started(&Config::default());
    host.bridge().ship().set_forward(true);
    run_frames(&mut host, 60, FRAME);
    host.bridge().ship().set_forward(false);
    host.frame(FRAME);
    let coasting = speed(&host);
    run_frames(&mut host, 120, FRAME);
    assert!((speed(&host) - coasting).abs() < 1e-4);
}
