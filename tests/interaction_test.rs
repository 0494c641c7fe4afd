mod common;

use std::f32::consts::{FRAC_PI_2, PI};

use shader_preview::interaction::{
    INITIAL_PITCH, INITIAL_YAW, INITIAL_ZOOM, InteractionTracker, PIXELS_PER_LINE, PointerEvent,
    PointerInput, PointerState,
};
use winit::event::{
    DeviceId, ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent,
};

use crate::common::test_utils::{assert_close, pos};

#[test]
fn should_start_idle_level_with_horizon() {
    let tracker = InteractionTracker::new();
    let state = tracker.state();
    assert_eq!(state.pointer, PointerState::Idle);
    assert_eq!(state.orbit_yaw, INITIAL_YAW);
    assert_eq!(state.orbit_pitch, INITIAL_PITCH);
    assert_eq!(state.orbit_pitch, FRAC_PI_2);
    assert_eq!(state.zoom_distance, INITIAL_ZOOM);
}

#[test]
fn should_orbit_while_dragging_only() {
    let mut tracker = InteractionTracker::new();
    tracker.handle(PointerEvent::Down(pos(100.0, 100.0)));
    assert!(tracker.is_dragging());
    assert!(tracker.handle(PointerEvent::Move(pos(150.0, 130.0))));
    assert_close(tracker.state().orbit_yaw, 0.5);
    assert_close(tracker.state().orbit_pitch, FRAC_PI_2 + 0.3);

    tracker.handle(PointerEvent::Up);
    let before = *tracker.state();
    assert!(!tracker.handle(PointerEvent::Move(pos(200.0, 200.0))));
    assert_eq!(*tracker.state(), before);
}

#[test]
fn should_ignore_moves_without_drag() {
    let mut tracker = InteractionTracker::new();
    let before = *tracker.state();
    tracker.pointer_move(pos(10.0, 10.0));
    tracker.pointer_move(pos(500.0, -300.0));
    assert_eq!(*tracker.state(), before);
}

#[test]
fn should_accumulate_relative_to_last_position() {
    let mut tracker = InteractionTracker::new();
    tracker.pointer_down(pos(0.0, 0.0));
    tracker.pointer_move(pos(50.0, 0.0));
    tracker.pointer_move(pos(100.0, 0.0));
    assert_close(tracker.state().orbit_yaw, 1.0);
}

#[test]
fn should_clamp_pitch_while_dragging() {
    let mut tracker = InteractionTracker::new();
    tracker.pointer_down(pos(0.0, 0.0));
    tracker.pointer_move(pos(0.0, 10_000.0));
    assert_eq!(tracker.state().orbit_pitch, PI);
    tracker.pointer_move(pos(0.0, -50_000.0));
    assert_eq!(tracker.state().orbit_pitch, 0.01);
    for y in [123.0, -77.0, 9_999.0, -0.5] {
        tracker.pointer_move(pos(0.0, y));
        let pitch = tracker.state().orbit_pitch;
        assert!((0.01..=PI).contains(&pitch), "pitch {pitch}");
    }
}

#[test]
fn should_zoom_in_any_pointer_state() {
    let mut tracker = InteractionTracker::new();
    assert!(tracker.scroll(100.0));
    assert_close(tracker.state().zoom_distance, 6.0);

    tracker.pointer_down(pos(1.0, 1.0));
    assert!(tracker.scroll(-250.0));
    assert_close(tracker.state().zoom_distance, 3.5);
    assert!(tracker.is_dragging());
}

#[test]
fn should_keep_zoom_above_minimum() {
    let mut tracker = InteractionTracker::new();
    tracker.scroll(-1_000_000.0);
    assert_eq!(tracker.state().zoom_distance, 0.01);
    assert!(!tracker.scroll(-10.0));
    assert_eq!(tracker.state().zoom_distance, 0.01);
}

#[test]
fn should_not_change_zoom_on_zero_scroll() {
    let mut tracker = InteractionTracker::new();
    tracker.scroll(37.0);
    let zoom = tracker.state().zoom_distance;
    for _ in 0..10 {
        assert!(!tracker.handle(PointerEvent::Scroll(0.0)));
    }
    assert_eq!(tracker.state().zoom_distance, zoom);
}

fn device() -> DeviceId {
    // Only used as an opaque tag in synthesized events.
    unsafe { DeviceId::dummy() }
}

fn cursor_moved(x: f64, y: f64) -> WindowEvent {
    WindowEvent::CursorMoved {
        device_id: device(),
        position: pos(x, y),
    }
}

fn left_button(state: ElementState) -> WindowEvent {
    WindowEvent::MouseInput {
        device_id: device(),
        state,
        button: MouseButton::Left,
    }
}

fn wheel(delta: MouseScrollDelta) -> WindowEvent {
    WindowEvent::MouseWheel {
        device_id: device(),
        delta,
        phase: TouchPhase::Moved,
    }
}

#[test]
fn should_press_at_last_cursor_position() {
    let mut input = PointerInput::new();
    assert_eq!(
        input.translate(&cursor_moved(40.0, 60.0)),
        Some(PointerEvent::Move(pos(40.0, 60.0)))
    );
    assert_eq!(
        input.translate(&left_button(ElementState::Pressed)),
        Some(PointerEvent::Down(pos(40.0, 60.0)))
    );
    assert_eq!(
        input.translate(&left_button(ElementState::Released)),
        Some(PointerEvent::Up)
    );
}

#[test]
fn should_ignore_other_mouse_buttons() {
    let mut input = PointerInput::new();
    let right = WindowEvent::MouseInput {
        device_id: device(),
        state: ElementState::Pressed,
        button: MouseButton::Right,
    };
    assert_eq!(input.translate(&right), None);
    assert_eq!(input.translate(&WindowEvent::Focused(true)), None);
}

#[test]
fn should_use_browser_wheel_sign_convention() {
    let mut input = PointerInput::new();
    assert_eq!(
        input.translate(&wheel(MouseScrollDelta::LineDelta(0.0, 1.0))),
        Some(PointerEvent::Scroll(-PIXELS_PER_LINE))
    );
    assert_eq!(
        input.translate(&wheel(MouseScrollDelta::PixelDelta(pos(0.0, -30.0)))),
        Some(PointerEvent::Scroll(30.0))
    );
}

#[test]
fn should_end_drag_when_cursor_leaves_window() {
    let mut input = PointerInput::new();
    let mut tracker = InteractionTracker::new();
    for event in [
        cursor_moved(10.0, 10.0),
        left_button(ElementState::Pressed),
        WindowEvent::CursorLeft {
            device_id: device(),
        },
    ] {
        if let Some(pointer) = input.translate(&event) {
            tracker.handle(pointer);
        }
    }
    assert!(!tracker.is_dragging());
    assert!(!tracker.handle(PointerEvent::Move(pos(300.0, 300.0))));
}
