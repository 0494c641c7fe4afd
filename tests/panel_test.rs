mod common;

use cgmath::Vector3;
use shader_preview::{
    panel::{ControlPanel, LIGHT_STEP, cycle},
    scene::{Axis, SceneEvent},
    session::Message,
};
use winit::keyboard::KeyCode;

use crate::common::test_utils::{LIGHT, session};

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn should_cycle_with_wrap_around() {
    let options = list(&["a", "b", "c"]);
    assert_eq!(cycle(&options, "a", true).as_deref(), Some("b"));
    assert_eq!(cycle(&options, "c", true).as_deref(), Some("a"));
    assert_eq!(cycle(&options, "a", false).as_deref(), Some("c"));
    assert_eq!(cycle(&options, "missing", true).as_deref(), Some("a"));
    assert_eq!(cycle(&[], "a", true), None);
}

#[test]
fn should_map_selector_keys() {
    let (session, _) = session("wood", &["wood_normal", "metal"]);
    let panel = ControlPanel::new(LIGHT.into());
    let (scene, options) = (session.scene(), session.options());

    assert_eq!(
        panel.handle_key(KeyCode::KeyM, false, scene, options),
        Some(SceneEvent::SelectMesh("sphere".to_string()))
    );
    assert_eq!(
        panel.handle_key(KeyCode::KeyD, true, scene, options),
        Some(SceneEvent::SelectDiffuse("metal".to_string()))
    );
    assert_eq!(
        panel.handle_key(KeyCode::KeyN, false, scene, options),
        Some(SceneEvent::SelectNormal("metal".to_string()))
    );
}

#[test]
fn should_map_light_and_pause_keys() {
    let (session, _) = session("wood", &[]);
    let panel = ControlPanel::new(Vector3::new(1.0, 1.0, 1.0));
    let (scene, options) = (session.scene(), session.options());

    assert_eq!(
        panel.handle_key(KeyCode::ArrowLeft, false, scene, options),
        Some(SceneEvent::NudgeLight { axis: Axis::X, delta: -LIGHT_STEP })
    );
    assert_eq!(
        panel.handle_key(KeyCode::PageUp, false, scene, options),
        Some(SceneEvent::NudgeLight { axis: Axis::Z, delta: LIGHT_STEP })
    );
    assert_eq!(
        panel.handle_key(KeyCode::Space, false, scene, options),
        Some(SceneEvent::TogglePause)
    );
    assert_eq!(
        panel.handle_key(KeyCode::KeyR, false, scene, options),
        Some(SceneEvent::MoveLight(Vector3::new(1.0, 1.0, 1.0)))
    );
    assert_eq!(panel.handle_key(KeyCode::KeyQ, false, scene, options), None);
}

#[test]
fn should_apply_panel_events_through_session() {
    let (mut session, _) = session("wood", &["wood_normal"]);
    let panel = ControlPanel::new(LIGHT.into());

    let event = panel
        .handle_key(KeyCode::ArrowUp, false, session.scene(), session.options())
        .unwrap();
    assert!(session.update(Message::Scene(event)));
    assert_eq!(
        session.scene().light_position,
        Vector3::new(LIGHT[0], LIGHT[1] + LIGHT_STEP, LIGHT[2])
    );

    let event = panel
        .handle_key(KeyCode::KeyP, false, session.scene(), session.options())
        .unwrap();
    session.update(Message::Scene(event));
    assert!(session.scene().paused);
    assert!(panel.summary(session.scene()).ends_with("| paused"));
}

#[test]
fn should_summarise_selection() {
    let (session, _) = session("wood", &["wood_normal"]);
    let panel = ControlPanel::new(LIGHT.into());
    assert_eq!(
        panel.summary(session.scene()),
        "mesh: cube | diffuse: wood | normal: wood_normal | light: (2.0, 3.0, 4.0)"
    );
}
