use std::time::Duration;

use cgmath::Vector3;
use shader_preview::{
    error::PreviewError,
    scene::{Axis, SceneEvent, SceneOptions, SceneState},
};

fn options() -> SceneOptions {
    SceneOptions {
        meshes: vec!["cube".to_string(), "sphere".to_string()],
        textures: vec!["wood".to_string(), "wood_normal".to_string()],
    }
}

fn scene() -> SceneState {
    SceneState::new("cube", "wood", "wood_normal", Vector3::new(1.0, 2.0, 3.0))
}

#[test]
fn should_advance_time_only_when_running() {
    let mut scene = scene();
    let options = options();
    scene
        .apply(SceneEvent::Tick(Duration::from_millis(500)), &options)
        .unwrap();
    assert_eq!(scene.elapsed_seconds, 0.5);

    scene.apply(SceneEvent::SetPaused(true), &options).unwrap();
    scene
        .apply(SceneEvent::Tick(Duration::from_secs(3)), &options)
        .unwrap();
    assert_eq!(scene.elapsed_seconds, 0.5);

    scene.apply(SceneEvent::TogglePause, &options).unwrap();
    assert!(!scene.paused);
    scene
        .apply(SceneEvent::Tick(Duration::from_millis(250)), &options)
        .unwrap();
    assert_eq!(scene.elapsed_seconds, 0.75);
}

#[test]
fn should_select_listed_options() {
    let mut scene = scene();
    let options = options();
    scene
        .apply(SceneEvent::SelectMesh("sphere".to_string()), &options)
        .unwrap();
    scene
        .apply(SceneEvent::SelectDiffuse("wood_normal".to_string()), &options)
        .unwrap();
    scene
        .apply(SceneEvent::SelectNormal("wood".to_string()), &options)
        .unwrap();
    assert_eq!(scene.selected_mesh_id, "sphere");
    assert_eq!(scene.diffuse_texture_id, "wood_normal");
    assert_eq!(scene.normal_texture_id, "wood");
}

#[test]
fn should_reject_unlisted_selections() {
    let mut scene = scene();
    let before = scene.clone();
    let options = options();
    assert_eq!(
        scene.apply(SceneEvent::SelectMesh("teapot".to_string()), &options),
        Err(PreviewError::MeshNotFound {
            name: "teapot".to_string()
        })
    );
    assert_eq!(
        scene.apply(SceneEvent::SelectNormal("bricks".to_string()), &options),
        Err(PreviewError::TextureNotListed {
            name: "bricks".to_string()
        })
    );
    assert_eq!(scene, before);
}

#[test]
fn should_edit_light_per_axis() {
    let mut scene = scene();
    let options = options();
    scene
        .apply(SceneEvent::SetLight { axis: Axis::X, value: -4.0 }, &options)
        .unwrap();
    scene
        .apply(SceneEvent::NudgeLight { axis: Axis::Z, delta: 0.5 }, &options)
        .unwrap();
    assert_eq!(scene.light_position, Vector3::new(-4.0, 2.0, 3.5));

    scene
        .apply(SceneEvent::MoveLight(Vector3::new(0.0, 0.0, 1.0)), &options)
        .unwrap();
    assert_eq!(scene.light_position, Vector3::new(0.0, 0.0, 1.0));
}

#[test]
fn should_report_aspect_from_viewport() {
    let mut scene = scene();
    let options = options();
    scene
        .apply(SceneEvent::Resize { width: 800, height: 400 }, &options)
        .unwrap();
    assert_eq!(scene.aspect_ratio(), Ok(2.0));

    scene
        .apply(SceneEvent::Resize { width: 800, height: 0 }, &options)
        .unwrap();
    assert!(matches!(
        scene.aspect_ratio(),
        Err(PreviewError::InvalidAspect { .. })
    ));

    scene
        .apply(SceneEvent::Resize { width: 0, height: 0 }, &options)
        .unwrap();
    assert!(scene.aspect_ratio().is_err());
}
