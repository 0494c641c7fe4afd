mod common;

use std::f32::consts::{FRAC_PI_2, PI};

use cgmath::{Matrix4, SquareMatrix, Vector4};
use shader_preview::{
    camera::{
        MAX_PITCH, MIN_PITCH, compute_camera, compute_square_camera, model_matrix,
        orbit_position,
    },
    error::PreviewError,
};

use crate::common::test_utils::{assert_close, assert_matrix_close};

#[test]
fn should_be_deterministic() {
    let a = compute_camera(0.7, 1.2, 3.5, 16.0 / 9.0).unwrap();
    let b = compute_camera(0.7, 1.2, 3.5, 16.0 / 9.0).unwrap();
    assert_eq!(a, b);
}

#[test]
fn should_place_initial_camera_on_positive_z() {
    let p = orbit_position(0.0, FRAC_PI_2, 5.0);
    assert_close(p.x, 0.0);
    assert_close(p.y, 0.0);
    assert_close(p.z, 5.0);
}

#[test]
fn should_keep_camera_at_zoom_distance() {
    for (yaw, pitch) in [(0.0, 0.5), (1.3, 2.0), (-4.0, 3.0), (10.0, 0.01)] {
        let p = orbit_position(yaw, pitch, 7.0);
        assert_close((p.x * p.x + p.y * p.y + p.z * p.z).sqrt(), 7.0);
    }
}

#[test]
fn should_clamp_pitch_outside_range() {
    assert_eq!(orbit_position(0.3, 10.0, 2.0), orbit_position(0.3, MAX_PITCH, 2.0));
    assert_eq!(orbit_position(0.3, -1.0, 2.0), orbit_position(0.3, MIN_PITCH, 2.0));
}

#[test]
fn should_look_at_origin() {
    let camera = compute_camera(0.4, 1.1, 5.0, 1.5).unwrap();
    let origin_in_view = camera.view * Vector4::new(0.0, 0.0, 0.0, 1.0);
    assert_close(origin_in_view.x, 0.0);
    assert_close(origin_in_view.y, 0.0);
    assert_close(origin_in_view.z, -5.0);
}

#[test]
fn should_combine_projection_and_view() {
    let camera = compute_camera(1.0, 2.0, 4.0, 2.0).unwrap();
    assert_matrix_close(camera.view_projection, camera.projection * camera.view);
}

#[test]
fn should_map_depth_to_zero_one() {
    // A point straight in front of the camera lands inside wgpu's 0..1 depth range.
    let camera = compute_camera(0.0, FRAC_PI_2, 5.0, 1.0).unwrap();
    let clip = camera.view_projection * Vector4::new(0.0, 0.0, 0.0, 1.0);
    let depth = clip.z / clip.w;
    assert!(depth > 0.0 && depth < 1.0, "depth {depth}");
}

#[test]
fn should_reject_invalid_aspect() {
    for aspect in [0.0, -1.0, f32::NAN, f32::INFINITY] {
        let result = compute_camera(0.0, PI / 3.0, 5.0, aspect);
        assert!(
            matches!(result, Err(PreviewError::InvalidAspect { .. })),
            "aspect {aspect} was accepted"
        );
    }
}

#[test]
fn should_match_square_camera_for_unit_aspect() {
    let square = compute_square_camera(0.2, 1.0, 3.0);
    let regular = compute_camera(0.2, 1.0, 3.0, 1.0).unwrap();
    assert_eq!(square, regular);
}

#[test]
fn should_use_identity_model_matrix() {
    assert_eq!(model_matrix(), Matrix4::identity());
}
