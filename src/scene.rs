//! The session's scene record and its transition function.
//!
//! [`SceneState`] holds everything the control panel and the host clock can
//! change. Every change goes through [`SceneState::apply`], one exhaustive
//! match over [`SceneEvent`].

use std::time::Duration;

use cgmath::Vector3;

use crate::error::PreviewError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Discrete events from the control panel, the window and the clock.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    SelectMesh(String),
    SelectDiffuse(String),
    SelectNormal(String),
    SetPaused(bool),
    TogglePause,
    SetLight { axis: Axis, value: f32 },
    NudgeLight { axis: Axis, delta: f32 },
    /// Replaces the whole light position, e.g. a reset to the configured one.
    MoveLight(Vector3<f32>),
    Resize { width: u32, height: u32 },
    /// Host clock advanced by this much since the previous tick.
    Tick(Duration),
}

/// The option lists selections are validated against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneOptions {
    pub meshes: Vec<String>,
    pub textures: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub selected_mesh_id: String,
    pub diffuse_texture_id: String,
    pub normal_texture_id: String,
    pub light_position: Vector3<f32>,
    pub paused: bool,
    /// Seconds of unpaused time. Tracked for shaders to use later; nothing
    /// reads it yet.
    pub elapsed_seconds: f32,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl SceneState {
    pub fn new(
        mesh: impl Into<String>,
        diffuse: impl Into<String>,
        normal: impl Into<String>,
        light_position: Vector3<f32>,
    ) -> Self {
        Self {
            selected_mesh_id: mesh.into(),
            diffuse_texture_id: diffuse.into(),
            normal_texture_id: normal.into(),
            light_position,
            paused: false,
            elapsed_seconds: 0.0,
            viewport_width: 1,
            viewport_height: 1,
        }
    }

    /// Viewport width over height.
    pub fn aspect_ratio(&self) -> Result<f32, PreviewError> {
        let aspect = self.viewport_width as f32 / self.viewport_height as f32;
        if aspect.is_finite() && aspect > 0.0 {
            Ok(aspect)
        } else {
            Err(PreviewError::InvalidAspect { aspect })
        }
    }

    /// Applies one event. Selections outside `options` are rejected and
    /// leave the state untouched.
    pub fn apply(&mut self, event: SceneEvent, options: &SceneOptions) -> Result<(), PreviewError> {
        match event {
            SceneEvent::SelectMesh(name) => {
                if !options.meshes.contains(&name) {
                    return Err(PreviewError::MeshNotFound { name });
                }
                self.selected_mesh_id = name;
            }
            SceneEvent::SelectDiffuse(name) => {
                if !options.textures.contains(&name) {
                    return Err(PreviewError::TextureNotListed { name });
                }
                self.diffuse_texture_id = name;
            }
            SceneEvent::SelectNormal(name) => {
                if !options.textures.contains(&name) {
                    return Err(PreviewError::TextureNotListed { name });
                }
                self.normal_texture_id = name;
            }
            SceneEvent::SetPaused(paused) => self.paused = paused,
            SceneEvent::TogglePause => self.paused = !self.paused,
            SceneEvent::SetLight { axis, value } => *self.light_axis(axis) = value,
            SceneEvent::NudgeLight { axis, delta } => *self.light_axis(axis) += delta,
            SceneEvent::MoveLight(position) => self.light_position = position,
            SceneEvent::Resize { width, height } => {
                self.viewport_width = width;
                self.viewport_height = height;
            }
            SceneEvent::Tick(dt) => {
                if !self.paused {
                    self.elapsed_seconds += dt.as_secs_f32();
                }
            }
        }
        Ok(())
    }

    fn light_axis(&mut self, axis: Axis) -> &mut f32 {
        match axis {
            Axis::X => &mut self.light_position.x,
            Axis::Y => &mut self.light_position.y,
            Axis::Z => &mut self.light_position.z,
        }
    }
}
