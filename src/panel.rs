//! Keyboard control panel.
//!
//! The panel offers the same controls as a form would: mesh, diffuse and
//! normal selectors, a pause toggle and the light position. Selectors cycle
//! through their option lists, the light moves in fixed steps. Every key press
//! becomes one [`SceneEvent`]; the panel itself never touches the scene.
//!
//! | key | action |
//! |-----|--------|
//! | `M` / `Shift+M` | next / previous mesh |
//! | `D` / `Shift+D` | next / previous diffuse texture |
//! | `N` / `Shift+N` | next / previous normal texture |
//! | `Space`, `P` | pause / resume |
//! | `←` `→` | light x |
//! | `↓` `↑` | light y |
//! | `PageDown` `PageUp` | light z |
//! | `R` | reset the light |

use cgmath::Vector3;
use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::scene::{Axis, SceneEvent, SceneOptions, SceneState};

pub const LIGHT_STEP: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct ControlPanel {
    light_step: f32,
    reset_light: Vector3<f32>,
    shift: bool,
}

impl ControlPanel {
    pub fn new(reset_light: Vector3<f32>) -> Self {
        Self {
            light_step: LIGHT_STEP,
            reset_light,
            shift: false,
        }
    }

    /// Translates a window event into a scene change, if it is one of the
    /// panel's keys.
    pub fn handle_window_event(
        &mut self,
        event: &WindowEvent,
        scene: &SceneState,
        options: &SceneOptions,
    ) -> Option<SceneEvent> {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift = modifiers.state().shift_key();
                None
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.handle_key(*code, self.shift, scene, options),
            _ => None,
        }
    }

    pub fn handle_key(
        &self,
        code: KeyCode,
        shift: bool,
        scene: &SceneState,
        options: &SceneOptions,
    ) -> Option<SceneEvent> {
        let forward = !shift;
        let step = self.light_step;
        match code {
            KeyCode::KeyM => {
                cycle(&options.meshes, &scene.selected_mesh_id, forward).map(SceneEvent::SelectMesh)
            }
            KeyCode::KeyD => cycle(&options.textures, &scene.diffuse_texture_id, forward)
                .map(SceneEvent::SelectDiffuse),
            KeyCode::KeyN => cycle(&options.textures, &scene.normal_texture_id, forward)
                .map(SceneEvent::SelectNormal),
            KeyCode::Space | KeyCode::KeyP => Some(SceneEvent::TogglePause),
            KeyCode::ArrowLeft => Some(nudge(Axis::X, -step)),
            KeyCode::ArrowRight => Some(nudge(Axis::X, step)),
            KeyCode::ArrowDown => Some(nudge(Axis::Y, -step)),
            KeyCode::ArrowUp => Some(nudge(Axis::Y, step)),
            KeyCode::PageDown => Some(nudge(Axis::Z, -step)),
            KeyCode::PageUp => Some(nudge(Axis::Z, step)),
            KeyCode::KeyR => Some(SceneEvent::MoveLight(self.reset_light)),
            _ => None,
        }
    }

    /// One line describing the current panel values.
    pub fn summary(&self, scene: &SceneState) -> String {
        let l = scene.light_position;
        format!(
            "mesh: {} | diffuse: {} | normal: {} | light: ({:.1}, {:.1}, {:.1}){}",
            scene.selected_mesh_id,
            scene.diffuse_texture_id,
            scene.normal_texture_id,
            l.x,
            l.y,
            l.z,
            if scene.paused { " | paused" } else { "" }
        )
    }
}

fn nudge(axis: Axis, delta: f32) -> SceneEvent {
    SceneEvent::NudgeLight { axis, delta }
}

/// Next (or previous) option after `current`, wrapping around. Falls back to
/// the first option when `current` is not listed.
pub fn cycle(options: &[String], current: &str, forward: bool) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    let len = options.len();
    let next = match options.iter().position(|o| o == current) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    Some(options[next].clone())
}
