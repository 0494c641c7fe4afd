//! Pointer and scroll handling for the orbit camera.
//!
//! [`InteractionTracker`] turns raw pointer drags and wheel deltas into orbit
//! angles and a zoom distance. It is the only owner of that state; the frame
//! loop reads it through [`InteractionTracker::state`].

use std::f32::consts::FRAC_PI_2;

use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

use crate::camera::{MAX_PITCH, MIN_PITCH, MIN_ZOOM};

/// Pixels of pointer travel per radian of orbit rotation, and wheel pixels
/// per unit of zoom.
pub const PIXELS_PER_UNIT: f64 = 100.0;

/// Wheel line deltas are converted to pixels with this factor.
pub const PIXELS_PER_LINE: f64 = 100.0;

pub const INITIAL_YAW: f32 = 0.0;
pub const INITIAL_PITCH: f32 = FRAC_PI_2;
pub const INITIAL_ZOOM: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerState {
    Idle,
    Dragging { last: PhysicalPosition<f64> },
}

/// Orbit parameters consumed by the camera model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionState {
    pub orbit_yaw: f32,
    pub orbit_pitch: f32,
    pub zoom_distance: f32,
    pub pointer: PointerState,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            orbit_yaw: INITIAL_YAW,
            orbit_pitch: INITIAL_PITCH,
            zoom_distance: INITIAL_ZOOM,
            pointer: PointerState::Idle,
        }
    }
}

/// Discrete pointer input, independent of the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(PhysicalPosition<f64>),
    Move(PhysicalPosition<f64>),
    Up,
    Scroll(f64),
}

#[derive(Debug, Default)]
pub struct InteractionTracker {
    state: InteractionState,
}

impl InteractionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state.pointer, PointerState::Dragging { .. })
    }

    /// Applies one pointer event. Returns `true` if the orbit or zoom changed.
    pub fn handle(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down(pos) => {
                self.pointer_down(pos);
                false
            }
            PointerEvent::Move(pos) => self.pointer_move(pos),
            PointerEvent::Up => {
                self.pointer_up();
                false
            }
            PointerEvent::Scroll(delta_y) => self.scroll(delta_y),
        }
    }

    pub fn pointer_down(&mut self, pos: PhysicalPosition<f64>) {
        self.state.pointer = PointerState::Dragging { last: pos };
    }

    /// Rotates the orbit by the travelled distance while dragging. Moves
    /// without an active drag are ignored.
    pub fn pointer_move(&mut self, pos: PhysicalPosition<f64>) -> bool {
        let last = match self.state.pointer {
            PointerState::Dragging { last } => last,
            PointerState::Idle => return false,
        };
        let dx = ((pos.x - last.x) / PIXELS_PER_UNIT) as f32;
        let dy = ((pos.y - last.y) / PIXELS_PER_UNIT) as f32;
        self.state.orbit_yaw += dx;
        self.state.orbit_pitch = (self.state.orbit_pitch + dy).clamp(MIN_PITCH, MAX_PITCH);
        self.state.pointer = PointerState::Dragging { last: pos };
        dx != 0.0 || dy != 0.0
    }

    pub fn pointer_up(&mut self) {
        self.state.pointer = PointerState::Idle;
    }

    /// Moves the camera along its orbit radius. Works whether or not a drag
    /// is in progress.
    pub fn scroll(&mut self, delta_y: f64) -> bool {
        let before = self.state.zoom_distance;
        self.state.zoom_distance =
            (before + (delta_y / PIXELS_PER_UNIT) as f32).max(MIN_ZOOM);
        self.state.zoom_distance != before
    }
}

/// Translates winit window events into [`PointerEvent`]s.
///
/// winit reports button presses without a position, so the last cursor
/// position is remembered here.
#[derive(Debug, Default)]
pub struct PointerInput {
    cursor: PhysicalPosition<f64>,
}

impl PointerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the left mouse button drags. Wheel deltas are converted to the
    /// browser convention where a positive value moves the camera away.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = *position;
                Some(PointerEvent::Move(*position))
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => Some(PointerEvent::Down(self.cursor)),
                ElementState::Released => Some(PointerEvent::Up),
            },
            WindowEvent::MouseWheel { delta, .. } => {
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -(*y as f64) * PIXELS_PER_LINE,
                    MouseScrollDelta::PixelDelta(pos) => -pos.y,
                };
                Some(PointerEvent::Scroll(delta_y))
            }
            WindowEvent::CursorLeft { .. } => Some(PointerEvent::Up),
            _ => None,
        }
    }
}
