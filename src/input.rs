//! Keyboard and mouse state folded into a six-axis snapshot.
//!
//! Winit delivers input as a stream of events. The frame updater instead wants
//! a polled view once per frame: how much time passed, where the two virtual
//! sticks point and whether fire is held. [`InputState`] collects the events
//! and [`InputState::poll`] produces that [`SixAxis`] snapshot.
//!
//! Bindings:
//! - motion: `A`/`D` (x), `R`/`F` (y), `S`/`W` (z)
//! - rotation: arrow keys, `Q`/`E`, or mouse movement while the right button
//!   is held
//! - fire: `Space` or the left mouse button
//! - exit: `Escape`, edge triggered

use std::collections::HashSet;

use cgmath::{Vector3, Zero};
use instant::Duration;
use winit::{
    event::{DeviceEvent, ElementState, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// Pixels of mouse travel that map to a full rotation axis deflection.
const MOUSE_RANGE: f64 = 10.0;

/// One frame's worth of polled input. Axes are clamped to `-1..=1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SixAxis {
    pub delta_time: Duration,
    pub motion: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub fire: bool,
    /// Set only on the frame in which `Escape` went down.
    pub exit_requested: bool,
}

impl Default for SixAxis {
    fn default() -> Self {
        Self {
            delta_time: Duration::ZERO,
            motion: Vector3::zero(),
            rotation: Vector3::zero(),
            fire: false,
            exit_requested: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct InputState {
    pressed: HashSet<KeyCode>,
    escape_seen: bool,
    escape_down: bool,
    fire_button: bool,
    rotate_button: bool,
    mouse_delta: (f64, f64),
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.handle_key(code, event.state);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => match button {
                MouseButton::Left => self.fire_button = state.is_pressed(),
                MouseButton::Right => self.rotate_button = state.is_pressed(),
                _ => (),
            },
            WindowEvent::Focused(false) => {
                // Key releases are lost while unfocused.
                self.pressed.clear();
                self.escape_down = false;
                self.fire_button = false;
                self.rotate_button = false;
            }
            _ => (),
        }
    }

    pub fn handle_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if self.rotate_button {
                self.mouse_delta.0 += dx;
                self.mouse_delta.1 += dy;
            }
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if code == KeyCode::Escape && !self.escape_down {
                    self.escape_down = true;
                    self.escape_seen = true;
                }
                self.pressed.insert(code);
            }
            ElementState::Released => {
                if code == KeyCode::Escape {
                    self.escape_down = false;
                }
                self.pressed.remove(&code);
            }
        }
    }

    fn axis(&self, negative: KeyCode, positive: KeyCode) -> f32 {
        let mut value = 0.0;
        if self.pressed.contains(&negative) {
            value -= 1.0;
        }
        if self.pressed.contains(&positive) {
            value += 1.0;
        }
        value
    }

    /// Snapshot the current state and reset per-frame accumulators.
    pub fn poll(&mut self, delta_time: Duration) -> SixAxis {
        let motion = Vector3::new(
            self.axis(KeyCode::KeyA, KeyCode::KeyD),
            self.axis(KeyCode::KeyF, KeyCode::KeyR),
            self.axis(KeyCode::KeyW, KeyCode::KeyS),
        );

        let (mx, my) = self.mouse_delta;
        self.mouse_delta = (0.0, 0.0);
        let rotation = Vector3::new(
            self.axis(KeyCode::ArrowLeft, KeyCode::ArrowRight) + (mx / MOUSE_RANGE) as f32,
            self.axis(KeyCode::ArrowDown, KeyCode::ArrowUp) - (my / MOUSE_RANGE) as f32,
            self.axis(KeyCode::KeyQ, KeyCode::KeyE),
        );

        let exit_requested = self.escape_seen;
        self.escape_seen = false;

        SixAxis {
            delta_time,
            motion: clamp_axes(motion),
            rotation: clamp_axes(rotation),
            fire: self.fire_button || self.pressed.contains(&KeyCode::Space),
            exit_requested,
        }
    }
}

fn clamp_axes(v: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(
        v.x.clamp(-1.0, 1.0),
        v.y.clamp(-1.0, 1.0),
        v.z.clamp(-1.0, 1.0),
    )
}
