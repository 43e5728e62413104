//! Application configuration.
//!
//! Plain value objects with sensible defaults. Override single fields with the
//! `with_*` builders before passing the config to [`crate::flow::run`].

use cgmath::{Point3, Vector3};

use crate::camera::{CameraState, ClipConvention, Projection};

#[derive(Clone, Debug)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub resizable: bool,
    pub clear_colour: wgpu::Color,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Slot Machine".to_string(),
            resizable: true,
            clear_colour: wgpu::Color {
                r: 0.0,
                g: 0.005,
                b: 0.01,
                a: 1.0,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub fovy_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
    pub target: Point3<f32>,
    pub offset: Vector3<f32>,
    pub convention: ClipConvention,
}

impl CameraConfig {
    pub fn camera(&self) -> CameraState {
        CameraState::new(self.target, self.offset)
    }

    pub fn projection(&self) -> Projection {
        Projection::new(cgmath::Deg(self.fovy_degrees), self.znear, self.zfar)
            .with_convention(self.convention)
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fovy_degrees: 45.0,
            znear: 0.1,
            zfar: 100.0,
            target: Point3::new(0.0, 0.0, 0.0),
            offset: Vector3::new(6.0, 3.0, 10.0),
            convention: ClipConvention::default(),
        }
    }
}

/// Directional light plus ambient term fed into the global uniform block.
#[derive(Clone, Debug, PartialEq)]
pub struct LightConfig {
    pub direction: Vector3<f32>,
    pub colour: [f32; 3],
    pub ambient: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: Vector3::new(1.0, 2.0, 1.5),
            colour: [1.0, 1.0, 1.0],
            ambient: [0.15, 0.15, 0.15],
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub light: LightConfig,
    /// Number of frames the CPU may prepare ahead of the GPU. Every resource
    /// set holds one uniform copy per slot.
    pub frames_in_flight: usize,
}

impl AppConfig {
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window.width = width;
        self.window.height = height;
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.window.title = title.to_string();
        self
    }

    pub fn with_clip_convention(mut self, convention: ClipConvention) -> Self {
        self.camera.convention = convention;
        self
    }

    pub fn with_frames_in_flight(mut self, frames: usize) -> Self {
        self.frames_in_flight = frames.max(1);
        self
    }

    pub fn with_light(mut self, light: LightConfig) -> Self {
        self.light = light;
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            frames_in_flight: 2,
        }
    }
}
