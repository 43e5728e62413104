//! Camera state and the matrices derived from it.
//!
//! The camera of the slot machine never moves: it sits at a fixed offset from
//! its target and looks at it. It is still kept as mutable state so that a
//! controller could animate it later without touching the frame updater.

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, Vector3};

/// Maps OpenGL clip space (z in -1..1) to the 0..1 depth range used by wgpu
/// and Vulkan.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Orientation of the Y axis in the clip space of the target backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ClipConvention {
    /// Y points down in normalized device coordinates (Vulkan). The projection
    /// negates its Y scale to compensate.
    #[default]
    YDown,
    /// Y points up in normalized device coordinates (wgpu, OpenGL, Metal).
    YUp,
}

/// A look-at camera: the eye sits at `target + offset`.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraState {
    pub target: Point3<f32>,
    pub offset: Vector3<f32>,
    pub up: Vector3<f32>,
}

impl CameraState {
    pub fn new<P: Into<Point3<f32>>, V: Into<Vector3<f32>>>(target: P, offset: V) -> Self {
        Self {
            target: target.into(),
            offset: offset.into(),
            up: Vector3::unit_y(),
        }
    }

    pub fn eye(&self) -> Point3<f32> {
        self.target + self.offset
    }

    /// Right-handed view matrix looking from the eye towards the target.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye(), self.target, self.up.normalize())
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(Point3::origin(), (6.0, 3.0, 10.0))
    }
}

/// Perspective projection parameters.
///
/// The aspect ratio is not stored here. It arrives each frame through the
/// [`FrameContext`](crate::frame::FrameContext).
#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub convention: ClipConvention,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            fovy: fovy.into(),
            znear,
            zfar,
            convention: ClipConvention::default(),
        }
    }

    pub fn with_convention(mut self, convention: ClipConvention) -> Self {
        self.convention = convention;
        self
    }

    /// `aspect` must be strictly positive.
    pub fn calc_matrix(&self, aspect: f32) -> Matrix4<f32> {
        debug_assert!(aspect > 0.0, "aspect ratio must be positive, got {aspect}");
        let mut proj =
            OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, aspect, self.znear, self.zfar);
        if let ClipConvention::YDown = self.convention {
            proj[1][1] *= -1.0;
        }
        proj
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(cgmath::Deg(45.0), 0.1, 100.0)
    }
}

/// Aspect ratio of a surface. Zero-sized surfaces are the caller's problem.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    width as f32 / height as f32
}
