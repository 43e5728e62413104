//! World transforms of renderable instances.
//!
//! A [`Transform`] is a position, rotation and scale that composes into a
//! world matrix. A [`WorldTransform`] is what an instance actually carries:
//! either a fixed transform or a function that produces a new one every frame
//! from the elapsed time.

use std::{fmt::Debug, ops::Mul};

use cgmath::{Matrix4, One, Vector3};
use instant::Duration;

/// Position, rotation (as quaternion) and scale of an object in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    /// The identity transform (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: cgmath::Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl Mul<Transform> for Transform {
    type Output = Self;

    /// Applies `rhs` in the local frame of `self`.
    fn mul(self, rhs: Transform) -> Self::Output {
        let scaled_rhs_pos = Vector3::new(
            self.scale.x * rhs.position.x,
            self.scale.y * rhs.position.y,
            self.scale.z * rhs.position.z,
        );
        Transform {
            position: self.position + (self.rotation * scaled_rhs_pos),
            rotation: self.rotation * rhs.rotation,
            scale: Vector3::new(
                self.scale.x * rhs.scale.x,
                self.scale.y * rhs.scale.y,
                self.scale.z * rhs.scale.z,
            ),
        }
    }
}

impl From<Vector3<f32>> for Transform {
    fn from(position: Vector3<f32>) -> Self {
        Transform {
            position,
            ..Default::default()
        }
    }
}

impl From<[f32; 3]> for Transform {
    fn from(position: [f32; 3]) -> Self {
        Vector3::from(position).into()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Produces the next world transform given the time since the previous frame.
pub type Animation = Box<dyn FnMut(Duration) -> Transform>;

pub enum WorldTransform {
    Static(Transform),
    Animated { current: Transform, step: Animation },
}

impl WorldTransform {
    pub fn animated(start: Transform, step: Animation) -> Self {
        WorldTransform::Animated {
            current: start,
            step,
        }
    }

    /// Advance time-varying transforms. Static ones are left untouched.
    pub fn advance(&mut self, dt: Duration) {
        if let WorldTransform::Animated { current, step } = self {
            *current = step(dt);
        }
    }

    pub fn transform(&self) -> &Transform {
        match self {
            WorldTransform::Static(transform) => transform,
            WorldTransform::Animated { current, .. } => current,
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        self.transform().to_matrix()
    }
}

impl From<Transform> for WorldTransform {
    fn from(transform: Transform) -> Self {
        WorldTransform::Static(transform)
    }
}

impl Default for WorldTransform {
    fn default() -> Self {
        WorldTransform::Static(Transform::default())
    }
}

impl Debug for WorldTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(transform) => f.debug_tuple("Static").field(transform).finish(),
            Self::Animated { current, .. } => f
                .debug_struct("Animated")
                .field("current", current)
                .finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Rotation3, SquareMatrix};

    #[test]
    fn translation_only_transform_is_a_translation_matrix() {
        let t = Transform::from([-0.15, 0.93, -0.15]);
        assert_eq!(
            t.to_matrix(),
            Matrix4::from_translation(Vector3::new(-0.15, 0.93, -0.15))
        );
        assert_eq!(Transform::new().to_matrix(), Matrix4::identity());
    }

    #[test]
    fn composition_applies_child_in_parent_frame() {
        let parent = Transform {
            position: Vector3::new(1.0, 0.0, 0.0),
            rotation: cgmath::Quaternion::from_angle_y(cgmath::Deg(90.0)),
            scale: Vector3::new(2.0, 2.0, 2.0),
        };
        let child = Transform::from([1.0, 0.0, 0.0]);
        let world = parent * child;
        // x axis rotated by +90 degrees around y points to -z
        assert!((world.position - Vector3::new(1.0, 0.0, -2.0)).magnitude() < 1e-5);
        assert_eq!(world.scale, Vector3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn animated_transform_follows_elapsed_time() {
        let mut elapsed = 0.0;
        let mut world = WorldTransform::animated(
            Transform::new(),
            Box::new(move |dt| {
                elapsed += dt.as_secs_f32();
                Transform::from([0.0, elapsed, 0.0])
            }),
        );
        world.advance(Duration::from_millis(500));
        world.advance(Duration::from_millis(500));
        assert!((world.transform().position.y - 1.0).abs() < 1e-6);
    }
}
