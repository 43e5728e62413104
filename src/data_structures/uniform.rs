//! Uniform block layouts shared with `mesh.wgsl`.

use cgmath::{Matrix4, Point3, Vector3};

/// Per-instance uniform: the composed model-view-projection matrix.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UniformBlock {
    pub mvp: [[f32; 4]; 4],
}

impl UniformBlock {
    pub fn new(mvp: Matrix4<f32>) -> Self {
        Self { mvp: mvp.into() }
    }

    pub fn mvp(&self) -> Matrix4<f32> {
        self.mvp.into()
    }
}

impl Default for UniformBlock {
    fn default() -> Self {
        Self {
            mvp: [[0.0; 4]; 4],
        }
    }
}

/// Scene-wide uniform bound once per frame at set 0.
///
/// Every vec3 occupies a full 16 byte slot in WGSL uniform layout, hence the
/// explicit padding words.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniformBlock {
    pub light_dir: [f32; 3],
    _padding: u32,
    pub light_colour: [f32; 3],
    _padding2: u32,
    pub ambient_colour: [f32; 3],
    _padding3: u32,
    pub eye_pos: [f32; 3],
    _padding4: u32,
}

impl GlobalUniformBlock {
    pub fn new(
        light_dir: Vector3<f32>,
        light_colour: [f32; 3],
        ambient_colour: [f32; 3],
        eye_pos: Point3<f32>,
    ) -> Self {
        Self {
            light_dir: light_dir.into(),
            _padding: 0,
            light_colour,
            _padding2: 0,
            ambient_colour,
            _padding3: 0,
            eye_pos: eye_pos.into(),
            _padding4: 0,
        }
    }

    pub fn set_eye_pos(&mut self, eye_pos: Point3<f32>) {
        self.eye_pos = eye_pos.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_match_wgsl_sizes() {
        assert_eq!(std::mem::size_of::<UniformBlock>(), 64);
        assert_eq!(std::mem::size_of::<GlobalUniformBlock>(), 64);
    }
}
