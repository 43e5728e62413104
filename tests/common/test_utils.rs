#![allow(dead_code)]

use std::sync::Arc;

use cgmath::{Matrix4, Vector3};
use instant::Duration;
use slot_machine::{
    camera::{CameraState, Projection},
    data_structures::{
        instance::WorldTransform,
        uniform::{GlobalUniformBlock, UniformBlock},
    },
    frame::FrameContext,
    input::SixAxis,
    render::{CommandTarget, IndexedMesh, UniformWriter},
    scene::{RenderableInstance, Scene},
};

#[derive(Debug, PartialEq, Eq)]
pub struct FakeMesh {
    pub id: u32,
    pub index_count: u32,
}

impl IndexedMesh for FakeMesh {
    fn index_count(&self) -> u32 {
        self.index_count
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FakeSet(pub u32);

#[derive(Debug, PartialEq, Eq)]
pub struct FakePipeline(pub u32);

pub const PIPELINE: u32 = 7;
pub const GLOBAL_SET: FakeSet = FakeSet(0);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    BindPipeline(u32),
    BindSet { slot: u32, set: u32, frame: usize },
    BindMesh(u32),
    DrawIndexed { index_count: u32, instance_count: u32 },
}

/// Command target that only remembers what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingTarget {
    pub commands: Vec<Command>,
}

impl CommandTarget for RecordingTarget {
    type Pipeline = FakePipeline;
    type Mesh = FakeMesh;
    type Set = FakeSet;

    fn bind_pipeline(&mut self, pipeline: &FakePipeline) {
        self.commands.push(Command::BindPipeline(pipeline.0));
    }

    fn bind_set(&mut self, slot: u32, set: &FakeSet, frame_index: usize) {
        self.commands.push(Command::BindSet {
            slot,
            set: set.0,
            frame: frame_index,
        });
    }

    fn bind_mesh(&mut self, mesh: &FakeMesh) {
        self.commands.push(Command::BindMesh(mesh.id));
    }

    fn draw_indexed(&mut self, index_count: u32, instance_count: u32) {
        self.commands.push(Command::DrawIndexed {
            index_count,
            instance_count,
        });
    }
}

#[derive(Clone, Debug)]
pub struct UniformWrite {
    pub set: u32,
    pub frame: usize,
    pub binding: u32,
    pub data: Vec<u8>,
}

impl UniformWrite {
    pub fn mvp(&self) -> Matrix4<f32> {
        bytemuck::pod_read_unaligned::<UniformBlock>(&self.data).mvp()
    }

    pub fn global(&self) -> GlobalUniformBlock {
        bytemuck::pod_read_unaligned(&self.data)
    }
}

#[derive(Debug, Default)]
pub struct RecordingWriter {
    pub writes: Vec<UniformWrite>,
}

impl RecordingWriter {
    pub fn for_set(&self, set: u32) -> Vec<&UniformWrite> {
        self.writes.iter().filter(|w| w.set == set).collect()
    }
}

impl UniformWriter for RecordingWriter {
    type Set = FakeSet;

    fn write(
        &mut self,
        set: &FakeSet,
        frame_index: usize,
        binding: u32,
        data: &[u8],
    ) -> anyhow::Result<()> {
        self.writes.push(UniformWrite {
            set: set.0,
            frame: frame_index,
            binding,
            data: data.to_vec(),
        });
        Ok(())
    }
}

pub type TestScene = Scene<FakePipeline, FakeMesh, FakeSet>;

pub fn empty_scene() -> TestScene {
    Scene::new(
        FakePipeline(PIPELINE),
        GLOBAL_SET,
        GlobalUniformBlock::new(
            Vector3::new(1.0, 2.0, 1.5),
            [1.0, 1.0, 1.0],
            [0.15, 0.15, 0.15],
            CameraState::default().eye(),
        ),
        CameraState::default(),
        Projection::default(),
    )
}

/// A scene with one instance per offset, all sharing one mesh. Instance `i`
/// owns set `i + 1`.
pub fn scene_with_offsets(offsets: &[[f32; 3]]) -> TestScene {
    let mut scene = empty_scene();
    let mesh = Arc::new(FakeMesh {
        id: 1,
        index_count: 36,
    });
    for (i, offset) in offsets.iter().enumerate() {
        scene.register(RenderableInstance::new(
            &format!("instance{i}"),
            mesh.clone(),
            FakeSet(i as u32 + 1),
            slot_machine::data_structures::instance::Transform::from(*offset),
        ));
    }
    scene
}

pub fn frame(frame_index: usize, aspect_ratio: f32) -> FrameContext {
    FrameContext::new(
        frame_index,
        aspect_ratio,
        SixAxis {
            delta_time: Duration::from_millis(16),
            ..Default::default()
        },
    )
}

/// `Projection * View * World` computed independently of the scene.
pub fn expected_mvp(aspect_ratio: f32, world: &WorldTransform) -> Matrix4<f32> {
    let proj = Projection::default().calc_matrix(aspect_ratio);
    let view = CameraState::default().calc_matrix();
    proj * view * world.matrix()
}
