//! The renderable scene: instances, camera and the two per-frame passes.
//!
//! A [`Scene`] owns an ordered list of [`RenderableInstance`]s plus the
//! pipeline and global resource set they are drawn with. Each frame the flow
//! first calls [`Scene::update_uniforms`] and then [`Scene::populate_commands`]
//! with the same frame index.
//!
//! The scene is generic over the pipeline, mesh and resource set handles, so
//! it runs against wgpu in the application and against plain recorders in
//! tests.

use std::sync::Arc;

use cgmath::Matrix4;

use crate::{
    camera::{CameraState, Projection},
    data_structures::{
        instance::WorldTransform,
        uniform::{GlobalUniformBlock, UniformBlock},
    },
    frame::FrameContext,
    render::{CommandTarget, IndexedMesh, UniformWriter},
};

/// Uniform binding of the per-instance set (set 1).
pub const INSTANCE_UNIFORM_BINDING: u32 = 0;
/// Uniform binding of the global set (set 0).
pub const GLOBAL_UNIFORM_BINDING: u32 = 0;

pub const GLOBAL_SET_SLOT: u32 = 0;
pub const INSTANCE_SET_SLOT: u32 = 1;

/// One drawable object.
///
/// The mesh is shared with other instances; the resource set belongs to this
/// instance alone and holds one uniform slot per frame in flight.
#[derive(Debug)]
pub struct RenderableInstance<M, S> {
    pub name: String,
    pub mesh: Arc<M>,
    pub set: S,
    pub world: WorldTransform,
    pub uniform: UniformBlock,
}

impl<M, S> RenderableInstance<M, S> {
    pub fn new<W: Into<WorldTransform>>(name: &str, mesh: Arc<M>, set: S, world: W) -> Self {
        Self {
            name: name.to_string(),
            mesh,
            set,
            world: world.into(),
            uniform: UniformBlock::default(),
        }
    }
}

pub struct Scene<P, M, S> {
    pipeline: P,
    global_set: S,
    global: GlobalUniformBlock,
    pub camera: CameraState,
    pub projection: Projection,
    instances: Vec<RenderableInstance<M, S>>,
}

impl<P, M: IndexedMesh, S> Scene<P, M, S> {
    pub fn new(
        pipeline: P,
        global_set: S,
        global: GlobalUniformBlock,
        camera: CameraState,
        projection: Projection,
    ) -> Self {
        Self {
            pipeline,
            global_set,
            global,
            camera,
            projection,
            instances: Vec::new(),
        }
    }

    /// Append an instance. Returns its position in draw order.
    pub fn register(&mut self, instance: RenderableInstance<M, S>) -> usize {
        log::debug!(
            "registering instance {:?} ({} indices)",
            instance.name,
            instance.mesh.index_count()
        );
        self.instances.push(instance);
        self.instances.len() - 1
    }

    pub fn instances(&self) -> &[RenderableInstance<M, S>] {
        &self.instances
    }

    pub fn instances_mut(&mut self) -> &mut [RenderableInstance<M, S>] {
        &mut self.instances
    }

    pub fn find(&self, name: &str) -> Option<&RenderableInstance<M, S>> {
        self.instances.iter().find(|instance| instance.name == name)
    }

    pub fn global_set(&self) -> &S {
        &self.global_set
    }

    pub fn global_uniform(&self) -> &GlobalUniformBlock {
        &self.global
    }

    /// `Projection * View` for the given aspect ratio.
    pub fn view_projection(&self, aspect_ratio: f32) -> Matrix4<f32> {
        self.projection.calc_matrix(aspect_ratio) * self.camera.calc_matrix()
    }

    /// Advance time-varying transforms, then write every instance's MVP and
    /// the global block into the slots of `frame.frame_index`.
    ///
    /// Nothing outside that frame slot is written. Stops at the first write
    /// the writer rejects.
    pub fn update_uniforms<W>(&mut self, writer: &mut W, frame: &FrameContext) -> anyhow::Result<()>
    where
        W: UniformWriter<Set = S>,
    {
        let view_proj = self.view_projection(frame.aspect_ratio);

        for instance in &mut self.instances {
            instance.world.advance(frame.delta_time);
            instance.uniform = UniformBlock::new(view_proj * instance.world.matrix());
            writer.write(
                &instance.set,
                frame.frame_index,
                INSTANCE_UNIFORM_BINDING,
                bytemuck::bytes_of(&instance.uniform),
            )?;
        }

        self.global.set_eye_pos(self.camera.eye());
        writer.write(
            &self.global_set,
            frame.frame_index,
            GLOBAL_UNIFORM_BINDING,
            bytemuck::bytes_of(&self.global),
        )
    }

    /// Record the draws of one frame: pipeline and global set once, then one
    /// set bind, mesh bind and indexed draw per instance in registration
    /// order.
    pub fn populate_commands<T>(&self, target: &mut T, frame_index: usize)
    where
        T: CommandTarget<Pipeline = P, Mesh = M, Set = S>,
    {
        target.bind_pipeline(&self.pipeline);
        target.bind_set(GLOBAL_SET_SLOT, &self.global_set, frame_index);

        for instance in &self.instances {
            target.bind_set(INSTANCE_SET_SLOT, &instance.set, frame_index);
            target.bind_mesh(&instance.mesh);
            target.draw_indexed(instance.mesh.index_count(), 1);
        }
    }
}
