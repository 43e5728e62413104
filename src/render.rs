//! Command recording and uniform upload seams.
//!
//! The scene never talks to wgpu directly. It records draws through a
//! [`CommandTarget`] and uploads uniforms through a [`UniformWriter`]. The
//! engine implements both for wgpu (a [`wgpu::RenderPass`] and a
//! [`QueueWriter`] around the device queue), while tests substitute
//! recorders that simply log what they were asked to do.
//!
//! # Key types
//!
//! - [`IndexedMesh`] is anything that knows its index count
//! - [`CommandTarget`] binds pipelines, resource sets and meshes and issues draws
//! - [`UniformWriter`] writes bytes into a resource set's uniform slot
//!

use anyhow::Context as _;

use crate::data_structures::{mesh::GpuMesh, resource_set::ResourceSet};

pub trait IndexedMesh {
    fn index_count(&self) -> u32;
}

/// Destination of recorded draw commands.
///
/// `bind_set` receives the frame-in-flight index so that implementations
/// holding one copy of the set per frame can pick the right one.
pub trait CommandTarget {
    type Pipeline;
    type Mesh: IndexedMesh;
    type Set;

    fn bind_pipeline(&mut self, pipeline: &Self::Pipeline);

    fn bind_set(&mut self, slot: u32, set: &Self::Set, frame_index: usize);

    fn bind_mesh(&mut self, mesh: &Self::Mesh);

    fn draw_indexed(&mut self, index_count: u32, instance_count: u32);
}

/// Sink for uniform data, addressed by set, frame slot and binding number.
///
/// Writing to a binding the set does not have is an error.
pub trait UniformWriter {
    type Set;

    fn write(
        &mut self,
        set: &Self::Set,
        frame_index: usize,
        binding: u32,
        data: &[u8],
    ) -> anyhow::Result<()>;
}

impl IndexedMesh for GpuMesh {
    fn index_count(&self) -> u32 {
        self.num_elements
    }
}

impl CommandTarget for wgpu::RenderPass<'_> {
    type Pipeline = wgpu::RenderPipeline;
    type Mesh = GpuMesh;
    type Set = ResourceSet;

    fn bind_pipeline(&mut self, pipeline: &wgpu::RenderPipeline) {
        self.set_pipeline(pipeline);
    }

    fn bind_set(&mut self, slot: u32, set: &ResourceSet, frame_index: usize) {
        self.set_bind_group(slot, set.bind_group(frame_index), &[]);
    }

    fn bind_mesh(&mut self, mesh: &GpuMesh) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    fn draw_indexed(&mut self, index_count: u32, instance_count: u32) {
        wgpu::RenderPass::draw_indexed(self, 0..index_count, 0, 0..instance_count);
    }
}

/// Uploads uniforms through the device queue.
///
/// Queue writes are staged and land before any command buffer submitted
/// afterwards, which gives the write-before-draw ordering for the frame.
pub struct QueueWriter<'a>(pub &'a wgpu::Queue);

impl UniformWriter for QueueWriter<'_> {
    type Set = ResourceSet;

    fn write(
        &mut self,
        set: &ResourceSet,
        frame_index: usize,
        binding: u32,
        data: &[u8],
    ) -> anyhow::Result<()> {
        let buffer = set.uniform_buffer(frame_index, binding).with_context(|| {
            format!(
                "resource set {:?} has no uniform at binding {binding}",
                set.label()
            )
        })?;
        self.0.write_buffer(buffer, 0, data);
        Ok(())
    }
}
