use crate::data_structures::{
    mesh::{MeshVertex, Vertex},
    resource_set::{BindingDesc, SetLayout, Stage},
    texture::Texture,
    uniform::{GlobalUniformBlock, UniformBlock},
};

/// Set 0: lights and eye position, shared by every draw of a frame.
pub fn global_set_bindings() -> [BindingDesc; 1] {
    [BindingDesc::uniform::<GlobalUniformBlock>(0, Stage::AllGraphics)]
}

/// Set 1: the instance's MVP plus its diffuse texture (and sampler at 2).
pub fn instance_set_bindings() -> [BindingDesc; 2] {
    [
        BindingDesc::uniform::<UniformBlock>(0, Stage::AllGraphics),
        BindingDesc::texture(1, Stage::Fragment),
    ]
}

/// The pipeline together with the set layouts its resource sets must match.
#[derive(Debug)]
pub struct MeshPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub global_layout: SetLayout,
    pub instance_layout: SetLayout,
}

pub fn mk_mesh_pipeline(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> MeshPipeline {
    let global_layout = SetLayout::new(device, "Global Set Layout", &global_set_bindings());
    let instance_layout = SetLayout::new(device, "Instance Set Layout", &instance_set_bindings());

    let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Mesh Pipeline Layout"),
        bind_group_layouts: &[&global_layout.layout, &instance_layout.layout],
        immediate_size: 0,
    });

    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Mesh Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("mesh.wgsl").into()),
    };

    let pipeline = super::mk_render_pipeline(
        device,
        "Mesh Pipeline",
        &render_pipeline_layout,
        super::Targets {
            color: color_format,
            blend: Some(wgpu::BlendState::REPLACE),
            depth: Some(Texture::DEPTH_FORMAT),
        },
        &[MeshVertex::desc()],
        shader,
    );

    MeshPipeline {
        pipeline,
        global_layout,
        instance_layout,
    }
}
