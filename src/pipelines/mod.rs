//! Render pipelines.
//!
//! Only the textured mesh pipeline is needed by the slot machine. The generic
//! [`mk_render_pipeline`] helper builds the wgpu pipeline from a layout and a
//! shader so that further pipelines only have to describe their bindings.

pub mod mesh;

/// Attachment formats a pipeline renders into.
#[derive(Clone, Copy, Debug)]
pub struct Targets {
    pub color: wgpu::TextureFormat,
    pub blend: Option<wgpu::BlendState>,
    pub depth: Option<wgpu::TextureFormat>,
}

/// Triangle list pipeline with `vs_main`/`fs_main` entry points, CCW front
/// faces and back face culling. Depth testing (`Less`, with writes) is on
/// whenever `targets.depth` is set.
pub fn mk_render_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    targets: Targets,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    shader: wgpu::ShaderModuleDescriptor,
) -> wgpu::RenderPipeline {
    let module = device.create_shader_module(shader);
    let color_targets = [Some(wgpu::ColorTargetState {
        format: targets.color,
        blend: targets.blend,
        write_mask: wgpu::ColorWrites::ALL,
    })];

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some("fs_main"),
            targets: &color_targets,
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            cull_mode: Some(wgpu::Face::Back),
            ..Default::default()
        },
        depth_stencil: targets.depth.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview_mask: None,
        cache: None,
    })
}
