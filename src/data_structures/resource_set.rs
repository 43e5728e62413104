//! Resource sets: bind groups replicated once per frame in flight.
//!
//! A set is described by a [`SetLayout`], itself built from [`BindingDesc`]
//! value objects. Each descriptor names a binding slot, what kind of resource
//! sits there and which shader stages see it. The wgpu specifics (binding
//! types, visibility flags, the extra sampler binding a texture needs) stay in
//! this module.
//!
//! A [`ResourceSet`] then owns one uniform buffer per uniform binding *per
//! frame slot*, plus the matching bind group, so that writing the uniforms of
//! frame `i + 1` never touches memory the GPU may still read for frame `i`.

use std::num::NonZeroU64;

use wgpu::util::DeviceExt;

use crate::data_structures::texture::Texture;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    /// A uniform buffer of the given size in bytes.
    Uniform { size: u64 },
    /// A sampled 2D texture. The sampler is placed at `slot + 1`.
    Texture,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Vertex,
    Fragment,
    AllGraphics,
}

impl From<Stage> for wgpu::ShaderStages {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::Vertex => wgpu::ShaderStages::VERTEX,
            Stage::Fragment => wgpu::ShaderStages::FRAGMENT,
            Stage::AllGraphics => wgpu::ShaderStages::VERTEX_FRAGMENT,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BindingDesc {
    pub slot: u32,
    pub kind: ResourceKind,
    pub stage: Stage,
}

impl BindingDesc {
    pub fn uniform<T>(slot: u32, stage: Stage) -> Self {
        Self {
            slot,
            kind: ResourceKind::Uniform {
                size: std::mem::size_of::<T>() as u64,
            },
            stage,
        }
    }

    pub fn texture(slot: u32, stage: Stage) -> Self {
        Self {
            slot,
            kind: ResourceKind::Texture,
            stage,
        }
    }

    fn layout_entries(&self) -> Vec<wgpu::BindGroupLayoutEntry> {
        let visibility = self.stage.into();
        match self.kind {
            ResourceKind::Uniform { size } => vec![wgpu::BindGroupLayoutEntry {
                binding: self.slot,
                visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(size),
                },
                count: None,
            }],
            ResourceKind::Texture => vec![
                wgpu::BindGroupLayoutEntry {
                    binding: self.slot,
                    visibility,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: self.slot + 1,
                    visibility,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        }
    }
}

/// The "class" of a resource set: which bindings exist and where.
#[derive(Debug)]
pub struct SetLayout {
    pub bindings: Vec<BindingDesc>,
    pub layout: wgpu::BindGroupLayout,
}

impl SetLayout {
    pub fn new(device: &wgpu::Device, label: &str, bindings: &[BindingDesc]) -> Self {
        let entries: Vec<_> = bindings.iter().flat_map(BindingDesc::layout_entries).collect();
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &entries,
        });
        Self {
            bindings: bindings.to_vec(),
            layout,
        }
    }
}

/// The value bound at one slot when a set is created.
pub enum SetEntry<'a> {
    Uniform { slot: u32 },
    Texture { slot: u32, texture: &'a Texture },
}

#[derive(Debug)]
struct FrameSlot {
    uniforms: Vec<(u32, wgpu::Buffer)>,
    bind_group: wgpu::BindGroup,
}

#[derive(Debug)]
pub struct ResourceSet {
    label: String,
    frames: Vec<FrameSlot>,
}

impl ResourceSet {
    /// Allocate `frames` copies of a set matching `layout`.
    ///
    /// Uniform sizes come from the layout; entries only say which slots are
    /// uniforms and which texture goes where.
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        layout: &SetLayout,
        entries: &[SetEntry],
        frames: usize,
    ) -> anyhow::Result<Self> {
        let frames = (0..frames.max(1))
            .map(|frame| Self::mk_frame_slot(device, label, layout, entries, frame))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self {
            label: label.to_string(),
            frames,
        })
    }

    fn mk_frame_slot(
        device: &wgpu::Device,
        label: &str,
        layout: &SetLayout,
        entries: &[SetEntry],
        frame: usize,
    ) -> anyhow::Result<FrameSlot> {
        let mut uniforms = Vec::new();
        for entry in entries {
            if let SetEntry::Uniform { slot } = entry {
                let size = layout
                    .bindings
                    .iter()
                    .find_map(|desc| match desc.kind {
                        ResourceKind::Uniform { size } if desc.slot == *slot => Some(size),
                        _ => None,
                    })
                    .ok_or_else(|| {
                        anyhow::anyhow!("{label}: binding {slot} is not a uniform in the layout")
                    })?;
                let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{label} uniform {slot} frame {frame}")),
                    contents: &vec![0u8; size as usize],
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
                uniforms.push((*slot, buffer));
            }
        }

        let mut group_entries = Vec::new();
        for entry in entries {
            match entry {
                SetEntry::Uniform { slot } => {
                    if let Some((_, buffer)) = uniforms.iter().find(|(s, _)| s == slot) {
                        group_entries.push(wgpu::BindGroupEntry {
                            binding: *slot,
                            resource: buffer.as_entire_binding(),
                        });
                    }
                }
                SetEntry::Texture { slot, texture } => {
                    group_entries.push(wgpu::BindGroupEntry {
                        binding: *slot,
                        resource: wgpu::BindingResource::TextureView(&texture.view),
                    });
                    group_entries.push(wgpu::BindGroupEntry {
                        binding: *slot + 1,
                        resource: wgpu::BindingResource::Sampler(&texture.sampler),
                    });
                }
            }
        }

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} frame {frame}")),
            layout: &layout.layout,
            entries: &group_entries,
        });

        Ok(FrameSlot {
            uniforms,
            bind_group,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn frames(&self) -> usize {
        self.frames.len()
    }

    /// Bind group for a frame slot. Indices past the slot count wrap around.
    pub fn bind_group(&self, frame_index: usize) -> &wgpu::BindGroup {
        &self.frames[frame_index % self.frames.len()].bind_group
    }

    pub fn uniform_buffer(&self, frame_index: usize, binding: u32) -> Option<&wgpu::Buffer> {
        self.frames[frame_index % self.frames.len()]
            .uniforms
            .iter()
            .find(|(slot, _)| *slot == binding)
            .map(|(_, buffer)| buffer)
    }
}
