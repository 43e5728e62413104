//! The slot machine scene: one body and three wheels.
//!
//! [`layout`] lists what gets drawn. [`SlotAssets`] loads every mesh and
//! texture file named there exactly once, and [`build_scene`] turns the two
//! into a GPU backed [`Scene`]. [`SlotMachine`] wraps that scene as the
//! [`GraphicsFlow`] run by the binary.

use std::{collections::HashMap, sync::Arc};

use anyhow::Context as _;
use image::DynamicImage;

use crate::{
    camera::ClipConvention,
    config::AppConfig,
    context::{Context, InitContext},
    data_structures::{
        instance::Transform,
        mesh::{GpuMesh, MeshData},
        resource_set::{ResourceSet, SetEntry},
        texture::Texture,
        uniform::GlobalUniformBlock,
    },
    flow::{FlowConstructor, GraphicsFlow, Out},
    frame::FrameContext,
    pipelines::mesh::{MeshPipeline, mk_mesh_pipeline},
    render::QueueWriter,
    resources,
    scene::{RenderableInstance, Scene},
};

/// One row of the scene layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstanceDesc {
    pub name: &'static str,
    pub model: &'static str,
    pub texture: &'static str,
    pub offset: [f32; 3],
}

const BODY_MODEL: &str = "Models/SlotBody.obj";
const BODY_TEXTURE: &str = "textures/SlotBody.png";
const WHEEL_MODEL: &str = "Models/SlotWheel.obj";
const WHEEL_TEXTURE: &str = "textures/SlotWheel.png";

const LAYOUT: [InstanceDesc; 4] = [
    InstanceDesc {
        name: "body",
        model: BODY_MODEL,
        texture: BODY_TEXTURE,
        offset: [0.0, 0.0, 0.0],
    },
    InstanceDesc {
        name: "wheel1",
        model: WHEEL_MODEL,
        texture: WHEEL_TEXTURE,
        offset: [-0.15, 0.93, -0.15],
    },
    InstanceDesc {
        name: "wheel2",
        model: WHEEL_MODEL,
        texture: WHEEL_TEXTURE,
        offset: [0.0, 0.93, -0.15],
    },
    InstanceDesc {
        name: "wheel3",
        model: WHEEL_MODEL,
        texture: WHEEL_TEXTURE,
        offset: [0.15, 0.93, -0.15],
    },
];

/// The instances of the slot machine, in draw order.
pub fn layout() -> &'static [InstanceDesc] {
    &LAYOUT
}

/// CPU side assets keyed by their path under `assets/`.
#[derive(Debug, Default)]
pub struct SlotAssets {
    meshes: HashMap<String, MeshData>,
    images: HashMap<String, DynamicImage>,
}

impl SlotAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every model and texture referenced by `layout`. Paths shared by
    /// several instances are read once.
    pub async fn load(layout: &[InstanceDesc]) -> anyhow::Result<Self> {
        let mut assets = Self::new();
        for desc in layout {
            if !assets.meshes.contains_key(desc.model) {
                let mesh = resources::load_mesh_data(desc.model).await?;
                assets.insert_mesh(desc.model, mesh);
            }
            if !assets.images.contains_key(desc.texture) {
                let img = resources::texture::load_image(desc.texture).await?;
                assets.insert_image(desc.texture, img);
            }
        }
        Ok(assets)
    }

    pub fn insert_mesh(&mut self, path: &str, mesh: MeshData) {
        self.meshes.insert(path.to_string(), mesh);
    }

    pub fn insert_image(&mut self, path: &str, img: DynamicImage) {
        self.images.insert(path.to_string(), img);
    }

    pub fn mesh(&self, path: &str) -> anyhow::Result<&MeshData> {
        self.meshes
            .get(path)
            .with_context(|| format!("mesh {path} was not loaded"))
    }

    pub fn image(&self, path: &str) -> anyhow::Result<&DynamicImage> {
        self.images
            .get(path)
            .with_context(|| format!("texture {path} was not loaded"))
    }
}

pub type GpuScene = Scene<wgpu::RenderPipeline, GpuMesh, ResourceSet>;

/// Upload `assets` and register one instance per `layout` row.
///
/// Instances naming the same model share one [`GpuMesh`]; each instance gets
/// its own resource set with `config.frames_in_flight` uniform slots.
pub fn build_scene(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    color_format: wgpu::TextureFormat,
    config: &AppConfig,
    layout: &[InstanceDesc],
    assets: &SlotAssets,
) -> anyhow::Result<GpuScene> {
    let frames = config.frames_in_flight;
    let MeshPipeline {
        pipeline,
        global_layout,
        instance_layout,
    } = mk_mesh_pipeline(device, color_format);

    let camera = config.camera.camera();
    let global = GlobalUniformBlock::new(
        config.light.direction,
        config.light.colour,
        config.light.ambient,
        camera.eye(),
    );
    let global_set = ResourceSet::new(
        device,
        "Global Set",
        &global_layout,
        &[SetEntry::Uniform { slot: 0 }],
        frames,
    )?;
    let mut scene = Scene::new(pipeline, global_set, global, camera, config.camera.projection());

    let mut meshes: HashMap<&str, Arc<GpuMesh>> = HashMap::new();
    let mut textures: HashMap<&str, Texture> = HashMap::new();
    for desc in layout {
        let mesh = match meshes.get(desc.model) {
            Some(mesh) => mesh.clone(),
            None => {
                let mesh = Arc::new(GpuMesh::from_data(device, desc.model, assets.mesh(desc.model)?)?);
                meshes.insert(desc.model, mesh.clone());
                mesh
            }
        };
        if !textures.contains_key(desc.texture) {
            let texture = Texture::from_image(device, queue, assets.image(desc.texture)?, Some(desc.texture));
            textures.insert(desc.texture, texture);
        }
        let texture = &textures[desc.texture];

        let set = ResourceSet::new(
            device,
            desc.name,
            &instance_layout,
            &[
                SetEntry::Uniform { slot: 0 },
                SetEntry::Texture { slot: 1, texture },
            ],
            frames,
        )?;
        scene.register(RenderableInstance::new(
            desc.name,
            mesh,
            set,
            Transform::from(desc.offset),
        ));
    }

    log::info!(
        "slot machine ready: {} instances, {} meshes, {} textures",
        scene.instances().len(),
        meshes.len(),
        textures.len()
    );
    Ok(scene)
}

pub struct SlotMachine {
    scene: GpuScene,
}

impl SlotMachine {
    pub async fn new(init: InitContext) -> anyhow::Result<Self> {
        let assets = SlotAssets::load(layout()).await?;
        let scene = build_scene(
            &init.device,
            &init.queue,
            init.format,
            &init.config,
            layout(),
            &assets,
        )?;
        Ok(Self { scene })
    }

    pub fn scene(&self) -> &GpuScene {
        &self.scene
    }
}

impl GraphicsFlow for SlotMachine {
    fn on_init(&mut self, ctx: &mut Context) -> Out {
        let (width, height) = ctx.size();
        log::info!("rendering slot machine at {width}x{height}");
        Out::Empty
    }

    fn update_uniforms(&mut self, ctx: &Context, frame: &FrameContext) -> anyhow::Result<Out> {
        self.scene.update_uniforms(&mut QueueWriter(&ctx.queue), frame)?;
        Ok(if frame.input.exit_requested {
            Out::Exit
        } else {
            Out::Empty
        })
    }

    fn populate_commands(&self, render_pass: &mut wgpu::RenderPass<'_>, frame_index: usize) {
        self.scene.populate_commands(render_pass, frame_index);
    }
}

/// Configuration used by the windowed demo. wgpu's clip space is Y-up.
pub fn app_config() -> AppConfig {
    AppConfig::default().with_clip_convention(ClipConvention::YUp)
}

/// Flow constructor for [`crate::flow::run`].
pub fn constructor() -> FlowConstructor {
    Box::new(|init| {
        Box::pin(async move {
            let flow = SlotMachine::new(init).await?;
            Ok::<_, anyhow::Error>(Box::new(flow) as Box<dyn GraphicsFlow>)
        })
    })
}
