//! slot-machine
//!
//! A textured slot machine (a body and three wheels) drawn every frame from a
//! fixed camera. The crate is split into a GPU independent core and a thin
//! wgpu/winit frame loop around it.
//!
//! Core
//! - `camera`: projection and view matrices
//! - `scene`: renderable instances, the per-frame uniform update and the draw
//!   submission
//! - `render`: the command and uniform seams the scene records through
//! - `frame`: the per-frame context and frame-in-flight counter
//! - `input`: keyboard and mouse folded into a six-axis snapshot
//!
//! Framework
//! - `context`: window surface, device, queue and depth attachment
//! - `flow`: the event loop and the `GraphicsFlow` callbacks
//! - `data_structures`: meshes, textures, uniform blocks and resource sets
//! - `pipelines`: the textured mesh pipeline
//! - `resources`: OBJ/glTF mesh and image loading
//! - `config`: application configuration
//! - `slot_machine`: the demo scene
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod frame;
pub mod input;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;
pub mod slot_machine;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn run_web() -> Result<(), wasm_bindgen::JsValue> {
    flow::run(slot_machine::app_config(), slot_machine::constructor())
        .map_err(|e| wasm_bindgen::JsValue::from_str(&format!("{e:#}")))
}
