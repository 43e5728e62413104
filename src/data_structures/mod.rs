//! Engine data structures: meshes, textures, uniforms, resource sets and
//! world transforms.
//!
//! - `mesh` holds the vertex format and GPU geometry shared between instances
//! - `texture` wraps GPU textures and their creation
//! - `uniform` defines the uniform blocks mirrored in `mesh.wgsl`
//! - `resource_set` describes and allocates per-frame bind groups
//! - `instance` holds the world transform of a renderable instance

pub mod instance;
pub mod mesh;
pub mod resource_set;
pub mod texture;
pub mod uniform;
