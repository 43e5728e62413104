//! Asset loading.
//!
//! Files are read from `./assets/<path>` natively and fetched from
//! `<origin>/assets/<path>` on the web. Loaders return CPU side data
//! ([`MeshData`], decoded images) so that callers decide when and how often to
//! upload to the GPU.

use anyhow::Context;

use crate::data_structures::mesh::MeshData;

pub mod mesh;
pub mod texture;

/// Mesh file formats understood by [`load_mesh_data`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelFormat {
    Obj,
    Gltf,
}

impl ModelFormat {
    /// Guess the format from the file extension.
    pub fn from_path(file_name: &str) -> Option<Self> {
        let ext = std::path::Path::new(file_name)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        match ext.as_str() {
            "obj" => Some(Self::Obj),
            "gltf" | "glb" => Some(Self::Gltf),
            _ => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().context("no browser window")?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| anyhow::anyhow!("page origin is not readable"))?;
    let base = reqwest::Url::parse(&format!("{origin}/assets/"))?;
    Ok(base.join(file_name)?)
}

#[cfg(not(target_arch = "wasm32"))]
fn asset_path(file_name: &str) -> std::path::PathBuf {
    std::path::Path::new("./").join("assets").join(file_name)
}

pub async fn load_string(file_name: &str) -> anyhow::Result<String> {
    #[cfg(target_arch = "wasm32")]
    let txt = {
        let url = format_url(file_name)?;
        reqwest::get(url).await?.text().await?
    };
    #[cfg(not(target_arch = "wasm32"))]
    let txt = {
        let path = asset_path(file_name);
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("could not read {}", path.display()))?
    };

    Ok(txt)
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(file_name)?;
        reqwest::get(url).await?.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = asset_path(file_name);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("could not read {}", path.display()))?
    };

    Ok(data)
}

/// Load a mesh file, merging all of its meshes into one indexed mesh.
pub async fn load_mesh_data(file_name: &str) -> anyhow::Result<MeshData> {
    let data = match ModelFormat::from_path(file_name) {
        Some(ModelFormat::Obj) => {
            let text = load_string(file_name).await?;
            mesh::parse_obj(&text).await
        }
        Some(ModelFormat::Gltf) => mesh::load_gltf(file_name).await,
        None => anyhow::bail!("unsupported mesh format: {file_name}"),
    }
    .with_context(|| format!("could not load mesh {file_name}"))?;

    data.ensure_drawable(file_name)?;
    log::info!(
        "loaded {file_name}: {} vertices, {} indices",
        data.vertices.len(),
        data.indices.len()
    );
    Ok(data)
}
