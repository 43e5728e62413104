use std::io::{BufReader, Cursor};

use anyhow::Context;
use cgmath::{InnerSpace, Matrix3, Matrix4, SquareMatrix, Vector3, Vector4};

use crate::{
    data_structures::mesh::{MeshData, MeshVertex},
    resources::load_binary,
};

/// Parse Wavefront OBJ text into a single indexed mesh.
///
/// Materials are ignored; textures are chosen by whoever places the mesh.
/// V texture coordinates are flipped to wgpu's top-left origin. Vertices
/// without normals get a zero normal, which the shader treats as unlit.
pub async fn parse_obj(obj_text: &str) -> anyhow::Result<MeshData> {
    let mut obj_reader = BufReader::new(Cursor::new(obj_text));

    let (models, _materials) = tobj::load_obj_buf_async(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |p| async move {
            log::debug!("skipping material library {p}");
            Err(tobj::LoadError::OpenFileFailed)
        },
    )
    .await
    .context("malformed OBJ data")?;

    let mut data = MeshData::default();
    for model in models {
        data.append(obj_model_to_mesh(&model.mesh));
    }
    Ok(data)
}

fn obj_model_to_mesh(mesh: &tobj::Mesh) -> MeshData {
    let vertices = (0..mesh.positions.len() / 3)
        .map(|i| MeshVertex {
            position: [
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            ],
            normal: [
                mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
            ],
            uv: [
                mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                1.0 - mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
            ],
        })
        .collect();

    MeshData {
        vertices,
        indices: mesh.indices.clone(),
    }
}

/// Load a glTF (or binary glb) file and flatten every triangle primitive of
/// the default scene into one mesh, with node transforms baked in.
///
/// External buffers are resolved relative to the glTF file. Embedded
/// `data:` URIs are not supported.
pub async fn load_gltf(file_name: &str) -> anyhow::Result<MeshData> {
    let bytes = load_binary(file_name).await?;
    let gltf = gltf::Gltf::from_slice(&bytes).context("malformed glTF document")?;

    let base = std::path::Path::new(file_name)
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_default();

    let mut buffer_data: Vec<Vec<u8>> = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = gltf
                    .blob
                    .as_deref()
                    .context("glb binary chunk is missing")?;
                buffer_data.push(blob.to_vec());
            }
            gltf::buffer::Source::Uri(uri) => {
                anyhow::ensure!(
                    !uri.starts_with("data:"),
                    "embedded buffer URIs are not supported"
                );
                let path = base.join(uri);
                let bin = load_binary(&path.to_string_lossy()).await?;
                buffer_data.push(bin);
            }
        }
    }

    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .context("glTF file contains no scene")?;

    let mut data = MeshData::default();
    for node in scene.nodes() {
        append_node(&mut data, &node, Matrix4::identity(), &buffer_data);
    }
    Ok(data)
}

fn append_node(
    data: &mut MeshData,
    node: &gltf::Node,
    parent: Matrix4<f32>,
    buffers: &[Vec<u8>],
) {
    let world = parent * Matrix4::from(node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "skipping non-triangle primitive {} of mesh {:?}",
                    primitive.index(),
                    mesh.name()
                );
                continue;
            }
            data.append(read_primitive(&primitive, world, buffers));
        }
    }

    for child in node.children() {
        append_node(data, &child, world, buffers);
    }
}

fn read_primitive(
    primitive: &gltf::Primitive,
    world: Matrix4<f32>,
    buffers: &[Vec<u8>],
) -> MeshData {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|b| b.as_slice()));
    let normal_matrix = Matrix3::from_cols(world.x.truncate(), world.y.truncate(), world.z.truncate());

    let mut vertices: Vec<MeshVertex> = reader
        .read_positions()
        .map(|positions| {
            positions
                .map(|p| {
                    let p = world * Vector4::new(p[0], p[1], p[2], 1.0);
                    MeshVertex {
                        position: p.truncate().into(),
                        ..Default::default()
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    if let Some(normals) = reader.read_normals() {
        for (vertex, n) in vertices.iter_mut().zip(normals) {
            let n = normal_matrix * Vector3::from(n);
            if n.magnitude2() > 0.0 {
                vertex.normal = n.normalize().into();
            }
        }
    }
    if let Some(uvs) = reader.read_tex_coords(0) {
        for (vertex, uv) in vertices.iter_mut().zip(uvs.into_f32()) {
            vertex.uv = uv;
        }
    }

    let indices = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..vertices.len() as u32).collect(),
    };

    MeshData { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
o quad
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn obj_quads_are_triangulated() {
        let mesh = futures::executor::block_on(parse_obj(QUAD)).unwrap();
        assert_eq!(mesh.indices.len(), 6);
        assert_eq!(mesh.vertices.len(), 4);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn obj_texture_v_is_flipped() {
        let mesh = futures::executor::block_on(parse_obj(QUAD)).unwrap();
        let origin = mesh
            .vertices
            .iter()
            .find(|v| v.position == [0.0, 0.0, 0.0])
            .unwrap();
        assert_eq!(origin.uv, [0.0, 1.0]);
    }

    #[test]
    fn obj_without_faces_is_not_drawable() {
        let mesh = futures::executor::block_on(parse_obj("o empty\nv 0 0 0\nv 1 0 0\n")).unwrap();
        assert!(mesh.is_empty());
        let err = mesh.ensure_drawable("Models/empty.obj").unwrap_err();
        assert_eq!(err.to_string(), "mesh Models/empty.obj contains no triangles");
    }

    #[test]
    fn obj_objects_are_merged() {
        let two = format!("{QUAD}o second\nv 0 0 1\nv 1 0 1\nv 1 1 1\nf 5 6 7\n");
        let mesh = futures::executor::block_on(parse_obj(&two)).unwrap();
        assert_eq!(mesh.indices.len(), 9);
        assert!(mesh.indices[6..].iter().all(|&i| i >= 4));
    }
}
