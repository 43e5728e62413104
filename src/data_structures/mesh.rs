//! Indexed triangle meshes and their vertex format.

use wgpu::util::DeviceExt;

/// Describes how a vertex type is laid out in a vertex buffer.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/**
 * Shader locations 0 (position), 1 (normal) and 2 (uv), all in one
 * interleaved buffer stepped per vertex.
 */
impl Vertex for MeshVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// CPU side geometry, as produced by the loaders in [`crate::resources`].
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Appends `other`, rebasing its indices onto the vertices already held.
    pub fn append(&mut self, mut other: MeshData) {
        let base = self.vertices.len() as u32;
        self.indices.extend(other.indices.iter().map(|i| i + base));
        self.vertices.append(&mut other.vertices);
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Fails unless there is at least one triangle to draw. wgpu refuses to
    /// bind empty vertex or index buffers.
    pub fn ensure_drawable(&self, name: &str) -> anyhow::Result<()> {
        anyhow::ensure!(!self.is_empty(), "mesh {name} contains no triangles");
        anyhow::ensure!(!self.vertices.is_empty(), "mesh {name} has indices but no vertices");
        Ok(())
    }
}

/// Immutable geometry living on the GPU. Shared between instances via `Arc`.
#[derive(Debug)]
pub struct GpuMesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

impl GpuMesh {
    pub fn from_data(device: &wgpu::Device, name: &str, data: &MeshData) -> anyhow::Result<Self> {
        data.ensure_drawable(name)?;
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", name)),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Ok(Self {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            num_elements: data.indices.len() as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(z: f32) -> MeshData {
        MeshData {
            vertices: (0..3)
                .map(|i| MeshVertex {
                    position: [i as f32, 0.0, z],
                    ..Default::default()
                })
                .collect(),
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn append_rebases_indices() {
        let mut mesh = triangle(0.0);
        mesh.append(triangle(1.0));
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.vertices[3].position[2], 1.0);
    }

    #[test]
    fn meshes_without_triangles_are_rejected() {
        let points = MeshData {
            vertices: triangle(0.0).vertices,
            indices: Vec::new(),
        };
        let err = points.ensure_drawable("points.obj").unwrap_err();
        assert!(err.to_string().contains("points.obj"));
        assert!(MeshData::default().ensure_drawable("empty").is_err());
        assert!(triangle(0.0).ensure_drawable("triangle").is_ok());
    }

    #[test]
    fn vertex_layout_is_tightly_packed() {
        let desc = MeshVertex::desc();
        assert_eq!(desc.array_stride, 32);
        assert_eq!(desc.attributes[2].offset, 24);
    }
}
