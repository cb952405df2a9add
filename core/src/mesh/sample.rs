//! Mesh sample buffers.

use crate::math::{Bounds, Vec2, Vec3};
use crate::store::Time;

/// One time step of a mesh, after space conversion and triangulation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshSample {
    pub points: Vec<Vec3>,
    /// Empty when the source has none.
    pub velocities: Vec<Vec3>,
    /// Sized to `points` unless the source stores per-corner normals.
    pub normals: Vec<Vec3>,
    /// Empty when the source has none.
    pub uvs: Vec<Vec2>,
    /// Corner count of every face.
    pub counts: Vec<i32>,
    /// Face corner indices as stored, `sum(counts)` long.
    pub indices: Vec<i32>,
    /// Triangle list derived from `counts` and `indices`.
    pub indices_triangulated: Vec<u32>,
    /// Bounds of `points`.
    pub bounds: Bounds,
}

impl MeshSample {
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.indices_triangulated.len() / 3
    }

    /// Point positions as raw bytes.
    pub fn point_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.points)
    }

    /// Triangulated indices as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices_triangulated)
    }
}

/// A chunk of a split mesh with its own compact vertex set.
///
/// Vertices are expanded per triangle corner, so `indices` is always
/// `0..points.len()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmeshSample {
    pub points: Vec<Vec3>,
    /// Empty when the parent mesh has no usable normals.
    pub normals: Vec<Vec3>,
    /// Empty when the parent mesh has no usable UVs.
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
    /// Bounds of this submesh's own points.
    pub bounds: Bounds,
}

impl SubmeshSample {
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Indices narrowed to 16 bits, `None` if any index does not fit.
    pub fn indices_u16(&self) -> Option<Vec<u16>> {
        self.indices
            .iter()
            .map(|&i| u16::try_from(i).ok())
            .collect()
    }

    pub fn point_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.points)
    }
}

/// One double-buffer slot: a sample and its submeshes.
#[derive(Debug, Clone, Default)]
pub struct MeshFrame {
    pub sample: MeshSample,
    /// Empty unless the sample was split.
    pub submeshes: Vec<SubmeshSample>,
    /// Time this frame was sampled at.
    pub time: Time,
    /// Topology revision `indices_triangulated` was derived from.
    pub(crate) topology_generation: u64,
}

impl MeshFrame {
    /// Borrow the frame as a view.
    pub fn view(&self) -> MeshView<'_> {
        MeshView {
            sample: &self.sample,
            submeshes: &self.submeshes,
            time: self.time,
        }
    }
}

/// Borrowed view of the current front frame of a mesh.
///
/// The borrow ends before the mesh can be updated again. Use
/// [`Mesh::snapshot`](crate::schema::Mesh::snapshot) to keep a frame alive
/// across updates.
#[derive(Debug, Clone, Copy)]
pub struct MeshView<'a> {
    pub sample: &'a MeshSample,
    pub submeshes: &'a [SubmeshSample],
    pub time: Time,
}

impl MeshView<'_> {
    pub fn num_points(&self) -> usize {
        self.sample.points.len()
    }

    pub fn num_indices_triangulated(&self) -> usize {
        self.sample.indices_triangulated.len()
    }

    pub fn num_submeshes(&self) -> usize {
        self.submeshes.len()
    }

    pub fn bounds(&self) -> Bounds {
        self.sample.bounds
    }
}

/// Caller-owned mesh buffers.
///
/// Filled by [`Mesh::read_sample_into`](crate::schema::Mesh::read_sample_into),
/// which reuses existing allocations, and consumed by
/// [`Mesh::write_sample`](crate::schema::Mesh::write_sample). For writes,
/// `counts` may be left empty when `indices` is a plain triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub points: Vec<Vec3>,
    pub velocities: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub counts: Vec<i32>,
    pub indices: Vec<i32>,
    pub indices_triangulated: Vec<u32>,
    pub bounds: Bounds,
    pub submeshes: Vec<SubmeshSample>,
}

impl MeshData {
    /// Buffers pre-sized for the given peak counts.
    pub fn with_capacity(num_points: usize, num_indices_triangulated: usize) -> Self {
        Self {
            points: Vec::with_capacity(num_points),
            normals: Vec::with_capacity(num_points),
            indices_triangulated: Vec::with_capacity(num_indices_triangulated),
            ..Self::default()
        }
    }

    /// Copy all buffers of `view`, reusing this struct's allocations.
    pub fn copy_from(&mut self, view: &MeshView<'_>) {
        let sample = view.sample;
        self.points.clone_from(&sample.points);
        self.velocities.clone_from(&sample.velocities);
        self.normals.clone_from(&sample.normals);
        self.uvs.clone_from(&sample.uvs);
        self.counts.clone_from(&sample.counts);
        self.indices.clone_from(&sample.indices);
        self.indices_triangulated
            .clone_from(&sample.indices_triangulated);
        self.bounds = sample.bounds;
        self.submeshes.truncate(view.submeshes.len());
        let reused = self.submeshes.len();
        for (dst, src) in self.submeshes.iter_mut().zip(view.submeshes) {
            dst.clone_from(src);
        }
        self.submeshes
            .extend_from_slice(&view.submeshes[reused..]);
    }
}
