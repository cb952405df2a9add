//! Mesh sampling pipeline.
//!
//! The building blocks the [`Mesh`](crate::schema::Mesh) entity drives on
//! every update:
//!
//! - [`triangulate`] - fan triangulation of n-gon faces
//! - [`normals`] - area-weighted vertex normal synthesis
//! - [`split`] - splitting into budget-sized submeshes
//! - [`DoubleBuffer`] - the two sample slots of an entity
//! - [`MeshSample`], [`SubmeshSample`], [`MeshFrame`], [`MeshView`], [`MeshData`] - sample buffers
//! - [`ImportSettings`], [`ExportSettings`] - conversion settings

mod buffer;
pub mod normals;
mod sample;
mod settings;
pub mod split;
pub mod triangulate;

pub use buffer::DoubleBuffer;
pub use normals::{normalize_normals, synthesize, synthesize_into};
pub use sample::{MeshData, MeshFrame, MeshSample, MeshView, SubmeshSample};
pub use settings::{
    DEFAULT_VERTEX_BUDGET, ExportSettings, ImportSettings, NormalCalculation, TopologyVariance,
};
pub use split::{needs_split, split, split_into};
pub use triangulate::{IndexCounts, count_indices, triangulate, triangulate_into};
