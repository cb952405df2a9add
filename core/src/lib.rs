//! # timesample core
//!
//! Turns time-sampled polygon meshes into renderer-ready buffers: fan
//! triangulation, synthesized normals, handedness and scale conversion,
//! bounds, and submeshes that fit 16-bit index buffers.
//!
//! Attribute storage is external. Entities read and write through the
//! [`AttributeStore`](store::AttributeStore) trait; [`MemoryStage`] is an
//! in-memory implementation.
//!
//! ```ignore
//! use timesample_core::{Context, ImportSettings, MemoryStage, SchemaKind};
//!
//! let stage = MemoryStage::new();
//! let mut ctx = Context::new();
//! let id = stage.create_schema(&mut ctx, SchemaKind::Mesh, None, "Wave")?;
//! // ... author samples ...
//! ctx.update_all_samples(0.5);
//! let view = ctx.mesh(id)?.front();
//! ```

pub mod context;
pub mod error;
pub mod math;
pub mod mesh;
pub mod profiling;
pub mod schema;
pub mod store;

pub use context::Context;
pub use error::{MeshError, MeshResult};
pub use mesh::{
    DEFAULT_VERTEX_BUDGET, ExportSettings, ImportSettings, MeshData, MeshFrame, MeshSample,
    MeshView, NormalCalculation, SubmeshSample, TopologyVariance,
};
pub use schema::{Schema, SchemaId, SchemaKind};
pub use store::{MemoryStage, Time, TimeRange};

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
