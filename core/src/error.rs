//! Error types for mesh sampling.
//!
//! Most variants describe non-fatal data issues. The pipeline logs them,
//! records them in [`Mesh::issues`](crate::schema::Mesh::issues) and keeps
//! going. Only [`MeshError::NoSample`], [`MeshError::WriteRejected`],
//! [`MeshError::UnknownSchema`] and [`MeshError::KindMismatch`] are returned
//! as `Err` from public operations.

use thiserror::Error;

use crate::schema::{SchemaId, SchemaKind};
use crate::store::Time;

/// Errors and data issues produced while sampling or authoring meshes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// An optional attribute has no value at the requested time.
    #[error("attribute `{attribute}` has no value at time {time}")]
    MissingSource { attribute: String, time: Time },

    /// A face with fewer than three corners was skipped during triangulation.
    #[error("face {face} has {count} corners and was skipped")]
    DegenerateFace { face: usize, count: i32 },

    /// The face corner counts reference more indices than exist.
    #[error("face counts reference {expected} indices but only {actual} are present")]
    TopologyMismatch { expected: usize, actual: usize },

    /// A triangulated index points past the end of the point array.
    #[error("triangulated index {index} is out of range for {num_points} points")]
    IndexOutOfRange { index: u32, num_points: usize },

    /// The mesh has no points at the requested time.
    #[error("no sample at time {time}")]
    NoSample { time: Time },

    /// The mesh exceeds the vertex budget but splitting is disabled.
    #[error("{num_points} points exceed the vertex budget of {budget} and splitting is disabled")]
    BudgetExceeded { num_points: usize, budget: usize },

    /// The attribute store refused a write.
    #[error("attribute store rejected write of `{attribute}` at time {time}")]
    WriteRejected { attribute: String, time: Time },

    /// No entity with the given id exists in the context.
    #[error("unknown schema {0:?}")]
    UnknownSchema(SchemaId),

    /// The entity exists but is of a different kind.
    #[error("schema {id:?} is a {actual:?}, expected {expected:?}")]
    KindMismatch {
        id: SchemaId,
        expected: SchemaKind,
        actual: SchemaKind,
    },
}

/// Convenience alias for `Result<T, MeshError>`.
pub type MeshResult<T> = Result<T, MeshError>;
