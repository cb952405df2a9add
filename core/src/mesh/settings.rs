//! Import and export settings.

use crate::store::Interpolation;

/// Default maximum number of vertices per submesh.
///
/// Fits 16-bit index buffers with headroom for a trailing triangle.
pub const DEFAULT_VERTEX_BUDGET: usize = 64998;

/// When vertex normals are computed instead of read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum NormalCalculation {
    /// Never compute; absent normals are zero-filled.
    Never,
    /// Compute only when the source has no normals.
    #[default]
    WhenMissing,
    /// Always compute, ignoring source normals.
    Always,
}

/// How a mesh's topology changes over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum TopologyVariance {
    /// Nothing varies.
    #[default]
    Constant,
    /// Point positions vary; counts and indices do not.
    Homogeneous,
    /// Counts or indices vary.
    Heterogeneous,
}

/// Settings applied when reading samples from the attribute store.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct ImportSettings {
    /// Uniform scale applied to points and velocities.
    pub scale: f32,
    /// Negate X of points, velocities and normals.
    pub swap_handedness: bool,
    /// Reverse triangle winding.
    pub swap_faces: bool,
    /// Produce triangulated indices.
    pub triangulate: bool,
    pub normal_calculation: NormalCalculation,
    /// Alternate between two sample slots on successive updates.
    pub double_buffering: bool,
    /// Split meshes over [`vertex_budget`](Self::vertex_budget) into submeshes.
    pub split_mesh: bool,
    /// Most vertices per submesh. Splitting rounds it down to a multiple of
    /// three, so a budget of 10 yields submeshes of 9 vertices.
    pub vertex_budget: usize,
    /// Resolution of reads between authored time samples.
    pub interpolation: Interpolation,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            swap_handedness: true,
            swap_faces: true,
            triangulate: true,
            normal_calculation: NormalCalculation::WhenMissing,
            double_buffering: false,
            split_mesh: true,
            vertex_budget: DEFAULT_VERTEX_BUDGET,
            interpolation: Interpolation::Linear,
        }
    }
}

impl ImportSettings {
    /// Settings that leave the source data untouched: no scaling, no
    /// handedness or winding change, no splitting.
    pub fn passthrough() -> Self {
        Self {
            swap_handedness: false,
            swap_faces: false,
            split_mesh: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn with_swap_handedness(mut self, swap: bool) -> Self {
        self.swap_handedness = swap;
        self
    }

    #[must_use]
    pub fn with_swap_faces(mut self, swap: bool) -> Self {
        self.swap_faces = swap;
        self
    }

    #[must_use]
    pub fn with_triangulate(mut self, triangulate: bool) -> Self {
        self.triangulate = triangulate;
        self
    }

    #[must_use]
    pub fn with_normal_calculation(mut self, calculation: NormalCalculation) -> Self {
        self.normal_calculation = calculation;
        self
    }

    #[must_use]
    pub fn with_double_buffering(mut self, enabled: bool) -> Self {
        self.double_buffering = enabled;
        self
    }

    #[must_use]
    pub fn with_split_mesh(mut self, split: bool) -> Self {
        self.split_mesh = split;
        self
    }

    /// Set the submesh vertex budget. Values below 3 are raised to 3.
    #[must_use]
    pub fn with_vertex_budget(mut self, budget: usize) -> Self {
        self.vertex_budget = budget.max(3);
        self
    }

    #[must_use]
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }
}

/// Settings applied when writing samples to the attribute store.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct ExportSettings {
    /// Uniform scale applied to points and velocities.
    pub scale: f32,
    /// Negate X of points, velocities and normals.
    pub swap_handedness: bool,
    /// Reverse the corner order of every face.
    pub swap_faces: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            swap_handedness: true,
            swap_faces: true,
        }
    }
}

impl ExportSettings {
    /// Settings that write the data unchanged.
    pub fn passthrough() -> Self {
        Self {
            scale: 1.0,
            swap_handedness: false,
            swap_faces: false,
        }
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn with_swap_handedness(mut self, swap: bool) -> Self {
        self.swap_handedness = swap;
        self
    }

    #[must_use]
    pub fn with_swap_faces(mut self, swap: bool) -> Self {
        self.swap_faces = swap;
        self
    }
}
