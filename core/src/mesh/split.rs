//! Splitting of large meshes into budget-sized submeshes.
//!
//! Submeshes are built from the triangle list: every triangulated corner
//! becomes one submesh vertex, so submesh `n` covers triangulated indices
//! `[n * budget, min((n + 1) * budget, total))` and indexes them `0..size`.

use crate::math::Bounds;
use crate::mesh::sample::{MeshSample, SubmeshSample};
use crate::mesh::triangulate::{count_indices, triangulate};

/// How a vertex attribute array relates to the mesh topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// One value per point, addressed through the triangulated indices.
    PerPoint,
    /// One value per face corner, addressed through the corner map.
    PerCorner,
    /// One value per triangulated corner.
    PerTriangleCorner,
    /// Absent or not matching any topology size.
    Unusable,
}

struct Shape {
    num_points: usize,
    num_corners: usize,
    num_triangulated: usize,
}

impl Shape {
    fn of(sample: &MeshSample) -> Self {
        Self {
            num_points: sample.points.len(),
            num_corners: count_indices(&sample.counts).num_indices,
            num_triangulated: sample.indices_triangulated.len(),
        }
    }

    fn layout(&self, len: usize) -> Layout {
        if len == 0 {
            Layout::Unusable
        } else if len == self.num_points {
            Layout::PerPoint
        } else if len == self.num_triangulated {
            Layout::PerTriangleCorner
        } else if len == self.num_corners {
            Layout::PerCorner
        } else {
            Layout::Unusable
        }
    }

    fn is_expanded(&self, len: usize) -> bool {
        matches!(
            self.layout(len),
            Layout::PerCorner | Layout::PerTriangleCorner
        )
    }
}

/// Largest multiple of three not above `budget`, at least 3.
fn effective_budget(budget: usize) -> usize {
    (budget - budget % 3).max(3)
}

/// Whether `sample` must be split to fit `budget` vertices per submesh.
///
/// True when the mesh has more points than the budget, or when its points,
/// normals or UVs are stored per corner instead of per point.
pub fn needs_split(sample: &MeshSample, budget: usize) -> bool {
    if sample.indices_triangulated.is_empty() {
        return false;
    }
    let shape = Shape::of(sample);
    sample.points.len() > budget
        || sample.points.len() == shape.num_triangulated
        || shape.is_expanded(sample.normals.len())
        || shape.is_expanded(sample.uvs.len())
}

/// Number of submeshes [`split_into`] produces for `num_triangulated` indices.
pub fn submesh_count(num_triangulated: usize, budget: usize) -> usize {
    num_triangulated.div_ceil(effective_budget(budget))
}

/// Split `sample` into submeshes of at most `budget` vertices, reusing the
/// buffers already in `dst`.
///
/// `swap_winding` must match the setting `sample` was triangulated with so
/// per-corner attributes follow the same triangle corners.
pub fn split_into(
    dst: &mut Vec<SubmeshSample>,
    sample: &MeshSample,
    budget: usize,
    swap_winding: bool,
) {
    crate::profile_function!();

    let budget = effective_budget(budget);
    let triangulated = &sample.indices_triangulated;
    let total = triangulated.len();
    let shape = Shape::of(sample);

    let normals_layout = shape.layout(sample.normals.len());
    let uvs_layout = shape.layout(sample.uvs.len());
    for (name, len, layout) in [
        ("normals", sample.normals.len(), normals_layout),
        ("uvs", sample.uvs.len(), uvs_layout),
    ] {
        if len > 0 && layout == Layout::Unusable {
            log::warn!(
                "{name} has {len} values, matching neither {} points, {} corners nor {} triangulated corners; dropped from submeshes",
                shape.num_points,
                shape.num_corners,
                shape.num_triangulated
            );
        }
    }

    let corner_map = if normals_layout == Layout::PerCorner || uvs_layout == Layout::PerCorner {
        let map = triangulate(&sample.counts, None, swap_winding);
        (map.len() == total).then_some(map)
    } else {
        None
    };

    let count = submesh_count(total, budget);
    dst.truncate(count);
    dst.resize_with(count, SubmeshSample::default);

    for (n, submesh) in dst.iter_mut().enumerate() {
        let begin = n * budget;
        let end = ((n + 1) * budget).min(total);
        let range = &triangulated[begin..end];

        gather(&mut submesh.points, &sample.points, Layout::PerPoint, range, begin, None);
        gather(
            &mut submesh.normals,
            &sample.normals,
            normals_layout,
            range,
            begin,
            corner_map.as_deref(),
        );
        gather(
            &mut submesh.uvs,
            &sample.uvs,
            uvs_layout,
            range,
            begin,
            corner_map.as_deref(),
        );

        submesh.indices.clear();
        submesh.indices.extend(0..range.len() as u32);
        submesh.bounds = Bounds::from_points(&submesh.points);
    }

    log::debug!(
        "split {} triangulated indices into {count} submeshes",
        total
    );
}

/// Split `sample` into new submeshes.
pub fn split(sample: &MeshSample, budget: usize, swap_winding: bool) -> Vec<SubmeshSample> {
    let mut dst = Vec::new();
    split_into(&mut dst, sample, budget, swap_winding);
    dst
}

fn gather<T: Copy>(
    dst: &mut Vec<T>,
    src: &[T],
    layout: Layout,
    range: &[u32],
    begin: usize,
    corner_map: Option<&[u32]>,
) {
    dst.clear();
    match layout {
        Layout::PerPoint => dst.extend(range.iter().map(|&i| src[i as usize])),
        Layout::PerTriangleCorner => dst.extend_from_slice(&src[begin..begin + range.len()]),
        Layout::PerCorner => {
            if let Some(map) = corner_map {
                dst.extend(
                    map[begin..begin + range.len()]
                        .iter()
                        .map(|&c| src[c as usize]),
                );
            }
        }
        Layout::Unusable => {}
    }
}

/// Total vertex count over all submeshes.
pub fn total_points(submeshes: &[SubmeshSample]) -> usize {
    submeshes.iter().map(|s| s.points.len()).sum()
}
