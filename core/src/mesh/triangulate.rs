//! Fan triangulation of polygon faces.
//!
//! A face with `k` corners produces `k - 2` triangles, all sharing the face's
//! first corner: triangle `j` uses corners `(0, j + 1, j + 2)`, or
//! `(0, j + 2, j + 1)` when winding is swapped.

use crate::error::MeshError;

/// Index counts of a face list, computed before triangulating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexCounts {
    /// Total face corners, `sum(counts)` over non-negative counts.
    pub num_indices: usize,
    /// Indices after triangulation, `3 * sum(max(k - 2, 0))`.
    pub num_indices_triangulated: usize,
    /// Faces with fewer than three corners.
    pub degenerate_faces: usize,
}

/// Count corners and triangulated indices of `counts`.
pub fn count_indices(counts: &[i32]) -> IndexCounts {
    let mut result = IndexCounts::default();
    for &k in counts {
        let k = k.max(0) as usize;
        result.num_indices += k;
        if k >= 3 {
            result.num_indices_triangulated += (k - 2) * 3;
        } else {
            result.degenerate_faces += 1;
        }
    }
    result
}

/// Triangulate faces into `dst`, replacing its contents.
///
/// With `indices == None` the corner positions themselves are emitted, which
/// maps every triangulated corner back to its face corner.
///
/// Faces with fewer than three corners are skipped. Triangulation stops at
/// the first face that runs past the end of `indices`. Both are reported in
/// the returned list.
pub fn triangulate_into(
    dst: &mut Vec<u32>,
    counts: &[i32],
    indices: Option<&[i32]>,
    swap_winding: bool,
) -> Vec<MeshError> {
    let totals = count_indices(counts);
    let available = indices.map_or(usize::MAX, <[i32]>::len);
    let mut issues = Vec::new();

    dst.clear();
    dst.reserve(totals.num_indices_triangulated);

    let mut offset = 0usize;
    for (face, &k) in counts.iter().enumerate() {
        if k < 3 {
            log::debug!("skipping face {face} with {k} corners");
            issues.push(MeshError::DegenerateFace { face, count: k });
            offset += k.max(0) as usize;
            continue;
        }
        let k = k as usize;
        if offset + k > available {
            issues.push(MeshError::TopologyMismatch {
                expected: totals.num_indices,
                actual: available,
            });
            break;
        }

        let corner = |c: usize| match indices {
            Some(indices) => indices[offset + c] as u32,
            None => (offset + c) as u32,
        };
        let first = corner(0);
        for j in 0..k - 2 {
            let (b, c) = if swap_winding {
                (j + 2, j + 1)
            } else {
                (j + 1, j + 2)
            };
            dst.extend_from_slice(&[first, corner(b), corner(c)]);
        }
        offset += k;
    }

    if totals.degenerate_faces > 0 {
        log::warn!(
            "skipped {} degenerate faces out of {}",
            totals.degenerate_faces,
            counts.len()
        );
    }
    if let Some(mismatch) = issues
        .iter()
        .find(|e| matches!(e, MeshError::TopologyMismatch { .. }))
    {
        log::warn!("{mismatch}");
    }
    issues
}

/// Triangulate faces into a new buffer, logging any issues.
pub fn triangulate(counts: &[i32], indices: Option<&[i32]>, swap_winding: bool) -> Vec<u32> {
    let mut dst = Vec::new();
    triangulate_into(&mut dst, counts, indices, swap_winding);
    dst
}

/// Drop every triangle that references a point index `>= num_points`.
///
/// Returns the first offending index, if any.
pub fn retain_valid_triangles(indices: &mut Vec<u32>, num_points: usize) -> Option<MeshError> {
    let first_bad = indices
        .iter()
        .copied()
        .find(|&i| i as usize >= num_points)?;

    let mut write = 0;
    for read in (0..indices.len() / 3).map(|t| t * 3) {
        let tri = [indices[read], indices[read + 1], indices[read + 2]];
        if tri.iter().all(|&i| (i as usize) < num_points) {
            indices[write..write + 3].copy_from_slice(&tri);
            write += 3;
        }
    }
    indices.truncate(write);

    let error = MeshError::IndexOutOfRange {
        index: first_bad,
        num_points,
    };
    log::warn!("{error}, dropping affected triangles");
    Some(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_fan() {
        let counts = [4];
        let indices = [0, 1, 2, 3];
        assert_eq!(triangulate(&counts, Some(&indices), false), vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(triangulate(&counts, Some(&indices), true), vec![0, 2, 1, 0, 3, 2]);
    }

    #[test]
    fn corner_positions_without_indices() {
        let counts = [3, 4];
        assert_eq!(
            triangulate(&counts, None, false),
            vec![0, 1, 2, 3, 4, 5, 3, 5, 6]
        );
    }

    #[test]
    fn counts_for_mixed_faces() {
        let c = count_indices(&[3, 4, 5, 2, -1]);
        assert_eq!(c.num_indices, 14);
        assert_eq!(c.num_indices_triangulated, 3 + 6 + 9);
        assert_eq!(c.degenerate_faces, 2);
    }

    #[test]
    fn degenerate_faces_are_skipped() {
        let counts = [2, 3];
        let indices = [7, 8, 0, 1, 2];
        let mut out = Vec::new();
        let issues = triangulate_into(&mut out, &counts, Some(&indices), false);
        assert_eq!(out, vec![0, 1, 2]);
        assert_eq!(issues, vec![MeshError::DegenerateFace { face: 0, count: 2 }]);
    }

    #[test]
    fn short_indices_stop_triangulation() {
        let counts = [3, 3];
        let indices = [0, 1, 2, 3];
        let mut out = Vec::new();
        let issues = triangulate_into(&mut out, &counts, Some(&indices), false);
        assert_eq!(out, vec![0, 1, 2]);
        assert_eq!(
            issues,
            vec![MeshError::TopologyMismatch {
                expected: 6,
                actual: 4
            }]
        );
    }

    #[test]
    fn out_of_range_triangles_dropped() {
        let mut indices = vec![0, 1, 2, 0, 2, 9, 1, 2, 3];
        let err = retain_valid_triangles(&mut indices, 4);
        assert_eq!(
            err,
            Some(MeshError::IndexOutOfRange {
                index: 9,
                num_points: 4
            })
        );
        assert_eq!(indices, vec![0, 1, 2, 1, 2, 3]);
        assert_eq!(retain_valid_triangles(&mut indices, 4), None);
    }
}
