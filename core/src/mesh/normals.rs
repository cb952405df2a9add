//! Vertex normal synthesis.

use crate::math::Vec3;

/// Compute per-point normals from triangles into `dst`.
///
/// Every triangle adds its unnormalized face normal `(b - a) x (c - a)` to
/// each of its three corners, so larger faces weigh more. The sums are left
/// unnormalized; see [`normalize_normals`].
///
/// `indices` must be a multiple of three with every index below
/// `points.len()`.
pub fn synthesize_into(dst: &mut Vec<Vec3>, points: &[Vec3], indices: &[u32]) {
    crate::profile_function!();

    dst.clear();
    dst.resize(points.len(), Vec3::zeros());

    for tri in indices.chunks_exact(3) {
        let (ia, ib, ic) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let a = points[ia];
        let n = (points[ib] - a).cross(&(points[ic] - a));
        dst[ia] += n;
        dst[ib] += n;
        dst[ic] += n;
    }
}

/// Compute per-point normals into a new buffer.
pub fn synthesize(points: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut dst = Vec::with_capacity(points.len());
    synthesize_into(&mut dst, points, indices);
    dst
}

/// Scale every non-zero normal to unit length. Zero normals stay zero.
pub fn normalize_normals(normals: &mut [Vec3]) {
    for n in normals {
        let len = n.norm();
        if len > f32::EPSILON {
            *n /= len;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_triangle_gets_face_normal() {
        let points = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        ];
        let normals = synthesize(&points, &[0, 1, 2]);
        for n in &normals {
            assert_eq!(*n, Vec3::new(0.0, 0.0, 4.0));
        }
    }

    #[test]
    fn shared_corners_accumulate() {
        let points = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let normals = synthesize(&points, &[0, 1, 2, 0, 2, 3]);
        assert_eq!(normals[0], Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(normals[1], Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(normals[3], Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn unreferenced_points_stay_zero() {
        let points = [Vec3::zeros(), Vec3::x(), Vec3::y(), Vec3::z()];
        let mut normals = synthesize(&points, &[0, 1, 2]);
        assert_eq!(normals.len(), 4);
        assert_eq!(normals[3], Vec3::zeros());

        normalize_normals(&mut normals);
        assert!((normals[0].norm() - 1.0).abs() < 1e-6);
        assert_eq!(normals[3], Vec3::zeros());
    }
}
