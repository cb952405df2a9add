//! Math type aliases and geometry helpers.
//!
//! Sample buffers store `nalgebra` vectors directly. The helpers here are the
//! small set of bulk operations the sampling pipeline applies to whole arrays:
//! handedness conversion, uniform scaling and bounds.

pub use nalgebra;

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// 4D vector (f32).
pub type Vec4 = nalgebra::Vector4<f32>;

/// Quaternion (f32). Stored as `[x, y, z, w]` in memory.
/// Use [`quat_from_xyzw`] or `Quaternion::new(w, x, y, z)` to construct.
pub type Quat = nalgebra::Quaternion<f32>;

/// Create a quaternion from x, y, z, w components.
pub fn quat_from_xyzw(x: f32, y: f32, z: f32, w: f32) -> Quat {
    nalgebra::Quaternion::new(w, x, y, z)
}

/// Convert a quaternion to a `[x, y, z, w]` array.
pub fn quat_to_array(q: Quat) -> [f32; 4] {
    [q.coords.x, q.coords.y, q.coords.z, q.coords.w]
}

/// Negate the X component of every vector.
///
/// Converts between right-handed and left-handed conventions. Applying it
/// twice restores the input bit-for-bit.
pub fn invert_x(values: &mut [Vec3]) {
    for v in values {
        v.x = -v.x;
    }
}

/// Mirror a rotation across the YZ plane.
///
/// Companion of [`invert_x`] for orientations: keeps `x` and `w`, negates
/// `y` and `z`.
pub fn invert_x_rotation(q: Quat) -> Quat {
    quat_from_xyzw(q.coords.x, -q.coords.y, -q.coords.z, q.coords.w)
}

/// Multiply every vector by `factor`.
pub fn scale(values: &mut [Vec3], factor: f32) {
    for v in values {
        *v *= factor;
    }
}

/// Axis-aligned bounds of a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Component-wise minimum.
    pub min: Vec3,
    /// Component-wise maximum.
    pub max: Vec3,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: Vec3::zeros(),
            max: Vec3::zeros(),
        }
    }
}

impl Bounds {
    /// Compute bounds of `points`. Empty input yields zero bounds.
    pub fn from_points(points: &[Vec3]) -> Self {
        let Some((first, rest)) = points.split_first() else {
            return Self::default();
        };
        let mut min = *first;
        let mut max = *first;
        for p in rest {
            min = min.inf(p);
            max = max.sup(p);
        }
        Self { min, max }
    }

    /// Center of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half-size of the box along each axis.
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invert_x_is_self_inverse() {
        let original = vec![
            Vec3::new(1.5, -2.0, 3.25),
            Vec3::new(-0.0, 0.0, 1e-30),
            Vec3::new(f32::MAX, f32::MIN_POSITIVE, -7.0),
        ];
        let mut values = original.clone();
        invert_x(&mut values);
        assert_eq!(values[0], Vec3::new(-1.5, -2.0, 3.25));
        invert_x(&mut values);
        for (a, b) in values.iter().zip(original.iter()) {
            assert_eq!(a.x.to_bits(), b.x.to_bits());
            assert_eq!(a.y.to_bits(), b.y.to_bits());
            assert_eq!(a.z.to_bits(), b.z.to_bits());
        }
    }

    #[test]
    fn scale_multiplies_all_components() {
        let mut values = vec![Vec3::new(1.0, 2.0, 3.0)];
        scale(&mut values, 0.5);
        assert_eq!(values[0], Vec3::new(0.5, 1.0, 1.5));
    }

    #[test]
    fn rotation_mirror_roundtrip() {
        let q = quat_from_xyzw(0.1, 0.2, 0.3, 0.9);
        let mirrored = invert_x_rotation(q);
        assert_eq!(quat_to_array(mirrored), [0.1, -0.2, -0.3, 0.9]);
        assert_eq!(quat_to_array(invert_x_rotation(mirrored)), quat_to_array(q));
    }

    #[test]
    fn bounds_of_points() {
        let b = Bounds::from_points(&[
            Vec3::new(-1.0, 0.0, 2.0),
            Vec3::new(3.0, -4.0, 0.0),
            Vec3::new(0.0, 2.0, 1.0),
        ]);
        assert_eq!(b.min, Vec3::new(-1.0, -4.0, 0.0));
        assert_eq!(b.max, Vec3::new(3.0, 2.0, 2.0));
        assert_eq!(b.center(), Vec3::new(1.0, -1.0, 1.0));
        assert_eq!(b.extents(), Vec3::new(2.0, 3.0, 1.0));
    }

    #[test]
    fn bounds_of_empty_is_zero() {
        let b = Bounds::from_points(&[]);
        assert_eq!(b, Bounds::default());
        assert_eq!(b.center(), Vec3::zeros());
    }
}
