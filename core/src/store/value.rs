//! Typed attribute buffers.

use crate::math::{Vec2, Vec3, Vec4};

/// Destination buffer for [`AttributeStore::read`](super::AttributeStore::read).
///
/// Array variants are resized by the store to the stored length.
#[derive(Debug)]
pub enum ValueMut<'a> {
    Float(&'a mut f32),
    Float2(&'a mut Vec2),
    Float3(&'a mut Vec3),
    Float4(&'a mut Vec4),
    IntArray(&'a mut Vec<i32>),
    Float2Array(&'a mut Vec<Vec2>),
    Float3Array(&'a mut Vec<Vec3>),
}

/// Source buffer for [`AttributeStore::write`](super::AttributeStore::write).
#[derive(Debug, Clone, Copy)]
pub enum ValueRef<'a> {
    Float(f32),
    Float2(Vec2),
    Float3(Vec3),
    Float4(Vec4),
    IntArray(&'a [i32]),
    Float2Array(&'a [Vec2]),
    Float3Array(&'a [Vec3]),
}

/// Owned attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Float(f32),
    Float2(Vec2),
    Float3(Vec3),
    Float4(Vec4),
    IntArray(Vec<i32>),
    Float2Array(Vec<Vec2>),
    Float3Array(Vec<Vec3>),
}

impl<'a> From<&'a mut f32> for ValueMut<'a> {
    fn from(v: &'a mut f32) -> Self {
        Self::Float(v)
    }
}

impl<'a> From<&'a mut Vec2> for ValueMut<'a> {
    fn from(v: &'a mut Vec2) -> Self {
        Self::Float2(v)
    }
}

impl<'a> From<&'a mut Vec3> for ValueMut<'a> {
    fn from(v: &'a mut Vec3) -> Self {
        Self::Float3(v)
    }
}

impl<'a> From<&'a mut Vec4> for ValueMut<'a> {
    fn from(v: &'a mut Vec4) -> Self {
        Self::Float4(v)
    }
}

impl<'a> From<&'a mut Vec<i32>> for ValueMut<'a> {
    fn from(v: &'a mut Vec<i32>) -> Self {
        Self::IntArray(v)
    }
}

impl<'a> From<&'a mut Vec<Vec2>> for ValueMut<'a> {
    fn from(v: &'a mut Vec<Vec2>) -> Self {
        Self::Float2Array(v)
    }
}

impl<'a> From<&'a mut Vec<Vec3>> for ValueMut<'a> {
    fn from(v: &'a mut Vec<Vec3>) -> Self {
        Self::Float3Array(v)
    }
}

impl ValueRef<'_> {
    /// Copy into an owned value.
    pub fn to_owned_value(&self) -> AttributeValue {
        match *self {
            Self::Float(v) => AttributeValue::Float(v),
            Self::Float2(v) => AttributeValue::Float2(v),
            Self::Float3(v) => AttributeValue::Float3(v),
            Self::Float4(v) => AttributeValue::Float4(v),
            Self::IntArray(v) => AttributeValue::IntArray(v.to_vec()),
            Self::Float2Array(v) => AttributeValue::Float2Array(v.to_vec()),
            Self::Float3Array(v) => AttributeValue::Float3Array(v.to_vec()),
        }
    }
}

fn copy_slice<T: Copy>(src: &[T], dst: &mut Vec<T>) {
    dst.clear();
    dst.extend_from_slice(src);
}

fn lerp_slice<T>(a: &[T], b: &[T], w: f32, dst: &mut Vec<T>)
where
    T: Copy + std::ops::Mul<f32, Output = T> + std::ops::Add<Output = T>,
{
    dst.clear();
    dst.extend(a.iter().zip(b).map(|(&x, &y)| x * (1.0 - w) + y * w));
}

impl AttributeValue {
    /// Short type name used in log messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Float2(_) => "float2",
            Self::Float3(_) => "float3",
            Self::Float4(_) => "float4",
            Self::IntArray(_) => "int[]",
            Self::Float2Array(_) => "float2[]",
            Self::Float3Array(_) => "float3[]",
        }
    }

    /// Borrow as a source buffer.
    pub fn as_ref(&self) -> ValueRef<'_> {
        match self {
            Self::Float(v) => ValueRef::Float(*v),
            Self::Float2(v) => ValueRef::Float2(*v),
            Self::Float3(v) => ValueRef::Float3(*v),
            Self::Float4(v) => ValueRef::Float4(*v),
            Self::IntArray(v) => ValueRef::IntArray(v),
            Self::Float2Array(v) => ValueRef::Float2Array(v),
            Self::Float3Array(v) => ValueRef::Float3Array(v),
        }
    }

    /// Copy into `dst`. Returns `false` on a type mismatch.
    pub fn read_into(&self, dst: ValueMut<'_>) -> bool {
        match (self, dst) {
            (Self::Float(v), ValueMut::Float(d)) => *d = *v,
            (Self::Float2(v), ValueMut::Float2(d)) => *d = *v,
            (Self::Float3(v), ValueMut::Float3(d)) => *d = *v,
            (Self::Float4(v), ValueMut::Float4(d)) => *d = *v,
            (Self::IntArray(v), ValueMut::IntArray(d)) => copy_slice(v, d),
            (Self::Float2Array(v), ValueMut::Float2Array(d)) => copy_slice(v, d),
            (Self::Float3Array(v), ValueMut::Float3Array(d)) => copy_slice(v, d),
            _ => return false,
        }
        true
    }

    /// Write `self * (1 - w) + other * w` into `dst`.
    ///
    /// Integer arrays, arrays of differing length and mismatched types are
    /// not blended; `self` is copied instead.
    pub fn lerp_into(&self, other: &Self, w: f32, dst: ValueMut<'_>) -> bool {
        match (self, other, dst) {
            (Self::Float(a), Self::Float(b), ValueMut::Float(d)) => *d = a * (1.0 - w) + b * w,
            (Self::Float2(a), Self::Float2(b), ValueMut::Float2(d)) => *d = a.lerp(b, w),
            (Self::Float3(a), Self::Float3(b), ValueMut::Float3(d)) => *d = a.lerp(b, w),
            (Self::Float4(a), Self::Float4(b), ValueMut::Float4(d)) => *d = a.lerp(b, w),
            (Self::Float2Array(a), Self::Float2Array(b), ValueMut::Float2Array(d))
                if a.len() == b.len() =>
            {
                lerp_slice(a, b, w, d)
            }
            (Self::Float3Array(a), Self::Float3Array(b), ValueMut::Float3Array(d))
                if a.len() == b.len() =>
            {
                lerp_slice(a, b, w, d)
            }
            (_, _, dst) => return self.read_into(dst),
        }
        true
    }
}
