//! Attribute store collaborator.
//!
//! The sampling core never owns attribute storage. Every entity talks to its
//! storage through [`AttributeStore`], which reads a named attribute at a time
//! into a caller-provided buffer and writes a buffer back.
//!
//! - [`AttributeStore`]: the collaborator trait
//! - [`ValueMut`] / [`ValueRef`]: typed destination and source buffers
//! - [`AttributeValue`]: an owned value, used by stores that keep data in memory
//! - [`MemoryStage`] / [`MemoryPrim`]: in-memory store shared between entities

mod memory;
mod value;

use crate::mesh::ImportSettings;

pub use memory::{Interpolation, MemoryPrim, MemoryStage};
pub use value::{AttributeValue, ValueMut, ValueRef};

/// Sample time, in the document's time codes.
pub type Time = f64;

/// Time used to address the non-animated ("default") value of an attribute.
pub const DEFAULT_TIME: Time = f64::NAN;

/// First and last sample time of an entity's attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeRange {
    /// Earliest sample time.
    pub start: Time,
    /// Latest sample time.
    pub end: Time,
}

impl TimeRange {
    /// Create a range. `start` and `end` are swapped if given out of order.
    pub fn new(start: Time, end: Time) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Smallest range covering both `self` and `other`.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Storage for the named, typed, time-sampled attributes of one entity.
///
/// Implementations must be `Send + Sync`: entities are updated on worker
/// threads.
pub trait AttributeStore: Send + Sync {
    /// Read attribute `name` at time `t` into `dst`.
    ///
    /// Returns `false` when the attribute is absent, has no value at `t`, or
    /// holds a different type than `dst`. `dst` is left untouched in that case.
    fn read(&self, name: &str, t: Time, dst: ValueMut<'_>) -> bool;

    /// Write `src` as attribute `name` at time `t`, creating the attribute if
    /// needed. Returns `false` if the store refuses the write.
    fn write(&mut self, name: &str, src: ValueRef<'_>, t: Time) -> bool;

    /// Whether attribute `name` holds any value (default or time samples).
    fn has_value(&self, name: &str) -> bool;

    /// Whether attribute `name` may change over time.
    fn might_vary_over_time(&self, name: &str) -> bool;

    /// Range covered by all time samples of this entity, `None` if nothing is
    /// time-sampled.
    fn time_range(&self) -> Option<TimeRange>;

    /// Called when the context's import settings change.
    fn apply_import_settings(&mut self, _settings: &ImportSettings) {}
}

/// Clear `dst` and read array attribute `name` into it.
///
/// A missing value leaves `dst` empty, which is how optional attributes are
/// represented in samples.
pub(crate) fn read_array<T>(
    store: &dyn AttributeStore,
    name: &str,
    t: Time,
    dst: &mut Vec<T>,
) -> bool
where
    for<'a> ValueMut<'a>: From<&'a mut Vec<T>>,
{
    let found = store.read(name, t, ValueMut::from(&mut *dst));
    if !found {
        dst.clear();
        log::trace!(
            "{}",
            crate::MeshError::MissingSource {
                attribute: name.to_string(),
                time: t,
            }
        );
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_range_orders_bounds() {
        let r = TimeRange::new(4.0, 1.0);
        assert_eq!(r.start, 1.0);
        assert_eq!(r.end, 4.0);
    }

    #[test]
    fn time_range_union() {
        let r = TimeRange::new(0.0, 2.0).union(TimeRange::new(1.0, 5.0));
        assert_eq!(r, TimeRange::new(0.0, 5.0));
    }
}
