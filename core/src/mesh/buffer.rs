//! Two-slot sample buffer.

use std::sync::Arc;

/// Two sample slots and the index of the one readers see.
///
/// Each update writes one slot and makes it the front. With double
/// buffering enabled successive updates alternate slots, so the previous
/// front stays intact for one more update. Slots are reference counted:
/// writing a slot that a [`snapshot`](Self::snapshot) still holds clones it
/// first, so a snapshot never changes.
#[derive(Debug, Clone)]
pub struct DoubleBuffer<T> {
    slots: [Arc<T>; 2],
    front: Option<usize>,
}

impl<T: Default> Default for DoubleBuffer<T> {
    fn default() -> Self {
        Self {
            slots: [Arc::new(T::default()), Arc::new(T::default())],
            front: None,
        }
    }
}

impl<T: Clone> DoubleBuffer<T> {
    /// Index of the front slot, `None` before the first update.
    pub fn front_index(&self) -> Option<usize> {
        self.front
    }

    /// The slot readers see.
    pub fn front(&self) -> Option<&T> {
        self.front.map(|i| &*self.slots[i])
    }

    /// A shared handle to the front slot that outlives later updates.
    pub fn snapshot(&self) -> Option<Arc<T>> {
        self.front.map(|i| Arc::clone(&self.slots[i]))
    }

    /// Slot `index` (0 or 1).
    pub fn slot(&self, index: usize) -> &T {
        &self.slots[index]
    }

    /// Select the slot for the next update and make it the front.
    ///
    /// The first update always uses slot 0. Later updates alternate when
    /// `double_buffering` is set, otherwise they reuse slot 0.
    pub fn advance(&mut self, double_buffering: bool) -> usize {
        let next = match self.front {
            Some(current) if double_buffering => 1 - current,
            _ => 0,
        };
        self.front = Some(next);
        next
    }

    /// Mutable front slot together with the other slot.
    pub fn front_mut_with_back(&mut self) -> Option<(&mut T, &T)> {
        let front = self.front?;
        let [first, second] = &mut self.slots;
        let (front_slot, back_slot) = if front == 0 {
            (first, &*second)
        } else {
            (second, &*first)
        };
        Some((Arc::make_mut(front_slot), &**back_slot))
    }

    /// Mutable front slot.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.front_mut_with_back().map(|(front, _)| front)
    }
}
