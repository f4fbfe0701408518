//! Slot arena: stable-handle storage for cache entries.
//!
//! A `SlotArena<T>` is a `Vec` of optional slots plus a free list. Inserting
//! returns a [`SlotId`] that stays valid until that exact slot is removed,
//! which lets the recency list link entries by handle instead of by pointer.
//! Removing an entry pushes its slot onto the free list; the next insert
//! reuses it, so a cache that churns at capacity never grows past its
//! high-water mark.

/// Opaque, stable handle to a slot in a [`SlotArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    /// Returns the raw slot index (diagnostics only).
    pub fn index(self) -> usize {
        self.0
    }
}

/// Fixed-purpose arena allocator with slot reuse.
///
/// All operations are O(1) except [`iter`](SlotArena::iter) and
/// [`clear`](SlotArena::clear).
#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Option<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Creates an empty arena with room for `capacity` live slots.
    ///
    /// A cache that pre-sizes the arena to its entry capacity performs no
    /// slot allocations after warm-up.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::with_capacity(capacity),
            len: 0,
        }
    }

    /// Stores `value` and returns its handle, reusing a freed slot if one
    /// is available.
    pub fn insert(&mut self, value: T) -> SlotId {
        let idx = match self.free.pop() {
            Some(idx) => {
                debug_assert!(self.slots[idx].is_none(), "free list held a live slot");
                self.slots[idx] = Some(value);
                idx
            },
            None => {
                self.slots.push(Some(value));
                self.slots.len() - 1
            },
        };
        self.len += 1;
        SlotId(idx)
    }

    /// Removes and returns the value at `id`, returning its slot to the
    /// free list. Returns `None` if the slot is already vacant.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let value = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        self.len -= 1;
        Some(value)
    }

    /// Returns a reference to the value at `id`, if the slot is live.
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0)?.as_ref()
    }

    /// Returns a mutable reference to the value at `id`, if the slot is live.
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0)?.as_mut()
    }

    /// Returns `true` if `id` refers to a live slot.
    pub fn contains(&self, id: SlotId) -> bool {
        matches!(self.slots.get(id.0), Some(Some(_)))
    }

    /// Number of live slots.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no slot is live.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every value and resets the arena. Previously issued handles
    /// become dead.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }

    /// Iterates over live slots in index order (not recency order).
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|value| (SlotId(idx), value)))
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_get_round_trips() {
        let mut arena = SlotArena::new();
        let a = arena.insert(1);
        let b = arena.insert(2);
        assert_eq!(arena.get(a), Some(&1));
        assert_eq!(arena.get(b), Some(&2));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn removed_slot_is_reused_by_next_insert() {
        let mut arena = SlotArena::new();
        let a = arena.insert("a");
        let _b = arena.insert("b");
        assert_eq!(arena.remove(a), Some("a"));

        let c = arena.insert("c");
        assert_eq!(c.index(), a.index());
        assert_eq!(arena.get(c), Some(&"c"));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn dead_handle_reads_as_vacant() {
        let mut arena = SlotArena::new();
        let a = arena.insert(10);
        arena.remove(a);

        assert!(!arena.contains(a));
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.remove(a), None);
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut arena = SlotArena::new();
        let a = arena.insert(5);
        *arena.get_mut(a).unwrap() = 6;
        assert_eq!(arena.get(a), Some(&6));
    }

    #[test]
    fn clear_invalidates_all_handles() {
        let mut arena = SlotArena::new();
        let a = arena.insert(1);
        let b = arena.insert(2);
        arena.clear();

        assert!(arena.is_empty());
        assert!(!arena.contains(a));
        assert!(!arena.contains(b));
    }

    #[test]
    fn iter_visits_only_live_slots() {
        let mut arena = SlotArena::new();
        let a = arena.insert(1);
        let b = arena.insert(2);
        let c = arena.insert(3);
        arena.remove(b);

        let live: Vec<_> = arena.iter().map(|(id, v)| (id, *v)).collect();
        assert_eq!(live, vec![(a, 1), (c, 3)]);
    }

    #[test]
    fn churn_at_fixed_size_does_not_grow_slot_vec() {
        let mut arena = SlotArena::with_capacity(4);
        let mut ids: Vec<_> = (0..4).map(|i| arena.insert(i)).collect();
        for round in 0..100 {
            let victim = ids.remove(0);
            arena.remove(victim);
            ids.push(arena.insert(round));
        }
        assert_eq!(arena.len(), 4);
        // Every insert after warm-up recycled a freed slot.
        assert!(ids.iter().all(|id| id.index() < 4));
    }
}
