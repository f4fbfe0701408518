//! Recency list: arena-backed doubly linked list in MRU-to-LRU order.
//!
//! Nodes live in a [`SlotArena`] and link to their neighbors by [`SlotId`],
//! so "pointers" are handles the arena validates on every access. The front
//! of the list is the most recently used entry, the back is the eviction
//! victim.
//!
//! ```text
//!   front (MRU)                                back (LRU)
//!      │                                           │
//!      ▼                                           ▼
//!   [id_4] ◄──► [id_0] ◄──► [id_2] ◄──► [id_1] ◄──► [id_3]
//!
//!   node links are Option<SlotId>; None marks the list boundaries
//! ```
//!
//! All structural operations are O(1):
//! - `push_front`: new node becomes MRU
//! - `move_to_front`: promote an arbitrary node on access
//! - `remove` / `pop_back`: unlink and free a node
//! - `back_id`: identify the victim without removing it
//!
//! `debug_validate_invariants()` walks the chain in debug/test builds and
//! asserts link symmetry and full coverage.

use crate::ds::slot_arena::{SlotArena, SlotId};

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Doubly linked list over a [`SlotArena`], ordered from most to least
/// recently used.
#[derive(Debug)]
pub struct RecencyList<T> {
    arena: SlotArena<Node<T>>,
    front: Option<SlotId>,
    back: Option<SlotId>,
}

impl<T> RecencyList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
            front: None,
            back: None,
        }
    }

    /// Creates an empty list with node storage for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            front: None,
            back: None,
        }
    }

    /// Number of nodes in the list.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the list has no nodes.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns `true` if `id` is a live node of this list.
    pub fn contains(&self, id: SlotId) -> bool {
        self.arena.contains(id)
    }

    /// Handle of the most recently used node.
    pub fn front_id(&self) -> Option<SlotId> {
        self.front
    }

    /// Handle of the least recently used node (the eviction victim).
    pub fn back_id(&self) -> Option<SlotId> {
        self.back
    }

    /// Returns the value at `id`, if live.
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id).map(|node| &node.value)
    }

    /// Returns a mutable reference to the value at `id`, if live.
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.arena.get_mut(id).map(|node| &mut node.value)
    }

    /// Inserts a new node at the front (MRU position) and returns its handle.
    pub fn push_front(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Node {
            value,
            prev: None,
            next: self.front,
        });
        match self.front {
            Some(old_front) => {
                if let Some(node) = self.arena.get_mut(old_front) {
                    node.prev = Some(id);
                }
            },
            None => self.back = Some(id),
        }
        self.front = Some(id);
        id
    }

    /// Promotes the node at `id` to the front.
    ///
    /// Returns `false` if `id` is dead, which callers treat as an internal
    /// defect. Promoting the node that is already at the front is a no-op.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if !self.arena.contains(id) {
            return false;
        }
        if self.front == Some(id) {
            return true;
        }
        self.detach(id);
        self.attach_front(id);
        true
    }

    /// Unlinks the node at `id` and returns its value, freeing the slot.
    ///
    /// Returns `None` for a dead handle; with a consistent index that never
    /// happens and indicates a defect, not a recoverable condition.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        self.detach(id)?;
        self.arena.remove(id).map(|node| node.value)
    }

    /// Removes and returns the least recently used value.
    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.back?;
        self.remove(id)
    }

    /// Drops every node. Previously issued handles become dead.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.front = None;
        self.back = None;
    }

    /// Iterates over values from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.front,
        }
    }

    /// Iterates over handles from most to least recently used.
    pub fn iter_ids(&self) -> IterIds<'_, T> {
        IterIds {
            list: self,
            current: self.front,
        }
    }

    /// Iterates over `(SlotId, &T)` pairs from most to least recently used.
    pub fn iter_entries(&self) -> IterEntries<'_, T> {
        IterEntries {
            list: self,
            current: self.front,
        }
    }

    /// Unlinks `id` from its neighbors without freeing the slot.
    fn detach(&mut self, id: SlotId) -> Option<()> {
        let (prev, next) = {
            let node = self.arena.get(id)?;
            (node.prev, node.next)
        };

        match prev {
            Some(prev_id) => {
                if let Some(prev_node) = self.arena.get_mut(prev_id) {
                    prev_node.next = next;
                }
            },
            None => self.front = next,
        }

        match next {
            Some(next_id) => {
                if let Some(next_node) = self.arena.get_mut(next_id) {
                    next_node.prev = prev;
                }
            },
            None => self.back = prev,
        }

        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = None;
        }

        Some(())
    }

    /// Links an already-detached node in at the front.
    fn attach_front(&mut self, id: SlotId) {
        let old_front = self.front;
        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = old_front;
        } else {
            return;
        }
        match old_front {
            Some(old_id) => {
                if let Some(old_node) = self.arena.get_mut(old_id) {
                    old_node.prev = Some(id);
                }
            },
            None => self.back = Some(id),
        }
        self.front = Some(id);
    }

    /// Asserts that the chain from the front covers every live node exactly
    /// once, with symmetric links and correct boundary handles.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if self.front.is_none() || self.back.is_none() {
            assert!(self.front.is_none());
            assert!(self.back.is_none());
            assert_eq!(self.len(), 0);
            return;
        }

        let mut count = 0usize;
        let mut prev = None;
        let mut current = self.front;

        while let Some(id) = current {
            let node = self.arena.get(id).expect("chain reached a dead slot");
            assert_eq!(node.prev, prev, "asymmetric prev link");
            if node.next.is_none() {
                assert_eq!(self.back, Some(id), "back handle not at chain end");
            }
            prev = Some(id);
            current = node.next;
            count += 1;
            assert!(count <= self.len(), "cycle in recency chain");
        }

        assert_eq!(count, self.len());
    }
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over values, front to back.
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = node.next;
        Some(&node.value)
    }
}

/// Iterator over handles, front to back.
pub struct IterIds<'a, T> {
    list: &'a RecencyList<T>,
    current: Option<SlotId>,
}

impl<T> Iterator for IterIds<'_, T> {
    type Item = SlotId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = node.next;
        Some(id)
    }
}

/// Iterator over `(SlotId, &T)` pairs, front to back.
pub struct IterEntries<'a, T> {
    list: &'a RecencyList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for IterEntries<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = node.next;
        Some((id, &node.value))
    }
}
