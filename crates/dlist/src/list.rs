//! Doubly linked list backed by a slab of slots
//!
//! Orientation: `next` points toward the tail, `prev` toward the head.
//! `push` creates a new head whose `next` is the old head.

use std::fmt;

use crate::handle::{next_list_id, NodeHandle};
use crate::iter::{IntoIter, Iter};

/// One slot of the slab. `value` is `None` while the slot sits on the free list.
#[derive(Clone)]
pub(crate) struct Slot<T> {
    pub(crate) value: Option<T>,
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
    generation: u32,
}

/// Doubly linked list with O(1) head/tail operations and O(1) removal of any
/// node through its [`NodeHandle`].
pub struct DoublyLinkedList<T> {
    id: u64,
    pub(crate) slots: Vec<Slot<T>>,
    free_list: Vec<usize>,
    pub(crate) head: Option<usize>,
    pub(crate) tail: Option<usize>,
    len: usize,
}

impl<T> DoublyLinkedList<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self {
            id: next_list_id(),
            slots: Vec::new(),
            free_list: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Create an empty list with room for `capacity` nodes before reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Number of nodes in the list
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Check if the list holds exactly one node (head and tail coincide)
    pub fn has_solo_item(&self) -> bool {
        self.head.is_some() && self.head == self.tail
    }

    /// Value at the head, if any
    pub fn peek(&self) -> Option<&T> {
        self.head.and_then(|idx| self.slots[idx].value.as_ref())
    }

    /// Value at the tail, if any
    pub fn peek_last(&self) -> Option<&T> {
        self.tail.and_then(|idx| self.slots[idx].value.as_ref())
    }

    /// Insert a value at the head
    ///
    /// # Returns
    /// * `NodeHandle` - Handle for removing or moving this node later in O(1)
    pub fn push(&mut self, value: T) -> NodeHandle {
        let idx = self.alloc(value);
        self.link_front(idx);
        self.len += 1;
        self.handle(idx)
    }

    /// Insert a value at the tail
    ///
    /// # Returns
    /// * `NodeHandle` - Handle for removing or moving this node later in O(1)
    pub fn append(&mut self, value: T) -> NodeHandle {
        let idx = self.alloc(value);
        self.link_back(idx);
        self.len += 1;
        self.handle(idx)
    }

    /// Remove and return the head value, `None` if the list is empty
    pub fn pop(&mut self) -> Option<T> {
        let idx = self.head?;
        self.release(idx)
    }

    /// Remove and return the tail value, `None` if the list is empty
    pub fn pop_last(&mut self) -> Option<T> {
        let idx = self.tail?;
        self.release(idx)
    }

    /// Remove the node behind `handle` wherever it sits
    ///
    /// Returns `None` if the handle is stale or was issued by another list.
    pub fn eject(&mut self, handle: NodeHandle) -> Option<T> {
        let idx = self.resolve(handle)?;
        self.release(idx)
    }

    /// Relink the node behind `handle` at the head. The handle stays valid.
    ///
    /// Returns `false` if the handle does not resolve.
    pub fn move_to_front(&mut self, handle: NodeHandle) -> bool {
        let Some(idx) = self.resolve(handle) else {
            return false;
        };
        if self.head != Some(idx) {
            self.unlink(idx);
            self.link_front(idx);
        }
        true
    }

    /// Value behind `handle`
    pub fn get(&self, handle: NodeHandle) -> Option<&T> {
        let idx = self.resolve(handle)?;
        self.slots[idx].value.as_ref()
    }

    /// Mutable value behind `handle`
    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut T> {
        let idx = self.resolve(handle)?;
        self.slots[idx].value.as_mut()
    }

    /// Check if `handle` refers to a node currently in this list
    pub fn contains_handle(&self, handle: NodeHandle) -> bool {
        self.resolve(handle).is_some()
    }

    /// Handle of the head node
    pub fn head(&self) -> Option<NodeHandle> {
        self.head.map(|idx| self.handle(idx))
    }

    /// Handle of the tail node
    pub fn tail(&self) -> Option<NodeHandle> {
        self.tail.map(|idx| self.handle(idx))
    }

    /// Handle of the node after `handle` (toward the tail)
    pub fn next(&self, handle: NodeHandle) -> Option<NodeHandle> {
        let idx = self.resolve(handle)?;
        self.slots[idx].next.map(|next| self.handle(next))
    }

    /// Handle of the node before `handle` (toward the head)
    pub fn prev(&self, handle: NodeHandle) -> Option<NodeHandle> {
        let idx = self.resolve(handle)?;
        self.slots[idx].prev.map(|prev| self.handle(prev))
    }

    /// Handle of the node at position `at`, counted from the head. O(n).
    pub fn node(&self, at: usize) -> Option<NodeHandle> {
        self.index_at(at).map(|idx| self.handle(idx))
    }

    /// Insert a value so that it ends up at position `at`
    ///
    /// Valid positions are `0..=len`; `at == len` appends. Out of range
    /// positions return `None` and leave the list unchanged.
    pub fn insert(&mut self, at: usize, value: T) -> Option<NodeHandle> {
        if at > self.len {
            return None;
        }
        if at == self.len {
            return Some(self.append(value));
        }

        let target = self.index_at(at)?;
        let idx = self.alloc(value);
        self.link_before(idx, target);
        self.len += 1;
        Some(self.handle(idx))
    }

    /// Remove and return the value at position `at`, `None` if out of range
    pub fn remove(&mut self, at: usize) -> Option<T> {
        let idx = self.index_at(at)?;
        self.release(idx)
    }

    /// Position of the first node (from the head) equal to `value`. O(n).
    pub fn position(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.iter().position(|v| v == value)
    }

    /// Check if any node holds `value`. O(n).
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.position(value).is_some()
    }

    /// Remove every node. Handles issued before the call stop resolving.
    pub fn clear(&mut self) {
        self.id = next_list_id();
        self.slots.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterate values from head to tail without consuming the list
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Check every structural invariant, panicking on the first violation
    ///
    /// Walks the whole chain in both directions, so this is O(n).
    #[doc(hidden)]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.head.is_none(), self.tail.is_none(), "head/tail disagree");
        assert_eq!(self.head.is_none(), self.len == 0, "emptiness disagrees with len");

        let mut forward = 0;
        let mut expected_prev = None;
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let slot = &self.slots[idx];
            assert!(slot.value.is_some(), "vacant slot {idx} linked into chain");
            assert_eq!(slot.prev, expected_prev, "broken prev link at slot {idx}");
            forward += 1;
            assert!(forward <= self.len, "forward walk exceeds len");
            expected_prev = Some(idx);
            cursor = slot.next;
        }
        assert_eq!(expected_prev, self.tail, "forward walk does not end at tail");
        assert_eq!(forward, self.len);

        let mut backward = 0;
        let mut cursor = self.tail;
        while let Some(idx) = cursor {
            backward += 1;
            assert!(backward <= self.len, "backward walk exceeds len");
            cursor = self.slots[idx].prev;
        }
        assert_eq!(backward, self.len);

        for &idx in &self.free_list {
            assert!(self.slots[idx].value.is_none(), "free slot {idx} holds a value");
        }
        assert_eq!(self.slots.len(), self.len + self.free_list.len());
    }

    fn handle(&self, idx: usize) -> NodeHandle {
        NodeHandle {
            list: self.id,
            index: idx,
            generation: self.slots[idx].generation,
        }
    }

    fn resolve(&self, handle: NodeHandle) -> Option<usize> {
        if handle.list != self.id {
            return None;
        }
        let slot = self.slots.get(handle.index)?;
        (slot.generation == handle.generation && slot.value.is_some()).then_some(handle.index)
    }

    fn index_at(&self, at: usize) -> Option<usize> {
        if at >= self.len {
            return None;
        }

        // Walk from whichever end is closer
        if at <= self.len / 2 {
            let mut cursor = self.head;
            for _ in 0..at {
                cursor = self.slots[cursor?].next;
            }
            cursor
        } else {
            let mut cursor = self.tail;
            for _ in 0..(self.len - 1 - at) {
                cursor = self.slots[cursor?].prev;
            }
            cursor
        }
    }

    fn alloc(&mut self, value: T) -> usize {
        if let Some(idx) = self.free_list.pop() {
            self.slots[idx].value = Some(value);
            idx
        } else {
            let idx = self.slots.len();
            self.slots.push(Slot {
                value: Some(value),
                prev: None,
                next: None,
                generation: 0,
            });
            idx
        }
    }

    /// Unlink an occupied slot, vacate it and hand back its value
    fn release(&mut self, idx: usize) -> Option<T> {
        let value = self.slots[idx].value.take()?;
        self.unlink(idx);

        let slot = &mut self.slots[idx];
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(idx);
        self.len -= 1;
        Some(value)
    }

    fn link_front(&mut self, idx: usize) {
        self.slots[idx].prev = None;
        self.slots[idx].next = self.head;

        match self.head {
            Some(head_idx) => self.slots[head_idx].prev = Some(idx),
            None => self.tail = Some(idx),
        }

        self.head = Some(idx);
    }

    fn link_back(&mut self, idx: usize) {
        self.slots[idx].next = None;
        self.slots[idx].prev = self.tail;

        match self.tail {
            Some(tail_idx) => self.slots[tail_idx].next = Some(idx),
            None => self.head = Some(idx),
        }

        self.tail = Some(idx);
    }

    /// Link `idx` directly in front of the linked slot `at`
    fn link_before(&mut self, idx: usize, at: usize) {
        let prev = self.slots[at].prev;
        self.slots[idx].prev = prev;
        self.slots[idx].next = Some(at);
        self.slots[at].prev = Some(idx);

        match prev {
            Some(prev_idx) => self.slots[prev_idx].next = Some(idx),
            None => self.head = Some(idx),
        }
    }

    fn unlink(&mut self, idx: usize) {
        let prev = self.slots[idx].prev.take();
        let next = self.slots[idx].next.take();

        match prev {
            Some(prev_idx) => self.slots[prev_idx].next = next,
            None => self.head = next,
        }

        match next {
            Some(next_idx) => self.slots[next_idx].prev = prev,
            None => self.tail = prev,
        }
    }
}

impl<T> Default for DoublyLinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for DoublyLinkedList<T> {
    /// The clone gets its own identity: handles issued by `self` do not
    /// resolve against it.
    fn clone(&self) -> Self {
        Self {
            id: next_list_id(),
            slots: self.slots.clone(),
            free_list: self.free_list.clone(),
            head: self.head,
            tail: self.tail,
            len: self.len,
        }
    }
}

impl<T: PartialEq> PartialEq for DoublyLinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for DoublyLinkedList<T> {}

impl<T: fmt::Debug> fmt::Debug for DoublyLinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for DoublyLinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " <-> ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}

impl<T> FromIterator<T> for DoublyLinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for DoublyLinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.append(value);
        }
    }
}

impl<T> IntoIterator for DoublyLinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Consume the list by popping from the head
    fn into_iter(self) -> IntoIter<T> {
        IntoIter::new(self)
    }
}

impl<'a, T> IntoIterator for &'a DoublyLinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
