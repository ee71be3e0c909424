//! Node handles and list identity

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(0);

/// Allocate an id no other list in this process has seen.
pub(crate) fn next_list_id() -> u64 {
    NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed)
}

/// Stable reference to one node of one [`DoublyLinkedList`].
///
/// A handle stays valid while its node is in the list, regardless of how the
/// node moves. Once the node is removed the slot's generation is bumped and
/// the handle stops resolving, even if the slot is reused. Handles also carry
/// the id of the list that issued them, so passing one to a different list
/// is a miss rather than a corruption.
///
/// [`DoublyLinkedList`]: crate::DoublyLinkedList
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    pub(crate) list: u64,
    pub(crate) index: usize,
    pub(crate) generation: u32,
}
