//! # dlist
//!
//! Doubly linked list whose nodes live in a slab and are addressed by
//! stable handles.
//!
//! ## Architecture
//! - **Slab**: nodes stored in a `Vec`, vacated slots recycled via a free list
//! - **Links**: `prev`/`next` are slot indices, `next` points toward the tail
//! - **Handles**: `(list id, slot, generation)`, so a handle from another
//!   list or to a removed node never resolves
//!
//! Every head/tail operation and every removal through a handle is O(1).
//! Positional operations walk the chain and are O(n).

#![warn(missing_docs)]

mod handle;
mod iter;
mod list;

pub use handle::NodeHandle;
pub use iter::{IntoIter, Iter};
pub use list::DoublyLinkedList;
