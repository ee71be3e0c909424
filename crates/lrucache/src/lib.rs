//! # lrucache
//!
//! Fixed-capacity least-recently-used cache over a set of values.
//!
//! ## Architecture
//! - **List**: `dlist` slab list in recency order, head = most recent (O(1))
//! - **Index**: AHash map from value to node handle, so promotion never scans
//! - **Shared**: one `parking_lot` mutex around list + index, with hit/miss
//!   statistics
//!
//! A value is its own key. Inserting past capacity evicts the tail before the
//! call returns, and looking a value up with [`LruCache::contains`] counts as
//! a use and promotes it to the head.

#![warn(missing_docs)]

mod error;
mod lru;
mod shared;
mod stats;

pub use dlist::Iter;
pub use error::{Error, Result};
pub use lru::{Drain, LruCache};
pub use shared::SharedLruCache;
pub use stats::{CacheStats, StatsSnapshot};
