//! End-of-run report

use std::fmt;

use lrucache::SharedLruCache;
use serde::Serialize;

use crate::replay::Summary;

/// Final state of a replay, printed as text or JSON
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub commands: u64,
    pub errors: u64,
    pub len: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
    pub removals: u64,
    pub hit_ratio: f64,
}

impl Report {
    pub fn new(summary: &Summary, cache: &SharedLruCache<String>) -> Self {
        let stats = cache.stats().snapshot();

        Self {
            commands: summary.commands,
            errors: summary.errors,
            len: cache.len(),
            capacity: cache.capacity(),
            hits: stats.hits,
            misses: stats.misses,
            inserts: stats.inserts,
            evictions: stats.evictions,
            removals: stats.removals,
            hit_ratio: stats.hit_ratio(),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Replay")?;
        writeln!(f, "commands:{}", self.commands)?;
        writeln!(f, "errors:{}", self.errors)?;
        writeln!(f)?;
        writeln!(f, "# Cache")?;
        writeln!(f, "cache_size:{}", self.len)?;
        writeln!(f, "cache_capacity:{}", self.capacity)?;
        writeln!(f, "cache_hits:{}", self.hits)?;
        writeln!(f, "cache_misses:{}", self.misses)?;
        writeln!(f, "cache_inserts:{}", self.inserts)?;
        writeln!(f, "cache_evictions:{}", self.evictions)?;
        writeln!(f, "cache_removals:{}", self.removals)?;
        writeln!(f, "cache_hit_ratio:{:.2}", self.hit_ratio)
    }
}
