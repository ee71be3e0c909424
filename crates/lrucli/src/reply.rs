//! Replies written back for each replayed command

use std::fmt;

use lrucache::StatsSnapshot;

/// Reply to one command, rendered as a single output line
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Command applied, nothing to report
    Ok,
    /// Values pushed out by an insert or resize, least recent first
    Evicted(Vec<String>),
    /// Count or boolean flag (`1`/`0`)
    Integer(usize),
    /// Single value, `None` when the cache is empty
    Value(Option<String>),
    /// Values from most to least recently used
    List(Vec<String>),
    /// Statistics counters
    Stats(StatsSnapshot),
    /// Rejected command
    Error(String),
}

impl Reply {
    /// Boolean as `1`/`0`
    pub fn flag(value: bool) -> Self {
        Reply::Integer(usize::from(value))
    }

    /// Check if this reply rejects its command
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => write!(f, "OK"),
            Reply::Evicted(values) => write!(f, "EVICTED {}", values.join(" ")),
            Reply::Integer(n) => write!(f, "{}", n),
            Reply::Value(Some(value)) => write!(f, "{}", value),
            Reply::Value(None) => write!(f, "(nil)"),
            Reply::List(values) if values.is_empty() => write!(f, "(empty)"),
            Reply::List(values) => write!(f, "{}", values.join(" ")),
            Reply::Stats(stats) => write!(
                f,
                "hits={} misses={} inserts={} evictions={} removals={} hit_ratio={:.2}",
                stats.hits,
                stats.misses,
                stats.inserts,
                stats.evictions,
                stats.removals,
                stats.hit_ratio(),
            ),
            Reply::Error(msg) => write!(f, "ERR {}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_display() {
        assert_eq!(Reply::Ok.to_string(), "OK");
        assert_eq!(Reply::flag(true).to_string(), "1");
        assert_eq!(Reply::flag(false).to_string(), "0");
        assert_eq!(Reply::Value(None).to_string(), "(nil)");
        assert_eq!(Reply::Value(Some("a".into())).to_string(), "a");
        assert_eq!(Reply::List(vec![]).to_string(), "(empty)");
        assert_eq!(
            Reply::List(vec!["b".into(), "a".into()]).to_string(),
            "b a"
        );
        assert_eq!(
            Reply::Evicted(vec!["x".into(), "y".into()]).to_string(),
            "EVICTED x y"
        );
        assert_eq!(
            Reply::Error("unknown command 'FOO'".into()).to_string(),
            "ERR unknown command 'FOO'"
        );
    }

    #[test]
    fn test_reply_stats_display() {
        let stats = StatsSnapshot {
            hits: 1,
            misses: 1,
            inserts: 4,
            evictions: 1,
            removals: 0,
        };

        assert_eq!(
            Reply::Stats(stats).to_string(),
            "hits=1 misses=1 inserts=4 evictions=1 removals=0 hit_ratio=0.50"
        );
    }

    #[test]
    fn test_reply_is_error() {
        assert!(Reply::Error("x".into()).is_error());
        assert!(!Reply::Ok.is_error());
    }
}
