//! Command handler for replayed traces

use std::num::NonZeroUsize;

use lrucache::{Error, SharedLruCache};

use crate::reply::Reply;

pub struct CommandHandler {
    cache: SharedLruCache<String>,
}

impl CommandHandler {
    pub fn new(cache: SharedLruCache<String>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &SharedLruCache<String> {
        &self.cache
    }

    /// Apply one trace line. Blank lines and `#` comments yield `None`.
    pub fn handle(&self, line: &str) -> Option<Reply> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let (verb, arg) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let command = verb.to_uppercase();

        let reply = match command.as_str() {
            "INSERT" => self.handle_insert(arg),
            "CONTAINS" | "TOUCH" => self.handle_contains(&command, arg),
            "HAS" => self.handle_has(arg),
            "REMOVE" => self.handle_remove(arg),
            "PEEK" => Reply::Value(self.cache.peek()),
            "LRU" => Reply::Value(self.cache.peek_lru()),
            "LEN" | "COUNT" => Reply::Integer(self.cache.len()),
            "CAPACITY" => Reply::Integer(self.cache.capacity()),
            "RESIZE" => self.handle_resize(arg),
            "LIST" => Reply::List(self.cache.snapshot()),
            "DRAIN" => Reply::List(self.cache.drain()),
            "CLEAR" => {
                self.cache.clear();
                Reply::Ok
            }
            "STATS" => Reply::Stats(self.cache.stats().snapshot()),
            _ => Reply::Error(format!("unknown command '{}'", verb)),
        };
        Some(reply)
    }

    fn handle_insert(&self, arg: &str) -> Reply {
        if arg.is_empty() {
            return wrong_arity("insert");
        }

        match self.cache.insert(arg.to_string()) {
            Some(evicted) => Reply::Evicted(vec![evicted]),
            None => Reply::Ok,
        }
    }

    fn handle_contains(&self, command: &str, arg: &str) -> Reply {
        if arg.is_empty() {
            return wrong_arity(&command.to_lowercase());
        }
        Reply::flag(self.cache.contains(arg))
    }

    fn handle_has(&self, arg: &str) -> Reply {
        if arg.is_empty() {
            return wrong_arity("has");
        }
        Reply::flag(self.cache.contains_untouched(arg))
    }

    fn handle_remove(&self, arg: &str) -> Reply {
        if arg.is_empty() {
            return wrong_arity("remove");
        }
        Reply::flag(self.cache.remove(arg).is_some())
    }

    fn handle_resize(&self, arg: &str) -> Reply {
        if arg.is_empty() {
            return wrong_arity("resize");
        }

        let capacity = match arg.parse::<usize>() {
            Ok(n) => n,
            Err(_) => return Reply::Error(format!("invalid capacity '{}'", arg)),
        };
        let Some(capacity) = NonZeroUsize::new(capacity) else {
            return Reply::Error(Error::ZeroCapacity.to_string());
        };

        let evicted = self.cache.set_capacity(capacity);
        if evicted.is_empty() {
            Reply::Ok
        } else {
            Reply::Evicted(evicted)
        }
    }
}

fn wrong_arity(command: &str) -> Reply {
    Reply::Error(format!(
        "wrong number of arguments for '{}' command",
        command
    ))
}
