//! Line-by-line trace replay

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::handler::CommandHandler;

/// Counts gathered while replaying a trace
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Commands applied, errors included
    pub commands: u64,
    /// Commands rejected with an error reply
    pub errors: u64,
}

/// Feed every line of `input` through `handler`, writing one reply per
/// command to `output` unless `quiet` is set.
///
/// Rejected commands are counted and logged; only I/O failures abort.
pub fn replay<R, W>(
    input: R,
    output: &mut W,
    handler: &CommandHandler,
    quiet: bool,
) -> Result<Summary>
where
    R: BufRead,
    W: Write,
{
    let mut summary = Summary::default();

    for (lineno, line) in input.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", lineno + 1))?;

        let Some(reply) = handler.handle(&line) else {
            continue;
        };

        summary.commands += 1;
        if reply.is_error() {
            summary.errors += 1;
            warn!(line = lineno + 1, "{}", reply);
        } else {
            debug!(line = lineno + 1, command = line.trim(), "applied");
        }

        if !quiet {
            writeln!(output, "{}", reply).context("failed to write reply")?;
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lrucache::SharedLruCache;
    use std::fs::File;
    use std::io::{BufReader, Write};
    use tempfile::NamedTempFile;

    const TRACE: &str = "\
# capacity 3 scenario
INSERT 3
INSERT 7
INSERT 8
PEEK

INSERT 15
CONTAINS 3
CONTAINS 7
PEEK
BOGUS
";

    fn handler(capacity: usize) -> CommandHandler {
        CommandHandler::new(SharedLruCache::new(capacity).unwrap())
    }

    #[test]
    fn test_replay_writes_replies() {
        let handler = handler(3);
        let mut output = Vec::new();

        let summary = replay(TRACE.as_bytes(), &mut output, &handler, false).unwrap();

        assert_eq!(summary, Summary { commands: 9, errors: 1 });
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "OK\nOK\nOK\n8\nEVICTED 3\n0\n1\n7\nERR unknown command 'BOGUS'\n"
        );
    }

    #[test]
    fn test_replay_quiet() {
        let handler = handler(3);
        let mut output = Vec::new();

        let summary = replay(TRACE.as_bytes(), &mut output, &handler, true).unwrap();

        assert_eq!(summary.commands, 9);
        assert!(output.is_empty());
        assert_eq!(handler.cache().peek(), Some("7".to_string()));
    }

    #[test]
    fn test_replay_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(TRACE.as_bytes()).unwrap();

        let handler = handler(3);
        let mut output = Vec::new();
        let reader = BufReader::new(File::open(file.path()).unwrap());

        let summary = replay(reader, &mut output, &handler, false).unwrap();

        assert_eq!(summary.errors, 1);
        assert_eq!(handler.cache().snapshot(), vec!["7", "15", "8"]);
    }

    #[test]
    fn test_replay_invalid_utf8_fails() {
        let handler = handler(3);
        let mut output = Vec::new();
        let input: &[u8] = b"INSERT a\nINSERT \xff\n";

        let err = replay(input, &mut output, &handler, false).unwrap_err();

        assert!(err.to_string().contains("line 2"));
        assert_eq!(handler.cache().len(), 1);
    }
}
