//! Edge-list line format.
//!
//! One edge per line: `<source><whitespace><target>`. The line is trimmed, then split at the
//! first whitespace run; everything after it is the target, so a target may itself contain
//! whitespace. Blank lines are skipped.

use crate::{Error, Result};

/// Parse one raw line. `line_no` is 1-based and only used for error reporting.
///
/// Returns `Ok(None)` for blank lines.
pub fn parse_edge_line(line_no: usize, line: &str) -> Result<Option<(&str, &str)>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.split_once(char::is_whitespace) {
        Some((source, rest)) => Ok(Some((source, rest.trim_start()))),
        None => Err(Error::MalformedInput {
            line: line_no,
            content: line.to_string(),
        }),
    }
}
