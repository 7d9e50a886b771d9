//! Text input formats.
//!
//! - Processes: one `PID,Arrival,Burst[,Priority[,Deadline]]` per line.
//! - Page references: `1,2,3,4` (commas and/or whitespace).
//! - Hybrid processes: `PID,Arrival,Burst,Priority,[p1,p2,...]`.
//!
//! Blank lines and lines starting with `#` are skipped. Line numbers in
//! errors are 1-based.

use std::fmt::Display;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::process::ProcessSpec;
use crate::types::PageId;

/// Parse a process list.
///
/// An empty or `none` deadline field means no deadline.
pub fn parse_processes(text: &str) -> Result<Vec<ProcessSpec>, ValidationError> {
    let mut out = Vec::new();
    for (line, body) in lines(text) {
        let fields: Vec<&str> = body.split(',').map(str::trim).collect();
        if !(3..=5).contains(&fields.len()) {
            return Err(malformed(
                line,
                format!("expected 3 to 5 fields, got {}", fields.len()),
            ));
        }
        let mut spec = ProcessSpec::new(
            field(fields[0], "pid", line)?,
            field(fields[1], "arrival", line)?,
            field(fields[2], "burst", line)?,
        );
        if let Some(raw) = fields.get(3) {
            spec.priority = field(raw, "priority", line)?;
        }
        if let Some(raw) = fields.get(4) {
            if !raw.is_empty() && !raw.eq_ignore_ascii_case("none") {
                spec.deadline = Some(field(raw, "deadline", line)?);
            }
        }
        out.push(spec);
    }
    Ok(out)
}

/// Parse a page reference string. Empty input is an empty sequence.
pub fn parse_pages(text: &str) -> Result<Vec<PageId>, ValidationError> {
    page_list(text.trim(), 1)
}

/// Parse hybrid process lines carrying a bracketed page list.
///
/// The page list may be empty (`[]`) or omitted entirely.
pub fn parse_hybrid(text: &str) -> Result<Vec<ProcessSpec>, ValidationError> {
    let mut out = Vec::new();
    for (line, body) in lines(text) {
        let (head, pages) = match body.find('[') {
            Some(open) => {
                let rest = &body[open + 1..];
                let Some(close) = rest.find(']') else {
                    return Err(malformed(line, "unterminated page list".to_string()));
                };
                if !rest[close + 1..].trim().is_empty() {
                    return Err(malformed(line, "trailing text after page list".to_string()));
                }
                (&body[..open], page_list(rest[..close].trim(), line)?)
            }
            None => (body, Vec::new()),
        };

        let head = head.trim().trim_end_matches(',');
        let fields: Vec<&str> = head.split(',').map(str::trim).collect();
        if fields.len() != 4 {
            return Err(malformed(
                line,
                format!("expected PID,Arrival,Burst,Priority, got {} fields", fields.len()),
            ));
        }
        let spec = ProcessSpec::new(
            field(fields[0], "pid", line)?,
            field(fields[1], "arrival", line)?,
            field(fields[2], "burst", line)?,
        )
        .priority(field(fields[3], "priority", line)?)
        .pages(pages);
        out.push(spec);
    }
    Ok(out)
}

fn lines(text: &str) -> impl Iterator<Item = (usize, &str)> + '_ {
    text.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'))
}

fn page_list(body: &str, line: usize) -> Result<Vec<PageId>, ValidationError> {
    body.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| field(s, "page", line).map(PageId))
        .collect()
}

fn field<T>(raw: &str, name: &str, line: usize) -> Result<T, ValidationError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse()
        .map_err(|e| malformed(line, format!("invalid {name} {raw:?}: {e}")))
}

fn malformed(line: usize, reason: String) -> ValidationError {
    ValidationError::Malformed { line, reason }
}
