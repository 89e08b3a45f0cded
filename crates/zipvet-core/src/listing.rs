//! Strict parser for the archive tool's textual content listing.
//!
//! The listing is the wire format between this crate and the external tool:
//! a three-line header (banner, column header, separator), data rows, and a
//! two-line footer (separator, totals). The parser rejects the whole
//! listing on any grammar violation rather than salvaging rows — a
//! misaligned or adversarial listing must never produce a partial entry
//! set that downstream validation would then trust.

use std::sync::LazyLock;

use regex::Regex;
use tracing::error;

use crate::ArchiveError;
use crate::Result;
use crate::types::Entry;

const HEADER_LINES: usize = 3;
const FOOTER_LINES: usize = 2;
const MIN_LINES: usize = HEADER_LINES + FOOTER_LINES;

// Size, date, time, then the rest of the line verbatim as the name. The
// greedy whitespace run before the capture means whitespace inside a name
// survives, including right after a directory prefix.
#[allow(clippy::expect_used)]
static ROW_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)\s+\d{2}-\d{2}-\d{2}\s+\d{2}:\d{2}\s+(.+)$")
        .expect("row grammar is a valid pattern")
});

/// Parses the content-listing text into entries.
///
/// Fails closed: any line that is neither positional header/footer nor a
/// grammatical data row rejects the entire listing. A listing with zero
/// data rows (an empty archive) is valid. Entries are returned in listing
/// order, duplicates included; nothing is sorted or deduplicated here.
///
/// # Errors
///
/// Returns [`ArchiveError::CorruptArchive`] if the listing has fewer than
/// the five header/footer lines, contains an ungrammatical row, names a
/// directory with a nonzero size, or carries a size that does not fit in
/// 64 bits.
pub fn parse_listing(text: &str) -> Result<Vec<Entry>> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < MIN_LINES {
        return Err(ArchiveError::CorruptArchive {
            reason: format!(
                "listing has {} lines, expected at least {MIN_LINES}",
                lines.len()
            ),
        });
    }

    let rows = &lines[HEADER_LINES..lines.len() - FOOTER_LINES];
    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        entries.push(parse_row(row)?);
    }
    Ok(entries)
}

fn parse_row(row: &str) -> Result<Entry> {
    let Some(captures) = ROW_PATTERN.captures(row) else {
        error!(row, "listing row does not match the grammar");
        return Err(ArchiveError::CorruptArchive {
            reason: format!("malformed listing row: {row:?}"),
        });
    };

    let size: u64 = captures[1].parse().map_err(|_| {
        error!(row, "listing row size does not fit in 64 bits");
        ArchiveError::CorruptArchive {
            reason: format!("entry size out of range in listing row: {row:?}"),
        }
    })?;
    let name = &captures[2];

    if name.ends_with('/') {
        if size != 0 {
            // Either the parser slid off the grammar or the row was
            // crafted; both mean the listing cannot be trusted.
            error!(row, "directory entry with nonzero size");
            return Err(ArchiveError::CorruptArchive {
                reason: format!("directory entry with nonzero size: {row:?}"),
            });
        }
        Ok(Entry::directory(name))
    } else {
        Ok(Entry::file(name, size))
    }
}
