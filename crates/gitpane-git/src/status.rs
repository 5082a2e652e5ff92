//! Working tree status as reported by `git status --porcelain`.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// Kind of change recorded for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusFlag {
    New,
    Modified,
    Deleted,
    Renamed,
    Copied,
    Unmerged,
    Untracked,
    Staged,
}

impl StatusFlag {
    /// Upper-case label used in the file table.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Modified => "MODIFIED",
            Self::Deleted => "DELETED",
            Self::Renamed => "RENAMED",
            Self::Copied => "COPIED",
            Self::Unmerged => "UNMERGED",
            Self::Untracked => "UNTRACKED",
            Self::Staged => "STAGED",
        }
    }
}

impl fmt::Display for StatusFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One changed file in the working tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub filename: String,
    #[serde(rename = "status")]
    pub status_flags: BTreeSet<StatusFlag>,
}

impl FileChange {
    /// Create a file change from a name and its flags.
    pub fn new(filename: impl Into<String>, flags: impl IntoIterator<Item = StatusFlag>) -> Self {
        Self {
            filename: filename.into(),
            status_flags: flags.into_iter().collect(),
        }
    }

    /// Check whether the change carries `flag`.
    #[must_use]
    pub fn has(&self, flag: StatusFlag) -> bool {
        self.status_flags.contains(&flag)
    }

    /// Check whether staging this file must only update the index.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.has(StatusFlag::Deleted)
    }
}

/// Parse porcelain v1 output into file changes, preserving order.
///
/// # Errors
/// Returns `Error::Parse` for a line that is not `XY <path>`.
pub fn parse_porcelain(command: &str, output: &str) -> Result<Vec<FileChange>> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_line(line).ok_or_else(|| Error::Parse {
            command: command.to_string(),
            line: line.to_string(),
        }))
        .collect()
}

fn parse_line(line: &str) -> Option<FileChange> {
    let mut chars = line.chars();
    let x = chars.next()?;
    let y = chars.next()?;
    let rest = line.get(2..)?.strip_prefix(' ')?;
    if rest.is_empty() {
        return None;
    }

    // Renames and copies are reported as `orig -> new`.
    let path = match rest.rsplit_once(" -> ") {
        Some((_, new)) if matches!(x, 'R' | 'C') || matches!(y, 'R' | 'C') => new,
        _ => rest,
    };

    Some(FileChange {
        filename: unquote(path),
        status_flags: flags_for(x, y),
    })
}

fn flags_for(x: char, y: char) -> BTreeSet<StatusFlag> {
    let mut flags = BTreeSet::new();

    if x == '?' && y == '?' {
        flags.insert(StatusFlag::New);
        flags.insert(StatusFlag::Untracked);
        return flags;
    }

    if x == 'U' || y == 'U' || (x == 'A' && y == 'A') || (x == 'D' && y == 'D') {
        flags.insert(StatusFlag::Unmerged);
        return flags;
    }

    for c in [x, y] {
        match c {
            'M' | 'T' => flags.insert(StatusFlag::Modified),
            'A' => flags.insert(StatusFlag::New),
            'D' => flags.insert(StatusFlag::Deleted),
            'R' => flags.insert(StatusFlag::Renamed),
            'C' => flags.insert(StatusFlag::Copied),
            _ => false,
        };
    }

    if !matches!(x, ' ' | '?' | '!') {
        flags.insert(StatusFlag::Staged);
    }

    flags
}

/// Undo git's C-style quoting of paths with unusual characters.
fn unquote(path: &str) -> String {
    let Some(inner) = path
        .strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
    else {
        return path.to_string();
    };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut iter = inner.bytes().peekable();
    while let Some(b) = iter.next() {
        if b != b'\\' {
            bytes.push(b);
            continue;
        }
        match iter.next() {
            Some(b'n') => bytes.push(b'\n'),
            Some(b't') => bytes.push(b'\t'),
            Some(d @ b'0'..=b'7') => {
                let mut value = u32::from(d - b'0');
                for _ in 0..2 {
                    match iter.peek() {
                        Some(&o @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(o - b'0');
                            iter.next();
                        }
                        _ => break,
                    }
                }
                bytes.push(u8::try_from(value).unwrap_or(b'?'));
            }
            Some(other) => bytes.push(other),
            None => bytes.push(b'\\'),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}
