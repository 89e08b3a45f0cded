//! Archive entry records parsed from a listing.

use std::cmp::Ordering;

/// Kind of entry in an archive listing.
///
/// # Examples
///
/// ```
/// use zipvet_core::types::EntryKind;
///
/// let file = EntryKind::File;
/// let directory = EntryKind::Directory;
/// assert!(file.is_file());
/// assert!(directory.is_directory());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntryKind {
    /// Regular file entry.
    File,

    /// Directory entry. Directory names end in `/` in the listing and
    /// always carry size 0.
    Directory,
}

impl EntryKind {
    /// Returns `true` if this is a regular file.
    #[must_use]
    pub const fn is_file(self) -> bool {
        matches!(self, Self::File)
    }

    /// Returns `true` if this is a directory.
    #[must_use]
    pub const fn is_directory(self) -> bool {
        matches!(self, Self::Directory)
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
        }
    }
}

/// One file or directory record within an archive.
///
/// Entries are immutable and preserve the name exactly as the listing
/// printed it, including interior whitespace and the trailing `/` on
/// directory names. A directory entry's size is 0 by construction.
///
/// Entries order by name (byte-lexicographic), then kind, then size; this
/// is the total order downstream comparisons and tests rely on.
///
/// # Examples
///
/// ```
/// use zipvet_core::types::Entry;
///
/// let file = Entry::file("images/test.png", 732_059);
/// let dir = Entry::directory("images/");
/// assert!(file.is_file());
/// assert_eq!(dir.size(), 0);
/// assert!(dir < file);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    kind: EntryKind,
    name: String,
    size: u64,
}

impl Entry {
    /// Creates a file entry.
    #[must_use]
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self {
            kind: EntryKind::File,
            name: name.into(),
            size,
        }
    }

    /// Creates a directory entry. Directories have no size of their own.
    #[must_use]
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Directory,
            name: name.into(),
            size: 0,
        }
    }

    /// Returns the entry kind.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Returns the entry name exactly as listed.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the entry's uncompressed size in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Returns `true` if this is a regular file.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Returns `true` if this is a directory.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        self.kind.is_directory()
    }

    /// Returns `true` if this is a file whose name ends `.htm` or `.html`,
    /// ignoring ASCII case.
    #[must_use]
    pub fn is_html_file(&self) -> bool {
        self.is_file() && has_suffix_ignore_case(&self.name, &[".htm", ".html"])
    }

    /// Returns `true` if this is a file whose name ends `.zip`, ignoring
    /// ASCII case. Nested archives are how oversized payloads get smuggled
    /// past listing-based size checks.
    #[must_use]
    pub fn is_zip_file(&self) -> bool {
        self.is_file() && has_suffix_ignore_case(&self.name, &[".zip"])
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.kind.cmp(&other.kind))
            .then_with(|| self.size.cmp(&other.size))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Compared as bytes: the suffixes are ASCII and untrusted names may end
// mid-way through a multibyte character, where a &str slice would panic.
fn has_suffix_ignore_case(name: &str, suffixes: &[&str]) -> bool {
    let bytes = name.as_bytes();
    suffixes.iter().any(|suffix| {
        bytes.len() >= suffix.len()
            && bytes[bytes.len() - suffix.len()..].eq_ignore_ascii_case(suffix.as_bytes())
    })
}
