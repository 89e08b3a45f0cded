//! The immutable archive handle produced by inspection.

use std::path::Path;
use std::path::PathBuf;

use crate::Result;
use crate::ValidationConfig;
use crate::ValidationResult;
use crate::types::Entry;
use crate::validate::ArchiveValidator;

/// Terminal inspection state of an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InspectionState {
    /// Version, integrity, and listing checks all passed; the handle's
    /// metadata may be trusted.
    Trusted,
    /// Some inspection step failed. The state is sticky: no operation on a
    /// corrupt handle re-invokes the external tool or revisits the verdict.
    Corrupt,
}

impl InspectionState {
    /// Returns `true` for [`InspectionState::Trusted`].
    #[must_use]
    pub const fn is_trusted(self) -> bool {
        matches!(self, Self::Trusted)
    }
}

// Derived views of the entry list, computed once because the handle is
// immutable and validation may run many times against it.
#[derive(Debug, Clone, Default)]
struct Aggregates {
    file_count: usize,
    directory_count: usize,
    size_unpacked: u64,
    has_html_file: bool,
    has_zip_file: bool,
}

impl Aggregates {
    fn compute(entries: &[Entry]) -> Self {
        let mut aggregates = Self::default();
        for entry in entries {
            if entry.is_directory() {
                aggregates.directory_count += 1;
            } else {
                aggregates.file_count += 1;
                // Listed sizes are attacker-influenced; saturate rather
                // than wrap so absurd totals stay absurd.
                aggregates.size_unpacked = aggregates.size_unpacked.saturating_add(entry.size());
            }
            aggregates.has_html_file |= entry.is_html_file();
            aggregates.has_zip_file |= entry.is_zip_file();
        }
        aggregates
    }
}

/// Trusted, immutable record of an inspected archive.
///
/// A handle is normally produced by
/// [`ArchiveInspector::open`](crate::ArchiveInspector::open). It owns the
/// parsed entry sequence and never changes after construction, so it is safe
/// to validate concurrently from multiple threads. A Corrupt handle behaves
/// as an empty archive for every accessor; only [`validate`](Self::validate)
/// and extraction report the corruption itself.
///
/// # Examples
///
/// ```
/// use zipvet_core::ArchiveHandle;
/// use zipvet_core::types::Entry;
///
/// let handle = ArchiveHandle::trusted(
///     "creative.zip",
///     vec![Entry::file("index.html", 112), Entry::directory("images/")],
///     729_889,
/// );
/// assert_eq!(handle.entry_count(), 2);
/// assert_eq!(handle.file_count(), 1);
/// assert_eq!(handle.size_unpacked(), 112);
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveHandle {
    path: PathBuf,
    state: InspectionState,
    entries: Vec<Entry>,
    size_packed: u64,
    aggregates: Aggregates,
}

impl ArchiveHandle {
    /// Assembles a trusted handle from inspected parts.
    #[must_use]
    pub fn trusted(path: impl Into<PathBuf>, entries: Vec<Entry>, size_packed: u64) -> Self {
        let aggregates = Aggregates::compute(&entries);
        Self {
            path: path.into(),
            state: InspectionState::Trusted,
            entries,
            size_packed,
            aggregates,
        }
    }

    /// Assembles a corrupt handle: no entries, no sizes, terminal state.
    #[must_use]
    pub fn corrupt(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: InspectionState::Corrupt,
            entries: Vec::new(),
            size_packed: 0,
            aggregates: Aggregates::default(),
        }
    }

    /// Returns the archive's filesystem path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the terminal inspection state.
    #[must_use]
    pub const fn state(&self) -> InspectionState {
        self.state
    }

    /// Returns `true` if every inspection step passed.
    #[must_use]
    pub const fn is_trusted(&self) -> bool {
        self.state.is_trusted()
    }

    /// Returns all entries in listing order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns the file entries in listing order.
    #[must_use]
    pub fn file_entries(&self) -> Vec<&Entry> {
        self.entries.iter().filter(|e| e.is_file()).collect()
    }

    /// Returns the directory entries in listing order.
    #[must_use]
    pub fn directory_entries(&self) -> Vec<&Entry> {
        self.entries.iter().filter(|e| e.is_directory()).collect()
    }

    /// Returns the HTML file entries (names ending `.htm`/`.html`, ignoring
    /// case) in listing order. This is the input the post-extraction HTML
    /// processing stage consumes.
    #[must_use]
    pub fn html_file_entries(&self) -> Vec<&Entry> {
        self.entries.iter().filter(|e| e.is_html_file()).collect()
    }

    /// Returns the total number of entries, files and directories alike.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of file entries.
    #[must_use]
    pub const fn file_count(&self) -> usize {
        self.aggregates.file_count
    }

    /// Returns the number of directory entries.
    #[must_use]
    pub const fn directory_count(&self) -> usize {
        self.aggregates.directory_count
    }

    /// Returns the archive's packed (on-disk) size in bytes.
    #[must_use]
    pub const fn size_packed(&self) -> u64 {
        self.size_packed
    }

    /// Returns the sum of the file entries' uncompressed sizes in bytes.
    #[must_use]
    pub const fn size_unpacked(&self) -> u64 {
        self.aggregates.size_unpacked
    }

    /// Returns `true` if any file entry name ends `.htm` or `.html`,
    /// ignoring case.
    #[must_use]
    pub const fn has_html_file(&self) -> bool {
        self.aggregates.has_html_file
    }

    /// Returns `true` if any file entry name ends `.zip`, ignoring case.
    #[must_use]
    pub const fn has_zip_file(&self) -> bool {
        self.aggregates.has_zip_file
    }

    /// Evaluates the requested checks against this handle.
    ///
    /// Delegates to [`ArchiveValidator`]; see there for the check-by-check
    /// rules.
    ///
    /// # Errors
    ///
    /// Returns an error only for a malformed configuration; rule violations
    /// are reported inside the [`ValidationResult`].
    pub fn validate(&self, config: &ValidationConfig) -> Result<ValidationResult> {
        ArchiveValidator::new(self).validate(config)
    }
}
