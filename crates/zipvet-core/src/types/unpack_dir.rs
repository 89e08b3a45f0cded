//! Validated extraction destination type.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use crate::ArchiveError;
use crate::Result;

/// A validated destination directory for archive extraction.
///
/// Construction enforces the two extraction preconditions before any side
/// effect can happen:
///
/// 1. The path exists and is a directory (else
///    [`ArchiveError::DestinationMissing`]).
/// 2. The directory is empty aside from the implicit self/parent entries
///    (else [`ArchiveError::DestinationNotEmpty`]).
///
/// An extractor holding an `UnpackDir` has therefore already proven the
/// destination is safe to fill.
///
/// # Examples
///
/// ```no_run
/// use zipvet_core::types::UnpackDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = UnpackDir::new("/tmp/creative-staging")?;
/// println!("unpacking into {}", dest.as_path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackDir(PathBuf);

impl UnpackDir {
    /// Validates `path` as an extraction destination.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::DestinationMissing`] if the path does not
    /// exist or is not a directory, [`ArchiveError::DestinationNotEmpty`]
    /// if it already contains any entry, and [`ArchiveError::Io`] if the
    /// directory cannot be read.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.is_dir() {
            return Err(ArchiveError::DestinationMissing { path });
        }

        // read_dir already skips the self/parent entries.
        let mut dir = fs::read_dir(&path)?;
        if let Some(first) = dir.next() {
            first?;
            return Err(ArchiveError::DestinationNotEmpty { path });
        }

        Ok(Self(path))
    }

    /// Returns the destination as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}
