//! Error types for archive inspection, validation, and extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors that can occur while inspecting, validating, or extracting an
/// archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The external archive tool could not be found or started.
    #[error("command not found: {program}")]
    CommandNotFound {
        /// The program name that failed to spawn.
        program: String,
    },

    /// The external tool produced no output within the idle window.
    #[error("subprocess produced no output for {seconds} seconds")]
    Timeout {
        /// The idle window that elapsed, in seconds.
        seconds: u64,
    },

    /// The external tool produced more output than the configured cap.
    #[error("subprocess output exceeded {limit} bytes")]
    OutputLimitExceeded {
        /// The combined stdout+stderr byte cap that was exceeded.
        limit: u64,
    },

    /// The external tool reported a version outside the accepted whitelist.
    #[error("archive tool version is not whitelisted: {observed}")]
    UntrustedToolVersion {
        /// The version line the tool actually reported.
        observed: String,
    },

    /// The archive failed an integrity, listing, or extraction step.
    #[error("corrupt archive: {reason}")]
    CorruptArchive {
        /// Which step failed and why.
        reason: String,
    },

    /// The extraction destination does not exist as a directory.
    #[error("destination directory does not exist: {path}")]
    DestinationMissing {
        /// The missing destination path.
        path: PathBuf,
    },

    /// The extraction destination already contains entries.
    #[error("destination directory is not empty: {path}")]
    DestinationNotEmpty {
        /// The non-empty destination path.
        path: PathBuf,
    },

    /// A validation configuration supplied a malformed pattern.
    #[error("invalid forbidden-characters pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// The underlying compile error.
        #[source]
        source: regex::Error,
    },
}

impl ArchiveError {
    /// Returns `true` if this error came from running the external tool
    /// rather than from the archive itself.
    ///
    /// Transport errors are fatal for the call that produced them and are
    /// never retried: a missing binary stays missing, and re-running a
    /// zip bomb re-runs the bomb.
    ///
    /// # Examples
    ///
    /// ```
    /// use zipvet_core::ArchiveError;
    ///
    /// let err = ArchiveError::Timeout { seconds: 20 };
    /// assert!(err.is_transport());
    ///
    /// let err = ArchiveError::CorruptArchive {
    ///     reason: "CRC check failed".to_string(),
    /// };
    /// assert!(!err.is_transport());
    /// ```
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::CommandNotFound { .. } | Self::Timeout { .. } | Self::OutputLimitExceeded { .. }
        )
    }

    /// Returns `true` if this error is terminal for the archive handle.
    ///
    /// Trust failures are sticky: once an archive or toolchain is judged
    /// untrustworthy, no later operation may revisit that judgement.
    ///
    /// # Examples
    ///
    /// ```
    /// use zipvet_core::ArchiveError;
    ///
    /// let err = ArchiveError::UntrustedToolVersion {
    ///     observed: "UnZip 3.00".to_string(),
    /// };
    /// assert!(err.is_trust_failure());
    /// ```
    #[must_use]
    pub const fn is_trust_failure(&self) -> bool {
        matches!(
            self,
            Self::UntrustedToolVersion { .. } | Self::CorruptArchive { .. }
        )
    }

    /// Returns `true` if this error was raised by a destination precondition
    /// check, before any extraction side effect.
    #[must_use]
    pub const fn is_destination(&self) -> bool {
        matches!(
            self,
            Self::DestinationMissing { .. } | Self::DestinationNotEmpty { .. }
        )
    }
}
