//! Extraction of trusted archives into a prepared destination.
//!
//! Extraction is the only destructive step in the pipeline, so it is
//! guarded twice: the handle must be trusted, and the destination must be
//! an existing, empty directory. Both preconditions are checked before the
//! tool runs, so a refused unpack has written nothing.

use std::ffi::OsStr;
use std::path::Path;

use tracing::info;
use tracing::warn;

use crate::ArchiveError;
use crate::ArchiveHandle;
use crate::InspectorConfig;
use crate::ProcessRunner;
use crate::Result;
use crate::types::UnpackDir;

/// Unpacks trusted archives with the configured Info-ZIP tool.
#[derive(Debug)]
pub struct Extractor {
    config: InspectorConfig,
    runner: ProcessRunner,
}

impl Extractor {
    /// Creates an extractor driving the tool described by `config`.
    #[must_use]
    pub fn new(config: InspectorConfig) -> Self {
        let runner = ProcessRunner::new(config.runner.clone());
        Self { config, runner }
    }

    /// Unpacks `handle`'s archive into `destination`, reproducing the
    /// archive's relative directory structure.
    ///
    /// The destination must already exist and contain nothing but the
    /// implicit self and parent entries. Cleaning up a populated
    /// destination is the caller's job, not this crate's.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::CorruptArchive`] if the handle never passed
    ///   inspection, or if the tool exits nonzero while extracting.
    /// - [`ArchiveError::DestinationMissing`] /
    ///   [`ArchiveError::DestinationNotEmpty`] when the destination fails
    ///   its precondition; nothing has been written in either case.
    /// - Transport errors ([`ArchiveError::CommandNotFound`],
    ///   [`ArchiveError::Timeout`], [`ArchiveError::OutputLimitExceeded`])
    ///   if the tool invocation itself fails.
    pub fn unpack(&self, handle: &ArchiveHandle, destination: impl AsRef<Path>) -> Result<()> {
        if !handle.is_trusted() {
            return Err(ArchiveError::CorruptArchive {
                reason: format!("{} never passed inspection", handle.path().display()),
            });
        }
        let destination = UnpackDir::new(destination.as_ref())?;

        info!(
            archive = %handle.path().display(),
            destination = %destination.as_path().display(),
            "unpacking archive"
        );
        let outcome = self.runner.execute(
            &self.config.program,
            [
                OsStr::new("-d"),
                destination.as_path().as_os_str(),
                handle.path().as_os_str(),
            ],
        )?;
        if !outcome.success() {
            warn!(
                archive = %handle.path().display(),
                exit_code = outcome.exit_code,
                "extraction failed"
            );
            return Err(ArchiveError::CorruptArchive {
                reason: format!(
                    "extraction exited with code {}: {}",
                    outcome.exit_code,
                    outcome.stderr_lossy().trim()
                ),
            });
        }

        info!(archive = %handle.path().display(), "extraction finished");
        Ok(())
    }

    /// Returns the extractor's configuration.
    #[must_use]
    pub const fn config(&self) -> &InspectorConfig {
        &self.config
    }
}
