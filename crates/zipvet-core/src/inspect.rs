//! Trust-establishing inspection of archives through an external tool.
//!
//! Nothing in this crate parses archive bytes directly. Inspection shells
//! out to an Info-ZIP `unzip` binary and trusts an archive only after a
//! fail-closed pipeline clears: the tool's version must be whitelisted,
//! the archive must pass the tool's integrity test, and the listing must
//! parse under a strict grammar. Environment problems (missing tool,
//! untrusted version, timeouts) are errors; problems with the archive
//! itself yield a corrupt handle, which is an answer, not a failure.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::ArchiveError;
use crate::ArchiveHandle;
use crate::InspectorConfig;
use crate::ProcessRunner;
use crate::Result;
use crate::listing;

/// Opens archives by interrogating the configured Info-ZIP tool.
///
/// The inspector owns no per-archive state; one instance can open any
/// number of archives.
///
/// # Examples
///
/// ```no_run
/// use zipvet_core::ArchiveInspector;
/// use zipvet_core::InspectorConfig;
///
/// # fn main() -> zipvet_core::Result<()> {
/// let inspector = ArchiveInspector::new(InspectorConfig::default());
/// let handle = inspector.open("upload.zip")?;
/// println!("{} entries", handle.entry_count());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ArchiveInspector {
    config: InspectorConfig,
    runner: ProcessRunner,
}

impl ArchiveInspector {
    /// Creates an inspector driving the tool described by `config`.
    #[must_use]
    pub fn new(config: InspectorConfig) -> Self {
        let runner = ProcessRunner::new(config.runner.clone());
        Self { config, runner }
    }

    /// Inspects the archive at `path` and returns a sealed handle.
    ///
    /// Runs the full pipeline: tool version check, then `-t` integrity
    /// test, then `-l` listing capture and parse. The version check runs
    /// first so an untrusted tool never touches the archive at all. Name
    /// arguments are passed to the tool verbatim, never through a shell.
    ///
    /// A handle is returned for every archive-level outcome: trusted with
    /// its parsed entries and on-disk size, or corrupt with neither. The
    /// handle's state never changes afterwards.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::UntrustedToolVersion`] if the tool's version
    ///   banner matches no whitelist entry.
    /// - [`ArchiveError::CommandNotFound`], [`ArchiveError::Timeout`] or
    ///   [`ArchiveError::OutputLimitExceeded`] when a tool invocation
    ///   fails at the transport level.
    /// - [`ArchiveError::Io`] if the trusted archive's metadata cannot be
    ///   read.
    ///
    /// An archive that fails the integrity test or produces an unreadable
    /// listing is not an error; it comes back as a corrupt handle.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<ArchiveHandle> {
        let path = path.as_ref();
        let version = self.verify_tool()?;
        debug!(path = %path.display(), %version, "inspecting archive");

        let integrity = self
            .runner
            .execute(&self.config.program, [OsStr::new("-t"), path.as_os_str()])?;
        if !integrity.success() {
            warn!(
                path = %path.display(),
                exit_code = integrity.exit_code,
                "integrity test failed, marking archive corrupt"
            );
            return Ok(ArchiveHandle::corrupt(path));
        }

        let listed = self
            .runner
            .execute(&self.config.program, [OsStr::new("-l"), path.as_os_str()])?;
        if !listed.success() {
            warn!(
                path = %path.display(),
                exit_code = listed.exit_code,
                "listing command failed, marking archive corrupt"
            );
            return Ok(ArchiveHandle::corrupt(path));
        }

        let entries = match listing::parse_listing(&listed.stdout_lossy()) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(
                    path = %path.display(),
                    %error,
                    "listing rejected, marking archive corrupt"
                );
                return Ok(ArchiveHandle::corrupt(path));
            }
        };

        let size_packed = fs::metadata(path)?.len();
        info!(
            path = %path.display(),
            entries = entries.len(),
            size_packed,
            "archive passed inspection"
        );
        Ok(ArchiveHandle::trusted(path, entries, size_packed))
    }

    /// Confirms the configured tool reports a whitelisted version and
    /// returns the canonical whitelist entry that matched.
    ///
    /// [`open`](Self::open) calls this before touching any archive, but it
    /// is public so a deployment can probe its tool once at startup. The
    /// tool's exit code is ignored; only the banner text decides.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::UntrustedToolVersion`] carrying the first
    /// line of the observed banner when nothing matches, or a transport
    /// error if the tool could not be run at all.
    pub fn verify_tool(&self) -> Result<String> {
        let report = self.runner.execute(&self.config.program, ["-v"])?;
        let banner = report.stdout_lossy();
        match match_whitelist(&banner, &self.config.version_whitelist) {
            Some(version) => {
                debug!(version, "tool version accepted");
                Ok(version.to_string())
            }
            None => {
                let observed = banner.lines().next().unwrap_or_default().to_string();
                warn!(%observed, "tool version matches no whitelist entry");
                Err(ArchiveError::UntrustedToolVersion { observed })
            }
        }
    }

    /// Returns the inspector's configuration.
    #[must_use]
    pub const fn config(&self) -> &InspectorConfig {
        &self.config
    }
}

// The banner is the first thing the tool prints, so a literal prefix
// comparison over the whole output suffices. First whitelist match wins.
fn match_whitelist<'a>(banner: &str, whitelist: &'a [String]) -> Option<&'a str> {
    whitelist
        .iter()
        .map(String::as_str)
        .find(|version| banner.starts_with(version))
}
