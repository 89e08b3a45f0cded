//! High-level public API for archive inspection and extraction.

use std::path::Path;

use crate::ArchiveHandle;
use crate::ArchiveInspector;
use crate::Extractor;
use crate::InspectorConfig;
use crate::Result;

/// Inspects the archive at `path` and returns its sealed handle.
///
/// This is the main high-level entry point: it runs the full trust
/// pipeline (tool version check, integrity test, listing parse) and
/// returns a handle whose state is final. Callers holding the handle can
/// validate it and unpack it without any further subprocess round trips.
///
/// For inspecting many archives, construct one
/// [`ArchiveInspector`] and reuse it instead.
///
/// # Arguments
///
/// * `path` - Path to the archive file
/// * `config` - Tool selection, version whitelist and subprocess bounds
///
/// # Errors
///
/// Returns an error if:
/// - The tool is missing, untrusted, or breaches a subprocess bound
/// - The trusted archive's metadata cannot be read
///
/// An archive that merely fails inspection is not an error; it comes back
/// as a corrupt handle.
///
/// # Examples
///
/// ```no_run
/// use zipvet_core::InspectorConfig;
/// use zipvet_core::open_archive;
///
/// # fn main() -> zipvet_core::Result<()> {
/// let config = InspectorConfig::default();
/// let handle = open_archive("upload.zip", &config)?;
/// println!("{} entries, {} bytes unpacked", handle.entry_count(), handle.size_unpacked());
/// # Ok(())
/// # }
/// ```
pub fn open_archive<P: AsRef<Path>>(path: P, config: &InspectorConfig) -> Result<ArchiveHandle> {
    ArchiveInspector::new(config.clone()).open(path)
}

/// Unpacks a previously inspected archive into `destination`.
///
/// The destination must be an existing, empty directory; the handle must
/// be trusted. Both are checked before anything is written.
///
/// # Arguments
///
/// * `handle` - A handle produced by [`open_archive`] or an inspector
/// * `destination` - Existing empty directory to extract into
/// * `config` - Tool selection and subprocess bounds
///
/// # Errors
///
/// Returns an error if:
/// - The handle is corrupt, or the tool fails while extracting
/// - The destination is missing or not empty
/// - The tool is missing or breaches a subprocess bound
///
/// # Examples
///
/// ```no_run
/// use zipvet_core::InspectorConfig;
/// use zipvet_core::open_archive;
/// use zipvet_core::unpack_archive;
///
/// # fn main() -> zipvet_core::Result<()> {
/// let config = InspectorConfig::default();
/// let handle = open_archive("upload.zip", &config)?;
/// unpack_archive(&handle, "/srv/ads/unpacked", &config)?;
/// # Ok(())
/// # }
/// ```
pub fn unpack_archive<P: AsRef<Path>>(
    handle: &ArchiveHandle,
    destination: P,
    config: &InspectorConfig,
) -> Result<()> {
    Extractor::new(config.clone()).unpack(handle, destination)
}
