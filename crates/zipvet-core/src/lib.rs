//! Safe inspection and validation of untrusted ZIP archives.
//!
//! `zipvet-core` never parses archive bytes itself. It drives a
//! version-whitelisted Info-ZIP `unzip` binary under strict subprocess
//! bounds (idle timeout, output cap, deadlock-free pipe draining), parses
//! the tool's listing under a fixed grammar, and seals the outcome into an
//! immutable handle. The handle can be validated against size, count,
//! depth, name and content-type rules, with every violation reported in
//! one pass, before anything is unpacked to disk.
//!
//! # Examples
//!
//! ```no_run
//! use zipvet_core::InspectorConfig;
//! use zipvet_core::ValidationConfig;
//! use zipvet_core::open_archive;
//!
//! # fn main() -> zipvet_core::Result<()> {
//! let config = InspectorConfig::default();
//! let handle = open_archive("upload.zip", &config)?;
//!
//! let rules = ValidationConfig {
//!     contents_size: Some(10 * 1024 * 1024),
//!     file_count: Some(100),
//!     contains_html_file: Some(true),
//!     ..Default::default()
//! };
//! let outcome = handle.validate(&rules)?;
//! for failure in &outcome.failures {
//!     eprintln!("rejected: {failure}");
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod archive;
pub mod config;
pub mod error;
pub mod extract;
pub mod inspect;
pub mod listing;
pub mod runner;
pub mod types;
pub mod validate;

// Re-export main API types
pub use api::open_archive;
pub use api::unpack_archive;
pub use archive::ArchiveHandle;
pub use archive::InspectionState;
pub use config::InspectorConfig;
pub use config::RunnerConfig;
pub use error::ArchiveError;
pub use error::Result;
pub use extract::Extractor;
pub use inspect::ArchiveInspector;
pub use runner::ProcessResult;
pub use runner::ProcessRunner;
pub use validate::ArchiveValidator;
pub use validate::CheckName;
pub use validate::ValidationConfig;
pub use validate::ValidationResult;

// Re-export types module for easier access
pub use types::Entry;
pub use types::EntryKind;
pub use types::UnpackDir;
