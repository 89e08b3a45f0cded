//! Core data types for archive inspection and extraction.
//!
//! `Entry` and `EntryKind` are the structured form of one listing row.
//! `UnpackDir` is a newtype that enforces the extraction destination
//! preconditions at construction, so an extractor holding one has already
//! proven the destination exists and is empty.

pub mod entry;
pub mod unpack_dir;

pub use entry::Entry;
pub use entry::EntryKind;
pub use unpack_dir::UnpackDir;
