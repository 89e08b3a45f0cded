//! Multi-criteria validation of inspected archives.
//!
//! Checks are requested by name through [`ValidationConfig`]; every
//! requested check runs, and every violated one is reported, so a caller
//! learns everything wrong with an archive in one pass instead of fixing
//! violations one resubmission at a time. Rule violations are data, not
//! errors; the only error a validation can produce is a malformed
//! configuration.

use std::collections::BTreeSet;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::ArchiveError;
use crate::ArchiveHandle;
use crate::Result;

/// Names of the recognized validation checks.
///
/// `ZipCorrupt` is reported, never requested: it is the sole failure a
/// corrupt handle produces, regardless of which checks were asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckName {
    /// Sum of file-entry sizes within threshold.
    ContentsSize,
    /// Packed (on-disk) archive size within threshold.
    PackedSize,
    /// Total entry count within threshold.
    EntryCount,
    /// File entry count within threshold.
    FileCount,
    /// Directory entry count within threshold.
    DirectoryCount,
    /// Every entry name's character length within threshold.
    PathLength,
    /// Every entry name's component count within threshold.
    PathComponents,
    /// Presence of an HTML file matches the requirement.
    ContainsHtmlFile,
    /// Presence of a nested ZIP file matches the requirement.
    ContainsZipFile,
    /// No path component matches the forbidden pattern.
    ForbiddenCharacters,
    /// The archive never earned trust in the first place.
    ZipCorrupt,
}

impl std::fmt::Display for CheckName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ContentsSize => "contents_size",
            Self::PackedSize => "packed_size",
            Self::EntryCount => "entry_count",
            Self::FileCount => "file_count",
            Self::DirectoryCount => "directory_count",
            Self::PathLength => "path_length",
            Self::PathComponents => "path_components",
            Self::ContainsHtmlFile => "contains_html_file",
            Self::ContainsZipFile => "contains_zip_file",
            Self::ForbiddenCharacters => "forbidden_characters",
            Self::ZipCorrupt => "zip_corrupt",
        };
        write!(f, "{name}")
    }
}

/// Which checks to run and their thresholds.
///
/// A `None` field skips that check entirely. All numeric thresholds are
/// inclusive. The struct deserializes from JSON with unknown keys rejected,
/// so a misspelled check name can never silently enable a different check.
///
/// # Examples
///
/// ```
/// use zipvet_core::ValidationConfig;
///
/// let config = ValidationConfig {
///     file_count: Some(10),
///     contains_html_file: Some(true),
///     ..Default::default()
/// };
/// assert!(config.entry_count.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Maximum sum of file-entry sizes in bytes.
    pub contents_size: Option<u64>,
    /// Maximum packed (on-disk) archive size in bytes.
    pub packed_size: Option<u64>,
    /// Maximum number of entries, files and directories combined.
    pub entry_count: Option<usize>,
    /// Maximum number of file entries.
    pub file_count: Option<usize>,
    /// Maximum number of directory entries.
    pub directory_count: Option<usize>,
    /// Maximum entry-name length in characters.
    pub path_length: Option<usize>,
    /// Maximum number of non-empty `/`-separated name components.
    pub path_components: Option<usize>,
    /// Whether an HTML file must (`true`) or must not (`false`) be present.
    pub contains_html_file: Option<bool>,
    /// Whether a nested ZIP file must (`true`) or must not (`false`) be
    /// present.
    pub contains_zip_file: Option<bool>,
    /// Pattern no path component may match.
    pub forbidden_characters: Option<String>,
}

/// Outcome of one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// `true` if every requested check passed.
    pub passed: bool,
    /// Every check that failed, in a stable order.
    pub failures: BTreeSet<CheckName>,
}

/// Evaluates validation checks against one borrowed handle.
///
/// The handle is immutable and the evaluation touches nothing else, so the
/// same handle and configuration always produce the same result.
#[derive(Debug)]
pub struct ArchiveValidator<'a> {
    handle: &'a ArchiveHandle,
}

impl<'a> ArchiveValidator<'a> {
    /// Creates a validator for `handle`.
    #[must_use]
    pub const fn new(handle: &'a ArchiveHandle) -> Self {
        Self { handle }
    }

    /// Runs every check requested in `config`.
    ///
    /// A corrupt handle short-circuits to the single `ZipCorrupt` failure
    /// without evaluating anything, including the forbidden-characters
    /// pattern. Otherwise all requested checks run; nothing stops at the
    /// first violation.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidPattern`] if `forbidden_characters`
    /// does not compile. Rule violations never produce errors.
    pub fn validate(&self, config: &ValidationConfig) -> Result<ValidationResult> {
        if !self.handle.is_trusted() {
            return Ok(ValidationResult {
                passed: false,
                failures: BTreeSet::from([CheckName::ZipCorrupt]),
            });
        }

        let mut failures = BTreeSet::new();

        if let Some(max) = config.contents_size
            && self.handle.size_unpacked() > max
        {
            failures.insert(CheckName::ContentsSize);
        }

        if let Some(max) = config.packed_size
            && self.handle.size_packed() > max
        {
            failures.insert(CheckName::PackedSize);
        }

        if let Some(max) = config.entry_count
            && self.handle.entry_count() > max
        {
            failures.insert(CheckName::EntryCount);
        }

        if let Some(max) = config.file_count
            && self.handle.file_count() > max
        {
            failures.insert(CheckName::FileCount);
        }

        if let Some(max) = config.directory_count
            && self.handle.directory_count() > max
        {
            failures.insert(CheckName::DirectoryCount);
        }

        if let Some(max) = config.path_length
            && self
                .handle
                .entries()
                .iter()
                .any(|entry| entry.name().chars().count() > max)
        {
            failures.insert(CheckName::PathLength);
        }

        if let Some(max) = config.path_components
            && self
                .handle
                .entries()
                .iter()
                .any(|entry| component_count(entry.name()) > max)
        {
            failures.insert(CheckName::PathComponents);
        }

        if let Some(required) = config.contains_html_file
            && self.handle.has_html_file() != required
        {
            failures.insert(CheckName::ContainsHtmlFile);
        }

        if let Some(required) = config.contains_zip_file
            && self.handle.has_zip_file() != required
        {
            failures.insert(CheckName::ContainsZipFile);
        }

        if let Some(pattern) = &config.forbidden_characters {
            let forbidden = Regex::new(pattern).map_err(|source| ArchiveError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            let violated = self.handle.entries().iter().any(|entry| {
                components(entry.name()).any(|component| forbidden.is_match(component))
            });
            if violated {
                failures.insert(CheckName::ForbiddenCharacters);
            }
        }

        let passed = failures.is_empty();
        debug!(passed, failure_count = failures.len(), "validation finished");
        Ok(ValidationResult { passed, failures })
    }
}

fn components(name: &str) -> impl Iterator<Item = &str> {
    name.split('/').filter(|component| !component.is_empty())
}

fn component_count(name: &str) -> usize {
    components(name).count()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Entry;

    fn ad_handle() -> ArchiveHandle {
        ArchiveHandle::trusted(
            "test-ad.zip",
            vec![
                Entry::file("index.html", 112),
                Entry::directory("images/"),
                Entry::file("images/test.png", 732_059),
                Entry::directory("foo/"),
                Entry::file("foo/index.html", 62),
                Entry::file("foo/index2.html", 41),
            ],
            729_889,
        )
    }

    fn nested_handle() -> ArchiveHandle {
        ArchiveHandle::trusted(
            "test-ad-nested.zip",
            vec![
                Entry::directory("foo/"),
                Entry::directory("foo/bar/"),
                Entry::file("foo/bar/baz.html", 100),
            ],
            1_000,
        )
    }

    fn validate(handle: &ArchiveHandle, config: &ValidationConfig) -> ValidationResult {
        ArchiveValidator::new(handle).validate(config).unwrap()
    }

    #[test]
    fn test_empty_config_passes() {
        let result = validate(&ad_handle(), &ValidationConfig::default());
        assert!(result.passed);
        assert!(result.failures.is_empty());
    }

    #[test]
    fn test_contents_size_inclusive_threshold() {
        let handle = ad_handle();
        let passing = ValidationConfig {
            contents_size: Some(732_274),
            ..Default::default()
        };
        assert!(validate(&handle, &passing).passed);

        let failing = ValidationConfig {
            contents_size: Some(732_273),
            ..Default::default()
        };
        let result = validate(&handle, &failing);
        assert!(!result.passed);
        assert_eq!(result.failures, BTreeSet::from([CheckName::ContentsSize]));
    }

    #[test]
    fn test_packed_size_inclusive_threshold() {
        let handle = ad_handle();
        let passing = ValidationConfig {
            packed_size: Some(729_889),
            ..Default::default()
        };
        assert!(validate(&handle, &passing).passed);

        let failing = ValidationConfig {
            packed_size: Some(729_888),
            ..Default::default()
        };
        let result = validate(&handle, &failing);
        assert_eq!(result.failures, BTreeSet::from([CheckName::PackedSize]));
    }

    #[test]
    fn test_entry_count() {
        let handle = ad_handle();
        assert!(
            validate(
                &handle,
                &ValidationConfig {
                    entry_count: Some(6),
                    ..Default::default()
                },
            )
            .passed
        );
        assert!(
            validate(
                &handle,
                &ValidationConfig {
                    entry_count: Some(9),
                    ..Default::default()
                },
            )
            .passed
        );

        let result = validate(
            &handle,
            &ValidationConfig {
                entry_count: Some(5),
                ..Default::default()
            },
        );
        assert_eq!(result.failures, BTreeSet::from([CheckName::EntryCount]));
    }

    #[test]
    fn test_file_count() {
        let handle = ad_handle();
        assert!(
            validate(
                &handle,
                &ValidationConfig {
                    file_count: Some(4),
                    ..Default::default()
                },
            )
            .passed
        );

        let result = validate(
            &handle,
            &ValidationConfig {
                file_count: Some(3),
                ..Default::default()
            },
        );
        assert_eq!(result.failures, BTreeSet::from([CheckName::FileCount]));
    }

    #[test]
    fn test_directory_count() {
        let handle = ad_handle();
        assert!(
            validate(
                &handle,
                &ValidationConfig {
                    directory_count: Some(2),
                    ..Default::default()
                },
            )
            .passed
        );

        let result = validate(
            &handle,
            &ValidationConfig {
                directory_count: Some(1),
                ..Default::default()
            },
        );
        assert_eq!(result.failures, BTreeSet::from([CheckName::DirectoryCount]));
    }

    #[test]
    fn test_path_length_counts_characters() {
        // Longest name is "images/test.png", 15 characters.
        let handle = ad_handle();
        assert!(
            validate(
                &handle,
                &ValidationConfig {
                    path_length: Some(15),
                    ..Default::default()
                },
            )
            .passed
        );

        let result = validate(
            &handle,
            &ValidationConfig {
                path_length: Some(14),
                ..Default::default()
            },
        );
        assert_eq!(result.failures, BTreeSet::from([CheckName::PathLength]));
    }

    #[test]
    fn test_path_components_ignores_trailing_separator() {
        let handle = nested_handle();
        assert!(
            validate(
                &handle,
                &ValidationConfig {
                    path_components: Some(3),
                    ..Default::default()
                },
            )
            .passed
        );

        let result = validate(
            &handle,
            &ValidationConfig {
                path_components: Some(2),
                ..Default::default()
            },
        );
        assert_eq!(result.failures, BTreeSet::from([CheckName::PathComponents]));
    }

    #[test]
    fn test_contains_html_file_both_directions() {
        let with_html = ad_handle();
        assert!(
            validate(
                &with_html,
                &ValidationConfig {
                    contains_html_file: Some(true),
                    ..Default::default()
                },
            )
            .passed
        );
        let result = validate(
            &with_html,
            &ValidationConfig {
                contains_html_file: Some(false),
                ..Default::default()
            },
        );
        assert_eq!(
            result.failures,
            BTreeSet::from([CheckName::ContainsHtmlFile])
        );

        let without_html = ArchiveHandle::trusted(
            "no-html.zip",
            vec![Entry::file("logo.png", 10)],
            100,
        );
        assert!(
            validate(
                &without_html,
                &ValidationConfig {
                    contains_html_file: Some(false),
                    ..Default::default()
                },
            )
            .passed
        );
        let result = validate(
            &without_html,
            &ValidationConfig {
                contains_html_file: Some(true),
                ..Default::default()
            },
        );
        assert_eq!(
            result.failures,
            BTreeSet::from([CheckName::ContainsHtmlFile])
        );
    }

    #[test]
    fn test_contains_zip_file_detects_nesting() {
        let handle = ArchiveHandle::trusted(
            "smuggler.zip",
            vec![
                Entry::file("index.html", 10),
                Entry::file("assets/payload.ZIP", 9_000),
            ],
            500,
        );
        let result = validate(
            &handle,
            &ValidationConfig {
                contains_zip_file: Some(false),
                ..Default::default()
            },
        );
        assert_eq!(result.failures, BTreeSet::from([CheckName::ContainsZipFile]));
    }

    #[test]
    fn test_forbidden_characters() {
        let handle = ArchiveHandle::trusted(
            "odd-names.zip",
            vec![
                Entry::file("fine.html", 10),
                Entry::file("foo/price in $ of ads.json", 20),
            ],
            100,
        );

        let result = validate(
            &handle,
            &ValidationConfig {
                forbidden_characters: Some(r"[$!]".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(
            result.failures,
            BTreeSet::from([CheckName::ForbiddenCharacters])
        );

        let clean = validate(
            &handle,
            &ValidationConfig {
                forbidden_characters: Some(r"[\\]".to_string()),
                ..Default::default()
            },
        );
        assert!(clean.passed);
    }

    #[test]
    fn test_forbidden_characters_checks_components_not_separators() {
        let handle = ArchiveHandle::trusted(
            "deep.zip",
            vec![Entry::file("a/b/c.txt", 1)],
            10,
        );
        // '/' never reaches the pattern because it is the separator.
        let result = validate(
            &handle,
            &ValidationConfig {
                forbidden_characters: Some("/".to_string()),
                ..Default::default()
            },
        );
        assert!(result.passed);
    }

    #[test]
    fn test_malformed_pattern_is_an_error() {
        let result = ArchiveValidator::new(&ad_handle()).validate(&ValidationConfig {
            forbidden_characters: Some("[".to_string()),
            ..Default::default()
        });
        assert!(matches!(result, Err(ArchiveError::InvalidPattern { .. })));
    }

    #[test]
    fn test_mixed_failures_accumulate() {
        let result = validate(
            &ad_handle(),
            &ValidationConfig {
                contents_size: Some(1_000_000),
                entry_count: Some(6),
                file_count: Some(2),
                directory_count: Some(2),
                path_length: Some(10),
                path_components: Some(5),
                contains_html_file: Some(true),
                ..Default::default()
            },
        );
        assert!(!result.passed);
        assert_eq!(result.failures.len(), 2);
        assert!(result.failures.contains(&CheckName::FileCount));
        assert!(result.failures.contains(&CheckName::PathLength));
    }

    #[test]
    fn test_corrupt_handle_short_circuits() {
        let handle = ArchiveHandle::corrupt("invalid.zip");
        let result = validate(
            &handle,
            &ValidationConfig {
                entry_count: Some(6),
                file_count: Some(2),
                ..Default::default()
            },
        );
        assert!(!result.passed);
        assert_eq!(result.failures, BTreeSet::from([CheckName::ZipCorrupt]));
    }

    #[test]
    fn test_corrupt_handle_ignores_malformed_pattern() {
        // Corrupt short-circuits before any check is even looked at.
        let handle = ArchiveHandle::corrupt("invalid.zip");
        let result = ArchiveValidator::new(&handle)
            .validate(&ValidationConfig {
                forbidden_characters: Some("[".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(result.failures, BTreeSet::from([CheckName::ZipCorrupt]));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let handle = ad_handle();
        let config = ValidationConfig {
            file_count: Some(3),
            path_length: Some(14),
            ..Default::default()
        };
        let first = validate(&handle, &config);
        let second = validate(&handle, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_config_deserializes_from_json() {
        let config: ValidationConfig =
            serde_json::from_str(r#"{"file_count": 3, "contains_html_file": true}"#).unwrap();
        assert_eq!(config.file_count, Some(3));
        assert_eq!(config.contains_html_file, Some(true));
        assert_eq!(config.entry_count, None);
    }

    #[test]
    fn test_unknown_config_key_rejected() {
        let result = serde_json::from_str::<ValidationConfig>(r#"{"file_countz": 3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_ill_typed_config_value_rejected() {
        let result = serde_json::from_str::<ValidationConfig>(r#"{"file_count": "three"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_name_display() {
        assert_eq!(CheckName::ContentsSize.to_string(), "contents_size");
        assert_eq!(CheckName::ZipCorrupt.to_string(), "zip_corrupt");
        assert_eq!(
            CheckName::ForbiddenCharacters.to_string(),
            "forbidden_characters"
        );
    }
}
