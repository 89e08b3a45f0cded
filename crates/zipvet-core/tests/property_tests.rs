//! Property-based tests for listing parsing and validation.
//!
//! These tests use proptest to generate arbitrary listings, entry sets and
//! thresholds, and verify that the parsing and validation invariants hold
//! across a wide range of cases.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use std::collections::BTreeSet;
use zipvet_core::ArchiveHandle;
use zipvet_core::CheckName;
use zipvet_core::Entry;
use zipvet_core::ValidationConfig;
use zipvet_core::listing::parse_listing;

fn listing_from_rows(rows: &[String]) -> String {
    let mut text = String::from(
        "Archive:  prop.zip\n  Length     Date   Time    Name\n --------    ----   ----    ----\n",
    );
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text.push_str(" --------                   -------\n        0                   0 files\n");
    text
}

fn file_row(name: &str, size: u64) -> String {
    format!("{size:>9}  10-06-15 10:36   {name}")
}

fn dir_row(name: &str) -> String {
    format!("        0  10-06-15 10:36   {name}/")
}

fn handle_with_files(count: usize, size_each: u64) -> ArchiveHandle {
    let entries = (0..count)
        .map(|i| Entry::file(format!("file-{i}.bin"), size_each))
        .collect();
    ArchiveHandle::trusted("prop.zip", entries, 1_000)
}

proptest! {
    /// N file rows and M directory rows always parse to exactly those
    /// counts, whatever the names and sizes.
    #[test]
    fn prop_listing_round_trip_counts(
        files in prop::collection::vec(("[a-z][a-z0-9]{0,11}", 0u64..1_000_000), 0..20),
        dirs in prop::collection::vec("[a-z][a-z0-9]{0,11}", 0..10),
    ) {
        let mut rows: Vec<String> = Vec::new();
        for (name, size) in &files {
            rows.push(file_row(&format!("{name}.bin"), *size));
        }
        for name in &dirs {
            rows.push(dir_row(name));
        }

        let entries = parse_listing(&listing_from_rows(&rows)).expect("well-formed listing");
        let handle = ArchiveHandle::trusted("prop.zip", entries, 0);
        prop_assert_eq!(handle.file_count(), files.len());
        prop_assert_eq!(handle.directory_count(), dirs.len());
        prop_assert_eq!(handle.entry_count(), files.len() + dirs.len());
    }

    /// A directory row with nonzero size poisons the whole listing, no
    /// matter how many well-formed rows surround it.
    #[test]
    fn prop_nonzero_directory_never_parses(
        name in "[a-z][a-z0-9]{0,11}",
        size in 1u64..1_000_000,
        good_files in prop::collection::vec(("[a-z][a-z0-9]{0,7}", 0u64..1_000), 0..5),
    ) {
        let mut rows: Vec<String> = good_files
            .iter()
            .map(|(file_name, file_size)| file_row(&format!("{file_name}.txt"), *file_size))
            .collect();
        rows.push(format!("{size:>9}  10-06-15 10:36   {name}/"));

        prop_assert!(parse_listing(&listing_from_rows(&rows)).is_err());
    }

    /// Raising a count threshold flips the verdict from fail to pass at
    /// exactly the entry count, never oscillating.
    #[test]
    fn prop_file_count_threshold_is_monotonic(
        count in 1usize..40,
        thresholds in prop::collection::vec(0usize..80, 1..20),
    ) {
        let handle = handle_with_files(count, 10);
        for threshold in thresholds {
            let config = ValidationConfig {
                file_count: Some(threshold),
                ..Default::default()
            };
            let outcome = handle.validate(&config).unwrap();
            prop_assert_eq!(outcome.passed, threshold >= count);
        }
    }

    /// Same handle, same config, same verdict.
    #[test]
    fn prop_validation_is_idempotent(
        count in 0usize..30,
        file_max in prop::option::of(0usize..40),
        size_max in prop::option::of(0u64..100_000),
        length_max in prop::option::of(0usize..64),
    ) {
        let handle = handle_with_files(count, 100);
        let config = ValidationConfig {
            file_count: file_max,
            contents_size: size_max,
            path_length: length_max,
            ..Default::default()
        };
        let first = handle.validate(&config).unwrap();
        let second = handle.validate(&config).unwrap();
        prop_assert_eq!(first, second);
    }

    /// The unpacked size aggregate is the plain sum of file sizes.
    #[test]
    fn prop_size_unpacked_sums_file_sizes(
        sizes in prop::collection::vec(0u64..1_000_000, 0..30),
    ) {
        let entries: Vec<Entry> = sizes
            .iter()
            .enumerate()
            .map(|(i, size)| Entry::file(format!("f{i}.dat"), *size))
            .collect();
        let handle = ArchiveHandle::trusted("sum.zip", entries, 0);
        let expected: u64 = sizes.iter().sum();
        prop_assert_eq!(handle.size_unpacked(), expected);
    }

    /// A corrupt handle gives the same single-failure answer for any
    /// requested configuration.
    #[test]
    fn prop_corrupt_answer_is_config_independent(
        file_max in prop::option::of(0usize..100),
        entry_max in prop::option::of(0usize..100),
        html in prop::option::of(any::<bool>()),
    ) {
        let handle = ArchiveHandle::corrupt("invalid.zip");
        let config = ValidationConfig {
            file_count: file_max,
            entry_count: entry_max,
            contains_html_file: html,
            ..Default::default()
        };
        let outcome = handle.validate(&config).unwrap();
        prop_assert!(!outcome.passed);
        prop_assert_eq!(outcome.failures, BTreeSet::from([CheckName::ZipCorrupt]));
    }
}
