//! Injected configuration for subprocess execution and archive inspection.
//!
//! The original design kept the tool whitelist and logging policy in
//! process-wide mutable state; here both are explicit per-instance
//! configuration so concurrent pipelines and tests can carry different
//! policies without interfering.

use std::time::Duration;

/// Resource bounds for a single subprocess execution.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use zipvet_core::RunnerConfig;
///
/// // Use the defaults
/// let config = RunnerConfig::default();
///
/// // Tighten the bounds for a latency-sensitive caller
/// let custom = RunnerConfig {
///     idle_timeout: Duration::from_secs(5),
///     max_output_bytes: 64 * 1024,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Maximum wall-clock time to wait for either child stream to become
    /// readable. This is an idle window, not an overall deadline: a child
    /// that keeps producing output is bounded by `max_output_bytes` instead.
    pub idle_timeout: Duration,

    /// Maximum combined stdout+stderr bytes accepted from the child before
    /// it is terminated.
    pub max_output_bytes: u64,
}

impl Default for RunnerConfig {
    /// Creates a `RunnerConfig` with the default bounds.
    ///
    /// Default values:
    /// - `idle_timeout`: 20 seconds
    /// - `max_output_bytes`: 1 MiB (roughly a listing of tens of thousands
    ///   of entries)
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(20),
            max_output_bytes: 1024 * 1024,
        }
    }
}

/// Configuration for the archive inspector and extractor.
///
/// # Examples
///
/// ```
/// use zipvet_core::InspectorConfig;
///
/// let config = InspectorConfig::default();
/// assert_eq!(config.program, "unzip");
///
/// // Point at a fake tool for hermetic tests
/// let hermetic = InspectorConfig {
///     program: "/tmp/fake-unzip".to_string(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectorConfig {
    /// Name or path of the external archive utility, resolved via the
    /// search path when not absolute. Never passed through a shell.
    pub program: String,

    /// Accepted tool versions. Each entry is matched as a prefix of the
    /// tool's version output; the first match wins. An empty whitelist
    /// trusts no tool.
    pub version_whitelist: Vec<String>,

    /// Bounds applied to every subprocess call the inspector makes.
    pub runner: RunnerConfig,
}

impl Default for InspectorConfig {
    /// Creates an `InspectorConfig` accepting the Info-ZIP versions whose
    /// listing grammar this crate parses.
    ///
    /// Default values:
    /// - `program`: `unzip`
    /// - `version_whitelist`: `["UnZip 5.52", "UnZip 6.0"]`
    /// - `runner`: [`RunnerConfig::default`]
    fn default() -> Self {
        Self {
            program: "unzip".to_string(),
            version_whitelist: vec!["UnZip 5.52".to_string(), "UnZip 6.0".to_string()],
            runner: RunnerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_runner_config() {
        let config = RunnerConfig::default();
        assert_eq!(config.idle_timeout, Duration::from_secs(20));
        assert_eq!(config.max_output_bytes, 1024 * 1024);
    }

    #[test]
    fn test_default_inspector_config() {
        let config = InspectorConfig::default();
        assert_eq!(config.program, "unzip");
        assert_eq!(config.version_whitelist.len(), 2);
        assert!(config.version_whitelist.contains(&"UnZip 5.52".to_string()));
        assert!(config.version_whitelist.contains(&"UnZip 6.0".to_string()));
    }

    #[test]
    fn test_struct_update_customization() {
        let config = InspectorConfig {
            program: "/opt/tools/unzip".to_string(),
            ..Default::default()
        };
        assert_eq!(config.program, "/opt/tools/unzip");
        assert_eq!(config.runner, RunnerConfig::default());
    }
}
