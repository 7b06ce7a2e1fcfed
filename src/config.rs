use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::checker::{Interval, UpdateChecker, UpdateCheckerBuilder};
use crate::version::comparator::PlatformComparator;
use crate::version::sources::{FileVersionSource, Lenient, RemoteConfigSource};
use crate::version::types::{Platform, VersionValue};

// =============================================================================
// Time-related constants
// =============================================================================

/// Default check interval in milliseconds (check once)
pub const DEFAULT_INTERVAL_MS: i64 = 0;

/// Timeout for remote fetch operations in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No remote url configured")]
    MissingRemoteUrl,

    #[error("Neither a version nor a version file is configured")]
    MissingLocalVersion,
}

/// Update checker configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckerConfig {
    /// Re-check interval in milliseconds; absent or 0 checks once, null or negative disables
    pub interval: Interval,
    /// Fixed local version
    pub version: Option<VersionValue>,
    /// Human readable version used to detect development builds
    pub display_version: Option<String>,
    pub platform: Platform,
    /// File holding the local version, used when `version` is not set
    pub version_file: Option<PathBuf>,
    pub remote: RemoteConfig,
}

/// Remote version source configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RemoteConfig {
    pub url: Option<String>,
    /// Treat remote failures as "no versions advertised"
    pub lenient: bool,
    pub timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: None,
            lenient: false,
            timeout_ms: FETCH_TIMEOUT_MS,
        }
    }
}

impl CheckerConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Builder wired with the default sources and comparator for this configuration
    pub fn builder(&self) -> Result<UpdateCheckerBuilder, ConfigError> {
        let url = self
            .remote
            .url
            .as_deref()
            .ok_or(ConfigError::MissingRemoteUrl)?;
        let timeout = Duration::from_millis(self.remote.timeout_ms);
        let remote = RemoteConfigSource::with_timeout(url, self.platform, timeout);

        let mut comparator = PlatformComparator::new(self.platform);
        if let Some(display_version) = &self.display_version {
            comparator = comparator.with_display_version(display_version.clone());
        }

        let mut builder = UpdateChecker::builder()
            .comparator(comparator)
            .interval(self.interval);

        builder = if self.remote.lenient {
            builder.remote(Lenient::new(remote))
        } else {
            builder.remote(remote)
        };

        builder = match (&self.version, &self.version_file) {
            (Some(version), _) => builder.version(version.clone()),
            (None, Some(path)) => builder.local(FileVersionSource::new(path)),
            (None, None) => return Err(ConfigError::MissingLocalVersion),
        };

        Ok(builder)
    }
}

/// Returns the path to the data directory for update-checker.
/// Uses $XDG_DATA_HOME/update-checker if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/update-checker,
/// or ./update-checker if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("update-checker.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("update-checker")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn checker_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<CheckerConfig>(json!({
            "remote": {
                "url": "https://example.com/config.json"
            }
        }))
        .unwrap();

        assert_eq!(result.interval, Interval::Once);
        assert_eq!(result.version, None);
        assert_eq!(result.platform, Platform::current());
        assert_eq!(result.remote.timeout_ms, FETCH_TIMEOUT_MS);
        assert!(!result.remote.lenient);
    }

    #[test]
    fn checker_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<CheckerConfig>(json!({
            "interval": 60000,
            "version": 2400,
            "displayVersion": "2.4.0",
            "platform": "android",
            "versionFile": "/opt/app/VERSION",
            "remote": {
                "url": "https://example.com/config.json",
                "lenient": true,
                "timeoutMs": 5000
            }
        }))
        .unwrap();

        assert_eq!(
            result,
            CheckerConfig {
                interval: Interval::Every(Duration::from_secs(60)),
                version: Some(VersionValue::Build(2400)),
                display_version: Some("2.4.0".to_string()),
                platform: Platform::Android,
                version_file: Some(PathBuf::from("/opt/app/VERSION")),
                remote: RemoteConfig {
                    url: Some("https://example.com/config.json".to_string()),
                    lenient: true,
                    timeout_ms: 5000,
                },
            }
        );
    }

    #[test]
    fn null_interval_disables_periodic_checks() {
        let result = serde_json::from_value::<CheckerConfig>(json!({ "interval": null })).unwrap();
        assert_eq!(result.interval, Interval::Disabled);
    }

    #[test]
    fn load_reads_json_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("update-checker.json");
        std::fs::write(&path, r#"{"version": "1.0.0", "platform": "ios"}"#).unwrap();

        let result = CheckerConfig::load(&path).unwrap();

        assert_eq!(result.version, Some(VersionValue::from("1.0.0")));
        assert_eq!(result.platform, Platform::Ios);
    }

    #[test]
    fn load_reports_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = CheckerConfig::load(&temp_dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn builder_requires_remote_url() {
        let config = CheckerConfig {
            version: Some(VersionValue::from("1.0.0")),
            ..Default::default()
        };
        assert!(matches!(config.builder(), Err(ConfigError::MissingRemoteUrl)));
    }

    #[test]
    fn builder_requires_local_version() {
        let config = CheckerConfig {
            remote: RemoteConfig {
                url: Some("http://localhost/config.json".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.builder(),
            Err(ConfigError::MissingLocalVersion)
        ));
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/update-checker"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.local/share/update-checker"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./update-checker"));
    }
}
