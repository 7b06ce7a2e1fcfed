//! Common types shared by sources, comparators and the checker

use std::fmt;

use serde::{Deserialize, Serialize};

/// A version identifier as reported by the app or the remote source.
///
/// Build numbers arrive as JSON numbers, readable versions (`1.2.3`) as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionValue {
    Build(u64),
    Text(String),
}

impl VersionValue {
    /// Parse user or file input: purely numeric text becomes a build number
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        match input.parse::<u64>() {
            Ok(build) => VersionValue::Build(build),
            Err(_) => VersionValue::Text(input.to_string()),
        }
    }

    /// Returns the value as a build number, parsing textual values when possible
    pub fn as_build_number(&self) -> Option<u64> {
        match self {
            VersionValue::Build(n) => Some(*n),
            VersionValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// True when the value carries no information (an empty string)
    pub fn is_blank(&self) -> bool {
        matches!(self, VersionValue::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for VersionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionValue::Build(n) => write!(f, "{}", n),
            VersionValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for VersionValue {
    fn from(n: u64) -> Self {
        VersionValue::Build(n)
    }
}

impl From<&str> for VersionValue {
    fn from(s: &str) -> Self {
        VersionValue::Text(s.to_string())
    }
}

impl From<String> for VersionValue {
    fn from(s: String) -> Self {
        VersionValue::Text(s)
    }
}

/// Platform whose versioning rules apply to comparison and remote keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Dotted readable versions compared as weighted integers
    Ios,
    /// Integer build numbers
    Android,
    /// Semantic versions
    Desktop,
}

impl Platform {
    /// Platform of the build target
    pub fn current() -> Self {
        if cfg!(target_os = "ios") {
            Platform::Ios
        } else if cfg!(target_os = "android") {
            Platform::Android
        } else {
            Platform::Desktop
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
            Platform::Desktop => "desktop",
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

/// Outcome classification of a completed check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateStatus {
    /// Local version is below the required version; the update is mandatory
    Required,
    /// A newer version exists but updating is optional
    Latest,
    /// Local version is up to date
    None,
}

impl UpdateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateStatus::Required => "required",
            UpdateStatus::Latest => "latest",
            UpdateStatus::None => "none",
        }
    }
}

/// Update state as observed by consumers; `Unresolved` until a check succeeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UpdateState {
    Required,
    Latest,
    None,
    #[default]
    Unresolved,
}

impl From<UpdateStatus> for UpdateState {
    fn from(status: UpdateStatus) -> Self {
        match status {
            UpdateStatus::Required => UpdateState::Required,
            UpdateStatus::Latest => UpdateState::Latest,
            UpdateStatus::None => UpdateState::None,
        }
    }
}

/// Latest and required versions advertised by the remote source
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RemoteVersions {
    pub latest: Option<VersionValue>,
    pub required: Option<VersionValue>,
}

impl RemoteVersions {
    pub fn new(latest: impl Into<VersionValue>, required: impl Into<VersionValue>) -> Self {
        Self {
            latest: Some(latest.into()),
            required: Some(required.into()),
        }
    }
}

/// All three versions involved in one check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versions {
    pub local: VersionValue,
    pub latest: Option<VersionValue>,
    pub required: Option<VersionValue>,
}

impl Versions {
    pub fn new(local: VersionValue, remote: RemoteVersions) -> Self {
        Self {
            local,
            latest: remote.latest,
            required: remote.required,
        }
    }
}

/// Successful result of a check cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub status: UpdateStatus,
    pub versions: Versions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn version_value_parses_numbers_and_strings() {
        let remote: RemoteVersions = serde_json::from_value(json!({
            "latest": "1.4.0",
            "required": 120
        }))
        .unwrap();

        assert_eq!(remote.latest, Some(VersionValue::Text("1.4.0".to_string())));
        assert_eq!(remote.required, Some(VersionValue::Build(120)));
    }

    #[rstest]
    #[case(VersionValue::Build(42), Some(42))]
    #[case(VersionValue::from("42"), Some(42))]
    #[case(VersionValue::from(" 7 "), Some(7))]
    #[case(VersionValue::from("1.2.3"), None)]
    fn as_build_number_parses_numeric_text(
        #[case] value: VersionValue,
        #[case] expected: Option<u64>,
    ) {
        assert_eq!(value.as_build_number(), expected);
    }

    #[rstest]
    #[case("2400", VersionValue::Build(2400))]
    #[case(" 1.2.3\n", VersionValue::from("1.2.3"))]
    #[case("6.3-dev", VersionValue::from("6.3-dev"))]
    fn parse_detects_build_numbers(#[case] input: &str, #[case] expected: VersionValue) {
        assert_eq!(VersionValue::parse(input), expected);
    }

    #[test]
    fn update_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(UpdateStatus::Required).unwrap(),
            json!("required")
        );
        assert_eq!(UpdateStatus::Latest.as_str(), "latest");
        assert_eq!(UpdateState::from(UpdateStatus::None), UpdateState::None);
        assert_eq!(UpdateState::default(), UpdateState::Unresolved);
    }
}
