//! Default version comparison
//!
//! Development builds (versions with anything but ASCII digits and dots) are never
//! asked to update. Otherwise the platform decides how versions are ordered:
//! - iOS: dotted versions converted to a weighted integer
//! - Android: integer build numbers
//! - Desktop: semantic versions, partial versions padded with zeros

use regex::Regex;
use tracing::debug;

use crate::version::error::CompareError;
use crate::version::semver::{parse_version, weighted_value};
use crate::version::source::UpdateComparator;
use crate::version::types::{Platform, UpdateStatus, VersionValue, Versions};

/// Decision rule shared by every platform once versions are comparable
pub fn classify<T: Ord>(local: &T, latest: &T, required: &T) -> UpdateStatus {
    if local < required {
        UpdateStatus::Required
    } else if local < latest {
        UpdateStatus::Latest
    } else {
        UpdateStatus::None
    }
}

pub struct PlatformComparator {
    platform: Platform,
    display_version: Option<String>,
    numeric_re: Regex,
}

impl PlatformComparator {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            display_version: None,
            numeric_re: Regex::new(r"^[0-9]+(\.[0-9]+)*$").unwrap(),
        }
    }

    /// Use the human readable version for the development build check.
    ///
    /// Android compares build numbers, but the development marker (e.g. `6.3-dev`)
    /// lives in the readable version name.
    pub fn with_display_version(mut self, display_version: impl Into<String>) -> Self {
        self.display_version = Some(display_version.into());
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    fn is_release_version(&self, local: &VersionValue) -> bool {
        let guard = match &self.display_version {
            Some(display) => display.clone(),
            None => local.to_string(),
        };
        self.numeric_re.is_match(&guard)
    }

    /// Synchronous comparison used by the async trait implementation
    pub fn status(&self, versions: &Versions) -> Result<UpdateStatus, CompareError> {
        if !self.is_release_version(&versions.local) {
            debug!("Local version {} is not a release version", versions.local);
            return Ok(UpdateStatus::None);
        }

        let (Some(latest), Some(required)) = (&versions.latest, &versions.required) else {
            return Ok(UpdateStatus::None);
        };
        if latest.is_blank() || required.is_blank() {
            return Ok(UpdateStatus::None);
        }

        let local = &versions.local;
        match self.platform {
            Platform::Ios => {
                let value = |v: &VersionValue| {
                    weighted_value(&v.to_string())
                        .ok_or_else(|| CompareError::InvalidVersion(v.to_string()))
                };
                Ok(classify(&value(local)?, &value(latest)?, &value(required)?))
            }
            Platform::Android => {
                let value = |v: &VersionValue| {
                    v.as_build_number()
                        .ok_or_else(|| CompareError::InvalidVersion(v.to_string()))
                };
                Ok(classify(&value(local)?, &value(latest)?, &value(required)?))
            }
            Platform::Desktop => {
                let value = |v: &VersionValue| {
                    parse_version(&v.to_string())
                        .ok_or_else(|| CompareError::InvalidVersion(v.to_string()))
                };
                Ok(classify(&value(local)?, &value(latest)?, &value(required)?))
            }
        }
    }
}

impl Default for PlatformComparator {
    fn default() -> Self {
        Self::new(Platform::current())
    }
}

#[async_trait::async_trait]
impl UpdateComparator for PlatformComparator {
    async fn compare(&self, versions: &Versions) -> Result<UpdateStatus, CompareError> {
        self.status(versions)
    }
}
