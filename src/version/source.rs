//! Capability traits injected into the checker
//!
//! A check cycle calls these in order: local version, remote versions,
//! comparison and finally the optional resolution hook.

#[cfg(test)]
use mockall::automock;

use crate::version::error::{CompareError, HookError, SourceError};
use crate::version::types::{RemoteVersions, Resolution, UpdateStatus, VersionValue, Versions};

/// Reads the version of the running app
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait LocalVersionSource: Send + Sync {
    async fn local_version(&self) -> Result<VersionValue, SourceError>;
}

/// Fetches the latest and required versions from a remote source
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait RemoteVersionSource: Send + Sync {
    /// # Returns
    /// * `Ok(RemoteVersions)` - Latest and required versions; either may be missing
    /// * `Err(SourceError)` - If the fetch fails
    async fn remote_versions(&self) -> Result<RemoteVersions, SourceError>;
}

/// Classifies the local version against the remote versions
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait UpdateComparator: Send + Sync {
    async fn compare(&self, versions: &Versions) -> Result<UpdateStatus, CompareError>;
}

/// Side effect run after a cycle resolves, before the result is published
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ResolutionHook: Send + Sync {
    async fn on_resolved(&self, resolution: &Resolution) -> Result<(), HookError>;
}
