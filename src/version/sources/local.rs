//! Local version sources

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::version::error::SourceError;
use crate::version::source::LocalVersionSource;
use crate::version::types::VersionValue;

/// Local version known up front, e.g. `env!("CARGO_PKG_VERSION")`
#[derive(Debug, Clone)]
pub struct FixedVersion(VersionValue);

impl FixedVersion {
    pub fn new(version: impl Into<VersionValue>) -> Self {
        Self(version.into())
    }
}

#[async_trait::async_trait]
impl LocalVersionSource for FixedVersion {
    async fn local_version(&self) -> Result<VersionValue, SourceError> {
        Ok(self.0.clone())
    }
}

/// Reads the local version from a file written at build or install time.
///
/// Purely numeric contents are treated as a build number.
pub struct FileVersionSource {
    path: PathBuf,
}

impl FileVersionSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl LocalVersionSource for FileVersionSource {
    async fn local_version(&self) -> Result<VersionValue, SourceError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let version = content.trim();
        debug!("Read local version {:?} from {:?}", version, self.path);

        if version.is_empty() {
            return Err(SourceError::InvalidResponse(format!(
                "{} is empty",
                self.path.display()
            )));
        }

        Ok(VersionValue::parse(version))
    }
}
