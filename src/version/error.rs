use thiserror::Error;

/// Failure while reading the local version or fetching remote versions
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompareError {
    #[error("Invalid version: {0}")]
    InvalidVersion(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct HookError(pub String);

/// Error of a check cycle, tagged with the step that failed
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Failed to read local version: {0}")]
    LocalVersion(#[source] SourceError),

    #[error("Failed to fetch remote versions: {0}")]
    RemoteVersions(#[source] SourceError),

    #[error("Failed to compare versions: {0}")]
    Compare(#[source] CompareError),

    #[error("Update state hook failed: {0}")]
    Hook(#[source] HookError),
}
