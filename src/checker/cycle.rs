//! One check cycle: local version, remote versions, comparison, hook

use std::sync::Arc;

use tracing::debug;

use crate::version::error::CheckError;
use crate::version::source::{
    LocalVersionSource, RemoteVersionSource, ResolutionHook, UpdateComparator,
};
use crate::version::types::{Resolution, Versions};

/// The injected strategies a checker runs its cycles with
#[derive(Clone)]
pub struct Capabilities {
    pub local: Arc<dyn LocalVersionSource>,
    pub remote: Arc<dyn RemoteVersionSource>,
    pub comparator: Arc<dyn UpdateComparator>,
    pub hook: Option<Arc<dyn ResolutionHook>>,
}

/// Run one check cycle.
///
/// Steps run strictly in sequence and the first failure ends the cycle.
/// A hook failure is reported as [`CheckError::Hook`]; the resolution is
/// not returned in that case.
pub async fn run_cycle(capabilities: &Capabilities) -> Result<Resolution, CheckError> {
    let local = capabilities
        .local
        .local_version()
        .await
        .map_err(CheckError::LocalVersion)?;
    debug!("Local version: {}", local);

    let remote = capabilities
        .remote
        .remote_versions()
        .await
        .map_err(CheckError::RemoteVersions)?;

    let versions = Versions::new(local, remote);
    let status = capabilities
        .comparator
        .compare(&versions)
        .await
        .map_err(CheckError::Compare)?;

    let resolution = Resolution { status, versions };

    if let Some(hook) = &capabilities.hook {
        hook.on_resolved(&resolution)
            .await
            .map_err(CheckError::Hook)?;
    }

    Ok(resolution)
}
