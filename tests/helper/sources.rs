//! Capability test doubles

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use update_checker::version::error::{HookError, SourceError};
use update_checker::version::source::{LocalVersionSource, RemoteVersionSource, ResolutionHook};
use update_checker::version::types::{RemoteVersions, Resolution, VersionValue};

/// Local source returning a fixed value and counting calls
#[derive(Clone)]
pub struct FakeLocal {
    version: VersionValue,
    calls: Arc<AtomicUsize>,
}

impl FakeLocal {
    pub fn new(version: impl Into<VersionValue>) -> Self {
        Self {
            version: version.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocalVersionSource for FakeLocal {
    async fn local_version(&self) -> Result<VersionValue, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.version.clone())
    }
}

/// Remote source whose response can be changed between cycles.
///
/// With a gate, the first call waits until the gate is notified and then
/// answers with the response it saw when it was called.
#[derive(Clone)]
pub struct FakeRemote {
    response: Arc<Mutex<Result<RemoteVersions, String>>>,
    calls: Arc<AtomicUsize>,
    first_call_gate: Option<Arc<Notify>>,
}

impl FakeRemote {
    pub fn new(latest: u64, required: u64) -> Self {
        Self {
            response: Arc::new(Mutex::new(Ok(RemoteVersions::new(latest, required)))),
            calls: Arc::new(AtomicUsize::new(0)),
            first_call_gate: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        let remote = Self::new(0, 0);
        remote.set_failure(message);
        remote
    }

    pub fn with_first_call_gate(mut self, gate: Arc<Notify>) -> Self {
        self.first_call_gate = Some(gate);
        self
    }

    pub fn set_versions(&self, latest: u64, required: u64) {
        *self.response.lock().unwrap() = Ok(RemoteVersions::new(latest, required));
    }

    pub fn set_failure(&self, message: &str) {
        *self.response.lock().unwrap() = Err(message.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteVersionSource for FakeRemote {
    async fn remote_versions(&self) -> Result<RemoteVersions, SourceError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let response = self.response.lock().unwrap().clone();

        if call == 0 {
            if let Some(gate) = &self.first_call_gate {
                gate.notified().await;
            }
        }

        response.map_err(SourceError::Other)
    }
}

/// Hook recording every resolution it receives
#[derive(Clone, Default)]
pub struct RecordingHook {
    resolutions: Arc<Mutex<Vec<Resolution>>>,
    failure: Option<String>,
}

impl RecordingHook {
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn resolutions(&self) -> Vec<Resolution> {
        self.resolutions.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResolutionHook for RecordingHook {
    async fn on_resolved(&self, resolution: &Resolution) -> Result<(), HookError> {
        self.resolutions.lock().unwrap().push(resolution.clone());
        match &self.failure {
            Some(message) => Err(HookError(message.clone())),
            None => Ok(()),
        }
    }
}
