//! Observable checker state and its transitions

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::version::error::CheckError;
use crate::version::types::{Resolution, UpdateState, Versions};

/// Where the current check cycle stands
#[derive(Debug, Clone)]
pub enum Phase {
    Checking,
    Resolved(Resolution),
    Errored(Arc<CheckError>),
}

/// Events that move the checker between phases
#[derive(Debug)]
pub enum Event {
    /// Manual or periodic re-check: reset everything and start a new cycle
    Reload { at: DateTime<Utc> },
    /// Cycle `cycle` completed successfully
    Resolved { cycle: u64, resolution: Resolution },
    /// Cycle `cycle` failed
    Failed { cycle: u64, error: CheckError },
}

/// Snapshot of the checker, published to subscribers after every transition
#[derive(Debug, Clone)]
pub struct CheckState {
    phase: Phase,
    last_checked: DateTime<Utc>,
    cycle: u64,
}

impl CheckState {
    /// Initial state: the first cycle starts immediately
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            phase: Phase::Checking,
            last_checked: now,
            cycle: 0,
        }
    }

    /// Apply an event and return the next state.
    ///
    /// Results of a cycle other than the current one are ignored.
    pub fn apply(self, event: Event) -> Self {
        match event {
            Event::Reload { at } => Self {
                phase: Phase::Checking,
                last_checked: at.max(self.last_checked),
                cycle: self.cycle + 1,
            },
            Event::Resolved { cycle, resolution } if cycle == self.cycle => Self {
                phase: Phase::Resolved(resolution),
                ..self
            },
            Event::Failed { cycle, error } if cycle == self.cycle => Self {
                phase: Phase::Errored(Arc::new(error)),
                ..self
            },
            Event::Resolved { .. } | Event::Failed { .. } => self,
        }
    }

    /// Whether `event` belongs to a superseded cycle and would be ignored
    pub fn is_stale(&self, event: &Event) -> bool {
        match event {
            Event::Reload { .. } => false,
            Event::Resolved { cycle, .. } | Event::Failed { cycle, .. } => *cycle != self.cycle,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_checking(&self) -> bool {
        matches!(self.phase, Phase::Checking)
    }

    pub fn update_state(&self) -> UpdateState {
        match &self.phase {
            Phase::Resolved(resolution) => resolution.status.into(),
            Phase::Checking | Phase::Errored(_) => UpdateState::Unresolved,
        }
    }

    pub fn error(&self) -> Option<&CheckError> {
        match &self.phase {
            Phase::Errored(error) => Some(error.as_ref()),
            Phase::Checking | Phase::Resolved(_) => None,
        }
    }

    pub fn versions(&self) -> Option<&Versions> {
        match &self.phase {
            Phase::Resolved(resolution) => Some(&resolution.versions),
            Phase::Checking | Phase::Errored(_) => None,
        }
    }

    pub fn last_checked(&self) -> DateTime<Utc> {
        self.last_checked
    }

    /// Number of the current cycle; 0 for the first check
    pub fn cycle(&self) -> u64 {
        self.cycle
    }
}

/// Serializable view of a [`CheckState`] for presentation layers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub is_checking: bool,
    pub update_state: UpdateState,
    pub error: Option<String>,
    pub last_checked: DateTime<Utc>,
    pub versions: Option<Versions>,
}

impl From<&CheckState> for StateSnapshot {
    fn from(state: &CheckState) -> Self {
        Self {
            is_checking: state.is_checking(),
            update_state: state.update_state(),
            error: state.error().map(|e| e.to_string()),
            last_checked: state.last_checked(),
            versions: state.versions().cloned(),
        }
    }
}
