//! Update checker service
//!
//! A single driver task owns the state. It starts the first cycle right away,
//! starts another on every `check_now()` or timer tick, and publishes each
//! new [`CheckState`] on a watch channel.

use std::sync::Arc;

use chrono::Utc;
use futures::FutureExt;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::checker::cycle::{Capabilities, run_cycle};
use crate::checker::interval::Interval;
use crate::checker::state::{CheckState, Event};
use crate::version::error::CheckError;
use crate::version::source::{
    LocalVersionSource, RemoteVersionSource, ResolutionHook, UpdateComparator,
};
use crate::version::sources::FixedVersion;
use crate::version::types::{Resolution, VersionValue};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Neither a local version source nor a fixed version was configured")]
    MissingLocalSource,

    #[error("No remote version source configured")]
    MissingRemoteSource,

    #[error("No comparator configured")]
    MissingComparator,
}

enum Command {
    CheckNow {
        started: Option<oneshot::Sender<u64>>,
    },
    SetInterval(Interval),
}

/// Configures and spawns an [`UpdateChecker`]
#[derive(Default)]
pub struct UpdateCheckerBuilder {
    local: Option<Arc<dyn LocalVersionSource>>,
    remote: Option<Arc<dyn RemoteVersionSource>>,
    comparator: Option<Arc<dyn UpdateComparator>>,
    hook: Option<Arc<dyn ResolutionHook>>,
    interval: Interval,
    version: Option<VersionValue>,
}

impl UpdateCheckerBuilder {
    pub fn local(mut self, source: impl LocalVersionSource + 'static) -> Self {
        self.local = Some(Arc::new(source));
        self
    }

    pub fn remote(mut self, source: impl RemoteVersionSource + 'static) -> Self {
        self.remote = Some(Arc::new(source));
        self
    }

    pub fn comparator(mut self, comparator: impl UpdateComparator + 'static) -> Self {
        self.comparator = Some(Arc::new(comparator));
        self
    }

    pub fn on_resolved(mut self, hook: impl ResolutionHook + 'static) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }

    pub fn interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    /// Fixed local version; when set the local source is never called.
    /// A blank version is ignored.
    pub fn version(mut self, version: impl Into<VersionValue>) -> Self {
        let version = version.into();
        self.version = (!version.is_blank()).then_some(version);
        self
    }

    fn into_parts(self) -> Result<(Capabilities, Interval), BuildError> {
        let local: Arc<dyn LocalVersionSource> = match (self.version, self.local) {
            (Some(version), _) => Arc::new(FixedVersion::new(version)),
            (None, Some(local)) => local,
            (None, None) => return Err(BuildError::MissingLocalSource),
        };
        let capabilities = Capabilities {
            local,
            remote: self.remote.ok_or(BuildError::MissingRemoteSource)?,
            comparator: self.comparator.ok_or(BuildError::MissingComparator)?,
            hook: self.hook,
        };
        Ok((capabilities, self.interval))
    }

    /// Spawn the checker on the current tokio runtime; the first cycle starts immediately
    pub fn spawn(self) -> Result<UpdateChecker, BuildError> {
        let (capabilities, interval) = self.into_parts()?;
        let initial = CheckState::new(Utc::now());
        let (state_tx, state_rx) = watch::channel(initial.clone());
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();

        let driver = Driver {
            capabilities: Arc::new(capabilities),
            state: initial,
            state_tx,
            cycles: FuturesUnordered::new(),
            timer: timer(interval),
        };
        info!("Starting update checker (interval: {:?})", interval);
        let task = tokio::spawn(driver.run(commands_rx));

        Ok(UpdateChecker {
            commands: commands_tx,
            state: state_rx,
            task: Some(task),
        })
    }
}

/// Handle to a running checker.
///
/// Dropping the handle stops the checker, its timer and any outstanding cycle.
pub struct UpdateChecker {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<CheckState>,
    task: Option<JoinHandle<()>>,
}

impl UpdateChecker {
    pub fn builder() -> UpdateCheckerBuilder {
        UpdateCheckerBuilder::default()
    }

    /// Current state snapshot
    pub fn state(&self) -> CheckState {
        self.state.borrow().clone()
    }

    /// Receiver that is notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<CheckState> {
        self.state.clone()
    }

    /// Reset the state and start a new cycle. Safe to call while checking.
    pub fn check_now(&self) {
        if self
            .commands
            .send(Command::CheckNow { started: None })
            .is_err()
        {
            warn!("Update checker is not running; ignoring check request");
        }
    }

    /// Start a new cycle and wait until it, or a later one, settles
    pub async fn refresh(&self) -> CheckState {
        let (started_tx, started_rx) = oneshot::channel();
        if self
            .commands
            .send(Command::CheckNow {
                started: Some(started_tx),
            })
            .is_err()
        {
            return self.state();
        }
        let Ok(cycle) = started_rx.await else {
            return self.state();
        };
        self.wait_for(|state| state.cycle() >= cycle && !state.is_checking())
            .await
    }

    /// Wait until the current cycle settles
    pub async fn settled(&self) -> CheckState {
        self.wait_for(|state| !state.is_checking()).await
    }

    /// Replace the periodic timer
    pub fn set_interval(&self, interval: Interval) {
        if self.commands.send(Command::SetInterval(interval)).is_err() {
            warn!("Update checker is not running; ignoring interval change");
        }
    }

    /// Stop the checker and wait for its task to finish
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }

    async fn wait_for(&self, predicate: impl FnMut(&CheckState) -> bool) -> CheckState {
        let mut state = self.state.clone();
        let result = state.wait_for(predicate).await.map(|s| s.clone());
        result.unwrap_or_else(|_| state.borrow().clone())
    }
}

impl Drop for UpdateChecker {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

type CycleFuture = BoxFuture<'static, (u64, Result<Resolution, CheckError>)>;

struct Driver {
    capabilities: Arc<Capabilities>,
    state: CheckState,
    state_tx: watch::Sender<CheckState>,
    cycles: FuturesUnordered<CycleFuture>,
    timer: Option<time::Interval>,
}

impl Driver {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        self.start_cycle();

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::CheckNow { started }) => {
                        let cycle = self.reload("manual check");
                        if let Some(started) = started {
                            let _ = started.send(cycle);
                        }
                    }
                    Some(Command::SetInterval(interval)) => {
                        info!("Update check interval changed to {:?}", interval);
                        self.timer = timer(interval);
                    }
                    None => break,
                },
                _ = tick(&mut self.timer) => {
                    self.reload("interval");
                }
                Some((cycle, result)) = self.cycles.next(), if !self.cycles.is_empty() => {
                    self.finish(cycle, result);
                }
            }
        }

        debug!("Update checker stopped");
    }

    fn start_cycle(&mut self) {
        let cycle = self.state.cycle();
        let capabilities = self.capabilities.clone();
        debug!("Starting check cycle {}", cycle);
        self.cycles
            .push(async move { (cycle, run_cycle(&capabilities).await) }.boxed());
    }

    fn reload(&mut self, reason: &str) -> u64 {
        self.state = self.state.clone().apply(Event::Reload { at: Utc::now() });
        info!("Reloading update state ({})", reason);
        self.publish();
        self.start_cycle();
        self.state.cycle()
    }

    fn finish(&mut self, cycle: u64, result: Result<Resolution, CheckError>) {
        let event = match result {
            Ok(resolution) => Event::Resolved { cycle, resolution },
            Err(error) => Event::Failed { cycle, error },
        };

        if self.state.is_stale(&event) {
            debug!(
                "Discarding result of cycle {}; cycle {} is current",
                cycle,
                self.state.cycle()
            );
            return;
        }

        match &event {
            Event::Resolved { resolution, .. } => info!(
                "Update state resolved: {} (local {}, latest {:?}, required {:?})",
                resolution.status.as_str(),
                resolution.versions.local,
                resolution.versions.latest,
                resolution.versions.required
            ),
            Event::Failed { error, .. } => warn!("Update check failed: {}", error),
            Event::Reload { .. } => {}
        }

        self.state = self.state.clone().apply(event);
        self.publish();
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.state.clone());
    }
}

fn timer(interval: Interval) -> Option<time::Interval> {
    interval.period().map(|period| {
        let mut timer = time::interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        timer
    })
}

async fn tick(timer: &mut Option<time::Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending().await,
    }
}
