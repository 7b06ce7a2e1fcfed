//! Update check state machine
//!
//! # Modules
//!
//! - [`state`]: Observable state and its pure transitions
//! - [`cycle`]: One check cycle over the injected capabilities
//! - [`interval`]: Periodic re-check setting
//! - [`service`]: Driver task and the [`UpdateChecker`] handle

pub mod cycle;
pub mod interval;
pub mod service;
pub mod state;

pub use cycle::Capabilities;
pub use interval::Interval;
pub use service::{BuildError, UpdateChecker, UpdateCheckerBuilder};
pub use state::{CheckState, Event, Phase, StateSnapshot};
