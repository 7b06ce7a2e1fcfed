//! Version layer: types, capability traits and their default implementations
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │    Local    │────▶│  Versions   │◀────│   Remote    │
//! │  (app info) │     │             │     │  (config)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │
//!                            ▼
//!                     ┌─────────────┐
//!                     │ Comparator  │
//!                     │(status calc)│
//!                     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`source`]: Capability traits injected into the checker
//! - [`sources`]: Local version and remote-config implementations
//! - [`comparator`]: Default platform comparator
//! - [`error`]: Error types for sources, comparison and check cycles
//! - [`semver`]: Version parsing helpers
//! - [`types`]: Common types like `VersionValue` and `UpdateStatus`

pub mod comparator;
pub mod error;
pub mod semver;
pub mod source;
pub mod sources;
pub mod types;
