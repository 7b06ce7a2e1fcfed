//! Default capability implementations

pub mod local;
pub mod remote_config;

pub use local::{FileVersionSource, FixedVersion};
pub use remote_config::{Lenient, RemoteConfigSource};
