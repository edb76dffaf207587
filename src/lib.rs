// GitHub data gateway for portfolio sites.
// Serves a user's profile, repositories, and releases with graceful degradation.

pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod github;
pub mod source;

pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use gateway::{Gateway, ReleaseMode, SnapshotSource, StaticSnapshot};
pub use github::{Profile, Release, Repository};
pub use source::{DataSource, Resolved};
