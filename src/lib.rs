pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod dashboard;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, CommonArgs};

pub use adapters::http::ApiClient;
pub use config::{cli::LocalArtifactStore, AppConfig};
pub use core::engine::CreditScorer;
pub use utils::error::{Result, ScoringError};
