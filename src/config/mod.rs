pub mod cli;
pub mod toml_config;

pub use toml_config::AppConfig;

#[cfg(feature = "cli")]
use clap::{Args, Parser};

/// Flags shared by every binary; they override values from the TOML file.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Path to TOML configuration file
    #[arg(short, long, env = "CREDIT_SCORING_CONFIG")]
    pub config: Option<String>,

    /// Serialized model artifact (JSON)
    #[arg(long, env = "CREDIT_SCORING_MODEL")]
    pub model_path: Option<String>,

    /// Expected-columns artifact (JSON)
    #[arg(long, env = "CREDIT_SCORING_COLUMNS")]
    pub columns_path: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log process CPU and memory usage
    #[arg(long)]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl CommonArgs {
    /// Loads the config file (if any) and applies command-line overrides.
    pub fn resolve(&self) -> crate::Result<AppConfig> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        if let Some(path) = &self.model_path {
            config.artifacts.model_path = path.clone();
        }
        if let Some(path) = &self.columns_path {
            config.artifacts.columns_path = path.clone();
        }
        if self.monitor {
            config.monitoring.enabled = true;
        }
        Ok(config)
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "credit-scoring")]
#[command(about = "Score a loan applicant with the credit-risk model")]
pub struct CliConfig {
    /// Applicant fields as a JSON object string
    pub input: Vec<String>,

    /// Score every row of a CSV file instead of a single JSON applicant
    #[arg(long, conflicts_with = "input")]
    pub batch: Option<String>,

    /// Write batch results here instead of stdout
    #[arg(short, long, requires = "batch")]
    pub output: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}
