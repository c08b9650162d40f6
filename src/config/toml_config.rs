use crate::core::scoring::{DEFAULT_HIGH_RISK_THRESHOLD, DEFAULT_LOW_RISK_THRESHOLD};
use crate::core::ConfigProvider;
use crate::utils::error::{Result, ScoringError};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "credit-scoring.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    pub model_path: String,
    pub columns_path: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            model_path: "artifacts/credit_scoring_model.json".to_string(),
            columns_path: "artifacts/model_columns.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub host: String,
    pub port: u16,
    /// Score through this REST API instead of loading the model locally.
    pub api_url: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            api_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub low_risk_threshold: f64,
    pub high_risk_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            low_risk_threshold: DEFAULT_LOW_RISK_THRESHOLD,
            high_risk_threshold: DEFAULT_HIGH_RISK_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default)]
    pub enabled: bool,
    pub log_format: Option<String>,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| ScoringError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// Explicit path, else `credit-scoring.toml` when present, else defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// 替換環境變數 (例如 ${MODEL_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ScoringError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn log_format(&self) -> LogFormat {
        self.monitoring
            .log_format
            .as_deref()
            .and_then(LogFormat::parse)
            .unwrap_or_default()
    }

    pub fn validate_config(&self) -> Result<()> {
        for (field, path) in [
            ("artifacts.model_path", &self.artifacts.model_path),
            ("artifacts.columns_path", &self.artifacts.columns_path),
        ] {
            validation::validate_path(field, path)?;
            validation::validate_file_extension(field, path, &["json"])?;
        }

        validation::validate_non_empty_string("server.host", &self.server.host)?;
        validation::validate_port("server.port", self.server.port)?;
        validation::validate_non_empty_string("dashboard.host", &self.dashboard.host)?;
        validation::validate_port("dashboard.port", self.dashboard.port)?;

        if let Some(api_url) = &self.dashboard.api_url {
            validation::validate_url("dashboard.api_url", api_url)?;
        }

        let low = self.scoring.low_risk_threshold;
        let high = self.scoring.high_risk_threshold;
        validation::validate_range("scoring.low_risk_threshold", low, 0.0, 1.0)?;
        validation::validate_range("scoring.high_risk_threshold", high, 0.0, 1.0)?;
        if low <= 0.0 || high >= 1.0 || low >= high {
            return Err(ScoringError::InvalidConfigValueError {
                field: "scoring".to_string(),
                value: format!("{} / {}", low, high),
                reason: "Thresholds must satisfy 0 < low < high < 1".to_string(),
            });
        }

        if let Some(format) = &self.monitoring.log_format {
            if LogFormat::parse(format).is_none() {
                return Err(ScoringError::InvalidConfigValueError {
                    field: "monitoring.log_format".to_string(),
                    value: format.clone(),
                    reason: "Supported formats: compact, json".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn model_path(&self) -> &str {
        &self.artifacts.model_path
    }

    fn columns_path(&self) -> &str {
        &self.artifacts.columns_path
    }

    fn low_risk_threshold(&self) -> f64 {
        self.scoring.low_risk_threshold
    }

    fn high_risk_threshold(&self) -> f64 {
        self.scoring.high_risk_threshold
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
