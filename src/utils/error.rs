use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to load artifact '{path}': {message}")]
    ArtifactError { path: String, message: String },

    #[error("Missing required field: {field}")]
    MissingFieldError { field: String },

    #[error("Invalid input data: {message}")]
    InvalidInputError { message: String },

    #[error("Invalid arguments")]
    InvalidArguments,

    #[error("Inference failed: {message}")]
    InferenceError { message: String },

    #[error("Remote scoring service returned {status}: {detail}")]
    RemoteError { status: u16, detail: String },

    #[error("row {row}: {source}")]
    BatchRowError {
        row: usize,
        #[source]
        source: Box<ScoringError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Artifact,
    Input,
    Inference,
    Network,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScoringError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScoringError::ConfigError { .. }
            | ScoringError::ConfigValidationError { .. }
            | ScoringError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ScoringError::ArtifactError { .. } => ErrorCategory::Artifact,
            ScoringError::MissingFieldError { .. }
            | ScoringError::InvalidInputError { .. }
            | ScoringError::InvalidArguments
            | ScoringError::SerializationError(_)
            | ScoringError::CsvError(_) => ErrorCategory::Input,
            ScoringError::InferenceError { .. } => ErrorCategory::Inference,
            ScoringError::ApiError(_) | ScoringError::RemoteError { .. } => ErrorCategory::Network,
            ScoringError::IoError(_) => ErrorCategory::System,
            ScoringError::BatchRowError { source, .. } => source.category(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Inference => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Artifact | ErrorCategory::System => {
                ErrorSeverity::Critical
            }
        }
    }

    /// 是否為呼叫端輸入造成的錯誤 (HTTP 400)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Input | ErrorCategory::Inference
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ScoringError::MissingFieldError { .. } => {
                "Include every applicant field the model was trained on"
            }
            ScoringError::InvalidInputError { .. } | ScoringError::SerializationError(_) => {
                "Check that the payload is a JSON object with numeric and text fields"
            }
            ScoringError::InvalidArguments => "Pass the applicant as a single JSON string argument",
            ScoringError::CsvError(_) => "Check the CSV header matches the applicant field names",
            ScoringError::ArtifactError { .. } => {
                "Re-export the model and column artifacts and check the configured paths"
            }
            ScoringError::InferenceError { .. } => {
                "The input does not fit the model; check categorical values against the artifact"
            }
            ScoringError::ApiError(_) | ScoringError::RemoteError { .. } => {
                "Make sure the scoring API is running and reachable"
            }
            ScoringError::IoError(_) => "Check file permissions and available disk space",
            ScoringError::BatchRowError { source, .. } => source.recovery_suggestion(),
            ScoringError::ConfigError { .. }
            | ScoringError::ConfigValidationError { .. }
            | ScoringError::InvalidConfigValueError { .. } => {
                "Review credit-scoring.toml and the command-line flags"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Artifact => format!("Model could not be loaded: {}", self),
            ErrorCategory::Input => format!("The applicant data was rejected: {}", self),
            ErrorCategory::Inference => format!("Prediction failed: {}", self),
            ErrorCategory::Network => format!("Could not reach the scoring service: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }

    pub(crate) fn artifact(path: impl Into<String>, message: impl Into<String>) -> Self {
        ScoringError::ArtifactError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn invalid_arguments() -> Self {
        ScoringError::InvalidArguments
    }

    pub(crate) fn batch_row(row: usize, source: ScoringError) -> Self {
        ScoringError::BatchRowError {
            row,
            source: Box::new(source),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        ScoringError::InvalidInputError {
            message: message.into(),
        }
    }
}

impl From<toml::de::Error> for ScoringError {
    fn from(e: toml::de::Error) -> Self {
        ScoringError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoringError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_is_client_error() {
        let err = ScoringError::MissingFieldError {
            field: "age".to_string(),
        };
        assert_eq!(err.to_string(), "Missing required field: age");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert!(err.is_client_error());
    }

    #[test]
    fn test_artifact_error_is_critical() {
        let err = ScoringError::artifact("model.json", "not found");
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(!err.is_client_error());
        assert!(err.user_friendly_message().contains("model.json"));
    }

    #[test]
    fn test_batch_row_error_keeps_source_category() {
        let err = ScoringError::batch_row(
            2,
            ScoringError::MissingFieldError {
                field: "income".to_string(),
            },
        );
        assert_eq!(err.to_string(), "row 2: Missing required field: income");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(
            err.recovery_suggestion(),
            "Include every applicant field the model was trained on"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
