use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Model files not found: {path}")]
    ArtifactNotFound { path: String },

    #[error("Invalid {artifact} artifact: {message}")]
    InvalidArtifact { artifact: String, message: String },

    #[error("Model not loaded")]
    ModelNotLoaded,

    #[error("All fields are required")]
    MissingFields { fields: Vec<String> },

    #[error("Invalid value for {field}: {message}")]
    InvalidInput { field: String, message: String },

    // 轉換與預測錯誤原樣回傳訊息
    #[error("{message}")]
    TransformError { message: String },

    #[error("{message}")]
    PredictionError { message: String },

    #[error("Server error: {message}")]
    ServerError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Artifact,
    Input,
    Inference,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PredictorError {
    pub fn invalid_artifact(artifact: &str, message: impl Into<String>) -> Self {
        Self::InvalidArtifact {
            artifact: artifact.to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::ArtifactNotFound { .. }
            | Self::InvalidArtifact { .. }
            | Self::ModelNotLoaded => ErrorCategory::Artifact,
            Self::MissingFields { .. } | Self::InvalidInput { .. } | Self::CsvError(_) => {
                ErrorCategory::Input
            }
            Self::TransformError { .. } | Self::PredictionError { .. } => ErrorCategory::Inference,
            Self::IoError(_) | Self::SerializationError(_) | Self::ServerError { .. } => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Inference => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Artifact => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ArtifactNotFound { .. } | Self::ModelNotLoaded => {
                "Please run salary_prediction_model.py first to train and export the model."
            }
            Self::InvalidArtifact { .. } => {
                "Re-export the model artifacts; the files are incomplete or inconsistent."
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Check the configuration file and command-line flags."
            }
            Self::MissingFields { .. } | Self::InvalidInput { .. } => {
                "Provide age, years_experience, gender, education_level and job_title."
            }
            Self::CsvError(_) => "Check that the CSV file has a header row and consistent columns.",
            Self::TransformError { .. } | Self::PredictionError { .. } => {
                "Check that the input values match the categories the model was trained on."
            }
            Self::IoError(_) | Self::SerializationError(_) | Self::ServerError { .. } => {
                "Check file permissions and that the port is not already in use."
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Artifact => format!("Model problem: {}", self),
            ErrorCategory::Input => format!("Input problem: {}", self),
            ErrorCategory::Inference => format!("Prediction failed: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, PredictorError>;
