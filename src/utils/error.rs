use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

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

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Configuration,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl SchemaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SchemaError::IoError(_) => ErrorCategory::Io,
            SchemaError::SerializationError(_) | SchemaError::UrlError(_) => ErrorCategory::Data,
            SchemaError::ConfigError { .. }
            | SchemaError::ConfigValidationError { .. }
            | SchemaError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            SchemaError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Io => ErrorSeverity::Critical,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Processing => ErrorSeverity::Medium,
        }
    }

    /// 根據錯誤嚴重程度決定退出碼，一律非零
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SchemaError::IoError(_) => "Check that the input directory exists and the output directory is writable",
            SchemaError::SerializationError(_) => "Check the profile for values that cannot be represented as JSON",
            SchemaError::UrlError(_) => "Use an absolute http(s) URL such as https://www.example.com",
            SchemaError::ConfigError { .. }
            | SchemaError::ConfigValidationError { .. }
            | SchemaError::InvalidConfigValueError { .. } => "Fix the profile TOML or command line arguments and retry",
            SchemaError::ProcessingError { .. } => "Re-save the reported page as UTF-8 and retry",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("Could not read or write site files: {}", self),
            ErrorCategory::Data => format!("Could not build structured data: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Processing => format!("Page processing failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;
