use thiserror::Error;

#[derive(Error, Debug)]
pub enum BadgerError {
    #[error("Not authorized: authenticate against the event API first")]
    Unauthorized,

    #[error("Remote service returned {status} for {endpoint}")]
    RemoteUnavailable { status: u16, endpoint: String },

    #[error("Badge template not found: {path}")]
    TemplateNotFound { path: String },

    #[error("Overrides file not found: {path}")]
    MissingOverrides { path: String },

    #[error("API request failed: {0}")]
    HttpError(#[source] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Barcode encoding failed: {0}")]
    BarcodeError(#[from] qrcode::types::QrError),

    #[error("Image encoding failed: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Template error: {message}")]
    TemplateError { message: String },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authorization,
    Remote,
    Configuration,
    Template,
    Rendering,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl BadgerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthorized => ErrorCategory::Authorization,
            Self::RemoteUnavailable { .. } | Self::HttpError(_) => ErrorCategory::Remote,
            Self::TemplateNotFound { .. } | Self::TemplateError { .. } => ErrorCategory::Template,
            Self::MissingOverrides { .. }
            | Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::BarcodeError(_) | Self::ImageError(_) | Self::ProcessingError { .. } => {
                ErrorCategory::Rendering
            }
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Remote | ErrorCategory::Authorization => ErrorSeverity::Medium,
            ErrorCategory::Rendering | ErrorCategory::System => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Template => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::Unauthorized => {
                "Check the api_key, email and password in the [yurplan] section".to_string()
            }
            Self::RemoteUnavailable { status, .. } if *status == 404 => {
                "Check that event_id and the ticket id exist on the event platform".to_string()
            }
            Self::RemoteUnavailable { .. } | Self::HttpError(_) => {
                "Check network access to the event API and try again later".to_string()
            }
            Self::TemplateNotFound { .. } => {
                "Pass --template or set badge.template to an existing SVG file".to_string()
            }
            Self::TemplateError { .. } => {
                "Use only {{ firstname }}, {{ lastname }}, {{ type }}, {{ token }} and {{ barcode }} in the template".to_string()
            }
            Self::MissingOverrides { .. } => {
                "Create the overrides file or remove the reference to it".to_string()
            }
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => {
                "Fix the configuration file and make sure referenced environment variables are set".to_string()
            }
            Self::IoError(_) => "Check that the output directory is writable".to_string(),
            Self::SerializationError(_) => {
                "The event API returned an unexpected payload; run with --verbose".to_string()
            }
            Self::BarcodeError(_) | Self::ImageError(_) | Self::ProcessingError { .. } => {
                "Inspect the offending ticket with ticket_show".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Authorization => format!("Authentication problem: {}", self),
            ErrorCategory::Remote => format!("Could not reach the event API: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Template => format!("Badge template problem: {}", self),
            ErrorCategory::Rendering => format!("Could not render a badge: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

/// Request URLs carry the API key and session token as query parameters.
impl From<reqwest::Error> for BadgerError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.without_url())
    }
}

pub type Result<T> = std::result::Result<T, BadgerError>;
