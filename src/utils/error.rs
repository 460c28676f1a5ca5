use crate::domain::model::SourceKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SitemapError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("GraphQL query failed: {messages}")]
    GraphQlError { messages: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("Failed to fetch {kind}: {cause}")]
    SourceFailed {
        kind: SourceKind,
        #[source]
        cause: Box<SitemapError>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid configuration in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Api,
    Data,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Likely transient; rerunning may succeed.
    Medium,
    High,
    /// Local system problem (disk, permissions).
    Critical,
}

impl SitemapError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SitemapError::ApiError(_) | SitemapError::HttpStatus { .. } => ErrorCategory::Network,
            SitemapError::GraphQlError { .. } | SitemapError::MalformedResponse { .. } => {
                ErrorCategory::Api
            }
            SitemapError::SourceFailed { cause, .. } => cause.category(),
            SitemapError::IoError(_) => ErrorCategory::Storage,
            SitemapError::SerializationError(_)
            | SitemapError::XmlError(_)
            | SitemapError::ValidationError { .. } => ErrorCategory::Data,
            SitemapError::ConfigError { .. }
            | SitemapError::MissingConfigError { .. }
            | SitemapError::InvalidConfigValueError { .. }
            | SitemapError::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Api | ErrorCategory::Data | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SitemapError::HttpStatus { status: 401, .. }
            | SitemapError::HttpStatus { status: 403, .. } => {
                "Check that the storefront access token is valid and has read access to products and collections"
            }
            SitemapError::SourceFailed { cause, .. } => cause.recovery_suggestion(),
            _ => match self.category() {
                ErrorCategory::Network => {
                    "Check network connectivity and the store domain, then rerun"
                }
                ErrorCategory::Api => {
                    "Check the API version and that the storefront schema matches the queries"
                }
                ErrorCategory::Data => "Inspect the source data for malformed records",
                ErrorCategory::Storage => {
                    "Check that the output directory exists and is writable"
                }
                ErrorCategory::Configuration => {
                    "Review the command-line flags, environment variables or config file"
                }
            },
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SitemapError::SourceFailed { kind, cause } => {
                format!(
                    "Could not fetch {}; no sitemap was written ({})",
                    kind, cause
                )
            }
            SitemapError::IoError(e) => format!("Could not write the sitemap: {}", e),
            SitemapError::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
            other => other.to_string(),
        }
    }

    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, SitemapError>;
