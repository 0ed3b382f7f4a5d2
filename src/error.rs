//! Error types for the Nature Remo MCP server
//!
//! The scoping layer and the vendor client raise these errors untouched.
//! Turning them into user-facing tool results happens once, at the tool
//! boundary (see [`crate::tools`]).

use thiserror::Error;

/// Result type alias for Nature Remo operations
pub type Result<T> = std::result::Result<T, RemoError>;

/// Error types for Nature Remo MCP operations
#[derive(Error, Debug)]
pub enum RemoError {
    /// The requested hub device is not visible to this access token
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// The appliance id is not linked to the requested hub device
    #[error("Appliance not found in specified device: {0}")]
    ApplianceNotFound(String),

    /// No appliance of the requested hub device owns this signal id
    #[error("Signal not found in specified device: {0}")]
    SignalNotFound(String),

    /// Appliance name lookup matched zero or several appliances
    #[error("Appliance not found or ambiguous in device: {0}")]
    ApplianceNameUnresolved(String),

    /// Signal name lookup matched zero or several signals
    #[error("Signal not found or ambiguous: {0}")]
    SignalNameUnresolved(String),

    /// Non-success response from the Nature Remo API
    #[error("Nature Remo API request failed: {status}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing errors
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input errors
    #[error("{0}")]
    InvalidInput(String),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

/// Structured error code for machine-readable error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication errors (1100-1199)
    InvalidCredentials,
    PermissionDenied,

    // Configuration errors (1200-1299)
    ConfigurationInvalid,

    // Device errors (1300-1399)
    DeviceNotFound,
    ApplianceNotFound,
    SignalNotFound,
    NameUnresolved,

    // Data errors (1400-1499)
    ParsingFailed,
    InvalidInput,

    // Service errors (1600-1699)
    ExternalServiceError,
    ServiceUnavailable,

    // Internal errors (1900-1999)
    InternalError,
}

impl ErrorCode {
    /// Get numeric error code
    pub fn as_number(&self) -> u32 {
        match self {
            ErrorCode::InvalidCredentials => 1101,
            ErrorCode::PermissionDenied => 1103,

            ErrorCode::ConfigurationInvalid => 1202,

            ErrorCode::DeviceNotFound => 1301,
            ErrorCode::ApplianceNotFound => 1305,
            ErrorCode::SignalNotFound => 1306,
            ErrorCode::NameUnresolved => 1307,

            ErrorCode::ParsingFailed => 1401,
            ErrorCode::InvalidInput => 1402,

            ErrorCode::ExternalServiceError => 1603,
            ErrorCode::ServiceUnavailable => 1601,

            ErrorCode::InternalError => 1901,
        }
    }

    /// Get error category
    pub fn category(&self) -> &'static str {
        match self.as_number() {
            1100..=1199 => "authentication",
            1200..=1299 => "configuration",
            1300..=1399 => "device",
            1400..=1499 => "data",
            1600..=1699 => "service",
            1900..=1999 => "internal",
            _ => "unknown",
        }
    }
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Low severity - information only
    Info,
    /// Medium severity - warning condition
    Warning,
    /// High severity - error condition
    Error,
    /// Critical severity - immediate attention required
    Critical,
}

impl RemoError {
    /// Create a device-not-found error
    pub fn device_not_found<S: Into<String>>(id: S) -> Self {
        Self::DeviceNotFound(id.into())
    }

    /// Create an appliance-not-found error
    pub fn appliance_not_found<S: Into<String>>(id: S) -> Self {
        Self::ApplianceNotFound(id.into())
    }

    /// Create a signal-not-found error
    pub fn signal_not_found<S: Into<String>>(id: S) -> Self {
        Self::SignalNotFound(id.into())
    }

    /// Create an API error from a status code and response body
    pub fn api<S: Into<String>>(status: u16, body: S) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Generic(anyhow::anyhow!(msg.into()))
    }

    /// True for the lookup failures raised by the scoping layer and the name matcher
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            RemoError::DeviceNotFound(_)
                | RemoError::ApplianceNotFound(_)
                | RemoError::SignalNotFound(_)
                | RemoError::ApplianceNameUnresolved(_)
                | RemoError::SignalNameUnresolved(_)
        )
    }

    /// Map RemoError to structured error code
    pub fn to_error_code(&self) -> ErrorCode {
        match self {
            RemoError::DeviceNotFound(_) => ErrorCode::DeviceNotFound,
            RemoError::ApplianceNotFound(_) => ErrorCode::ApplianceNotFound,
            RemoError::SignalNotFound(_) => ErrorCode::SignalNotFound,
            RemoError::ApplianceNameUnresolved(_) | RemoError::SignalNameUnresolved(_) => {
                ErrorCode::NameUnresolved
            }
            RemoError::Api { status: 401, .. } => ErrorCode::InvalidCredentials,
            RemoError::Api { status: 403, .. } => ErrorCode::PermissionDenied,
            RemoError::Api { status, .. } if *status >= 500 => ErrorCode::ServiceUnavailable,
            RemoError::Api { .. } => ErrorCode::ExternalServiceError,
            RemoError::Http(_) => ErrorCode::ExternalServiceError,
            RemoError::Json(_) => ErrorCode::ParsingFailed,
            RemoError::Config(_) => ErrorCode::ConfigurationInvalid,
            RemoError::InvalidInput(_) => ErrorCode::InvalidInput,
            RemoError::Io(_) | RemoError::Generic(_) => ErrorCode::InternalError,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RemoError::Api {
                status: 401 | 403, ..
            } => ErrorSeverity::Critical,
            RemoError::Config(_) => ErrorSeverity::Error,
            RemoError::InvalidInput(_) => ErrorSeverity::Info,
            e if e.is_lookup_failure() => ErrorSeverity::Warning,
            RemoError::Http(_) | RemoError::Api { .. } => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            RemoError::Api { status, .. } => *status == 429 || *status >= 500,
            RemoError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Check if error indicates authentication issue
    pub fn is_auth_error(&self) -> bool {
        matches!(self, RemoError::Api { status: 401 | 403, .. })
    }
}

/// Error logging and reporting utilities
pub struct ErrorReporter;

impl ErrorReporter {
    /// Log an error with appropriate severity
    pub fn log_error(error: &RemoError, component: &str, operation: &str) {
        let code = error.to_error_code();

        match error.severity() {
            ErrorSeverity::Critical => {
                tracing::error!(
                    error_code = code.as_number(),
                    category = code.category(),
                    component,
                    operation,
                    retryable = error.is_retryable(),
                    "Critical error occurred: {}",
                    error
                );
            }
            ErrorSeverity::Error => {
                tracing::error!(
                    error_code = code.as_number(),
                    category = code.category(),
                    component,
                    operation,
                    "Error occurred: {}",
                    error
                );
            }
            ErrorSeverity::Warning => {
                tracing::warn!(
                    error_code = code.as_number(),
                    category = code.category(),
                    component,
                    operation,
                    "Warning: {}",
                    error
                );
            }
            ErrorSeverity::Info => {
                tracing::info!(
                    error_code = code.as_number(),
                    category = code.category(),
                    component,
                    operation,
                    "Info: {}",
                    error
                );
            }
        }
    }
}
