//! Error types module
//!
//! All failures of the ingestion pipeline are unified under [`AppError`]. Each variant
//! describes itself through [`ErrorMetadata`] so the transport layer can map it to a
//! status code and a client-safe message without matching on variants itself.
//!
//! The `Database` variant carries a `sqlx::Error` when the `sqlx` feature is enabled
//! (the default) and a plain message otherwise.

use std::io;
use std::time::Duration;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Level an error is logged at when it reaches the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Client mistakes: validation, unknown ids
    Debug,
    /// Rejected content and deadline overruns
    Warn,
    Error,
}

/// Presentation of an error to clients.
pub trait ErrorMetadata {
    fn http_status_code(&self) -> u16;

    /// Stable machine-readable code, e.g. `"DATABASE_ERROR"`.
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same request may succeed.
    fn is_recoverable(&self) -> bool;

    fn suggested_action(&self) -> Option<&'static str>;

    /// Message safe to return to the client.
    fn client_message(&self) -> String;

    /// Sensitive errors never expose their details.
    fn is_sensitive(&self) -> bool;

    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Image decode error: {0}")]
    ImageDecode(String),

    #[error("{operation} exceeded its deadline of {after_ms} ms")]
    Timeout {
        operation: &'static str,
        after_ms: u64,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Deadline overrun for a named unit of work.
    pub fn timeout(operation: &'static str, after: Duration) -> Self {
        AppError::Timeout {
            operation,
            after_ms: after.as_millis() as u64,
        }
    }
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Storage(format!("IO error: {}", err))
    }
}

/// How a variant presents itself to clients and logs.
#[derive(Debug, Clone, Copy)]
struct ErrorProfile {
    status: u16,
    code: &'static str,
    recoverable: bool,
    action: Option<&'static str>,
    sensitive: bool,
    level: LogLevel,
}

const RETRY_LATER: Option<&str> = Some("Retry after a short delay");

impl AppError {
    fn profile(&self) -> ErrorProfile {
        match self {
            AppError::Database(_) => ErrorProfile {
                status: 500,
                code: "DATABASE_ERROR",
                recoverable: true,
                action: RETRY_LATER,
                sensitive: true,
                level: LogLevel::Error,
            },
            AppError::Storage(_) => ErrorProfile {
                status: 500,
                code: "STORAGE_ERROR",
                recoverable: true,
                action: RETRY_LATER,
                sensitive: true,
                level: LogLevel::Error,
            },
            AppError::ImageDecode(_) => ErrorProfile {
                status: 422,
                code: "IMAGE_DECODE_ERROR",
                recoverable: false,
                action: Some("Upload a JPEG, PNG, GIF, WebP, BMP, TIFF or ICO file"),
                sensitive: false,
                level: LogLevel::Warn,
            },
            AppError::Timeout { .. } => ErrorProfile {
                status: 504,
                code: "DEADLINE_EXCEEDED",
                recoverable: false,
                action: Some("Try a smaller image"),
                sensitive: false,
                level: LogLevel::Warn,
            },
            AppError::InvalidInput(_) => ErrorProfile {
                status: 400,
                code: "INVALID_INPUT",
                recoverable: false,
                action: Some("Send a non-empty file with a filename"),
                sensitive: false,
                level: LogLevel::Debug,
            },
            AppError::NotFound(_) => ErrorProfile {
                status: 404,
                code: "NOT_FOUND",
                recoverable: false,
                action: None,
                sensitive: false,
                level: LogLevel::Debug,
            },
            AppError::PayloadTooLarge(_) => ErrorProfile {
                status: 413,
                code: "PAYLOAD_TOO_LARGE",
                recoverable: false,
                action: Some("Reduce the file size below the upload limit"),
                sensitive: false,
                level: LogLevel::Debug,
            },
            AppError::Internal(_) | AppError::InternalWithSource { .. } => ErrorProfile {
                status: 500,
                code: "INTERNAL_ERROR",
                recoverable: true,
                action: RETRY_LATER,
                sensitive: true,
                level: LogLevel::Error,
            },
        }
    }

    /// Variant name, shown in non-production error bodies.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Database(_) => "Database",
            AppError::Storage(_) => "Storage",
            AppError::ImageDecode(_) => "ImageDecode",
            AppError::Timeout { .. } => "Timeout",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::NotFound(_) => "NotFound",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Display text followed by up to five `Caused by` lines from the source chain.
    pub fn detailed_message(&self) -> String {
        const MAX_DEPTH: usize = 5;

        let mut details = self.to_string();
        let mut chain = std::iter::successors(std::error::Error::source(self), |e| e.source());
        for cause in chain.by_ref().take(MAX_DEPTH) {
            details.push_str(&format!("\n  Caused by: {}", cause));
        }
        if chain.next().is_some() {
            details.push_str("\n  ... (truncated)");
        }
        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        self.profile().status
    }

    fn error_code(&self) -> &'static str {
        self.profile().code
    }

    fn is_recoverable(&self) -> bool {
        self.profile().recoverable
    }

    fn suggested_action(&self) -> Option<&'static str> {
        self.profile().action
    }

    fn is_sensitive(&self) -> bool {
        self.profile().sensitive
    }

    fn log_level(&self) -> LogLevel {
        self.profile().level
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Storage(_) => "Failed to access storage".to_string(),
            AppError::Timeout { operation, .. } => {
                format!("{} did not finish in time", operation)
            }
            AppError::ImageDecode(msg)
            | AppError::InvalidInput(msg)
            | AppError::NotFound(msg)
            | AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}
