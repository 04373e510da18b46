//! Error types module
//!
//! All failures seen by the client are unified under [`ClientError`]. Every error
//! is terminal for the operation that produced it: nothing is retried, and the
//! owner decides whether to start over.

use std::io;

use crate::constants::{
    CONNECTION_GUIDANCE, INVALID_RESPONSE, PROCESSING_ERROR_PREFIX, PROCESSING_TIMED_OUT,
    UNKNOWN_ERROR,
};

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for backend-reported failures
    Warn,
    /// Error level - for connectivity and protocol failures
    Error,
}

/// Describes how an error should be presented to the person driving the client.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "NETWORK_ERROR")
    fn error_code(&self) -> &'static str;

    /// Localized message suitable for display
    fn client_message(&self) -> String;

    /// HTTP status that caused the error, if any
    fn http_status(&self) -> Option<u16>;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response (connection refused, DNS, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The body was not valid JSON or did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A `{success: false, error}` envelope.
    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("An upload is already in progress")]
    Busy,

    /// The backend reported `FAILED` for a video job; carries the job log.
    #[error("Video processing failed: {0}")]
    ProcessingFailed(String),

    #[error("Status polling gave up after {attempts} attempts")]
    PollTimeout { attempts: u32 },

    #[error("Session error: {0}")]
    Session(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(err: validator::ValidationErrors) -> Self {
        ClientError::InvalidInput(format!("Validation error: {}", err))
    }
}

/// Static metadata for each variant: (error_code, log_level).
fn client_error_static_metadata(err: &ClientError) -> (&'static str, LogLevel) {
    match err {
        ClientError::Network(_) => ("NETWORK_ERROR", LogLevel::Error),
        ClientError::Http { .. } => ("HTTP_ERROR", LogLevel::Warn),
        ClientError::Decode(_) => ("DECODE_ERROR", LogLevel::Error),
        ClientError::Api(_) => ("API_ERROR", LogLevel::Warn),
        ClientError::InvalidInput(_) => ("INVALID_INPUT", LogLevel::Debug),
        ClientError::InvalidState(_) => ("INVALID_STATE", LogLevel::Debug),
        ClientError::Busy => ("UPLOAD_BUSY", LogLevel::Debug),
        ClientError::ProcessingFailed(_) => ("PROCESSING_FAILED", LogLevel::Warn),
        ClientError::PollTimeout { .. } => ("POLL_TIMEOUT", LogLevel::Warn),
        ClientError::Session(_) => ("SESSION_ERROR", LogLevel::Error),
        ClientError::Io(_) => ("IO_ERROR", LogLevel::Error),
    }
}

impl ErrorMetadata for ClientError {
    fn error_code(&self) -> &'static str {
        client_error_static_metadata(self).0
    }

    fn log_level(&self) -> LogLevel {
        client_error_static_metadata(self).1
    }

    fn http_status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    fn client_message(&self) -> String {
        match self {
            ClientError::Network(_) => CONNECTION_GUIDANCE.to_string(),
            ClientError::Decode(_) => INVALID_RESPONSE.to_string(),
            ClientError::Http { message, .. } => message.clone(),
            ClientError::Api(ref msg) => msg.clone(),
            ClientError::InvalidInput(ref msg) => msg.clone(),
            ClientError::InvalidState(ref msg) => msg.clone(),
            ClientError::Busy => "Đang upload video, vui lòng chờ".to_string(),
            ClientError::ProcessingFailed(ref log) => {
                let log = if log.is_empty() { "Unknown error" } else { log };
                format!("{}: {}", PROCESSING_ERROR_PREFIX, log)
            }
            ClientError::PollTimeout { .. } => PROCESSING_TIMED_OUT.to_string(),
            ClientError::Session(_) => UNKNOWN_ERROR.to_string(),
            ClientError::Io(ref err) => err.to_string(),
        }
    }
}
