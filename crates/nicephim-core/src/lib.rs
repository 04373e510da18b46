//! Nicephim Core Library
//!
//! This crate provides the domain models, error types, configuration and the
//! video upload state machine shared by the nicephim API client and CLI.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod upload;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{ClientError, ErrorMetadata, LogLevel};
pub use upload::{SelectedFile, UploadState, UploadStatus};
