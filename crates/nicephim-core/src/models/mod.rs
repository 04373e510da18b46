//! Data models for the application
//!
//! Wire types for the nicephim backend, organized by endpoint group. Field names
//! follow the backend's JSON (camelCase, except the auth payloads).

mod envelope;
mod genre;
mod image;
mod movie;
mod user;
mod video;

// Re-export all models for convenient imports
pub use envelope::*;
pub use genre::*;
pub use image::*;
pub use movie::*;
pub use user::*;
pub use video::*;
