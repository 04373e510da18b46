//! HTTP client for the nicephim backend.
//!
//! Provides a small reqwest-based client with generic JSON/multipart helpers,
//! endpoint methods for movies, genres, auth, images and videos, the video
//! status poller, the [`uploader::VideoUploader`] component and the client
//! [`session::Session`]. The CLI uses this crate directly.

pub mod api;
pub mod poller;
pub mod session;
pub mod uploader;

#[cfg(test)]
mod testing;

use nicephim_core::{ClientConfig, ClientError, ErrorMetadata, LogLevel};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// HTTP client for the nicephim backend.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// Error fields the backend puts in non-2xx bodies.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Map a reqwest failure onto the client taxonomy. Anything that kept us from
/// getting a response counts as a connectivity problem.
pub(crate) fn transport_error(err: reqwest::Error) -> ClientError {
    if err.is_decode() {
        ClientError::Decode(err.to_string())
    } else {
        ClientError::Network(err.to_string())
    }
}

/// Log a client error at the level its metadata asks for.
pub fn log_client_error(error: &ClientError, context: &str) {
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => tracing::debug!(error = %error, code, "{}", context),
        LogLevel::Warn => tracing::warn!(error = %error, code, "{}", context),
        LogLevel::Error => tracing::error!(error = %error, code, "{}", context),
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::with_timeout(config.api_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Make a backend-relative URL (e.g. `/videos/v1/master.m3u8`) absolute.
    /// Absolute URLs are returned unchanged.
    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            self.build_url(url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let mut request = self.client.get(self.build_url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        self.execute(request).await
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let request = self.client.post(self.build_url(path)).json(body);
        self.execute(request).await
    }

    /// PUT JSON body and deserialize response.
    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let request = self.client.put(self.build_url(path)).json(body);
        self.execute(request).await
    }

    /// POST without a body (link endpoints).
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let request = self.client.post(self.build_url(path));
        self.execute(request).await
    }

    /// POST multipart form and deserialize response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ClientError> {
        let request = self.client.post(self.build_url(path)).multipart(form);
        self.execute(request).await
    }

    /// DELETE request. The backend answers deletes with an envelope.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let request = self.client.delete(self.build_url(path));
        self.execute(request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Request to backend failed");
            transport_error(e)
        })?;

        let status = response.status();
        let url = response.url().to_string();
        let body = response.text().await.map_err(transport_error)?;
        tracing::debug!(%url, status = status.as_u16(), "API response");

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.or(b.message))
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| {
                    format!(
                        "Lỗi {}: {}",
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("Unknown error")
                    )
                });
            tracing::warn!(%url, status = status.as_u16(), %message, "API request failed");
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(%url, error = %e, "Response did not match expected shape");
            ClientError::Decode(e.to_string())
        })
    }
}

// Re-export domain types for convenience.
pub use api::videos::VideoBackend;
pub use nicephim_core::models::{
    GenreResponse, ImageKind, MoviePage, MovieResponse, UploadedImage, User,
    VideoProcessingStatus, VideoStatusResponse, VideoUploadResponse,
};
pub use poller::{start_polling, PollConfig, PollHandle, PollTick};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
pub use uploader::{UploadObserver, VideoUploader};
