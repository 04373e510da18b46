use async_trait::async_trait;
use nicephim_core::models::{VideoStatusResponse, VideoUploadResponse};
use nicephim_core::{ClientError, SelectedFile};

use super::segment;
use crate::{transport_error, ApiClient};

/// The two calls the upload lifecycle needs from the backend.
#[async_trait]
pub trait VideoBackend: Send + Sync {
    /// `POST /api/videos` with the file as multipart field `file`.
    async fn upload_video(&self, file: &SelectedFile) -> Result<VideoUploadResponse, ClientError>;

    /// `GET /api/videos/{video_id}/status`.
    async fn video_status(&self, video_id: &str) -> Result<VideoStatusResponse, ClientError>;
}

impl ApiClient {
    #[tracing::instrument(skip(self, file), fields(file = %file.name, size = file.size))]
    pub async fn upload_video(
        &self,
        file: &SelectedFile,
    ) -> Result<VideoUploadResponse, ClientError> {
        file.ensure_video()?;
        let buffer = tokio::fs::read(&file.path).await?;

        let part = reqwest::multipart::Part::bytes(buffer)
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .map_err(transport_error)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response: VideoUploadResponse = self.post_multipart("/api/videos", form).await?;
        tracing::info!(
            video_id = %response.video_id,
            hls_url = %response.hls_url,
            "Video accepted"
        );
        Ok(response)
    }

    pub async fn video_status(&self, video_id: &str) -> Result<VideoStatusResponse, ClientError> {
        self.get(&format!("/api/videos/{}/status", segment(video_id)), &[])
            .await
    }
}

#[async_trait]
impl VideoBackend for ApiClient {
    async fn upload_video(&self, file: &SelectedFile) -> Result<VideoUploadResponse, ClientError> {
        ApiClient::upload_video(self, file).await
    }

    async fn video_status(&self, video_id: &str) -> Result<VideoStatusResponse, ClientError> {
        ApiClient::video_status(self, video_id).await
    }
}
