//! In-memory backend used by the poller and uploader tests.

use async_trait::async_trait;
use nicephim_core::models::{VideoStatusResponse, VideoUploadResponse};
use nicephim_core::{ClientError, SelectedFile};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::api::videos::VideoBackend;

pub(crate) fn status(
    status: &str,
    hls_url: Option<&str>,
    log: Option<&str>,
) -> VideoStatusResponse {
    serde_json::from_value(serde_json::json!({
        "videoId": "v1",
        "status": status,
        "hlsUrl": hls_url,
        "log": log,
    }))
    .unwrap()
}

/// Answers uploads and status requests from queues. Once the status queue is
/// empty every request answers `PROCESSING`; an empty upload queue answers
/// `{videoId: "v1", hlsUrl: "/media/v1"}`.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    uploads: Mutex<VecDeque<Result<VideoUploadResponse, ClientError>>>,
    statuses: Mutex<VecDeque<Result<VideoStatusResponse, ClientError>>>,
    upload_delay: Option<Duration>,
    upload_calls: AtomicUsize,
    status_calls: AtomicUsize,
}

impl ScriptedBackend {
    pub(crate) fn with_statuses(statuses: Vec<Result<VideoStatusResponse, ClientError>>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            ..Self::default()
        }
    }

    pub(crate) fn with_upload(
        mut self,
        upload: Result<VideoUploadResponse, ClientError>,
    ) -> Self {
        self.uploads.get_mut().unwrap().push_back(upload);
        self
    }

    pub(crate) fn with_upload_delay(mut self, delay: Duration) -> Self {
        self.upload_delay = Some(delay);
        self
    }

    pub(crate) fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoBackend for ScriptedBackend {
    async fn upload_video(&self, _file: &SelectedFile) -> Result<VideoUploadResponse, ClientError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.upload_delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.uploads.lock().unwrap().pop_front();
        next.unwrap_or_else(|| {
            Ok(VideoUploadResponse {
                video_id: "v1".to_string(),
                hls_url: "/media/v1".to_string(),
                status: None,
            })
        })
    }

    async fn video_status(&self, _video_id: &str) -> Result<VideoStatusResponse, ClientError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.statuses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(status("PROCESSING", None, None)))
    }
}
