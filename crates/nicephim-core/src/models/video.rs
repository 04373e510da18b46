use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Transcoding job status as reported by `GET /api/videos/{id}/status`.
///
/// Anything the backend sends besides the three known values (it uses
/// `UNKNOWN` for ids it has never seen) maps to [`VideoProcessingStatus::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VideoProcessingStatus {
    Processing,
    Ready,
    Failed,
    #[serde(other)]
    Unknown,
}

impl Display for VideoProcessingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            VideoProcessingStatus::Processing => write!(f, "PROCESSING"),
            VideoProcessingStatus::Ready => write!(f, "READY"),
            VideoProcessingStatus::Failed => write!(f, "FAILED"),
            VideoProcessingStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Response of `POST /api/videos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoUploadResponse {
    pub video_id: String,
    pub hls_url: String,
    pub status: Option<VideoProcessingStatus>,
}

/// Response of `GET /api/videos/{id}/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatusResponse {
    pub video_id: Option<String>,
    pub status: VideoProcessingStatus,
    pub hls_url: Option<String>,
    pub log: Option<String>,
}

impl VideoStatusResponse {
    /// The job log, with the backend's empty-string placeholder treated as absent.
    pub fn log_text(&self) -> Option<&str> {
        self.log.as_deref().filter(|l| !l.trim().is_empty())
    }
}
