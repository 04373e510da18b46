//! Video upload lifecycle.
//!
//! [`UploadState`] is the value the admin upload screen renders. It moves
//! `idle -> uploading -> processing -> ready | error`; `reset` returns to `idle`
//! from anywhere. Transition methods refuse out-of-order moves instead of
//! silently overwriting state.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};

use crate::constants::{
    INVALID_VIDEO_FILE, PROCESSING, PROGRESS_AFTER_UPLOAD, PROGRESS_CAP, PROGRESS_STEP, READY,
    UPLOADING,
};
use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Idle,
    Uploading,
    Processing,
    Ready,
    Error,
}

impl UploadStatus {
    /// A transport call or poller is active.
    pub fn is_busy(&self) -> bool {
        matches!(self, UploadStatus::Uploading | UploadStatus::Processing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Ready | UploadStatus::Error)
    }
}

impl Display for UploadStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadStatus::Idle => write!(f, "idle"),
            UploadStatus::Uploading => write!(f, "uploading"),
            UploadStatus::Processing => write!(f, "processing"),
            UploadStatus::Ready => write!(f, "ready"),
            UploadStatus::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadState {
    pub status: UploadStatus,
    /// 0..=100
    pub progress: u8,
    pub message: String,
    pub video_id: Option<String>,
    pub hls_url: Option<String>,
}

impl Default for UploadState {
    fn default() -> Self {
        Self::idle()
    }
}

impl UploadState {
    pub fn idle() -> Self {
        Self {
            status: UploadStatus::Idle,
            progress: 0,
            message: String::new(),
            video_id: None,
            hls_url: None,
        }
    }

    fn require(&self, allowed: &[UploadStatus], to: UploadStatus) -> Result<(), ClientError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(ClientError::InvalidState(format!(
                "cannot move from {} to {}",
                self.status, to
            )))
        }
    }

    /// Record a newly chosen file. Only allowed while nothing is in flight.
    pub fn file_selected(&mut self, file: &SelectedFile) -> Result<(), ClientError> {
        if self.status.is_busy() {
            return Err(ClientError::Busy);
        }
        *self = Self::idle();
        self.message = file.summary();
        Ok(())
    }

    pub fn begin_upload(&mut self) -> Result<(), ClientError> {
        if self.status.is_busy() {
            return Err(ClientError::Busy);
        }
        self.require(&[UploadStatus::Idle], UploadStatus::Uploading)?;
        self.status = UploadStatus::Uploading;
        self.progress = 0;
        self.message = UPLOADING.to_string();
        Ok(())
    }

    pub fn upload_accepted(
        &mut self,
        video_id: impl Into<String>,
        hls_url: impl Into<String>,
    ) -> Result<(), ClientError> {
        self.require(&[UploadStatus::Uploading], UploadStatus::Processing)?;
        self.status = UploadStatus::Processing;
        self.progress = PROGRESS_AFTER_UPLOAD;
        self.message = PROCESSING.to_string();
        self.video_id = Some(video_id.into());
        self.hls_url = Some(hls_url.into());
        Ok(())
    }

    /// Backend still transcoding: nudge progress so the bar keeps moving.
    pub fn processing_tick(&mut self, log: Option<&str>) -> Result<(), ClientError> {
        self.require(&[UploadStatus::Processing], UploadStatus::Processing)?;
        self.progress = self.progress.saturating_add(PROGRESS_STEP).min(PROGRESS_CAP);
        self.message = match log {
            Some(log) => format!("Đang xử lý video... {}", log),
            None => "Đang xử lý video...".to_string(),
        };
        Ok(())
    }

    /// `hls_url` from the status response wins; the upload response's URL is kept otherwise.
    pub fn mark_ready(&mut self, hls_url: Option<String>) -> Result<(), ClientError> {
        self.require(&[UploadStatus::Processing], UploadStatus::Ready)?;
        self.status = UploadStatus::Ready;
        self.progress = 100;
        self.message = READY.to_string();
        if hls_url.is_some() {
            self.hls_url = hls_url;
        }
        Ok(())
    }

    pub fn mark_failed(&mut self, message: impl Into<String>) -> Result<(), ClientError> {
        self.require(
            &[UploadStatus::Uploading, UploadStatus::Processing],
            UploadStatus::Error,
        )?;
        self.status = UploadStatus::Error;
        self.progress = 0;
        self.message = message.into();
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::idle();
    }
}

/// A local file chosen for upload. Lives for one upload attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub content_type: String,
}

impl SelectedFile {
    pub fn new(path: impl Into<PathBuf>, size: u64, content_type: impl Into<String>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("video.mp4")
            .to_string();
        Self {
            path,
            name,
            size,
            content_type: content_type.into(),
        }
    }

    /// Stat the file and guess its content type from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(ClientError::InvalidInput(format!(
                "Not a file: {}",
                path.display()
            )));
        }
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok(Self::new(path, metadata.len(), content_type))
    }

    pub fn is_video(&self) -> bool {
        self.content_type.starts_with("video/")
    }

    pub fn ensure_video(&self) -> Result<(), ClientError> {
        if self.is_video() {
            Ok(())
        } else {
            Err(ClientError::InvalidInput(INVALID_VIDEO_FILE.to_string()))
        }
    }

    pub fn size_mb(&self) -> f64 {
        self.size as f64 / (1024.0 * 1024.0)
    }

    pub fn summary(&self) -> String {
        format!(
            "✅ Đã chọn: {} ({:.1} MB) - Nhấn \"Upload Video\" để tiếp tục",
            self.name,
            self.size_mb()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn mp4() -> SelectedFile {
        SelectedFile::new("/tmp/trailer.mp4", 5 * 1024 * 1024, "video/mp4")
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut state = UploadState::idle();
        state.file_selected(&mp4()).unwrap();
        assert!(state.message.contains("trailer.mp4 (5.0 MB)"));

        state.begin_upload().unwrap();
        assert_eq!(state.status, UploadStatus::Uploading);
        assert_eq!(state.progress, 0);

        state.upload_accepted("v1", "/media/v1").unwrap();
        assert_eq!(state.status, UploadStatus::Processing);
        assert_eq!(state.progress, 50);
        assert_eq!(state.video_id.as_deref(), Some("v1"));

        state.processing_tick(Some("segmenting 720p")).unwrap();
        assert_eq!(state.progress, 55);
        assert!(state.message.ends_with("segmenting 720p"));

        state
            .mark_ready(Some("/media/v1/master.m3u8".to_string()))
            .unwrap();
        assert_eq!(state.status, UploadStatus::Ready);
        assert_eq!(state.progress, 100);
        assert_eq!(state.hls_url.as_deref(), Some("/media/v1/master.m3u8"));
    }

    #[test]
    fn test_progress_is_capped_at_ninety() {
        let mut state = UploadState::idle();
        state.begin_upload().unwrap();
        state.upload_accepted("v1", "/media/v1").unwrap();
        for _ in 0..20 {
            state.processing_tick(None).unwrap();
        }
        assert_eq!(state.progress, 90);
    }

    #[test]
    fn test_ready_keeps_upload_url_when_status_has_none() {
        let mut state = UploadState::idle();
        state.begin_upload().unwrap();
        state.upload_accepted("v1", "/media/v1").unwrap();
        state.mark_ready(None).unwrap();
        assert_eq!(state.hls_url.as_deref(), Some("/media/v1"));
    }

    #[test]
    fn test_busy_rejects_resubmission_and_new_file() {
        let mut state = UploadState::idle();
        state.begin_upload().unwrap();
        assert!(matches!(state.begin_upload(), Err(ClientError::Busy)));
        assert!(matches!(state.file_selected(&mp4()), Err(ClientError::Busy)));

        state.upload_accepted("v1", "/media/v1").unwrap();
        assert!(matches!(state.begin_upload(), Err(ClientError::Busy)));
    }

    #[test]
    fn test_out_of_order_transitions_are_rejected() {
        let mut state = UploadState::idle();
        assert!(matches!(
            state.upload_accepted("v1", "/x"),
            Err(ClientError::InvalidState(_))
        ));
        assert!(state.mark_ready(None).is_err());
        assert!(state.processing_tick(None).is_err());
        assert!(state.mark_failed("boom").is_err());
        assert_eq!(state, UploadState::idle());
    }

    #[test]
    fn test_terminal_states_need_reset_before_new_upload() {
        let mut state = UploadState::idle();
        state.begin_upload().unwrap();
        state.mark_failed("❌ Lỗi upload: boom").unwrap();
        assert_eq!(state.status, UploadStatus::Error);
        assert!(state.begin_upload().is_err());

        state.reset();
        assert_eq!(state, UploadState::idle());
        state.begin_upload().unwrap();
    }

    #[test]
    fn test_selected_file_from_path_guesses_video_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mkv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[0u8; 2048]).unwrap();

        let selected = SelectedFile::from_path(&path).unwrap();
        assert_eq!(selected.name, "clip.mkv");
        assert_eq!(selected.size, 2048);
        assert!(selected.is_video());
        assert!(selected.ensure_video().is_ok());
    }

    #[test]
    fn test_non_video_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let selected = SelectedFile::from_path(&path).unwrap();
        match selected.ensure_video() {
            Err(ClientError::InvalidInput(msg)) => assert_eq!(msg, INVALID_VIDEO_FILE),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            SelectedFile::from_path("/definitely/not/here.mp4"),
            Err(ClientError::Io(_))
        ));
    }
}
