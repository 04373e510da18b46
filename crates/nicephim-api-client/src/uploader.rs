//! Video upload component.
//!
//! [`VideoUploader`] owns one [`UploadState`], the selected file and the status
//! poller for the current attempt. It sends the file, starts polling on success
//! and reports the outcome to an [`UploadObserver`]. State changes are published
//! on a `watch` channel.
//!
//! Only one attempt runs at a time: submitting or selecting a file while an
//! upload or poll is active fails with [`ClientError::Busy`]. `reset` (and
//! dropping the uploader) cancels the poller; every poll result is tagged with
//! the epoch it was started in and dropped if a reset happened since. An
//! `upload()` future dropped before the backend answers leaves the state in
//! `error` rather than `uploading`.

use nicephim_core::constants::{STATUS_CHECK_FAILED, UPLOAD_ABANDONED, UPLOAD_ERROR_PREFIX};
use nicephim_core::{ClientError, ErrorMetadata, SelectedFile, UploadState};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

use crate::api::videos::VideoBackend;
use crate::log_client_error;
use crate::poller::{start_polling, PollConfig, PollHandle, PollTick};

/// Receives the terminal outcome of an upload attempt.
pub trait UploadObserver: Send + Sync {
    /// The video finished transcoding and can be attached to a movie.
    fn on_video_ready(&self, video_id: &str, hls_url: &str);

    /// The attempt failed; `message` is ready for display.
    fn on_error(&self, message: &str);
}

enum Notice {
    Ready { video_id: String, hls_url: String },
    Error(String),
}

struct Inner {
    state_tx: watch::Sender<UploadState>,
    selected: Option<SelectedFile>,
    poller: Option<PollHandle>,
    epoch: u64,
}

impl Inner {
    /// Apply a state transition and publish it if it succeeded.
    fn transition<F>(&self, f: F) -> Result<(), ClientError>
    where
        F: FnOnce(&mut UploadState) -> Result<(), ClientError>,
    {
        let mut result = Ok(());
        self.state_tx.send_if_modified(|state| match f(state) {
            Ok(()) => true,
            Err(e) => {
                result = Err(e);
                false
            }
        });
        result
    }

    fn fail(&self, message: String) -> Option<Notice> {
        match self.transition(|s| s.mark_failed(message.clone())) {
            Ok(()) => Some(Notice::Error(message)),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring failure outside an active upload");
                None
            }
        }
    }

    fn apply_tick(&self, video_id: &str, tick: PollTick) -> Option<Notice> {
        match tick {
            PollTick::Processing { log } => {
                if let Err(e) = self.transition(|s| s.processing_tick(log.as_deref())) {
                    tracing::debug!(error = %e, "Ignoring processing tick");
                }
                None
            }
            PollTick::Unknown => None,
            PollTick::Ready { hls_url } => {
                if let Err(e) = self.transition(|s| s.mark_ready(hls_url)) {
                    tracing::debug!(error = %e, "Ignoring ready tick");
                    return None;
                }
                let hls_url = self.state_tx.borrow().hls_url.clone().unwrap_or_default();
                tracing::info!(video_id = %video_id, hls_url = %hls_url, "Video ready");
                Some(Notice::Ready {
                    video_id: video_id.to_string(),
                    hls_url,
                })
            }
            PollTick::Failed { log } => {
                let err = ClientError::ProcessingFailed(log.unwrap_or_default());
                log_client_error(&err, "Video processing failed");
                self.fail(err.client_message())
            }
            PollTick::Error(e) => {
                log_client_error(&e, "Status check failed");
                self.fail(STATUS_CHECK_FAILED.to_string())
            }
            PollTick::TimedOut { attempts } => {
                let err = ClientError::PollTimeout { attempts };
                log_client_error(&err, "Video processing timed out");
                self.fail(err.client_message())
            }
        }
    }

    fn cancel_poller(&mut self) {
        if let Some(mut poller) = self.poller.take() {
            poller.cancel();
        }
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn notify(observer: &dyn UploadObserver, notice: Notice) {
    match notice {
        Notice::Ready { video_id, hls_url } => observer.on_video_ready(&video_id, &hls_url),
        Notice::Error(message) => observer.on_error(&message),
    }
}

/// Armed while the upload POST is awaited. If the `upload()` future is dropped
/// before the backend answers, moves the attempt to `error`.
struct InFlight<'a> {
    inner: &'a Mutex<Inner>,
    observer: &'a dyn UploadObserver,
    epoch: u64,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let message = format!("{}: {}", UPLOAD_ERROR_PREFIX, UPLOAD_ABANDONED);
        let notice = {
            let inner = lock(self.inner);
            if inner.epoch != self.epoch {
                return;
            }
            tracing::warn!("Upload abandoned before the backend answered");
            inner.fail(format!("❌ {}", message))
        };
        if notice.is_some() {
            self.observer.on_error(&message);
        }
    }
}

pub struct VideoUploader {
    backend: Arc<dyn VideoBackend>,
    observer: Arc<dyn UploadObserver>,
    config: PollConfig,
    inner: Arc<Mutex<Inner>>,
    state_rx: watch::Receiver<UploadState>,
}

impl VideoUploader {
    pub fn new(
        backend: Arc<dyn VideoBackend>,
        observer: Arc<dyn UploadObserver>,
        config: PollConfig,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(UploadState::idle());
        Self {
            backend,
            observer,
            config,
            inner: Arc::new(Mutex::new(Inner {
                state_tx,
                selected: None,
                poller: None,
                epoch: 0,
            })),
            state_rx,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> UploadState {
        self.state_rx.borrow().clone()
    }

    /// Follow state changes.
    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state_rx.clone()
    }

    pub fn selected_file(&self) -> Option<SelectedFile> {
        lock(&self.inner).selected.clone()
    }

    /// Choose the file for the next attempt. Non-video files are reported to the
    /// observer and rejected.
    pub fn select_file(&self, file: SelectedFile) -> Result<(), ClientError> {
        if let Err(e) = file.ensure_video() {
            self.observer.on_error(&e.client_message());
            return Err(e);
        }

        let mut inner = lock(&self.inner);
        inner.transition(|s| s.file_selected(&file))?;
        inner.cancel_poller();
        tracing::debug!(file = %file.name, size = file.size, "Video file selected");
        inner.selected = Some(file);
        Ok(())
    }

    /// Send the selected file and start polling its processing status.
    ///
    /// Returns once the backend accepted (or rejected) the file; the rest of the
    /// lifecycle is reported through the observer and [`Self::subscribe`].
    pub async fn upload(&self) -> Result<(), ClientError> {
        let (file, epoch) = {
            let inner = lock(&self.inner);
            let file = inner.selected.clone().ok_or_else(|| {
                ClientError::InvalidInput("Chưa chọn file video".to_string())
            })?;
            inner.transition(|s| s.begin_upload())?;
            (file, inner.epoch)
        };

        tracing::info!(file = %file.name, size = file.size, "Uploading video");
        let mut in_flight = InFlight {
            inner: &self.inner,
            observer: self.observer.as_ref(),
            epoch,
            armed: true,
        };
        let result = self.backend.upload_video(&file).await;
        in_flight.disarm();

        let mut inner = lock(&self.inner);
        if inner.epoch != epoch {
            tracing::info!(file = %file.name, "Upload completed after reset, result discarded");
            return Err(ClientError::InvalidState("upload discarded by reset".to_string()));
        }

        match result {
            Ok(response) => {
                inner.transition(|s| {
                    s.upload_accepted(response.video_id.clone(), response.hls_url.clone())
                })?;
                let poller = self.spawn_poller(response.video_id, epoch);
                inner.poller = Some(poller);
                Ok(())
            }
            Err(e) => {
                log_client_error(&e, "Video upload failed");
                let message = format!("{}: {}", UPLOAD_ERROR_PREFIX, e.client_message());
                let notice = inner.fail(format!("❌ {}", message));
                drop(inner);
                if notice.is_some() {
                    self.observer.on_error(&message);
                }
                Err(e)
            }
        }
    }

    fn spawn_poller(&self, video_id: String, epoch: u64) -> PollHandle {
        let inner = Arc::downgrade(&self.inner);
        let observer = self.observer.clone();
        let id = video_id.clone();

        start_polling(
            self.backend.clone(),
            video_id,
            self.config.clone(),
            move |tick| {
                let Some(inner) = inner.upgrade() else {
                    return;
                };
                let notice = {
                    let guard = lock(&inner);
                    if guard.epoch != epoch {
                        return;
                    }
                    guard.apply_tick(&id, tick)
                };
                if let Some(notice) = notice {
                    notify(observer.as_ref(), notice);
                }
            },
        )
    }

    /// Back to `idle`: cancels the poller and forgets the selected file. An upload
    /// request already on the wire cannot be aborted; its result is discarded.
    pub fn reset(&self) {
        let mut inner = lock(&self.inner);
        inner.epoch += 1;
        inner.cancel_poller();
        inner.selected = None;
        inner.state_tx.send_modify(|s| s.reset());
        tracing::debug!("Upload reset");
    }
}

impl Drop for VideoUploader {
    fn drop(&mut self) {
        let mut inner = lock(&self.inner);
        inner.epoch += 1;
        inner.cancel_poller();
    }
}
