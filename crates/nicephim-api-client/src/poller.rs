//! Video processing status poller.
//!
//! [`start_polling`] spawns a task that asks the backend for a video's status on
//! a fixed interval (no backoff) until the job is `READY` or `FAILED`, the status
//! request itself fails, the optional attempt cap is reached, or the returned
//! [`PollHandle`] is cancelled or dropped. Each observation is handed to the
//! caller's callback as a [`PollTick`].

use nicephim_core::models::{VideoProcessingStatus, VideoStatusResponse};
use nicephim_core::{ClientConfig, ClientError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::Instrument;

use crate::api::videos::VideoBackend;

/// Default period between status requests.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Default cap: 30 minutes at the default period.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 900;
/// Shorter periods are raised to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Clone, Debug)]
pub struct PollConfig {
    pub interval: Duration,
    /// `None` polls until a terminal status or cancellation.
    pub max_attempts: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: Some(DEFAULT_MAX_ATTEMPTS),
        }
    }
}

impl PollConfig {
    pub fn new(interval: Duration, max_attempts: Option<u32>) -> Result<Self, ClientError> {
        if interval.is_zero() {
            return Err(ClientError::InvalidInput(
                "Poll interval must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            interval,
            max_attempts,
        })
    }
}

impl From<&ClientConfig> for PollConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            interval: config.poll_interval(),
            max_attempts: config.poll_max_attempts,
        }
    }
}

/// One observation of the job.
#[derive(Debug)]
pub enum PollTick {
    /// Still transcoding; polling continues.
    Processing { log: Option<String> },
    /// Transcoding finished; polling stops.
    Ready { hls_url: Option<String> },
    /// Backend reported failure; polling stops.
    Failed { log: Option<String> },
    /// Unrecognized status; ignored, polling continues.
    Unknown,
    /// The status request failed; polling stops. Not retried.
    Error(ClientError),
    /// The attempt cap was reached; polling stops.
    TimedOut { attempts: u32 },
}

impl PollTick {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollTick::Processing { .. } | PollTick::Unknown)
    }

    fn from_response(response: VideoStatusResponse) -> Self {
        let log = response.log_text().map(str::to_string);
        match response.status {
            VideoProcessingStatus::Processing => PollTick::Processing { log },
            VideoProcessingStatus::Ready => PollTick::Ready {
                hls_url: response.hls_url,
            },
            VideoProcessingStatus::Failed => PollTick::Failed { log },
            VideoProcessingStatus::Unknown => PollTick::Unknown,
        }
    }
}

/// Owner's handle on a running poller. Dropping it stops the poller.
#[derive(Debug)]
pub struct PollHandle {
    cancel_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stop polling. No callback runs after the poller observes the cancellation;
    /// a status request in flight is abandoned.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
        self.task.abort();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Start polling `video_id`. The first request goes out one `interval` after the call.
pub fn start_polling<F>(
    backend: Arc<dyn VideoBackend>,
    video_id: String,
    config: PollConfig,
    mut on_tick: F,
) -> PollHandle
where
    F: FnMut(PollTick) + Send + 'static,
{
    let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
    let span = tracing::info_span!("poll_status", video_id = %video_id);

    let poll = async move {
        let period = config.interval.max(MIN_POLL_INTERVAL);
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut attempts: u32 = 0;

        tracing::info!(
            interval_ms = period.as_millis() as u64,
            max_attempts = ?config.max_attempts,
            "Status polling started"
        );

        loop {
            tokio::select! {
                _ = &mut cancel_rx => {
                    tracing::debug!("Status polling cancelled");
                    break;
                }
                _ = ticker.tick() => {}
            }

            attempts += 1;
            let result = tokio::select! {
                _ = &mut cancel_rx => {
                    tracing::debug!("Status polling cancelled mid-request");
                    break;
                }
                result = backend.video_status(&video_id) => result,
            };

            let tick = match result {
                Ok(response) => {
                    tracing::debug!(attempts, status = %response.status, "Status polled");
                    PollTick::from_response(response)
                }
                Err(e) => PollTick::Error(e),
            };

            let terminal = tick.is_terminal();
            on_tick(tick);
            if terminal {
                tracing::info!(attempts, "Status polling finished");
                break;
            }

            if let Some(max) = config.max_attempts {
                if attempts >= max {
                    tracing::warn!(attempts, "Status polling timed out");
                    on_tick(PollTick::TimedOut { attempts });
                    break;
                }
            }
        }
    };
    let task = tokio::spawn(poll.instrument(span));

    PollHandle {
        cancel_tx: Some(cancel_tx),
        task,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{status, ScriptedBackend};
    use std::sync::Mutex;

    fn collect() -> (Arc<Mutex<Vec<String>>>, impl FnMut(PollTick) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let on_tick = move |tick: PollTick| {
            let label = match tick {
                PollTick::Processing { .. } => "processing".to_string(),
                PollTick::Ready { hls_url } => format!("ready:{}", hls_url.unwrap_or_default()),
                PollTick::Failed { log } => format!("failed:{}", log.unwrap_or_default()),
                PollTick::Unknown => "unknown".to_string(),
                PollTick::Error(_) => "error".to_string(),
                PollTick::TimedOut { attempts } => format!("timeout:{}", attempts),
            };
            sink.lock().unwrap().push(label);
        };
        (seen, on_tick)
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_until_ready_then_stops() {
        let backend = Arc::new(ScriptedBackend::with_statuses(vec![
            Ok(status("PROCESSING", None, Some("frame=10"))),
            Ok(status("UNKNOWN", None, None)),
            Ok(status("READY", Some("/videos/v1/master.m3u8"), None)),
        ]));
        let (seen, on_tick) = collect();
        let _handle = start_polling(
            backend.clone(),
            "v1".to_string(),
            PollConfig::default(),
            on_tick,
        );

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["processing", "unknown", "ready:/videos/v1/master.m3u8"]
        );
        assert_eq!(backend.status_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_poll_waits_one_interval() {
        let backend = Arc::new(ScriptedBackend::with_statuses(vec![]));
        let (_seen, on_tick) = collect();
        let _handle = start_polling(
            backend.clone(),
            "v1".to_string(),
            PollConfig::default(),
            on_tick,
        );

        tokio::time::sleep(Duration::from_millis(1900)).await;
        assert_eq!(backend.status_calls(), 0);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(backend.status_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_error_is_terminal() {
        let backend = Arc::new(ScriptedBackend::with_statuses(vec![Err(
            ClientError::Decode("expected value".to_string()),
        )]));
        let (seen, on_tick) = collect();
        let _handle = start_polling(
            backend.clone(),
            "v1".to_string(),
            PollConfig::default(),
            on_tick,
        );

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(*seen.lock().unwrap(), vec!["error"]);
        assert_eq!(backend.status_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_attempts_times_out() {
        // Exhausted script keeps answering PROCESSING.
        let backend = Arc::new(ScriptedBackend::with_statuses(vec![]));
        let (seen, on_tick) = collect();
        let config = PollConfig {
            interval: Duration::from_secs(2),
            max_attempts: Some(3),
        };
        let _handle = start_polling(backend.clone(), "v1".to_string(), config, on_tick);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["processing", "processing", "processing", "timeout:3"]
        );
        assert_eq!(backend.status_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_further_requests() {
        let backend = Arc::new(ScriptedBackend::with_statuses(vec![]));
        let (seen, on_tick) = collect();
        let mut handle = start_polling(
            backend.clone(),
            "v1".to_string(),
            PollConfig::default(),
            on_tick,
        );

        tokio::time::sleep(Duration::from_millis(4500)).await;
        assert_eq!(backend.status_calls(), 2);
        handle.cancel();

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(backend.status_calls(), 2);
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_poller() {
        let backend = Arc::new(ScriptedBackend::with_statuses(vec![]));
        let (_seen, on_tick) = collect();
        let handle = start_polling(
            backend.clone(),
            "v1".to_string(),
            PollConfig::default(),
            on_tick,
        );

        tokio::time::sleep(Duration::from_millis(2500)).await;
        drop(handle);
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(backend.status_calls(), 1);
    }

    #[test]
    fn test_config_rejects_zero_interval() {
        assert!(matches!(
            PollConfig::new(Duration::ZERO, None),
            Err(ClientError::InvalidInput(_))
        ));
        let config = PollConfig::new(Duration::from_millis(500), Some(10)).unwrap();
        assert_eq!(config.interval, Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_raised_to_minimum() {
        let backend = Arc::new(ScriptedBackend::with_statuses(vec![
            Ok(status("PROCESSING", None, None)),
            Ok(status("READY", Some("/videos/v1/master.m3u8"), None)),
        ]));
        let (seen, on_tick) = collect();
        let config = PollConfig {
            interval: Duration::ZERO,
            max_attempts: None,
        };
        let _handle = start_polling(backend.clone(), "v1".to_string(), config, on_tick);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["processing", "ready:/videos/v1/master.m3u8"]
        );
        assert_eq!(backend.status_calls(), 2);
    }
}
