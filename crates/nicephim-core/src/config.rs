//! Configuration module
//!
//! Client settings are read from the environment (after loading `.env`), with
//! defaults matching the backend's development setup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const REQUEST_TIMEOUT_SECS: u64 = 300;
const POLL_INTERVAL_MS: u64 = 2000;
const POLL_MAX_ATTEMPTS: u32 = 900;

/// Settings for the HTTP client, the status poller and the session store.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub poll_interval_ms: u64,
    /// `None` polls until a terminal status or cancellation.
    pub poll_max_attempts: Option<u32>,
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            poll_interval_ms: POLL_INTERVAL_MS,
            poll_max_attempts: Some(POLL_MAX_ATTEMPTS),
            session_file: default_session_file(),
        }
    }
}

fn default_session_file() -> PathBuf {
    match env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".nicephim").join("session.json"),
        Err(_) => PathBuf::from(".nicephim-session.json"),
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let api_url = env::var("NICEPHIM_API_URL")
            .or_else(|_| env::var("NEXT_PUBLIC_API_URL"))
            .or_else(|_| env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let request_timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| REQUEST_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("REQUEST_TIMEOUT_SECS must be a valid number"))?;

        let poll_interval_ms = env::var("POLL_INTERVAL_MS")
            .unwrap_or_else(|_| POLL_INTERVAL_MS.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("POLL_INTERVAL_MS must be a valid number"))?;

        let poll_max_attempts = env::var("POLL_MAX_ATTEMPTS")
            .unwrap_or_else(|_| POLL_MAX_ATTEMPTS.to_string())
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("POLL_MAX_ATTEMPTS must be a valid number"))?;

        let session_file = env::var("NICEPHIM_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_session_file());

        let config = Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            request_timeout_secs,
            poll_interval_ms,
            poll_max_attempts: (poll_max_attempts > 0).then_some(poll_max_attempts),
            session_file,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "NICEPHIM_API_URL must start with http:// or https:// (got {})",
                self.api_url
            ));
        }

        if self.poll_interval_ms == 0 {
            return Err(anyhow::anyhow!("POLL_INTERVAL_MS must be greater than 0"));
        }

        if self.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "REQUEST_TIMEOUT_SECS must be greater than 0"
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_backend_dev_setup() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.poll_max_attempts, Some(900));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let config = ClientConfig {
            api_url: "localhost:8080".to_string(),
            ..ClientConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn test_validate_rejects_zero_poll_interval() {
        let config = ClientConfig {
            poll_interval_ms: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_env_zero_max_attempts_means_unlimited() {
        env::set_var("POLL_MAX_ATTEMPTS", "0");
        let unlimited = ClientConfig::from_env().unwrap();
        env::set_var("POLL_MAX_ATTEMPTS", "15");
        let capped = ClientConfig::from_env().unwrap();
        env::remove_var("POLL_MAX_ATTEMPTS");

        assert_eq!(unlimited.poll_max_attempts, None);
        assert_eq!(capped.poll_max_attempts, Some(15));
    }
}
