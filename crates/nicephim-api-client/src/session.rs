//! Signed-in user session.
//!
//! The session is read once from a [`SessionStore`] at startup and then kept in
//! memory; `login` and `logout` write through to the store and notify
//! subscribers on a `watch` channel.

use nicephim_core::models::User;
use nicephim_core::ClientError;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Persistence for the signed-in user.
pub trait SessionStore: Send + Sync {
    /// `Ok(None)` when nobody is signed in. Unreadable data is an error.
    fn load(&self) -> Result<Option<User>, ClientError>;
    fn save(&self, user: &User) -> Result<(), ClientError>;
    fn clear(&self) -> Result<(), ClientError>;
}

#[derive(Serialize, Deserialize)]
struct StoredSession {
    user: User,
}

fn decode(raw: &str) -> Result<User, ClientError> {
    serde_json::from_str::<StoredSession>(raw)
        .map(|s| s.user)
        .map_err(|e| ClientError::Session(format!("Stored session is corrupt: {}", e)))
}

fn encode(user: &User) -> Result<String, ClientError> {
    serde_json::to_string_pretty(&StoredSession { user: user.clone() })
        .map_err(|e| ClientError::Session(e.to_string()))
}

/// JSON file on disk, `{ "user": { ... } }`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<User>, ClientError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => decode(&raw).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, user: &User) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, encode(user)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps the serialized session in memory.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    raw: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from already-serialized content, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot().clone()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.raw.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<User>, ClientError> {
        self.slot().as_deref().map(decode).transpose()
    }

    fn save(&self, user: &User) -> Result<(), ClientError> {
        *self.slot() = Some(encode(user)?);
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.slot() = None;
        Ok(())
    }
}

pub struct Session {
    store: Arc<dyn SessionStore>,
    user_tx: watch::Sender<Option<User>>,
}

impl Session {
    /// Load the stored user. Corrupt data is cleared and treated as signed out.
    pub fn init(store: Arc<dyn SessionStore>) -> Self {
        let user = match store.load() {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable session");
                if let Err(e) = store.clear() {
                    tracing::warn!(error = %e, "Failed to clear session store");
                }
                None
            }
        };
        let (user_tx, _) = watch::channel(user);
        Self { store, user_tx }
    }

    pub fn current(&self) -> Option<User> {
        self.user_tx.borrow().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user_tx.borrow().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user_tx
            .borrow()
            .as_ref()
            .map(User::is_admin)
            .unwrap_or(false)
    }

    /// Auth-change notifications.
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.user_tx.subscribe()
    }

    pub fn login(&self, user: User) -> Result<(), ClientError> {
        self.store.save(&user)?;
        tracing::info!(user_id = %user.id, username = %user.username, "Signed in");
        self.user_tx.send_replace(Some(user));
        Ok(())
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.store.clear()?;
        if let Some(user) = self.user_tx.send_replace(None) {
            tracing::info!(username = %user.username, "Signed out");
        }
        Ok(())
    }

    /// Promote a user with an admin username to the stored admin flag.
    /// Returns whether anything changed.
    pub fn ensure_admin_status(&self) -> Result<bool, ClientError> {
        let Some(mut user) = self.current() else {
            return Ok(false);
        };
        if user.is_admin || !user.has_admin_username() {
            return Ok(false);
        }
        user.is_admin = true;
        self.store.save(&user)?;
        tracing::info!(username = %user.username, "Admin flag set");
        self.user_tx.send_replace(Some(user));
        Ok(true)
    }
}
