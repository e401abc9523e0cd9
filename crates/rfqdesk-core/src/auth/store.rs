//! Durable storage for the session blob.
//!
//! The default backend is the OS keychain via `keyring`. Tests swap in an
//! in-memory backend so they run without a system keychain.

use std::sync::Arc;

use keyring::Entry;
use thiserror::Error;
use tokio::sync::Mutex;

/// Keychain service name under which the session is filed.
const SERVICE_NAME: &str = "rfqdesk";

/// Keychain account name. One session per install, so a fixed account.
const SESSION_ACCOUNT: &str = "session";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Keystore error: {0}")]
    Keystore(#[from] keyring::Error),
    #[error("Stored session is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Keystore task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Where the serialized session lives.
///
/// Clones share the same backing storage, so a store handed to several
/// components behaves like one keychain.
#[derive(Clone)]
pub struct SessionStore {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    Keyring,
    Memory(Arc<Mutex<Option<String>>>),
}

impl SessionStore {
    /// Store backed by the OS keychain.
    pub fn keyring() -> Self {
        Self {
            backend: Backend::Keyring,
        }
    }

    /// Store backed by process memory. For tests and environments without
    /// a keychain.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(Mutex::new(None))),
        }
    }

    /// Read the stored blob. A missing entry is `Ok(None)`, not an error.
    pub(crate) async fn read(&self) -> Result<Option<String>, StoreError> {
        match &self.backend {
            Backend::Keyring => {
                // Keychain calls can block on IPC; keep them off the runtime.
                tokio::task::spawn_blocking(|| -> Result<Option<String>, StoreError> {
                    let entry = Entry::new(SERVICE_NAME, SESSION_ACCOUNT)?;
                    match entry.get_password() {
                        Ok(blob) => Ok(Some(blob)),
                        Err(keyring::Error::NoEntry) => Ok(None),
                        Err(e) => Err(e.into()),
                    }
                })
                .await?
            }
            Backend::Memory(slot) => Ok(slot.lock().await.clone()),
        }
    }

    pub(crate) async fn write(&self, blob: String) -> Result<(), StoreError> {
        match &self.backend {
            Backend::Keyring => {
                tokio::task::spawn_blocking(move || -> Result<(), StoreError> {
                    let entry = Entry::new(SERVICE_NAME, SESSION_ACCOUNT)?;
                    entry.set_password(&blob)?;
                    Ok(())
                })
                .await?
            }
            Backend::Memory(slot) => {
                *slot.lock().await = Some(blob);
                Ok(())
            }
        }
    }

    /// Delete the stored blob. Deleting a missing entry succeeds.
    pub(crate) async fn delete(&self) -> Result<(), StoreError> {
        match &self.backend {
            Backend::Keyring => {
                tokio::task::spawn_blocking(|| -> Result<(), StoreError> {
                    let entry = Entry::new(SERVICE_NAME, SESSION_ACCOUNT)?;
                    match entry.delete_credential() {
                        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
                        Err(e) => Err(e.into()),
                    }
                })
                .await?
            }
            Backend::Memory(slot) => {
                *slot.lock().await = None;
                Ok(())
            }
        }
    }
}
