//! In-memory session state layered over a [`SessionStore`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::store::{SessionStore, StoreError};

/// Tokens issued at login, persisted as one JSON blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(access_token: String, refresh_token: Option<String>) -> Self {
        Self {
            access_token,
            refresh_token,
            created_at: Utc::now(),
        }
    }
}

/// Owns the current session and keeps the store in sync with it.
///
/// `load` is called at most once per manager; afterwards the in-memory copy
/// is authoritative and the store is only written, never re-read.
pub struct SessionManager {
    store: SessionStore,
    data: Option<SessionData>,
    loaded: bool,
}

impl SessionManager {
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            data: None,
            loaded: false,
        }
    }

    /// Load any persisted session. Returns whether one was found.
    ///
    /// Storage failures and undecodable blobs leave the manager signed out
    /// rather than failing startup.
    pub async fn load(&mut self) -> bool {
        self.loaded = true;
        let blob = match self.store.read().await {
            Ok(Some(blob)) => blob,
            Ok(None) => return false,
            Err(e) => {
                debug!(error = %e, "could not read stored session");
                return false;
            }
        };
        match serde_json::from_str(&blob) {
            Ok(data) => {
                self.data = Some(data);
                true
            }
            Err(e) => {
                debug!(error = %e, "stored session did not decode; ignoring it");
                false
            }
        }
    }

    /// Replace the session and persist it.
    ///
    /// The in-memory copy is updated before the store write so requests pick
    /// up the new token even if persistence fails.
    pub async fn save(&mut self, data: SessionData) -> Result<(), StoreError> {
        let blob = serde_json::to_string(&data)?;
        self.data = Some(data);
        self.loaded = true;
        self.store.write(blob).await
    }

    /// Drop the session from memory and from the store.
    pub async fn clear(&mut self) -> Result<(), StoreError> {
        self.data = None;
        self.loaded = true;
        self.store.delete().await
    }

    /// Current access token, loading from the store on first use.
    pub async fn current(&mut self) -> Option<String> {
        if !self.loaded {
            self.load().await;
        }
        self.token()
    }

    /// Current access token without touching the store.
    pub fn token(&self) -> Option<String> {
        self.data.as_ref().map(|d| d.access_token.clone())
    }

    pub fn session(&self) -> Option<&SessionData> {
        self.data.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_survives_new_manager() {
        let store = SessionStore::in_memory();
        let mut manager = SessionManager::new(store.clone());
        manager
            .save(SessionData::new("tok-1".to_string(), Some("ref-1".to_string())))
            .await
            .unwrap();

        // Same store, fresh manager: simulates a process restart.
        let mut restarted = SessionManager::new(store);
        assert!(restarted.load().await);
        assert_eq!(restarted.token().as_deref(), Some("tok-1"));
        assert_eq!(
            restarted.session().unwrap().refresh_token.as_deref(),
            Some("ref-1")
        );
    }

    #[tokio::test]
    async fn test_clear_removes_persisted_session() {
        let store = SessionStore::in_memory();
        let mut manager = SessionManager::new(store.clone());
        manager
            .save(SessionData::new("tok-1".to_string(), None))
            .await
            .unwrap();
        manager.clear().await.unwrap();
        assert!(manager.token().is_none());

        let mut restarted = SessionManager::new(store);
        assert!(!restarted.load().await);
        assert!(restarted.token().is_none());
    }

    #[tokio::test]
    async fn test_current_loads_store_only_once() {
        let store = SessionStore::in_memory();
        store
            .write(serde_json::to_string(&SessionData::new("tok-1".to_string(), None)).unwrap())
            .await
            .unwrap();

        let mut manager = SessionManager::new(store.clone());
        assert_eq!(manager.current().await.as_deref(), Some("tok-1"));

        // Deleting behind the manager's back does not sign it out; the
        // in-memory copy is authoritative after the first load.
        store.delete().await.unwrap();
        assert_eq!(manager.current().await.as_deref(), Some("tok-1"));
    }

    #[tokio::test]
    async fn test_undecodable_blob_loads_as_signed_out() {
        let store = SessionStore::in_memory();
        store.write("not json".to_string()).await.unwrap();

        let mut manager = SessionManager::new(store);
        assert!(!manager.load().await);
        assert!(manager.token().is_none());
        assert!(manager.is_loaded());
    }
}
