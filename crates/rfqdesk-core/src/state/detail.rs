//! Detail state: one RFQ, the caller's access to it, and unlock handling.

use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::models::{Rfq, RfqAccess, RfqDetail, UnlockResult};

/// Holds the RFQ a detail screen shows.
///
/// The RFQ and its access descriptor always travel as one pair; there is no
/// way to set one without the other. Responses are committed against the id
/// they were requested for, so a reply that arrives after the user has
/// navigated to a different RFQ is dropped instead of shown.
pub struct DetailState {
    client: ApiClient,
    requested_id: Option<String>,
    current: Option<RfqDetail>,
    is_loading: bool,
}

impl DetailState {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            requested_id: None,
            current: None,
            is_loading: false,
        }
    }

    /// Record which RFQ the screen is now asking for. Clears the previous
    /// pair so nothing stale is rendered while the fetch runs.
    pub fn begin_fetch(&mut self, id: &str) {
        self.requested_id = Some(id.to_string());
        self.current = None;
        self.is_loading = true;
    }

    /// Accept a fetched pair if it is still the one on screen. Returns
    /// whether it was kept.
    pub fn commit(&mut self, id: &str, detail: RfqDetail) -> bool {
        if self.requested_id.as_deref() != Some(id) {
            debug!(id, "discarding stale detail response");
            return false;
        }
        self.current = Some(detail);
        self.is_loading = false;
        true
    }

    /// Fetch and commit one RFQ.
    pub async fn fetch(&mut self, id: &str) -> Result<(), ApiError> {
        self.begin_fetch(id);
        match self.client.rfq_detail(id).await {
            Ok(detail) => {
                self.commit(id, detail);
                Ok(())
            }
            Err(e) => {
                // Leave a newer fetch's loading flag alone
                if self.requested_id.as_deref() == Some(id) {
                    self.is_loading = false;
                }
                Err(e)
            }
        }
    }

    /// Spend one unlock on `id`, then refetch the detail so contact fields
    /// and access level come from the server rather than from local
    /// bookkeeping. The revealed contact is returned either way.
    pub async fn unlock(&mut self, id: &str) -> Result<UnlockResult, ApiError> {
        let result = self.client.unlock_rfq(id).await?;
        if self.requested_id.as_deref() == Some(id) {
            let detail = self.client.rfq_detail(id).await?;
            self.commit(id, detail);
        }
        Ok(result)
    }

    pub fn current(&self) -> Option<&RfqDetail> {
        self.current.as_ref()
    }

    pub fn rfq(&self) -> Option<&Rfq> {
        self.current.as_ref().map(|d| &d.rfq)
    }

    pub fn access(&self) -> Option<&RfqAccess> {
        self.current.as_ref().map(|d| &d.access)
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn clear(&mut self) {
        self.requested_id = None;
        self.current = None;
        self.is_loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionStore;
    use crate::models::ContactLevel;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::with_store(&server.uri(), SessionStore::in_memory()).unwrap()
    }

    /// Client pointed at nothing; for tests that must not reach a server.
    fn offline_client() -> ApiClient {
        ApiClient::with_store("http://localhost:9", SessionStore::in_memory()).unwrap()
    }

    fn rfq_value(id: &str, email: Option<&str>) -> serde_json::Value {
        let mut rfq = json!({
            "id": id,
            "titleEn": "Cashew kernels WW320",
            "buyerCountry": "UAE",
            "quantity": "5",
            "incoterms": "CIF",
            "createdAt": "2026-02-01T00:00:00Z"
        });
        if let Some(email) = email {
            rfq["buyerEmail"] = json!(email);
        }
        rfq
    }

    fn detail_body(id: &str, level: &str, email: Option<&str>) -> serde_json::Value {
        json!({
            "success": true,
            "data": {"rfq": rfq_value(id, email), "access": {"contactLevel": level}}
        })
    }

    fn detail_for(id: &str) -> RfqDetail {
        serde_json::from_value(json!({
            "rfq": rfq_value(id, None),
            "access": {"contactLevel": "none"}
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_late_response_for_previous_rfq_is_discarded() {
        let mut state = DetailState::new(offline_client());

        state.begin_fetch("rfq-a");
        state.begin_fetch("rfq-b");

        // The reply to the first request lands after the user moved on
        assert!(!state.commit("rfq-a", detail_for("rfq-a")));
        assert!(state.current().is_none());
        assert!(state.is_loading());

        assert!(state.commit("rfq-b", detail_for("rfq-b")));
        assert_eq!(state.rfq().unwrap().id, "rfq-b");
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_fetch_commits_rfq_and_access_together() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rfq/rfq-1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(detail_body("rfq-1", "none", None)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut state = DetailState::new(client_for(&server));
        state.fetch("rfq-1").await.unwrap();

        assert_eq!(state.rfq().unwrap().id, "rfq-1");
        assert_eq!(state.access().unwrap().contact_level, ContactLevel::None);
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_failed_fetch_clears_loading_flag() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rfq/rfq-x"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "success": false, "message": "Not found"
            })))
            .mount(&server)
            .await;

        let mut state = DetailState::new(client_for(&server));
        assert!(state.fetch("rfq-x").await.is_err());
        assert!(!state.is_loading());
        assert!(state.current().is_none());
    }

    #[tokio::test]
    async fn test_unlock_refetches_and_raises_contact_level() {
        let server = MockServer::start().await;
        // Before the unlock the server grants nothing
        Mock::given(method("GET"))
            .and(path("/rfq/rfq-1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(detail_body("rfq-1", "none", None)),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rfq/rfq-1/unlock"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "contact": {"name": "Omar", "email": "omar@gulftrade.ae"},
                    "quota": {"used": 1, "limit": 3, "remaining": 2}
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut state = DetailState::new(client_for(&server));
        state.fetch("rfq-1").await.unwrap();
        let before = state.access().unwrap().contact_level;

        // The refetch after the unlock sees the upgraded grant
        Mock::given(method("GET"))
            .and(path("/rfq/rfq-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(detail_body(
                "rfq-1",
                "full",
                Some("omar@gulftrade.ae"),
            )))
            .expect(1)
            .mount(&server)
            .await;

        let result = state.unlock("rfq-1").await.unwrap();
        assert_eq!(result.contact.email.as_deref(), Some("omar@gulftrade.ae"));
        assert_eq!(result.quota.remaining, 2);

        let after = state.access().unwrap().contact_level;
        assert!(after > before);
        assert_eq!(
            state.rfq().unwrap().buyer_email.as_deref(),
            Some("omar@gulftrade.ae")
        );
    }

    #[tokio::test]
    async fn test_clear_resets_everything() {
        let mut state = DetailState::new(offline_client());
        state.begin_fetch("rfq-a");
        state.commit("rfq-a", detail_for("rfq-a"));

        state.clear();
        assert!(state.current().is_none());
        assert!(state.rfq().is_none());
        assert!(!state.is_loading());
    }
}
