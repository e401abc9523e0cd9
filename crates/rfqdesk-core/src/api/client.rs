//! HTTP client for the marketplace REST API.
//!
//! All requests go through one narrow waist that attaches the bearer token,
//! classifies failures into `ApiError`, and decodes the JSON envelope.
//! Requests are never retried; callers decide what a failure means.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::auth::{SessionData, SessionManager, SessionStore};
use crate::config::ApiEnv;
use crate::models::{
    ApiEnvelope, BankTransferOrder, CouponCheck, PaginatedResponse, Plan, ProfileUpdate, Rfq,
    RfqDetail, RfqFilters, UnlockResult, User,
};
use crate::validate;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the RFQ marketplace.
/// Clone is cheap - the connection pool and session are shared across clones.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<RwLock<SessionManager>>,
}

impl ApiClient {
    /// Create a client against the environment's base URL, with the session
    /// persisted in the OS keychain.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_store(ApiEnv::current().base_url(), SessionStore::keyring())
    }

    /// Create a client against a specific base URL.
    pub fn with_base_url(base_url: &str) -> anyhow::Result<Self> {
        Self::with_store(base_url, SessionStore::keyring())
    }

    /// Create a client with an explicit session store. Tests use this to
    /// point at a mock server with in-memory session storage.
    pub fn with_store(base_url: &str, store: SessionStore) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session: Arc::new(RwLock::new(SessionManager::new(store))),
        })
    }

    /// Whether a session token is available (loading it on first use).
    pub async fn has_session(&self) -> bool {
        self.current_token().await.is_some()
    }

    /// Drop the session from memory and from the store.
    pub async fn clear_session(&self) {
        let mut session = self.session.write().await;
        if let Err(e) = session.clear().await {
            warn!(error = %e, "session store cleanup failed");
        }
    }

    async fn current_token(&self) -> Option<String> {
        {
            let session = self.session.read().await;
            if session.is_loaded() {
                return session.token();
            }
        }
        self.session.write().await.current().await
    }

    /// Persist freshly issued tokens. Store failures degrade to an
    /// in-memory session rather than failing the sign-in.
    async fn store_session(&self, data: SessionData) {
        let mut session = self.session.write().await;
        if let Err(e) = session.save(data).await {
            warn!(error = %e, "session not persisted; continuing with in-memory token");
        }
    }

    /// Send one request and decode the response.
    ///
    /// The token is attached when present; anonymous requests go out bare
    /// and the server decides what they may see. Non-2xx responses are
    /// classified by `ApiError::from_status`. There is no retry: a failure
    /// is reported once and the caller chooses whether to ask again.
    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method, &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = self.current_token().await {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            debug!(url = %url, error = %e, "request did not reach the server");
            ApiError::from(e)
        })?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::from_status(status, &text));
        }

        serde_json::from_str(&text).map_err(|e| {
            debug!(url = %url, error = %e, "response body did not match the expected shape");
            ApiError::InvalidResponse(e.to_string())
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, &[], None::<&()>).await
    }

    async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.request(Method::GET, path, query, None::<&()>).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::POST, path, &[], None::<&()>).await
    }

    async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::PUT, path, &[], Some(body)).await
    }

    /// Unwrap the envelope's `data`, treating its absence on a 2xx as a
    /// malformed response.
    fn require_data<T>(envelope: ApiEnvelope<T>, endpoint: &str) -> Result<T, ApiError> {
        envelope
            .data
            .ok_or_else(|| ApiError::InvalidResponse(format!("{} returned no data", endpoint)))
    }

    // ===== Authentication =====

    /// Sign in and persist the issued tokens. The server's rejection message
    /// is surfaced as-is; wrong password and unknown email read the same.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        if !validate::is_valid_email(email) {
            return Err(ApiError::Validation("Invalid email address".to_string()));
        }
        if password.is_empty() {
            return Err(ApiError::Validation("Password is required".to_string()));
        }

        let body = json!({ "email": email, "password": password });
        let envelope: ApiEnvelope<AuthPayload> = self.post("/auth/login", &body).await?;
        let payload = Self::require_data(envelope, "/auth/login")?;
        self.store_session(SessionData::new(payload.access_token, payload.refresh_token))
            .await;
        Ok(payload.user)
    }

    /// Create a pending account. No session is established; the account is
    /// usable after `verify_otp`.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), ApiError> {
        if !validate::is_valid_email(email) {
            return Err(ApiError::Validation("Invalid email address".to_string()));
        }
        if password.chars().count() < validate::REGISTER_PASSWORD_MIN {
            return Err(ApiError::Validation(format!(
                "Password must be at least {} characters",
                validate::REGISTER_PASSWORD_MIN
            )));
        }

        let body = json!({ "name": name, "email": email, "password": password });
        let _: ApiEnvelope<serde_json::Value> = self.post("/auth/register", &body).await?;
        Ok(())
    }

    /// Confirm the emailed code. The code is checked for shape only; whether
    /// it is correct is the server's call. On success the issued tokens are
    /// persisted and the now-verified user is returned.
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<User, ApiError> {
        if !validate::is_valid_otp(otp) {
            return Err(ApiError::Validation(format!(
                "Verification code must be {} digits",
                validate::OTP_LENGTH
            )));
        }

        let body = json!({ "email": email, "otp": otp });
        let envelope: ApiEnvelope<AuthPayload> = self.post("/auth/verify-otp", &body).await?;
        let payload = Self::require_data(envelope, "/auth/verify-otp")?;
        self.store_session(SessionData::new(payload.access_token, payload.refresh_token))
            .await;
        Ok(payload.user)
    }

    /// Ask for a fresh verification code. The send cooldown is enforced by
    /// `state::SessionState`, not here.
    pub async fn resend_otp(&self, email: &str) -> Result<(), ApiError> {
        let body = json!({ "email": email });
        let _: ApiEnvelope<serde_json::Value> = self.post("/auth/resend-otp", &body).await?;
        Ok(())
    }

    /// Request a password-reset email. Reports success whether or not the
    /// address has an account, so callers cannot probe for registered
    /// emails. Only a transport failure is surfaced.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), ApiError> {
        if !validate::is_valid_email(email) {
            return Err(ApiError::Validation("Invalid email address".to_string()));
        }

        let body = json!({ "email": email });
        let result: Result<ApiEnvelope<serde_json::Value>, ApiError> =
            self.post("/auth/forgot-password", &body).await;
        match result {
            Ok(_) => Ok(()),
            Err(ApiError::NetworkUnavailable(e)) => Err(ApiError::NetworkUnavailable(e)),
            Err(e) => {
                debug!(error = %e, "password reset rejection suppressed");
                Ok(())
            }
        }
    }

    /// Change the password of the signed-in account.
    pub async fn change_password(
        &self,
        current: &str,
        new: &str,
        confirm: &str,
    ) -> Result<(), ApiError> {
        if new.chars().count() < validate::CHANGE_PASSWORD_MIN {
            return Err(ApiError::Validation(format!(
                "Password must be at least {} characters",
                validate::CHANGE_PASSWORD_MIN
            )));
        }
        if new != confirm {
            return Err(ApiError::Validation("Passwords do not match".to_string()));
        }

        let body = json!({ "currentPassword": current, "newPassword": new });
        let _: ApiEnvelope<serde_json::Value> = self.post("/auth/change-password", &body).await?;
        Ok(())
    }

    /// Notify the server, then clear the local session unconditionally.
    /// Never fails: an unreachable server must not leave the app looking
    /// signed in.
    pub async fn logout(&self) {
        let result: Result<ApiEnvelope<serde_json::Value>, ApiError> =
            self.post_empty("/auth/logout").await;
        if let Err(e) = result {
            debug!(error = %e, "logout notification failed; clearing locally anyway");
        }
        self.clear_session().await;
    }

    /// Fetch the signed-in user. A 401 here means the stored token is no
    /// longer honored.
    pub async fn me(&self) -> Result<User, ApiError> {
        let envelope: ApiEnvelope<User> = self.get("/auth/me").await?;
        Self::require_data(envelope, "/auth/me")
    }

    // ===== RFQ Catalog =====

    /// Fetch one page of the catalog. Never follows pagination on its own;
    /// accumulating pages is `state::CatalogState`'s job.
    pub async fn list_rfqs(&self, filters: &RfqFilters) -> Result<PaginatedResponse<Rfq>, ApiError> {
        self.get_with_query("/rfq", &filters.to_query()).await
    }

    /// Fetch one RFQ with the caller's access descriptor. Which contact
    /// fields come back is decided entirely by the server.
    pub async fn rfq_detail(&self, id: &str) -> Result<RfqDetail, ApiError> {
        let envelope: ApiEnvelope<RfqDetail> = self.get(&format!("/rfq/{}", id)).await?;
        Self::require_data(envelope, "/rfq/:id")
    }

    /// Spend one unlock on an RFQ. Fails with `QuotaExhausted` when the
    /// allowance is spent and `Unauthenticated` without a session, so
    /// callers can route to upgrade vs sign-in.
    pub async fn unlock_rfq(&self, id: &str) -> Result<UnlockResult, ApiError> {
        let envelope: ApiEnvelope<UnlockResult> =
            self.post_empty(&format!("/rfq/{}/unlock", id)).await?;
        Self::require_data(envelope, "/rfq/:id/unlock")
    }

    // ===== Account =====

    pub async fn profile(&self) -> Result<User, ApiError> {
        let envelope: ApiEnvelope<User> = self.get("/users/profile").await?;
        Self::require_data(envelope, "/users/profile")
    }

    /// Update only the fields set in `update`; `None` fields are omitted
    /// from the request and stay unchanged server-side.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let envelope: ApiEnvelope<User> = self.put("/users/profile", update).await?;
        Self::require_data(envelope, "/users/profile")
    }

    // ===== Billing =====

    pub async fn plans(&self) -> Result<Vec<Plan>, ApiError> {
        let envelope: ApiEnvelope<Vec<Plan>> = self.get("/plans").await?;
        Self::require_data(envelope, "/plans")
    }

    /// Create a pending bank-transfer order for a plan purchase.
    pub async fn create_bank_transfer(
        &self,
        plan_id: &str,
        period: u32,
        coupon_code: Option<&str>,
    ) -> Result<BankTransferOrder, ApiError> {
        let body = BankTransferRequest {
            plan_id,
            period,
            coupon_code,
        };
        let envelope: ApiEnvelope<BankTransferOrder> =
            self.post("/payments/bank-transfer", &body).await?;
        Self::require_data(envelope, "/payments/bank-transfer")
    }

    /// Check a coupon against a plan. The verdict is advisory; the amount on
    /// the created order is the binding one.
    pub async fn validate_coupon(&self, code: &str, plan_id: &str) -> Result<CouponCheck, ApiError> {
        let body = CouponRequest { code, plan_id };
        let envelope: ApiEnvelope<CouponCheck> = self.post("/coupons/validate", &body).await?;
        Self::require_data(envelope, "/coupons/validate")
    }
}

// Internal API request/response types

#[derive(Debug, Deserialize)]
struct AuthPayload {
    #[serde(rename = "accessToken")]
    access_token: String,
    #[serde(rename = "refreshToken")]
    refresh_token: Option<String>,
    user: User,
}

#[derive(Debug, Serialize)]
struct BankTransferRequest<'a> {
    #[serde(rename = "planId")]
    plan_id: &'a str,
    period: u32,
    #[serde(rename = "couponCode", skip_serializing_if = "Option::is_none")]
    coupon_code: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct CouponRequest<'a> {
    code: &'a str,
    #[serde(rename = "planId")]
    plan_id: &'a str,
}
