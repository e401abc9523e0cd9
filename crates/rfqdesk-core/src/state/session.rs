//! Authentication state: the signed-in user and the auth flows.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::models::{ProfileUpdate, User};

/// Minimum gap between verification-code resends.
/// Matches the server's send rate limit so users see a countdown instead of
/// a rejection.
const RESEND_COOLDOWN: Duration = Duration::from_secs(60);

/// Holds the signed-in user and drives sign-in, registration, and
/// verification. One instance per app; screens read from it rather than
/// keeping their own copies of the user.
pub struct SessionState {
    client: ApiClient,
    user: Option<User>,
    last_resend: Option<Instant>,
}

impl SessionState {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            user: None,
            last_resend: None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Decide authenticated vs anonymous from the stored session.
    ///
    /// Any failure to confirm the session signs the user out locally; a
    /// stale token must never leave the app half signed in.
    pub async fn check_auth(&mut self) -> bool {
        if !self.client.has_session().await {
            self.user = None;
            return false;
        }
        match self.client.me().await {
            Ok(user) => {
                self.user = Some(user);
                true
            }
            Err(e) => {
                debug!(error = %e, "stored session rejected; signing out");
                self.client.clear_session().await;
                self.user = None;
                false
            }
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ApiError> {
        let user = self.client.login(email, password).await?;
        self.user = Some(user);
        Ok(())
    }

    /// Create a pending account. The user stays signed out until the
    /// emailed code is confirmed with [`verify_otp`](Self::verify_otp).
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), ApiError> {
        self.client.register(name, email, password).await
    }

    pub async fn verify_otp(&mut self, email: &str, otp: &str) -> Result<(), ApiError> {
        let user = self.client.verify_otp(email, otp).await?;
        self.user = Some(user);
        Ok(())
    }

    /// Ask for a fresh verification code, refusing resends inside the
    /// cooldown window without contacting the server.
    pub async fn resend_otp(&mut self, email: &str) -> Result<(), ApiError> {
        if let Some(last) = self.last_resend {
            let elapsed = last.elapsed();
            if elapsed < RESEND_COOLDOWN {
                let wait = (RESEND_COOLDOWN - elapsed).as_secs().max(1);
                return Err(ApiError::Validation(format!(
                    "Please wait {}s before requesting another code",
                    wait
                )));
            }
        }
        self.client.resend_otp(email).await?;
        self.last_resend = Some(Instant::now());
        Ok(())
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<(), ApiError> {
        self.client.request_password_reset(email).await
    }

    pub async fn change_password(
        &self,
        current: &str,
        new: &str,
        confirm: &str,
    ) -> Result<(), ApiError> {
        self.client.change_password(current, new, confirm).await
    }

    /// Update the profile and replace the cached user with the server's
    /// version of it.
    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> Result<(), ApiError> {
        let user = self.client.update_profile(update).await?;
        self.user = Some(user);
        Ok(())
    }

    /// Sign out. Always succeeds locally, whatever the server says.
    pub async fn logout(&mut self) {
        self.client.logout().await;
        self.user = None;
    }
}
