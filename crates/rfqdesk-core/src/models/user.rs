//! Account, subscription, and profile types.

use serde::{Deserialize, Serialize};

/// The authenticated account. Replaced wholesale on each fetch; the client
/// never mutates individual fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub country: Option<String>,
    pub role: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
    pub subscription: Option<Subscription>,
    #[serde(rename = "trialInfo")]
    pub trial_info: Option<TrialInfo>,
}

impl User {
    /// Name to show in UIs, falling back to the email address.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.email)
    }

    /// Whether the account has a currently active paid plan.
    pub fn has_active_subscription(&self) -> bool {
        self.subscription
            .as_ref()
            .map(|s| s.status == SubscriptionStatus::Active)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(rename = "planId")]
    pub plan_id: String,
    #[serde(rename = "planName")]
    pub plan_name: String,
    pub status: SubscriptionStatus,
    #[serde(rename = "expiresAt")]
    pub expires_at: Option<String>,
    #[serde(rename = "dailyLimit")]
    pub daily_limit: Option<u32>,
    #[serde(rename = "usedToday")]
    pub used_today: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    Cancelled,
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionStatus::Active => write!(f, "active"),
            SubscriptionStatus::Expired => write!(f, "expired"),
            SubscriptionStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Free-tier allowance granted before a paid subscription is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialInfo {
    #[serde(rename = "isInTrial", default)]
    pub is_in_trial: bool,
    #[serde(rename = "trialEndsAt")]
    pub trial_ends_at: Option<String>,
    #[serde(rename = "trialDaysRemaining")]
    pub trial_days_remaining: Option<u32>,
    #[serde(rename = "emailVerified", default)]
    pub email_verified: bool,
}

/// Partial profile update. Only populated fields are sent; the server
/// leaves omitted fields unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.company.is_none()
            && self.phone.is_none()
            && self.whatsapp.is_none()
            && self.country.is_none()
    }
}
