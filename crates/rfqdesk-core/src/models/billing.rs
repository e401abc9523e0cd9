//! Subscription plans and bank-transfer checkout types.

use serde::{Deserialize, Serialize};

/// A purchasable subscription tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub currency: Option<String>,
    pub interval: PlanInterval,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(rename = "dailyLimit")]
    pub daily_limit: Option<u32>,
    #[serde(rename = "canViewEmail", default)]
    pub can_view_email: bool,
    #[serde(rename = "canViewPhone", default)]
    pub can_view_phone: bool,
    #[serde(rename = "canExportCsv", default)]
    pub can_export_csv: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanInterval {
    Monthly,
    Yearly,
}

impl PlanInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanInterval::Monthly => "monthly",
            PlanInterval::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for PlanInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A pending bank-transfer order created for a plan purchase. Payment is
/// confirmed out of band; the client only displays these instructions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankTransferOrder {
    #[serde(rename = "orderId")]
    pub order_id: String,
    #[serde(rename = "bankInfo")]
    pub bank_info: BankInfo,
    #[serde(rename = "expiresAt")]
    pub expires_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankInfo {
    #[serde(rename = "bankName")]
    pub bank_name: String,
    #[serde(rename = "accountNumber")]
    pub account_number: String,
    #[serde(rename = "accountName")]
    pub account_name: String,
    /// Transfer memo the buyer must include so the order can be matched.
    pub content: String,
    pub amount: f64,
    #[serde(rename = "qrUrl")]
    pub qr_url: Option<String>,
}

/// Server verdict on a coupon code for a given plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponCheck {
    pub valid: bool,
    #[serde(default)]
    pub discount: f64,
    #[serde(rename = "discountType", default)]
    pub discount_type: DiscountType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percent,
    Fixed,
}

impl Default for DiscountType {
    fn default() -> Self {
        DiscountType::Percent
    }
}

impl CouponCheck {
    /// Discounted total for display. The amount on the created order is the
    /// binding one; this only previews it.
    pub fn provisional_total(&self, amount: f64) -> f64 {
        if !self.valid {
            return amount;
        }
        match self.discount_type {
            DiscountType::Percent => amount * (1.0 - self.discount / 100.0),
            DiscountType::Fixed => (amount - self.discount).max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_parses_wire_names() {
        let json = r#"{
            "id": "plan-pro",
            "name": "Pro",
            "price": 49.0,
            "currency": "USD",
            "interval": "monthly",
            "features": ["Unlimited search"],
            "dailyLimit": 20,
            "canViewEmail": true,
            "canViewPhone": true
        }"#;
        let plan: Plan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.interval, PlanInterval::Monthly);
        assert_eq!(plan.daily_limit, Some(20));
        assert!(plan.can_view_phone);
        assert!(!plan.can_export_csv);
    }

    #[test]
    fn test_provisional_total_percent_discount() {
        let check = CouponCheck {
            valid: true,
            discount: 25.0,
            discount_type: DiscountType::Percent,
        };
        assert_eq!(check.provisional_total(100.0), 75.0);
    }

    #[test]
    fn test_provisional_total_fixed_discount_floors_at_zero() {
        let check = CouponCheck {
            valid: true,
            discount: 150.0,
            discount_type: DiscountType::Fixed,
        };
        assert_eq!(check.provisional_total(100.0), 0.0);
    }

    #[test]
    fn test_provisional_total_ignores_invalid_coupon() {
        let check = CouponCheck {
            valid: false,
            discount: 50.0,
            discount_type: DiscountType::Percent,
        };
        assert_eq!(check.provisional_total(100.0), 100.0);
    }
}
