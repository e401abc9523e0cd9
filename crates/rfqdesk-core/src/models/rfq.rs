//! RFQ catalog types: listings, detail payloads, contact access, unlocks.

use serde::{Deserialize, Serialize};

/// A buyer-posted sourcing request.
///
/// List responses carry the public fields only. Detail responses may add the
/// `buyer_*` contact fields; which of them are present is decided entirely by
/// the server from the caller's entitlement, so every one is optional here
/// and the client renders whatever it receives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rfq {
    pub id: String,
    pub slug: Option<String>,
    #[serde(rename = "titleEn")]
    pub title_en: String,
    #[serde(rename = "descriptionEn")]
    pub description_en: Option<String>,
    #[serde(rename = "productCategory")]
    pub product_category: Option<ProductCategory>,
    #[serde(rename = "buyerCountry")]
    pub buyer_country: String,
    #[serde(rename = "buyerCountryCode")]
    pub buyer_country_code: Option<String>,
    pub quantity: String,
    #[serde(rename = "quantityUnit")]
    pub quantity_unit: Option<String>,
    pub incoterms: String,
    #[serde(rename = "targetPrice")]
    pub target_price: Option<f64>,
    #[serde(rename = "shippingPort")]
    pub shipping_port: Option<String>,
    #[serde(rename = "qualityScore")]
    pub quality_score: Option<f32>,
    #[serde(rename = "isFeatured", default)]
    pub is_featured: bool,
    #[serde(rename = "isEarlyAccess", default)]
    pub is_early_access: bool,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
    #[serde(rename = "translationVi")]
    pub translation_vi: Option<RfqTranslation>,

    // Buyer contact fields, present only at the granted contact level
    #[serde(rename = "buyerName")]
    pub buyer_name: Option<String>,
    #[serde(rename = "buyerCompany")]
    pub buyer_company: Option<String>,
    #[serde(rename = "buyerEmail")]
    pub buyer_email: Option<String>,
    #[serde(rename = "buyerPhone")]
    pub buyer_phone: Option<String>,
    #[serde(rename = "buyerWhatsapp")]
    pub buyer_whatsapp: Option<String>,
}

impl Rfq {
    /// Title in the preferred language, falling back to English.
    pub fn title(&self, prefer_vietnamese: bool) -> &str {
        if prefer_vietnamese {
            if let Some(title) = self
                .translation_vi
                .as_ref()
                .and_then(|t| t.title_vi.as_deref())
                .filter(|t| !t.is_empty())
            {
                return title;
            }
        }
        &self.title_en
    }

    /// Quantity with its unit, e.g. "500 kg".
    pub fn quantity_display(&self) -> String {
        match self.quantity_unit.as_deref() {
            Some(unit) if !unit.is_empty() => format!("{} {}", self.quantity, unit),
            _ => self.quantity.clone(),
        }
    }

    pub fn category_name(&self) -> Option<&str> {
        self.product_category.as_ref().map(|c| c.name_en.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCategory {
    pub id: String,
    #[serde(rename = "nameEn")]
    pub name_en: String,
    #[serde(rename = "nameVi")]
    pub name_vi: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfqTranslation {
    #[serde(rename = "titleVi")]
    pub title_vi: Option<String>,
    #[serde(rename = "descriptionVi")]
    pub description_vi: Option<String>,
}

/// Tier of buyer contact fields visible to the caller for one RFQ.
///
/// Ordered from least to most permissive, so tiers compare with `<`/`>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactLevel {
    None,
    EmailOnly,
    EmailPhone,
    Full,
}

impl ContactLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactLevel::None => "none",
            ContactLevel::EmailOnly => "email_only",
            ContactLevel::EmailPhone => "email_phone",
            ContactLevel::Full => "full",
        }
    }

    pub fn includes_email(&self) -> bool {
        *self >= ContactLevel::EmailOnly
    }

    pub fn includes_phone(&self) -> bool {
        *self >= ContactLevel::EmailPhone
    }
}

impl Default for ContactLevel {
    fn default() -> Self {
        ContactLevel::None
    }
}

impl std::fmt::Display for ContactLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-(user, RFQ) access descriptor returned alongside a detail payload.
/// Not cached beyond the current detail pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfqAccess {
    #[serde(rename = "contactLevel", default)]
    pub contact_level: ContactLevel,
    #[serde(rename = "quotaInfo")]
    pub quota_info: Option<QuotaInfo>,
}

/// Unlock allowance counters for the current billing or trial period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaInfo {
    #[serde(default)]
    pub used: u32,
    #[serde(default)]
    pub limit: u32,
    pub remaining: u32,
    #[serde(rename = "daysLeft")]
    pub days_left: Option<u32>,
}

/// Contact bundle revealed by an unlock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockedContact {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
}

/// Outcome of spending one unlock: the revealed contact plus updated
/// counters. Callers still refetch the detail to reconcile access state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockResult {
    pub contact: UnlockedContact,
    pub quota: QuotaInfo,
}

/// Detail payload: the RFQ and the caller's access to it, always together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfqDetail {
    pub rfq: Rfq,
    pub access: RfqAccess,
}

/// Catalog list filters. Multi-select fields are submitted as repeated
/// query parameters.
#[derive(Debug, Clone, Default)]
pub struct RfqFilters {
    pub query: Option<String>,
    pub categories: Vec<String>,
    pub countries: Vec<String>,
    pub incoterms: Vec<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl RfqFilters {
    /// Render as query parameters the list endpoint understands.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(q) = self.query.as_deref().filter(|q| !q.is_empty()) {
            params.push(("q", q.to_string()));
        }
        for category in &self.categories {
            params.push(("category", category.clone()));
        }
        for country in &self.countries {
            params.push(("country", country.clone()));
        }
        for incoterm in &self.incoterms {
            params.push(("incoterm", incoterm.clone()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rfq_json() -> &'static str {
        r#"{
            "id": "rfq-9",
            "slug": "arabica-green-beans",
            "titleEn": "Arabica green beans",
            "productCategory": {"id": "cat-2", "nameEn": "Coffee"},
            "buyerCountry": "Germany",
            "buyerCountryCode": "DE",
            "quantity": "500",
            "quantityUnit": "kg",
            "incoterms": "FOB",
            "qualityScore": 4.5,
            "isFeatured": true,
            "createdAt": "2026-02-01T00:00:00Z",
            "translationVi": {"titleVi": "Cà phê Arabica nhân xanh"}
        }"#
    }

    #[test]
    fn test_rfq_parses_without_contact_fields() {
        let rfq: Rfq = serde_json::from_str(sample_rfq_json()).unwrap();
        assert_eq!(rfq.id, "rfq-9");
        assert_eq!(rfq.category_name(), Some("Coffee"));
        assert!(rfq.is_featured);
        assert!(rfq.buyer_email.is_none());
        assert!(rfq.buyer_phone.is_none());
        assert_eq!(rfq.quantity_display(), "500 kg");
    }

    #[test]
    fn test_rfq_title_language_fallback() {
        let rfq: Rfq = serde_json::from_str(sample_rfq_json()).unwrap();
        assert_eq!(rfq.title(false), "Arabica green beans");
        assert_eq!(rfq.title(true), "Cà phê Arabica nhân xanh");

        let mut rfq = rfq;
        rfq.translation_vi = None;
        assert_eq!(rfq.title(true), "Arabica green beans");
    }

    // ---- Contact levels ----

    #[test]
    fn test_contact_level_wire_names() {
        let level: ContactLevel = serde_json::from_str(r#""email_phone""#).unwrap();
        assert_eq!(level, ContactLevel::EmailPhone);
        assert_eq!(serde_json::to_string(&ContactLevel::Full).unwrap(), r#""full""#);
        assert_eq!(ContactLevel::EmailOnly.as_str(), "email_only");
    }

    #[test]
    fn test_contact_level_orders_by_permissiveness() {
        assert!(ContactLevel::None < ContactLevel::EmailOnly);
        assert!(ContactLevel::EmailOnly < ContactLevel::EmailPhone);
        assert!(ContactLevel::EmailPhone < ContactLevel::Full);

        assert!(!ContactLevel::None.includes_email());
        assert!(ContactLevel::EmailOnly.includes_email());
        assert!(!ContactLevel::EmailOnly.includes_phone());
        assert!(ContactLevel::Full.includes_phone());
    }

    #[test]
    fn test_access_defaults_to_no_contact() {
        let access: RfqAccess = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(access.contact_level, ContactLevel::None);
        assert!(access.quota_info.is_none());
    }

    // ---- Filters ----

    #[test]
    fn test_filters_to_query_repeats_multiselect_params() {
        let filters = RfqFilters {
            query: Some("coffee".to_string()),
            categories: vec!["cat-1".to_string(), "cat-2".to_string()],
            countries: vec!["DE".to_string()],
            incoterms: vec![],
            page: Some(2),
            limit: Some(12),
        };
        let params = filters.to_query();
        assert_eq!(
            params,
            vec![
                ("q", "coffee".to_string()),
                ("category", "cat-1".to_string()),
                ("category", "cat-2".to_string()),
                ("country", "DE".to_string()),
                ("page", "2".to_string()),
                ("limit", "12".to_string()),
            ]
        );
    }

    #[test]
    fn test_filters_to_query_skips_empty_fields() {
        assert!(RfqFilters::default().to_query().is_empty());

        let filters = RfqFilters {
            query: Some(String::new()),
            ..Default::default()
        };
        assert!(filters.to_query().is_empty());
    }
}
