//! Data models for marketplace entities.
//!
//! This module contains all the data structures exchanged with the API:
//!
//! - `ApiEnvelope`, `PaginatedResponse`: response wrappers
//! - `User`, `Subscription`, `TrialInfo`: account state
//! - `Rfq`, `RfqDetail`, `RfqAccess`: the catalog and per-user access
//! - `Plan`, `BankTransferOrder`, `CouponCheck`: billing

pub mod billing;
pub mod envelope;
pub mod rfq;
pub mod user;

pub use billing::{BankInfo, BankTransferOrder, CouponCheck, DiscountType, Plan, PlanInterval};
pub use envelope::{ApiEnvelope, PaginatedResponse, Pagination};
pub use rfq::{
    ContactLevel, ProductCategory, QuotaInfo, Rfq, RfqAccess, RfqDetail, RfqFilters,
    RfqTranslation, UnlockResult, UnlockedContact,
};
pub use user::{ProfileUpdate, Subscription, SubscriptionStatus, TrialInfo, User};
