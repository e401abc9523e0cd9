//! Core library for rfqdesk, a client for a B2B RFQ marketplace API.
//!
//! The library owns the client-side API and session contract:
//!
//! - `api`: the HTTP client, one narrow-waist request funnel, and the
//!   `ApiError` taxonomy every call resolves to
//! - `auth`: session token lifecycle, persisted in the OS keychain
//! - `models`: wire types for users, RFQs, contact access, plans, and payments
//! - `state`: screen-facing state containers (session, catalog, detail)
//! - `config`: environment-selected base URLs and saved preferences
//! - `validate`: input shape checks applied before anything hits the network

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod state;
pub mod validate;

pub use api::{ApiClient, ApiError};
pub use auth::{SessionData, SessionManager, SessionStore};
pub use state::{CatalogState, DetailState, SessionState};
