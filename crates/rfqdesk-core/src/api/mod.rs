//! API transport: the HTTP client and its error taxonomy.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
