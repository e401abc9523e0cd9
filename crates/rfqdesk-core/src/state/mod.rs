//! Screen-facing state containers.
//!
//! Each container owns one slice of app state and the `ApiClient` calls
//! that mutate it. They are plain structs constructed with an explicit
//! client, so a test can stand one up against a mock server with no
//! global registry involved.

pub mod catalog;
pub mod detail;
pub mod session;

pub use catalog::CatalogState;
pub use detail::DetailState;
pub use session::SessionState;
