//! Session persistence: token storage and the session lifecycle.

pub mod session;
pub mod store;

pub use session::{SessionData, SessionManager};
pub use store::{SessionStore, StoreError};
