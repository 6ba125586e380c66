//! Authentication
//!
//! Bearer token middleware. Tokens are opaque `sk-` keys; only their SHA-256
//! is stored.

mod bearer;

pub use bearer::{auth_middleware, require_admin};
