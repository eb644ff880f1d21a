//! Login sessions
//!
//! GitHub OAuth hands us a user and an access token; both live in an
//! in-memory [`SessionStore`] keyed by the `session_id` cookie. OAuth
//! `state` tokens are kept in the same store until redeemed or expired.

mod session;

pub use session::{Session, SessionStore};

/// Name of the cookie carrying the session id
pub const SESSION_COOKIE: &str = "session_id";
