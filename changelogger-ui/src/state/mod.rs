//! State Management
//!
//! Toasts, the session context and the pure models behind the dashboard
//! wizard and the public list.

pub mod global;
pub mod models;
pub mod session;
pub mod stacks;
pub mod wizard;

pub use global::{provide_global_state, GlobalState};
pub use session::{provide_session, Session};
