//! API Routes
//!
//! Route handlers organized by functionality.

pub mod auth;
pub mod changelogs;
pub mod health;
pub mod repositories;
