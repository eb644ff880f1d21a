//! Pages
//!
//! Top-level page components for each route.

pub mod changelog_detail;
pub mod dashboard;
pub mod login;
pub mod public_changelogs;

pub use changelog_detail::ChangelogDetail;
pub use dashboard::Dashboard;
pub use login::Login;
pub use public_changelogs::PublicChangelogs;
