//! Changelogger Dashboard
//!
//! Browser front end for Changelogger, built with Leptos (WASM).
//!
//! # Screens
//!
//! - `/`: sign in, then the three-step changelog wizard
//! - `/public`: published changelogs, stacked per repository
//! - `/changelog/:id`: one changelog, editable when signed in
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. It talks to the Changelogger API over HTTP with the session
//! cookie; the API base URL can be overridden through the
//! `changelogger_api_url` local storage key.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
