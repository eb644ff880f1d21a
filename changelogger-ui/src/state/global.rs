//! Global Application State
//!
//! Toast messages shared by every page.

use leptos::*;

const SUCCESS_TIMEOUT_MS: u32 = 3000;
const ERROR_TIMEOUT_MS: u32 = 5000;

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Error toast
    pub error: RwSignal<Option<String>>,
    /// Success toast
    pub success: RwSignal<Option<String>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    provide_context(GlobalState {
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    });
}

impl GlobalState {
    pub fn show_success(&self, message: &str) {
        flash(self.success, message, SUCCESS_TIMEOUT_MS);
    }

    pub fn show_error(&self, message: &str) {
        flash(self.error, message, ERROR_TIMEOUT_MS);
    }
}

/// Set `slot` and clear it after `timeout_ms`, unless a newer message has
/// replaced it by then.
fn flash(slot: RwSignal<Option<String>>, message: &str, timeout_ms: u32) {
    let message = message.to_string();
    slot.set(Some(message.clone()));

    gloo_timers::callback::Timeout::new(timeout_ms, move || {
        let _ = slot.try_update(|current| {
            if current.as_deref() == Some(message.as_str()) {
                *current = None;
            }
        });
    })
    .forget();
}
