//! Toast Notifications
//!
//! Transient success and error messages in the bottom-right corner. Each
//! one can be dismissed before its timeout.

use leptos::*;

use crate::state::global::GlobalState;

#[component]
pub fn Toast() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <div class="fixed bottom-6 right-4 z-50 space-y-2 w-80">
            <ToastSlot message=state.success tone="bg-green-600" icon="✓" />
            <ToastSlot message=state.error tone="bg-red-600" icon="✕" />
        </div>
    }
}

/// Shows the message while it is set
#[component]
fn ToastSlot(
    message: RwSignal<Option<String>>,
    tone: &'static str,
    icon: &'static str,
) -> impl IntoView {
    move || {
        message.get().map(|text| view! {
            <div
                role="status"
                class=format!("flex items-start space-x-3 {} text-white px-4 py-3 rounded-lg shadow-lg", tone)
            >
                <span class="text-lg leading-none">{icon}</span>
                <span class="flex-1 text-sm font-medium">{text}</span>
                <button
                    on:click=move |_| message.set(None)
                    class="text-white/70 hover:text-white text-sm"
                    aria-label="Dismiss"
                >
                    "×"
                </button>
            </div>
        })
    }
}
