//! Login Page
//!
//! Landing screen for visitors without a session.

use leptos::*;
use leptos_router::*;

use crate::state::{GlobalState, Session};

#[component]
pub fn Login() -> impl IntoView {
    let session = use_context::<Session>().expect("Session not found");
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let (redirecting, set_redirecting) = create_signal(false);

    let sign_in = move |_| {
        set_redirecting.set(true);
        spawn_local(async move {
            if let Err(e) = session.login().await {
                crate::api::log_error("Failed to start GitHub login", &e);
                state.show_error(&e.message_or("Failed to start login. Please try again."));
                set_redirecting.set(false);
            }
        });
    };

    view! {
        <div class="flex flex-col items-center justify-center min-h-[70vh] text-center px-4">
            <div class="text-6xl mb-4">"📝"</div>
            <h1 class="text-4xl font-bold mb-3">"Changelogger"</h1>
            <p class="text-gray-400 max-w-md mb-8">
                "Turn your GitHub commits into clear, readable changelogs. Pick a repository, \
                 choose the commits that matter and publish the result."
            </p>
            <button
                on:click=sign_in
                disabled=move || redirecting.get()
                class="px-6 py-3 bg-gray-100 text-gray-900 hover:bg-white disabled:opacity-60
                       rounded-lg font-semibold transition-colors"
            >
                {move || if redirecting.get() { "Redirecting to GitHub..." } else { "Sign in with GitHub" }}
            </button>
            <A href="/public" class="mt-6 text-sm text-gray-400 hover:text-white">
                "Browse published changelogs →"
            </A>
        </div>
    }
}
