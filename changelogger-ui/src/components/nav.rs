//! Navigation Component
//!
//! Header bar for signed-in pages.

use leptos::*;
use leptos_router::*;

use crate::state::{GlobalState, Session};

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let session = use_context::<Session>().expect("Session not found");
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let sign_out = move |_| {
        spawn_local(async move {
            session.logout().await;
            state.show_success("Signed out");
        });
    };

    view! {
        <nav class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    // Logo and brand
                    <A href="/" class="flex items-center space-x-3">
                        <span class="text-2xl">"📝"</span>
                        <span class="text-xl font-bold text-white">"Changelogger"</span>
                    </A>

                    <div class="flex items-center space-x-4">
                        {move || session.user.get().map(|user| {
                            let display = user.display_name().to_string();
                            view! {
                                <div class="flex items-center space-x-3">
                                    <img
                                        src=user.avatar_url.clone()
                                        alt=user.login.clone()
                                        class="w-8 h-8 rounded-full bg-gray-700"
                                    />
                                    <div class="text-sm leading-tight">
                                        <div class="text-white font-medium">{display}</div>
                                        <div class="text-gray-400">{format!("@{}", user.login)}</div>
                                    </div>
                                </div>
                            }
                        })}
                        <A
                            href="/public"
                            class="px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
                        >
                            "View Published"
                        </A>
                        <button
                            on:click=sign_out
                            class="px-4 py-2 rounded-lg bg-gray-700 hover:bg-gray-600 text-sm font-medium transition-colors"
                        >
                            "Sign out"
                        </button>
                    </div>
                </div>
            </div>
        </nav>
    }
}
