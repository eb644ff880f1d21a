//! App Root Component
//!
//! Routing plus the global and session providers.

use leptos::*;
use leptos_router::*;

use crate::components::{Loading, Toast};
use crate::pages::{ChangelogDetail, Dashboard, Login, PublicChangelogs};
use crate::state::{provide_global_state, provide_session, Session};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();
    provide_session();

    view! {
        <Router>
            <div class="min-h-screen bg-gray-900 text-white">
                <Routes>
                    <Route path="/" view=Home />
                    <Route path="/public" view=PublicChangelogs />
                    <Route path="/changelog/:id" view=ChangelogDetail />
                    <Route path="/*any" view=NotFound />
                </Routes>

                // Toast notifications
                <Toast />
            </div>
        </Router>
    }
}

/// Dashboard when signed in, otherwise the login screen
#[component]
fn Home() -> impl IntoView {
    let session = use_context::<Session>().expect("Session not found");

    move || {
        if session.loading.get() {
            view! { <Loading message="Loading..." /> }.into_view()
        } else if session.is_authenticated() {
            view! { <Dashboard /> }.into_view()
        } else {
            view! { <Login /> }.into_view()
        }
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-400 mb-6">"Nothing lives at this address."</p>
            <div class="flex space-x-3">
                <A href="/" class="px-6 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors">
                    "Dashboard"
                </A>
                <A href="/public" class="px-6 py-3 bg-gray-700 hover:bg-gray-600 rounded-lg font-medium transition-colors">
                    "Published changelogs"
                </A>
            </div>
        </div>
    }
}
