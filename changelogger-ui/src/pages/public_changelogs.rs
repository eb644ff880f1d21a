//! Public Changelogs Page
//!
//! Published changelogs grouped into one stack per repository.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::{ChangelogCard, Loading};
use crate::state::stacks::{group_by_repository, ExpandedStacks, RepositoryStack};

#[component]
pub fn PublicChangelogs() -> impl IntoView {
    let (stacks, set_stacks) = create_signal(Vec::<RepositoryStack>::new());
    let (loading, set_loading) = create_signal(true);
    let (error, set_error) = create_signal(None::<String>);
    let expanded = create_rw_signal(ExpandedStacks::default());

    spawn_local(async move {
        match api::list_changelogs(true).await {
            Ok(list) => {
                let _ = set_stacks.try_set(group_by_repository(list));
            }
            Err(e) => {
                api::log_error("Failed to load changelogs", &e);
                let _ = set_error.try_set(Some(
                    e.message_or("Failed to load changelogs. Please try again later."),
                ));
            }
        }
        let _ = set_loading.try_set(false);
    });

    view! {
        <div class="min-h-screen container mx-auto px-4 py-8 max-w-4xl">
            <header class="flex items-center justify-between mb-10">
                <A href="/" class="text-sm text-gray-400 hover:text-white">"← Developer View"</A>
                <div class="text-center">
                    <h1 class="text-3xl font-bold">"Changelogger"</h1>
                    <p class="text-gray-400 mt-1">"Latest updates and changes"</p>
                </div>
                <div class="w-24" />
            </header>

            {move || {
                if loading.get() {
                    view! { <Loading message="Loading changelogs..." /> }.into_view()
                } else if let Some(msg) = error.get() {
                    view! {
                        <div class="bg-red-900/40 border border-red-700 text-red-200 rounded-lg px-4 py-3">
                            {msg}
                        </div>
                    }.into_view()
                } else if stacks.with(|s| s.is_empty()) {
                    view! {
                        <div class="text-center py-16 text-gray-400">
                            <h3 class="text-xl text-white mb-2">"No changelogs published yet"</h3>
                            <p>"Check back later for updates!"</p>
                        </div>
                    }.into_view()
                } else {
                    view! {
                        <div class="space-y-10">
                            {stacks.get().into_iter().map(|stack| view! {
                                <Stack stack=stack expanded=expanded />
                            }).collect_view()}
                        </div>
                    }.into_view()
                }
            }}
        </div>
    }
}

/// One repository's changelogs: the newest card, with the rest behind a toggle
#[component]
fn Stack(stack: RepositoryStack, expanded: RwSignal<ExpandedStacks>) -> impl IntoView {
    let repository = stack.repository().to_string();
    let hidden = stack.hidden_count();
    let is_open = {
        let repository = repository.clone();
        move || expanded.with(|e| e.is_expanded(&repository))
    };
    let toggle = {
        let repository = repository.clone();
        move |_: ev::MouseEvent| expanded.update(|e| e.toggle(&repository))
    };

    let latest = stack.latest().cloned();
    let older: Vec<_> = stack.changelogs().iter().skip(1).cloned().collect();

    view! {
        <section class="space-y-4">
            <h2 class="text-lg font-semibold text-gray-300">{repository}</h2>

            {latest.map(|changelog| view! { <ChangelogCard changelog=changelog /> })}

            {stack.is_stacked().then(|| {
                view! {
                    <Show when=is_open.clone() fallback=|| ()>
                        <div class="space-y-4 pl-4 border-l-2 border-gray-700">
                            {older.clone().into_iter().map(|changelog| view! {
                                <ChangelogCard changelog=changelog />
                            }).collect_view()}
                        </div>
                    </Show>
                    <button
                        on:click=toggle
                        class="text-sm text-primary-400 hover:text-primary-300 font-medium"
                    >
                        {move || if is_open() {
                            "Show less".to_string()
                        } else {
                            format!("{} more", hidden)
                        }}
                    </button>
                }
            })}
        </section>
    }
}
