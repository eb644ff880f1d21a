//! Changelog Detail Page
//!
//! A single changelog. Signed-in users can also edit, publish or unpublish,
//! and delete it.

use leptos::*;
use leptos_router::*;

use crate::api::{self, ApiError, ChangelogUpdate};
use crate::components::{Loading, Markdown};
use crate::state::models::{format_date, Changelog};
use crate::state::{GlobalState, Session};

#[component]
pub fn ChangelogDetail() -> impl IntoView {
    let params = use_params_map();
    let id = move || params.with(|p| p.get("id").and_then(|id| id.parse::<i64>().ok()));

    let (changelog, set_changelog) = create_signal(None::<Changelog>);
    let (loading, set_loading) = create_signal(true);
    let (error, set_error) = create_signal(None::<String>);

    let load = move |id: i64| {
        set_loading.set(true);
        if changelog.with_untracked(|c| shows_other(c.as_ref(), id)) {
            set_changelog.set(None);
        }
        spawn_local(async move {
            let result = api::get_changelog(id).await;
            if let Err(e) = &result {
                api::log_error("Failed to load changelog", e);
            }
            settle_load(result, set_changelog, set_error);
            let _ = set_loading.try_set(false);
        });
    };

    create_effect(move |_| match id() {
        Some(id) => load(id),
        None => {
            set_changelog.set(None);
            set_error.set(Some("Changelog not found".to_string()));
            set_loading.set(false);
        }
    });

    view! {
        <div class="min-h-screen container mx-auto px-4 py-8 max-w-3xl">
            <div class="flex items-center justify-between mb-8 text-sm">
                <A href="/public" class="text-gray-400 hover:text-white">"← All changelogs"</A>
                <A href="/" class="text-gray-400 hover:text-white">"Developer View"</A>
            </div>

            {move || {
                if loading.get() && changelog.with(|c| c.is_none()) {
                    view! { <Loading message="Loading changelog..." /> }.into_view()
                } else if let Some(msg) = error.get() {
                    view! {
                        <div class="bg-red-900/40 border border-red-700 text-red-200 rounded-lg px-4 py-3">
                            {msg}
                        </div>
                    }.into_view()
                } else {
                    changelog.get().map(|c| view! {
                        <ChangelogView changelog=c on_changed=Callback::new(load) />
                    }).into_view()
                }
            }}
        </div>
    }
}

/// Whether `current` is a different changelog than `id`
fn shows_other(current: Option<&Changelog>, id: i64) -> bool {
    current.is_some_and(|c| c.id != id)
}

/// Apply a load result. A failure drops whatever was shown before.
fn settle_load(
    result: Result<Changelog, ApiError>,
    set_changelog: WriteSignal<Option<Changelog>>,
    set_error: WriteSignal<Option<String>>,
) {
    match result {
        Ok(found) => {
            let _ = set_changelog.try_set(Some(found));
            let _ = set_error.try_set(None);
        }
        Err(e) => {
            let _ = set_changelog.try_set(None);
            let _ = set_error.try_set(Some(e.message_or("Failed to load changelog.")));
        }
    }
}

#[component]
fn ChangelogView(changelog: Changelog, on_changed: Callback<i64>) -> impl IntoView {
    let session = use_context::<Session>().expect("Session not found");
    let id = changelog.id;
    let published = changelog.published;

    let (editing, set_editing) = create_signal(false);
    let content = changelog.content.clone();
    let editable = changelog.clone();

    view! {
        <article class="space-y-6">
            <header>
                <div class="flex items-center space-x-3">
                    <h1 class="text-3xl font-bold">{changelog.title.clone()}</h1>
                    {(!published).then(|| view! {
                        <span class="text-xs px-2 py-1 rounded-full bg-yellow-900 text-yellow-300">"Draft"</span>
                    })}
                </div>
                <div class="flex flex-wrap gap-x-4 text-sm text-gray-400 mt-2">
                    <span>{changelog.repository.clone()}</span>
                    <span>{format_date(&changelog.created_at)}</span>
                    {(!changelog.commit_range.is_empty()).then(|| view! {
                        <span>{changelog.commit_range.clone()}</span>
                    })}
                    {(!changelog.author.is_empty()).then(|| view! {
                        <span>{format!("by @{}", changelog.author)}</span>
                    })}
                </div>
            </header>

            {move || {
                if editing.get() {
                    view! {
                        <EditForm
                            changelog=editable.clone()
                            on_done=Callback::new(move |saved: bool| {
                                set_editing.set(false);
                                if saved {
                                    on_changed.call(id);
                                }
                            })
                        />
                    }.into_view()
                } else {
                    view! {
                        <div class="bg-gray-800 rounded-xl p-6">
                            <Markdown content=content.clone() />
                        </div>
                    }.into_view()
                }
            }}

            <Show when=move || session.is_authenticated() && !editing.get() fallback=|| ()>
                <OwnerActions
                    id=id
                    published=published
                    on_edit=Callback::new(move |_| set_editing.set(true))
                    on_changed=on_changed
                />
            </Show>
        </article>
    }
}

/// Edit / publish toggle / delete
#[component]
fn OwnerActions(
    id: i64,
    published: bool,
    on_edit: Callback<()>,
    on_changed: Callback<i64>,
) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let (busy, set_busy) = create_signal(false);

    let toggle_published = move |_| {
        set_busy.set(true);
        spawn_local(async move {
            let update = ChangelogUpdate {
                published: Some(!published),
                ..Default::default()
            };
            match api::update_changelog(id, &update).await {
                Ok(_) => {
                    state.show_success(if published { "Changelog unpublished" } else { "Changelog published" });
                    on_changed.call(id);
                }
                Err(e) => {
                    api::log_error("Failed to update changelog", &e);
                    state.show_error(&e.message_or("Failed to update changelog. Please try again."));
                }
            }
            let _ = set_busy.try_set(false);
        });
    };

    let navigate = use_navigate();
    let delete = move |_| {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message("Delete this changelog? This cannot be undone.").ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        set_busy.set(true);
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::delete_changelog(id).await {
                Ok(_) => {
                    state.show_success("Changelog deleted");
                    navigate("/", Default::default());
                }
                Err(e) => {
                    api::log_error("Failed to delete changelog", &e);
                    state.show_error(&e.message_or("Failed to delete changelog. Please try again."));
                    let _ = set_busy.try_set(false);
                }
            }
        });
    };

    view! {
        <div class="flex space-x-3">
            <button
                on:click=move |_| on_edit.call(())
                disabled=move || busy.get()
                class="px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg text-sm font-medium transition-colors"
            >
                "Edit"
            </button>
            <button
                on:click=toggle_published
                disabled=move || busy.get()
                class="px-4 py-2 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-700
                       rounded-lg text-sm font-medium transition-colors"
            >
                {if published { "Unpublish" } else { "Publish" }}
            </button>
            <button
                on:click=delete
                disabled=move || busy.get()
                class="px-4 py-2 bg-red-700 hover:bg-red-600 disabled:bg-gray-700
                       rounded-lg text-sm font-medium transition-colors"
            >
                "Delete"
            </button>
        </div>
    }
}

/// Inline title/content editor; `on_done(true)` after a successful save
#[component]
fn EditForm(changelog: Changelog, on_done: Callback<bool>) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let (title, set_title) = create_signal(changelog.title.clone());
    let (content, set_content) = create_signal(changelog.content.clone());
    let (saving, set_saving) = create_signal(false);
    let id = changelog.id;

    let blank = move || title.with(|t| t.trim().is_empty()) || content.with(|c| c.trim().is_empty());

    let save = move |_| {
        if blank() {
            state.show_error("Please provide a title and content for the changelog.");
            return;
        }
        set_saving.set(true);
        let update = ChangelogUpdate {
            title: Some(title.get_untracked().trim().to_string()),
            content: Some(content.get_untracked()),
            published: None,
        };
        spawn_local(async move {
            match api::update_changelog(id, &update).await {
                Ok(_) => {
                    state.show_success("Changelog updated");
                    on_done.call(true);
                }
                Err(e) => {
                    api::log_error("Failed to update changelog", &e);
                    state.show_error(&e.message_or("Failed to update changelog. Please try again."));
                    let _ = set_saving.try_set(false);
                }
            }
        });
    };

    view! {
        <div class="bg-gray-800 rounded-xl p-6 space-y-4">
            <input
                type="text"
                prop:value=move || title.get()
                on:input=move |ev| set_title.set(event_target_value(&ev))
                class="w-full bg-gray-700 rounded-lg px-4 py-3
                       border border-gray-600 focus:border-primary-500 focus:outline-none"
            />
            <textarea
                rows="18"
                prop:value=move || content.get()
                on:input=move |ev| set_content.set(event_target_value(&ev))
                class="w-full bg-gray-700 rounded-lg px-4 py-3 font-mono text-sm
                       border border-gray-600 focus:border-primary-500 focus:outline-none"
            />
            <div class="flex space-x-3">
                <button
                    on:click=move |_| on_done.call(false)
                    class="px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg text-sm font-medium transition-colors"
                >
                    "Cancel"
                </button>
                <button
                    on:click=save
                    disabled=move || saving.get() || blank()
                    class="px-4 py-2 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-700
                           rounded-lg text-sm font-medium transition-colors"
                >
                    {move || if saving.get() { "Saving..." } else { "Save" }}
                </button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changelog(id: i64, title: &str) -> Changelog {
        Changelog {
            id,
            title: title.into(),
            content: "## Changes".into(),
            author: "octocat".into(),
            repository: "acme/widgets".into(),
            commit_range: "since: 2024-01-01".into(),
            raw_commits: serde_json::Value::Null,
            published: true,
            created_at: "2024-02-10T12:00:00Z".into(),
        }
    }

    #[test]
    fn test_other_changelog_is_detected() {
        let shown = changelog(1, "v1.0");
        assert!(shows_other(Some(&shown), 2));
        assert!(!shows_other(Some(&shown), 1));
        assert!(!shows_other(None, 2));
    }

    #[test]
    fn test_failed_load_clears_previous_changelog() {
        let runtime = create_runtime();
        let (changelog_signal, set_changelog) = create_signal(Some(changelog(1, "v1.0")));
        let (error, set_error) = create_signal(None::<String>);

        settle_load(
            Err(ApiError::from_body(404, r#"{"detail":"Changelog 2 not found"}"#)),
            set_changelog,
            set_error,
        );
        assert_eq!(changelog_signal.get_untracked(), None);
        assert_eq!(error.get_untracked().as_deref(), Some("Changelog 2 not found"));

        settle_load(Ok(changelog(3, "v1.1")), set_changelog, set_error);
        assert_eq!(changelog_signal.get_untracked().map(|c| c.id), Some(3));
        assert_eq!(error.get_untracked(), None);

        runtime.dispose();
    }
}
