//! Commit Selector
//!
//! Second wizard step: choose which fetched commits go into the changelog.

use leptos::*;

use crate::components::{ErrorMessage, InlineLoading};
use crate::state::models::{format_date, Commit};
use crate::state::wizard::{Operation, Wizard};

#[component]
pub fn CommitSelector(
    wizard: RwSignal<Wizard>,
    #[prop(into)]
    on_generate: Callback<()>,
) -> impl IntoView {
    // Only re-render the list when the commits themselves change
    let commits = create_memo(move |_| wizard.with(|w| w.commits().to_vec()));
    let generating = move || wizard.with(|w| w.pending_operation() == Some(Operation::Generate));

    view! {
        <section class="bg-gray-800 rounded-xl p-6 space-y-6">
            <div class="flex items-center justify-between">
                <h3 class="text-lg font-semibold">
                    {move || wizard.with(|w| format!(
                        "Select Commits to Include ({} of {} selected)",
                        w.selected_count(),
                        w.commits().len()
                    ))}
                </h3>
                <button
                    on:click=move |_| wizard.update(|w| w.select_all())
                    class="px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg text-sm font-medium transition-colors"
                >
                    {move || if wizard.with(|w| w.all_selected()) { "Deselect All" } else { "Select All" }}
                </button>
            </div>

            <div class="space-y-2 max-h-[32rem] overflow-y-auto">
                {move || {
                    let list = commits.get();
                    if list.is_empty() {
                        let since = wizard.with_untracked(|w| w.since_date.clone());
                        view! {
                            <p class="text-gray-400 py-6 text-center">
                                {format!("No commits found since {}.", since)}
                            </p>
                        }.into_view()
                    } else {
                        list.into_iter()
                            .map(|commit| view! { <CommitRow commit=commit wizard=wizard /> })
                            .collect_view()
                    }
                }}
            </div>

            <div class="flex space-x-3">
                <button
                    on:click=move |_| wizard.update(|w| {
                        let _ = w.back();
                    })
                    disabled=move || !wizard.with(|w| w.can_go_back())
                    class="px-6 py-3 bg-gray-700 hover:bg-gray-600 disabled:text-gray-500 rounded-lg font-medium transition-colors"
                >
                    "Back"
                </button>
                <button
                    on:click=move |_| on_generate.call(())
                    disabled=move || !wizard.with(|w| w.can_generate())
                    class="flex items-center space-x-2 px-6 py-3 bg-primary-600 hover:bg-primary-700
                           disabled:bg-gray-700 disabled:text-gray-400 rounded-lg font-medium transition-colors"
                >
                    {move || generating().then(|| view! { <InlineLoading /> })}
                    <span>{move || if generating() { "Generating..." } else { "Generate Changelog" }}</span>
                </button>
            </div>

            {move || wizard.with(|w| w.error().map(str::to_string)).map(|msg| view! {
                <ErrorMessage message=msg />
            })}
        </section>
    }
}

#[component]
fn CommitRow(commit: Commit, wizard: RwSignal<Wizard>) -> impl IntoView {
    let sha = commit.sha.clone();
    let checked = {
        let sha = sha.clone();
        move || wizard.with(|w| w.is_selected(&sha))
    };
    let meta = format!(
        "{} • {} • {}",
        commit.author.name,
        format_date(&commit.author.date),
        commit.short_sha()
    );

    view! {
        <label class="flex items-start space-x-3 p-3 rounded-lg bg-gray-700/50 hover:bg-gray-700 cursor-pointer">
            <input
                type="checkbox"
                class="mt-1"
                prop:checked=checked
                on:change=move |_| wizard.update(|w| w.toggle_commit(&sha))
            />
            <div class="min-w-0">
                <p class="text-white font-medium truncate">{commit.subject().to_string()}</p>
                <p class="text-xs text-gray-400 mt-1">{meta}</p>
                {commit.files_summary().map(|s| view! {
                    <p class="text-xs text-gray-500 mt-1">{s}</p>
                })}
            </div>
        </label>
    }
}
