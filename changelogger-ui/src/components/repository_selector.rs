//! Repository Selector
//!
//! First wizard step: repository, since-date and commit limit.

use leptos::*;

use crate::components::{ErrorMessage, InlineLoading};
use crate::state::models::Repository;
use crate::state::wizard::{Operation, Wizard};

const MAX_COMMITS_LIMIT: usize = 100;

#[component]
pub fn RepositorySelector(
    wizard: RwSignal<Wizard>,
    #[prop(into)]
    repositories: Signal<Vec<Repository>>,
    #[prop(into)]
    loading: Signal<bool>,
    #[prop(into)]
    on_fetch: Callback<()>,
) -> impl IntoView {
    let fetching = move || wizard.with(|w| w.pending_operation() == Some(Operation::Fetch));

    let selected_description = move || {
        let full_name = wizard.with(|w| w.repository.clone());
        repositories.with(|repos| {
            repos
                .iter()
                .find(|r| r.full_name == full_name)
                .and_then(|r| r.description.clone())
        })
    };

    view! {
        <section class="bg-gray-800 rounded-xl p-6 space-y-6">
            // Repository
            <div>
                <label class="block text-sm text-gray-400 mb-2">"Repository"</label>
                {move || {
                    if loading.get() {
                        view! {
                            <div class="flex items-center space-x-2 text-gray-400">
                                <InlineLoading />
                                <span>"Loading repositories..."</span>
                            </div>
                        }.into_view()
                    } else {
                        view! {
                            <select
                                on:change=move |ev| {
                                    let value = event_target_value(&ev);
                                    wizard.update(|w| w.repository = value);
                                }
                                class="w-full bg-gray-700 rounded-lg px-4 py-3
                                       border border-gray-600 focus:border-primary-500 focus:outline-none"
                            >
                                <option value="">"Choose a repository..."</option>
                                {repositories.get().into_iter().map(|repo| {
                                    let value = repo.full_name.clone();
                                    let is_current = {
                                        let value = value.clone();
                                        move || wizard.with(|w| w.repository == value)
                                    };
                                    let label = match &repo.language {
                                        Some(lang) => format!("{} ({})", repo.full_name, lang),
                                        None => repo.full_name.clone(),
                                    };
                                    view! {
                                        <option value=value selected=is_current>{label}</option>
                                    }
                                }).collect_view()}
                            </select>
                        }.into_view()
                    }
                }}
                {move || selected_description().map(|d| view! {
                    <p class="text-sm text-gray-400 mt-2">{d}</p>
                })}
            </div>

            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                // Since date
                <div>
                    <label class="block text-sm text-gray-400 mb-2">"Commits since"</label>
                    <input
                        type="date"
                        prop:value=move || wizard.with(|w| w.since_date.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            wizard.update(|w| w.since_date = value);
                        }
                        class="w-full bg-gray-700 rounded-lg px-4 py-3
                               border border-gray-600 focus:border-primary-500 focus:outline-none"
                    />
                </div>

                // Commit limit
                <div>
                    <label class="block text-sm text-gray-400 mb-2">"Maximum commits"</label>
                    <input
                        type="number"
                        min="1"
                        max=MAX_COMMITS_LIMIT.to_string()
                        prop:value=move || wizard.with(|w| w.max_commits.to_string())
                        on:input=move |ev| {
                            if let Ok(n) = event_target_value(&ev).parse::<usize>() {
                                wizard.update(|w| w.max_commits = n.clamp(1, MAX_COMMITS_LIMIT));
                            }
                        }
                        class="w-full bg-gray-700 rounded-lg px-4 py-3
                               border border-gray-600 focus:border-primary-500 focus:outline-none"
                    />
                </div>
            </div>

            <button
                on:click=move |_| on_fetch.call(())
                disabled=move || !wizard.with(|w| w.can_fetch())
                class="flex items-center space-x-2 px-6 py-3 bg-primary-600 hover:bg-primary-700
                       disabled:bg-gray-700 disabled:text-gray-400 rounded-lg font-medium transition-colors"
            >
                {move || fetching().then(|| view! { <InlineLoading /> })}
                <span>{move || if fetching() { "Fetching Commits..." } else { "Fetch Commits" }}</span>
            </button>

            {move || wizard.with(|w| w.error().map(str::to_string)).map(|msg| view! {
                <ErrorMessage message=msg />
            })}
        </section>
    }
}
