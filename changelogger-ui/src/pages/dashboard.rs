//! Dashboard Page
//!
//! The changelog wizard plus the signed-in user's own changelogs.

use leptos::*;
use leptos_router::*;

use crate::api::{self, ApiError};
use crate::components::{
    ChangelogCard, ChangelogEditor, CommitSelector, Loading, Nav, RepositorySelector,
};
use crate::state::models::{ChangelogSummary, Repository};
use crate::state::wizard::{current_step, Step, Wizard};
use crate::state::{GlobalState, Session};

/// Dashboard page component
#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let session = use_context::<Session>().expect("Session not found");

    let wizard = create_rw_signal(Wizard::default());
    let step = current_step(wizard);
    let last_saved = create_memo(move |_| {
        wizard.with(|w| (w.step() == Step::SelectRepo).then(|| w.last_saved()).flatten())
    });
    let (repositories, set_repositories) = create_signal(Vec::<Repository>::new());
    let (repos_loading, set_repos_loading) = create_signal(true);
    let (changelogs, set_changelogs) = create_signal(Vec::<ChangelogSummary>::new());
    let (changelogs_loading, set_changelogs_loading) = create_signal(true);

    // A 401 means the session expired server-side
    let handle_unauthorized = move |err: &ApiError| {
        if err.is_unauthorized() {
            session.clear();
        }
    };

    // Load repositories on mount
    spawn_local(async move {
        match api::repositories().await {
            Ok(repos) => {
                let _ = set_repositories.try_set(repos);
            }
            Err(e) => {
                api::log_error("Failed to load repositories", &e);
                handle_unauthorized(&e);
                state.show_error(&e.message_or("Failed to load repositories. Please try again."));
            }
        }
        let _ = set_repos_loading.try_set(false);
    });

    let load_changelogs = move || {
        spawn_local(async move {
            match api::list_changelogs(false).await {
                Ok(list) => {
                    let _ = set_changelogs.try_set(list);
                }
                Err(e) => {
                    api::log_error("Failed to load changelogs", &e);
                    handle_unauthorized(&e);
                }
            }
            let _ = set_changelogs_loading.try_set(false);
        });
    };
    load_changelogs();

    let on_fetch = move |_: ()| {
        let Some(Ok((ticket, request))) = wizard.try_update(|w| w.begin_fetch()) else {
            return;
        };
        spawn_local(async move {
            let result = api::fetch_commits(&request).await;
            if let Err(e) = &result {
                api::log_error("Failed to fetch commits", e);
                handle_unauthorized(e);
            }
            wizard.try_update(|w| w.finish_fetch(ticket, result));
        });
    };

    let on_generate = move |_: ()| {
        let Some(Ok((ticket, request))) = wizard.try_update(|w| w.begin_generate()) else {
            return;
        };
        spawn_local(async move {
            let result = api::generate(&request).await;
            if let Err(e) = &result {
                api::log_error("Failed to generate changelog", e);
                handle_unauthorized(e);
            }
            wizard.try_update(|w| w.finish_generate(ticket, result));
        });
    };

    let on_save = move |published: bool| {
        let Some(Ok((ticket, request))) = wizard.try_update(|w| w.begin_save(published)) else {
            return;
        };
        spawn_local(async move {
            let result = api::save_changelog(&request).await;
            if let Err(e) = &result {
                api::log_error("Failed to save changelog", e);
                handle_unauthorized(e);
            }
            let saved = result.is_ok();
            if wizard.try_update(|w| w.finish_save(ticket, result)) == Some(true) && saved {
                state.show_success(if published {
                    "Changelog published!"
                } else {
                    "Draft saved"
                });
                load_changelogs();
            }
        });
    };

    view! {
        <div class="min-h-screen flex flex-col">
            <Nav />

            <main class="flex-1 container mx-auto px-4 py-8 space-y-8">
                <div>
                    <h1 class="text-3xl font-bold">"Create a Changelog"</h1>
                    <p class="text-gray-400 mt-1">
                        "Pick a repository, choose the commits that matter, then edit and publish."
                    </p>
                </div>

                <StepIndicator current=step />

                {move || {
                    last_saved.get().map(|id| view! {
                        <div class="bg-green-900/40 border border-green-700 text-green-200 rounded-lg px-4 py-3 text-sm">
                            "Changelog saved. "
                            <A href=format!("/changelog/{}", id) class="underline">"View it →"</A>
                        </div>
                    })
                }}

                {move || match step.get() {
                    Step::SelectRepo => view! {
                        <RepositorySelector
                            wizard=wizard
                            repositories=repositories
                            loading=repos_loading
                            on_fetch=on_fetch
                        />
                    }.into_view(),
                    Step::SelectCommits => view! {
                        <CommitSelector wizard=wizard on_generate=on_generate />
                    }.into_view(),
                    Step::EditChangelog => view! {
                        <ChangelogEditor wizard=wizard on_save=on_save />
                    }.into_view(),
                }}

                // Own changelogs, drafts included
                <section class="space-y-4">
                    <h2 class="text-xl font-semibold">"Your changelogs"</h2>
                    {move || {
                        if changelogs_loading.get() {
                            view! { <Loading /> }.into_view()
                        } else if changelogs.with(|c| c.is_empty()) {
                            view! {
                                <p class="text-gray-400">"Nothing saved yet."</p>
                            }.into_view()
                        } else {
                            view! {
                                <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                                    {changelogs.get().into_iter().map(|changelog| view! {
                                        <ChangelogCard changelog=changelog show_status=true compact=true />
                                    }).collect_view()}
                                </div>
                            }.into_view()
                        }
                    }}
                </section>
            </main>
        </div>
    }
}

/// Numbered progress through the three steps
#[component]
fn StepIndicator(#[prop(into)] current: Signal<Step>) -> impl IntoView {
    let steps = [Step::SelectRepo, Step::SelectCommits, Step::EditChangelog];

    view! {
        <ol class="flex items-center space-x-4 text-sm">
            {steps.into_iter().map(|step| {
                let class = move || {
                    if step.number() <= current.get().number() {
                        "flex items-center space-x-2 text-white"
                    } else {
                        "flex items-center space-x-2 text-gray-500"
                    }
                };
                view! {
                    <li class=class>
                        <span class="w-6 h-6 rounded-full bg-gray-700 flex items-center justify-center">
                            {step.number()}
                        </span>
                        <span>{step.label()}</span>
                    </li>
                }
            }).collect_view()}
        </ol>
    }
}
