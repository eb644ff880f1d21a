//! Changelog Card Component
//!
//! One changelog in a list, linking to its own page.

use leptos::*;
use leptos_router::*;

use crate::components::Markdown;
use crate::state::models::{format_date, ChangelogSummary};

#[component]
pub fn ChangelogCard(
    changelog: ChangelogSummary,
    /// Show a draft/published badge
    #[prop(default = false)]
    show_status: bool,
    /// Title and meta only
    #[prop(default = false)]
    compact: bool,
) -> impl IntoView {
    let href = format!("/changelog/{}", changelog.id);
    let preview = if changelog.content_preview.trim().is_empty() {
        "No content available.".to_string()
    } else {
        changelog.content_preview.clone()
    };

    view! {
        <article class="bg-gray-800 rounded-xl p-6 border border-gray-700">
            <div class="flex items-start justify-between">
                <h3 class="text-lg font-semibold text-white">{changelog.title.clone()}</h3>
                {show_status.then(|| {
                    if changelog.published {
                        view! {
                            <span class="text-xs px-2 py-1 rounded-full bg-green-900 text-green-300">"Published"</span>
                        }
                    } else {
                        view! {
                            <span class="text-xs px-2 py-1 rounded-full bg-yellow-900 text-yellow-300">"Draft"</span>
                        }
                    }
                })}
            </div>
            <div class="flex space-x-4 text-sm text-gray-400 mt-1">
                <span>{changelog.repository.clone()}</span>
                <span>{format_date(&changelog.created_at)}</span>
            </div>
            {(!compact).then(|| view! {
                <div class="mt-4">
                    <Markdown content=preview />
                </div>
            })}
            <A href=href class="inline-block mt-4 text-primary-400 hover:text-primary-300 text-sm font-medium">
                {if compact { "Open →" } else { "Read full changelog →" }}
            </A>
        </article>
    }
}
