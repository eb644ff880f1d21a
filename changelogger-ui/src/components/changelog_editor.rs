//! Changelog Editor
//!
//! Final wizard step: edit the generated text, then save as a draft or
//! publish.

use leptos::*;

use crate::components::{ErrorMessage, InlineLoading, Markdown};
use crate::state::wizard::{Operation, Wizard};

#[component]
pub fn ChangelogEditor(
    wizard: RwSignal<Wizard>,
    /// Called with `true` to publish, `false` for a draft
    #[prop(into)]
    on_save: Callback<bool>,
) -> impl IntoView {
    let (preview, set_preview) = create_signal(false);
    let saving = move || wizard.with(|w| w.pending_operation() == Some(Operation::Save));
    let disabled = move || !wizard.with(|w| w.can_save());

    let content = Signal::derive(move || wizard.with(|w| w.content.clone()));

    view! {
        <section class="bg-gray-800 rounded-xl p-6 space-y-6">
            // Title
            <div>
                <label class="block text-sm text-gray-400 mb-2">"Title"</label>
                <input
                    type="text"
                    placeholder="e.g. v1.2.0 - March release"
                    prop:value=move || wizard.with(|w| w.title.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        wizard.update(|w| w.title = value);
                    }
                    class="w-full bg-gray-700 rounded-lg px-4 py-3
                           border border-gray-600 focus:border-primary-500 focus:outline-none"
                />
            </div>

            // Content with edit/preview tabs
            <div>
                <div class="flex items-center justify-between mb-2">
                    <label class="text-sm text-gray-400">"Changelog"</label>
                    <div class="flex space-x-1 text-sm">
                        <button
                            on:click=move |_| set_preview.set(false)
                            class=move || tab_class(!preview.get())
                        >
                            "Edit"
                        </button>
                        <button
                            on:click=move |_| set_preview.set(true)
                            class=move || tab_class(preview.get())
                        >
                            "Preview"
                        </button>
                    </div>
                </div>
                {move || {
                    if preview.get() {
                        view! {
                            <div class="bg-gray-900 rounded-lg p-4 min-h-[20rem]">
                                <Markdown content=content />
                            </div>
                        }.into_view()
                    } else {
                        view! {
                            <textarea
                                rows="18"
                                prop:value=move || wizard.with(|w| w.content.clone())
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    wizard.update(|w| w.content = value);
                                }
                                class="w-full bg-gray-700 rounded-lg px-4 py-3 font-mono text-sm
                                       border border-gray-600 focus:border-primary-500 focus:outline-none"
                            />
                        }.into_view()
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
                    on:click=move |_| on_save.call(false)
                    disabled=disabled
                    class="px-6 py-3 bg-gray-600 hover:bg-gray-500 disabled:bg-gray-700 disabled:text-gray-400
                           rounded-lg font-medium transition-colors"
                >
                    "Save Draft"
                </button>
                <button
                    on:click=move |_| on_save.call(true)
                    disabled=disabled
                    class="flex items-center space-x-2 px-6 py-3 bg-primary-600 hover:bg-primary-700
                           disabled:bg-gray-700 disabled:text-gray-400 rounded-lg font-medium transition-colors"
                >
                    {move || saving().then(|| view! { <InlineLoading /> })}
                    <span>{move || if saving() { "Saving..." } else { "Publish" }}</span>
                </button>
            </div>

            {move || wizard.with(|w| w.error().map(str::to_string)).map(|msg| view! {
                <ErrorMessage message=msg />
            })}
        </section>
    }
}

fn tab_class(active: bool) -> &'static str {
    if active {
        "px-3 py-1 rounded-md bg-gray-700 text-white"
    } else {
        "px-3 py-1 rounded-md text-gray-400 hover:text-white"
    }
}
