//! Markdown Component
//!
//! Renders changelog markdown to HTML. Raw HTML in the source is shown as
//! text and script links are neutralised.

use leptos::*;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

/// Rendered markdown block
#[component]
pub fn Markdown(
    #[prop(into)]
    content: MaybeSignal<String>,
) -> impl IntoView {
    let html = move || content.with(|source| render_markdown(source));

    view! {
        <div class="markdown text-gray-200 space-y-3 leading-relaxed" inner_html=html />
    }
}

/// Markdown to sanitised HTML
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let events = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) if is_script_url(&dest_url) => Event::Start(Tag::Link {
            link_type,
            dest_url: CowStr::Borrowed("#"),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

fn is_script_url(url: &str) -> bool {
    let normalized = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    ["javascript:", "vbscript:", "data:"]
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
}
