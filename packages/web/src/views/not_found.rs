use dioxus::prelude::*;

/// Catch-all for undeclared paths. The guard redirects these home before
/// this renders.
#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    tracing::debug!("Unmatched path /{}", segments.join("/"));
    rsx! {}
}
