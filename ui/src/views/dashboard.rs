use std::rc::Rc;

use dioxus::prelude::*;

use crate::components::{AppNavbar, BlockView, ExportBar, UploadPanel};
use crate::core::platform::{default_location, AssetFetcher};
use crate::core::DashboardContext;
use crate::render::text::personalize;
use crate::t;

use super::defaults::{INTRODUCTION, SAMPLE_VIEW};
use super::registry::{ViewOutput, ViewRegistry};

/// The whole dashboard: tabs, the active view's blocks and export buttons,
/// and the upload panel when a pipeline is available.
///
/// A platform may provide its own [`DashboardContext`] through context
/// (e.g. one reading assets from the desktop resource directory); otherwise
/// the default asset fetcher is used.
#[component]
pub fn Dashboard() -> Element {
    let ctx = use_hook(|| {
        try_consume_context::<DashboardContext>()
            .unwrap_or_else(|| DashboardContext::new(Rc::new(AssetFetcher::default())))
    });
    use_context_provider(|| ctx.clone());
    let registry = use_context_provider(|| Rc::new(ViewRegistry::default_views()));
    let location = use_hook(default_location);

    let mut active = use_signal({
        let (registry, location) = (registry.clone(), location.clone());
        move || {
            registry
                .resolve_fragment(location.fragment().as_deref())
                .to_string()
        }
    });
    let mut data_generation = use_signal(|| ctx.generation());
    // Pipeline rejection shown in place of the view until the next load or tab change.
    let mut output_error = use_signal(|| None::<String>);

    let output = use_resource({
        let (ctx, registry, location) = (ctx.clone(), registry.clone(), location.clone());
        move || {
            let (ctx, registry, location) = (ctx.clone(), registry.clone(), location.clone());
            let view = active();
            let _ = data_generation();
            async move { registry.show_view(&view, &ctx, location.as_ref()).await }
        }
    });

    let current = active();
    let tabs: Vec<String> = registry.tab_names().map(str::to_string).collect();
    let (intro, notice) = if ctx.is_personalized() {
        (personalize(INTRODUCTION), t!("notice-own"))
    } else {
        (INTRODUCTION.to_string(), t!("notice-demo"))
    };

    rsx! {
        AppNavbar {
            {tabs.into_iter().map(|name| {
                let class = if name == current { "navbar__link navbar__link--active" } else { "navbar__link" };
                let target = name.clone();
                rsx! {
                    button {
                        key: "{name}",
                        r#type: "button",
                        class,
                        onclick: move |_| {
                            output_error.set(None);
                            active.set(target.clone());
                        },
                        "{name}"
                    }
                }
            })}
        }

        main { class: "page dashboard",
            div { class: "dashboard__intro", dangerous_inner_html: "{intro}" }
            p { class: "dashboard__notice", "{notice}" }

            match (output_error(), &*output.read_unchecked()) {
                (Some(error), _) => rsx! {
                    p { class: "dashboard__error", "{error}" }
                },
                (None, Some(view)) => rsx! {
                    ViewBody { output: view.clone(), generation: data_generation() }
                },
                (None, None) => rsx! {
                    div { class: "dashboard__loading" }
                },
            }

            UploadPanel {
                on_loaded: move |_| {
                    output_error.set(None);
                    data_generation += 1;
                },
                on_sample: move |_| {
                    output_error.set(None);
                    active.set(SAMPLE_VIEW.to_string());
                    data_generation += 1;
                },
                on_rejected: move |text: String| output_error.set(Some(text)),
            }
        }
    }
}

/// Blocks of one rendered view. Keys include the data generation so tables
/// and charts remount with fresh state after a reload.
#[component]
fn ViewBody(output: ViewOutput, generation: u32) -> Element {
    rsx! {
        section { class: "view", id: "view-{output.slug}",
            for block in output.blocks.iter() {
                BlockView {
                    key: "{output.slug}-{generation}-{block.container_id}",
                    container_id: block.container_id.clone(),
                    content: block.content.clone(),
                }
            }
            if output.exports.any() {
                ExportBar { view: output.name.clone(), exports: output.exports }
            }
        }
    }
}
