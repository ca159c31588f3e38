use std::rc::Rc;

use dioxus::prelude::*;

use crate::core::DashboardContext;
use crate::export::{deliver, ExportError, ExportFile};
use crate::render::Exports;
use crate::t;
use crate::views::registry::ViewRegistry;

#[derive(Clone, Debug, PartialEq)]
enum ExportStatus {
    Idle,
    Working,
    Done(String),
    Error(String),
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum ExportKind {
    Image,
    Data,
}

/// Image/data download buttons for the current view. Only the controls the
/// view's renderers support are shown.
#[component]
pub fn ExportBar(view: String, exports: Exports) -> Element {
    let ctx = use_context::<DashboardContext>();
    let registry = use_context::<Rc<ViewRegistry>>();
    let status = use_signal(|| ExportStatus::Idle);
    let busy = use_signal(|| false);

    let feedback = match &status() {
        ExportStatus::Idle => None,
        ExportStatus::Working => Some(("export-bar__meta".to_string(), t!("export-working"))),
        ExportStatus::Done(message) => Some((
            "export-bar__meta export-bar__meta--success".to_string(),
            message.clone(),
        )),
        ExportStatus::Error(err) => Some((
            "export-bar__meta export-bar__meta--error".to_string(),
            err.clone(),
        )),
    };

    let start = {
        let view = view.clone();
        move |kind: ExportKind| {
            let (ctx, registry, view) = (ctx.clone(), registry.clone(), view.clone());
            let mut status = status;
            let mut busy = busy;
            if busy() {
                return;
            }
            busy.set(true);
            status.set(ExportStatus::Working);
            spawn(async move {
                let files = match kind {
                    ExportKind::Image => registry.export_images(&view, &ctx).await,
                    ExportKind::Data => registry.export_data(&view, &ctx).await,
                };
                status.set(deliver_all(files).await);
                busy.set(false);
            });
        }
    };
    let image_handler = {
        let start = start.clone();
        move |_: MouseEvent| start(ExportKind::Image)
    };
    let data_handler = move |_: MouseEvent| start(ExportKind::Data);

    rsx! {
        div { class: "export-bar",
            if exports.image {
                button {
                    r#type: "button",
                    class: "button button--primary",
                    disabled: busy(),
                    onclick: image_handler,
                    {t!("export-image")}
                }
            }
            if exports.data {
                button {
                    r#type: "button",
                    class: "button",
                    disabled: busy(),
                    onclick: data_handler,
                    {t!("export-data")}
                }
            }
            if let Some((class_name, message)) = feedback {
                p { class: "{class_name}", "{message}" }
            }
        }
    }
}

async fn deliver_all(files: Vec<Result<ExportFile, ExportError>>) -> ExportStatus {
    let mut saved = Vec::new();
    for file in files {
        let outcome = match file {
            Ok(file) => deliver(&file).await,
            Err(err) => Err(err),
        };
        match outcome {
            Ok(Some(path)) => saved.push(path),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(%err, "export failed");
                return ExportStatus::Error(t!("export-error", error = err.to_string()));
            }
        }
    }

    if saved.is_empty() {
        ExportStatus::Done(t!("export-done"))
    } else {
        ExportStatus::Done(t!("export-saved-to", path = saved.join(", ")))
    }
}
