use std::rc::Rc;

use api::filter::{FilterParams, YearMonth};
use dioxus::prelude::*;

use crate::core::filters::{parse_top_k, MonthOption, TOP_K_CHOICES};
use crate::core::progress::ProgressLog;
use crate::core::DashboardContext;
use crate::export::deliver;
use crate::t;
use crate::workflow::{
    apply_filter, export_full_csv, filter_months, load_sample, process_archive, registered_pipeline,
};

/// Archive upload with progress, then the filter form, random sample and
/// full CSV download. Renders nothing when no pipeline is registered or the
/// registered one is not available.
///
/// `on_loaded` fires after new statistics landed in the cache,
/// `on_sample` after a random sample did, `on_rejected` with the pipeline's
/// message when it turned a request down.
#[component]
pub fn UploadPanel(
    on_loaded: EventHandler<()>,
    on_sample: EventHandler<()>,
    on_rejected: EventHandler<String>,
) -> Element {
    let ctx = use_context::<DashboardContext>();
    let pipeline = use_hook(registered_pipeline);
    let available = use_resource({
        let pipeline = pipeline.clone();
        move || {
            let pipeline = pipeline.clone();
            async move {
                match pipeline {
                    Some(pipeline) => pipeline.is_available().await,
                    None => false,
                }
            }
        }
    });

    let mut archive = use_signal(|| None::<Rc<Vec<u8>>>);
    let mut progress = use_signal(ProgressLog::new);
    let mut months = use_signal(Vec::<MonthOption>::new);
    let mut message = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let mut start_month = use_signal(String::new);
    let mut end_month = use_signal(String::new);
    let mut artist = use_signal(String::new);
    let mut top_k = use_signal(|| TOP_K_CHOICES[0].to_string());

    let Some(pipeline) = pipeline.filter(|_| available() == Some(true)) else {
        return rsx! {};
    };

    let on_file = {
        let (ctx, pipeline) = (ctx.clone(), pipeline.clone());
        move |evt: FormEvent| {
            let (ctx, pipeline) = (ctx.clone(), pipeline.clone());
            async move {
                let Some(engine) = evt.files() else {
                    return;
                };
                let Some(name) = engine.files().first().cloned() else {
                    return;
                };
                let Some(bytes) = engine.read_file(&name).await else {
                    message.set(Some(t!("upload-read-error")));
                    return;
                };

                busy.set(true);
                message.set(None);
                archive.set(None);
                let bytes = Rc::new(bytes);
                let mut report = move |log: &ProgressLog| progress.set(log.clone());

                match process_archive(&ctx, pipeline.as_ref(), &bytes, &mut report).await {
                    Err(err) => {
                        if let Some(text) = err.output_message() {
                            on_rejected.call(text.to_string());
                        }
                    }
                    Ok(()) => {
                        match filter_months(pipeline.as_ref(), &bytes).await {
                            Ok(options) => {
                                start_month.set(options.first().map(|o| o.value.clone()).unwrap_or_default());
                                end_month.set(options.last().map(|o| o.value.clone()).unwrap_or_default());
                                months.set(options);
                            }
                            Err(err) => message.set(Some(err.to_string())),
                        }
                        archive.set(Some(bytes));
                        on_loaded.call(());
                    }
                }
                busy.set(false);
            }
        }
    };

    let on_filter = {
        let (ctx, pipeline) = (ctx.clone(), pipeline.clone());
        move |_: MouseEvent| {
            let (ctx, pipeline) = (ctx.clone(), pipeline.clone());
            async move {
                let Some(bytes) = archive() else {
                    return;
                };
                let (Some(start), Some(end)) = (
                    YearMonth::parse(&start_month()),
                    YearMonth::parse(&end_month()),
                ) else {
                    return;
                };
                let filter = FilterParams::new(start, end, &artist(), parse_top_k(&top_k()));

                busy.set(true);
                match apply_filter(&ctx, pipeline.as_ref(), &bytes, &filter).await {
                    Ok(()) => {
                        message.set(None);
                        on_loaded.call(());
                    }
                    Err(err) => match err.output_message() {
                        Some(text) => {
                            message.set(None);
                            on_rejected.call(text.to_string());
                        }
                        None => message.set(Some(err.to_string())),
                    },
                }
                busy.set(false);
            }
        }
    };

    let on_random = {
        let (ctx, pipeline) = (ctx.clone(), pipeline.clone());
        move |_: MouseEvent| {
            let (ctx, pipeline) = (ctx.clone(), pipeline.clone());
            async move {
                let Some(bytes) = archive() else {
                    return;
                };
                match load_sample(&ctx, pipeline.as_ref(), &bytes).await {
                    Ok(()) => on_sample.call(()),
                    Err(err) => message.set(Some(err.to_string())),
                }
            }
        }
    };

    let on_csv = {
        let pipeline = pipeline.clone();
        move |_: MouseEvent| {
            let pipeline = pipeline.clone();
            async move {
                let Some(bytes) = archive() else {
                    return;
                };
                busy.set(true);
                let outcome = match export_full_csv(pipeline.as_ref(), &bytes).await {
                    Ok(file) => deliver(&file).await.map_err(|err| err.to_string()),
                    Err(err) => Err(err.to_string()),
                };
                match outcome {
                    Ok(Some(path)) => message.set(Some(t!("export-saved-to", path = path))),
                    Ok(None) => message.set(None),
                    Err(err) => message.set(Some(t!("export-error", error = err))),
                }
                busy.set(false);
            }
        }
    };

    let lines = progress.read().lines().to_vec();
    let loaded = archive.read().is_some();

    rsx! {
        section { class: "upload",
            h2 { {t!("upload-heading")} }
            p { class: "upload__hint", {t!("upload-hint")} }
            input {
                r#type: "file",
                accept: ".zip",
                disabled: busy(),
                onchange: on_file,
            }

            if busy() {
                p { class: "upload__busy", {t!("upload-busy")} }
            }
            if !lines.is_empty() {
                ul { class: "upload__progress",
                    for (idx, line) in lines.into_iter().enumerate() {
                        li { key: "{idx}", "{line}" }
                    }
                }
            }
            if let Some(text) = message() {
                p { class: "upload__message", "{text}" }
            }

            if loaded {
                div { class: "filter",
                    h3 { {t!("filter-heading")} }
                    label { class: "filter__field",
                        {t!("filter-from")}
                        select {
                            value: "{start_month}",
                            onchange: move |evt| start_month.set(evt.value()),
                            for month in months() {
                                option { key: "{month.value}", value: "{month.value}", "{month.label}" }
                            }
                        }
                    }
                    label { class: "filter__field",
                        {t!("filter-to")}
                        select {
                            value: "{end_month}",
                            onchange: move |evt| end_month.set(evt.value()),
                            for month in months() {
                                option { key: "{month.value}", value: "{month.value}", "{month.label}" }
                            }
                        }
                    }
                    label { class: "filter__field",
                        {t!("filter-artist")}
                        input {
                            r#type: "text",
                            placeholder: t!("filter-artist-placeholder"),
                            value: "{artist}",
                            oninput: move |evt| artist.set(evt.value()),
                        }
                    }
                    label { class: "filter__field",
                        {t!("filter-top-k")}
                        select {
                            value: "{top_k}",
                            onchange: move |evt| top_k.set(evt.value()),
                            for choice in TOP_K_CHOICES.iter() {
                                option { key: "{choice}", value: "{choice}", "{choice}" }
                            }
                        }
                    }
                    div { class: "filter__actions",
                        button {
                            r#type: "button",
                            class: "button button--primary",
                            disabled: busy(),
                            onclick: on_filter,
                            if busy() { {t!("filter-working")} } else { {t!("filter-apply")} }
                        }
                        button {
                            r#type: "button",
                            class: "button button--ghost",
                            disabled: busy(),
                            onclick: on_random,
                            {t!("sample-button")}
                        }
                        button {
                            r#type: "button",
                            class: "button",
                            disabled: busy(),
                            onclick: on_csv,
                            {t!("csv-button")}
                        }
                    }
                }
            }
        }
    }
}
