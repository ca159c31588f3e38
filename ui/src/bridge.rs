//! [`CrunchPipeline`] backed by a script on the page.
//!
//! The statistics themselves are computed outside this crate. A host page
//! that can compute them defines `window.tunelogPipeline` with async
//! methods:
//!
//! ```text
//! listJsonFiles(archive)        -> ["MyData/...json", ...]
//! crunch(archive, filter|null)  -> { df_dict, single_values } | { error }
//! monthBounds(archive)          -> [{ year, month }, { year, month }]
//! randomSample(archive, count)  -> { columns, data }
//! exportCsv(archive)            -> "ts,..."
//! ```
//!
//! `archive` is the uploaded zip, base64 encoded; `filter` uses the
//! [`FilterParams`](api::filter::FilterParams) field names. Calls go
//! through `document::eval`, so the same bridge serves the web build and
//! the desktop webview. Without the global the upload panel stays hidden.

use std::rc::Rc;

use api::filter::YearMonth;
use api::model::Dataset;
use api::pipeline::{CrunchOutcome, CrunchPipeline, CrunchRequest, PipelineError};
use base64::Engine as _;
use dioxus::prelude::document;
use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

/// Name of the page global holding the pipeline methods.
pub const PIPELINE_GLOBAL: &str = "tunelogPipeline";

#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptPipeline;

/// Factory for [`crate::workflow::register_pipeline`].
pub fn script_pipeline() -> Rc<dyn CrunchPipeline> {
    Rc::new(ScriptPipeline)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Reply {
    Ok { ok: Value },
    Error { error: String },
    Unavailable { unavailable: bool },
}

/// Script calling `method` on the page pipeline with `args`. Replies with
/// `{ok}`, `{error}` (thrown exception) or `{unavailable}`.
pub fn call_script(method: &str, args: &[Value]) -> String {
    let method = Value::from(method);
    let args = Value::Array(args.to_vec());
    format!(
        "const pipeline = window.{PIPELINE_GLOBAL};\n\
         const method = {method};\n\
         if (!pipeline || typeof pipeline[method] !== \"function\") {{\n\
           return {{ unavailable: true }};\n\
         }}\n\
         try {{\n\
           return {{ ok: await pipeline[method](...{args}) }};\n\
         }} catch (err) {{\n\
           return {{ error: String(err) }};\n\
         }}"
    )
}

/// Turn a script reply into the method's result.
pub fn decode_reply<T: DeserializeOwned>(reply: Value) -> Result<T, PipelineError> {
    match serde_json::from_value::<Reply>(reply)? {
        Reply::Ok { ok } => Ok(serde_json::from_value(ok)?),
        Reply::Error { error } => Err(PipelineError::Failed { message: error }),
        Reply::Unavailable { .. } => Err(PipelineError::Unavailable),
    }
}

fn encode_archive(archive: &[u8]) -> Value {
    Value::from(base64::engine::general_purpose::STANDARD.encode(archive))
}

async fn call<T: DeserializeOwned>(method: &str, args: &[Value]) -> Result<T, PipelineError> {
    tracing::debug!(method, "calling page pipeline");
    let reply = document::eval(&call_script(method, args))
        .join::<Value>()
        .await
        .map_err(|err| PipelineError::Failed {
            message: err.to_string(),
        })?;
    decode_reply(reply)
}

impl CrunchPipeline for ScriptPipeline {
    fn is_available(&self) -> LocalBoxFuture<'_, bool> {
        Box::pin(async {
            let script = format!("return typeof window.{PIPELINE_GLOBAL} === \"object\";");
            matches!(document::eval(&script).join::<bool>().await, Ok(true))
        })
    }

    fn list_json_files<'a>(
        &'a self,
        archive: &'a [u8],
    ) -> LocalBoxFuture<'a, Result<Vec<String>, PipelineError>> {
        Box::pin(async move { call("listJsonFiles", &[encode_archive(archive)]).await })
    }

    fn crunch<'a>(
        &'a self,
        request: CrunchRequest<'a>,
    ) -> LocalBoxFuture<'a, Result<CrunchOutcome, PipelineError>> {
        Box::pin(async move {
            let filter = serde_json::to_value(request.filter)?;
            call("crunch", &[encode_archive(request.archive), filter]).await
        })
    }

    fn month_bounds<'a>(
        &'a self,
        archive: &'a [u8],
    ) -> LocalBoxFuture<'a, Result<(YearMonth, YearMonth), PipelineError>> {
        Box::pin(async move { call("monthBounds", &[encode_archive(archive)]).await })
    }

    fn random_sample<'a>(
        &'a self,
        archive: &'a [u8],
        sample_count: usize,
    ) -> LocalBoxFuture<'a, Result<Dataset, PipelineError>> {
        Box::pin(async move {
            call("randomSample", &[encode_archive(archive), json!(sample_count)]).await
        })
    }

    fn export_csv<'a>(
        &'a self,
        archive: &'a [u8],
    ) -> LocalBoxFuture<'a, Result<String, PipelineError>> {
        Box::pin(async move { call("exportCsv", &[encode_archive(archive)]).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::filter::FilterParams;
    use api::model::Cell;
    use pretty_assertions::assert_eq;

    #[test]
    fn script_spreads_json_arguments() {
        let filter = FilterParams::new(YearMonth::new(2015, 6), YearMonth::new(2016, 1), "Khruangbin", 20);
        let script = call_script(
            "crunch",
            &[encode_archive(b"PK"), serde_json::to_value(&filter).unwrap()],
        );
        assert!(script.contains("window.tunelogPipeline"));
        assert!(script.contains("const method = \"crunch\";"));
        assert!(script.contains("...[\"UEs=\",{"));
        assert!(script.contains("\"artist_name\":\"Khruangbin\""));
        assert!(script.contains("\"min_month\":6"));
    }

    #[test]
    fn replies_decode_into_results() {
        let files: Vec<String> =
            decode_reply(json!({ "ok": ["MyData/Streaming_History_Audio_2021.json"] })).unwrap();
        assert_eq!(files, vec!["MyData/Streaming_History_Audio_2021.json"]);

        let bounds: (YearMonth, YearMonth) = decode_reply(json!({
            "ok": [{ "year": 2015, "month": 6 }, { "year": 2021, "month": 3 }]
        }))
        .unwrap();
        assert_eq!(bounds, (YearMonth::new(2015, 6), YearMonth::new(2021, 3)));

        let sample: Dataset =
            decode_reply(json!({ "ok": { "columns": ["shuffle"], "data": [[true]] } })).unwrap();
        assert_eq!(sample.data[0][0], Cell::Bool(true));
    }

    #[test]
    fn pipeline_errors_stay_distinct_from_empty_results() {
        let outcome: CrunchOutcome =
            decode_reply(json!({ "ok": { "error": "No plays in this time frame." } })).unwrap();
        assert_eq!(outcome.error(), Some("No plays in this time frame."));

        let thrown = decode_reply::<String>(json!({ "error": "TypeError: x is undefined" }));
        assert_eq!(
            thrown,
            Err(PipelineError::Failed {
                message: "TypeError: x is undefined".into()
            })
        );
        assert_eq!(
            decode_reply::<String>(json!({ "unavailable": true })),
            Err(PipelineError::Unavailable)
        );
        assert!(matches!(
            decode_reply::<Vec<String>>(json!({ "ok": 3 })),
            Err(PipelineError::Malformed { .. })
        ));
    }
}
