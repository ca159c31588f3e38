//! The statistics pipeline seam.
//!
//! Implementations run wherever the heavy lifting happens (an embedded
//! interpreter, a worker, a remote service). Everything is single-threaded
//! and cooperative, so futures are `LocalBoxFuture`.

use std::collections::BTreeMap;

use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filter::{FilterParams, YearMonth};
use crate::model::{Dataset, ScalarDict};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("No statistics pipeline is available")]
    Unavailable,
    #[error("Pipeline failed: {message}")]
    Failed { message: String },
    #[error("Pipeline returned malformed output: {message}")]
    Malformed { message: String },
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Malformed {
            message: err.to_string(),
        }
    }
}

/// One crunch call: the raw archive plus an optional filter.
#[derive(Debug, Clone, Copy)]
pub struct CrunchRequest<'a> {
    pub archive: &'a [u8],
    pub filter: Option<&'a FilterParams>,
}

impl<'a> CrunchRequest<'a> {
    pub fn unfiltered(archive: &'a [u8]) -> Self {
        Self {
            archive,
            filter: None,
        }
    }

    pub fn filtered(archive: &'a [u8], filter: &'a FilterParams) -> Self {
        Self {
            archive,
            filter: Some(filter),
        }
    }
}

/// Result of a crunch call: either every dataset plus the summary scalars,
/// or a user-facing error (e.g. an empty filter selection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CrunchOutcome {
    Failed {
        error: String,
    },
    Ready {
        df_dict: BTreeMap<String, Dataset>,
        single_values: ScalarDict,
    },
}

impl CrunchOutcome {
    pub fn from_json(raw: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            CrunchOutcome::Failed { error } => Some(error.as_str()),
            CrunchOutcome::Ready { .. } => None,
        }
    }
}

pub trait CrunchPipeline {
    /// Whether the pipeline can take requests right now. Backends that
    /// depend on something outside the process (a page script, a worker)
    /// override this.
    fn is_available(&self) -> LocalBoxFuture<'_, bool> {
        Box::pin(async { true })
    }

    /// Names of the JSON files inside the archive.
    fn list_json_files<'a>(
        &'a self,
        archive: &'a [u8],
    ) -> LocalBoxFuture<'a, Result<Vec<String>, PipelineError>>;

    /// Turn the archive into datasets, optionally filtered.
    fn crunch<'a>(
        &'a self,
        request: CrunchRequest<'a>,
    ) -> LocalBoxFuture<'a, Result<CrunchOutcome, PipelineError>>;

    /// First and last month present in the archive.
    fn month_bounds<'a>(
        &'a self,
        archive: &'a [u8],
    ) -> LocalBoxFuture<'a, Result<(YearMonth, YearMonth), PipelineError>>;

    /// A few raw rows picked at random.
    fn random_sample<'a>(
        &'a self,
        archive: &'a [u8],
        sample_count: usize,
    ) -> LocalBoxFuture<'a, Result<Dataset, PipelineError>>;

    /// The whole preprocessed table as CSV.
    fn export_csv<'a>(&'a self, archive: &'a [u8])
        -> LocalBoxFuture<'a, Result<String, PipelineError>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, ScalarValue};

    #[test]
    fn ready_outcome_parses() {
        let raw = r#"{
            "df_dict": {
                "most_played_artists_total": {
                    "columns": ["artist", "play count"],
                    "data": [["Gorillaz", 1204]]
                }
            },
            "single_values": {"played_songs": 67982, "top_1_artist": "Gorillaz"}
        }"#;
        let outcome = CrunchOutcome::from_json(raw).unwrap();
        match outcome {
            CrunchOutcome::Ready {
                df_dict,
                single_values,
            } => {
                let dataset = &df_dict["most_played_artists_total"];
                assert_eq!(dataset.data[0][1], Cell::Number(1204.0));
                assert_eq!(
                    single_values["top_1_artist"],
                    ScalarValue::Text("Gorillaz".into())
                );
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn error_outcome_parses() {
        let outcome =
            CrunchOutcome::from_json(r#"{"error": "No plays from this artist in this time frame."}"#)
                .unwrap();
        assert_eq!(
            outcome.error(),
            Some("No plays from this artist in this time frame.")
        );
    }

    #[test]
    fn garbage_is_malformed() {
        let err = CrunchOutcome::from_json(r#"{"df_dict": 3}"#).unwrap_err();
        assert!(matches!(err, PipelineError::Malformed { .. }));
    }
}
