//! Upload, filter, sample and CSV actions driven through a
//! [`CrunchPipeline`].
//!
//! Platforms that can run the statistics pipeline register it once with
//! [`register_pipeline`]; without one the upload panel stays hidden and the
//! dashboard shows the bundled demo data only.

use std::rc::Rc;

use api::archive::ArchiveKind;
use api::filter::FilterParams;
use api::pipeline::{CrunchOutcome, CrunchPipeline, CrunchRequest, PipelineError};
use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::core::dataset::CacheEntry;
use crate::core::filters::{month_options, MonthOption};
use crate::core::progress::ProgressLog;
use crate::core::{DashboardContext, DataError};
use crate::export::ExportFile;
use crate::t;
use crate::views::defaults::SAMPLE_VIEW;

/// Rows drawn by "random sample".
pub const SAMPLE_COUNT: usize = 1;
/// Base name of the full-table CSV download.
pub const CSV_EXPORT_NAME: &str = "streaming_history";

const UPLOAD_STEPS: usize = 4;

static PIPELINE: OnceCell<fn() -> Rc<dyn CrunchPipeline>> = OnceCell::new();

pub fn register_pipeline(factory: fn() -> Rc<dyn CrunchPipeline>) {
    let _ = PIPELINE.set(factory);
}

pub fn registered_pipeline() -> Option<Rc<dyn CrunchPipeline>> {
    PIPELINE.get().map(|factory| factory())
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    #[error("{}", wrong_archive_message(.0))]
    WrongArchive(ArchiveKind),
    /// Message from the pipeline, shown as-is.
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Data(#[from] DataError),
}

impl WorkflowError {
    /// Text that replaces the current view in the output region. Only a
    /// pipeline rejection does; other failures stay next to the form.
    pub fn output_message(&self) -> Option<&str> {
        match self {
            WorkflowError::Rejected(message) => Some(message),
            _ => None,
        }
    }
}

fn wrong_archive_message(kind: &ArchiveKind) -> String {
    match kind {
        ArchiveKind::TechnicalLog => t!("error-technical-log"),
        ArchiveKind::AccountData => t!("error-account-data"),
        ArchiveKind::StreamingHistory => String::new(),
    }
}

/// Crunch a freshly uploaded archive and load the result. `report` sees the
/// progress log after every step.
pub async fn process_archive(
    ctx: &DashboardContext,
    pipeline: &dyn CrunchPipeline,
    archive: &[u8],
    report: &mut dyn FnMut(&ProgressLog),
) -> Result<(), WorkflowError> {
    let mut log = ProgressLog::new();
    let result = run_upload(ctx, pipeline, archive, &mut log, report).await;

    match &result {
        Ok(()) => {
            log.finish(t!("progress-finished"));
            tracing::info!(bytes = archive.len(), "Uploaded Data");
        }
        Err(err) => {
            log.finish(format!("{}: {err}", t!("progress-error")));
            tracing::warn!(%err, "upload rejected");
        }
    }
    report(&log);
    result
}

async fn run_upload(
    ctx: &DashboardContext,
    pipeline: &dyn CrunchPipeline,
    archive: &[u8],
    log: &mut ProgressLog,
    report: &mut dyn FnMut(&ProgressLog),
) -> Result<(), WorkflowError> {
    let mut step = |log: &mut ProgressLog, number: usize, text: String| {
        log.step(format!("{number}/{UPLOAD_STEPS}: {text}"));
        report(log);
    };

    step(log, 1, t!("progress-listing"));
    let files = pipeline.list_json_files(archive).await?;

    step(log, 2, t!("progress-checking"));
    let kind = ArchiveKind::classify(&files);
    if !kind.is_streaming_history() {
        return Err(WorkflowError::WrongArchive(kind));
    }

    step(log, 3, t!("progress-crunching"));
    let outcome = pipeline.crunch(CrunchRequest::unfiltered(archive)).await?;

    step(log, 4, t!("progress-loading"));
    load_outcome(ctx, outcome)
}

/// Re-crunch with `filter`. A pipeline `{error}` comes back as
/// [`WorkflowError::Rejected`] with the message untouched.
pub async fn apply_filter(
    ctx: &DashboardContext,
    pipeline: &dyn CrunchPipeline,
    archive: &[u8],
    filter: &FilterParams,
) -> Result<(), WorkflowError> {
    tracing::debug!(?filter, "applying filter");
    let outcome = pipeline
        .crunch(CrunchRequest::filtered(archive, filter))
        .await?;
    load_outcome(ctx, outcome)
}

fn load_outcome(ctx: &DashboardContext, outcome: CrunchOutcome) -> Result<(), WorkflowError> {
    match outcome {
        CrunchOutcome::Failed { error } => Err(WorkflowError::Rejected(error)),
        CrunchOutcome::Ready {
            df_dict,
            single_values,
        } => {
            ctx.load_user_data(df_dict, single_values);
            Ok(())
        }
    }
}

/// Draw random rows into the `sample_data` entry.
pub async fn load_sample(
    ctx: &DashboardContext,
    pipeline: &dyn CrunchPipeline,
    archive: &[u8],
) -> Result<(), WorkflowError> {
    let sample = pipeline.random_sample(archive, SAMPLE_COUNT).await?;
    let entry = CacheEntry::checked_dataset(SAMPLE_VIEW, sample)?;
    ctx.cache().insert(SAMPLE_VIEW, entry);
    Ok(())
}

/// The whole preprocessed table, `streaming_history.csv`.
pub async fn export_full_csv(
    pipeline: &dyn CrunchPipeline,
    archive: &[u8],
) -> Result<ExportFile, WorkflowError> {
    let csv = pipeline.export_csv(archive).await?;
    Ok(ExportFile::csv(CSV_EXPORT_NAME, csv))
}

/// Month choices for the filter form, first to last month in the archive.
pub async fn filter_months(
    pipeline: &dyn CrunchPipeline,
    archive: &[u8],
) -> Result<Vec<MonthOption>, WorkflowError> {
    let (first, last) = pipeline.month_bounds(archive).await?;
    Ok(month_options(first, last))
}
