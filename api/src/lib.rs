//! Boundary types shared between the dashboard and the statistics pipeline.
//!
//! The pipeline itself (archive parsing, aggregation) lives outside this
//! workspace. This crate only describes what goes in and what comes back:
//! - [`model`]: datasets and scalar dictionaries as they appear on the wire
//! - [`filter`]: time range / artist / top-k filter parameters
//! - [`archive`]: detection of uploads that are the wrong export type
//! - [`pipeline`]: the asynchronous [`CrunchPipeline`] seam

pub mod archive;
pub mod filter;
pub mod model;
pub mod pipeline;

pub use archive::ArchiveKind;
pub use filter::{FilterParams, YearMonth};
pub use model::{Cell, Dataset, ScalarDict, ScalarValue};
pub use pipeline::{CrunchOutcome, CrunchPipeline, CrunchRequest, PipelineError};
