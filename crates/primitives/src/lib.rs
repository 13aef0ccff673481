//! Data model for live example-driven analysis results.
//!
//! An analysis backend evaluates probes embedded in source comments and
//! reports, per file, a flat list of [`AbstractProbe`]s keyed by line. This
//! crate holds those wire types plus the line-indexed views built once per
//! result and shared by every consumer.

/// Wire model: observed values, example results, probes, and results.
pub mod model;
/// Line/character positions used when inserting evaluated text.
pub mod position;
/// Line-indexed probe tables and immutable analysis snapshots.
pub mod table;

pub use model::{AbstractProbe, AnalysisResult, ExampleResult, FileResult, ObservedValue, ProbeType, TerminationResult};
pub use position::{TextPosition, TextRange};
pub use table::{AnalysisSnapshot, FileSnapshot, ProbeTable};
