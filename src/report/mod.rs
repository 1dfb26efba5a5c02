//! @ai:module:intent Analysis record and result persistence
//! @ai:module:layer infrastructure
//! @ai:module:public_api AnalysisReport, ResultSink, JsonResultSink, MemoryResultSink

pub mod json_report;
pub mod record;

pub use json_report::{JsonResultSink, MemoryResultSink};
pub use record::AnalysisReport;

use anyhow::Result;

/// @ai:intent Trait for persisting combined analysis records
pub trait ResultSink: Send + Sync {
    /// @ai:intent Persist one record
    fn write(&self, report: &AnalysisReport) -> Result<()>;
}
