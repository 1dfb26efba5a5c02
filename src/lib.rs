//! @ai:module:intent Multi-analyzer quality scoring for LLM-generated code
//! @ai:module:layer application
//! @ai:module:public_api config, model, selector, orchestrator, adapters, scoring, report, api

pub mod adapters;
pub mod api;
pub mod config;
pub mod error;
pub mod feedback;
pub mod model;
pub mod orchestrator;
pub mod report;
pub mod scoring;
pub mod selector;
pub mod toolchain;

pub use adapters::AdapterSet;
pub use config::ServiceConfig;
pub use error::{AnalysisError, ToolError};
pub use feedback::{FeedbackClient, FeedbackClientTrait};
pub use model::{AnalysisRequest, Language, Mode, ToolKind, ToolResult};
pub use orchestrator::{AnalyzerRegistry, Orchestrator};
pub use report::{AnalysisReport, JsonResultSink, ResultSink};
pub use scoring::{ScoreAggregator, ScoredResult, WeightingTier};
pub use selector::{CodeBlockSelector, CodeBlockSelectorTrait};
pub use toolchain::{ToolchainStatus, ToolchainValidator};
