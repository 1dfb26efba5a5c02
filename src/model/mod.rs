//! @ai:module:intent Domain types for code analysis requests and results
//! @ai:module:layer domain
//! @ai:module:public_api Language, Mode, AnalysisRequest, AnalyzePayload, ToolKind, ToolStatus, ToolResult, ToolPayload

pub mod language;
pub mod request;
pub mod result;

pub use language::Language;
pub use request::{AnalysisRequest, AnalyzePayload, Mode};
pub use result::{
    CompiledStaticReport, CrossLanguageReport, DynamicMemoryReport, FormalVerificationReport,
    Measure, ToolKind, ToolOutput, ToolPayload, ToolResult, ToolStatus,
};
