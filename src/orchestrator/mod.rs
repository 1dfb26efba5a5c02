//! @ai:module:intent Dispatch core: extract, select analyzers, run them concurrently, score, persist
//! @ai:module:layer application
//! @ai:module:public_api Orchestrator, AnalyzerRegistry, AnalyzerSelection, TempArtifacts
//! @ai:module:depends_on adapters, scoring, selector, report

pub mod registry;
pub mod workspace;

pub use registry::{AnalyzerRegistry, AnalyzerSelection};
pub use workspace::TempArtifacts;

use crate::adapters::AdapterSet;
use crate::config::ServiceConfig;
use crate::error::{AnalysisError, Result, ToolError};
use crate::model::{AnalysisRequest, AnalyzePayload, ToolKind, ToolPayload, ToolResult};
use crate::report::{AnalysisReport, ResultSink};
use crate::scoring::{ScoreAggregator, ScoreAggregatorTrait};
use crate::selector::{CodeBlockSelector, CodeBlockSelectorTrait};
use futures_util::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Extension used for verification-language artifacts.
pub const VERIFICATION_EXTENSION: &str = "dfy";

/// Reason recorded when verification is selected but no verification code was sent.
pub const NO_VERIFICATION_CODE: &str = "no code provided";

/// Reason recorded when an adapter panicked instead of returning.
pub const ADAPTER_PANICKED: &str = "adapter panicked";

/// @ai:intent One analyzer slot in a request's plan
enum Planned {
    Run(ToolKind, PathBuf),
    Skip(ToolResult),
}

impl Planned {
    fn kind(&self) -> ToolKind {
        match self {
            Planned::Run(kind, _) => *kind,
            Planned::Skip(result) => result.tool,
        }
    }
}

/// @ai:intent Per-request analysis pipeline over injected adapters and configuration
pub struct Orchestrator {
    config: Arc<ServiceConfig>,
    registry: AnalyzerRegistry,
    selector: CodeBlockSelector,
    adapters: AdapterSet,
    aggregator: ScoreAggregator,
    sink: Arc<dyn ResultSink>,
}

impl Orchestrator {
    /// @ai:intent Create an orchestrator
    /// @ai:effects pure
    pub fn new(config: Arc<ServiceConfig>, adapters: AdapterSet, sink: Arc<dyn ResultSink>) -> Self {
        Self {
            config,
            registry: AnalyzerRegistry::new(),
            selector: CodeBlockSelector::new(),
            adapters,
            aggregator: ScoreAggregator::new(),
            sink,
        }
    }

    /// @ai:intent Validate a wire payload and analyze it
    /// @ai:effects fs:write, io
    pub async fn analyze_payload(&self, payload: AnalyzePayload) -> Result<AnalysisReport> {
        let request = AnalysisRequest::try_from(payload)?;
        self.analyze(request).await
    }

    /// @ai:intent Run the whole pipeline for one request
    /// @ai:post every temp artifact created for the request is gone, on every exit path
    /// @ai:effects fs:write, io
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisReport> {
        let mut artifacts = TempArtifacts::new(&self.config.paths.temp_dir);
        let outcome = self.run_pipeline(&request, &mut artifacts).await;
        artifacts.cleanup();

        outcome.map_err(|e| match e {
            AnalysisError::InputValidation(_) => e,
            other => {
                error!(
                    model = %request.model,
                    language = %request.language,
                    error = %other,
                    "Analysis failed"
                );
                AnalysisError::Internal(other.to_string())
            }
        })
    }

    /// @ai:intent Extract, plan, dispatch, score, persist
    /// @ai:effects fs:write, io
    async fn run_pipeline(
        &self,
        request: &AnalysisRequest,
        artifacts: &mut TempArtifacts,
    ) -> Result<AnalysisReport> {
        let code = self.selector.select(&request.code_text);
        let verification_code = self
            .selector
            .select_optional(request.verification_text.as_deref());

        if !request.language.is_known() {
            warn!(language = %request.language, "Unrecognized language, no analyzers apply");
        }

        if code.is_empty() {
            warn!(model = %request.model, "No code block found in generated output");
        }

        let selection = self.registry.select_analyzers(&request.language);
        let runnable = selection.runnable(request.mode);

        info!(
            model = %request.model,
            language = %request.language,
            mode = %request.mode,
            analyzers = ?runnable,
            "Starting analysis"
        );

        let plan = self.plan(request, &runnable, &code, &verification_code, artifacts)?;
        let tools = self.dispatch(plan).await;
        let scores = self.aggregator.score(&tools, &code, request.mode);

        let report = AnalysisReport {
            model: request.model.clone(),
            language: request.language.clone(),
            mode: request.mode,
            generated_code: code,
            scores,
            tools,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let sink = Arc::clone(&self.sink);
        let record = report.clone();
        match tokio::task::spawn_blocking(move || sink.write(&record)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "Failed to persist combined results"),
            Err(e) => warn!(error = %e, "Result sink task aborted"),
        }

        info!(
            final_score = ?report.scores.final_score,
            tier = ?report.scores.weighting_tier,
            "Analysis completed"
        );

        Ok(report)
    }

    /// @ai:intent Materialize artifacts and decide each analyzer's slot
    /// @ai:post the source artifact is written once and only when some analyzer needs it
    /// @ai:effects fs:write
    fn plan(
        &self,
        request: &AnalysisRequest,
        runnable: &[ToolKind],
        code: &str,
        verification_code: &str,
        artifacts: &mut TempArtifacts,
    ) -> Result<Vec<Planned>> {
        let needs_source = runnable
            .iter()
            .any(|kind| *kind != ToolKind::FormalVerification);

        let source = if needs_source {
            Some(artifacts.write_source(code, &request.language.extension())?)
        } else {
            None
        };

        let mut plan = Vec::with_capacity(runnable.len());

        for kind in runnable {
            match (kind, &source) {
                (ToolKind::FormalVerification, _) => {
                    // Only reachable under full mode
                    if verification_code.is_empty() {
                        plan.push(Planned::Skip(ToolResult::not_applicable(
                            *kind,
                            NO_VERIFICATION_CODE,
                        )));
                    } else {
                        let path = artifacts.write_source(verification_code, VERIFICATION_EXTENSION)?;
                        plan.push(Planned::Run(*kind, path));
                    }
                }
                (_, Some(path)) => plan.push(Planned::Run(*kind, path.clone())),
                (_, None) => {
                    return Err(AnalysisError::Internal(format!(
                        "no source artifact for {kind}"
                    )))
                }
            }
        }

        Ok(plan)
    }

    /// @ai:intent Run planned analyzers concurrently under the request deadline
    /// @ai:post one result per planned slot, in plan order; nothing is emitted until all finish
    /// @ai:effects io
    async fn dispatch(&self, plan: Vec<Planned>) -> Vec<ToolResult> {
        let timeout = self.config.request_timeout();
        let deadline = tokio::time::Instant::now() + timeout;

        let kinds: Vec<ToolKind> = plan.iter().map(Planned::kind).collect();

        // One task per adapter so a panic stays inside its own slot
        let handles: Vec<_> = plan
            .into_iter()
            .map(|slot| {
                let adapters = self.adapters.clone();

                tokio::spawn(async move {
                    match slot {
                        Planned::Skip(result) => result,
                        Planned::Run(kind, path) => {
                            let call = Self::invoke(adapters, kind, path);
                            match tokio::time::timeout_at(deadline, call).await {
                                Ok(result) => result,
                                Err(_) => {
                                    let reason = ToolError::Timeout {
                                        tool: kind.as_str().to_string(),
                                        secs: timeout.as_secs(),
                                    }
                                    .to_string();

                                    warn!(tool = %kind, "{}", reason);
                                    ToolResult::failed(kind, reason)
                                        .with_duration(timeout.as_millis() as u64)
                                }
                            }
                        }
                    }
                })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .zip(kinds)
            .map(|(joined, kind)| match joined {
                Ok(result) => result,
                Err(e) => {
                    error!(tool = %kind, error = %e, "Adapter task aborted");
                    let reason = if e.is_panic() {
                        ADAPTER_PANICKED
                    } else {
                        "adapter task cancelled"
                    };
                    ToolResult::failed(kind, reason)
                }
            })
            .collect()
    }

    /// @ai:intent Call one adapter and normalize every failure into a ToolResult
    /// @ai:effects io
    async fn invoke(adapters: AdapterSet, kind: ToolKind, path: PathBuf) -> ToolResult {
        let started = Instant::now();

        let outcome = match kind {
            ToolKind::InterpretedStatic => adapters
                .interpreted_static
                .analyze(&path)
                .await
                .map(ToolPayload::InterpretedStatic),
            ToolKind::CompiledStatic => adapters
                .compiled_static
                .analyze(&path)
                .await
                .map(ToolPayload::CompiledStatic),
            ToolKind::CrossLanguageStatic => adapters
                .cross_language_static
                .analyze(&path)
                .await
                .map(ToolPayload::CrossLanguage),
            ToolKind::DynamicMemory => adapters
                .dynamic_memory
                .analyze(&path)
                .await
                .map(ToolPayload::DynamicMemory),
            ToolKind::FormalVerification => adapters
                .formal_verification
                .verify(&path)
                .await
                .map(ToolPayload::FormalVerification),
        };

        let result = match outcome {
            Ok(payload) => ToolResult::ok(kind, payload),
            Err(e @ ToolError::Unavailable { .. }) => {
                warn!(tool = %kind, error = %e, "Tool missing");
                ToolResult::missing(kind, e.to_string())
            }
            Err(e) => {
                warn!(tool = %kind, error = %e, "Tool failed");
                ToolResult::failed(kind, e.to_string())
            }
        };

        result.with_duration(started.elapsed().as_millis() as u64)
    }
}
