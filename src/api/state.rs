//! @ai:module:intent Shared state handed to every HTTP handler
//! @ai:module:layer interface
//! @ai:module:public_api AppState

use crate::feedback::FeedbackClientTrait;
use crate::orchestrator::Orchestrator;
use crate::toolchain::ToolchainStatus;
use std::sync::Arc;

/// @ai:intent Immutable, cheaply cloned handler state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub feedback: Arc<dyn FeedbackClientTrait>,
    /// Probed once at startup
    pub toolchain: Arc<ToolchainStatus>,
    pub version: String,
}

impl AppState {
    /// @ai:intent Assemble handler state
    /// @ai:effects pure
    pub fn new(
        orchestrator: Arc<Orchestrator>,
        feedback: Arc<dyn FeedbackClientTrait>,
        toolchain: ToolchainStatus,
    ) -> Self {
        Self {
            orchestrator,
            feedback,
            toolchain: Arc::new(toolchain),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
