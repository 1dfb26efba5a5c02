//! @ai:module:intent External tool adapters behind one async trait per analyzer family
//! @ai:module:layer infrastructure
//! @ai:module:public_api AdapterSet, CompiledStaticAdapterTrait, InterpretedStaticAdapterTrait, CrossLanguageStaticAdapterTrait, DynamicMemoryAdapterTrait, FormalVerificationAdapterTrait
//! @ai:module:depends_on config, error, model

pub mod clang_tidy;
pub mod dafny;
pub mod mock;
pub mod process;
pub mod python_static;
pub mod sonarqube;
pub mod valgrind;

pub use clang_tidy::ClangTidyAdapter;
pub use dafny::DafnyAdapter;
pub use mock::{MockAdapter, MockBehavior};
pub use python_static::PythonStaticAdapter;
pub use sonarqube::SonarQubeAdapter;
pub use valgrind::ValgrindAdapter;

use crate::config::ServiceConfig;
use crate::error::ToolError;
use crate::model::{
    CompiledStaticReport, CrossLanguageReport, DynamicMemoryReport, FormalVerificationReport,
    ToolOutput,
};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// @ai:intent Static analysis for compiled languages (C, C++)
#[async_trait]
pub trait CompiledStaticAdapterTrait: Send + Sync {
    async fn analyze(&self, path: &Path) -> Result<CompiledStaticReport, ToolError>;
}

/// @ai:intent Static analysis for interpreted languages; one output per checker
#[async_trait]
pub trait InterpretedStaticAdapterTrait: Send + Sync {
    async fn analyze(&self, path: &Path) -> Result<Vec<ToolOutput>, ToolError>;
}

/// @ai:intent Server-backed static analysis covering many languages
#[async_trait]
pub trait CrossLanguageStaticAdapterTrait: Send + Sync {
    async fn analyze(&self, path: &Path) -> Result<CrossLanguageReport, ToolError>;
}

/// @ai:intent Run the program and report memory errors and leaks
#[async_trait]
pub trait DynamicMemoryAdapterTrait: Send + Sync {
    async fn analyze(&self, path: &Path) -> Result<DynamicMemoryReport, ToolError>;
}

/// @ai:intent Verify a verification-language program
#[async_trait]
pub trait FormalVerificationAdapterTrait: Send + Sync {
    async fn verify(&self, path: &Path) -> Result<FormalVerificationReport, ToolError>;
}

/// @ai:intent The five adapters an orchestrator dispatches to
#[derive(Clone)]
pub struct AdapterSet {
    pub compiled_static: Arc<dyn CompiledStaticAdapterTrait>,
    pub interpreted_static: Arc<dyn InterpretedStaticAdapterTrait>,
    pub cross_language_static: Arc<dyn CrossLanguageStaticAdapterTrait>,
    pub dynamic_memory: Arc<dyn DynamicMemoryAdapterTrait>,
    pub formal_verification: Arc<dyn FormalVerificationAdapterTrait>,
}

impl AdapterSet {
    /// @ai:intent Real subprocess/HTTP adapters wired from configuration
    /// @ai:effects pure
    pub fn from_config(config: &ServiceConfig) -> Self {
        let tools = &config.tools;

        Self {
            compiled_static: Arc::new(ClangTidyAdapter::new(tools.clang_tidy.clone())),
            interpreted_static: Arc::new(PythonStaticAdapter::new(tools)),
            cross_language_static: Arc::new(SonarQubeAdapter::new(
                tools.sonar_scanner.clone(),
                config.sonarqube.clone(),
            )),
            dynamic_memory: Arc::new(ValgrindAdapter::new(tools.clone())),
            formal_verification: Arc::new(DafnyAdapter::new(
                tools.dafny.clone(),
                config.analysis.verifier_success_marker.clone(),
            )),
        }
    }

    /// @ai:intent Every family served by the same mock
    /// @ai:effects pure
    pub fn uniform(mock: Arc<MockAdapter>) -> Self {
        Self {
            compiled_static: mock.clone(),
            interpreted_static: mock.clone(),
            cross_language_static: mock.clone(),
            dynamic_memory: mock.clone(),
            formal_verification: mock,
        }
    }

    /// @ai:intent Clean-run fakes for dry runs and tests
    /// @ai:effects pure
    pub fn mock() -> Self {
        Self::uniform(Arc::new(MockAdapter::new()))
    }
}
