//! @ai:module:intent Map a declared language to the analyzers that apply to it
//! @ai:module:layer domain
//! @ai:module:public_api AnalyzerRegistry, AnalyzerSelection
//! @ai:module:stateless true

use crate::model::{Language, Mode, ToolKind};
use serde::Serialize;

/// @ai:intent Which analyzer families apply to a language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnalyzerSelection {
    pub interpreted_static: bool,
    pub compiled_static: bool,
    pub cross_language_static: bool,
    pub dynamic_memory: bool,
    pub formal_verification: bool,
}

impl AnalyzerSelection {
    /// @ai:intent Whether a given analyzer family is selected
    /// @ai:effects pure
    pub fn includes(&self, kind: ToolKind) -> bool {
        match kind {
            ToolKind::InterpretedStatic => self.interpreted_static,
            ToolKind::CompiledStatic => self.compiled_static,
            ToolKind::CrossLanguageStatic => self.cross_language_static,
            ToolKind::DynamicMemory => self.dynamic_memory,
            ToolKind::FormalVerification => self.formal_verification,
        }
    }

    /// @ai:intent Selected families that run under the given mode, in dispatch order
    /// @ai:post dynamic-memory and formal-verification only appear under Mode::Full
    /// @ai:effects pure
    pub fn runnable(&self, mode: Mode) -> Vec<ToolKind> {
        ToolKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.includes(*kind))
            .filter(|kind| kind.is_static() || mode == Mode::Full)
            .collect()
    }

    /// @ai:intent True when no analyzer applies
    /// @ai:effects pure
    pub fn is_empty(&self) -> bool {
        !ToolKind::ALL.iter().any(|kind| self.includes(*kind))
    }
}

/// @ai:intent Read-only language capability table
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzerRegistry;

impl AnalyzerRegistry {
    /// @ai:intent Create the registry
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Compute the analyzer selection for a language
    /// @ai:post unknown languages yield an all-false selection
    /// @ai:effects pure
    pub fn select_analyzers(&self, language: &Language) -> AnalyzerSelection {
        use Language::*;

        AnalyzerSelection {
            interpreted_static: matches!(language, Python),
            compiled_static: matches!(language, C | Cpp),
            cross_language_static: matches!(
                language,
                Java | CSharp
                    | JavaScript
                    | TypeScript
                    | CloudFormation
                    | Terraform
                    | Docker
                    | Kubernetes
                    | HelmCharts
                    | Kotlin
                    | Ruby
                    | Go
                    | Scala
                    | Flex
                    | Php
                    | Html
                    | Css
                    | Xml
                    | VbNet
            ),
            dynamic_memory: matches!(
                language,
                C | Cpp | Fortran | Ada | Assembly | Java | Python | Perl
            ),
            formal_verification: matches!(language, CSharp | Go | Python | Java | JavaScript),
        }
    }
}
