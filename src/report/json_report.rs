//! @ai:module:intent Persist the most recent analysis record as pretty JSON
//! @ai:module:layer infrastructure
//! @ai:module:public_api JsonResultSink, MemoryResultSink
//! @ai:module:stateless false

use super::record::AnalysisReport;
use super::ResultSink;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Mutex;

/// @ai:intent Overwrites a single JSON file with each new record
pub struct JsonResultSink {
    path: PathBuf,
    // Serializes writers so concurrent requests never interleave bytes
    lock: Mutex<()>,
}

impl JsonResultSink {
    /// @ai:intent Create a sink writing to the given file
    /// @ai:effects pure
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }
}

impl ResultSink for JsonResultSink {
    /// @ai:intent Write the record, creating parent directories as needed
    /// @ai:effects fs:write
    fn write(&self, report: &AnalysisReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let _guard = self
            .lock
            .lock()
            .map_err(|_| anyhow::anyhow!("result sink lock poisoned"))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        tracing::info!("Combined results saved to {}", self.path.display());
        Ok(())
    }
}

/// @ai:intent Keeps records in memory (dry runs and tests)
#[derive(Default)]
pub struct MemoryResultSink {
    reports: Mutex<Vec<AnalysisReport>>,
}

impl MemoryResultSink {
    /// @ai:intent Create an empty in-memory sink
    /// @ai:effects pure
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Records written so far
    /// @ai:effects pure
    pub fn reports(&self) -> Vec<AnalysisReport> {
        self.reports
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl ResultSink for MemoryResultSink {
    fn write(&self, report: &AnalysisReport) -> Result<()> {
        self.reports
            .lock()
            .map_err(|_| anyhow::anyhow!("result sink lock poisoned"))?
            .push(report.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Language, Mode};
    use crate::scoring::ScoredResult;
    use tempfile::TempDir;

    fn report(model: &str) -> AnalysisReport {
        AnalysisReport {
            model: model.to_string(),
            language: Language::C,
            mode: Mode::Full,
            generated_code: "int main() { return 0; }".to_string(),
            scores: ScoredResult::unavailable(),
            tools: vec![],
            timestamp: "2026-01-19T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_writes_and_overwrites() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("Results").join("combined_results.json");
        let sink = JsonResultSink::new(&output);

        sink.write(&report("first-model")).unwrap();
        sink.write(&report("second-model")).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("second-model"));
        assert!(!content.contains("first-model"));
    }

    #[test]
    fn test_memory_sink_collects() {
        let sink = MemoryResultSink::new();
        sink.write(&report("m")).unwrap();

        assert_eq!(sink.reports().len(), 1);
    }
}
