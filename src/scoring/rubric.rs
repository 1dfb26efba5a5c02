//! @ai:module:intent Per-tool rubrics turning raw analyzer payloads into 0-10 sub-scores
//! @ai:module:layer domain
//! @ai:module:public_api interpreted_static_score, compiled_static_score, cross_language_score, dynamic_memory_score, verification_score
//! @ai:module:stateless true

use crate::model::{
    CompiledStaticReport, CrossLanguageReport, DynamicMemoryReport, FormalVerificationReport,
    ToolOutput,
};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static PYLINT_RATING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"rated at\s*(-?\d+(?:\.\d+)?)\s*/\s*10").expect("pylint regex is valid")
});

static ERROR_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+)\s+errors?\b").expect("error count regex is valid"));

fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 10.0)
}

fn output_of<'a>(outputs: &'a [ToolOutput], tool: &str) -> &'a str {
    outputs
        .iter()
        .find(|o| o.tool == tool)
        .map(|o| o.output.as_str())
        .unwrap_or("")
}

/// @ai:intent Mean of type-check pass/fail, lint rating, security-scan pass/fail
/// @ai:post None when no checker output exists at all
/// @ai:effects pure
pub fn interpreted_static_score(outputs: &[ToolOutput]) -> Option<f64> {
    if outputs.is_empty() {
        return None;
    }

    let type_check = if output_of(outputs, "mypy").contains("Success") {
        10.0
    } else {
        0.0
    };

    let lint = PYLINT_RATING
        .captures(output_of(outputs, "pylint"))
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(clamp_score)
        .unwrap_or(0.0);

    let security = if output_of(outputs, "bandit").contains("No issues identified") {
        10.0
    } else {
        0.0
    };

    Some((type_check + lint + security) / 3.0)
}

/// @ai:intent Error-gated, warning-banded score
/// @ai:effects pure
pub fn compiled_static_score(report: &CompiledStaticReport) -> f64 {
    if !report.errors.is_empty() {
        return 0.0;
    }

    let warnings = report.warnings.len() as i64;

    let score = match warnings {
        0 => 10,
        1..=5 => (10 - warnings).max(5),
        // capped at the mild band's floor so more warnings never score higher
        6..=15 => (10 - warnings / 2).clamp(2, 5),
        _ => 0,
    };

    score as f64
}

/// @ai:intent Numeric measure value; anything but a plain non-negative decimal reads as 0
/// @ai:effects pure
fn measure_value(raw: &str) -> f64 {
    let plain = !raw.is_empty()
        && raw.chars().filter(|c| *c == '.').count() <= 1
        && raw.chars().all(|c| c.is_ascii_digit() || c == '.')
        && raw.chars().any(|c| c.is_ascii_digit());

    if plain {
        raw.parse().unwrap_or(0.0)
    } else {
        0.0
    }
}

/// @ai:intent Average over the scored metrics the server actually reported
/// @ai:post divisor is the number of metrics present; None when none are present
/// @ai:effects pure
pub fn cross_language_score(report: &CrossLanguageReport) -> Option<f64> {
    let measures: HashMap<&str, f64> = report
        .measures
        .iter()
        .map(|m| (m.metric.as_str(), measure_value(&m.value)))
        .collect();

    let zero_is_perfect = |v: f64| if v == 0.0 { 10.0 } else { 0.0 };

    let scored: Vec<f64> = [
        measures.get("bugs").map(|v| zero_is_perfect(*v)),
        measures.get("vulnerabilities").map(|v| zero_is_perfect(*v)),
        measures.get("complexity").map(|v| clamp_score(10.0 - v)),
        measures.get("line_coverage").map(|v| clamp_score(10.0 * v / 100.0)),
        measures
            .get("duplicated_lines_density")
            .map(|v| zero_is_perfect(*v)),
    ]
    .into_iter()
    .flatten()
    .collect();

    if scored.is_empty() {
        return None;
    }

    Some(scored.iter().sum::<f64>() / scored.len() as f64)
}

/// @ai:intent 0 for a failed run, 5 when anything is still reachable, else 10
/// @ai:effects pure
pub fn dynamic_memory_score(report: &DynamicMemoryReport) -> f64 {
    if !report.succeeded() {
        return 0.0;
    }

    let still_reachable = report
        .memory_issues
        .get("still_reachable")
        .map(|lines| !lines.is_empty())
        .unwrap_or(false);

    if still_reachable {
        5.0
    } else {
        10.0
    }
}

/// @ai:intent Binary: 10 when the verifier finished without errors
/// @ai:effects pure
pub fn verification_score(report: &FormalVerificationReport) -> f64 {
    if report.verification_status != "success" {
        return 0.0;
    }

    let reported_errors = ERROR_COUNT
        .captures_iter(&report.stdout)
        .filter_map(|cap| cap.get(1)?.as_str().parse::<u64>().ok())
        .any(|n| n > 0);

    if reported_errors {
        0.0
    } else {
        10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Measure;
    use pretty_assertions::assert_eq;

    fn outputs(mypy: &str, pylint: &str, bandit: &str) -> Vec<ToolOutput> {
        [("mypy", mypy), ("pylint", pylint), ("bandit", bandit)]
            .into_iter()
            .map(|(tool, output)| ToolOutput {
                tool: tool.to_string(),
                output: output.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_interpreted_static_all_clean() {
        let score = interpreted_static_score(&outputs(
            "Success: no issues found in 1 source file",
            "Your code has been rated at 10.00/10 (previous run: 9.00/10, +1.00)",
            "Test results:\n\tNo issues identified.",
        ))
        .unwrap();

        assert!((score - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_interpreted_static_mixed() {
        let score = interpreted_static_score(&outputs(
            "error: Incompatible return value type",
            "Your code has been rated at 6.50/10",
            "No issues identified.",
        ))
        .unwrap();

        assert!((score - 16.5 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_pylint_rating_is_zero() {
        let score = interpreted_static_score(&outputs("Success", "pylint not found.", "bandit not found.")).unwrap();
        assert!((score - 10.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_pylint_rating_clamped() {
        let score = interpreted_static_score(&outputs("", "Your code has been rated at -3.00/10", "")).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_interpreted_static_no_outputs() {
        assert_eq!(interpreted_static_score(&[]), None);
    }

    fn clang(errors: usize, warnings: usize) -> CompiledStaticReport {
        CompiledStaticReport {
            errors: vec!["e".to_string(); errors],
            warnings: vec!["w".to_string(); warnings],
            ..Default::default()
        }
    }

    #[test]
    fn test_compiled_static_bands() {
        assert_eq!(compiled_static_score(&clang(1, 0)), 0.0);
        assert_eq!(compiled_static_score(&clang(0, 0)), 10.0);
        assert_eq!(compiled_static_score(&clang(0, 1)), 9.0);
        assert_eq!(compiled_static_score(&clang(0, 5)), 5.0);
        assert_eq!(compiled_static_score(&clang(0, 6)), 5.0);
        assert_eq!(compiled_static_score(&clang(0, 12)), 4.0);
        assert_eq!(compiled_static_score(&clang(0, 15)), 3.0);
        assert_eq!(compiled_static_score(&clang(0, 16)), 0.0);
    }

    #[test]
    fn test_compiled_static_is_monotonic() {
        let scores: Vec<f64> = (0..20).map(|w| compiled_static_score(&clang(0, w))).collect();
        assert!(scores.windows(2).all(|pair| pair[1] <= pair[0]));
    }

    fn sonar(measures: &[(&str, &str)]) -> CrossLanguageReport {
        CrossLanguageReport {
            components: vec![],
            measures: measures
                .iter()
                .map(|(metric, value)| Measure {
                    metric: metric.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_cross_language_divides_by_present_metrics() {
        let score = cross_language_score(&sonar(&[
            ("bugs", "0"),
            ("complexity", "4"),
            ("ncloc", "120"),
        ]))
        .unwrap();

        assert!((score - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_cross_language_all_metrics() {
        let score = cross_language_score(&sonar(&[
            ("bugs", "1"),
            ("vulnerabilities", "0"),
            ("complexity", "12"),
            ("line_coverage", "50.0"),
            ("duplicated_lines_density", "0.0"),
        ]))
        .unwrap();

        assert!((score - (0.0 + 10.0 + 0.0 + 5.0 + 10.0) / 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_cross_language_non_numeric_reads_zero() {
        let score = cross_language_score(&sonar(&[("bugs", "n/a"), ("line_coverage", "-5")])).unwrap();
        assert!((score - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_cross_language_without_scored_metrics() {
        assert_eq!(cross_language_score(&sonar(&[("ncloc", "10")])), None);
    }

    #[test]
    fn test_dynamic_memory_rubric() {
        let mut report = DynamicMemoryReport {
            status: "success".to_string(),
            ..Default::default()
        };
        assert_eq!(dynamic_memory_score(&report), 10.0);

        report
            .memory_issues
            .insert("definitely_lost".to_string(), vec!["40 bytes".to_string()]);
        assert_eq!(dynamic_memory_score(&report), 10.0);

        report
            .memory_issues
            .insert("still_reachable".to_string(), vec!["8 bytes".to_string()]);
        assert_eq!(dynamic_memory_score(&report), 5.0);

        assert_eq!(dynamic_memory_score(&DynamicMemoryReport::failure("Compilation failed!")), 0.0);
    }

    #[test]
    fn test_verification_rubric() {
        let ok = FormalVerificationReport {
            stdout: "Dafny program verifier finished with 2 verified, 0 errors".to_string(),
            stderr: String::new(),
            verification_status: "success".to_string(),
        };
        assert_eq!(verification_score(&ok), 10.0);

        let with_errors = FormalVerificationReport {
            stdout: "Dafny program verifier finished with 1 verified, 1 error".to_string(),
            ..ok.clone()
        };
        assert_eq!(verification_score(&with_errors), 0.0);

        let failed = FormalVerificationReport {
            verification_status: "failure".to_string(),
            ..ok
        };
        assert_eq!(verification_score(&failed), 0.0);
    }
}
