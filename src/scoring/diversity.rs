//! @ai:module:intent Lexical diversity of code: exp(mean segment entropy) times the leading singular value
//! @ai:module:layer domain
//! @ai:module:public_api diversity_score, split_segments
//! @ai:module:stateless true

use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

/// Vocabulary terms: two or more word characters.
static TERM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("term regex is valid"));

const MAX_ITERATIONS: usize = 500;
const TOLERANCE: f64 = 1e-12;

/// @ai:intent Split code on statement terminators and newlines
/// @ai:post segments are trimmed and non-empty
/// @ai:effects pure
pub fn split_segments(code: &str) -> Vec<&str> {
    code.split([';', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// @ai:intent Score the extracted code; unbounded above
/// @ai:post Some(0.0) for code with no segments, None when no segment has a vocabulary term
/// @ai:effects pure
pub fn diversity_score(code: &str) -> Option<f64> {
    let segments = split_segments(code);

    if segments.is_empty() {
        return Some(0.0);
    }

    let sigma = leading_singular_value(&segments)?;
    Some(mean_entropy(&segments).exp() * sigma)
}

/// @ai:intent Shannon entropy (natural log) of whitespace tokens, averaged over segments that have any
/// @ai:effects pure
fn mean_entropy(segments: &[&str]) -> f64 {
    let entropies: Vec<f64> = segments
        .iter()
        .filter_map(|segment| {
            let mut counts: HashMap<&str, usize> = HashMap::new();

            for token in segment
                .split_whitespace()
                .filter(|t| t.chars().count() > 1 && t.chars().all(char::is_alphanumeric))
            {
                *counts.entry(token).or_default() += 1;
            }

            let total: usize = counts.values().sum();

            if total == 0 {
                return None;
            }

            Some(
                counts
                    .values()
                    .map(|c| *c as f64 / total as f64)
                    .map(|p| -p * p.ln())
                    .sum::<f64>(),
            )
        })
        .collect();

    if entropies.is_empty() {
        0.0
    } else {
        entropies.iter().sum::<f64>() / entropies.len() as f64
    }
}

/// @ai:intent Largest singular value of the segment-by-term count matrix
/// @ai:post None when the vocabulary is empty
/// @ai:effects pure
fn leading_singular_value(segments: &[&str]) -> Option<f64> {
    let mut vocabulary: BTreeMap<String, usize> = BTreeMap::new();

    // Sparse rows: term index -> count
    let rows: Vec<HashMap<usize, f64>> = segments
        .iter()
        .map(|segment| {
            let lowered = segment.to_lowercase();
            let mut row: HashMap<usize, f64> = HashMap::new();

            for term in TERM.find_iter(&lowered) {
                let next = vocabulary.len();
                let column = *vocabulary.entry(term.as_str().to_string()).or_insert(next);
                *row.entry(column).or_default() += 1.0;
            }

            row
        })
        .collect();

    let columns = vocabulary.len();

    if columns == 0 {
        return None;
    }

    // Power iteration on XᵀX; X is non-negative so the all-ones start is not orthogonal to the top vector.
    let mut v = vec![1.0 / (columns as f64).sqrt(); columns];
    let mut sigma = 0.0;

    for _ in 0..MAX_ITERATIONS {
        let xv: Vec<f64> = rows
            .iter()
            .map(|row| row.iter().map(|(j, count)| count * v[*j]).sum())
            .collect();

        let mut next = vec![0.0; columns];

        for (row, projection) in rows.iter().zip(&xv) {
            for (j, count) in row {
                next[*j] += count * projection;
            }
        }

        let norm = next.iter().map(|x| x * x).sum::<f64>().sqrt();

        if norm == 0.0 {
            return Some(0.0);
        }

        let estimate = norm.sqrt();
        v = next.into_iter().map(|x| x / norm).collect();

        if (estimate - sigma).abs() <= TOLERANCE * estimate.max(1.0) {
            sigma = estimate;
            break;
        }

        sigma = estimate;
    }

    Some(sigma)
}
