//! Pure policy-gate predicates used by the state machine.

/// Fraction of submitted lines matching starter lines above which a
/// submission is treated as a copy-paste of the starter code. The comparison
/// is strict: a ratio of exactly 0.70 is not a violation.
const SIMILARITY_THRESHOLD: f64 = 0.7;

/// Copy-paste detection against the unmodified starter code.
///
/// Counts the fraction of non-blank submitted lines that exactly match some
/// non-blank starter line (after trimming). Identical code trivially exceeds
/// the threshold; an empty or all-blank submission never violates.
pub fn copy_paste_violation(submitted: &str, starter: &str) -> bool {
    let starter_lines: std::collections::HashSet<&str> = starter
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let submitted_lines: Vec<&str> = submitted
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if submitted_lines.is_empty() || starter_lines.is_empty() {
        return false;
    }

    let matching = submitted_lines
        .iter()
        .filter(|line| starter_lines.contains(*line))
        .count();

    matching as f64 / submitted_lines.len() as f64 > SIMILARITY_THRESHOLD
}
