//! # Automated Test-Suite Strategy
//!
//! Runs every test case sequentially against the execution service, with a
//! fixed 100ms pause between cases so the shared service is not hammered.
//! A case passes iff the trimmed actual output equals the trimmed expected
//! output and the execution produced no error.
//!
//! Hidden and visible cases are aggregated separately; hidden cases never
//! expose their input or expected output in the per-case report.

use crate::verdict::{CaseOutcome, EvaluationKind, TestRunResult, Verdict};
use crate::EvaluationContext;
use runner::CodeExecutor;
use std::time::Duration;
use tracing::debug;

/// Pacing between sequential test-case executions. Not a retry mechanism,
/// a rate-limiting courtesy to the shared execution service.
const CASE_PACING: Duration = Duration::from_millis(100);

/// Run the full suite and aggregate a verdict.
///
/// A question with no test cases degenerates to a single run against the
/// sample input, passing iff the run produced no error.
pub async fn evaluate(ctx: &EvaluationContext<'_>, executor: &dyn CodeExecutor) -> Verdict {
    let cases = &ctx.problem.test_cases;

    if cases.is_empty() {
        let result = executor
            .execute(ctx.language, ctx.code, ctx.problem.sample_input())
            .await;
        let passed = result.succeeded();
        let feedback = match &result.error {
            Some(error) => format!("Run failed: {error}"),
            None => "No test cases configured; run completed without errors.".to_string(),
        };
        return Verdict::new(
            passed,
            if passed { apply_penalty(100, ctx.hint_penalty) } else { 0 },
            feedback,
            EvaluationKind::Automated,
        );
    }

    let mut outcomes = Vec::with_capacity(cases.len());
    let mut earned_points = 0u32;
    let mut total_elapsed_ms = 0.0f64;
    let mut visible_passed = 0usize;
    let mut visible_failed = 0usize;
    let mut hidden_passed = 0usize;
    let mut hidden_failed = 0usize;

    for (index, case) in cases.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(CASE_PACING).await;
        }

        let result = executor.execute(ctx.language, ctx.code, &case.input).await;
        let passed =
            result.succeeded() && result.stdout.trim() == case.expected_output.trim();

        debug!(problem = %ctx.problem.id, case = index, hidden = case.hidden, passed, "test case finished");

        if passed {
            earned_points += case.points;
        }
        match (case.hidden, passed) {
            (false, true) => visible_passed += 1,
            (false, false) => visible_failed += 1,
            (true, true) => hidden_passed += 1,
            (true, false) => hidden_failed += 1,
        }
        total_elapsed_ms += result.elapsed_ms.unwrap_or(0.0);

        outcomes.push(if case.hidden {
            CaseOutcome {
                index,
                hidden: true,
                passed,
                input: None,
                expected: None,
                actual: None,
                error: None,
                elapsed_ms: result.elapsed_ms,
            }
        } else {
            CaseOutcome {
                index,
                hidden: false,
                passed,
                input: Some(case.input.clone()),
                expected: Some(case.expected_output.clone()),
                actual: Some(result.stdout.clone()),
                error: result.error.clone(),
                elapsed_ms: result.elapsed_ms,
            }
        });
    }

    let passed_count = visible_passed + hidden_passed;
    let failed_count = visible_failed + hidden_failed;
    let total = cases.len();

    let total_points = ctx.problem.total_points();
    let raw_score = if total_points == 0 {
        if failed_count == 0 { 100 } else { 0 }
    } else {
        (earned_points as f64 / total_points as f64 * 100.0).round() as u32
    };

    let mut verdict = Verdict::new(
        failed_count == 0,
        apply_penalty(raw_score, ctx.hint_penalty),
        format!("{passed_count}/{total} test cases passed"),
        EvaluationKind::Automated,
    );
    verdict.tests = Some(TestRunResult {
        passed: passed_count,
        failed: failed_count,
        total,
        visible_passed,
        visible_failed,
        hidden_passed,
        hidden_failed,
        total_elapsed_ms,
        cases: outcomes,
    });
    verdict
}

/// Deduct revealed-hint points from a raw 0–100 score, clamped at 0.
fn apply_penalty(raw: u32, penalty: u32) -> u8 {
    raw.saturating_sub(penalty).min(100) as u8
}
