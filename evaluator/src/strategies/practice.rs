//! Practice strategy: one run against the sample input, passing iff the run
//! produced no error. Also used as the default when no evaluation mode is
//! enabled, with a different kind tag.

use crate::verdict::{EvaluationKind, Verdict};
use crate::EvaluationContext;
use runner::CodeExecutor;

pub async fn evaluate(
    ctx: &EvaluationContext<'_>,
    executor: &dyn CodeExecutor,
    kind: EvaluationKind,
) -> Verdict {
    let result = executor
        .execute(ctx.language, ctx.code, ctx.problem.sample_input())
        .await;

    let passed = result.succeeded();
    let feedback = match &result.error {
        Some(error) => error.clone(),
        None if result.stdout.is_empty() => "Ran without errors.".to_string(),
        None => result.stdout.clone(),
    };

    Verdict::new(passed, if passed { 100 } else { 0 }, feedback, kind)
}
