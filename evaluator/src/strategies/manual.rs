//! Manual-review strategy: run once against the sample input for display
//! purposes and accept unconditionally — a human reviewer assigns the final
//! mark later.

use crate::verdict::{EvaluationKind, Verdict};
use crate::EvaluationContext;
use runner::CodeExecutor;

pub async fn evaluate(ctx: &EvaluationContext<'_>, executor: &dyn CodeExecutor) -> Verdict {
    let result = executor
        .execute(ctx.language, ctx.code, ctx.problem.sample_input())
        .await;

    let feedback = match &result.error {
        Some(error) => format!(
            "Submitted for manual review. Note: the sample run reported an error: {error}"
        ),
        None => "Submitted for manual review; a reviewer will assign the final mark.".to_string(),
    };

    Verdict::new(true, 0, feedback, EvaluationKind::Manual)
}
