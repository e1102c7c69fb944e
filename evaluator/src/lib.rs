//! # Evaluator
//!
//! This crate provides the strategy selection and verdict production for one
//! submission: given a problem, the exercise policy and the submitted code,
//! exactly one evaluation strategy runs and produces a normalized [`Verdict`].
//!
//! ## Key Concepts
//! - **Strategies**: pluggable verdict-producing procedures (AI, automated
//!   test suite, manual, practice, default).
//! - **Precedence**: strategies are selected in fixed order — AI, then
//!   automated, then manual, then practice, then default. First enabled mode
//!   wins.
//! - **Totality**: `evaluate` always resolves to a `Verdict`. AI failures are
//!   recovered through a deterministic local fallback; execution failures are
//!   meaningful input to a verdict, not errors.

pub mod prompt;
pub mod strategies;
pub mod verdict;

pub use strategies::ai::{AiClient, AiError, GeminiClient};
pub use verdict::{CaseOutcome, EvaluationKind, TestRunResult, Verdict};

use exercise::{ExercisePolicy, Language, Problem};
use runner::CodeExecutor;

/// Everything one evaluation needs, passed explicitly rather than read from
/// shared state.
pub struct EvaluationContext<'a> {
    pub problem: &'a Problem,
    pub policy: &'a ExercisePolicy,
    pub language: Language,
    pub code: &'a str,
    /// Points already forfeited by revealed hints, deducted from automated
    /// scores.
    pub hint_penalty: u32,
}

/// Run exactly one evaluation strategy for the submission and produce a
/// verdict. Never fails; see the crate docs for the precedence order.
pub async fn evaluate(
    ctx: &EvaluationContext<'_>,
    executor: &dyn CodeExecutor,
    ai: &dyn AiClient,
) -> Verdict {
    let modes = &ctx.policy.evaluation;

    if modes.ai {
        strategies::ai::evaluate(ctx, executor, ai).await
    } else if modes.automated {
        strategies::automated::evaluate(ctx, executor).await
    } else if modes.manual {
        strategies::manual::evaluate(ctx, executor).await
    } else if modes.practice {
        strategies::practice::evaluate(ctx, executor, EvaluationKind::Practice).await
    } else {
        strategies::practice::evaluate(ctx, executor, EvaluationKind::Default).await
    }
}
