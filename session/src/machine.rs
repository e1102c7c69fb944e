//! # Submission State Machine
//!
//! Top-level controller for one exercise sitting. It owns the navigation
//! cursor, orchestrates ledger updates, and sequences every submission as
//! `gate checks → evaluation → persistence → navigation`.
//!
//! All collaborators are trait objects so the whole flow is testable against
//! in-memory fakes. Intents arriving while a submission is in flight are
//! rejected with [`PolicyViolation::Busy`]; this is what prevents a
//! double-click from double-incrementing attempts. Dropping an in-flight
//! future (a caller timing out or discarding a stale intent) restores `Idle`,
//! so a cancelled intent never wedges the machine.

use crate::error::{PolicyViolation, SessionError};
use crate::gates;
use crate::ledger::{AttemptLedger, LedgerEntry};
use crate::progress::{ProgressError, ProgressKey, ProgressStore, SubmissionRecord};
use evaluator::{AiClient, EvaluationContext, Verdict};
use exercise::{ExercisePolicy, Hint, Language, Problem};
use rand::Rng;
use runner::{CodeExecutor, ExecutionResult};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Pause before auto-advancing to the next question after a passing
/// submission, so the user sees the verdict land.
const AUTO_ADVANCE_DELAY: Duration = Duration::from_millis(800);

/// Course/exercise coordinates shared by every progress call in a sitting.
#[derive(Debug, Clone)]
pub struct ProgressScope {
    pub course_id: String,
    pub exercise_id: String,
    pub category: String,
    pub subcategory: String,
}

impl ProgressScope {
    fn key_for(&self, question_id: &str) -> ProgressKey {
        ProgressKey {
            course_id: self.course_id.clone(),
            exercise_id: self.exercise_id.clone(),
            question_id: question_id.to_string(),
            category: self.category.clone(),
            subcategory: self.subcategory.clone(),
        }
    }
}

/// Submission flow states. `Running` spans a quick test run, `Evaluating`
/// spans execution and evaluation during a submit, `Persisting` spans the
/// progress write. `Blocked` is entered when a policy gate fails; it does
/// not reject further intents — the user may correct course and retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Evaluating,
    Persisting,
    Blocked,
}

/// What one confirmed submission produced.
#[derive(Debug)]
pub struct SubmissionReport {
    pub verdict: Verdict,
    /// Ledger entry after the confirmed persistence round-trip.
    pub entry: LedgerEntry,
    /// Whether the cursor auto-advanced to the next question.
    pub advanced: bool,
}

/// One student's sitting of one exercise.
pub struct ExerciseSession {
    problems: Vec<Problem>,
    policy: ExercisePolicy,
    scope: ProgressScope,
    cursor: usize,
    state: SessionState,
    ledger: AttemptLedger,
    /// Revealed public hint indexes per question id. Entries are forgotten
    /// when the user navigates away from the question.
    revealed_hints: HashMap<String, BTreeSet<usize>>,
    executor: Arc<dyn CodeExecutor>,
    ai: Arc<dyn AiClient>,
    store: Arc<dyn ProgressStore>,
}

/// Restores `Idle` when an in-flight intent is dropped before completion.
/// Completed flights record their terminal state through [`Self::finish`].
struct FlightGuard<'a> {
    session: &'a mut ExerciseSession,
    done: bool,
}

impl<'a> FlightGuard<'a> {
    fn new(session: &'a mut ExerciseSession) -> Self {
        Self {
            session,
            done: false,
        }
    }

    fn finish(&mut self, state: SessionState) {
        self.session.state = state;
        self.done = true;
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.session.state = SessionState::Idle;
        }
    }
}

impl std::ops::Deref for FlightGuard<'_> {
    type Target = ExerciseSession;

    fn deref(&self) -> &ExerciseSession {
        self.session
    }
}

impl std::ops::DerefMut for FlightGuard<'_> {
    fn deref_mut(&mut self) -> &mut ExerciseSession {
        self.session
    }
}

impl ExerciseSession {
    /// `problems` comes from the question adapter and is therefore never
    /// empty.
    ///
    /// # Panics
    /// Panics if `problems` is empty.
    pub fn new(
        problems: Vec<Problem>,
        policy: ExercisePolicy,
        scope: ProgressScope,
        executor: Arc<dyn CodeExecutor>,
        ai: Arc<dyn AiClient>,
        store: Arc<dyn ProgressStore>,
    ) -> Self {
        assert!(!problems.is_empty(), "problem list must be non-empty");
        Self {
            problems,
            policy,
            scope,
            cursor: 0,
            state: SessionState::Idle,
            ledger: AttemptLedger::new(),
            revealed_hints: HashMap::new(),
            executor,
            ai,
            store,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> &Problem {
        &self.problems[self.cursor]
    }

    pub fn policy(&self) -> &ExercisePolicy {
        &self.policy
    }

    /// Ledger snapshot for the current question.
    pub fn current_entry(&self) -> LedgerEntry {
        self.ledger.entry(&self.current().id)
    }

    fn is_busy(&self) -> bool {
        matches!(
            self.state,
            SessionState::Running | SessionState::Evaluating | SessionState::Persisting
        )
    }

    fn guard_idle(&self) -> Result<(), PolicyViolation> {
        if self.is_busy() {
            Err(PolicyViolation::Busy)
        } else {
            Ok(())
        }
    }

    fn block(&mut self, violation: PolicyViolation) -> PolicyViolation {
        self.state = SessionState::Blocked;
        violation
    }

    /// Drop the revealed-hint set of the question being left.
    fn forget_revealed_hints(&mut self) {
        self.revealed_hints.remove(&self.problems[self.cursor].id);
    }

    /// Fetch (or return the cached) ledger entry for the current question.
    /// Fails open on transport errors; see [`AttemptLedger::load`].
    pub async fn load_progress(&mut self) -> LedgerEntry {
        let key = self.scope.key_for(&self.current().id);
        self.ledger.load(&key, self.store.as_ref()).await
    }

    /// Quick run against the sample input, bypassing evaluation entirely.
    pub async fn run(
        &mut self,
        language: Language,
        code: &str,
    ) -> Result<ExecutionResult, PolicyViolation> {
        self.guard_idle()?;
        if !self.policy.allow_test_run {
            return Err(self.block(PolicyViolation::TestRunDisabled));
        }
        if !self.policy.permits_language(language) {
            return Err(self.block(PolicyViolation::LanguageNotAllowed(language)));
        }

        let stdin = self.current().sample_input().to_string();
        let executor = self.executor.clone();

        let mut this = FlightGuard::new(self);
        this.state = SessionState::Running;
        let result = executor.execute(language, code, &stdin).await;
        this.finish(SessionState::Idle);
        Ok(result)
    }

    /// Full submission: gates, evaluation, persistence, ledger update and
    /// optional auto-advance.
    pub async fn submit(
        &mut self,
        language: Language,
        code: &str,
    ) -> Result<SubmissionReport, SessionError> {
        self.guard_idle()?;
        if !self.policy.permits_language(language) {
            return Err(self.block(PolicyViolation::LanguageNotAllowed(language)).into());
        }
        if !self.policy.allow_copy_paste
            && gates::copy_paste_violation(code, &self.current().starter_code)
        {
            return Err(self.block(PolicyViolation::CopyPasteDetected).into());
        }

        let question_id = self.current().id.clone();
        let key = self.scope.key_for(&question_id);
        let store = self.store.clone();

        let mut this = FlightGuard::new(self);
        this.state = SessionState::Evaluating;
        this.ledger.load(&key, store.as_ref()).await;
        if !this.ledger.can_submit(&question_id, &this.policy) {
            let max_attempts = this.policy.max_attempts;
            this.finish(SessionState::Blocked);
            return Err(PolicyViolation::AttemptLimitReached { max_attempts }.into());
        }

        let hint_penalty = this.hint_penalty(&question_id);
        let verdict = {
            let session = &*this;
            let ctx = EvaluationContext {
                problem: &session.problems[session.cursor],
                policy: &session.policy,
                language,
                code,
                hint_penalty,
            };
            evaluator::evaluate(&ctx, session.executor.as_ref(), session.ai.as_ref()).await
        };

        this.state = SessionState::Persisting;
        let status = if verdict.passed { "solved" } else { "attempted" };
        let record = SubmissionRecord {
            course_id: this.scope.course_id.clone(),
            exercise_id: this.scope.exercise_id.clone(),
            question_id: question_id.clone(),
            code: code.to_string(),
            score: verdict.score,
            status: status.to_string(),
            category: this.scope.category.clone(),
            subcategory: this.scope.subcategory.clone(),
            language: Some(language),
            attempt_limit_enabled: this.policy.attempt_limit_enabled,
            max_attempts: this.policy.max_attempts,
            evaluation_details: serde_json::to_value(&verdict).unwrap_or_default(),
        };

        match store.submit(&record).await {
            Ok(()) => {
                // A slow response may land after the user navigated away;
                // only apply side effects if this is still the same question.
                if this.current().id == question_id {
                    this.ledger.confirm_submission(&question_id, verdict.passed);
                }
                info!(question = %question_id, passed = verdict.passed, score = verdict.score, "submission persisted");

                let mut advanced = false;
                if verdict.passed && this.cursor + 1 < this.problems.len() {
                    tokio::time::sleep(AUTO_ADVANCE_DELAY).await;
                    if this.current().id == question_id {
                        this.revealed_hints.remove(&question_id);
                        this.cursor += 1;
                        advanced = true;
                    }
                }

                let entry = this.ledger.entry(&question_id);
                this.finish(SessionState::Idle);
                Ok(SubmissionReport {
                    verdict,
                    entry,
                    advanced,
                })
            }
            Err(ProgressError::LimitReached { message }) => {
                warn!(question = %question_id, "server rejected submission: attempt limit");
                this.finish(SessionState::Blocked);
                Err(SessionError::LimitReached { message })
            }
            Err(err) => {
                warn!(question = %question_id, error = %err, "submission persistence failed");
                this.finish(SessionState::Idle);
                Err(SessionError::Persistence(err.to_string()))
            }
        }
    }

    /// Skip the current question: persist a "skipped" record, then advance.
    pub async fn skip(&mut self) -> Result<usize, SessionError> {
        self.guard_idle()?;
        if !self.policy.allow_skip {
            return Err(self.block(PolicyViolation::SkipDisabled).into());
        }

        let question_id = self.current().id.clone();
        let record = SubmissionRecord {
            course_id: self.scope.course_id.clone(),
            exercise_id: self.scope.exercise_id.clone(),
            question_id: question_id.clone(),
            code: String::new(),
            score: 0,
            status: "skipped".to_string(),
            category: self.scope.category.clone(),
            subcategory: self.scope.subcategory.clone(),
            language: None,
            attempt_limit_enabled: self.policy.attempt_limit_enabled,
            max_attempts: self.policy.max_attempts,
            evaluation_details: serde_json::Value::Null,
        };
        let store = self.store.clone();

        let mut this = FlightGuard::new(self);
        this.state = SessionState::Persisting;
        match store.submit(&record).await {
            Ok(()) => {
                this.ledger.mark_skipped(&question_id);
                if this.cursor + 1 < this.problems.len() {
                    this.revealed_hints.remove(&question_id);
                    this.cursor += 1;
                }
                let cursor = this.cursor;
                this.finish(SessionState::Idle);
                Ok(cursor)
            }
            Err(ProgressError::LimitReached { message }) => {
                this.finish(SessionState::Blocked);
                Err(SessionError::LimitReached { message })
            }
            Err(err) => {
                this.finish(SessionState::Idle);
                Err(SessionError::Persistence(err.to_string()))
            }
        }
    }

    /// Advance to the next question, gated on the current one being dealt
    /// with (solved or skipped) unless the policy allows free navigation.
    pub fn next(&mut self) -> Result<usize, PolicyViolation> {
        self.guard_idle()?;
        let entry = self.current_entry();
        if !self.policy.allow_next_without_solving && !entry.solved && !entry.skipped {
            return Err(self.block(PolicyViolation::NextRequiresSolve));
        }
        if self.cursor + 1 < self.problems.len() {
            self.forget_revealed_hints();
            self.cursor += 1;
        }
        self.state = SessionState::Idle;
        Ok(self.cursor)
    }

    /// Go back one question. Never policy-gated.
    pub fn prev(&mut self) -> Result<usize, PolicyViolation> {
        self.guard_idle()?;
        if self.cursor > 0 {
            self.forget_revealed_hints();
            self.cursor -= 1;
        }
        self.state = SessionState::Idle;
        Ok(self.cursor)
    }

    /// Jump to a uniformly random question. Honors `shuffle_enabled`.
    pub fn shuffle(&mut self) -> Result<usize, PolicyViolation> {
        self.guard_idle()?;
        if !self.policy.shuffle_enabled {
            return Err(self.block(PolicyViolation::ShuffleDisabled));
        }
        self.forget_revealed_hints();
        self.cursor = rand::rng().random_range(0..self.problems.len());
        self.state = SessionState::Idle;
        Ok(self.cursor)
    }

    /// Reveal a public hint on the current question, recording its deduction
    /// for subsequent automated scores on this visit. Returns `None` for
    /// unknown indexes and for private hints.
    pub fn reveal_hint(&mut self, index: usize) -> Option<&Hint> {
        let question_id = self.current().id.clone();
        let is_public = self
            .problems[self.cursor]
            .hints
            .get(index)
            .is_some_and(|hint| hint.public);
        if !is_public {
            return None;
        }

        self.revealed_hints
            .entry(question_id)
            .or_default()
            .insert(index);
        self.problems[self.cursor].hints.get(index)
    }

    /// Total points forfeited by revealed hints on a question.
    pub fn hint_penalty(&self, question_id: &str) -> u32 {
        let Some(revealed) = self.revealed_hints.get(question_id) else {
            return 0;
        };
        let problem = match self.problems.iter().find(|p| p.id == question_id) {
            Some(problem) => problem,
            None => return 0,
        };
        revealed
            .iter()
            .filter_map(|&index| problem.hints.get(index))
            .map(|hint| hint.deduction)
            .sum()
    }
}
