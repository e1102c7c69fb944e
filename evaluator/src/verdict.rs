//! Normalized evaluation outcomes.

use serde::Serialize;

/// Which verdict-producing procedure ran. `Fallback` marks the deterministic
/// local verdict used when the AI collaborator fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationKind {
    Automated,
    Ai,
    Manual,
    Practice,
    Default,
    Fallback,
}

/// Outcome of a single automated test case. Hidden cases carry only their
/// index and outcome; input, expected and actual text never leave the server
/// side for those.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseOutcome {
    pub index: usize,
    pub hidden: bool,
    pub passed: bool,
    pub input: Option<String>,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub error: Option<String>,
    pub elapsed_ms: Option<f64>,
}

/// Aggregate of one automated test-suite run, tracking hidden and visible
/// cases separately.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestRunResult {
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
    pub visible_passed: usize,
    pub visible_failed: usize,
    pub hidden_passed: usize,
    pub hidden_failed: usize,
    /// Total runtime across all cases, for display only.
    pub total_elapsed_ms: f64,
    pub cases: Vec<CaseOutcome>,
}

/// Output of one evaluation. Drives both UI display and the persistence
/// payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub passed: bool,
    /// 0–100.
    pub score: u8,
    pub feedback: String,
    pub suggestions: Vec<String>,
    pub kind: EvaluationKind,
    /// Per-case detail, present for automated runs only.
    pub tests: Option<TestRunResult>,
}

impl Verdict {
    pub fn new(passed: bool, score: u8, feedback: impl Into<String>, kind: EvaluationKind) -> Self {
        Self {
            passed,
            score,
            feedback: feedback.into(),
            suggestions: Vec::new(),
            kind,
            tests: None,
        }
    }
}
