//! Error taxonomy for the submission flow.
//!
//! Policy violations are caught before any side-effecting call and are always
//! user-visible. Persistence failures never advance local ledger state. AI
//! and execution failures are absent here on purpose: both are absorbed into
//! verdicts further down the stack and never propagate as errors.

use exercise::Language;

/// A precondition against the exercise policy failed. Never sent to the
/// network; never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyViolation {
    #[error("Copy-pasting the starter code is not allowed for this exercise")]
    CopyPasteDetected,

    #[error("Attempt limit reached ({max_attempts} attempts allowed)")]
    AttemptLimitReached { max_attempts: u32 },

    #[error("Running code against the sample input is disabled for this exercise")]
    TestRunDisabled,

    #[error("Skipping questions is disabled for this exercise")]
    SkipDisabled,

    #[error("Solve the current question before moving to the next one")]
    NextRequiresSolve,

    #[error("Shuffling questions is disabled for this exercise")]
    ShuffleDisabled,

    #[error("Language '{0}' is not allowed for this exercise")]
    LanguageNotAllowed(Language),

    #[error("Another action is still in progress")]
    Busy,
}

/// Anything the submission state machine can surface to the UI.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Policy(#[from] PolicyViolation),

    /// Saving the submission failed; the local ledger was not advanced.
    #[error("Failed to save submission: {0}")]
    Persistence(String),

    /// The server rejected the submission because the attempt cap was hit.
    /// The message is passed through verbatim.
    #[error("{message}")]
    LimitReached { message: String },
}
