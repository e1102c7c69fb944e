//! # Session
//!
//! The top-level submission controller for one exercise sitting: the attempt
//! ledger mirroring server-confirmed progress, the policy gates, and the
//! submission state machine that sequences copy-paste check, attempt-limit
//! gate, execution, evaluation, persistence and navigation.
//!
//! ## Key Concepts
//! - **Ledger**: client-side mirror of the progress service. Entries only
//!   advance after the remote persistence call is confirmed; there is no
//!   optimistic increment.
//! - **Policy gate**: a precondition check against the exercise policy that
//!   fires before any side-effecting call.
//! - **State machine**: `Idle → Evaluating → Persisting → Idle` for
//!   submissions (`Running` spans quick test runs), with `Blocked` entered
//!   when a gate fails. Intents arriving while a submission is in flight are
//!   rejected, never processed concurrently; dropping an in-flight future
//!   restores `Idle`.

pub mod error;
pub mod gates;
pub mod ledger;
pub mod machine;
pub mod progress;

pub use error::{PolicyViolation, SessionError};
pub use ledger::{AttemptLedger, LedgerEntry};
pub use machine::{ExerciseSession, ProgressScope, SessionState, SubmissionReport};
pub use progress::{
    HttpProgressStore, ProgressError, ProgressKey, ProgressRecord, ProgressStore, SubmissionRecord,
};
