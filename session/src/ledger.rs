//! # Attempt/Progress Ledger
//!
//! Client-side mirror of the remote submission history. The ledger is the
//! sole mutator of its entries, and it only mutates them on instruction from
//! the state machine after a persistence call is confirmed — attempt counts
//! never run ahead of the server.

use crate::progress::{ProgressKey, ProgressStore};
use exercise::ExercisePolicy;
use std::collections::HashMap;
use tracing::warn;

/// Per-question attempt state. `attempts_used` is monotonic and
/// server-authoritative; it advances only after a confirmed persistence
/// round-trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerEntry {
    pub attempts_used: u32,
    pub solved: bool,
    pub skipped: bool,
}

/// In-memory ledger for one exercise sitting.
#[derive(Default)]
pub struct AttemptLedger {
    entries: HashMap<String, LedgerEntry>,
}

impl AttemptLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the entry for a question, fetching from the progress service on
    /// first access. Repeated loads before any submission return the cached
    /// entry unchanged.
    ///
    /// Reads fail open: a transport failure yields a zero-attempts, unsolved
    /// entry rather than blocking the UI.
    pub async fn load(&mut self, key: &ProgressKey, store: &dyn ProgressStore) -> LedgerEntry {
        if let Some(entry) = self.entries.get(&key.question_id) {
            return entry.clone();
        }

        let entry = match store.fetch(key).await {
            Ok(record) => LedgerEntry {
                attempts_used: record.attempts,
                solved: record.status == "solved",
                skipped: record.status == "skipped",
            },
            Err(err) => {
                warn!(question = %key.question_id, error = %err, "progress fetch failed, assuming fresh entry");
                LedgerEntry::default()
            }
        };

        self.entries
            .entry(key.question_id.clone())
            .or_insert(entry)
            .clone()
    }

    /// Snapshot of the entry for a question; default if never loaded.
    pub fn entry(&self, question_id: &str) -> LedgerEntry {
        self.entries.get(question_id).cloned().unwrap_or_default()
    }

    /// Policy gate: false iff the attempt limit is enabled and exhausted.
    pub fn can_submit(&self, question_id: &str, policy: &ExercisePolicy) -> bool {
        if !policy.attempt_limit_enabled {
            return true;
        }
        self.entry(question_id).attempts_used < policy.max_attempts
    }

    /// Record a confirmed persistence round-trip: the attempt counts and the
    /// solved flag latches once set.
    pub fn confirm_submission(&mut self, question_id: &str, solved: bool) {
        let entry = self.entries.entry(question_id.to_string()).or_default();
        entry.attempts_used += 1;
        entry.solved = entry.solved || solved;
    }

    /// Mark a question skipped after its skip record persisted.
    pub fn mark_skipped(&mut self, question_id: &str) {
        let entry = self.entries.entry(question_id.to_string()).or_default();
        entry.skipped = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{ProgressError, ProgressRecord, SubmissionRecord};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingStore {
        fetches: AtomicUsize,
        response: Option<ProgressRecord>,
    }

    impl CountingStore {
        fn returning(record: ProgressRecord) -> Self {
            Self {
                fetches: AtomicUsize::new(0),
                response: Some(record),
            }
        }

        fn failing() -> Self {
            Self {
                fetches: AtomicUsize::new(0),
                response: None,
            }
        }
    }

    #[async_trait]
    impl ProgressStore for CountingStore {
        async fn fetch(&self, _key: &ProgressKey) -> Result<ProgressRecord, ProgressError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Some(record) => Ok(record.clone()),
                None => Err(ProgressError::Transport("connection refused".into())),
            }
        }

        async fn submit(&self, _record: &SubmissionRecord) -> Result<(), ProgressError> {
            Ok(())
        }
    }

    fn key(question_id: &str) -> ProgressKey {
        ProgressKey {
            course_id: "c1".into(),
            exercise_id: "e1".into(),
            question_id: question_id.into(),
            category: "basics".into(),
            subcategory: "loops".into(),
        }
    }

    #[tokio::test]
    async fn load_is_idempotent_before_submissions() {
        let store = CountingStore::returning(ProgressRecord {
            attempts: 2,
            status: "solved".into(),
        });
        let mut ledger = AttemptLedger::new();

        let first = ledger.load(&key("q1"), &store).await;
        let second = ledger.load(&key("q1"), &store).await;

        assert_eq!(first, second);
        assert_eq!(first.attempts_used, 2);
        assert!(first.solved);
        assert_eq!(store.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fetch_failure_fails_open() {
        let store = CountingStore::failing();
        let mut ledger = AttemptLedger::new();

        let entry = ledger.load(&key("q1"), &store).await;

        assert_eq!(entry, LedgerEntry::default());
    }

    #[test]
    fn attempt_limit_gate() {
        let mut ledger = AttemptLedger::new();
        let policy = ExercisePolicy {
            attempt_limit_enabled: true,
            max_attempts: 2,
            ..Default::default()
        };

        assert!(ledger.can_submit("q1", &policy));
        ledger.confirm_submission("q1", false);
        assert!(ledger.can_submit("q1", &policy));
        ledger.confirm_submission("q1", false);
        assert!(!ledger.can_submit("q1", &policy));

        // Disabled limit never gates.
        let open_policy = ExercisePolicy::default();
        assert!(ledger.can_submit("q1", &open_policy));
    }

    #[test]
    fn solved_flag_latches() {
        let mut ledger = AttemptLedger::new();
        ledger.confirm_submission("q1", true);
        ledger.confirm_submission("q1", false);
        let entry = ledger.entry("q1");
        assert!(entry.solved);
        assert_eq!(entry.attempts_used, 2);
    }
}
