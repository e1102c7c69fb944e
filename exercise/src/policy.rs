//! Per-exercise configuration snapshot.
//!
//! The policy arrives from the content-management collaborator and is never
//! mutated by the core; every gate in the submission flow reads it.

use crate::languages::Language;
use serde::{Deserialize, Serialize};

/// Which evaluation strategies are enabled for an exercise. Precedence when
/// several are set is fixed: AI, then automated, then manual, then practice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EvaluationModes {
    pub automated: bool,
    pub ai: bool,
    pub manual: bool,
    pub practice: bool,
}

/// Read-only per-exercise configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExercisePolicy {
    /// Whitelist of languages submissions may use. Empty means unrestricted.
    pub languages: Vec<Language>,
    pub allow_copy_paste: bool,
    pub allow_test_run: bool,
    pub allow_skip: bool,
    pub allow_next_without_solving: bool,
    pub shuffle_enabled: bool,
    pub attempt_limit_enabled: bool,
    pub max_attempts: u32,
    pub evaluation: EvaluationModes,
}

impl Default for ExercisePolicy {
    fn default() -> Self {
        Self {
            languages: Vec::new(),
            allow_copy_paste: true,
            allow_test_run: true,
            allow_skip: true,
            allow_next_without_solving: true,
            shuffle_enabled: false,
            attempt_limit_enabled: false,
            max_attempts: 0,
            evaluation: EvaluationModes::default(),
        }
    }
}

impl ExercisePolicy {
    /// Whether `language` may be used for submissions under this policy.
    pub fn permits_language(&self, language: Language) -> bool {
        self.languages.is_empty() || self.languages.contains(&language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_whitelist_permits_everything() {
        let policy = ExercisePolicy::default();
        assert!(policy.permits_language(Language::Rust));
        assert!(policy.permits_language(Language::Php));
    }

    #[test]
    fn whitelist_is_enforced() {
        let policy = ExercisePolicy {
            languages: vec![Language::Python, Language::Java],
            ..Default::default()
        };
        assert!(policy.permits_language(Language::Python));
        assert!(!policy.permits_language(Language::Rust));
    }

    #[test]
    fn deserializes_from_camel_case() {
        let policy: ExercisePolicy = serde_json::from_str(
            r#"{"allowCopyPaste":false,"attemptLimitEnabled":true,"maxAttempts":3,
                "evaluation":{"ai":true,"automated":true}}"#,
        )
        .unwrap();
        assert!(!policy.allow_copy_paste);
        assert!(policy.attempt_limit_enabled);
        assert_eq!(policy.max_attempts, 3);
        assert!(policy.evaluation.ai);
        assert!(policy.evaluation.automated);
        assert!(!policy.evaluation.manual);
    }
}
