//! # Types Module
//!
//! Core data structures shared by every component of the submission core.
//! A [`Problem`] is produced once by the adapter and treated as immutable;
//! the active problem is replaced wholesale when the question index changes.

use serde::{Deserialize, Serialize};

/// Question difficulty, ordered `Easy < Medium < Hard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Easy
    }
}

/// One sample input/output pair shown to the student.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SampleIo {
    pub input: String,
    pub output: String,
}

/// An ordered hint. Revealing it costs `deduction` points; private hints are
/// held back for instructor view and are never revealed client-side.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Hint {
    pub text: String,
    pub deduction: u32,
    pub public: bool,
}

/// One automated test case. Hidden cases participate in scoring but their
/// input and expected output are never surfaced to the student.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
    pub hidden: bool,
    pub points: u32,
}

/// Normalized exercise question consumed by the submission core.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Problem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub starter_code: String,
    pub samples: Vec<SampleIo>,
    pub constraints: Vec<String>,
    pub hints: Vec<Hint>,
    pub test_cases: Vec<TestCase>,
}

impl Problem {
    /// The stdin used for quick runs and single-shot evaluations: the first
    /// sample's input, or empty when the question has no samples.
    pub fn sample_input(&self) -> &str {
        self.samples.first().map(|s| s.input.as_str()).unwrap_or("")
    }

    /// Expected output paired with [`Self::sample_input`].
    pub fn sample_output(&self) -> &str {
        self.samples.first().map(|s| s.output.as_str()).unwrap_or("")
    }

    /// Sum of point values across all test cases.
    pub fn total_points(&self) -> u32 {
        self.test_cases.iter().map(|t| t.points).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_is_ordered() {
        assert!(Difficulty::Easy < Difficulty::Medium);
        assert!(Difficulty::Medium < Difficulty::Hard);
    }

    #[test]
    fn sample_accessors_default_to_empty() {
        let p = Problem {
            id: "q1".into(),
            title: "T".into(),
            description: "D".into(),
            difficulty: Difficulty::Easy,
            starter_code: String::new(),
            samples: vec![],
            constraints: vec![],
            hints: vec![],
            test_cases: vec![],
        };
        assert_eq!(p.sample_input(), "");
        assert_eq!(p.sample_output(), "");
        assert_eq!(p.total_points(), 0);
    }
}
