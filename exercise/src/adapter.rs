//! # Exercise Question Adapter
//!
//! Converts the heterogeneous exercise/question shapes produced by the
//! content-management backend into the uniform [`Problem`] list consumed by
//! the rest of the core.
//!
//! The conversion is pure, deterministic and total: an exercise with zero
//! questions yields exactly one placeholder problem synthesized from the
//! exercise-level metadata, so downstream components never see an empty list.

use crate::types::{Difficulty, Hint, Problem, SampleIo, TestCase};
use serde::Deserialize;

/// Raw exercise payload as delivered by the backend. All fields are optional
/// or defaulted; the adapter fills gaps deterministically.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawExercise {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub questions: Vec<RawQuestion>,
}

/// Raw question payload. The backend has shipped the starter-code field under
/// several spellings over time; all are captured here and resolved in a fixed
/// priority order by [`RawQuestion::starter_code`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawQuestion {
    pub id: Option<String>,
    pub title: Option<String>,
    #[serde(alias = "questionText", alias = "question_text", alias = "statement")]
    pub description: Option<String>,
    pub difficulty: Option<Difficulty>,
    #[serde(rename = "starterCode")]
    starter_code_camel: Option<String>,
    #[serde(rename = "starter_code")]
    starter_code_snake: Option<String>,
    #[serde(rename = "startercode")]
    starter_code_flat: Option<String>,
    #[serde(rename = "starterCodee")]
    starter_code_typo: Option<String>,
    #[serde(alias = "sampleIO", alias = "sampleIo")]
    pub samples: Vec<RawSample>,
    pub constraints: Vec<String>,
    pub hints: Vec<RawHint>,
    #[serde(alias = "testCases")]
    pub test_cases: Vec<RawTestCase>,
}

impl RawQuestion {
    /// Resolve the starter code across the field variants the backend has
    /// used. Priority: `starterCode`, `starter_code`, `startercode`,
    /// `starterCodee`; first present value wins.
    pub fn starter_code(&self) -> String {
        self.starter_code_camel
            .as_ref()
            .or(self.starter_code_snake.as_ref())
            .or(self.starter_code_flat.as_ref())
            .or(self.starter_code_typo.as_ref())
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSample {
    #[serde(alias = "stdin")]
    pub input: String,
    #[serde(alias = "expectedOutput", alias = "stdout")]
    pub output: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RawHint {
    #[serde(alias = "hint")]
    pub text: String,
    #[serde(alias = "pointDeduction")]
    pub deduction: u32,
    #[serde(alias = "isPublic")]
    pub public: bool,
}

impl Default for RawHint {
    fn default() -> Self {
        Self {
            text: String::new(),
            deduction: 0,
            public: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RawTestCase {
    pub input: String,
    #[serde(alias = "expectedOutput", alias = "output")]
    pub expected_output: String,
    #[serde(alias = "isHidden")]
    pub hidden: bool,
    pub points: u32,
}

impl Default for RawTestCase {
    fn default() -> Self {
        Self {
            input: String::new(),
            expected_output: String::new(),
            hidden: false,
            points: 1,
        }
    }
}

/// Convert a raw exercise into the ordered, never-empty problem list.
pub fn to_problems(raw: &RawExercise) -> Vec<Problem> {
    if raw.questions.is_empty() {
        return vec![placeholder_problem(raw)];
    }

    raw.questions
        .iter()
        .enumerate()
        .map(|(index, q)| Problem {
            id: q
                .id
                .clone()
                .unwrap_or_else(|| format!("{}:q{}", raw.id, index + 1)),
            title: q
                .title
                .clone()
                .unwrap_or_else(|| format!("Question {}", index + 1)),
            description: q.description.clone().unwrap_or_default(),
            difficulty: q.difficulty.unwrap_or_default(),
            starter_code: q.starter_code(),
            samples: q
                .samples
                .iter()
                .map(|s| SampleIo {
                    input: s.input.clone(),
                    output: s.output.clone(),
                })
                .collect(),
            constraints: q.constraints.clone(),
            hints: q
                .hints
                .iter()
                .map(|h| Hint {
                    text: h.text.clone(),
                    deduction: h.deduction,
                    public: h.public,
                })
                .collect(),
            test_cases: q
                .test_cases
                .iter()
                .map(|t| TestCase {
                    input: t.input.clone(),
                    expected_output: t.expected_output.clone(),
                    hidden: t.hidden,
                    points: t.points,
                })
                .collect(),
        })
        .collect()
}

/// Placeholder synthesized from exercise-level metadata when the backend
/// delivers an exercise with no questions.
fn placeholder_problem(raw: &RawExercise) -> Problem {
    Problem {
        id: format!("{}:placeholder", raw.id),
        title: raw
            .title
            .clone()
            .unwrap_or_else(|| "Untitled exercise".into()),
        description: raw.description.clone().unwrap_or_default(),
        difficulty: Difficulty::default(),
        starter_code: String::new(),
        samples: Vec::new(),
        constraints: Vec::new(),
        hints: Vec::new(),
        test_cases: Vec::new(),
    }
}
