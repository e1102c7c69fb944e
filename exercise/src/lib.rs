//! # Exercise Model
//!
//! Normalized data model for the exercise-submission core, plus the adapter
//! that converts heterogeneous backend exercise payloads into it.
//!
//! ## Key Concepts
//! - **Problem**: one normalized question (statement, starter code, samples,
//!   hints, test cases). Immutable once produced for a question index.
//! - **ExercisePolicy**: read-only per-exercise configuration snapshot that
//!   every policy gate in the submission flow consults.
//! - **Adapter**: [`adapter::to_problems`], a pure, total conversion from the
//!   backend's raw exercise shape into an ordered, never-empty problem list.

pub mod adapter;
pub mod languages;
pub mod policy;
pub mod types;

pub use languages::Language;
pub use policy::{EvaluationModes, ExercisePolicy};
pub use types::{Difficulty, Hint, Problem, SampleIo, TestCase};
