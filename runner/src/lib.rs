//! # Execution Gateway
//!
//! Thin adapter over the remote code-execution service. It maps internal
//! language identifiers to the service's language/version pairs, performs one
//! network call per run, and normalizes whatever comes back into a uniform
//! [`ExecutionResult`].
//!
//! The adapter is deliberately total: transport errors, timeouts and
//! malformed responses all surface as `ExecutionResult::error`, never as an
//! `Err`, so callers can always render *something*. Retry policy belongs to
//! the caller; this layer never retries.

pub mod client;
pub mod languages;
pub mod result;

pub use client::{CodeExecutor, HttpCodeExecutor};
pub use languages::{ExecutionTarget, UnsupportedLanguage, execution_target};
pub use result::ExecutionResult;
