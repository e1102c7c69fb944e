use serde::Serialize;

/// Output of one code run. Produced fresh per run, never persisted directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecutionResult {
    /// Trimmed stdout of the run phase.
    pub stdout: String,
    /// Compile/runtime/transport error text, if any.
    pub error: Option<String>,
    /// Wall-clock duration of the run in milliseconds, when known.
    pub elapsed_ms: Option<f64>,
}

impl ExecutionResult {
    /// A run that produced output without errors.
    pub fn ok(stdout: impl Into<String>, elapsed_ms: Option<f64>) -> Self {
        Self {
            stdout: stdout.into().trim().to_string(),
            error: None,
            elapsed_ms,
        }
    }

    /// A run that failed before producing usable output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            error: Some(error.into()),
            elapsed_ms: None,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}
