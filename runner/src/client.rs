//! HTTP client for the remote code-execution service.
//!
//! The service accepts a language/version pair plus source files and stdin,
//! and answers either with per-phase output (`compile`/`run`) or with a
//! top-level failure message. Both shapes are tolerated; everything funnels
//! into [`ExecutionResult`].

use crate::languages::execution_target;
use crate::result::ExecutionResult;
use async_trait::async_trait;
use exercise::Language;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

/// One network call per invocation, no retries. Implementations must be total:
/// every failure mode is reported through `ExecutionResult::error`.
#[async_trait]
pub trait CodeExecutor: Send + Sync {
    async fn execute(&self, language: Language, source: &str, stdin: &str) -> ExecutionResult;
}

/// Request body for the execution service.
#[derive(Serialize)]
struct ExecuteRequest<'a> {
    language: &'a str,
    version: &'a str,
    files: Vec<SourceFile<'a>>,
    stdin: &'a str,
    args: Vec<String>,
    compile_timeout: u64,
    run_timeout: u64,
}

#[derive(Serialize)]
struct SourceFile<'a> {
    name: &'a str,
    content: &'a str,
}

/// Response body. The service either returns phase outputs or a bare
/// `message` describing why the request was rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExecuteResponse {
    run: Option<PhaseOutput>,
    compile: Option<PhaseOutput>,
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PhaseOutput {
    output: Option<String>,
    stderr: Option<String>,
    code: Option<i64>,
    signal: Option<String>,
    time: Option<f64>,
}

/// Collapse the service response into an [`ExecutionResult`].
///
/// `measured_ms` is the locally measured wall time, used when the service
/// does not report its own run time.
fn normalize_response(response: ExecuteResponse, measured_ms: f64) -> ExecutionResult {
    if let Some(message) = response.message {
        return ExecutionResult::failure(message);
    }

    if let Some(compile) = &response.compile {
        if let Some(stderr) = compile.stderr.as_deref() {
            if !stderr.trim().is_empty() {
                return ExecutionResult::failure(stderr.trim().to_string());
            }
        }
    }

    let Some(run) = response.run else {
        return ExecutionResult::failure("Malformed execution response: no run output");
    };

    let stdout = run.output.unwrap_or_default().trim().to_string();
    let elapsed_ms = Some(run.time.unwrap_or(measured_ms));

    let stderr = run.stderr.unwrap_or_default();
    let error = if !stderr.trim().is_empty() {
        Some(stderr.trim().to_string())
    } else if let Some(signal) = run.signal {
        Some(format!("Process terminated by signal {signal}"))
    } else if let Some(code) = run.code.filter(|&c| c != 0) {
        Some(format!("Process exited with code {code}"))
    } else {
        None
    };

    ExecutionResult {
        stdout,
        error,
        elapsed_ms,
    }
}

/// Reqwest-backed [`CodeExecutor`].
pub struct HttpCodeExecutor {
    client: reqwest::Client,
    base_url: String,
    compile_timeout_ms: u64,
    run_timeout_ms: u64,
}

impl HttpCodeExecutor {
    pub fn new(
        base_url: impl Into<String>,
        compile_timeout_ms: u64,
        run_timeout_ms: u64,
        http_timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(http_timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
            compile_timeout_ms,
            run_timeout_ms,
        }
    }

    /// Build an executor from the global [`common::config::AppConfig`].
    pub fn from_config() -> Self {
        Self::new(
            common::config::execution_base_url(),
            common::config::execution_compile_timeout_ms(),
            common::config::execution_run_timeout_ms(),
            Duration::from_secs(common::config::execution_http_timeout_secs()),
        )
    }
}

#[async_trait]
impl CodeExecutor for HttpCodeExecutor {
    async fn execute(&self, language: Language, source: &str, stdin: &str) -> ExecutionResult {
        let target = match execution_target(language) {
            Ok(target) => target,
            Err(err) => return ExecutionResult::failure(err.to_string()),
        };

        let request = ExecuteRequest {
            language: target.language,
            version: target.version,
            files: vec![SourceFile {
                name: target.filename,
                content: source,
            }],
            stdin,
            args: Vec::new(),
            compile_timeout: self.compile_timeout_ms,
            run_timeout: self.run_timeout_ms,
        };

        debug!(language = %language, "dispatching execution request");
        let started = Instant::now();

        let response = match self
            .client
            .post(format!("{}/execute", self.base_url))
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                return ExecutionResult::failure(format!(
                    "Execution service request failed: {err}"
                ));
            }
        };

        let measured_ms = started.elapsed().as_secs_f64() * 1000.0;

        match response.json::<ExecuteResponse>().await {
            Ok(parsed) => normalize_response(parsed, measured_ms),
            Err(err) => {
                ExecutionResult::failure(format!("Invalid execution service response: {err}"))
            }
        }
    }
}
