//! # AI Evaluation Strategy
//!
//! Sends the submission to a Large Language Model (Google's Gemini API) and
//! parses a JSON verdict out of its free-text reply. The model is allowed to
//! wrap the JSON in prose; the first balanced `{...}` block is extracted.
//!
//! On any service or parse failure the strategy falls back to a deterministic
//! local verdict: exact-string-match of the actual output against the sample
//! output decides `passed`, and the score is fixed at 0 (it is not computable
//! without the AI). The fallback never fails — the user always receives a
//! verdict.

use crate::prompt::build_evaluation_prompt;
use crate::verdict::{EvaluationKind, Verdict};
use crate::EvaluationContext;
use async_trait::async_trait;
use runner::{CodeExecutor, ExecutionResult};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Errors from the AI collaborator. Callers recover via the fallback verdict;
/// these never reach the end user raw.
#[derive(Debug)]
pub enum AiError {
    /// Request never produced a usable response (network, HTTP error, timeout).
    Transport(String),
    /// Response arrived but did not have the expected shape.
    Malformed(String),
}

impl std::fmt::Display for AiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiError::Transport(msg) => write!(f, "AI service request failed: {msg}"),
            AiError::Malformed(msg) => write!(f, "AI service response malformed: {msg}"),
        }
    }
}

impl std::error::Error for AiError {}

/// A client that turns a prompt into free text.
#[async_trait]
pub trait AiClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}

/// Request body for the Gemini API.
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    thinking_config: ThinkingConfig,
}

#[derive(Serialize)]
struct ThinkingConfig {
    /// Set to 0 to disable thinking for faster requests.
    thinking_budget: u32,
}

/// Response from the Gemini API.
#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ContentResponse,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: String,
}

/// Reqwest-backed [`AiClient`] for the Gemini API.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Build a client from the global [`common::config::AppConfig`].
    pub fn from_config() -> Self {
        Self::new(
            common::config::ai_base_url(),
            common::config::ai_model(),
            common::config::ai_api_key(),
        )
    }
}

#[async_trait]
impl AiClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let request_body = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                thinking_config: ThinkingConfig { thinking_budget: 0 },
            }),
        };

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent?key={}",
                self.base_url, self.model, self.api_key
            ))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AiError::Transport(format!("HTTP {}", response.status())));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;
        let response = serde_json::from_str::<GeminiResponse>(&response_text).map_err(|e| {
            AiError::Malformed(format!(
                "error decoding response body: {}. Full response: {}",
                e, response_text
            ))
        })?;

        response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.clone())
            .ok_or_else(|| AiError::Malformed("response carried no candidates".into()))
    }
}

/// Verdict object the model is instructed to emit.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AiVerdictPayload {
    score: f64,
    feedback: String,
    suggestions: Vec<String>,
    is_passed: bool,
    detailed_analysis: String,
}

/// Failure to locate or decode the verdict JSON inside the model's reply.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ParseError(pub String);

/// Extract the first balanced `{...}` block from free text, tolerating
/// surrounding prose and braces inside JSON strings.
pub(crate) fn extract_json_block(text: &str) -> Result<&str, ParseError> {
    let start = text
        .find('{')
        .ok_or_else(|| ParseError("no JSON object found".into()))?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    Err(ParseError("unbalanced JSON object".into()))
}

fn parse_verdict(text: &str) -> Result<AiVerdictPayload, ParseError> {
    let block = extract_json_block(text)?;
    serde_json::from_str(block).map_err(|e| ParseError(e.to_string()))
}

/// Run the AI strategy: one sample execution, one model call, and the
/// deterministic fallback if anything on the AI side goes wrong.
pub async fn evaluate(
    ctx: &EvaluationContext<'_>,
    executor: &dyn CodeExecutor,
    ai: &dyn AiClient,
) -> Verdict {
    let execution = executor
        .execute(ctx.language, ctx.code, ctx.problem.sample_input())
        .await;

    let prompt = build_evaluation_prompt(ctx, &execution);

    match ai.generate(&prompt).await {
        Ok(text) => match parse_verdict(&text) {
            Ok(payload) => {
                let feedback = if payload.feedback.is_empty() {
                    payload.detailed_analysis.clone()
                } else {
                    payload.feedback.clone()
                };
                let mut verdict = Verdict::new(
                    payload.is_passed,
                    payload.score.clamp(0.0, 100.0).round() as u8,
                    feedback,
                    EvaluationKind::Ai,
                );
                verdict.suggestions = payload.suggestions;
                verdict
            }
            Err(err) => {
                warn!(problem = %ctx.problem.id, error = %err.0, "AI verdict unparseable, using fallback");
                fallback_verdict(ctx, &execution)
            }
        },
        Err(err) => {
            warn!(problem = %ctx.problem.id, error = %err, "AI evaluation failed, using fallback");
            fallback_verdict(ctx, &execution)
        }
    }
}

/// Deterministic last line of defense: exact-match of the actual output
/// against the sample output. Score is 0 here — it is not computable without
/// the AI.
fn fallback_verdict(ctx: &EvaluationContext<'_>, execution: &ExecutionResult) -> Verdict {
    let passed = execution.succeeded() && execution.stdout == ctx.problem.sample_output().trim();
    Verdict::new(
        passed,
        0,
        "AI evaluation was unavailable; your output was checked against the sample output instead.",
        EvaluationKind::Fallback,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{problem_with_cases, ScriptedAi, ScriptedExecutor};
    use exercise::{EvaluationModes, ExercisePolicy, Language};
    use runner::ExecutionResult;

    fn ai_policy() -> ExercisePolicy {
        ExercisePolicy {
            evaluation: EvaluationModes {
                ai: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn extracts_json_from_surrounding_prose() {
        let text = "Sure! Here is my verdict:\n{\"score\": 80, \"isPassed\": true}\nHope that helps.";
        assert_eq!(
            extract_json_block(text).unwrap(),
            "{\"score\": 80, \"isPassed\": true}"
        );
    }

    #[test]
    fn extracts_nested_objects_and_braces_in_strings() {
        let text = r#"prefix {"a": {"b": 1}, "note": "brace } inside"} suffix"#;
        assert_eq!(
            extract_json_block(text).unwrap(),
            r#"{"a": {"b": 1}, "note": "brace } inside"}"#
        );
    }

    #[test]
    fn missing_or_unbalanced_json_is_an_error() {
        assert!(extract_json_block("no json here").is_err());
        assert!(extract_json_block("{\"open\": true").is_err());
    }

    #[tokio::test]
    async fn parsed_ai_verdict_is_used() {
        let problem = problem_with_cases(vec![]);
        let policy = ai_policy();
        let ctx = EvaluationContext {
            problem: &problem,
            policy: &policy,
            language: Language::Python,
            code: "print(3)",
            hint_penalty: 0,
        };
        let executor = ScriptedExecutor::new(&[("1 2", ExecutionResult::ok("3", None))]);
        let ai = ScriptedAi::replying(
            r#"Verdict follows: {"score": 76.4, "feedback": "close", "suggestions": ["use sum()"], "isPassed": false, "detailedAnalysis": "..."} done"#,
        );

        let verdict = evaluate(&ctx, &executor, &ai).await;

        assert_eq!(verdict.kind, EvaluationKind::Ai);
        assert!(!verdict.passed);
        assert_eq!(verdict.score, 76);
        assert_eq!(verdict.feedback, "close");
        assert_eq!(verdict.suggestions, vec!["use sum()".to_string()]);
    }

    #[tokio::test]
    async fn service_failure_falls_back_to_sample_match() {
        let problem = problem_with_cases(vec![]);
        let policy = ai_policy();
        let ctx = EvaluationContext {
            problem: &problem,
            policy: &policy,
            language: Language::Python,
            code: "print(3)",
            hint_penalty: 0,
        };
        // Sample input "1 2" -> "3", which matches the sample output.
        let executor = ScriptedExecutor::new(&[("1 2", ExecutionResult::ok("3", None))]);
        let ai = ScriptedAi::failing();

        let verdict = evaluate(&ctx, &executor, &ai).await;

        assert_eq!(verdict.kind, EvaluationKind::Fallback);
        assert!(verdict.passed);
        assert_eq!(verdict.score, 0);
    }

    #[tokio::test]
    async fn unparseable_reply_falls_back_and_mismatched_output_fails() {
        let problem = problem_with_cases(vec![]);
        let policy = ai_policy();
        let ctx = EvaluationContext {
            problem: &problem,
            policy: &policy,
            language: Language::Python,
            code: "print(4)",
            hint_penalty: 0,
        };
        let executor = ScriptedExecutor::new(&[("1 2", ExecutionResult::ok("4", None))]);
        let ai = ScriptedAi::replying("I cannot judge this submission.");

        let verdict = evaluate(&ctx, &executor, &ai).await;

        assert_eq!(verdict.kind, EvaluationKind::Fallback);
        assert!(!verdict.passed);
        assert_eq!(verdict.score, 0);
    }

    // Hits the live Gemini API; needs AI_API_KEY set. Run with
    // `cargo test -- --ignored`.
    #[tokio::test]
    #[ignore]
    async fn live_gemini_round_trip() {
        let client = GeminiClient::from_config();
        let reply = client
            .generate(
                "Respond with a single JSON object and nothing else: {\"score\": 100, \"feedback\": \"ok\", \"suggestions\": [], \"isPassed\": true, \"detailedAnalysis\": \"\"}",
            )
            .await
            .expect("live Gemini call");
        assert!(parse_verdict(&reply).is_ok());
    }

    #[tokio::test]
    async fn execution_error_fails_the_fallback() {
        let problem = problem_with_cases(vec![]);
        let policy = ai_policy();
        let ctx = EvaluationContext {
            problem: &problem,
            policy: &policy,
            language: Language::Python,
            code: "x",
            hint_penalty: 0,
        };
        let executor = ScriptedExecutor::new(&[(
            "1 2",
            ExecutionResult::failure("NameError: name 'x' is not defined"),
        )]);
        let ai = ScriptedAi::failing();

        let verdict = evaluate(&ctx, &executor, &ai).await;

        assert_eq!(verdict.kind, EvaluationKind::Fallback);
        assert!(!verdict.passed);
    }
}
