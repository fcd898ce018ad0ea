//! # Gemini Essay Scorer
//!
//! This module provides the production implementation of the [`EssayScorer`]
//! trait, backed by Google's Gemini API. All essay questions of a submission
//! are packed into a single structured-generation request: the essay-only
//! sub-rubric rides in the system instructions, the student's answers in the
//! user content, and a strict response schema forces the model to answer in
//! the [`GradingResult`] shape. The adapter parses and schema-checks the
//! response and reports total token usage for downstream cost accounting.
//!
//! ## Environment
//!
//! - Requires the `GEMINI_API_KEY` environment variable (via
//!   [`util::config::AppConfig`]). `GEMINI_MODEL` overrides the model name.
//!
//! ## Failure semantics
//!
//! A transport error, a missing candidate, or output that does not conform to
//! the schema is [`GraderError::OracleUnavailable`] for the whole grading
//! request. There is no retry and no partial-credit fallback.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, error};
use util::config::AppConfig;

use crate::error::GraderError;
use crate::report::GradingResult;
use crate::traits::essay_scorer::{EssayBatchOutcome, EssayScorer};
use crate::types::EssayBatchSection;

use async_trait::async_trait;

/// Sent in place of text when the student submitted only an image. The image
/// itself is not transmitted to the oracle.
const IMAGE_PLACEHOLDER: &str = "[Image submission — see attached]";

/// Gemini-backed essay scorer: one `generateContent` call per batch.
pub struct GeminiEssayScorer;

/// Request body for the Gemini API.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

/// Structured-output settings: force JSON conforming to the grading schema.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

/// Response from the Gemini API.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ContentResponse,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u64>,
    candidates_token_count: Option<u64>,
}

/// The essay-only sub-rubric embedded in the system prompt. Declared section
/// points are passed through for context; the engine never trusts them for
/// arithmetic.
fn essay_rubric_json(batch: &[EssayBatchSection]) -> Value {
    json!({
        "sections": batch.iter().map(|section| {
            json!({
                "number": section.section_number,
                "points": section.section_points,
                "questions": section.questions.iter().map(|q| {
                    json!({
                        "number": q.rubric.number,
                        "points": q.rubric.points,
                        "type": "essay",
                        "rubricElements": q.rubric.rubric_elements,
                        "modelAnswer": q.rubric.model_answer,
                    })
                }).collect::<Vec<_>>(),
            })
        }).collect::<Vec<_>>(),
    })
}

/// Flat composite-key -> answer-text map for the user prompt.
fn answer_map(batch: &[EssayBatchSection]) -> BTreeMap<String, String> {
    let mut answers = BTreeMap::new();
    for section in batch {
        for q in &section.questions {
            let key = util::submission::answer_key(section.section_number, &q.rubric.number);
            let text = q
                .answer
                .text
                .clone()
                .unwrap_or_else(|| IMAGE_PLACEHOLDER.to_string());
            answers.insert(key, text);
        }
    }
    answers
}

fn system_prompt(rubric: &Value) -> String {
    format!(
        r#"You are an expert exam grader. Grade the student's answers strictly according to the provided rubric.

Rules:
- Award partial credit where the rubric allows it
- For essay questions, check for each rubric element's presence and evaluate logical coherence
- For math questions, verify each step and check the final answer
- Be fair but strict — do not award points for vague or tangential responses
- Provide constructive feedback for each question in Japanese
- All scores must be integers

Rubric:
{}"#,
        serde_json::to_string_pretty(rubric).unwrap_or_default()
    )
}

/// Strict response schema mirroring [`GradingResult`], in the OpenAPI subset
/// the Gemini API understands.
fn response_schema() -> Value {
    let rubric_match = json!({
        "type": "OBJECT",
        "properties": {
            "element": { "type": "STRING" },
            "matched": { "type": "BOOLEAN" },
            "pointsAwarded": { "type": "INTEGER" },
            "pointsPossible": { "type": "INTEGER" },
            "explanation": { "type": "STRING" }
        },
        "required": ["element", "matched", "pointsAwarded", "pointsPossible", "explanation"]
    });
    let question = json!({
        "type": "OBJECT",
        "properties": {
            "number": { "type": "STRING" },
            "score": { "type": "INTEGER" },
            "maxScore": { "type": "INTEGER" },
            "feedback": { "type": "STRING" },
            "rubricMatches": { "type": "ARRAY", "items": rubric_match }
        },
        "required": ["number", "score", "maxScore", "feedback", "rubricMatches"]
    });
    let section = json!({
        "type": "OBJECT",
        "properties": {
            "number": { "type": "INTEGER" },
            "score": { "type": "INTEGER" },
            "maxScore": { "type": "INTEGER" },
            "questions": { "type": "ARRAY", "items": question }
        },
        "required": ["number", "score", "maxScore", "questions"]
    });
    json!({
        "type": "OBJECT",
        "properties": {
            "totalScore": { "type": "INTEGER" },
            "maxScore": { "type": "INTEGER" },
            "sections": { "type": "ARRAY", "items": section },
            "overallFeedback": { "type": "STRING" }
        },
        "required": ["totalScore", "maxScore", "sections", "overallFeedback"]
    })
}

/// Parses the model's text output into a [`GradingResult`]. Deserialization
/// doubles as the schema check: anything that doesn't conform is rejected.
fn parse_result(text: &str) -> Result<GradingResult, GraderError> {
    serde_json::from_str::<GradingResult>(text).map_err(|e| {
        GraderError::OracleUnavailable(format!("non-conforming oracle response: {}", e))
    })
}

#[async_trait]
impl EssayScorer for GeminiEssayScorer {
    async fn score_batch(
        &self,
        batch: &[EssayBatchSection],
    ) -> Result<EssayBatchOutcome, GraderError> {
        dotenvy::dotenv().ok();

        let (api_key, model) = {
            let cfg = AppConfig::global();
            (cfg.gemini_api_key.clone(), cfg.gemini_model.clone())
        };
        if api_key.is_empty() {
            return Err(GraderError::OracleUnavailable(
                "GEMINI_API_KEY is not set".to_string(),
            ));
        }

        let rubric = essay_rubric_json(batch);
        let answers = answer_map(batch);
        let request_body = GeminiRequest {
            system_instruction: Content {
                parts: vec![Part { text: system_prompt(&rubric) }],
            },
            contents: vec![Content {
                parts: vec![Part {
                    text: format!(
                        "Student answers:\n{}",
                        serde_json::to_string_pretty(&answers).unwrap_or_default()
                    ),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        };

        let client = reqwest::Client::new();
        let response = client
            .post(format!(
                "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
                model, api_key
            ))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!("essay scoring request failed: {}", e);
                GraderError::OracleUnavailable(e.to_string())
            })?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| GraderError::OracleUnavailable(e.to_string()))?;
        if !status.is_success() {
            error!(%status, "essay scoring request rejected");
            return Err(GraderError::OracleUnavailable(format!(
                "oracle returned status {}",
                status
            )));
        }

        let response = serde_json::from_str::<GeminiResponse>(&response_text).map_err(|e| {
            GraderError::OracleUnavailable(format!("error decoding response body: {}", e))
        })?;

        let text = response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.as_str())
            .ok_or_else(|| {
                GraderError::OracleUnavailable("oracle returned no candidates".to_string())
            })?;

        let result = parse_result(text)?;

        let tokens_used = response
            .usage_metadata
            .map(|usage| {
                usage.prompt_token_count.unwrap_or(0) + usage.candidates_token_count.unwrap_or(0)
            })
            .unwrap_or(0);
        debug!(tokens_used, model = %model, "essay batch scored");

        Ok(EssayBatchOutcome { result, tokens_used })
    }
}
