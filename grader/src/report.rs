//! # Grading Report Module
//!
//! This module defines the data structures and response envelope for returning
//! grading results from the engine. It provides a standardized, serializable
//! format for reporting per-question results, per-section subtotals, the overall
//! score, and feedback to clients.
//!
//! ## Overview
//!
//! The main types are:
//! - [`GradingResult`]: the score tree for a submission — overall totals, ordered
//!   per-section results mirroring rubric order, and overall feedback.
//! - [`GradingResultWithUsage`]: a [`GradingResult`] extended with oracle usage
//!   metadata (token count, estimated cost, model name) for downstream metering.
//! - [`GradingReportResponse`]: a response envelope that wraps the result with
//!   `success`/`message` fields and a grading timestamp for the persistence caller.
//!
//! ## JSON Output Example
//!
//! ```json
//! {
//!   "success": true,
//!   "message": "Grading complete.",
//!   "gradedAt": "2025-05-01T10:00:00+00:00",
//!   "data": {
//!     "totalScore": 8,
//!     "maxScore": 10,
//!     "sections": [
//!       {
//!         "number": 1,
//!         "score": 8,
//!         "maxScore": 10,
//!         "questions": [
//!           {
//!             "number": "(1)",
//!             "score": 8,
//!             "maxScore": 10,
//!             "feedback": "...",
//!             "rubricMatches": [
//!               { "element": "...", "matched": true, "pointsAwarded": 8,
//!                 "pointsPossible": 10, "explanation": "..." }
//!             ]
//!           }
//!         ]
//!       }
//!     ],
//!     "overallFeedback": "...",
//!     "tokensUsed": 0,
//!     "costUsd": 0.0
//!   }
//! }
//! ```
//!
//! ## Design Notes
//!
//! - Field names serialize in camelCase because the same shape is shared with
//!   the document store and is the oracle's mandated response schema; the
//!   oracle adapter deserializes the model's output into [`GradingResult`].
//! - A result is constructed fresh per grading request and never mutated after
//!   return.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// The full score tree for one graded submission.
///
/// Sections appear in rubric declaration order, questions in section order,
/// regardless of which pass produced their scores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GradingResult {
    /// Sum of all section scores.
    pub total_score: i64,
    /// Sum of all section maxima.
    pub max_score: i64,
    pub sections: Vec<SectionResult>,
    /// The oracle's summary when essays were graded, otherwise the
    /// deterministic heuristic text.
    pub overall_feedback: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectionResult {
    pub number: i64,
    pub score: i64,
    /// Sum of the section's question maxima (the declared section points are
    /// advisory and never enter score arithmetic).
    pub max_score: i64,
    pub questions: Vec<QuestionResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub number: String,
    pub score: i64,
    pub max_score: i64,
    pub feedback: String,
    pub rubric_matches: Vec<RubricMatch>,
}

/// One rubric element's contribution to a question score, used both for
/// closed-form justification and for the essay rubric-element breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RubricMatch {
    pub element: String,
    pub matched: bool,
    pub points_awarded: i64,
    pub points_possible: i64,
    pub explanation: String,
}

/// A [`GradingResult`] extended with oracle usage metadata.
///
/// `tokens_used` and `cost_usd` are 0 for deterministic-only submissions;
/// `model` is only present when the oracle was invoked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GradingResultWithUsage {
    #[serde(flatten)]
    pub result: GradingResult,
    pub tokens_used: u64,
    pub cost_usd: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// The response envelope for grading results.
///
/// Wraps a [`GradingResultWithUsage`] with top-level `success` and `message`
/// fields and the grading timestamp the persistence layer stores alongside
/// the raw answers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingReportResponse {
    /// Indicates the grading was successful.
    success: bool,
    /// A human-readable message for the client.
    message: String,
    /// RFC3339 timestamp of when the result was assembled.
    graded_at: String,
    /// The detailed grading result.
    data: GradingResultWithUsage,
}

/// Enables ergonomic conversion from [`GradingResultWithUsage`] to [`GradingReportResponse`].
impl From<GradingResultWithUsage> for GradingReportResponse {
    fn from(result: GradingResultWithUsage) -> Self {
        GradingReportResponse {
            success: true,
            message: "Grading complete.".to_string(),
            graded_at: Utc::now().to_rfc3339(),
            data: result,
        }
    }
}
