//! # Grader Library
//!
//! This crate provides the core logic for grading one submission against a
//! problem set's rubric. It validates the rubric and answers, scores the
//! closed-form question types deterministically, delegates every essay
//! question in a single batch to a generative scoring oracle, and merges both
//! result streams into one score-consistent report with overall feedback.
//!
//! ## Key Concepts
//! - **GradingJob**: the main struct representing a grading request for a
//!   single submission.
//! - **Deterministic scorers**: pure functions for `mark_sheet` and
//!   `fill_in_blank` questions (binary, no partial credit).
//! - **EssayScorer**: pluggable oracle boundary for open-ended questions;
//!   production uses Gemini, tests inject stubs.
//! - **Reports**: structured output with per-question, per-section, and
//!   overall scores plus feedback and token-usage metadata.
//!
//! ## Two-pass design
//!
//! Pass 1 walks the rubric in declaration order, scoring deterministic
//! questions immediately and emitting zero-score placeholders for essays.
//! Pass 2 runs only when essays were collected: one oracle call for the whole
//! batch, then each returned score overwrites its placeholder in position and
//! the affected section subtotals are recomputed. Deterministic questions
//! never wait on the network, and the call chain suspends at most once.

pub mod error;
pub mod feedback;
pub mod oracle;
pub mod report;
pub mod scorers;
pub mod traits;
pub mod types;
pub mod validate;

use std::collections::HashMap;

use tracing::{info, warn};
use util::config::AppConfig;
use util::rubric::{ProblemSetRubric, QuestionRubric};
use util::submission::{QuestionAnswer, answer_key};

use crate::error::GraderError;
use crate::feedback::{UNANSWERED_FEEDBACK, overall_feedback};
use crate::oracle::gemini::GeminiEssayScorer;
use crate::report::{GradingResultWithUsage, QuestionResult, SectionResult};
use crate::scorers::fill_in_blank::grade_fill_in_blank;
use crate::scorers::mark_sheet::grade_mark_sheet;
use crate::traits::essay_scorer::EssayScorer;
use crate::types::{EssayBatchQuestion, EssayBatchSection, ScoreOutcome};

/// Blended Gemini Flash rate (~$0.10/1M input, ~$0.40/1M output tokens),
/// simplified to a single per-token figure for metering.
const COST_PER_TOKEN_USD: f64 = 0.000_000_15;

/// Round a float to six decimal places, the precision stored for cost values.
#[inline]
fn round6(x: f64) -> f64 {
    (x * 1_000_000.0).round() / 1_000_000.0
}

/// Represents a grading request for a single student submission.
///
/// # Fields
/// - `rubric`: the problem set's grading contract.
/// - `answers`: composite key (`"{section}-{question}"`) to submitted answer;
///   absent keys are unanswered questions.
/// - `essay_scorer`: strategy for scoring open-ended questions.
pub struct GradingJob<'a> {
    rubric: ProblemSetRubric,
    answers: HashMap<String, QuestionAnswer>,
    essay_scorer: Box<dyn EssayScorer + Send + Sync + 'a>,
}

impl<'a> GradingJob<'a> {
    /// Create a new grading job for one submission.
    ///
    /// # Arguments
    /// * `rubric` - The rubric of the problem set being solved.
    /// * `answers` - The student's answers, keyed by composite question key.
    pub fn new(rubric: ProblemSetRubric, answers: HashMap<String, QuestionAnswer>) -> Self {
        Self {
            rubric,
            answers,
            essay_scorer: Box::new(GeminiEssayScorer),
        }
    }

    /// Set a custom essay scorer for this grading job.
    ///
    /// # Arguments
    /// * `scorer` - An implementation of the [`EssayScorer`] trait.
    pub fn with_essay_scorer<S: EssayScorer + 'a>(mut self, scorer: S) -> Self {
        self.essay_scorer = Box::new(scorer);
        self
    }

    /// Run the grading process and produce the result with usage metadata.
    ///
    /// # Returns
    /// * `Ok(GradingResultWithUsage)` on success.
    /// * `Err(GraderError)` if validation fails or the oracle is unavailable.
    ///
    /// # Steps
    /// 1. Validates the rubric and answer structures eagerly.
    /// 2. Pass 1: scores deterministic questions in rubric order, emits
    ///    placeholders for essays, accumulates the essay batch.
    /// 3. Pass 2: one oracle call for the batch (if non-empty), merges the
    ///    returned scores into their placeholders, recomputes affected
    ///    section subtotals.
    /// 4. Aggregates totals and synthesizes overall feedback.
    pub async fn grade(self) -> Result<GradingResultWithUsage, GraderError> {
        validate::validate_rubric(&self.rubric)?;
        validate::validate_answers(&self.answers)?;

        // --- Pass 1: deterministic scoring, essay collection ---
        let mut section_results: Vec<SectionResult> = Vec::with_capacity(self.rubric.sections.len());
        let mut essay_batch: Vec<EssayBatchSection> = Vec::new();

        for section in &self.rubric.sections {
            let mut question_results: Vec<QuestionResult> = Vec::new();
            let mut essay_questions: Vec<EssayBatchQuestion> = Vec::new();

            for question in &section.questions {
                let key = answer_key(section.number, question.number());

                let Some(answer) = self.answers.get(&key) else {
                    question_results.push(unanswered_result(question));
                    continue;
                };

                let outcome = match (question, answer) {
                    (QuestionRubric::MarkSheet(q), QuestionAnswer::MarkSheet(a)) => {
                        Some(grade_mark_sheet(q, a))
                    }
                    (QuestionRubric::FillInBlank(q), QuestionAnswer::FillInBlank(a)) => {
                        Some(grade_fill_in_blank(q, a))
                    }
                    (QuestionRubric::Essay(q), QuestionAnswer::Essay(a)) => {
                        essay_questions.push(EssayBatchQuestion {
                            rubric: q.clone(),
                            answer: a.clone(),
                        });
                        // Placeholder; pass 2 overwrites it in position.
                        Some(ScoreOutcome {
                            score: 0,
                            feedback: String::new(),
                            rubric_matches: vec![],
                        })
                    }
                    _ => {
                        // Malformed client payload: the answer's type does not
                        // match the rubric slot. Scored as unanswered.
                        warn!(key = %key, "answer type does not match rubric question type");
                        None
                    }
                };

                match outcome {
                    Some(outcome) => question_results.push(QuestionResult {
                        number: question.number().to_string(),
                        score: outcome.score,
                        max_score: question.points(),
                        feedback: outcome.feedback,
                        rubric_matches: outcome.rubric_matches,
                    }),
                    None => question_results.push(unanswered_result(question)),
                }
            }

            section_results.push(SectionResult {
                number: section.number,
                score: question_results.iter().map(|q| q.score).sum(),
                max_score: question_results.iter().map(|q| q.max_score).sum(),
                questions: question_results,
            });

            if !essay_questions.is_empty() {
                essay_batch.push(EssayBatchSection {
                    section_number: section.number,
                    section_points: section.points,
                    questions: essay_questions,
                });
            }
        }

        // --- Pass 2: oracle scoring for the essay batch ---
        let mut oracle_feedback: Option<String> = None;
        let mut tokens_used: u64 = 0;

        if !essay_batch.is_empty() {
            let outcome = self.essay_scorer.score_batch(&essay_batch).await?;
            tokens_used = outcome.tokens_used;
            oracle_feedback = Some(outcome.result.overall_feedback);

            for oracle_section in outcome.result.sections {
                let Some(target_section) = section_results
                    .iter_mut()
                    .find(|s| s.number == oracle_section.number)
                else {
                    warn!(section = oracle_section.number, "oracle returned unknown section");
                    continue;
                };

                for oracle_question in oracle_section.questions {
                    let Some(target_question) = target_section
                        .questions
                        .iter_mut()
                        .find(|q| q.number == oracle_question.number)
                    else {
                        warn!(
                            section = target_section.number,
                            question = %oracle_question.number,
                            "oracle returned unknown question"
                        );
                        continue;
                    };

                    target_question.score = oracle_question.score;
                    target_question.feedback = oracle_question.feedback;
                    target_question.rubric_matches = oracle_question.rubric_matches;
                }

                // A section may mix essay and deterministic questions, so the
                // subtotal must be recomputed per affected section.
                target_section.score = target_section.questions.iter().map(|q| q.score).sum();
            }
        }

        // --- Final aggregation ---
        let total_score: i64 = section_results.iter().map(|s| s.score).sum();
        let max_score: i64 = section_results.iter().map(|s| s.max_score).sum();
        let oracle_used = oracle_feedback.is_some();

        let overall = oracle_feedback
            .unwrap_or_else(|| overall_feedback(total_score, max_score).to_string());

        info!(total_score, max_score, tokens_used, oracle_used, "grading complete");

        Ok(GradingResultWithUsage {
            result: report::GradingResult {
                total_score,
                max_score,
                sections: section_results,
                overall_feedback: overall,
            },
            tokens_used,
            cost_usd: round6(tokens_used as f64 * COST_PER_TOKEN_USD),
            model: oracle_used.then(|| AppConfig::global().gemini_model.clone()),
        })
    }
}

/// The fixed zero-score result for a question with no (usable) answer.
fn unanswered_result(question: &QuestionRubric) -> QuestionResult {
    QuestionResult {
        number: question.number().to_string(),
        score: 0,
        max_score: question.points(),
        feedback: UNANSWERED_FEEDBACK.to_string(),
        rubric_matches: vec![],
    }
}
