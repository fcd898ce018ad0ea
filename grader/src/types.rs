//! # Types Module
//!
//! Engine-internal scoring types. These are the values that flow between the
//! dispatch engine, the deterministic scorers, and the oracle adapter before
//! being assembled into the serializable report.

use util::rubric::EssayQuestion;
use util::submission::EssayAnswer;

use crate::report::RubricMatch;

/// The outcome of scoring a single question against its rubric entry.
///
/// Produced by the deterministic scorers and merged from the oracle for essay
/// questions. The question's position and maximum come from the rubric, so
/// only the awarded score, feedback text, and match breakdown live here.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOutcome {
    pub score: i64,
    pub feedback: String,
    pub rubric_matches: Vec<RubricMatch>,
}

/// One section's worth of essay questions queued for the oracle batch.
///
/// Carries the declared section points so the oracle sees the same advisory
/// totals the seller wrote, even though the engine recomputes actual maxima.
#[derive(Debug, Clone, PartialEq)]
pub struct EssayBatchSection {
    pub section_number: i64,
    pub section_points: i64,
    pub questions: Vec<EssayBatchQuestion>,
}

/// An essay question paired with the student's answer, already type-narrowed.
#[derive(Debug, Clone, PartialEq)]
pub struct EssayBatchQuestion {
    pub rubric: EssayQuestion,
    pub answer: EssayAnswer,
}
