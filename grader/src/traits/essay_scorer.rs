//!
//! # EssayScorer Trait
//!
//! This module defines the [`EssayScorer`] trait, the injected boundary
//! between the dispatch engine and the generative scoring oracle, along with
//! [`EssayBatchOutcome`], the value an implementation returns.
//!
//! All essay questions of one submission are scored in a single call — one
//! round-trip bounds latency and cost, and gives the oracle shared context
//! across a student's essay answers.

use async_trait::async_trait;

use crate::error::GraderError;
use crate::report::GradingResult;
use crate::types::EssayBatchSection;

/// What the oracle produced for one essay batch.
#[derive(Debug, Clone, PartialEq)]
pub struct EssayBatchOutcome {
    /// A [`GradingResult`] restricted to the essay sections that were sent:
    /// independently computed scores, feedback, and rubric matches per essay
    /// question, plus an overall feedback string for the essay subset.
    pub result: GradingResult,
    /// Total tokens consumed (input + output), for downstream cost accounting.
    pub tokens_used: u64,
}

/// A scorer for the open-ended questions the deterministic path cannot judge.
///
/// Implementations must either return a conforming result for the whole batch
/// or fail the batch entirely with [`GraderError::OracleUnavailable`] — a
/// partially scored batch would silently understate a student's score.
#[async_trait]
pub trait EssayScorer: Send + Sync {
    /// Scores every essay question in `batch` in one oracle invocation.
    async fn score_batch(
        &self,
        batch: &[EssayBatchSection],
    ) -> Result<EssayBatchOutcome, GraderError>;
}
