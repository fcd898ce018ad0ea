//! Grader Error Types
//!
//! This module defines the [`GraderError`] enum, which encapsulates all error types
//! that can occur while validating a grading request and producing a result.
//! Each variant carries a descriptive message for robust error handling and debugging.
//!
//! Validation errors are raised eagerly, before any scoring begins, with enough
//! context (section, question, violated constraint) for the caller to surface a
//! user-facing message. Oracle failures are deliberately opaque: the caller is
//! expected to report a generic retry-later message rather than internal
//! diagnostics.

use std::fmt;

/// Represents all error types that can occur in the grading engine.
#[derive(Debug)]
pub enum GraderError {
    /// The rubric fails structural validation (empty sections/questions,
    /// bad point values, insufficient choices/accepted answers/rubric elements).
    InvalidRubric(String),
    /// A submitted answer fails structural validation for its own declared type.
    InvalidAnswer(String),
    /// The generative scoring call failed or returned non-conforming output.
    /// Fatal to the entire grading request; no partial result is returned.
    OracleUnavailable(String),
}

impl fmt::Display for GraderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraderError::InvalidRubric(msg) => write!(f, "invalid rubric: {}", msg),
            GraderError::InvalidAnswer(msg) => write!(f, "invalid answer: {}", msg),
            GraderError::OracleUnavailable(msg) => write!(f, "scoring oracle unavailable: {}", msg),
        }
    }
}

impl std::error::Error for GraderError {}
