//! # Oracle Adapter
//!
//! Implementations of the [`EssayScorer`](crate::traits::essay_scorer::EssayScorer)
//! boundary. The only production implementation talks to Google's Gemini API;
//! tests substitute their own stubs at the trait seam.

pub mod gemini;
