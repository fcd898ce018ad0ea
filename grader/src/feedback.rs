//! # Feedback Module
//!
//! Overall-feedback synthesis for submissions the oracle never saw. When at
//! least one essay was graded, the oracle's own summary is used instead and
//! this heuristic is skipped entirely.
//!
//! The thresholds are policy, independent of the scoring mechanics, and the
//! most likely piece to be tuned later.

/// Fixed feedback for a question with no entry in the answer map.
pub const UNANSWERED_FEEDBACK: &str = "未回答です。";

/// Four-tier qualitative summary based on the overall score ratio.
///
/// A perfect score is detected by equality rather than ratio so that an
/// all-zero-points rubric still reads as perfect (0 of 0).
pub fn overall_feedback(total_score: i64, max_score: i64) -> &'static str {
    if total_score == max_score {
        "全問正解です。素晴らしい結果です！"
    } else if total_score as f64 >= max_score as f64 * 0.8 {
        "よくできました。いくつかの間違いを確認して、さらに理解を深めましょう。"
    } else if total_score as f64 >= max_score as f64 * 0.5 {
        "基本的な理解はできていますが、復習が必要な箇所があります。"
    } else {
        "もう一度しっかり復習して、再挑戦してみましょう。"
    }
}
