//! Scores a mark-sheet question: exact string equality between the selected
//! choice and the rubric's correct answer. No partial credit.

use util::rubric::MarkSheetQuestion;
use util::submission::MarkSheetAnswer;

use crate::report::RubricMatch;
use crate::types::ScoreOutcome;

/// Compares the selected choice against the correct answer.
///
/// A match awards the full question points; anything else awards zero. The
/// single rubric match entry names the chosen and correct options so the
/// result is self-justifying.
pub fn grade_mark_sheet(rubric: &MarkSheetQuestion, answer: &MarkSheetAnswer) -> ScoreOutcome {
    let is_correct = answer.selected == rubric.correct_answer;
    let awarded = if is_correct { rubric.points } else { 0 };

    let feedback = if is_correct {
        "正解です。".to_string()
    } else {
        format!("不正解です。正解は「{}」です。", rubric.correct_answer)
    };

    let explanation = if is_correct {
        "選択肢が正解と一致しています。".to_string()
    } else {
        format!(
            "「{}」を選択しましたが、正解は「{}」です。",
            answer.selected, rubric.correct_answer
        )
    };

    ScoreOutcome {
        score: awarded,
        feedback,
        rubric_matches: vec![RubricMatch {
            element: format!("正解: {}", rubric.correct_answer),
            matched: is_correct,
            points_awarded: awarded,
            points_possible: rubric.points,
            explanation,
        }],
    }
}
