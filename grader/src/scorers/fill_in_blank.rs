//! Scores a fill-in-the-blank question against the rubric's accepted answers.
//!
//! Both sides are normalized before comparison: surrounding whitespace is
//! always trimmed, and both sides are lower-cased when the question is not
//! case sensitive. Matching any one accepted answer earns the full points.

use util::rubric::FillInBlankQuestion;
use util::submission::FillInBlankAnswer;

use crate::report::RubricMatch;
use crate::types::ScoreOutcome;

fn normalize(s: &str, case_sensitive: bool) -> String {
    let trimmed = s.trim();
    if case_sensitive {
        trimmed.to_string()
    } else {
        trimmed.to_lowercase()
    }
}

/// Compares the student's text against every accepted answer.
///
/// Binary scoring: one normalized match earns the full question points. The
/// single rubric match entry lists all accepted answers so the student sees
/// every form that would have counted.
pub fn grade_fill_in_blank(
    rubric: &FillInBlankQuestion,
    answer: &FillInBlankAnswer,
) -> ScoreOutcome {
    let student = normalize(&answer.text, rubric.case_sensitive);
    let is_correct = rubric
        .accepted_answers
        .iter()
        .any(|accepted| normalize(accepted, rubric.case_sensitive) == student);
    let awarded = if is_correct { rubric.points } else { 0 };

    let feedback = if is_correct {
        "正解です。".to_string()
    } else {
        format!("不正解です。正解は「{}」です。", rubric.accepted_answers[0])
    };

    let explanation = if is_correct {
        "回答が正解と一致しています。".to_string()
    } else {
        format!(
            "「{}」と回答しましたが、正解は「{}」です。",
            answer.text,
            rubric.accepted_answers.join("」または「")
        )
    };

    ScoreOutcome {
        score: awarded,
        feedback,
        rubric_matches: vec![RubricMatch {
            element: format!("正解: {}", rubric.accepted_answers.join(" / ")),
            matched: is_correct,
            points_awarded: awarded,
            points_possible: rubric.points,
            explanation,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(accepted: &[&str], case_sensitive: bool) -> FillInBlankQuestion {
        FillInBlankQuestion {
            number: "(1)".to_string(),
            points: 5,
            accepted_answers: accepted.iter().map(|s| s.to_string()).collect(),
            case_sensitive,
        }
    }

    fn answer(text: &str) -> FillInBlankAnswer {
        FillInBlankAnswer { text: text.to_string() }
    }

    #[test]
    fn test_case_insensitive_match() {
        let rubric = question(&["Tokyo", "東京"], false);
        let result = grade_fill_in_blank(&rubric, &answer("tokyo"));
        assert_eq!(result.score, 5);
        assert!(result.rubric_matches[0].matched);
    }

    #[test]
    fn test_alternative_accepted_answer_matches() {
        let rubric = question(&["Tokyo", "東京"], false);
        let result = grade_fill_in_blank(&rubric, &answer("東京"));
        assert_eq!(result.score, 5);
    }

    #[test]
    fn test_whitespace_trimmed_in_both_modes() {
        let insensitive = question(&["Tokyo"], false);
        assert_eq!(grade_fill_in_blank(&insensitive, &answer("  tokyo  ")).score, 5);

        let sensitive = question(&["H2O"], true);
        assert_eq!(grade_fill_in_blank(&sensitive, &answer(" H2O ")).score, 5);
    }

    #[test]
    fn test_case_sensitive_rejects_casing_mismatch() {
        let rubric = question(&["H2O"], true);
        let result = grade_fill_in_blank(&rubric, &answer("h2o"));
        assert_eq!(result.score, 0);
        assert!(result.feedback.contains("不正解"));
        assert!(result.feedback.contains("H2O"));
    }

    #[test]
    fn test_wrong_answer_lists_all_accepted_forms() {
        let rubric = question(&["Tokyo", "東京"], false);
        let result = grade_fill_in_blank(&rubric, &answer("Kyoto"));
        assert_eq!(result.score, 0);
        let entry = &result.rubric_matches[0];
        assert_eq!(entry.element, "正解: Tokyo / 東京");
        assert!(entry.explanation.contains("「Kyoto」"));
        assert!(entry.explanation.contains("Tokyo」または「東京"));
    }

    #[test]
    fn test_empty_text_scores_zero() {
        let rubric = question(&["42"], false);
        let result = grade_fill_in_blank(&rubric, &answer(""));
        assert_eq!(result.score, 0);
    }
}
