//! Structural validation of grading requests.
//!
//! Validation runs eagerly, before any scoring, and reports which
//! section/question violated which constraint so the caller can surface a
//! user-facing message (e.g. reject a publish action upstream).
//!
//! Two deliberate gaps, both advisory looseness rather than bugs:
//! - a section's declared `points` is never required to equal the sum of its
//!   question points (the engine recomputes the real maximum; a mismatch is
//!   logged and otherwise ignored);
//! - an essay question's `points` is never required to equal the sum of its
//!   rubric element points.

use std::collections::{HashMap, HashSet};

use tracing::warn;
use util::rubric::{ProblemSetRubric, QuestionRubric};
use util::submission::QuestionAnswer;

use crate::error::GraderError;

/// Validates the structure of a rubric.
///
/// # Errors
///
/// Returns [`GraderError::InvalidRubric`] naming the offending section,
/// question, and constraint.
pub fn validate_rubric(rubric: &ProblemSetRubric) -> Result<(), GraderError> {
    if rubric.sections.is_empty() {
        return Err(GraderError::InvalidRubric(
            "rubric must contain at least one section".to_string(),
        ));
    }

    let mut seen_sections: HashSet<i64> = HashSet::new();
    for section in &rubric.sections {
        if section.number < 1 {
            return Err(GraderError::InvalidRubric(format!(
                "section {}: number must be a positive integer",
                section.number
            )));
        }
        if !seen_sections.insert(section.number) {
            return Err(GraderError::InvalidRubric(format!(
                "section {}: duplicate section number",
                section.number
            )));
        }
        if section.points < 0 {
            return Err(GraderError::InvalidRubric(format!(
                "section {}: points must not be negative",
                section.number
            )));
        }
        if section.questions.is_empty() {
            return Err(GraderError::InvalidRubric(format!(
                "section {}: questions list is empty",
                section.number
            )));
        }

        if section.points != section.computed_max() {
            // Advisory only; the computed maximum wins.
            warn!(
                section = section.number,
                declared = section.points,
                computed = section.computed_max(),
                "declared section points disagree with the sum of question points"
            );
        }

        let mut seen_questions: HashSet<&str> = HashSet::new();
        for question in &section.questions {
            validate_question(section.number, question)?;
            if !seen_questions.insert(question.number()) {
                return Err(GraderError::InvalidRubric(format!(
                    "section {} question {}: duplicate question number",
                    section.number,
                    question.number()
                )));
            }
        }
    }

    Ok(())
}

fn validate_question(section: i64, question: &QuestionRubric) -> Result<(), GraderError> {
    let context = format!("section {} question {}", section, question.number());

    if question.points() < 0 {
        return Err(GraderError::InvalidRubric(format!(
            "{}: points must not be negative",
            context
        )));
    }

    match question {
        QuestionRubric::Essay(q) => {
            if q.rubric_elements.is_empty() {
                return Err(GraderError::InvalidRubric(format!(
                    "{}: essay question needs at least one rubric element",
                    context
                )));
            }
            for element in &q.rubric_elements {
                if element.element.trim().is_empty() {
                    return Err(GraderError::InvalidRubric(format!(
                        "{}: rubric element description is empty",
                        context
                    )));
                }
                if element.points < 0 {
                    return Err(GraderError::InvalidRubric(format!(
                        "{}: rubric element points must not be negative",
                        context
                    )));
                }
            }
        }
        QuestionRubric::MarkSheet(q) => {
            if q.correct_answer.is_empty() {
                return Err(GraderError::InvalidRubric(format!(
                    "{}: correct answer is empty",
                    context
                )));
            }
            if q.choices.len() < 2 {
                return Err(GraderError::InvalidRubric(format!(
                    "{}: mark sheet question needs at least 2 choices",
                    context
                )));
            }
            let distinct: HashSet<&str> = q.choices.iter().map(String::as_str).collect();
            if distinct.len() != q.choices.len() {
                return Err(GraderError::InvalidRubric(format!(
                    "{}: choices must be distinct",
                    context
                )));
            }
        }
        QuestionRubric::FillInBlank(q) => {
            if q.accepted_answers.is_empty() {
                return Err(GraderError::InvalidRubric(format!(
                    "{}: fill-in-blank question needs at least one accepted answer",
                    context
                )));
            }
            if q.accepted_answers.iter().any(|a| a.is_empty()) {
                return Err(GraderError::InvalidRubric(format!(
                    "{}: accepted answers must not be empty strings",
                    context
                )));
            }
        }
    }

    Ok(())
}

/// Validates each submitted answer against its own declared type.
///
/// Whether an answer's type matches its rubric slot is checked later, by the
/// dispatch engine, and handled leniently; this only rejects answers that are
/// malformed on their own terms.
///
/// # Errors
///
/// Returns [`GraderError::InvalidAnswer`] naming the offending answer key.
pub fn validate_answers(answers: &HashMap<String, QuestionAnswer>) -> Result<(), GraderError> {
    for (key, answer) in answers {
        match answer {
            QuestionAnswer::Essay(a) => {
                if a.text.is_none() && a.image_url.is_none() {
                    return Err(GraderError::InvalidAnswer(format!(
                        "answer {}: essay answer needs text or an image",
                        key
                    )));
                }
            }
            QuestionAnswer::MarkSheet(a) => {
                if a.selected.is_empty() {
                    return Err(GraderError::InvalidAnswer(format!(
                        "answer {}: no choice selected",
                        key
                    )));
                }
            }
            // An empty string is still an attempt at a blank.
            QuestionAnswer::FillInBlank(_) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use util::rubric::{
        EssayQuestion, FillInBlankQuestion, MarkSheetQuestion, RubricElement, SectionRubric,
    };
    use util::submission::{EssayAnswer, FillInBlankAnswer, MarkSheetAnswer};

    fn mark_sheet(number: &str, points: i64) -> QuestionRubric {
        QuestionRubric::MarkSheet(MarkSheetQuestion {
            number: number.to_string(),
            points,
            correct_answer: "A".to_string(),
            choices: vec!["A".into(), "B".into()],
        })
    }

    fn rubric_with(questions: Vec<QuestionRubric>) -> ProblemSetRubric {
        ProblemSetRubric {
            sections: vec![SectionRubric {
                number: 1,
                points: questions.iter().map(|q| q.points()).sum(),
                questions,
            }],
        }
    }

    fn assert_invalid_rubric(rubric: &ProblemSetRubric, needle: &str) {
        match validate_rubric(rubric) {
            Err(GraderError::InvalidRubric(msg)) => {
                assert!(msg.contains(needle), "expected '{}' in: {}", needle, msg)
            }
            other => panic!("expected InvalidRubric, got {:?}", other),
        }
    }

    #[test]
    fn accepts_well_formed_rubric() {
        let rubric = rubric_with(vec![
            mark_sheet("(1)", 5),
            QuestionRubric::FillInBlank(FillInBlankQuestion {
                number: "(2)".to_string(),
                points: 5,
                accepted_answers: vec!["Tokyo".into(), "東京".into()],
                case_sensitive: false,
            }),
            QuestionRubric::Essay(EssayQuestion {
                number: "(3)".to_string(),
                points: 10,
                rubric_elements: vec![RubricElement { element: "要点".into(), points: 10 }],
                model_answer: None,
            }),
        ]);
        assert!(validate_rubric(&rubric).is_ok());
    }

    #[test]
    fn rejects_empty_sections() {
        let rubric = ProblemSetRubric { sections: vec![] };
        assert_invalid_rubric(&rubric, "at least one section");
    }

    #[test]
    fn rejects_empty_question_list() {
        let rubric = ProblemSetRubric {
            sections: vec![SectionRubric { number: 1, points: 0, questions: vec![] }],
        };
        assert_invalid_rubric(&rubric, "questions list is empty");
    }

    #[test]
    fn rejects_non_positive_section_number() {
        let mut rubric = rubric_with(vec![mark_sheet("(1)", 5)]);
        rubric.sections[0].number = 0;
        assert_invalid_rubric(&rubric, "positive integer");
    }

    #[test]
    fn rejects_duplicate_section_numbers() {
        let section = rubric_with(vec![mark_sheet("(1)", 5)]).sections.remove(0);
        let rubric = ProblemSetRubric { sections: vec![section.clone(), section] };
        assert_invalid_rubric(&rubric, "duplicate section number");
    }

    #[test]
    fn rejects_duplicate_question_numbers() {
        let rubric = rubric_with(vec![mark_sheet("(1)", 5), mark_sheet("(1)", 5)]);
        assert_invalid_rubric(&rubric, "duplicate question number");
    }

    #[test]
    fn rejects_negative_points() {
        let rubric = rubric_with(vec![mark_sheet("(1)", -1)]);
        assert_invalid_rubric(&rubric, "points must not be negative");
    }

    #[test]
    fn rejects_single_choice_mark_sheet() {
        let rubric = rubric_with(vec![QuestionRubric::MarkSheet(MarkSheetQuestion {
            number: "(1)".to_string(),
            points: 5,
            correct_answer: "A".to_string(),
            choices: vec!["A".into()],
        })]);
        assert_invalid_rubric(&rubric, "at least 2 choices");
    }

    #[test]
    fn rejects_duplicate_choices() {
        let rubric = rubric_with(vec![QuestionRubric::MarkSheet(MarkSheetQuestion {
            number: "(1)".to_string(),
            points: 5,
            correct_answer: "A".to_string(),
            choices: vec!["A".into(), "A".into()],
        })]);
        assert_invalid_rubric(&rubric, "distinct");
    }

    #[test]
    fn rejects_fill_in_blank_without_accepted_answers() {
        let rubric = rubric_with(vec![QuestionRubric::FillInBlank(FillInBlankQuestion {
            number: "(1)".to_string(),
            points: 5,
            accepted_answers: vec![],
            case_sensitive: false,
        })]);
        assert_invalid_rubric(&rubric, "at least one accepted answer");
    }

    #[test]
    fn rejects_essay_without_rubric_elements() {
        let rubric = rubric_with(vec![QuestionRubric::Essay(EssayQuestion {
            number: "(1)".to_string(),
            points: 10,
            rubric_elements: vec![],
            model_answer: None,
        })]);
        assert_invalid_rubric(&rubric, "at least one rubric element");
    }

    #[test]
    fn accepts_declared_points_mismatch_as_advisory() {
        let mut rubric = rubric_with(vec![mark_sheet("(1)", 5)]);
        rubric.sections[0].points = 999;
        assert!(validate_rubric(&rubric).is_ok());
    }

    #[test]
    fn rejects_empty_essay_answer() {
        let mut answers = HashMap::new();
        answers.insert(
            "1-(1)".to_string(),
            QuestionAnswer::Essay(EssayAnswer { text: None, image_url: None }),
        );
        match validate_answers(&answers) {
            Err(GraderError::InvalidAnswer(msg)) => assert!(msg.contains("1-(1)")),
            other => panic!("expected InvalidAnswer, got {:?}", other),
        }
    }

    #[test]
    fn rejects_mark_sheet_answer_without_selection() {
        let mut answers = HashMap::new();
        answers.insert(
            "1-(1)".to_string(),
            QuestionAnswer::MarkSheet(MarkSheetAnswer { selected: String::new() }),
        );
        assert!(matches!(
            validate_answers(&answers),
            Err(GraderError::InvalidAnswer(_))
        ));
    }

    #[test]
    fn accepts_empty_fill_in_blank_text() {
        let mut answers = HashMap::new();
        answers.insert(
            "1-(1)".to_string(),
            QuestionAnswer::FillInBlank(FillInBlankAnswer { text: String::new() }),
        );
        assert!(validate_answers(&answers).is_ok());
    }
}
