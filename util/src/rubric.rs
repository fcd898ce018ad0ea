//! Rubric-side data model.
//!
//! A [`ProblemSetRubric`] is the grading contract for one problem set: an
//! ordered list of sections, each holding an ordered list of questions. The
//! question variants are discriminated by the `type` field in the stored JSON
//! (`essay`, `mark_sheet`, `fill_in_blank`), matching the document-store
//! format produced by the seller-side editor.
//!
//! These types are pure shapes. Structural validation lives in the grader
//! crate, next to the engine that enforces it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProblemSetRubric {
    pub sections: Vec<SectionRubric>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectionRubric {
    /// Positive, unique within the rubric. Not necessarily contiguous.
    pub number: i64,
    /// Declared section total. Advisory; the engine recomputes the actual
    /// maximum from the question points.
    pub points: i64,
    pub questions: Vec<QuestionRubric>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionRubric {
    Essay(EssayQuestion),
    MarkSheet(MarkSheetQuestion),
    FillInBlank(FillInBlankQuestion),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EssayQuestion {
    /// Section-scoped label, e.g. "(1)".
    pub number: String,
    pub points: i64,
    pub rubric_elements: Vec<RubricElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_answer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarkSheetQuestion {
    pub number: String,
    pub points: i64,
    pub correct_answer: String,
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FillInBlankQuestion {
    pub number: String,
    pub points: i64,
    /// Any one of these counts as correct.
    pub accepted_answers: Vec<String>,
    pub case_sensitive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RubricElement {
    pub element: String,
    pub points: i64,
}

impl QuestionRubric {
    /// The section-scoped question label.
    pub fn number(&self) -> &str {
        match self {
            QuestionRubric::Essay(q) => &q.number,
            QuestionRubric::MarkSheet(q) => &q.number,
            QuestionRubric::FillInBlank(q) => &q.number,
        }
    }

    /// Maximum points awardable for this question.
    pub fn points(&self) -> i64 {
        match self {
            QuestionRubric::Essay(q) => q.points,
            QuestionRubric::MarkSheet(q) => q.points,
            QuestionRubric::FillInBlank(q) => q.points,
        }
    }
}

impl SectionRubric {
    /// Sum of the question point values. This, not the declared `points`,
    /// is the authoritative section maximum.
    pub fn computed_max(&self) -> i64 {
        self.questions.iter().map(|q| q.points()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_tagged_question_variants() {
        let raw = json!({
            "sections": [
                {
                    "number": 1,
                    "points": 20,
                    "questions": [
                        {
                            "type": "mark_sheet",
                            "number": "(1)",
                            "points": 5,
                            "correctAnswer": "B",
                            "choices": ["A", "B", "C", "D"]
                        },
                        {
                            "type": "fill_in_blank",
                            "number": "(2)",
                            "points": 5,
                            "acceptedAnswers": ["Tokyo", "東京"],
                            "caseSensitive": false
                        },
                        {
                            "type": "essay",
                            "number": "(3)",
                            "points": 10,
                            "rubricElements": [
                                { "element": "原因に言及している", "points": 5 },
                                { "element": "結果を説明している", "points": 5 }
                            ],
                            "modelAnswer": "..."
                        }
                    ]
                }
            ]
        });

        let rubric: ProblemSetRubric = serde_json::from_value(raw).unwrap();
        let section = &rubric.sections[0];
        assert_eq!(section.questions.len(), 3);
        assert!(matches!(section.questions[0], QuestionRubric::MarkSheet(_)));
        assert!(matches!(section.questions[1], QuestionRubric::FillInBlank(_)));
        assert!(matches!(section.questions[2], QuestionRubric::Essay(_)));
        assert_eq!(section.questions[2].number(), "(3)");
        assert_eq!(section.questions[2].points(), 10);
    }

    #[test]
    fn serializes_camel_case_with_type_tag() {
        let question = QuestionRubric::MarkSheet(MarkSheetQuestion {
            number: "(1)".to_string(),
            points: 5,
            correct_answer: "B".to_string(),
            choices: vec!["A".into(), "B".into()],
        });
        let value = serde_json::to_value(&question).unwrap();
        assert_eq!(value["type"], "mark_sheet");
        assert_eq!(value["correctAnswer"], "B");
    }

    #[test]
    fn model_answer_is_optional() {
        let raw = json!({
            "type": "essay",
            "number": "(1)",
            "points": 10,
            "rubricElements": [{ "element": "keyword", "points": 10 }]
        });
        let question: QuestionRubric = serde_json::from_value(raw).unwrap();
        let QuestionRubric::Essay(essay) = question else {
            panic!("expected essay variant");
        };
        assert_eq!(essay.model_answer, None);
        let value = serde_json::to_value(&essay).unwrap();
        assert!(value.get("modelAnswer").is_none());
    }

    #[test]
    fn computed_max_sums_question_points() {
        let section = SectionRubric {
            number: 1,
            points: 100, // advisory, disagrees with the questions on purpose
            questions: vec![
                QuestionRubric::MarkSheet(MarkSheetQuestion {
                    number: "(1)".to_string(),
                    points: 5,
                    correct_answer: "A".to_string(),
                    choices: vec!["A".into(), "B".into()],
                }),
                QuestionRubric::FillInBlank(FillInBlankQuestion {
                    number: "(2)".to_string(),
                    points: 7,
                    accepted_answers: vec!["x".into()],
                    case_sensitive: true,
                }),
            ],
        };
        assert_eq!(section.computed_max(), 12);
    }
}
