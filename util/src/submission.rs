//! Submission-side data model.
//!
//! A submission is a map from composite answer key to [`QuestionAnswer`].
//! Keys absent from the map are unanswered questions. The answer variants
//! mirror the rubric's question variants and carry the same `type` tag, but
//! client payloads are not fully trusted: the engine re-checks the tag
//! against the rubric slot before narrowing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionAnswer {
    Essay(EssayAnswer),
    MarkSheet(MarkSheetAnswer),
    FillInBlank(FillInBlankAnswer),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EssayAnswer {
    /// At least one of `text` / `image_url` must be present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarkSheetAnswer {
    /// The choice the student picked.
    pub selected: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FillInBlankAnswer {
    /// May be empty; an empty string is still an attempt.
    pub text: String,
}

/// Composite key addressing one question within a submission,
/// e.g. section 2 question "(3)" -> `"2-(3)"`.
pub fn answer_key(section_number: i64, question_number: &str) -> String {
    format!("{}-{}", section_number, question_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn answer_key_format() {
        assert_eq!(answer_key(1, "(1)"), "1-(1)");
        assert_eq!(answer_key(12, "(3)"), "12-(3)");
    }

    #[test]
    fn deserializes_tagged_answer_variants() {
        let essay: QuestionAnswer =
            serde_json::from_value(json!({ "type": "essay", "text": "回答" })).unwrap();
        assert!(matches!(
            essay,
            QuestionAnswer::Essay(EssayAnswer { text: Some(_), image_url: None })
        ));

        let mark_sheet: QuestionAnswer =
            serde_json::from_value(json!({ "type": "mark_sheet", "selected": "B" })).unwrap();
        assert!(matches!(mark_sheet, QuestionAnswer::MarkSheet(_)));

        let blank: QuestionAnswer =
            serde_json::from_value(json!({ "type": "fill_in_blank", "text": "" })).unwrap();
        assert!(matches!(blank, QuestionAnswer::FillInBlank(_)));
    }

    #[test]
    fn essay_image_url_round_trips() {
        let answer = QuestionAnswer::Essay(EssayAnswer {
            text: None,
            image_url: Some("https://storage.example/answers/1.png".to_string()),
        });
        let value = serde_json::to_value(&answer).unwrap();
        assert_eq!(value["type"], "essay");
        assert_eq!(value["imageUrl"], "https://storage.example/answers/1.png");
        assert!(value.get("text").is_none());

        let back: QuestionAnswer = serde_json::from_value(value).unwrap();
        assert_eq!(back, answer);
    }
}
