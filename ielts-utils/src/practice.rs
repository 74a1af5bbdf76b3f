use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The multiple-choice practice tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi, from_wasm_abi))]
#[serde(rename_all = "lowercase")]
pub enum PracticeKind {
    Listening,
    Reading,
}

impl PracticeKind {
    pub fn test_endpoint(self) -> &'static str {
        match self {
            PracticeKind::Listening => "/api/get_listening_test",
            PracticeKind::Reading => "/api/get_reading_test",
        }
    }

    pub fn check_endpoint(self) -> &'static str {
        match self {
            PracticeKind::Listening => "/api/check_listening_answers",
            PracticeKind::Reading => "/api/check_reading_answers",
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuestionId {
    Number(i64),
    Text(String),
}

/// Question identifiers arrive as numbers but are keyed as strings in answer sets.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawQuestionId", into = "String")]
pub struct QuestionId(String);

impl QuestionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<RawQuestionId> for QuestionId {
    fn from(raw: RawQuestionId) -> Self {
        match raw {
            RawQuestionId::Number(n) => QuestionId(n.to_string()),
            RawQuestionId::Text(s) => QuestionId(s),
        }
    }
}

impl From<QuestionId> for String {
    fn from(id: QuestionId) -> Self {
        id.0
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        QuestionId(s.to_string())
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PracticeQuestion {
    pub id: QuestionId,
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PracticeTest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passage: Option<String>,
    pub questions: Vec<PracticeQuestion>,
}

/// Selected option per answered question, in question order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PracticeAnswers {
    pub answers: IndexMap<String, String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub score: f64,
    pub total: f64,
    pub percentage: f64,
}
