use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Skill;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticQuestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

/// The payload served by `/api/get_diagnostic_test/{skill}`. Its shape depends on the skill:
/// reading comes with a passage, speaking is a single prompt, the others are bare question lists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiagnosticPayload {
    Questions(Vec<DiagnosticQuestion>),
    Passage {
        passage: String,
        questions: Vec<DiagnosticQuestion>,
    },
    Prompt {
        question: String,
    },
}

impl DiagnosticPayload {
    pub fn questions(&self) -> &[DiagnosticQuestion] {
        match self {
            DiagnosticPayload::Questions(questions)
            | DiagnosticPayload::Passage { questions, .. } => questions,
            DiagnosticPayload::Prompt { .. } => &[],
        }
    }
}

/// Scoring response. The score is kept raw: anything that is not a JSON number is "unscored".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreResponse {
    #[serde(default)]
    pub score: serde_json::Value,
}

impl ScoreResponse {
    pub fn numeric_score(&self) -> Option<f64> {
        self.score.as_f64()
    }
}

/// The batch sent to `/api/save_diagnostic_results`: every skill, `null` where no score was obtained.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiagnosticResults(pub BTreeMap<Skill, Option<f64>>);

#[derive(Clone, Debug, Serialize)]
pub struct LearningPlanRequest<'a> {
    pub results: &'a DiagnosticResults,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LearningPlanResponse {
    pub plan: String,
}
