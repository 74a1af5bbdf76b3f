use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub input: &'a str,
}

/// The tutor's reply. Besides the text it may attach a listening clip or a short quiz.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AnalyzeResponse {
    pub result: String,
    #[serde(default)]
    pub mini_test: Option<MiniTest>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub listening_text: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MiniTest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub questions: Vec<MiniTestQuestion>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MiniTestQuestion {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MiniTestAnswers {
    pub answers: Vec<Option<String>>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MiniTestResult {
    pub score: f64,
    pub total: f64,
}
