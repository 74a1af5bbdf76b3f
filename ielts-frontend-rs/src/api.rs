use std::rc::Rc;

use ielts_utils::{
    Skill, SkillLevels,
    analysis::{SpeakingAnalysis, TopicResponse, WritingAnalysis, WritingAnalysisRequest},
    chat::{AnalyzeRequest, AnalyzeResponse, MiniTestAnswers, MiniTestResult},
    diagnostic::{
        DiagnosticPayload, DiagnosticResults, LearningPlanRequest, LearningPlanResponse,
        ScoreResponse,
    },
    practice::{CheckResult, PracticeAnswers, PracticeKind, PracticeTest},
    progress::Progress,
};
use serde::{Serialize, de::DeserializeOwned};

use crate::answers::DiagnosticSubmission;
use crate::capture::Recording;
use crate::topic::TopicKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        recording: Recording,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FormPart>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: RequestBody,
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Request error: {0}")]
    Network(String),
    #[error("HTTP error: {0}")]
    Status(u16),
    #[error("Response parsing error: {0}")]
    Decode(String),
    #[error("Request encoding error: {0}")]
    Encode(String),
}

/// Sends one request to the IELTS API and hands back the decoded JSON body.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> Result<serde_json::Value, ApiError>;
}

impl<T: Transport> Transport for Rc<T> {
    async fn send(&self, request: ApiRequest) -> Result<serde_json::Value, ApiError> {
        (**self).send(request).await
    }
}

/// Typed calls for every endpoint the pages use.
pub struct ApiClient<T> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    async fn call<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<R, ApiError> {
        log::debug!("{method:?} {path}");
        let value = self
            .transport
            .send(ApiRequest {
                method,
                path: path.to_string(),
                body,
            })
            .await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.call(Method::Get, path, RequestBody::Empty).await
    }

    async fn post_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.call(Method::Post, path, RequestBody::Json(body)).await
    }

    pub async fn analyze(&self, input: &str) -> Result<AnalyzeResponse, ApiError> {
        self.post_json("/api/analyze", &AnalyzeRequest { input })
            .await
    }

    pub async fn check_mini_test(
        &self,
        answers: &MiniTestAnswers,
    ) -> Result<MiniTestResult, ApiError> {
        self.post_json("/api/check_mini_test", answers).await
    }

    pub async fn get_progress(&self) -> Result<Progress, ApiError> {
        self.get("/api/get_progress").await
    }

    pub async fn save_target_skills(
        &self,
        targets: &SkillLevels,
    ) -> Result<serde_json::Value, ApiError> {
        self.post_json("/api/save_target_skills", targets).await
    }

    pub async fn get_diagnostic_test(&self, skill: Skill) -> Result<DiagnosticPayload, ApiError> {
        self.get(&format!("/api/get_diagnostic_test/{skill}")).await
    }

    pub async fn evaluate_diagnostic_test(
        &self,
        skill: Skill,
        submission: DiagnosticSubmission,
    ) -> Result<ScoreResponse, ApiError> {
        let part = match submission {
            DiagnosticSubmission::Answers(answers) => FormPart::Text {
                name: "answers".to_string(),
                value: serde_json::to_string(&answers)
                    .map_err(|e| ApiError::Encode(e.to_string()))?,
            },
            DiagnosticSubmission::Audio(recording) => FormPart::File {
                name: "audio".to_string(),
                file_name: "recording.wav".to_string(),
                recording,
            },
        };
        self.call(
            Method::Post,
            &format!("/api/evaluate_diagnostic_test/{skill}"),
            RequestBody::Multipart(vec![part]),
        )
        .await
    }

    pub async fn save_diagnostic_results(
        &self,
        results: &DiagnosticResults,
    ) -> Result<serde_json::Value, ApiError> {
        self.post_json("/api/save_diagnostic_results", results)
            .await
    }

    pub async fn create_learning_plan(
        &self,
        results: &DiagnosticResults,
    ) -> Result<LearningPlanResponse, ApiError> {
        self.post_json("/api/create_learning_plan", &LearningPlanRequest { results })
            .await
    }

    pub async fn get_practice_test(&self, kind: PracticeKind) -> Result<PracticeTest, ApiError> {
        self.get(kind.test_endpoint()).await
    }

    pub async fn check_practice_answers(
        &self,
        kind: PracticeKind,
        answers: &PracticeAnswers,
    ) -> Result<CheckResult, ApiError> {
        self.post_json(kind.check_endpoint(), answers).await
    }

    pub async fn get_topic(&self, kind: TopicKind) -> Result<TopicResponse, ApiError> {
        self.get(kind.endpoint()).await
    }

    pub async fn analyze_speaking(
        &self,
        recording: Recording,
        topic: &str,
    ) -> Result<SpeakingAnalysis, ApiError> {
        let parts = vec![
            FormPart::File {
                name: "audio".to_string(),
                file_name: "recording.wav".to_string(),
                recording,
            },
            FormPart::Text {
                name: "topic".to_string(),
                value: topic.to_string(),
            },
        ];
        self.call(
            Method::Post,
            "/api/analyze_speaking",
            RequestBody::Multipart(parts),
        )
        .await
    }

    pub async fn analyze_writing(
        &self,
        request: &WritingAnalysisRequest,
    ) -> Result<WritingAnalysis, ApiError> {
        self.post_json("/api/analyze_writing", request).await
    }
}
