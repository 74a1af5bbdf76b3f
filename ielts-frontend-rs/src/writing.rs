use std::fmt::Write as _;

use html_escape::encode_text;
use ielts_utils::analysis::{WritingAnalysis, WritingAnalysisRequest, WritingTask};

use crate::api::{ApiClient, ApiError, Transport};
use crate::dom::Dom;
use crate::render::display_value;
use crate::topic::{TopicKind, TopicPicker};

pub(crate) const TASK_TYPE_ID: &str = "task-type";
pub(crate) const ESSAY_ID: &str = "essay";
pub(crate) const CUSTOM_TOPIC_ID: &str = "custom-topic";
pub(crate) const RESULTS_ID: &str = "results";

pub(crate) const BLANK_ESSAY: &str = "Please write an essay before submitting.";
pub(crate) const BLANK_TOPIC: &str = "Please select a topic or enter a custom one.";
const ANALYSIS_FAILED: &str = "An error occurred while analyzing the essay. Please try again.";

pub struct WritingPage<T, D> {
    api: ApiClient<T>,
    dom: D,
    topic: TopicPicker,
}

impl<T: Transport, D: Dom> WritingPage<T, D> {
    pub fn new(transport: T, dom: D) -> Self {
        Self {
            api: ApiClient::new(transport),
            dom,
            topic: TopicPicker::new(TopicKind::Writing),
        }
    }

    pub fn current_topic(&self) -> Option<String> {
        self.topic.current()
    }

    pub async fn get_topic(&self) -> Result<String, ApiError> {
        self.topic.fetch(&self.api, &self.dom).await
    }

    /// Picks up whatever is in the custom topic field.
    pub fn custom_topic_changed(&self) {
        let value = self.dom.value(CUSTOM_TOPIC_ID).unwrap_or_default();
        self.topic.set_custom(&self.dom, &value);
    }

    /// Validates locally, then asks the server to grade the essay.
    /// Returns `None` when validation stopped the submission.
    pub async fn submit(&self) -> Option<Result<WritingAnalysis, ApiError>> {
        let essay = self.dom.value(ESSAY_ID).unwrap_or_default();
        if essay.trim().is_empty() {
            self.dom.alert(BLANK_ESSAY);
            return None;
        }
        let Some(topic) = self.topic.current().filter(|t| !t.trim().is_empty()) else {
            self.dom.alert(BLANK_TOPIC);
            return None;
        };
        let task_type = WritingTask::from_selector(
            &self.dom.value(TASK_TYPE_ID).unwrap_or_default(),
        );

        let request = WritingAnalysisRequest {
            essay,
            task_type,
            topic,
        };
        let result = self.api.analyze_writing(&request).await;
        match &result {
            Ok(analysis) => self.dom.set_html(RESULTS_ID, &analysis_html(analysis)),
            Err(e) => {
                log::error!("Error analyzing essay: {e}");
                self.dom
                    .set_html(RESULTS_ID, &format!("<p>{ANALYSIS_FAILED}</p>"));
            }
        }
        Some(result)
    }
}

fn analysis_html(analysis: &WritingAnalysis) -> String {
    let mut html = String::from("<h2>Analysis Results</h2><h3>Scores:</h3>");
    for (criterion, score) in &analysis.scores {
        let _ = write!(
            html,
            "<p>{}: {}</p>",
            encode_text(&criterion.replace('_', " ")),
            encode_text(&display_value(score))
        );
    }
    html.push_str("<h3>Improvements:</h3>");
    for (index, improvement) in analysis.improvements.iter().enumerate() {
        let _ = write!(
            html,
            "<p>{}. {}<br>Suggestion: {}</p>",
            index + 1,
            encode_text(&improvement.text),
            encode_text(&improvement.suggestion)
        );
    }
    let _ = write!(
        html,
        "<h3>Recommendations:</h3><p>{}</p><h3>Topic Relevance:</h3><p>{}</p>",
        encode_text(&display_value(&analysis.recommendations)),
        encode_text(&display_value(&analysis.topic_relevance))
    );
    html
}
