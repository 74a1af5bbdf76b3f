use std::fmt::Write as _;

use html_escape::encode_text;
use ielts_utils::analysis::SpeakingAnalysis;

use crate::api::{ApiClient, ApiError, Transport};
use crate::capture::{AudioSource, CaptureControls, CaptureError, MediaCapture};
use crate::dom::Dom;
use crate::render::display_value;
use crate::topic::{TopicKind, TopicPicker};
use crate::writing::BLANK_TOPIC;

pub(crate) const CUSTOM_TOPIC_ID: &str = "custom-topic";
pub(crate) const SUBMIT_RECORDING_ID: &str = "submit-recording";
pub(crate) const RESULTS_ID: &str = "results";

const ANALYSIS_FAILED: &str = "An error occurred while analyzing the speech. Please try again.";

/// The speaking practice page: pick a topic, record an answer, get it graded.
pub struct SpeakingPage<T, D, A> {
    api: ApiClient<T>,
    dom: D,
    topic: TopicPicker,
    capture: MediaCapture<A>,
}

impl<T: Transport, D: Dom, A: AudioSource> SpeakingPage<T, D, A> {
    pub fn new(transport: T, dom: D, audio: A) -> Self {
        let controls = CaptureControls {
            start: "start-recording",
            stop: "stop-recording",
            preview: "audio-playback",
            submit: Some(SUBMIT_RECORDING_ID),
            status: None,
        };
        Self {
            api: ApiClient::new(transport),
            dom,
            topic: TopicPicker::new(TopicKind::Speaking),
            capture: MediaCapture::new(audio, controls),
        }
    }

    pub fn current_topic(&self) -> Option<String> {
        self.topic.current()
    }

    pub fn capture(&self) -> &MediaCapture<A> {
        &self.capture
    }

    pub async fn get_topic(&self) -> Result<String, ApiError> {
        self.topic.fetch(&self.api, &self.dom).await
    }

    pub fn custom_topic_changed(&self) {
        let value = self.dom.value(CUSTOM_TOPIC_ID).unwrap_or_default();
        self.topic.set_custom(&self.dom, &value);
    }

    pub async fn start_recording(&self) -> Result<(), CaptureError> {
        self.capture.start_recording(&self.dom).await
    }

    pub async fn stop_recording(&self) -> Result<(), CaptureError> {
        self.capture.stop_recording(&self.dom).await.map(|_| ())
    }

    /// Returns `None` when there is no topic yet.
    pub async fn submit_recording(&self) -> Option<Result<SpeakingAnalysis, ApiError>> {
        let Some(topic) = self.topic.current().filter(|t| !t.trim().is_empty()) else {
            self.dom.alert(BLANK_TOPIC);
            return None;
        };
        let recording = self.capture.recording().unwrap_or_default();
        if recording.is_empty() {
            log::warn!("Submitting speaking analysis without any recorded audio");
        }

        let result = self.api.analyze_speaking(recording, &topic).await;
        match &result {
            Ok(analysis) => self.dom.set_html(RESULTS_ID, &analysis_html(analysis)),
            Err(e) => {
                log::error!("Error analyzing speech: {e}");
                self.dom
                    .set_html(RESULTS_ID, &format!("<p>{ANALYSIS_FAILED}</p>"));
            }
        }
        Some(result)
    }
}

fn analysis_html(analysis: &SpeakingAnalysis) -> String {
    let mut html = String::from("<h2>Analysis Results</h2><h3>Scores:</h3>");
    for (criterion, score) in &analysis.scores {
        let _ = write!(
            html,
            "<p>{}: {}</p>",
            encode_text(criterion),
            encode_text(&display_value(score))
        );
    }
    html.push_str("<h3>Feedback:</h3>");
    for (index, item) in analysis.feedback.iter().enumerate() {
        let _ = write!(
            html,
            "<p>{}. {}: {}</p>",
            index + 1,
            encode_text(&item.aspect),
            encode_text(&item.comment)
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
