//! The adaptive-learning page: tutoring chat, progress charts and target levels.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::str::FromStr;

use html_escape::{encode_double_quoted_attribute, encode_text};
use ielts_utils::{
    Skill, SkillLevels,
    chat::{AnalyzeResponse, MiniTest, MiniTestResult},
    progress::Progress,
};

use crate::answers::{collect_mini_test, mini_test_field_name};
use crate::api::{ApiClient, ApiError, Transport};
use crate::charts::{self, ChartSurface, LINE_CHART_ID, RADAR_CHART_ID};
use crate::dom::Dom;
use crate::render::radio_options;

pub(crate) const CHAT_MESSAGES_ID: &str = "chat-messages";
pub(crate) const USER_INPUT_ID: &str = "user-input";

const DIAGNOSTICS_PATH: &str = "/diagnostics";
const CHAT_FAILED: &str = "Sorry, an error occurred. Please try again.";
const TARGETS_SAVED: &str = "Target skills saved successfully!";
const TARGETS_FAILED: &str = "Failed to save target skills. Please try again.";

pub(crate) fn target_field_id(skill: Skill) -> String {
    format!("target-{skill}")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdaptiveLearningAction {
    SendMessage,
    SaveTargets,
    TakeDiagnostic,
    CheckMiniTest,
}

impl AdaptiveLearningAction {
    pub const ALL: [AdaptiveLearningAction; 4] = [
        AdaptiveLearningAction::SendMessage,
        AdaptiveLearningAction::SaveTargets,
        AdaptiveLearningAction::TakeDiagnostic,
        AdaptiveLearningAction::CheckMiniTest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AdaptiveLearningAction::SendMessage => "send-message",
            AdaptiveLearningAction::SaveTargets => "save-targets",
            AdaptiveLearningAction::TakeDiagnostic => "diagnostic",
            AdaptiveLearningAction::CheckMiniTest => "check-mini-test",
        }
    }

    /// Id of the button in the page template that triggers this action, if it has one.
    /// The mini test button is rendered into the chat and only carries `data-action`.
    pub fn control_id(self) -> Option<&'static str> {
        match self {
            AdaptiveLearningAction::SendMessage => Some("submit-button"),
            AdaptiveLearningAction::SaveTargets => Some("save-targets"),
            AdaptiveLearningAction::TakeDiagnostic => Some("diagnostic-button"),
            AdaptiveLearningAction::CheckMiniTest => None,
        }
    }
}

impl FromStr for AdaptiveLearningAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| format!("unknown adaptive learning action: {s}"))
    }
}

pub struct AdaptiveLearningPage<T, D, C> {
    api: ApiClient<T>,
    dom: D,
    charts: C,
    mini_test: RefCell<Option<MiniTest>>,
}

impl<T: Transport, D: Dom, C: ChartSurface> AdaptiveLearningPage<T, D, C> {
    pub fn new(transport: T, dom: D, charts: C) -> Self {
        Self {
            api: ApiClient::new(transport),
            dom,
            charts,
            mini_test: RefCell::new(None),
        }
    }

    fn add_message(&self, sender: &str, message: &str) {
        self.append_chat(&format!(
            r#"<div class="chat-message"><strong>{}:</strong> {}</div>"#,
            encode_text(sender),
            encode_text(message)
        ));
    }

    fn append_chat(&self, html: &str) {
        self.dom.append_html(CHAT_MESSAGES_ID, html);
        self.dom.scroll_to_bottom(CHAT_MESSAGES_ID);
    }

    /// Sends the text in the chat input to the tutor. Blank input sends nothing and returns `None`.
    pub async fn send_message(&self) -> Option<Result<AnalyzeResponse, ApiError>> {
        let message = self.dom.value(USER_INPUT_ID).unwrap_or_default();
        let message = message.trim();
        if message.is_empty() {
            return None;
        }
        self.add_message("You", message);
        self.dom.set_value(USER_INPUT_ID, "");

        let result = self.api.analyze(message).await;
        match &result {
            Ok(response) => {
                self.add_message("Assistant", &response.result);
                if let Some(audio_url) = response.audio_url.as_deref() {
                    self.show_listening_clip(audio_url, response.listening_text.as_deref());
                }
                if let Some(mini_test) = &response.mini_test {
                    self.show_mini_test(mini_test);
                }
                let _ = self.update_progress().await;
            }
            Err(e) => {
                log::error!("Error sending chat message: {e}");
                self.add_message("Assistant", CHAT_FAILED);
            }
        }
        Some(result)
    }

    fn show_listening_clip(&self, audio_url: &str, transcript: Option<&str>) {
        let mut html = format!(
            r#"<div class="chat-message listening-clip"><audio controls src="{}"></audio>"#,
            encode_double_quoted_attribute(audio_url)
        );
        if let Some(transcript) = transcript {
            let _ = write!(
                html,
                "<details><summary>Transcript</summary><p>{}</p></details>",
                encode_text(transcript)
            );
        }
        html.push_str("</div>");
        self.append_chat(&html);
    }

    fn show_mini_test(&self, mini_test: &MiniTest) {
        let mut html = String::from(r#"<div class="chat-message mini-test">"#);
        if !mini_test.text.is_empty() {
            let _ = write!(html, "<p>{}</p>", encode_text(&mini_test.text));
        }
        for (index, question) in mini_test.questions.iter().enumerate() {
            let _ = write!(html, "<p>{}. {}</p>", index + 1, encode_text(&question.question));
            html.push_str(&radio_options(
                &mini_test_field_name(index),
                &question.options,
            ));
        }
        let _ = write!(
            html,
            r#"<button data-action="{}">Check Answers</button></div>"#,
            AdaptiveLearningAction::CheckMiniTest.as_str()
        );
        self.append_chat(&html);
        self.mini_test.replace(Some(mini_test.clone()));
    }

    /// Returns `None` when no mini test has been handed out.
    pub async fn check_mini_test(&self) -> Option<Result<MiniTestResult, ApiError>> {
        let answers = match self.mini_test.borrow().as_ref() {
            Some(test) => collect_mini_test(&self.dom, test),
            None => {
                log::warn!("No mini test to check");
                return None;
            }
        };

        let result = self.api.check_mini_test(&answers).await;
        match &result {
            Ok(score) => self.add_message(
                "Assistant",
                &format!("Mini test score: {}/{}", score.score, score.total),
            ),
            Err(e) => {
                log::error!("Error checking mini test: {e}");
                self.add_message("Assistant", CHAT_FAILED);
            }
        }
        Some(result)
    }

    /// Re-fetches progress and refreshes both charts, the recommendation and the target fields.
    pub async fn update_progress(&self) -> Result<Progress, ApiError> {
        let progress = self.api.get_progress().await.inspect_err(|e| {
            log::error!("Error updating progress: {e}");
        })?;

        self.charts.draw(
            RADAR_CHART_ID,
            &charts::radar_chart(&progress.current, &progress.targets),
        );
        self.charts
            .draw(LINE_CHART_ID, &charts::line_chart(&progress.history));
        if let Some(recommendation) = progress.recommendation.as_deref() {
            self.add_message("Assistant", recommendation);
        }
        for (skill, target) in progress.targets.iter() {
            let value = target.map(|level| level.to_string()).unwrap_or_default();
            self.dom.set_value(&target_field_id(skill), &value);
        }
        Ok(progress)
    }

    fn read_targets(&self) -> SkillLevels {
        let mut targets = SkillLevels::default();
        for skill in Skill::ORDER {
            let level = self
                .dom
                .value(&target_field_id(skill))
                .and_then(|value| value.trim().parse::<f64>().ok())
                .filter(|level| level.is_finite());
            targets.set(skill, level);
        }
        targets
    }

    pub async fn save_target_skills(&self) -> Result<(), ApiError> {
        let targets = self.read_targets();
        match self.api.save_target_skills(&targets).await {
            Ok(_) => {
                self.dom.alert(TARGETS_SAVED);
                let _ = self.update_progress().await;
                Ok(())
            }
            Err(e) => {
                log::error!("Error saving target skills: {e}");
                self.dom.alert(TARGETS_FAILED);
                Err(e)
            }
        }
    }

    pub fn take_diagnostic(&self) {
        self.dom.navigate(DIAGNOSTICS_PATH);
    }

    pub async fn perform(&self, action: AdaptiveLearningAction) {
        match action {
            AdaptiveLearningAction::SendMessage => {
                let _ = self.send_message().await;
            }
            AdaptiveLearningAction::SaveTargets => {
                let _ = self.save_target_skills().await;
            }
            AdaptiveLearningAction::TakeDiagnostic => self.take_diagnostic(),
            AdaptiveLearningAction::CheckMiniTest => {
                let _ = self.check_mini_test().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RequestBody;
    use crate::test_support::{FakeCharts, FakeDom, MockTransport};
    use futures::executor::block_on;
    use serde_json::json;
    use std::rc::Rc;

    type Page = AdaptiveLearningPage<Rc<MockTransport>, Rc<FakeDom>, Rc<FakeCharts>>;

    fn page() -> (Page, Rc<MockTransport>, Rc<FakeDom>, Rc<FakeCharts>) {
        let transport = Rc::new(MockTransport::default());
        let dom = Rc::new(FakeDom::default());
        let charts = Rc::new(FakeCharts::default());
        (
            AdaptiveLearningPage::new(transport.clone(), dom.clone(), charts.clone()),
            transport,
            dom,
            charts,
        )
    }

    fn progress(targets: serde_json::Value) -> serde_json::Value {
        json!({
            "current": {"listening": 6, "reading": 5.5, "writing": 5, "speaking": 6},
            "targets": targets,
            "history": [{"date": "2024-05-01", "listening": 6, "reading": 5.5}],
            "recommendation": null
        })
    }

    #[test]
    fn test_saved_targets_come_back_in_fields() {
        let (page, transport, dom, _charts) = page();
        dom.set_value("target-listening", "6.5");
        dom.set_value("target-reading", "7.0");
        dom.set_value("target-writing", "6");
        dom.set_value("target-speaking", "6.5");
        transport.respond("/api/save_target_skills", json!({"status": "success"}));
        transport.respond(
            "/api/get_progress",
            progress(json!({"listening": 6.5, "reading": 7.0, "writing": 6.0, "speaking": 6.5})),
        );

        block_on(page.save_target_skills()).unwrap();

        let save = transport
            .requests()
            .into_iter()
            .find(|r| r.path == "/api/save_target_skills")
            .unwrap();
        assert_eq!(
            save.body,
            RequestBody::Json(json!({"listening": 6.5, "reading": 7.0, "writing": 6.0, "speaking": 6.5}))
        );
        assert_eq!(dom.alerts(), vec![TARGETS_SAVED.to_string()]);
        assert_eq!(transport.last_request().unwrap().path, "/api/get_progress");
        assert_eq!(dom.value("target-listening").as_deref(), Some("6.5"));
        assert_eq!(dom.value("target-reading").as_deref(), Some("7"));
        assert_eq!(dom.value("target-writing").as_deref(), Some("6"));
        assert_eq!(dom.value("target-speaking").as_deref(), Some("6.5"));
    }

    #[test]
    fn test_invalid_target_is_sent_as_null() {
        let (page, transport, dom, _charts) = page();
        dom.set_value("target-listening", "abc");
        dom.set_value("target-reading", "7");
        transport.respond("/api/save_target_skills", json!({}));
        transport.respond("/api/get_progress", progress(json!({})));

        block_on(page.save_target_skills()).unwrap();
        let save = transport
            .requests()
            .into_iter()
            .find(|r| r.path == "/api/save_target_skills")
            .unwrap();
        assert_eq!(
            save.body,
            RequestBody::Json(json!({"listening": null, "reading": 7.0, "writing": null, "speaking": null}))
        );
    }

    #[test]
    fn test_failed_save_alerts_and_skips_refresh() {
        let (page, transport, dom, charts) = page();
        transport.fail("/api/save_target_skills", ApiError::Status(500));

        assert!(block_on(page.save_target_skills()).is_err());
        assert_eq!(dom.alerts(), vec![TARGETS_FAILED.to_string()]);
        assert_eq!(transport.requests().len(), 1);
        assert!(charts.draws().is_empty());
    }

    #[test]
    fn test_progress_draws_both_charts_each_time() {
        let (page, transport, dom, charts) = page();
        let mut data = progress(json!({"listening": 7.0, "reading": 7.0, "writing": 7.0, "speaking": 7.0}));
        data["recommendation"] = json!("Focus on writing.");
        transport.respond("/api/get_progress", data);

        block_on(page.update_progress()).unwrap();
        block_on(page.update_progress()).unwrap();

        let draws = charts.draws();
        let canvases: Vec<&str> = draws.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(canvases, ["radarChart", "lineChart", "radarChart", "lineChart"]);
        assert_eq!(
            draws[0].1["data"]["datasets"][1]["data"],
            json!([7.0, 7.0, 7.0, 7.0])
        );
        let chat = dom.html(CHAT_MESSAGES_ID).unwrap();
        assert_eq!(
            chat.matches("<strong>Assistant:</strong> Focus on writing.").count(),
            2
        );
    }

    #[test]
    fn test_chat_round_trip() {
        let (page, transport, dom, _charts) = page();
        transport.respond("/api/analyze", json!({"result": "Try a reading test."}));
        transport.respond("/api/get_progress", progress(json!({})));
        dom.set_value(USER_INPUT_ID, "  How do I improve?  ");

        block_on(page.send_message()).unwrap().unwrap();

        let analyze = transport
            .requests()
            .into_iter()
            .find(|r| r.path == "/api/analyze")
            .unwrap();
        assert_eq!(analyze.body, RequestBody::Json(json!({"input": "How do I improve?"})));
        assert_eq!(dom.value(USER_INPUT_ID).as_deref(), Some(""));
        let chat = dom.html(CHAT_MESSAGES_ID).unwrap();
        let you_at = chat.find("<strong>You:</strong> How do I improve?").unwrap();
        let reply_at = chat.find("<strong>Assistant:</strong> Try a reading test.").unwrap();
        assert!(you_at < reply_at);
        assert_eq!(transport.last_request().unwrap().path, "/api/get_progress");
        assert!(dom.scrolled(CHAT_MESSAGES_ID));
    }

    #[test]
    fn test_blank_message_is_not_sent() {
        let (page, transport, dom, _charts) = page();
        dom.set_value(USER_INPUT_ID, "   ");
        assert!(block_on(page.send_message()).is_none());
        assert!(transport.requests().is_empty());
        assert_eq!(dom.html(CHAT_MESSAGES_ID), None);
    }

    #[test]
    fn test_failed_chat_shows_apology() {
        let (page, transport, dom, _charts) = page();
        transport.fail("/api/analyze", ApiError::Network("offline".to_string()));
        dom.set_value(USER_INPUT_ID, "Hello");

        assert!(block_on(page.send_message()).unwrap().is_err());
        assert!(
            dom.html(CHAT_MESSAGES_ID)
                .unwrap()
                .ends_with("<strong>Assistant:</strong> Sorry, an error occurred. Please try again.</div>")
        );
    }

    #[test]
    fn test_mini_test_and_listening_clip() {
        let (page, transport, dom, _charts) = page();
        transport.respond(
            "/api/analyze",
            json!({
                "result": "Here is a short quiz.",
                "audio_url": "/audio/clip.mp3",
                "listening_text": "The museum opens at nine.",
                "mini_test": {
                    "text": "Answer the questions.",
                    "questions": [
                        {"question": "When does it open?", "options": ["8", "9"]},
                        {"question": "What opens?", "options": ["Museum", "Library"]}
                    ]
                }
            }),
        );
        transport.respond("/api/get_progress", progress(json!({})));
        transport.respond("/api/check_mini_test", json!({"score": 1, "total": 2}));
        dom.set_value(USER_INPUT_ID, "Give me listening practice");

        block_on(page.send_message()).unwrap().unwrap();
        let chat = dom.html(CHAT_MESSAGES_ID).unwrap();
        assert!(chat.contains(r#"<audio controls src="/audio/clip.mp3"></audio>"#));
        assert!(chat.contains("The museum opens at nine."));
        assert!(chat.contains(r#"name="mini0""#));
        assert!(chat.contains(r#"name="mini1""#));
        assert!(chat.contains(r#"data-action="check-mini-test""#));

        dom.check("mini0", "9");
        block_on(page.perform(AdaptiveLearningAction::CheckMiniTest));
        assert_eq!(
            transport.last_request().unwrap().body,
            RequestBody::Json(json!({"answers": ["9", null]}))
        );
        assert!(
            dom.html(CHAT_MESSAGES_ID)
                .unwrap()
                .contains("<strong>Assistant:</strong> Mini test score: 1/2")
        );
    }

    #[test]
    fn test_check_without_mini_test_is_ignored() {
        let (page, transport, _dom, _charts) = page();
        assert!(block_on(page.check_mini_test()).is_none());
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_diagnostic_button_navigates() {
        let (page, _transport, dom, _charts) = page();
        block_on(page.perform(AdaptiveLearningAction::TakeDiagnostic));
        assert_eq!(dom.navigations(), vec![("/diagnostics".to_string(), None)]);
    }

    #[test]
    fn test_action_names() {
        for action in AdaptiveLearningAction::ALL {
            assert_eq!(action.as_str().parse(), Ok(action));
        }
        assert_eq!(
            AdaptiveLearningAction::SendMessage.control_id(),
            Some("submit-button")
        );
    }
}
