//! The diagnostic test flow: one test per skill in a fixed order, each scored by the server,
//! followed by a generated learning plan.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::str::FromStr;

use html_escape::encode_text;
use ielts_utils::{
    Skill,
    diagnostic::{DiagnosticPayload, DiagnosticResults},
};

use crate::answers::{DiagnosticSubmission, collect_positional};
use crate::api::{ApiClient, ApiError, Transport};
use crate::capture::{AudioSource, CaptureControls, CaptureError, MediaCapture};
use crate::config::AppConfig;
use crate::dom::Dom;
use crate::render::{self, AUDIO_PLAYBACK_ID, RECORDING_STATUS_ID, START_RECORDING_ID, STOP_RECORDING_ID};

pub(crate) const TEST_ID: &str = "diagnostic-test";
pub(crate) const RESULT_ID: &str = "diagnostic-result";
pub(crate) const LEARNING_PLAN_ID: &str = "learning-plan";

const ADAPTIVE_LEARNING_PATH: &str = "/adaptive_learning";

/// What came back from scoring one skill.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScoreOutcome {
    Scored(f64),
    /// The server answered without a numeric score.
    Unscored,
    /// The scoring request itself failed.
    Failed,
}

impl ScoreOutcome {
    pub fn score(self) -> Option<f64> {
        match self {
            ScoreOutcome::Scored(score) => Some(score),
            ScoreOutcome::Unscored | ScoreOutcome::Failed => None,
        }
    }

    pub fn display(self) -> String {
        match self {
            ScoreOutcome::Scored(score) => format!("{score:.1}"),
            ScoreOutcome::Unscored => "N/A".to_string(),
            ScoreOutcome::Failed => "Error".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    #[error("cannot start {requested} before {expected}")]
    OutOfOrder { requested: Skill, expected: Skill },
    #[error("no diagnostic test is in progress")]
    NoActiveSkill,
    #[error("the {0} test has not been submitted yet")]
    NotSubmitted(Skill),
    #[error("the {0} test was already submitted")]
    AlreadySubmitted(Skill),
    #[error("every diagnostic test is already done")]
    Complete,
    #[error("the previous request for this step has not finished")]
    InFlight,
}

/// Where `advance` leads.
#[derive(Clone, Debug, PartialEq)]
pub enum Advance {
    Next(Skill),
    Aggregate(DiagnosticResults),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Aggregation {
    #[default]
    Pending,
    Running,
    Done,
}

/// Walks listening, reading, writing, speaking exactly once each.
/// A skill may only begin once every skill before it has an outcome.
/// Aggregation counts as done only once it succeeded, so a failed one can be retried.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticSequence {
    current: Option<Skill>,
    outcomes: BTreeMap<Skill, ScoreOutcome>,
    submitting: Option<Skill>,
    aggregation: Aggregation,
}

impl DiagnosticSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Skill> {
        self.current
    }

    pub fn outcome(&self, skill: Skill) -> Option<ScoreOutcome> {
        self.outcomes.get(&skill).copied()
    }

    /// The skill that may be started now. The active skill stays startable until it is submitted.
    pub fn expected_skill(&self) -> Option<Skill> {
        Skill::ORDER
            .into_iter()
            .find(|skill| !self.outcomes.contains_key(skill))
    }

    pub fn begin(&mut self, skill: Skill) -> Result<(), SequenceError> {
        let expected = self.expected_skill().ok_or(SequenceError::Complete)?;
        if skill != expected {
            return Err(SequenceError::OutOfOrder {
                requested: skill,
                expected,
            });
        }
        self.current = Some(skill);
        Ok(())
    }

    /// The skill a submission would be recorded against.
    pub fn submittable(&self) -> Result<Skill, SequenceError> {
        let skill = self.current.ok_or(SequenceError::NoActiveSkill)?;
        if self.outcomes.contains_key(&skill) {
            return Err(SequenceError::AlreadySubmitted(skill));
        }
        if self.submitting == Some(skill) {
            return Err(SequenceError::InFlight);
        }
        Ok(skill)
    }

    /// Marks the active skill as being scored until `record` is called.
    pub fn start_submission(&mut self) -> Result<Skill, SequenceError> {
        let skill = self.submittable()?;
        self.submitting = Some(skill);
        Ok(skill)
    }

    pub fn record(&mut self, outcome: ScoreOutcome) -> Result<Skill, SequenceError> {
        self.submitting = None;
        let skill = self.submittable()?;
        self.outcomes.insert(skill, outcome);
        Ok(skill)
    }

    pub fn advance(&mut self) -> Result<Advance, SequenceError> {
        let skill = self.current.ok_or(SequenceError::NoActiveSkill)?;
        if !self.outcomes.contains_key(&skill) {
            return Err(SequenceError::NotSubmitted(skill));
        }
        match skill.next() {
            Some(next) => Ok(Advance::Next(next)),
            None => match self.aggregation {
                Aggregation::Done => Err(SequenceError::Complete),
                Aggregation::Running => Err(SequenceError::InFlight),
                Aggregation::Pending => {
                    self.aggregation = Aggregation::Running;
                    Ok(Advance::Aggregate(self.results()))
                }
            },
        }
    }

    pub fn aggregation_finished(&mut self, succeeded: bool) {
        self.aggregation = if succeeded {
            Aggregation::Done
        } else {
            Aggregation::Pending
        };
    }

    pub fn is_complete(&self) -> bool {
        Skill::ORDER
            .iter()
            .all(|skill| self.outcomes.contains_key(skill))
    }

    /// Every skill, `None` where there is no numeric score.
    pub fn results(&self) -> DiagnosticResults {
        DiagnosticResults(
            Skill::ORDER
                .into_iter()
                .map(|skill| (skill, self.outcome(skill).and_then(ScoreOutcome::score)))
                .collect(),
        )
    }
}

/// The `data-action` values the diagnostics page reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticAction {
    SubmitTest,
    NextTest,
    StartRecording,
    StopRecording,
}

impl DiagnosticAction {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticAction::SubmitTest => "submit-test",
            DiagnosticAction::NextTest => "next-test",
            DiagnosticAction::StartRecording => "start-recording",
            DiagnosticAction::StopRecording => "stop-recording",
        }
    }
}

impl FromStr for DiagnosticAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submit-test" => Ok(DiagnosticAction::SubmitTest),
            "next-test" => Ok(DiagnosticAction::NextTest),
            "start-recording" => Ok(DiagnosticAction::StartRecording),
            "stop-recording" => Ok(DiagnosticAction::StopRecording),
            other => Err(format!("unknown diagnostic action: {other}")),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DiagnosticError {
    #[error(transparent)]
    Sequence(#[from] SequenceError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// Session state of the diagnostics page.
pub struct DiagnosticsPage<T, D, A> {
    api: ApiClient<T>,
    dom: D,
    capture: MediaCapture<A>,
    config: AppConfig,
    sequence: RefCell<DiagnosticSequence>,
    payload: RefCell<Option<DiagnosticPayload>>,
}

impl<T: Transport, D: Dom, A: AudioSource> DiagnosticsPage<T, D, A> {
    pub fn new(transport: T, dom: D, audio: A, config: AppConfig) -> Self {
        let controls = CaptureControls {
            start: START_RECORDING_ID,
            stop: STOP_RECORDING_ID,
            preview: AUDIO_PLAYBACK_ID,
            submit: None,
            status: Some(RECORDING_STATUS_ID),
        };
        Self {
            api: ApiClient::new(transport),
            dom,
            capture: MediaCapture::new(audio, controls),
            config,
            sequence: RefCell::new(DiagnosticSequence::new()),
            payload: RefCell::new(None),
        }
    }

    pub fn current_skill(&self) -> Option<Skill> {
        self.sequence.borrow().current()
    }

    pub fn results(&self) -> DiagnosticResults {
        self.sequence.borrow().results()
    }

    pub fn capture(&self) -> &MediaCapture<A> {
        &self.capture
    }

    pub async fn start_diagnostic_test(&self, skill: Skill) -> Result<(), DiagnosticError> {
        if let Err(e) = self.sequence.borrow_mut().begin(skill) {
            log::warn!("Refusing to start the {skill} test: {e}");
            return Err(e.into());
        }
        self.payload.replace(None);
        self.dom.set_html(RESULT_ID, "");

        let payload = match self.api.get_diagnostic_test(skill).await {
            Ok(payload) => payload,
            Err(e) => {
                log::error!("Error loading the {skill} diagnostic test: {e}");
                return Err(e.into());
            }
        };
        self.dom
            .set_html(TEST_ID, &render::diagnostic_test(skill, &payload));
        self.payload.replace(Some(payload));
        log::info!("Started the {skill} diagnostic test");
        Ok(())
    }

    fn submission(&self, skill: Skill) -> DiagnosticSubmission {
        if skill == Skill::Speaking {
            return DiagnosticSubmission::Audio(self.capture.recording().unwrap_or_default());
        }
        let count = self
            .payload
            .borrow()
            .as_ref()
            .map_or(0, |payload| payload.questions().len());
        DiagnosticSubmission::Answers(collect_positional(&self.dom, count))
    }

    pub async fn submit_diagnostic_test(&self) -> Result<ScoreOutcome, DiagnosticError> {
        let skill = self.sequence.borrow_mut().start_submission()?;
        let submission = self.submission(skill);

        let outcome = match self.api.evaluate_diagnostic_test(skill, submission).await {
            Ok(response) => match response.numeric_score() {
                Some(score) => ScoreOutcome::Scored(score),
                None => ScoreOutcome::Unscored,
            },
            Err(e) => {
                log::error!("Error scoring the {skill} test: {e}");
                ScoreOutcome::Failed
            }
        };
        self.sequence.borrow_mut().record(outcome)?;
        self.dom.set_html(RESULT_ID, &result_html(skill, outcome));
        Ok(outcome)
    }

    pub async fn next_diagnostic_test(&self) -> Result<(), DiagnosticError> {
        let advance = self.sequence.borrow_mut().advance()?;
        match advance {
            Advance::Next(skill) => self.start_diagnostic_test(skill).await,
            Advance::Aggregate(results) => {
                let finished = self.finish(&results).await;
                self.sequence
                    .borrow_mut()
                    .aggregation_finished(finished.is_ok());
                finished
            }
        }
    }

    async fn finish(&self, results: &DiagnosticResults) -> Result<(), DiagnosticError> {
        if let Err(e) = self.api.save_diagnostic_results(results).await {
            log::error!("Error saving diagnostic results: {e}");
            self.dom.set_html(
                LEARNING_PLAN_ID,
                &render::error_paragraph("Failed to save your diagnostic results. Please try again."),
            );
            return Err(e.into());
        }
        log::info!("Diagnostic results saved");

        let plan = match self.api.create_learning_plan(results).await {
            Ok(response) => response.plan,
            Err(e) => {
                log::error!("Error creating the learning plan: {e}");
                self.dom.set_html(
                    LEARNING_PLAN_ID,
                    &render::error_paragraph(
                        "Failed to create your learning plan. Please try again.",
                    ),
                );
                return Err(e.into());
            }
        };
        self.dom.set_html(
            LEARNING_PLAN_ID,
            &format!(
                "<h2>Your IELTS Diagnostic Results and Personalized Learning Plan</h2><pre>{}</pre>",
                encode_text(&plan)
            ),
        );
        self.dom
            .navigate_after(ADAPTIVE_LEARNING_PATH, self.config.redirect_delay());
        Ok(())
    }

    pub async fn start_recording(&self) -> Result<(), DiagnosticError> {
        Ok(self.capture.start_recording(&self.dom).await?)
    }

    pub async fn stop_recording(&self) -> Result<(), DiagnosticError> {
        self.capture.stop_recording(&self.dom).await?;
        Ok(())
    }

    /// Dispatches a click on one of the page's `data-action` controls.
    pub async fn perform(&self, action: DiagnosticAction) -> Result<(), DiagnosticError> {
        match action {
            DiagnosticAction::SubmitTest => self.submit_diagnostic_test().await.map(|_| ()),
            DiagnosticAction::NextTest => self.next_diagnostic_test().await,
            DiagnosticAction::StartRecording => self.start_recording().await,
            DiagnosticAction::StopRecording => self.stop_recording().await,
        }
    }
}

fn result_html(skill: Skill, outcome: ScoreOutcome) -> String {
    format!(
        r#"<h3>{} Diagnostic Result</h3><p>Your estimated IELTS score: {}</p><button data-action="{}">Next Test</button>"#,
        skill.title(),
        outcome.display(),
        DiagnosticAction::NextTest.as_str()
    )
}
