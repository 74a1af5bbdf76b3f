//! Markup for test payloads. Every interpolated string goes through `html_escape`.

use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use ielts_utils::{
    Skill,
    diagnostic::{DiagnosticPayload, DiagnosticQuestion},
    practice::{PracticeQuestion, PracticeTest},
};

use crate::answers::{practice_field_name, question_field_name};
use crate::diagnostics::DiagnosticAction;

pub(crate) const START_RECORDING_ID: &str = "start-recording";
pub(crate) const STOP_RECORDING_ID: &str = "stop-recording";
pub(crate) const AUDIO_PLAYBACK_ID: &str = "audio-playback";
pub(crate) const RECORDING_STATUS_ID: &str = "recording-status";

/// Shows a loosely typed API value the way a person would write it: strings bare, numbers short.
pub(crate) fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(f) => f.to_string(),
            None => n.to_string(),
        },
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub(crate) fn audio_control(audio_url: &str) -> String {
    format!(
        r#"<audio controls src="/audio/{}"></audio>"#,
        attr(audio_url)
    )
}

pub(crate) fn radio_options(name: &str, options: &[String]) -> String {
    let mut html = String::new();
    for option in options {
        let _ = write!(
            html,
            r#"<label><input type="radio" name="{name}" value="{value}"> {label}</label><br>"#,
            name = attr(name),
            value = attr(option),
            label = text(option),
        );
    }
    html
}

pub(crate) fn error_paragraph(message: &str) -> String {
    format!(r#"<p class="error">{}</p>"#, text(message))
}

/// The whole diagnostic test for one skill, including its submit control.
pub(crate) fn diagnostic_test(skill: Skill, payload: &DiagnosticPayload) -> String {
    let mut html = format!("<h2>{} Diagnostic Test</h2>", skill.title());

    match payload {
        DiagnosticPayload::Passage { passage, questions } => {
            let _ = write!(html, r#"<div class="passage">{}</div>"#, text(passage));
            for (index, question) in questions.iter().enumerate() {
                html.push_str(&diagnostic_question(skill, question, index));
            }
        }
        DiagnosticPayload::Prompt { question } => {
            let _ = write!(
                html,
                r#"<p>{prompt}</p><button id="{start}" data-action="{start_action}">Start Recording</button><button id="{stop}" data-action="{stop_action}" disabled>Stop Recording</button><p id="{status}" class="recording-status"></p><audio id="{playback}" controls style="display:none;"></audio>"#,
                prompt = text(question),
                start = START_RECORDING_ID,
                start_action = DiagnosticAction::StartRecording.as_str(),
                stop = STOP_RECORDING_ID,
                stop_action = DiagnosticAction::StopRecording.as_str(),
                status = RECORDING_STATUS_ID,
                playback = AUDIO_PLAYBACK_ID,
            );
        }
        DiagnosticPayload::Questions(questions) => {
            for (index, question) in questions.iter().enumerate() {
                html.push_str(&diagnostic_question(skill, question, index));
            }
        }
    }

    let _ = write!(
        html,
        r#"<button data-action="{}">Submit Test</button>"#,
        DiagnosticAction::SubmitTest.as_str()
    );
    html
}

fn diagnostic_question(skill: Skill, question: &DiagnosticQuestion, index: usize) -> String {
    let number = index + 1;
    let name = question_field_name(index);
    let mut html = String::from(r#"<div class="question">"#);

    if let Some(audio_url) = question.audio_url.as_deref().filter(|url| !url.is_empty()) {
        html.push_str(&audio_control(audio_url));
    }
    // listening questions are heard, not read
    if let Some(prompt) = question.question.as_deref().filter(|q| !q.is_empty())
        && skill != Skill::Listening
    {
        let _ = write!(html, "<p>{number}. {}</p>", text(prompt));
    }
    if let Some(task) = question.task.as_deref().filter(|t| !t.is_empty()) {
        let _ = write!(html, "<p>{number}. {}</p>", text(task));
    }
    match &question.options {
        Some(options) => html.push_str(&radio_options(&name, options)),
        None if matches!(skill, Skill::Writing | Skill::Speaking) => {
            let _ = write!(
                html,
                r#"<textarea name="{}" rows="4" cols="50"></textarea>"#,
                attr(&name)
            );
        }
        None => {}
    }

    html.push_str("</div>");
    html
}

pub(crate) fn practice_passage(passage: &str) -> String {
    format!("<p>{}</p>", text(passage))
}

/// Question blocks of a listening or reading practice test.
pub(crate) fn practice_questions(test: &PracticeTest) -> String {
    test.questions.iter().map(practice_question).collect()
}

fn practice_question(question: &PracticeQuestion) -> String {
    let mut html = String::from(r#"<div class="question">"#);
    if let Some(audio_url) = question.audio_url.as_deref().filter(|url| !url.is_empty()) {
        html.push_str(&audio_control(audio_url));
    }
    let _ = write!(html, "<p>{}</p>", text(&question.text));
    html.push_str(&radio_options(
        &practice_field_name(&question.id),
        &question.options,
    ));
    html.push_str("</div>");
    html
}
