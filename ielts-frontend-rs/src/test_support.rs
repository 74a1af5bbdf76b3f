//! In-memory stand-ins for the browser, used by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::task::Poll;
use std::time::Duration;

use crate::api::{ApiError, ApiRequest, Transport};
use crate::capture::{AudioSource, CaptureError, Recording};
use crate::charts::ChartSurface;
use crate::dom::Dom;
use crate::motivation::{KeyValueStore, Notifier, Permission, StorageError};

async fn yield_once() {
    let mut yielded = false;
    futures::future::poll_fn(|cx| {
        if yielded {
            Poll::Ready(())
        } else {
            yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    })
    .await
}

/// Answers requests by path. Unknown paths fail with a 404.
#[derive(Default)]
pub struct MockTransport {
    routes: RefCell<HashMap<String, Result<serde_json::Value, ApiError>>>,
    requests: RefCell<Vec<ApiRequest>>,
    slow: Cell<bool>,
}

impl MockTransport {
    /// Every response stays pending for one poll, so concurrent calls interleave.
    pub fn slow(&self) {
        self.slow.set(true);
    }

    pub fn respond(&self, path: &str, body: serde_json::Value) {
        self.routes.borrow_mut().insert(path.to_string(), Ok(body));
    }

    pub fn fail(&self, path: &str, error: ApiError) {
        self.routes.borrow_mut().insert(path.to_string(), Err(error));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.borrow().last().cloned()
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<serde_json::Value, ApiError> {
        let response = self
            .routes
            .borrow()
            .get(&request.path)
            .cloned()
            .unwrap_or(Err(ApiError::Status(404)));
        self.requests.borrow_mut().push(request);
        if self.slow.get() {
            yield_once().await;
        }
        response
    }
}

#[derive(Default)]
pub struct FakeDom {
    html: RefCell<HashMap<String, String>>,
    text: RefCell<HashMap<String, String>>,
    values: RefCell<HashMap<String, String>>,
    disabled: RefCell<HashMap<String, bool>>,
    checked: RefCell<HashMap<String, String>>,
    fields: RefCell<HashMap<String, String>>,
    audio: RefCell<HashMap<String, Recording>>,
    scrolled: RefCell<Vec<String>>,
    alerts: RefCell<Vec<String>>,
    navigations: RefCell<Vec<(String, Option<Duration>)>>,
}

impl FakeDom {
    /// Selects the radio button `value` in group `name`.
    pub fn check(&self, name: &str, value: &str) {
        self.checked
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    /// Types into the textarea named `name`.
    pub fn fill(&self, name: &str, value: &str) {
        self.fields
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    pub fn html(&self, id: &str) -> Option<String> {
        self.html.borrow().get(id).cloned()
    }

    pub fn text(&self, id: &str) -> Option<String> {
        self.text.borrow().get(id).cloned()
    }

    pub fn disabled(&self, id: &str) -> Option<bool> {
        self.disabled.borrow().get(id).copied()
    }

    pub fn audio(&self, id: &str) -> Option<Recording> {
        self.audio.borrow().get(id).cloned()
    }

    pub fn scrolled(&self, id: &str) -> bool {
        self.scrolled.borrow().iter().any(|scrolled| scrolled == id)
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }

    pub fn navigations(&self) -> Vec<(String, Option<Duration>)> {
        self.navigations.borrow().clone()
    }
}

impl Dom for FakeDom {
    fn set_html(&self, id: &str, html: &str) {
        self.html
            .borrow_mut()
            .insert(id.to_string(), html.to_string());
    }

    fn append_html(&self, id: &str, html: &str) {
        self.html
            .borrow_mut()
            .entry(id.to_string())
            .or_default()
            .push_str(html);
    }

    fn set_text(&self, id: &str, text: &str) {
        self.text
            .borrow_mut()
            .insert(id.to_string(), text.to_string());
    }

    fn set_disabled(&self, id: &str, disabled: bool) {
        self.disabled.borrow_mut().insert(id.to_string(), disabled);
    }

    fn value(&self, id: &str) -> Option<String> {
        self.values.borrow().get(id).cloned()
    }

    fn set_value(&self, id: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(id.to_string(), value.to_string());
    }

    fn checked_value(&self, name: &str) -> Option<String> {
        self.checked.borrow().get(name).cloned()
    }

    fn field_value(&self, name: &str) -> Option<String> {
        self.fields.borrow().get(name).cloned()
    }

    fn scroll_to_bottom(&self, id: &str) {
        self.scrolled.borrow_mut().push(id.to_string());
    }

    fn show_audio(&self, id: &str, recording: &Recording) {
        self.audio
            .borrow_mut()
            .insert(id.to_string(), recording.clone());
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn navigate(&self, path: &str) {
        self.navigations.borrow_mut().push((path.to_string(), None));
    }

    fn navigate_after(&self, path: &str, delay: Duration) {
        self.navigations
            .borrow_mut()
            .push((path.to_string(), Some(delay)));
    }
}

/// A microphone that hands back the same chunks for every take.
pub struct FakeAudioSource {
    chunks: Vec<Vec<u8>>,
    denial: Option<String>,
    running: Cell<bool>,
}

impl FakeAudioSource {
    pub fn with_chunks(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            chunks,
            denial: None,
            running: Cell::new(false),
        }
    }

    pub fn denied(reason: &str) -> Self {
        Self {
            chunks: Vec::new(),
            denial: Some(reason.to_string()),
            running: Cell::new(false),
        }
    }
}

impl AudioSource for FakeAudioSource {
    async fn start(&self) -> Result<(), CaptureError> {
        if let Some(reason) = &self.denial {
            return Err(CaptureError::PermissionDenied(reason.clone()));
        }
        self.running.set(true);
        Ok(())
    }

    async fn stop(&self) -> Result<Vec<Vec<u8>>, CaptureError> {
        if !self.running.replace(false) {
            return Err(CaptureError::NotRecording);
        }
        Ok(self.chunks.clone())
    }
}

#[derive(Default)]
pub struct FakeCharts {
    draws: RefCell<Vec<(String, serde_json::Value)>>,
}

impl FakeCharts {
    pub fn draws(&self) -> Vec<(String, serde_json::Value)> {
        self.draws.borrow().clone()
    }
}

impl ChartSurface for FakeCharts {
    fn draw(&self, canvas_id: &str, config: &serde_json::Value) {
        self.draws
            .borrow_mut()
            .push((canvas_id.to_string(), config.clone()));
    }
}

#[derive(Default)]
pub struct FakeStore {
    entries: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for FakeStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub struct FakeNotifier {
    supported: bool,
    permission: Cell<Permission>,
    answer: Permission,
    requests: Cell<usize>,
    scheduled: RefCell<Vec<(String, String, Duration)>>,
}

impl FakeNotifier {
    fn new(supported: bool, permission: Permission, answer: Permission) -> Self {
        Self {
            supported,
            permission: Cell::new(permission),
            answer,
            requests: Cell::new(0),
            scheduled: RefCell::new(Vec::new()),
        }
    }

    pub fn granted() -> Self {
        Self::new(true, Permission::Granted, Permission::Granted)
    }

    pub fn denied() -> Self {
        Self::new(true, Permission::Denied, Permission::Denied)
    }

    /// Not asked yet; answers `answer` when asked.
    pub fn undecided(answer: Permission) -> Self {
        Self::new(true, Permission::Default, answer)
    }

    pub fn unsupported() -> Self {
        Self::new(false, Permission::Default, Permission::Default)
    }

    pub fn requests(&self) -> usize {
        self.requests.get()
    }

    pub fn scheduled(&self) -> Vec<(String, String, Duration)> {
        self.scheduled.borrow().clone()
    }
}

impl Notifier for FakeNotifier {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn permission(&self) -> Permission {
        self.permission.get()
    }

    async fn request_permission(&self) -> Permission {
        self.requests.set(self.requests.get() + 1);
        self.permission.set(self.answer);
        self.answer
    }

    fn schedule(&self, title: &str, body: &str, delay: Duration) {
        self.scheduled
            .borrow_mut()
            .push((title.to_string(), body.to_string(), delay));
    }
}
