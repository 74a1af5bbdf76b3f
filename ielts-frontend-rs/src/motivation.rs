//! Locally kept progress and the daily practice reminder.

use std::fmt::Write as _;
use std::rc::Rc;
use std::time::Duration;

use html_escape::encode_text;
use indexmap::IndexMap;

use crate::config::AppConfig;
use crate::dom::Dom;
use crate::render::display_value;

pub(crate) const PROGRESS_TRACKER_ID: &str = "progress-tracker";

const UNSUPPORTED: &str = "This browser does not support desktop notification";
const REMINDER_TITLE: &str = "IELTS Preparation Reminder";
const REMINDER_BODY: &str = "It's time for your daily IELTS practice!";

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum StorageError {
    #[error("local storage is not available")]
    Unavailable,
    #[error("storage error: {0}")]
    Access(String),
    #[error("could not encode progress: {0}")]
    Encode(String),
}

/// String key-value persistence that survives page loads.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore> KeyValueStore for Rc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    /// The user has not been asked yet.
    Default,
}

/// Desktop notifications.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    fn is_supported(&self) -> bool;
    fn permission(&self) -> Permission;
    async fn request_permission(&self) -> Permission;
    /// Shows one notification after `delay`.
    fn schedule(&self, title: &str, body: &str, delay: Duration);
}

impl<N: Notifier> Notifier for Rc<N> {
    fn is_supported(&self) -> bool {
        (**self).is_supported()
    }

    fn permission(&self) -> Permission {
        (**self).permission()
    }

    async fn request_permission(&self) -> Permission {
        (**self).request_permission().await
    }

    fn schedule(&self, title: &str, body: &str, delay: Duration) {
        (**self).schedule(title, body, delay)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReminderStatus {
    Unsupported,
    Scheduled,
    NotAllowed,
}

pub struct MotivationWidget<S, N, D> {
    store: S,
    notifier: N,
    dom: D,
    config: AppConfig,
}

impl<S: KeyValueStore, N: Notifier, D: Dom> MotivationWidget<S, N, D> {
    pub fn new(store: S, notifier: N, dom: D, config: AppConfig) -> Self {
        Self {
            store,
            notifier,
            dom,
            config,
        }
    }

    pub async fn on_load(&self) -> ReminderStatus {
        self.display_progress();
        self.set_reminder().await
    }

    /// Skill to score, in the order the skills were first recorded.
    /// Missing or unreadable data counts as no progress.
    pub fn load_progress(&self) -> IndexMap<String, serde_json::Value> {
        let stored = match self.store.get(&self.config.progress_storage_key) {
            Ok(stored) => stored,
            Err(e) => {
                log::warn!("Could not read stored progress: {e}");
                None
            }
        };
        let Some(stored) = stored else {
            return IndexMap::new();
        };
        match serde_json::from_str::<Option<IndexMap<String, serde_json::Value>>>(&stored) {
            Ok(progress) => progress.unwrap_or_default(),
            Err(e) => {
                log::warn!("Ignoring unreadable stored progress: {e}");
                IndexMap::new()
            }
        }
    }

    pub fn update_progress(&self, skill: &str, score: f64) -> Result<(), StorageError> {
        let mut progress = self.load_progress();
        progress.insert(skill.to_string(), serde_json::Value::from(score));
        let encoded =
            serde_json::to_string(&progress).map_err(|e| StorageError::Encode(e.to_string()))?;
        self.store
            .set(&self.config.progress_storage_key, &encoded)?;
        self.display_progress();
        Ok(())
    }

    pub fn display_progress(&self) {
        let mut html = String::from("<h3>Your Progress</h3>");
        for (skill, score) in self.load_progress() {
            let _ = write!(
                html,
                "<p>{}: {}</p>",
                encode_text(&skill),
                encode_text(&display_value(&score))
            );
        }
        self.dom.set_html(PROGRESS_TRACKER_ID, &html);
    }

    pub async fn set_reminder(&self) -> ReminderStatus {
        if !self.notifier.is_supported() {
            self.dom.alert(UNSUPPORTED);
            return ReminderStatus::Unsupported;
        }
        let permission = match self.notifier.permission() {
            Permission::Default => self.notifier.request_permission().await,
            decided => decided,
        };
        if permission != Permission::Granted {
            log::info!("Reminder not scheduled: notifications are {permission:?}");
            return ReminderStatus::NotAllowed;
        }
        self.notifier
            .schedule(REMINDER_TITLE, REMINDER_BODY, self.config.reminder_delay());
        ReminderStatus::Scheduled
    }
}
