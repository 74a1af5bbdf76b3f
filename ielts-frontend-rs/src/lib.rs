mod adaptive_learning;
mod answers;
mod api;
mod capture;
mod charts;
mod config;
mod diagnostics;
mod dom;
mod motivation;
mod practice;
mod render;
mod speaking;
mod topic;
mod writing;

#[cfg(target_arch = "wasm32")]
pub mod browser;

#[cfg(test)]
mod test_support;

use std::sync::LazyLock;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub use adaptive_learning::{AdaptiveLearningAction, AdaptiveLearningPage};
pub use answers::DiagnosticSubmission;
pub use api::{ApiClient, ApiError, ApiRequest, FormPart, Method, RequestBody, Transport};
pub use capture::{AudioSource, CaptureControls, CaptureError, CaptureState, MediaCapture, Recording};
pub use charts::ChartSurface;
pub use config::{AppConfig, app_config};
pub use diagnostics::{
    Advance, DiagnosticAction, DiagnosticError, DiagnosticSequence, DiagnosticsPage, ScoreOutcome,
    SequenceError,
};
pub use dom::Dom;
pub use ielts_utils::{Skill, SkillLevels};
pub use motivation::{
    KeyValueStore, MotivationWidget, Notifier, Permission, ReminderStatus, StorageError,
};
pub use practice::PracticePage;
pub use speaking::SpeakingPage;
pub use topic::{TopicKind, TopicPicker};
pub use writing::WritingPage;

// putting this inside LOGGER prevents us from accidentally initializing the logger more than once
static LOGGER: LazyLock<()> = LazyLock::new(|| {
    #[cfg(all(target_arch = "wasm32", feature = "console_error_panic_hook"))]
    console_error_panic_hook::set_once();

    #[cfg(target_arch = "wasm32")]
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Logging initialized");
});

/// Called by every page entry point before it touches the DOM.
pub fn init_logging() {
    LazyLock::force(&LOGGER);
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub fn get_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
