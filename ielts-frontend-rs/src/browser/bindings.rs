//! One exported type per page. The constructor wires the page's controls; the methods are
//! there for pages that prefer to drive the flow from their own scripts.

use std::rc::Rc;

use ielts_utils::{Skill, practice::PracticeKind};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use super::{
    BrowserAudioSource, BrowserCharts, BrowserDom, BrowserNotifier, FetchTransport, LocalStorage,
};
use crate::adaptive_learning::{AdaptiveLearningAction, AdaptiveLearningPage, USER_INPUT_ID};
use crate::config::app_config;
use crate::diagnostics::{DiagnosticAction, DiagnosticsPage};
use crate::motivation::{MotivationWidget, ReminderStatus};
use crate::practice::PracticePage;
use crate::speaking::SpeakingPage;
use crate::writing::WritingPage;
use crate::init_logging;

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{e}"))
}

fn setup() -> Result<Rc<BrowserDom>, JsValue> {
    init_logging();
    Ok(Rc::new(BrowserDom::new()?))
}

type BrowserDiagnostics = DiagnosticsPage<FetchTransport, Rc<BrowserDom>, BrowserAudioSource>;

#[wasm_bindgen]
pub struct DiagnosticsApp {
    page: Rc<BrowserDiagnostics>,
}

#[wasm_bindgen]
impl DiagnosticsApp {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<DiagnosticsApp, JsValue> {
        let dom = setup()?;
        let config = app_config();
        let page = Rc::new(DiagnosticsPage::new(
            FetchTransport::new(config.clone()),
            dom.clone(),
            BrowserAudioSource::new(),
            config,
        ));

        let handler_page = page.clone();
        dom.on_action(move |action| {
            let Ok(action) = action.parse::<DiagnosticAction>() else {
                return;
            };
            let page = handler_page.clone();
            spawn_local(async move {
                if let Err(e) = page.perform(action).await {
                    log::warn!("{} failed: {e}", action.as_str());
                }
            });
        })?;

        Ok(DiagnosticsApp { page })
    }

    pub async fn start_diagnostic_test(&self, skill: Skill) -> Result<(), JsValue> {
        self.page.start_diagnostic_test(skill).await.map_err(to_js)
    }

    pub async fn submit_diagnostic_test(&self) -> Result<String, JsValue> {
        self.page
            .submit_diagnostic_test()
            .await
            .map(|outcome| outcome.display())
            .map_err(to_js)
    }

    pub async fn next_diagnostic_test(&self) -> Result<(), JsValue> {
        self.page.next_diagnostic_test().await.map_err(to_js)
    }
}

#[wasm_bindgen]
pub struct PracticeApp {
    page: Rc<PracticePage<FetchTransport, Rc<BrowserDom>>>,
}

#[wasm_bindgen]
impl PracticeApp {
    /// Loads the test right away and wires `#submit-answers`.
    #[wasm_bindgen(constructor)]
    pub fn new(kind: PracticeKind) -> Result<PracticeApp, JsValue> {
        let dom = setup()?;
        let page = Rc::new(PracticePage::new(
            kind,
            FetchTransport::new(app_config()),
            dom.clone(),
        ));

        let submit_page = page.clone();
        dom.on_click("submit-answers", move || {
            let page = submit_page.clone();
            spawn_local(async move {
                let _ = page.submit().await;
            });
        })?;

        let load_page = page.clone();
        spawn_local(async move {
            let _ = load_page.load().await;
        });

        Ok(PracticeApp { page })
    }

    pub async fn reload(&self) -> Result<(), JsValue> {
        self.page.load().await.map_err(to_js)
    }
}

#[wasm_bindgen]
pub struct WritingApp {
    page: Rc<WritingPage<FetchTransport, Rc<BrowserDom>>>,
}

#[wasm_bindgen]
impl WritingApp {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WritingApp, JsValue> {
        let dom = setup()?;
        let page = Rc::new(WritingPage::new(
            FetchTransport::new(app_config()),
            dom.clone(),
        ));

        let topic_page = page.clone();
        dom.on_click("get-topic", move || {
            let page = topic_page.clone();
            spawn_local(async move {
                let _ = page.get_topic().await;
            });
        })?;
        let custom_page = page.clone();
        dom.on_change("custom-topic", move || custom_page.custom_topic_changed())?;
        let submit_page = page.clone();
        dom.on_click("submit-essay", move || {
            let page = submit_page.clone();
            spawn_local(async move {
                let _ = page.submit().await;
            });
        })?;

        Ok(WritingApp { page })
    }

    #[wasm_bindgen(getter)]
    pub fn current_topic(&self) -> Option<String> {
        self.page.current_topic()
    }
}

type BrowserSpeaking = SpeakingPage<FetchTransport, Rc<BrowserDom>, BrowserAudioSource>;

#[wasm_bindgen]
pub struct SpeakingApp {
    page: Rc<BrowserSpeaking>,
}

#[wasm_bindgen]
impl SpeakingApp {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<SpeakingApp, JsValue> {
        let dom = setup()?;
        let page = Rc::new(SpeakingPage::new(
            FetchTransport::new(app_config()),
            dom.clone(),
            BrowserAudioSource::new(),
        ));

        let topic_page = page.clone();
        dom.on_click("get-topic", move || {
            let page = topic_page.clone();
            spawn_local(async move {
                let _ = page.get_topic().await;
            });
        })?;
        let custom_page = page.clone();
        dom.on_change("custom-topic", move || custom_page.custom_topic_changed())?;
        let start_page = page.clone();
        dom.on_click("start-recording", move || {
            let page = start_page.clone();
            spawn_local(async move {
                let _ = page.start_recording().await;
            });
        })?;
        let stop_page = page.clone();
        dom.on_click("stop-recording", move || {
            let page = stop_page.clone();
            spawn_local(async move {
                let _ = page.stop_recording().await;
            });
        })?;
        let submit_page = page.clone();
        dom.on_click("submit-recording", move || {
            let page = submit_page.clone();
            spawn_local(async move {
                let _ = page.submit_recording().await;
            });
        })?;

        Ok(SpeakingApp { page })
    }

    #[wasm_bindgen(getter)]
    pub fn current_topic(&self) -> Option<String> {
        self.page.current_topic()
    }
}

type BrowserAdaptiveLearning = AdaptiveLearningPage<FetchTransport, Rc<BrowserDom>, BrowserCharts>;

#[wasm_bindgen]
pub struct AdaptiveLearningApp {
    page: Rc<BrowserAdaptiveLearning>,
}

#[wasm_bindgen]
impl AdaptiveLearningApp {
    /// Wires the chat, target and diagnostic controls and draws the current progress.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<AdaptiveLearningApp, JsValue> {
        let dom = setup()?;
        let page = Rc::new(AdaptiveLearningPage::new(
            FetchTransport::new(app_config()),
            dom.clone(),
            BrowserCharts::new(),
        ));

        let perform = {
            let page = page.clone();
            move |action: AdaptiveLearningAction| {
                let page = page.clone();
                spawn_local(async move { page.perform(action).await });
            }
        };

        for action in AdaptiveLearningAction::ALL {
            if let Some(id) = action.control_id() {
                let perform = perform.clone();
                dom.on_click(id, move || perform(action))?;
            }
        }
        let enter = perform.clone();
        dom.on_enter(USER_INPUT_ID, move || {
            enter(AdaptiveLearningAction::SendMessage)
        })?;
        dom.on_action(move |action| {
            if action == AdaptiveLearningAction::CheckMiniTest.as_str() {
                perform(AdaptiveLearningAction::CheckMiniTest);
            }
        })?;

        let load_page = page.clone();
        spawn_local(async move {
            let _ = load_page.update_progress().await;
        });

        Ok(AdaptiveLearningApp { page })
    }

    pub async fn update_progress(&self) -> Result<(), JsValue> {
        self.page.update_progress().await.map(|_| ()).map_err(to_js)
    }
}

type BrowserMotivation = MotivationWidget<LocalStorage, BrowserNotifier, Rc<BrowserDom>>;

#[wasm_bindgen]
pub struct MotivationApp {
    widget: Rc<BrowserMotivation>,
}

#[wasm_bindgen]
impl MotivationApp {
    /// Shows the stored progress and asks for the daily reminder.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<MotivationApp, JsValue> {
        let dom = setup()?;
        let store = LocalStorage::new().map_err(to_js)?;
        let widget = Rc::new(MotivationWidget::new(
            store,
            BrowserNotifier,
            dom,
            app_config(),
        ));

        let load_widget = widget.clone();
        spawn_local(async move {
            if load_widget.on_load().await == ReminderStatus::Scheduled {
                log::info!("Daily reminder scheduled");
            }
        });

        Ok(MotivationApp { widget })
    }

    pub fn update_progress(&self, skill: &str, score: f64) -> Result<(), JsValue> {
        self.widget.update_progress(skill, score).map_err(to_js)
    }
}
