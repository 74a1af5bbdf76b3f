use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi, from_wasm_abi))]
pub struct AppConfig {
    /// Prefix for every `/api/...` path. Empty means same origin.
    pub api_base_url: String,
    /// How long the learning plan stays on screen before moving to adaptive learning.
    pub redirect_delay_ms: u32,
    pub reminder_delay_ms: u32,
    pub progress_storage_key: String,
}

impl AppConfig {
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms.into())
    }

    pub fn reminder_delay(&self) -> Duration {
        Duration::from_millis(self.reminder_delay_ms.into())
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base_url.trim_end_matches('/'))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        app_config()
    }
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub fn app_config() -> AppConfig {
    let api_base_url = if cfg!(feature = "local-backend") {
        "http://localhost:5000"
    } else {
        ""
    };
    AppConfig {
        api_base_url: api_base_url.to_string(),
        redirect_delay_ms: 5_000,
        reminder_delay_ms: 60_000,
        progress_storage_key: "ieltsProgress".to_string(),
    }
}
