//! The browser side of every seam, plus the `#[wasm_bindgen]` entry points the pages load.

mod bindings;
mod capture;
mod charts;
mod dom;
mod fetch;
mod notify;
mod storage;

pub use bindings::{
    AdaptiveLearningApp, DiagnosticsApp, MotivationApp, PracticeApp, SpeakingApp, WritingApp,
};
pub use capture::BrowserAudioSource;
pub use charts::BrowserCharts;
pub use dom::BrowserDom;
pub use fetch::FetchTransport;
pub use notify::BrowserNotifier;
pub use storage::LocalStorage;

use std::time::Duration;

use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use web_sys::{Blob, BlobPropertyBag};

use crate::capture::Recording;

/// Best-effort readable text for a rejected promise or thrown value.
pub(crate) fn js_error_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    if let Some(name) = js_sys::Reflect::get(value, &JsValue::from_str("name"))
        .ok()
        .and_then(|name| name.as_string())
    {
        return name;
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

pub(crate) fn recording_blob(recording: &Recording) -> Result<Blob, JsValue> {
    let bytes = js_sys::Uint8Array::from(recording.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let options = BlobPropertyBag::new();
    options.set_type(&recording.mime_type);
    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
}

pub(crate) fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("No window"))
}

/// Runs `f` once after `delay`. Failures to schedule are logged.
pub(crate) fn set_timeout(window: &web_sys::Window, delay: Duration, f: impl FnOnce() + 'static) {
    let callback = Closure::once(f);
    let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        millis,
    ) {
        log::error!("Could not set a timer: {e:?}");
    }
    callback.forget();
}
