use std::time::Duration;

use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use web_sys::{
    Document, Element, Event, HtmlAudioElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, KeyboardEvent, Url, Window,
};

use super::{recording_blob, set_timeout, window};
use crate::capture::Recording;
use crate::dom::Dom;

fn attribute_selector(tag: &str, name: &str, suffix: &str) -> String {
    format!(
        r#"{tag}[name="{}"]{suffix}"#,
        name.replace('\\', "\\\\").replace('"', "\\\"")
    )
}

/// The live document.
pub struct BrowserDom {
    window: Window,
    document: Document,
}

impl BrowserDom {
    pub fn new() -> Result<Self, JsValue> {
        let window = window()?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document"))?;
        Ok(Self { window, document })
    }

    fn element(&self, id: &str) -> Option<Element> {
        let element = self.document.get_element_by_id(id);
        if element.is_none() {
            log::debug!("No element #{id}");
        }
        element
    }

    fn listen<E: JsCast + 'static>(
        &self,
        id: &str,
        event: &str,
        handler: impl FnMut(E) + 'static,
    ) -> Result<(), JsValue> {
        let target = self
            .element(id)
            .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))?;
        let mut handler = handler;
        let callback = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |event: Event| {
            if let Ok(event) = event.dyn_into::<E>() {
                handler(event);
            }
        }));
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        // listeners live as long as the page
        callback.forget();
        Ok(())
    }

    pub fn on_click(&self, id: &str, mut handler: impl FnMut() + 'static) -> Result<(), JsValue> {
        self.listen(id, "click", move |_: Event| handler())
    }

    pub fn on_change(&self, id: &str, mut handler: impl FnMut() + 'static) -> Result<(), JsValue> {
        self.listen(id, "change", move |_: Event| handler())
    }

    pub fn on_enter(&self, id: &str, mut handler: impl FnMut() + 'static) -> Result<(), JsValue> {
        self.listen(id, "keypress", move |event: KeyboardEvent| {
            if event.key() == "Enter" {
                handler();
            }
        })
    }

    /// Calls `handler` with the `data-action` of any clicked element inside the document,
    /// including markup rendered after this call.
    pub fn on_action(&self, mut handler: impl FnMut(String) + 'static) -> Result<(), JsValue> {
        let callback = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |event: Event| {
            let action = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|element| element.closest("[data-action]").ok().flatten())
                .and_then(|element| element.get_attribute("data-action"));
            if let Some(action) = action {
                handler(action);
            }
        }));
        self.document
            .add_event_listener_with_callback("click", callback.as_ref().unchecked_ref())?;
        callback.forget();
        Ok(())
    }
}

impl Dom for BrowserDom {
    fn set_html(&self, id: &str, html: &str) {
        if let Some(element) = self.element(id) {
            element.set_inner_html(html);
        }
    }

    fn append_html(&self, id: &str, html: &str) {
        if let Some(element) = self.element(id)
            && let Err(e) = element.insert_adjacent_html("beforeend", html)
        {
            log::error!("Could not append to #{id}: {e:?}");
        }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(element) = self.element(id) {
            element.set_text_content(Some(text));
        }
    }

    fn set_disabled(&self, id: &str, disabled: bool) {
        let Some(element) = self.element(id) else {
            return;
        };
        let result = if disabled {
            element.set_attribute("disabled", "")
        } else {
            element.remove_attribute("disabled")
        };
        if let Err(e) = result {
            log::error!("Could not toggle #{id}: {e:?}");
        }
    }

    fn value(&self, id: &str) -> Option<String> {
        let element = self.element(id)?;
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            return Some(input.value());
        }
        if let Some(textarea) = element.dyn_ref::<HtmlTextAreaElement>() {
            return Some(textarea.value());
        }
        element
            .dyn_ref::<HtmlSelectElement>()
            .map(HtmlSelectElement::value)
    }

    fn set_value(&self, id: &str, value: &str) {
        let Some(element) = self.element(id) else {
            return;
        };
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(textarea) = element.dyn_ref::<HtmlTextAreaElement>() {
            textarea.set_value(value);
        } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        }
    }

    fn checked_value(&self, name: &str) -> Option<String> {
        self.document
            .query_selector(&attribute_selector("input", name, ":checked"))
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
    }

    fn field_value(&self, name: &str) -> Option<String> {
        self.document
            .query_selector(&attribute_selector("textarea", name, ""))
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlTextAreaElement>().ok())
            .map(|textarea| textarea.value())
    }

    fn scroll_to_bottom(&self, id: &str) {
        if let Some(element) = self.element(id) {
            element.set_scroll_top(element.scroll_height());
        }
    }

    fn show_audio(&self, id: &str, recording: &Recording) {
        let Some(audio) = self
            .element(id)
            .and_then(|element| element.dyn_into::<HtmlAudioElement>().ok())
        else {
            return;
        };
        let url = match recording_blob(recording).and_then(|blob| Url::create_object_url_with_blob(&blob)) {
            Ok(url) => url,
            Err(e) => {
                log::error!("Could not preview recording: {e:?}");
                return;
            }
        };
        audio.set_src(&url);
        let _ = audio.style().set_property("display", "block");
    }

    fn alert(&self, message: &str) {
        let _ = self.window.alert_with_message(message);
    }

    fn navigate(&self, path: &str) {
        if let Err(e) = self.window.location().set_href(path) {
            log::error!("Could not navigate to {path}: {e:?}");
        }
    }

    fn navigate_after(&self, path: &str, delay: Duration) {
        let location = self.window.location();
        let path = path.to_string();
        set_timeout(&self.window, delay, move || {
            if let Err(e) = location.set_href(&path) {
                log::error!("Could not navigate to {path}: {e:?}");
            }
        });
    }
}
