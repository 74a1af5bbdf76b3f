use std::time::Duration;

use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Notification, NotificationOptions, NotificationPermission};

use super::set_timeout;
use crate::motivation::{Notifier, Permission};

/// The Notifications API.
pub struct BrowserNotifier;

impl Notifier for BrowserNotifier {
    fn is_supported(&self) -> bool {
        web_sys::window()
            .map(|window| js_sys::Reflect::has(&window, &JsValue::from_str("Notification")).unwrap_or(false))
            .unwrap_or(false)
    }

    fn permission(&self) -> Permission {
        match Notification::permission() {
            NotificationPermission::Granted => Permission::Granted,
            NotificationPermission::Denied => Permission::Denied,
            _ => Permission::Default,
        }
    }

    async fn request_permission(&self) -> Permission {
        let promise = match Notification::request_permission() {
            Ok(promise) => promise,
            Err(e) => {
                log::error!("Could not request notification permission: {e:?}");
                return Permission::Default;
            }
        };
        match JsFuture::from(promise).await.ok().and_then(|answer| answer.as_string()).as_deref() {
            Some("granted") => Permission::Granted,
            Some("denied") => Permission::Denied,
            _ => Permission::Default,
        }
    }

    fn schedule(&self, title: &str, body: &str, delay: Duration) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let title = title.to_string();
        let body = body.to_string();
        set_timeout(&window, delay, move || {
            let options = NotificationOptions::new();
            options.set_body(&body);
            if let Err(e) = Notification::new_with_options(&title, &options) {
                log::error!("Could not show reminder: {e:?}");
            }
        });
    }
}
