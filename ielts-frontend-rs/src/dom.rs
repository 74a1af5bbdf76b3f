use std::rc::Rc;
use std::time::Duration;

use crate::capture::Recording;

/// The slice of the page the handlers read from and write to.
/// Elements are addressed by id, form controls by their `name` attribute.
/// A missing element is not an error: writes are dropped and reads return `None`.
pub trait Dom {
    fn set_html(&self, id: &str, html: &str);
    fn append_html(&self, id: &str, html: &str);
    fn set_text(&self, id: &str, text: &str);
    fn set_disabled(&self, id: &str, disabled: bool);
    /// Value of the input, textarea or select with this id.
    fn value(&self, id: &str) -> Option<String>;
    fn set_value(&self, id: &str, value: &str);
    /// Value of the checked radio button in the group `name`.
    fn checked_value(&self, name: &str) -> Option<String>;
    /// Value of the textarea named `name`.
    fn field_value(&self, name: &str) -> Option<String>;
    fn scroll_to_bottom(&self, id: &str);
    /// Points the audio element at the recording and makes it visible.
    fn show_audio(&self, id: &str, recording: &Recording);
    fn alert(&self, message: &str);
    fn navigate(&self, path: &str);
    fn navigate_after(&self, path: &str, delay: Duration);
}

impl<D: Dom> Dom for Rc<D> {
    fn set_html(&self, id: &str, html: &str) {
        (**self).set_html(id, html)
    }

    fn append_html(&self, id: &str, html: &str) {
        (**self).append_html(id, html)
    }

    fn set_text(&self, id: &str, text: &str) {
        (**self).set_text(id, text)
    }

    fn set_disabled(&self, id: &str, disabled: bool) {
        (**self).set_disabled(id, disabled)
    }

    fn value(&self, id: &str) -> Option<String> {
        (**self).value(id)
    }

    fn set_value(&self, id: &str, value: &str) {
        (**self).set_value(id, value)
    }

    fn checked_value(&self, name: &str) -> Option<String> {
        (**self).checked_value(name)
    }

    fn field_value(&self, name: &str) -> Option<String> {
        (**self).field_value(name)
    }

    fn scroll_to_bottom(&self, id: &str) {
        (**self).scroll_to_bottom(id)
    }

    fn show_audio(&self, id: &str, recording: &Recording) {
        (**self).show_audio(id, recording)
    }

    fn alert(&self, message: &str) {
        (**self).alert(message)
    }

    fn navigate(&self, path: &str) {
        (**self).navigate(path)
    }

    fn navigate_after(&self, path: &str, delay: Duration) {
        (**self).navigate_after(path, delay)
    }
}
