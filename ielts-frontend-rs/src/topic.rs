use std::cell::RefCell;

use crate::api::{ApiClient, ApiError, Transport};
use crate::dom::Dom;

pub(crate) const TOPIC_DISPLAY_ID: &str = "topic-display";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TopicKind {
    Writing,
    Speaking,
}

impl TopicKind {
    pub fn endpoint(self) -> &'static str {
        match self {
            TopicKind::Writing => "/api/get_writing_topic",
            TopicKind::Speaking => "/api/get_speaking_topic",
        }
    }
}

/// Holds the topic the user is currently practising, fetched or typed in.
/// A typed topic wins over the fetched one until the field is cleared.
pub struct TopicPicker {
    kind: TopicKind,
    fetched: RefCell<Option<String>>,
    custom: RefCell<Option<String>>,
}

impl TopicPicker {
    pub fn new(kind: TopicKind) -> Self {
        Self {
            kind,
            fetched: RefCell::new(None),
            custom: RefCell::new(None),
        }
    }

    pub fn current(&self) -> Option<String> {
        self.custom
            .borrow()
            .clone()
            .or_else(|| self.fetched.borrow().clone())
    }

    pub async fn fetch<T: Transport>(
        &self,
        api: &ApiClient<T>,
        dom: &impl Dom,
    ) -> Result<String, ApiError> {
        match api.get_topic(self.kind).await {
            Ok(response) => {
                self.custom.replace(None);
                self.fetched.replace(Some(response.topic.clone()));
                self.show(dom);
                Ok(response.topic)
            }
            Err(e) => {
                log::error!("Error fetching {:?} topic: {e}", self.kind);
                Err(e)
            }
        }
    }

    /// Blank input drops the typed topic and falls back to the fetched one, if any.
    /// Returns whether a typed topic is now in use.
    pub fn set_custom(&self, dom: &impl Dom, topic: &str) -> bool {
        let topic = topic.trim();
        let custom = (!topic.is_empty()).then(|| topic.to_string());
        let in_use = custom.is_some();
        self.custom.replace(custom);
        self.show(dom);
        in_use
    }

    fn show(&self, dom: &impl Dom) {
        match self.current() {
            Some(topic) => dom.set_text(TOPIC_DISPLAY_ID, &format!("Topic: {topic}")),
            None => dom.set_text(TOPIC_DISPLAY_ID, ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeDom, MockTransport};
    use futures::executor::block_on;
    use serde_json::json;
    use std::rc::Rc;

    #[test]
    fn test_fetched_topic_is_shown_and_kept() {
        let transport = Rc::new(MockTransport::default());
        transport.respond("/api/get_writing_topic", json!({"topic": "Urban living"}));
        let api = ApiClient::new(transport);
        let dom = FakeDom::default();
        let picker = TopicPicker::new(TopicKind::Writing);

        assert_eq!(block_on(picker.fetch(&api, &dom)).unwrap(), "Urban living");
        assert_eq!(dom.text(TOPIC_DISPLAY_ID).as_deref(), Some("Topic: Urban living"));
        assert_eq!(picker.current().as_deref(), Some("Urban living"));
    }

    #[test]
    fn test_failed_fetch_keeps_previous_topic() {
        let transport = Rc::new(MockTransport::default());
        transport.fail("/api/get_speaking_topic", ApiError::Status(500));
        let api = ApiClient::new(transport);
        let dom = FakeDom::default();
        let picker = TopicPicker::new(TopicKind::Speaking);
        picker.set_custom(&dom, "My hometown");

        assert!(block_on(picker.fetch(&api, &dom)).is_err());
        assert_eq!(picker.current().as_deref(), Some("My hometown"));
    }

    #[test]
    fn test_blank_custom_topic_leaves_no_topic() {
        let dom = FakeDom::default();
        let picker = TopicPicker::new(TopicKind::Writing);
        assert!(picker.set_custom(&dom, "Remote work"));
        assert_eq!(picker.current().as_deref(), Some("Remote work"));

        assert!(!picker.set_custom(&dom, "   "));
        assert_eq!(picker.current(), None);
        assert_eq!(dom.text(TOPIC_DISPLAY_ID).as_deref(), Some(""));
    }

    #[test]
    fn test_clearing_custom_topic_falls_back_to_fetched() {
        let transport = Rc::new(MockTransport::default());
        transport.respond("/api/get_writing_topic", json!({"topic": "Urban living"}));
        let api = ApiClient::new(transport);
        let dom = FakeDom::default();
        let picker = TopicPicker::new(TopicKind::Writing);
        block_on(picker.fetch(&api, &dom)).unwrap();

        picker.set_custom(&dom, "Remote work");
        assert_eq!(dom.text(TOPIC_DISPLAY_ID).as_deref(), Some("Topic: Remote work"));

        picker.set_custom(&dom, "");
        assert_eq!(picker.current().as_deref(), Some("Urban living"));
        assert_eq!(dom.text(TOPIC_DISPLAY_ID).as_deref(), Some("Topic: Urban living"));
    }
}
