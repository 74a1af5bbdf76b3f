use std::cell::{Cell, RefCell};

use crate::dom::Dom;

/// Captured microphone audio, ready to upload as `recording.wav`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Recording {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl Recording {
    pub const MIME_TYPE: &'static str = "audio/wav";

    pub fn from_chunks(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            bytes: chunks.concat(),
            mime_type: Self::MIME_TYPE.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CaptureError {
    #[error("Audio recording is not supported in this browser")]
    Unsupported,
    #[error("Microphone access was denied: {0}")]
    PermissionDenied(String),
    #[error("Recorder error: {0}")]
    Recorder(String),
    #[error("No recording is in progress")]
    NotRecording,
}

/// A microphone that buffers chunks between `start` and `stop`.
#[allow(async_fn_in_trait)]
pub trait AudioSource {
    /// Resolves once the user granted access and the recorder is running.
    async fn start(&self) -> Result<(), CaptureError>;
    /// Resolves with every chunk captured since the last `start`.
    async fn stop(&self) -> Result<Vec<Vec<u8>>, CaptureError>;
}

impl<A: AudioSource> AudioSource for std::rc::Rc<A> {
    async fn start(&self) -> Result<(), CaptureError> {
        (**self).start().await
    }

    async fn stop(&self) -> Result<Vec<Vec<u8>>, CaptureError> {
        (**self).stop().await
    }
}

/// Element ids of the buttons and player that follow the recorder.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptureControls {
    pub start: &'static str,
    pub stop: &'static str,
    pub preview: &'static str,
    pub submit: Option<&'static str>,
    pub status: Option<&'static str>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Starting,
    Recording,
    Stopping,
}

pub struct MediaCapture<A> {
    source: A,
    controls: CaptureControls,
    state: Cell<CaptureState>,
    recording: RefCell<Option<Recording>>,
}

impl<A: AudioSource> MediaCapture<A> {
    pub fn new(source: A, controls: CaptureControls) -> Self {
        Self {
            source,
            controls,
            state: Cell::new(CaptureState::Idle),
            recording: RefCell::new(None),
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state.get()
    }

    pub fn recording(&self) -> Option<Recording> {
        self.recording.borrow().clone()
    }

    pub fn controls(&self) -> &CaptureControls {
        &self.controls
    }

    /// Starts the microphone. The buttons only flip once the recorder is actually running.
    pub async fn start_recording(&self, dom: &impl Dom) -> Result<(), CaptureError> {
        if self.state.get() != CaptureState::Idle {
            log::warn!("Recording already in progress");
            return Ok(());
        }
        self.recording.replace(None);
        if let Some(submit) = self.controls.submit {
            dom.set_disabled(submit, true);
        }
        self.state.set(CaptureState::Starting);

        match self.source.start().await {
            Ok(()) => {
                self.state.set(CaptureState::Recording);
                dom.set_disabled(self.controls.start, true);
                dom.set_disabled(self.controls.stop, false);
                if let Some(status) = self.controls.status {
                    dom.set_text(status, "Recording...");
                }
                log::info!("Recording started");
                Ok(())
            }
            Err(e) => {
                self.state.set(CaptureState::Idle);
                log::error!("Error accessing microphone: {e}");
                dom.set_disabled(self.controls.start, false);
                dom.set_disabled(self.controls.stop, true);
                if let Some(status) = self.controls.status {
                    dom.set_text(status, &e.to_string());
                }
                Err(e)
            }
        }
    }

    /// Stops the microphone, keeps the audio and shows it in the preview player.
    pub async fn stop_recording(&self, dom: &impl Dom) -> Result<Option<Recording>, CaptureError> {
        if self.state.get() != CaptureState::Recording {
            log::warn!("Stop requested while not recording");
            return Ok(None);
        }
        self.state.set(CaptureState::Stopping);
        let chunks = self.source.stop().await;
        self.state.set(CaptureState::Idle);
        dom.set_disabled(self.controls.start, false);
        dom.set_disabled(self.controls.stop, true);

        let recording = match chunks {
            Ok(chunks) => Recording::from_chunks(chunks),
            Err(e) => {
                log::error!("Error stopping recorder: {e}");
                if let Some(status) = self.controls.status {
                    dom.set_text(status, &e.to_string());
                }
                return Err(e);
            }
        };

        dom.show_audio(self.controls.preview, &recording);
        if let Some(status) = self.controls.status {
            dom.set_text(status, "Recording stopped.");
        }
        if let Some(submit) = self.controls.submit {
            dom.set_disabled(submit, false);
        }
        self.recording.replace(Some(recording.clone()));
        Ok(Some(recording))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeAudioSource, FakeDom};
    use futures::executor::block_on;

    fn controls() -> CaptureControls {
        CaptureControls {
            start: "start-recording",
            stop: "stop-recording",
            preview: "audio-playback",
            submit: Some("submit-recording"),
            status: Some("recording-status"),
        }
    }

    #[test]
    fn test_controls_follow_recorder_lifecycle() {
        let dom = FakeDom::default();
        let source = FakeAudioSource::with_chunks(vec![vec![1, 2, 3], vec![4]]);
        let capture = MediaCapture::new(source, controls());

        block_on(capture.start_recording(&dom)).unwrap();
        assert_eq!(capture.state(), CaptureState::Recording);
        assert_eq!(dom.disabled("start-recording"), Some(true));
        assert_eq!(dom.disabled("stop-recording"), Some(false));
        assert_eq!(dom.disabled("submit-recording"), Some(true));

        let recording = block_on(capture.stop_recording(&dom)).unwrap().unwrap();
        assert_eq!(recording.bytes, vec![1, 2, 3, 4]);
        assert_eq!(recording.mime_type, "audio/wav");
        assert_eq!(capture.state(), CaptureState::Idle);
        assert_eq!(dom.disabled("start-recording"), Some(false));
        assert_eq!(dom.disabled("stop-recording"), Some(true));
        assert_eq!(dom.disabled("submit-recording"), Some(false));
        assert_eq!(dom.audio("audio-playback"), Some(recording.clone()));
        assert_eq!(capture.recording(), Some(recording));
    }

    #[test]
    fn test_denied_microphone_leaves_start_enabled() {
        let dom = FakeDom::default();
        let source = FakeAudioSource::denied("NotAllowedError");
        let capture = MediaCapture::new(source, controls());

        let error = block_on(capture.start_recording(&dom)).unwrap_err();
        assert_eq!(error, CaptureError::PermissionDenied("NotAllowedError".to_string()));
        assert_eq!(capture.state(), CaptureState::Idle);
        assert_eq!(dom.disabled("start-recording"), Some(false));
        assert_eq!(dom.disabled("stop-recording"), Some(true));
        assert!(dom.text("recording-status").unwrap().contains("denied"));
    }

    #[test]
    fn test_stop_without_start_is_ignored() {
        let dom = FakeDom::default();
        let source = FakeAudioSource::with_chunks(vec![vec![1]]);
        let capture = MediaCapture::new(source, controls());

        assert_eq!(block_on(capture.stop_recording(&dom)), Ok(None));
        assert_eq!(capture.recording(), None);
        assert_eq!(dom.audio("audio-playback"), None);
    }

    #[test]
    fn test_second_take_replaces_first() {
        let dom = FakeDom::default();
        let source = FakeAudioSource::with_chunks(vec![vec![1]]);
        let capture = MediaCapture::new(source, controls());

        block_on(capture.start_recording(&dom)).unwrap();
        block_on(capture.stop_recording(&dom)).unwrap();
        block_on(capture.start_recording(&dom)).unwrap();
        assert_eq!(capture.recording(), None);
        block_on(capture.stop_recording(&dom)).unwrap();
        assert_eq!(capture.recording().map(|r| r.bytes), Some(vec![1]));
    }
}
