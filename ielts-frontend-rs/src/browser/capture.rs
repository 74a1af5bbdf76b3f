use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobEvent, MediaRecorder, MediaStream, MediaStreamConstraints, MediaStreamTrack};

use super::js_error_message;
use crate::capture::{AudioSource, CaptureError};

fn recorder_error(e: JsValue) -> CaptureError {
    CaptureError::Recorder(js_error_message(&e))
}

struct Session {
    recorder: MediaRecorder,
    stream: MediaStream,
    chunks: Rc<RefCell<Vec<Blob>>>,
    _on_data: Closure<dyn FnMut(BlobEvent)>,
}

/// The microphone through `getUserMedia` and `MediaRecorder`.
/// Every `start` opens a new stream with its own chunk buffer.
#[derive(Default)]
pub struct BrowserAudioSource {
    session: RefCell<Option<Session>>,
}

impl BrowserAudioSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioSource for BrowserAudioSource {
    async fn start(&self) -> Result<(), CaptureError> {
        let window = web_sys::window().ok_or(CaptureError::Unsupported)?;
        let media_devices = window
            .navigator()
            .media_devices()
            .map_err(|_| CaptureError::Unsupported)?;

        let constraints = MediaStreamConstraints::new();
        constraints.set_audio(&JsValue::TRUE);
        constraints.set_video(&JsValue::FALSE);
        let promise = media_devices
            .get_user_media_with_constraints(&constraints)
            .map_err(|_| CaptureError::Unsupported)?;
        let stream: MediaStream = JsFuture::from(promise)
            .await
            .map_err(|e| CaptureError::PermissionDenied(js_error_message(&e)))?
            .dyn_into()
            .map_err(recorder_error)?;

        let recorder = MediaRecorder::new_with_media_stream(&stream).map_err(recorder_error)?;
        let chunks = Rc::new(RefCell::new(Vec::new()));
        let sink = chunks.clone();
        let on_data = Closure::<dyn FnMut(BlobEvent)>::new(move |event: BlobEvent| {
            if let Some(blob) = event.data() {
                sink.borrow_mut().push(blob);
            }
        });
        recorder.set_ondataavailable(Some(on_data.as_ref().unchecked_ref()));
        recorder.start().map_err(recorder_error)?;

        if let Some(previous) = self.session.replace(Some(Session {
            recorder,
            stream,
            chunks,
            _on_data: on_data,
        })) {
            log::warn!("Discarding a recorder that was never stopped");
            stop_tracks(&previous.stream);
        }
        Ok(())
    }

    async fn stop(&self) -> Result<Vec<Vec<u8>>, CaptureError> {
        let session = self
            .session
            .borrow_mut()
            .take()
            .ok_or(CaptureError::NotRecording)?;

        // the last chunk arrives before `stop` fires
        let (sender, receiver) = oneshot::channel::<()>();
        let mut sender = Some(sender);
        let on_stop = Closure::<dyn FnMut()>::new(move || {
            if let Some(sender) = sender.take() {
                let _ = sender.send(());
            }
        });
        session
            .recorder
            .set_onstop(Some(on_stop.as_ref().unchecked_ref()));
        session.recorder.stop().map_err(recorder_error)?;
        let _ = receiver.await;
        session.recorder.set_onstop(None);
        stop_tracks(&session.stream);

        let blobs = session.chunks.borrow().clone();
        let mut chunks = Vec::with_capacity(blobs.len());
        for blob in blobs {
            let buffer = JsFuture::from(blob.array_buffer())
                .await
                .map_err(recorder_error)?;
            chunks.push(js_sys::Uint8Array::new(&buffer).to_vec());
        }
        log::info!("Captured {} audio chunks", chunks.len());
        Ok(chunks)
    }
}

fn stop_tracks(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
}
