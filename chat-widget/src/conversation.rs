//! Conversation state machine.
//!
//! The inner lock is only held for synchronous bookkeeping and is always released before an
//! await point (encode, permission prompt, webhook call).

use crate::log::MessageLog;
use crate::state::{ConversationState, SendOutcome, SkipReason};
use crate::texts::ConversationTexts;
use bestar_core::{CaptureError, Envelope, Identity, Message, Role, ValidationError};
use media_capture::{AudioRecorder, ImageAdapter, PickedFile, RecordingSession};
use session_store::{Registration, SessionStore};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};
use webhook_client::ChatTransport;

struct Inner {
    state: ConversationState,
    log: MessageLog,
    recording: Option<RecordingSession>,
    /// Microphone permission prompt outstanding.
    recording_pending: bool,
    /// Bumped by cancel/shutdown; a grant arriving for an older generation is released.
    recording_generation: u64,
}

impl Inner {
    fn busy(&self) -> bool {
        self.state == ConversationState::Sending
            || self.recording.is_some()
            || self.recording_pending
    }
}

/// Chat conversation over an injected session store and transport.
pub struct Conversation {
    registration: Registration,
    transport: Arc<dyn ChatTransport>,
    images: ImageAdapter,
    recorder: Option<AudioRecorder>,
    texts: ConversationTexts,
    inner: Mutex<Inner>,
}

/// Puts the conversation back to Idle when dropped, so no path can leave it in Sending.
struct SendingGuard<'a> {
    inner: &'a Mutex<Inner>,
}

impl<'a> SendingGuard<'a> {
    fn finish(self, role: Role, text: String) {
        let mut inner = lock(self.inner);
        inner.log.push(role, text, false);
        inner.state = ConversationState::Idle;
    }
}

impl Drop for SendingGuard<'_> {
    fn drop(&mut self) {
        let mut inner = lock(self.inner);
        if inner.state == ConversationState::Sending {
            inner.state = ConversationState::Idle;
        }
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Conversation {
    /// New conversation. Starts `Idle` if the store already holds an identity, else `Gated`.
    pub fn new(store: Arc<dyn SessionStore>, transport: Arc<dyn ChatTransport>) -> Self {
        let registration = Registration::new(store);
        let state = if registration.has_identity() {
            ConversationState::Idle
        } else {
            ConversationState::Gated
        };
        let texts = ConversationTexts::default();
        let mut log = MessageLog::new();
        if let Some(greeting) = &texts.greeting {
            log.push(Role::Assistant, greeting.clone(), false);
        }
        Self {
            registration,
            transport,
            images: ImageAdapter::default(),
            recorder: None,
            texts,
            inner: Mutex::new(Inner {
                state,
                log,
                recording: None,
                recording_pending: false,
                recording_generation: 0,
            }),
        }
    }

    /// Replaces the texts; the greeting (if any) is re-seeded into an untouched log.
    pub fn with_texts(mut self, texts: ConversationTexts) -> Self {
        {
            let inner = self.inner.get_mut().unwrap_or_else(|p| p.into_inner());
            let untouched = inner.log.len() <= usize::from(self.texts.greeting.is_some());
            if untouched {
                inner.log = MessageLog::new();
                if let Some(greeting) = &texts.greeting {
                    inner.log.push(Role::Assistant, greeting.clone(), false);
                }
            }
        }
        self.texts = texts;
        self
    }

    pub fn with_image_adapter(mut self, images: ImageAdapter) -> Self {
        self.images = images;
        self
    }

    /// Microphone used by [`start_recording`](Self::start_recording).
    pub fn with_recorder(mut self, recorder: AudioRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn texts(&self) -> &ConversationTexts {
        &self.texts
    }

    pub fn state(&self) -> ConversationState {
        lock(&self.inner).state
    }

    /// Snapshot of the log.
    pub fn messages(&self) -> Vec<Message> {
        lock(&self.inner).log.messages().to_vec()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.registration.current_identity()
    }

    /// Whether the send controls are enabled.
    pub fn can_send(&self) -> bool {
        let inner = lock(&self.inner);
        inner.state == ConversationState::Idle && !inner.busy()
    }

    pub fn is_recording(&self) -> bool {
        lock(&self.inner).recording.is_some()
    }

    /// Elapsed recording time as `MM:SS`; also buffers chunks emitted so far.
    pub fn recording_elapsed(&self) -> Option<String> {
        let mut inner = lock(&self.inner);
        inner.recording.as_mut().map(|session| {
            session.collect_pending();
            session.elapsed_display()
        })
    }

    /// Registers the visitor and opens the gate (`Gated → Idle`).
    pub fn register(&self, name: &str, phone: &str) -> Result<Identity, ValidationError> {
        let identity = self.registration.register(name, phone)?;
        let mut inner = lock(&self.inner);
        if inner.state == ConversationState::Gated {
            inner.state = ConversationState::Idle;
            info!(session_id = %identity.session_id(), "step: conversation Gated -> Idle");
        }
        Ok(identity)
    }

    /// Returns why a new send cannot start, if it cannot.
    fn refuse(&self, inner: &Inner) -> Option<SkipReason> {
        match inner.state {
            ConversationState::Gated => Some(SkipReason::Gated),
            _ if inner.busy() => Some(SkipReason::Busy),
            _ => None,
        }
    }

    /// Appends `text` as a user message and sends it. Blank input is ignored.
    pub async fn send_text(&self, text: &str) -> SendOutcome {
        let envelope = {
            let mut inner = lock(&self.inner);
            if let Some(reason) = self.refuse(&inner) {
                return SendOutcome::Skipped(reason);
            }
            if text.trim().is_empty() {
                return SendOutcome::Skipped(SkipReason::EmptyInput);
            }
            inner.log.push(Role::User, text, false);
            inner.state = ConversationState::Sending;
            Envelope::text(self.identity().as_ref(), text)
        };
        info!(message_type = "text", "step: conversation Idle -> Sending");

        let guard = SendingGuard { inner: &self.inner };
        self.deliver(guard, envelope).await
    }

    /// Sends a picked image. Files over the size cap are rejected with a system message.
    pub async fn send_image(&self, file: PickedFile) -> SendOutcome {
        let identity = {
            let mut inner = lock(&self.inner);
            if let Some(reason) = self.refuse(&inner) {
                return SendOutcome::Skipped(reason);
            }
            if let Err(e) = self.images.check(&file) {
                warn!(error = %e, name = %file.name, "image rejected");
                inner
                    .log
                    .push(Role::System, self.texts.media_too_large.clone(), false);
                return SendOutcome::Rejected(e);
            }
            inner
                .log
                .push(Role::User, self.texts.image_placeholder.clone(), true);
            inner.state = ConversationState::Sending;
            self.identity()
        };
        info!(message_type = "image", size = file.size(), "step: conversation Idle -> Sending");

        let guard = SendingGuard { inner: &self.inner };
        let uri = match self.images.encode(&file).await {
            Ok(uri) => uri,
            Err(e) => {
                warn!(error = %e, "image encode failed");
                guard.finish(Role::System, self.texts.capture_failed.clone());
                return SendOutcome::Rejected(e);
            }
        };
        let envelope = Envelope::image(identity.as_ref(), self.texts.image_caption.clone(), uri);
        self.deliver(guard, envelope).await
    }

    /// Requests the configured microphone and starts recording.
    pub async fn start_recording(&self) -> SendOutcome {
        match self.recorder.clone() {
            Some(recorder) => self.start_recording_with(&recorder).await,
            None => {
                self.start_recording_failed(CaptureError::PermissionDenied(
                    "no microphone configured".to_string(),
                ))
            }
        }
    }

    /// Starts recording from the given recorder. On denial a system message is appended.
    ///
    /// If the recording is cancelled (or the conversation shut down) while the prompt is still
    /// open, a late grant is released immediately and `Skipped(Cancelled)` is returned.
    pub async fn start_recording_with(&self, recorder: &AudioRecorder) -> SendOutcome {
        let generation = {
            let mut inner = lock(&self.inner);
            if let Some(reason) = self.refuse(&inner) {
                return SendOutcome::Skipped(reason);
            }
            inner.recording_pending = true;
            inner.recording_generation
        };

        let result = recorder.start().await;

        let mut inner = lock(&self.inner);
        inner.recording_pending = false;
        if inner.recording_generation != generation {
            if let Ok(mut session) = result {
                session.release();
            }
            info!("step: microphone prompt cancelled before grant");
            return SendOutcome::Skipped(SkipReason::Cancelled);
        }
        match result {
            Ok(session) => {
                inner.recording = Some(session);
                SendOutcome::Recording
            }
            Err(e) => {
                drop(inner);
                self.start_recording_failed(e)
            }
        }
    }

    fn start_recording_failed(&self, e: CaptureError) -> SendOutcome {
        let mut inner = lock(&self.inner);
        if let Some(reason) = self.refuse(&inner) {
            return SendOutcome::Skipped(reason);
        }
        warn!(error = %e, "microphone unavailable");
        inner
            .log
            .push(Role::System, self.texts.permission_denied.clone(), false);
        SendOutcome::Rejected(e)
    }

    /// Stops the recording, releases the microphone and sends the audio.
    ///
    /// Without an active recording this is a no-op. An empty recording is released but not sent.
    pub async fn stop_recording(&self) -> SendOutcome {
        let (audio, identity) = {
            let mut inner = lock(&self.inner);
            let Some(mut session) = inner.recording.take() else {
                return SendOutcome::Skipped(SkipReason::NotRecording);
            };
            let Some(audio) = session.finish() else {
                return SendOutcome::Skipped(SkipReason::NotRecording);
            };
            if audio.is_empty() {
                info!("empty recording discarded");
                return SendOutcome::Skipped(SkipReason::EmptyInput);
            }
            inner
                .log
                .push(Role::User, self.texts.audio_placeholder.clone(), true);
            inner.state = ConversationState::Sending;
            (audio, self.identity())
        };
        info!(message_type = "audio", bytes = audio.bytes.len(), "step: conversation Idle -> Sending");

        let guard = SendingGuard { inner: &self.inner };
        let uri = audio.encode().await;
        let envelope = Envelope::audio(identity.as_ref(), uri);
        self.deliver(guard, envelope).await
    }

    /// Discards the active recording, or a pending microphone prompt, without sending.
    /// Returns whether either was active.
    pub fn cancel_recording(&self) -> bool {
        let (session, pending) = {
            let mut inner = lock(&self.inner);
            inner.recording_generation += 1;
            (inner.recording.take(), inner.recording_pending)
        };
        match session {
            Some(mut session) => {
                session.release();
                true
            }
            None => pending,
        }
    }

    /// Teardown (widget unmount): releases any active recording or pending grant.
    pub fn shutdown(&self) {
        if self.cancel_recording() {
            info!("step: conversation shut down mid-recording");
        }
    }

    async fn deliver(&self, guard: SendingGuard<'_>, envelope: Envelope) -> SendOutcome {
        let reply = self.transport.send(&envelope).await;
        guard.finish(Role::Assistant, reply.reply_text);
        info!("step: conversation Sending -> Idle");
        SendOutcome::Delivered
    }
}

impl Drop for Conversation {
    fn drop(&mut self) {
        self.shutdown();
    }
}
