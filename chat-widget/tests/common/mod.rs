//! Test doubles shared by the conversation tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bestar_core::{CaptureError, Envelope, Reply};
use media_capture::{MediaStream, MediaTrack, Microphone};
use tokio::sync::{mpsc, Notify};
use webhook_client::ChatTransport;

/// Transport that records every envelope and answers with a fixed reply.
///
/// When built with [`MockTransport::gated`], each send waits for [`MockTransport::release`].
pub struct MockTransport {
    reply: String,
    sent: Mutex<Vec<Envelope>>,
    gate: Option<Notify>,
}

impl MockTransport {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            sent: Mutex::new(Vec::new()),
            gate: None,
        })
    }

    pub fn gated(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            sent: Mutex::new(Vec::new()),
            gate: Some(Notify::new()),
        })
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn sent(&self) -> Vec<Envelope> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn send(&self, envelope: &Envelope) -> Reply {
        self.sent.lock().unwrap().push(envelope.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        Reply::new(self.reply.clone())
    }
}

pub struct TestTrack {
    live: AtomicBool,
}

impl MediaTrack for TestTrack {
    fn stop(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

/// Microphone whose chunks are pushed by the test while recording.
pub struct TestMicrophone {
    deny: bool,
    track: Mutex<Option<Arc<TestTrack>>>,
    sender: Mutex<Option<mpsc::UnboundedSender<Vec<u8>>>>,
}

impl TestMicrophone {
    pub fn granting() -> Arc<Self> {
        Arc::new(Self {
            deny: false,
            track: Mutex::new(None),
            sender: Mutex::new(None),
        })
    }

    pub fn denying() -> Arc<Self> {
        Arc::new(Self {
            deny: true,
            track: Mutex::new(None),
            sender: Mutex::new(None),
        })
    }

    pub fn emit(&self, chunk: &[u8]) {
        let sender = self.sender.lock().unwrap();
        sender.as_ref().expect("microphone open").send(chunk.to_vec()).unwrap();
    }

    /// Whether the last opened track is still capturing.
    pub fn is_live(&self) -> bool {
        self.track
            .lock()
            .unwrap()
            .as_ref()
            .map(|t| t.is_live())
            .unwrap_or(false)
    }
}

#[async_trait]
impl Microphone for TestMicrophone {
    async fn open(&self) -> Result<MediaStream, CaptureError> {
        if self.deny {
            return Err(CaptureError::PermissionDenied("NotAllowedError".to_string()));
        }
        let track = Arc::new(TestTrack {
            live: AtomicBool::new(true),
        });
        let (tx, rx) = mpsc::unbounded_channel();
        *self.track.lock().unwrap() = Some(track.clone());
        *self.sender.lock().unwrap() = Some(tx);
        Ok(MediaStream::new("audio/webm", rx, vec![track as Arc<dyn MediaTrack>]))
    }
}

/// Microphone whose permission prompt stays open until [`PromptingMicrophone::grant`].
pub struct PromptingMicrophone {
    pub device: Arc<TestMicrophone>,
    prompt: Notify,
}

impl PromptingMicrophone {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            device: TestMicrophone::granting(),
            prompt: Notify::new(),
        })
    }

    pub fn grant(&self) {
        self.prompt.notify_one();
    }
}

#[async_trait]
impl Microphone for PromptingMicrophone {
    async fn open(&self) -> Result<MediaStream, CaptureError> {
        self.prompt.notified().await;
        self.device.open().await
    }
}
