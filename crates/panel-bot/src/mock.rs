//! In-memory transport for unit testing without a Discord connection.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use panel_types::{InputForm, InteractionRef, MessageContent, Responder, TransportError};

use crate::transport::PanelTransport;

/// First id handed out by `send_message`.
pub const FIRST_MESSAGE_ID: u64 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub channel_id: u64,
    pub message_id: u64,
    pub content: MessageContent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditedMessage {
    pub channel_id: u64,
    pub message_id: u64,
    pub content: MessageContent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub responder: Responder,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PresentedForm {
    pub interaction: InteractionRef,
    pub form: InputForm,
}

/// One entry in the ordered call log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Send { channel_id: u64 },
    Fetch { channel_id: u64, message_id: u64 },
    Edit { channel_id: u64, message_id: u64 },
    Respond,
    Form,
}

#[derive(Default)]
struct Calls {
    log: Vec<Call>,
    sent: Vec<SentMessage>,
    edited: Vec<EditedMessage>,
    fetched: Vec<(u64, u64)>,
    responses: Vec<Response>,
    forms: Vec<PresentedForm>,
}

/// Records every outbound call. Messages it sends are "live" and can be
/// fetched until `delete_message` is called.
#[derive(Clone)]
pub struct MockTransport {
    calls: Arc<Mutex<Calls>>,
    live: Arc<Mutex<HashSet<(u64, u64)>>>,
    failing_channels: Arc<Mutex<HashSet<u64>>>,
    next_id: Arc<AtomicU64>,
    fail_fetch_network: Arc<AtomicBool>,
    fail_edits: Arc<AtomicBool>,
    fail_responses: Arc<AtomicBool>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Calls::default())),
            live: Arc::new(Mutex::new(HashSet::new())),
            failing_channels: Arc::new(Mutex::new(HashSet::new())),
            next_id: Arc::new(AtomicU64::new(FIRST_MESSAGE_ID)),
            fail_fetch_network: Arc::new(AtomicBool::new(false)),
            fail_edits: Arc::new(AtomicBool::new(false)),
            fail_responses: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Pretend a message already exists (e.g. a panel from a previous run).
    pub fn insert_message(&self, channel_id: u64, message_id: u64) {
        self.live.lock().unwrap().insert((channel_id, message_id));
    }

    /// Simulate someone deleting a message.
    pub fn delete_message(&self, channel_id: u64, message_id: u64) {
        self.live.lock().unwrap().remove(&(channel_id, message_id));
    }

    /// Sends to this channel fail with a network error.
    pub fn fail_channel(&self, channel_id: u64) {
        self.failing_channels.lock().unwrap().insert(channel_id);
    }

    pub fn fail_fetch_with_network_error(&self, fail: bool) {
        self.fail_fetch_network.store(fail, Ordering::SeqCst);
    }

    pub fn fail_edits(&self, fail: bool) {
        self.fail_edits.store(fail, Ordering::SeqCst);
    }

    pub fn fail_responses(&self, fail: bool) {
        self.fail_responses.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.calls.lock().unwrap().sent.clone()
    }

    pub fn sent_to(&self, channel_id: u64) -> Vec<SentMessage> {
        self.sent()
            .into_iter()
            .filter(|m| m.channel_id == channel_id)
            .collect()
    }

    pub fn edited(&self) -> Vec<EditedMessage> {
        self.calls.lock().unwrap().edited.clone()
    }

    pub fn fetched(&self) -> Vec<(u64, u64)> {
        self.calls.lock().unwrap().fetched.clone()
    }

    pub fn responses(&self) -> Vec<Response> {
        self.calls.lock().unwrap().responses.clone()
    }

    pub fn forms(&self) -> Vec<PresentedForm> {
        self.calls.lock().unwrap().forms.clone()
    }

    /// Every recorded call, in the order it happened.
    pub fn call_log(&self) -> Vec<Call> {
        self.calls.lock().unwrap().log.clone()
    }

    fn network_error(what: &str) -> TransportError {
        TransportError::network(format!("simulated {} failure", what))
    }
}

impl PanelTransport for MockTransport {
    async fn send_message(
        &self,
        channel_id: u64,
        content: &MessageContent,
    ) -> Result<u64, TransportError> {
        // Suspend like a real HTTP call so concurrent callers interleave.
        tokio::task::yield_now().await;
        if self.failing_channels.lock().unwrap().contains(&channel_id) {
            return Err(Self::network_error("send"));
        }
        let message_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.live.lock().unwrap().insert((channel_id, message_id));
        let mut calls = self.calls.lock().unwrap();
        calls.log.push(Call::Send { channel_id });
        calls.sent.push(SentMessage {
            channel_id,
            message_id,
            content: content.clone(),
        });
        Ok(message_id)
    }

    async fn fetch_message(&self, channel_id: u64, message_id: u64) -> Result<(), TransportError> {
        tokio::task::yield_now().await;
        {
            let mut calls = self.calls.lock().unwrap();
            calls.log.push(Call::Fetch {
                channel_id,
                message_id,
            });
            calls.fetched.push((channel_id, message_id));
        }
        if self.fail_fetch_network.load(Ordering::SeqCst) {
            return Err(Self::network_error("fetch"));
        }
        if self.live.lock().unwrap().contains(&(channel_id, message_id)) {
            Ok(())
        } else {
            Err(TransportError::not_found("Unknown Message"))
        }
    }

    async fn edit_message(
        &self,
        channel_id: u64,
        message_id: u64,
        content: &MessageContent,
    ) -> Result<(), TransportError> {
        tokio::task::yield_now().await;
        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(Self::network_error("edit"));
        }
        if !self.live.lock().unwrap().contains(&(channel_id, message_id)) {
            return Err(TransportError::not_found("Unknown Message"));
        }
        let mut calls = self.calls.lock().unwrap();
        calls.log.push(Call::Edit {
            channel_id,
            message_id,
        });
        calls.edited.push(EditedMessage {
            channel_id,
            message_id,
            content: content.clone(),
        });
        Ok(())
    }

    async fn respond(&self, responder: &Responder, text: &str) -> Result<(), TransportError> {
        if self.fail_responses.load(Ordering::SeqCst) {
            return Err(Self::network_error("respond"));
        }
        let mut calls = self.calls.lock().unwrap();
        calls.log.push(Call::Respond);
        calls.responses.push(Response {
            responder: responder.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn present_input_form(
        &self,
        interaction: &InteractionRef,
        form: &InputForm,
    ) -> Result<(), TransportError> {
        if self.fail_responses.load(Ordering::SeqCst) {
            return Err(Self::network_error("modal"));
        }
        let mut calls = self.calls.lock().unwrap();
        calls.log.push(Call::Form);
        calls.forms.push(PresentedForm {
            interaction: interaction.clone(),
            form: form.clone(),
        });
        Ok(())
    }
}
