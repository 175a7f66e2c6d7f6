//! Operator event dispatch.
//!
//! Each inbound event walks a `Flow`:
//! 1. Validating: unknown controls are dropped without a reply.
//! 2. Fire-and-forget actions go straight to Executing: announce, audit,
//!    acknowledge, then render the panel.
//! 3. Time-input actions park in AwaitingInput until the operator submits the
//!    form. Pending prompts expire after `input_timeout`.
//!
//! The operator is acknowledged before the panel render starts, and render
//! failures never reach the operator.

#[path = "dispatcher_tests.rs"]
mod dispatcher_tests;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use panel_types::view::{announcement_message, time_input_form};
use panel_types::{
    ActionKind, Actor, Flow, FlowState, InteractionRef, OperatorEvent, PanelError, Responder,
};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::audit::AuditLog;
use crate::clock::Clock;
use crate::controller::PanelController;
use crate::store::PanelStore;
use crate::transport::PanelTransport;

/// Matches the lifetime of a Discord interaction token.
pub const DEFAULT_INPUT_TIMEOUT: Duration = Duration::from_secs(15 * 60);

pub const RECREATED_TEXT: &str = "✅ Control panel recreated.";
pub const WRONG_CHANNEL_TEXT: &str = "❌ This command can only be used in the control panel channel.";
pub const RECREATE_FAILED_TEXT: &str = "❌ Failed to recreate the control panel.";
pub const EMPTY_TIME_TEXT: &str = "❌ Please enter a time, it cannot be empty.";
pub const EXPIRED_TEXT: &str = "⌛ This prompt has expired. Press the button again.";

/// What a single event led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Not a recognised control; nothing happened.
    Ignored,
    /// Input form shown; waiting for submission.
    AwaitingInput(ActionKind),
    /// Submission was empty; still waiting.
    InputRejected(ActionKind),
    /// Submission arrived with no live prompt.
    InputExpired(ActionKind),
    Completed(ActionKind),
    /// The announcement (or the form) could not be sent.
    ActionFailed(ActionKind),
    PanelRecreated(u64),
    PermissionDenied,
    RecreateFailed,
}

#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub announcement_channel_id: Option<u64>,
    pub input_timeout: Duration,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            announcement_channel_id: None,
            input_timeout: DEFAULT_INPUT_TIMEOUT,
        }
    }
}

/// A prompt waiting for one operator's time value.
#[derive(Debug)]
struct PendingInput {
    requested_at: Instant,
    flow: Flow,
}

type PendingKey = (u64, ActionKind);

pub struct ActionDispatcher<T, S, C> {
    transport: Arc<T>,
    controller: Arc<PanelController<T, S>>,
    audit: AuditLog<T, C>,
    clock: C,
    settings: DispatchSettings,
    pending: Mutex<HashMap<PendingKey, PendingInput>>,
}

impl<T: PanelTransport, S: PanelStore, C: Clock> ActionDispatcher<T, S, C> {
    pub fn new(
        transport: Arc<T>,
        controller: Arc<PanelController<T, S>>,
        audit: AuditLog<T, C>,
        clock: C,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            transport,
            controller,
            audit,
            clock,
            settings,
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn controller(&self) -> &Arc<PanelController<T, S>> {
        &self.controller
    }

    /// Number of prompts currently awaiting input.
    pub async fn pending_inputs(&self) -> usize {
        self.pending.lock().await.len()
    }

    pub async fn handle(&self, event: OperatorEvent) -> DispatchOutcome {
        debug!(
            event = event.kind_name(),
            actor = event.actor().id,
            "Dispatching operator event"
        );
        self.expire_pending().await;

        let result = match event {
            OperatorEvent::ButtonPressed {
                interaction,
                actor,
                custom_id,
                ..
            } => self.on_button(interaction, actor, &custom_id).await,
            OperatorEvent::InputSubmitted {
                interaction,
                actor,
                custom_id,
                value,
            } => self.on_submission(interaction, actor, &custom_id, &value).await,
            OperatorEvent::ControlCommand {
                actor,
                channel_id,
                reply,
            } => Ok(self.on_control(actor, channel_id, reply).await),
        };

        result.unwrap_or_else(|e| {
            error!("Dispatch aborted: {}", e);
            DispatchOutcome::Ignored
        })
    }

    async fn on_button(
        &self,
        interaction: InteractionRef,
        actor: Actor,
        custom_id: &str,
    ) -> Result<DispatchOutcome, PanelError> {
        let mut flow = Flow::new();
        flow.advance(FlowState::Validating)?;

        let Some(kind) = ActionKind::from_custom_id(custom_id) else {
            flow.advance(FlowState::Idle)?;
            debug!("Ignoring unrecognised control '{}'", custom_id);
            return Ok(DispatchOutcome::Ignored);
        };

        if kind.action().requires_time_input {
            flow.advance(FlowState::AwaitingInput)?;
            return self.request_input(kind, interaction, &actor, flow).await;
        }

        flow.advance(FlowState::Executing)?;
        let responder = Responder::Interaction(interaction);
        self.execute(kind, &actor, &responder, None, flow).await
    }

    async fn request_input(
        &self,
        kind: ActionKind,
        interaction: InteractionRef,
        actor: &Actor,
        flow: Flow,
    ) -> Result<DispatchOutcome, PanelError> {
        let key = (actor.id, kind);
        self.pending.lock().await.insert(
            key,
            PendingInput {
                requested_at: self.clock.now(),
                flow,
            },
        );

        if let Err(e) = self
            .transport
            .present_input_form(&interaction, &time_input_form(kind))
            .await
        {
            warn!("Failed to show time input for {}: {}", kind, e);
            let removed = self.pending.lock().await.remove(&key);
            if let Some(mut pending) = removed {
                pending.flow.advance(FlowState::Idle)?;
            }
            return Ok(DispatchOutcome::ActionFailed(kind));
        }

        info!(
            "Awaiting time input for {} from {}",
            kind,
            actor.display_name()
        );
        Ok(DispatchOutcome::AwaitingInput(kind))
    }

    async fn on_submission(
        &self,
        interaction: InteractionRef,
        actor: Actor,
        custom_id: &str,
        value: &str,
    ) -> Result<DispatchOutcome, PanelError> {
        let Some(kind) = ActionKind::from_modal_id(custom_id)
            .filter(|kind| kind.action().requires_time_input)
        else {
            debug!("Ignoring unrecognised form '{}'", custom_id);
            return Ok(DispatchOutcome::Ignored);
        };

        let responder = Responder::Interaction(interaction);
        let key = (actor.id, kind);
        let removed = self.pending.lock().await.remove(&key);
        let Some(mut pending) = removed else {
            info!(
                "Time input for {} from {} has no pending prompt",
                kind,
                actor.display_name()
            );
            self.reply(&responder, EXPIRED_TEXT).await;
            return Ok(DispatchOutcome::InputExpired(kind));
        };

        pending.flow.advance(FlowState::Validating)?;
        let time = match validate_time(value) {
            Ok(time) => time,
            Err(e) => {
                debug!("Rejected time input for {}: {}", kind, e);
                pending.flow.advance(FlowState::AwaitingInput)?;
                self.pending.lock().await.insert(key, pending);
                self.reply(&responder, EMPTY_TIME_TEXT).await;
                return Ok(DispatchOutcome::InputRejected(kind));
            }
        };

        pending.flow.advance(FlowState::Executing)?;
        self.execute(kind, &actor, &responder, Some(time), pending.flow)
            .await
    }

    async fn execute(
        &self,
        kind: ActionKind,
        actor: &Actor,
        responder: &Responder,
        time: Option<&str>,
        mut flow: Flow,
    ) -> Result<DispatchOutcome, PanelError> {
        let action = kind.action();

        match self.settings.announcement_channel_id {
            Some(channel_id) => {
                let announcement = announcement_message(action, time);
                if let Err(e) = self.transport.send_message(channel_id, &announcement).await {
                    error!(
                        "Failed to announce {} in channel {}: {}",
                        kind, channel_id, e
                    );
                    flow.advance(FlowState::Idle)?;
                    let text = format!(
                        "❌ Failed to send the {} announcement: {}",
                        action.label, e.message
                    );
                    self.reply(responder, &text).await;
                    return Ok(DispatchOutcome::ActionFailed(kind));
                }
            }
            None => warn!("Announcement channel not configured; {} not broadcast", kind),
        }

        let entry = self.audit.entry(actor, kind, time);
        self.audit.append(&entry).await;

        flow.advance(FlowState::Completing)?;
        let ack = match time {
            Some(time) => format!("Announcement sent for {}!", time),
            None => format!("{} announcement sent!", action.label),
        };
        self.reply(responder, &ack).await;

        if !self.controller.can_render().await {
            debug!("No control panel to update for {}", kind);
        } else {
            match self.controller.render(kind).await {
                Ok(true) => {}
                Ok(false) => debug!("Control panel vanished before {} could be shown", kind),
                Err(e) => warn!("Control panel left stale after {}: {}", kind, e),
            }
        }

        flow.advance(FlowState::Idle)?;
        info!(
            action = %kind,
            actor = actor.display_name(),
            "Action completed"
        );
        Ok(DispatchOutcome::Completed(kind))
    }

    async fn on_control(&self, actor: Actor, channel_id: u64, reply: Responder) -> DispatchOutcome {
        match self.controller.recreate(channel_id).await {
            Ok(message_id) => {
                info!(
                    "Control panel recreated as {} by {}",
                    message_id,
                    actor.display_name()
                );
                self.reply(&reply, RECREATED_TEXT).await;
                DispatchOutcome::PanelRecreated(message_id)
            }
            Err(PanelError::PermissionDenied(reason)) => {
                info!("Rejected control command from {}: {}", actor.display_name(), reason);
                self.reply(&reply, WRONG_CHANNEL_TEXT).await;
                DispatchOutcome::PermissionDenied
            }
            Err(e) => {
                error!("Failed to recreate control panel: {}", e);
                self.reply(&reply, RECREATE_FAILED_TEXT).await;
                DispatchOutcome::RecreateFailed
            }
        }
    }

    async fn reply(&self, responder: &Responder, text: &str) {
        if let Err(e) = self.transport.respond(responder, text).await {
            warn!("Failed to answer operator: {}", e);
        }
    }

    /// Drop prompts older than the input timeout; their flows end in Idle.
    async fn expire_pending(&self) {
        let now = self.clock.now();
        let timeout = self.settings.input_timeout;
        let mut pending = self.pending.lock().await;
        pending.retain(|(actor_id, kind), input| {
            if now.duration_since(input.requested_at) < timeout {
                return true;
            }
            if let Err(e) = input.flow.advance(FlowState::Idle) {
                error!("Expiring prompt: {}", e);
            }
            debug!("Time input for {} from {} expired", kind, actor_id);
            false
        });
    }
}

/// Trimmed time value; empty input is a validation failure.
pub fn validate_time(value: &str) -> Result<&str, PanelError> {
    let time = value.trim();
    if time.is_empty() {
        return Err(PanelError::ValidationFailed(
            "time cannot be empty".to_string(),
        ));
    }
    Ok(time)
}
