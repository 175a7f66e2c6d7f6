//! Inbound operator events, already lifted out of the chat platform's models

use serde::{Deserialize, Serialize};

/// The operator who triggered an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Actor {
    pub id: u64,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_name: Option<String>,
}

impl Actor {
    /// Name recorded in audit entries.
    pub fn display_name(&self) -> &str {
        &self.username
    }
}

/// Handle needed to answer an interaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionRef {
    pub id: u64,
    pub token: String,
}

/// Where replies to an operator go.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Responder {
    /// Ephemeral interaction response.
    Interaction(InteractionRef),
    /// Reply to a text command message.
    Message { channel_id: u64, message_id: u64 },
}

/// An operator-triggered event delivered to the dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OperatorEvent {
    /// A message component was pressed.
    ButtonPressed {
        interaction: InteractionRef,
        actor: Actor,
        channel_id: u64,
        custom_id: String,
    },
    /// An input form was submitted.
    InputSubmitted {
        interaction: InteractionRef,
        actor: Actor,
        custom_id: String,
        value: String,
    },
    /// The `control` command, from text or a slash command.
    ControlCommand {
        actor: Actor,
        channel_id: u64,
        reply: Responder,
    },
}

impl OperatorEvent {
    pub fn actor(&self) -> &Actor {
        match self {
            Self::ButtonPressed { actor, .. }
            | Self::InputSubmitted { actor, .. }
            | Self::ControlCommand { actor, .. } => actor,
        }
    }

    /// Short name used in log lines.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::ButtonPressed { .. } => "button_pressed",
            Self::InputSubmitted { .. } => "input_submitted",
            Self::ControlCommand { .. } => "control_command",
        }
    }
}
