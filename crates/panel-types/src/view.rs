//! Transport-neutral message content
//!
//! The bot renders these into serenity builders; tests inspect them directly.

use serde::{Deserialize, Serialize};

use crate::action::{Action, ActionKind};

pub const PANEL_TITLE: &str = "Bot Control Panel";
pub const PANEL_DESCRIPTION: &str = "Use the buttons below to send announcements.";
pub const PANEL_COLOUR: u32 = 0x5865F2;

/// Custom id of the single text field on a time-input form.
pub const TIME_FIELD_ID: &str = "time_input";

/// Longest time value accepted by the form.
pub const TIME_MAX_LENGTH: u16 = 100;

/// Embed image (just a URL)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedMedia {
    pub url: String,
}

/// Message embed
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedMedia>,
}

/// Button style
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Success,
    Danger,
}

/// A button component
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Button {
    pub style: ButtonStyle,
    pub label: String,
    pub custom_id: String,
}

/// An action row, up to 5 buttons
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActionRow {
    #[serde(default)]
    pub buttons: Vec<Button>,
}

/// Content of a message the bot sends or edits.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MessageContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub embeds: Vec<Embed>,
    #[serde(default)]
    pub components: Vec<ActionRow>,
}

impl MessageContent {
    /// Plain text message.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Illustration URL of the first embed, if any.
    pub fn image_url(&self) -> Option<&str> {
        self.embeds
            .first()
            .and_then(|e| e.image.as_ref())
            .map(|m| m.url.as_str())
    }
}

/// Short free-text field on an input form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextField {
    pub custom_id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u16>,
}

/// Input-collection prompt shown to an operator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputForm {
    pub custom_id: String,
    pub title: String,
    pub fields: Vec<TextField>,
}

/// The standard button row, identical for every panel state.
pub fn panel_buttons() -> ActionRow {
    ActionRow {
        buttons: ActionKind::ALL
            .iter()
            .map(|kind| {
                let action = kind.action();
                Button {
                    style: action.button_style,
                    label: action.label.to_string(),
                    custom_id: kind.custom_id(),
                }
            })
            .collect(),
    }
}

/// The control panel showing `kind`'s illustration.
pub fn panel_message(kind: ActionKind) -> MessageContent {
    MessageContent {
        content: None,
        embeds: vec![Embed {
            title: Some(PANEL_TITLE.to_string()),
            description: Some(PANEL_DESCRIPTION.to_string()),
            color: Some(PANEL_COLOUR),
            image: Some(EmbedMedia {
                url: kind.action().illustration_url.to_string(),
            }),
        }],
        components: vec![panel_buttons()],
    }
}

/// Public announcement for an action. No title and no illustration.
pub fn announcement_message(action: &Action, time: Option<&str>) -> MessageContent {
    MessageContent {
        content: None,
        embeds: vec![Embed {
            description: Some(action.announcement(time)),
            color: Some(action.tone.colour()),
            ..Default::default()
        }],
        components: vec![],
    }
}

/// Form asking the operator for the time to announce.
pub fn time_input_form(kind: ActionKind) -> InputForm {
    InputForm {
        custom_id: kind.modal_id(),
        title: format!("Enter Time for {}", kind.action().label),
        fields: vec![TextField {
            custom_id: TIME_FIELD_ID.to_string(),
            label: "Time".to_string(),
            placeholder: Some("e.g., 10:30 AM".to_string()),
            required: true,
            max_length: Some(TIME_MAX_LENGTH),
        }],
    }
}
