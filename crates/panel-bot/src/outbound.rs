//! Outbound transport: panel operations → Discord REST calls.
//!
//! Converts the platform-neutral `MessageContent` and `InputForm` into
//! serenity builders and performs the calls via serenity's HTTP client.

#[path = "outbound_tests.rs"]
mod outbound_tests;

use std::sync::Arc;

use panel_types::view::{ActionRow, ButtonStyle, Embed};
use panel_types::{InputForm, InteractionRef, MessageContent, Responder, TransportError};
use serenity::builder::{
    CreateActionRow, CreateButton, CreateEmbed, CreateInputText, CreateInteractionResponse,
    CreateInteractionResponseMessage, CreateMessage, CreateModal, EditMessage,
};
use serenity::http::Http;
use serenity::model::application::{ButtonStyle as SerenityButtonStyle, InputTextStyle};
use serenity::model::id::{ChannelId, InteractionId, MessageId};

use crate::errors::classify;
use crate::transport::PanelTransport;

/// Talks to Discord through serenity's REST client.
pub struct SerenityTransport {
    http: Arc<Http>,
}

impl SerenityTransport {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

impl PanelTransport for SerenityTransport {
    async fn send_message(
        &self,
        channel_id: u64,
        content: &MessageContent,
    ) -> Result<u64, TransportError> {
        let message = ChannelId::new(channel_id)
            .send_message(&*self.http, create_message(content))
            .await
            .map_err(|e| classify(&e))?;
        Ok(message.id.get())
    }

    async fn fetch_message(&self, channel_id: u64, message_id: u64) -> Result<(), TransportError> {
        self.http
            .get_message(ChannelId::new(channel_id), MessageId::new(message_id))
            .await
            .map(|_| ())
            .map_err(|e| classify(&e))
    }

    async fn edit_message(
        &self,
        channel_id: u64,
        message_id: u64,
        content: &MessageContent,
    ) -> Result<(), TransportError> {
        ChannelId::new(channel_id)
            .edit_message(&*self.http, MessageId::new(message_id), edit_message(content))
            .await
            .map(|_| ())
            .map_err(|e| classify(&e))
    }

    async fn respond(&self, responder: &Responder, text: &str) -> Result<(), TransportError> {
        match responder {
            Responder::Interaction(interaction) => {
                let response = CreateInteractionResponse::Message(
                    CreateInteractionResponseMessage::new()
                        .content(text)
                        .ephemeral(true),
                );
                self.create_response(interaction, &response).await
            }
            Responder::Message {
                channel_id,
                message_id,
            } => {
                let channel = ChannelId::new(*channel_id);
                let builder = CreateMessage::new()
                    .content(text)
                    .reference_message((channel, MessageId::new(*message_id)));
                channel
                    .send_message(&*self.http, builder)
                    .await
                    .map(|_| ())
                    .map_err(|e| classify(&e))
            }
        }
    }

    async fn present_input_form(
        &self,
        interaction: &InteractionRef,
        form: &InputForm,
    ) -> Result<(), TransportError> {
        let response = CreateInteractionResponse::Modal(create_modal(form));
        self.create_response(interaction, &response).await
    }
}

impl SerenityTransport {
    async fn create_response(
        &self,
        interaction: &InteractionRef,
        response: &CreateInteractionResponse,
    ) -> Result<(), TransportError> {
        self.http
            .create_interaction_response(
                InteractionId::new(interaction.id),
                &interaction.token,
                response,
                Vec::new(),
            )
            .await
            .map_err(|e| classify(&e))
    }
}

fn create_message(content: &MessageContent) -> CreateMessage {
    let mut builder = CreateMessage::new();
    if let Some(text) = &content.content {
        builder = builder.content(text);
    }
    if !content.embeds.is_empty() {
        builder = builder.embeds(content.embeds.iter().map(create_embed).collect());
    }
    if !content.components.is_empty() {
        builder = builder.components(content.components.iter().map(create_row).collect());
    }
    builder
}

fn edit_message(content: &MessageContent) -> EditMessage {
    let mut builder = EditMessage::new()
        .embeds(content.embeds.iter().map(create_embed).collect())
        .components(content.components.iter().map(create_row).collect());
    if let Some(text) = &content.content {
        builder = builder.content(text);
    }
    builder
}

fn create_embed(embed: &Embed) -> CreateEmbed {
    let mut builder = CreateEmbed::new();
    if let Some(title) = &embed.title {
        builder = builder.title(title);
    }
    if let Some(description) = &embed.description {
        builder = builder.description(description);
    }
    if let Some(color) = embed.color {
        builder = builder.colour(color);
    }
    if let Some(image) = &embed.image {
        builder = builder.image(&image.url);
    }
    builder
}

fn create_row(row: &ActionRow) -> CreateActionRow {
    CreateActionRow::Buttons(
        row.buttons
            .iter()
            .map(|button| {
                CreateButton::new(&button.custom_id)
                    .label(&button.label)
                    .style(button_style(button.style))
            })
            .collect(),
    )
}

fn button_style(style: ButtonStyle) -> SerenityButtonStyle {
    match style {
        ButtonStyle::Primary => SerenityButtonStyle::Primary,
        ButtonStyle::Secondary => SerenityButtonStyle::Secondary,
        ButtonStyle::Success => SerenityButtonStyle::Success,
        ButtonStyle::Danger => SerenityButtonStyle::Danger,
    }
}

fn create_modal(form: &InputForm) -> CreateModal {
    let rows = form
        .fields
        .iter()
        .map(|field| {
            let mut input = CreateInputText::new(InputTextStyle::Short, &field.label, &field.custom_id)
                .required(field.required);
            if let Some(placeholder) = &field.placeholder {
                input = input.placeholder(placeholder);
            }
            if let Some(max_length) = field.max_length {
                input = input.max_length(max_length);
            }
            CreateActionRow::InputText(input)
        })
        .collect();
    CreateModal::new(&form.custom_id, &form.title).components(rows)
}
