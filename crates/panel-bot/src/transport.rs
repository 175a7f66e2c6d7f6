//! Outbound calls to the messaging transport.
//!
//! One trait covering the calls the panel makes. `SerenityTransport` talks to
//! Discord; tests use the recording mock in `mock.rs`.

use std::future::Future;

use panel_types::{InputForm, InteractionRef, MessageContent, Responder, TransportError};

pub trait PanelTransport: Send + Sync + 'static {
    /// Send a message and return its id.
    fn send_message(
        &self,
        channel_id: u64,
        content: &MessageContent,
    ) -> impl Future<Output = Result<u64, TransportError>> + Send;

    /// Confirm that a message still exists. NotFound-class errors mean it was deleted.
    fn fetch_message(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    fn edit_message(
        &self,
        channel_id: u64,
        message_id: u64,
        content: &MessageContent,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Answer an operator: ephemeral for interactions, a reply for text commands.
    fn respond(
        &self,
        responder: &Responder,
        text: &str,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Show an input form in response to an interaction.
    fn present_input_form(
        &self,
        interaction: &InteractionRef,
        form: &InputForm,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}
