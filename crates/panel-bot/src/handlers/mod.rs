//! Serenity event handler implementation
//!
//! Lifts gateway events into `OperatorEvent`s and hands them to the dispatcher.

use std::sync::Arc;

use panel_types::view::TIME_FIELD_ID;
use panel_types::{Actor, InteractionRef, OperatorEvent, Responder};
use serenity::async_trait;
use serenity::builder::CreateCommand;
use serenity::model::application::{ActionRow, ActionRowComponent, Command, Interaction};
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::user::User;
use serenity::prelude::*;
use tracing::{debug, error, info};

use crate::clock::SystemClock;
use crate::dispatcher::{ActionDispatcher, DispatchOutcome};
use crate::errors::{classify, log_error};
use crate::health::AppState;
use crate::outbound::SerenityTransport;
use crate::store::FileStore;

/// Name of the command that recreates the panel.
pub const CONTROL_COMMAND: &str = "control";

pub type LiveDispatcher = ActionDispatcher<SerenityTransport, FileStore, SystemClock>;

/// Everything the handler needs, stored in serenity's `TypeMap`.
pub struct PanelRuntime {
    pub dispatcher: Arc<LiveDispatcher>,
    pub command_prefix: String,
    pub health: AppState,
}

impl TypeMapKey for PanelRuntime {
    type Value = Arc<PanelRuntime>;
}

impl PanelRuntime {
    async fn dispatch(&self, event: OperatorEvent) {
        let outcome = self.dispatcher.handle(event).await;
        debug!("Dispatch outcome: {:?}", outcome);
        if let DispatchOutcome::PanelRecreated(message_id) = outcome {
            self.health.set_panel_message_id(Some(message_id)).await;
        }
    }
}

pub struct Handler;

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            "Discord bot connected as {}#{:04}",
            ready.user.name,
            ready.user.discriminator.map_or(0, |d| d.get())
        );

        let Some(runtime) = runtime(&ctx).await else {
            return;
        };
        runtime.health.set_bot_username(ready.user.name.clone()).await;

        let command =
            CreateCommand::new(CONTROL_COMMAND).description("Recreate the bot control panel");
        if let Err(e) = Command::create_global_command(&ctx.http, command).await {
            log_error("Failed to register /control", &classify(&e));
        }

        // Runs on every (re)connect; single-flight inside the controller.
        match runtime.dispatcher.controller().ensure_panel().await {
            Ok(message_id) => runtime.health.set_panel_message_id(message_id).await,
            Err(e) => error!("Failed to ensure control panel: {}", e),
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Skip bot messages
        if msg.author.bot {
            return;
        }

        let Some(runtime) = runtime(&ctx).await else {
            return;
        };

        if !is_control_command(&msg.content, &runtime.command_prefix) {
            return;
        }

        let channel_id = msg.channel_id.get();
        runtime
            .dispatch(OperatorEvent::ControlCommand {
                actor: actor_from(&msg.author),
                channel_id,
                reply: Responder::Message {
                    channel_id,
                    message_id: msg.id.get(),
                },
            })
            .await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Some(runtime) = runtime(&ctx).await else {
            return;
        };

        let event = match interaction {
            Interaction::Component(comp) => OperatorEvent::ButtonPressed {
                interaction: InteractionRef {
                    id: comp.id.get(),
                    token: comp.token.clone(),
                },
                actor: actor_from(&comp.user),
                channel_id: comp.channel_id.get(),
                custom_id: comp.data.custom_id.clone(),
            },
            Interaction::Modal(modal) => OperatorEvent::InputSubmitted {
                interaction: InteractionRef {
                    id: modal.id.get(),
                    token: modal.token.clone(),
                },
                actor: actor_from(&modal.user),
                custom_id: modal.data.custom_id.clone(),
                value: modal_value(&modal.data.components, TIME_FIELD_ID).unwrap_or_default(),
            },
            Interaction::Command(cmd) if cmd.data.name == CONTROL_COMMAND => {
                OperatorEvent::ControlCommand {
                    actor: actor_from(&cmd.user),
                    channel_id: cmd.channel_id.get(),
                    reply: Responder::Interaction(InteractionRef {
                        id: cmd.id.get(),
                        token: cmd.token.clone(),
                    }),
                }
            }
            _ => {
                // Autocomplete, ping and unrelated commands
                return;
            }
        };

        runtime.dispatch(event).await;
    }
}

async fn runtime(ctx: &Context) -> Option<Arc<PanelRuntime>> {
    let data = ctx.data.read().await;
    let runtime = data.get::<PanelRuntime>().cloned();
    if runtime.is_none() {
        error!("PanelRuntime not found in context data");
    }
    runtime
}

/// `<prefix>control`, optionally followed by arguments.
pub fn is_control_command(content: &str, prefix: &str) -> bool {
    let Some(rest) = content
        .trim()
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix(CONTROL_COMMAND))
    else {
        return false;
    };
    rest.is_empty() || rest.starts_with(char::is_whitespace)
}

pub fn actor_from(user: &User) -> Actor {
    Actor {
        id: user.id.get(),
        username: user.name.clone(),
        global_name: user.global_name.clone(),
    }
}

fn modal_value(rows: &[ActionRow], field_id: &str) -> Option<String> {
    rows.iter()
        .flat_map(|row| row.components.iter())
        .find_map(|component| match component {
            ActionRowComponent::InputText(input) if input.custom_id == field_id => {
                input.value.clone()
            }
            _ => None,
        })
}
