//! Discord control panel bot
//!
//! Keeps a single control panel message alive in the controller channel and
//! turns its button presses into announcements, audit lines and panel updates.

mod audit;
mod clock;
mod config;
mod controller;
mod dispatcher;
mod errors;
mod handlers;
mod health;
#[cfg(test)]
mod mock;
mod outbound;
mod store;
mod transport;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use serenity::model::gateway::GatewayIntents;
use serenity::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::audit::AuditLog;
use crate::clock::SystemClock;
use crate::config::Config;
use crate::controller::PanelController;
use crate::dispatcher::{ActionDispatcher, DispatchSettings};
use crate::handlers::{Handler, PanelRuntime};
use crate::health::AppState;
use crate::outbound::SerenityTransport;
use crate::store::FileStore;

/// Discord control panel bot CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/panel-bot.toml")]
    config: String,

    /// Discord bot token (overrides config file)
    #[arg(long, env = "DISCORD_BOT_TOKEN")]
    bot_token: Option<String>,

    /// Panel message id file (overrides config file)
    #[arg(long, env = "PANEL_STATE_FILE")]
    state_file: Option<String>,

    /// Health check server port
    #[arg(long, env = "HEALTH_CHECK_PORT", default_value = "3001")]
    health_port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "panel_bot=debug,panel_types=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting control panel bot");

    let args = Args::parse();

    let mut config = if std::path::Path::new(&args.config).exists() {
        info!("Loading config from file: {}", args.config);
        Config::from_file(&args.config)?
    } else {
        info!("Config file not found, loading from environment");
        Config::from_env()?
    };

    if let Some(bot_token) = args.bot_token {
        config.discord.bot_token = bot_token;
    }
    if let Some(state_file) = args.state_file {
        config.panel.state_file = state_file;
    }

    for w in config.channels.warnings() {
        warn!("Channel config: {}", w);
    }

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord.bot_token, intents)
        .event_handler(Handler)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create Discord client: {}", e))?;

    let transport = Arc::new(SerenityTransport::new(client.http.clone()));
    let clock = SystemClock;

    info!("Panel state file: {}", config.panel.state_file);
    let controller = Arc::new(
        PanelController::load(
            transport.clone(),
            FileStore::new(&config.panel.state_file),
            config.channels.controller,
        )
        .await,
    );

    let dispatcher = Arc::new(ActionDispatcher::new(
        transport.clone(),
        controller,
        AuditLog::new(transport, config.channels.log, clock.clone()),
        clock,
        DispatchSettings {
            announcement_channel_id: config.channels.announcement,
            input_timeout: config.panel.input_timeout(),
        },
    ));

    let health_state = AppState::new();

    {
        let mut data = client.data.write().await;
        data.insert::<PanelRuntime>(Arc::new(PanelRuntime {
            dispatcher,
            command_prefix: config.discord.command_prefix.clone(),
            health: health_state.clone(),
        }));
    }

    let health_port = args.health_port;
    tokio::spawn(async move {
        if let Err(e) = health::start_health_server(health_state, health_port).await {
            error!("Health server error: {}", e);
        }
    });

    // Graceful shutdown: close all shards on SIGTERM or Ctrl+C.
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        wait_for_shutdown().await;
        info!("Shutdown signal received, stopping Discord client...");
        shard_manager.shutdown_all().await;
    });

    info!("Starting Discord gateway connection...");

    // Blocks until all shards are stopped
    client
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("Discord client error: {}", e))?;

    info!("Control panel bot stopped");
    Ok(())
}

async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable: {}", e);
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.ok();
    }
}
