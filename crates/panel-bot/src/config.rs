//! Configuration management for panel-bot

#[path = "config_tests.rs"]
mod config_tests;

use std::fs;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::dispatcher::DEFAULT_INPUT_TIMEOUT;
use crate::store::DEFAULT_STATE_FILE;

/// Complete bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub discord: DiscordBotConfig,
    #[serde(default)]
    pub channels: ChannelConfig,
    #[serde(default)]
    pub panel: PanelConfig,
}

/// Discord bot specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordBotConfig {
    /// Bot token from the Discord developer portal
    #[serde(default = "default_bot_token")]
    pub bot_token: String,
    /// Prefix for the text form of the `control` command
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
}

/// The three channels the panel works with. Any of them may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChannelConfig {
    /// Where the control panel lives
    pub controller: Option<u64>,
    /// Where announcements are broadcast
    pub announcement: Option<u64>,
    /// Where audit lines are appended
    pub log: Option<u64>,
}

impl ChannelConfig {
    /// One line per missing channel, describing what will not work.
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if self.controller.is_none() {
            warnings.push("controller channel not set: no control panel will be posted");
        }
        if self.announcement.is_none() {
            warnings.push("announcement channel not set: announcements will not be broadcast");
        }
        if self.log.is_none() {
            warnings.push("log channel not set: audit entries will only be traced");
        }
        warnings
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PanelConfig {
    /// File holding the panel message id across restarts
    #[serde(default = "default_state_file")]
    pub state_file: String,
    /// Seconds an input prompt stays open
    #[serde(default = "default_input_timeout_secs")]
    pub input_timeout_secs: u64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            input_timeout_secs: default_input_timeout_secs(),
        }
    }
}

impl PanelConfig {
    pub fn input_timeout(&self) -> Duration {
        Duration::from_secs(self.input_timeout_secs)
    }

    /// A zero timeout would expire every prompt before it could be answered.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.input_timeout_secs > 0,
            "input_timeout_secs must be greater than zero"
        );
        Ok(())
    }
}

/// Source of environment variables.
pub trait ReadEnv {
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment.
pub struct SystemEnv;

impl ReadEnv for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;
        config
            .panel
            .validate()
            .with_context(|| format!("Invalid [panel] section in {}", path))?;

        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_env_impl(&SystemEnv)
    }

    pub fn from_env_impl(env: &impl ReadEnv) -> Result<Self> {
        let bot_token = env
            .var("DISCORD_BOT_TOKEN")
            .context("DISCORD_BOT_TOKEN not set")?;

        let command_prefix = env
            .var("DISCORD_COMMAND_PREFIX")
            .unwrap_or_else(default_command_prefix);

        let channels = ChannelConfig {
            controller: parse_channel_id(env, "CONTROLLER_CHANNEL_ID")?,
            announcement: parse_channel_id(env, "ANNOUNCEMENT_CHANNEL_ID")?,
            log: parse_channel_id(env, "LOG_CHANNEL_ID")?,
        };

        let state_file = env
            .var("PANEL_STATE_FILE")
            .unwrap_or_else(default_state_file);

        let input_timeout_secs = match env.var("PANEL_INPUT_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("PANEL_INPUT_TIMEOUT_SECS is not a number: {}", raw))?,
            None => default_input_timeout_secs(),
        };

        let panel = PanelConfig {
            state_file,
            input_timeout_secs,
        };
        panel
            .validate()
            .context("PANEL_INPUT_TIMEOUT_SECS is invalid")?;

        Ok(Config {
            discord: DiscordBotConfig {
                bot_token,
                command_prefix,
            },
            channels,
            panel,
        })
    }
}

fn default_bot_token() -> String {
    std::env::var("DISCORD_BOT_TOKEN").unwrap_or_default()
}

fn default_command_prefix() -> String {
    "!".to_string()
}

fn default_state_file() -> String {
    DEFAULT_STATE_FILE.to_string()
}

fn default_input_timeout_secs() -> u64 {
    DEFAULT_INPUT_TIMEOUT.as_secs()
}

/// Empty or unset means "not configured"; anything else must be a channel id.
fn parse_channel_id(env: &impl ReadEnv, key: &str) -> Result<Option<u64>> {
    match env.var(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .with_context(|| format!("{} is not a valid channel id: {}", key, raw)),
    }
}
