//! The closed set of operator actions and their catalog entries.
//!
//! Every inbound control carries one of the external keys below. Buttons use
//! `btn_<key>` and time-input forms use `modal_<key>` as their custom ids.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::view::ButtonStyle;

const BUTTON_PREFIX: &str = "btn_";
const MODAL_PREFIX: &str = "modal_";

/// Placeholder replaced by the operator-supplied time in announcement templates.
pub const TIME_PLACEHOLDER: &str = "{time}";

/// One of the fixed operator-triggered behaviours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Online,
    Restart,
    DevMode,
    CustomRestart,
}

impl ActionKind {
    /// All actions, in panel button order.
    pub const ALL: [ActionKind; 4] = [
        ActionKind::Online,
        ActionKind::Restart,
        ActionKind::DevMode,
        ActionKind::CustomRestart,
    ];

    /// The external string identifier.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Restart => "restart",
            Self::DevMode => "dev_mode",
            Self::CustomRestart => "custom_restart",
        }
    }

    /// Look up the catalog entry for this action.
    pub fn action(&self) -> &'static Action {
        match self {
            Self::Online => &ONLINE,
            Self::Restart => &RESTART,
            Self::DevMode => &DEV_MODE,
            Self::CustomRestart => &CUSTOM_RESTART,
        }
    }

    pub fn custom_id(&self) -> String {
        format!("{}{}", BUTTON_PREFIX, self.key())
    }

    pub fn modal_id(&self) -> String {
        format!("{}{}", MODAL_PREFIX, self.key())
    }

    /// Resolve a panel button custom id (`btn_online`, ...).
    pub fn from_custom_id(custom_id: &str) -> Option<Self> {
        custom_id
            .strip_prefix(BUTTON_PREFIX)
            .and_then(lookup)
            .map(|action| action.kind)
    }

    /// Resolve an input form custom id (`modal_dev_mode`, ...).
    pub fn from_modal_id(custom_id: &str) -> Option<Self> {
        custom_id
            .strip_prefix(MODAL_PREFIX)
            .and_then(lookup)
            .map(|action| action.kind)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Returned when a key is outside the closed action set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action key '{0}'")]
pub struct UnknownAction(pub String);

impl FromStr for ActionKind {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(Self::Online),
            "restart" => Ok(Self::Restart),
            "dev_mode" => Ok(Self::DevMode),
            "custom_restart" => Ok(Self::CustomRestart),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// Severity hint for an announcement, rendered as the embed colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Positive,
    Cautionary,
    Informational,
    Critical,
}

impl Tone {
    pub fn colour(&self) -> u32 {
        match self {
            Self::Positive => 0x2ECC71,
            Self::Cautionary => 0xE67E22,
            Self::Informational => 0x3498DB,
            Self::Critical => 0xE74C3C,
        }
    }
}

/// Immutable catalog entry.
#[derive(Debug, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    pub label: &'static str,
    pub button_style: ButtonStyle,
    pub announcement_template: &'static str,
    pub illustration_url: &'static str,
    pub requires_time_input: bool,
    pub tone: Tone,
}

impl Action {
    /// Render the announcement body, interpolating `time` when the template asks for it.
    pub fn announcement(&self, time: Option<&str>) -> String {
        match time {
            Some(time) => self.announcement_template.replace(TIME_PLACEHOLDER, time),
            None => self.announcement_template.to_string(),
        }
    }
}

/// Catalog lookup by external key.
pub fn lookup(key: &str) -> Option<&'static Action> {
    key.parse::<ActionKind>().ok().map(|kind| kind.action())
}

const RESTART_GIF: &str = "https://media.discordapp.net/attachments/1400375199949393940/1400375328098095144/restart.gif?width=850&height=300";

static ONLINE: Action = Action {
    kind: ActionKind::Online,
    label: "Online",
    button_style: ButtonStyle::Success,
    announcement_template: "## ✅ **Bot Back Online** \n\n The bot is now back online and fully operational after a quick maintenance restart. Everything is running smoothly again — thank you for waiting!",
    illustration_url: "https://media.discordapp.net/attachments/1400375199949393940/1400375322435780669/online.gif?width=850&height=300",
    requires_time_input: false,
    tone: Tone::Positive,
};

static RESTART: Action = Action {
    kind: ActionKind::Restart,
    label: "Restart",
    button_style: ButtonStyle::Primary,
    announcement_template: "## ⚡  **Quick Restart Notice** \n\n The bot will be restarting shortly for a quick maintenance update to ensure everything runs smoothly. It will be back online in just a moment, so thank you for your patience and understanding!",
    illustration_url: RESTART_GIF,
    requires_time_input: false,
    tone: Tone::Cautionary,
};

static DEV_MODE: Action = Action {
    kind: ActionKind::DevMode,
    label: "Dev Mode",
    button_style: ButtonStyle::Secondary,
    announcement_template: "## 🛠️ **Developer Mode ** \n\n The bot is now back online in developer mode after a quick restart. Some features may be under testing, so you might notice a few changes or temporary tweaks as we work on new updates.\n**Time:** {time}",
    illustration_url: "https://media.discordapp.net/attachments/1400375199949393940/1400375850544926761/DEV_MODE.gif?width=850&height=300",
    requires_time_input: true,
    tone: Tone::Informational,
};

static CUSTOM_RESTART: Action = Action {
    kind: ActionKind::CustomRestart,
    label: "Custom Restart",
    button_style: ButtonStyle::Danger,
    announcement_template: "## ⚡ **Restart Notice** \n The bot is restarting to apply updates and improvements. Some features may be temporarily unavailable during this process, but it will be back online shortly — thank you for your patience!\n**Time:** {time}",
    illustration_url: RESTART_GIF,
    requires_time_input: true,
    tone: Tone::Critical,
};
