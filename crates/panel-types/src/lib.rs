//! Shared types for the bot control panel

pub mod action;
pub mod audit;
pub mod errors;
pub mod events;
pub mod flow;
pub mod view;

pub use action::{lookup, Action, ActionKind, Tone};
pub use audit::AuditEntry;
pub use errors::{DiscordErrorCode, ErrorCategory, PanelError, TransportError};
pub use events::{Actor, InteractionRef, OperatorEvent, Responder};
pub use flow::{Flow, FlowState};
pub use view::{InputForm, MessageContent};
