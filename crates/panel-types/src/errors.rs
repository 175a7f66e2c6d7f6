//! Error taxonomy for the control panel.
//!
//! Transport failures are classified by Discord JSON error code so callers can
//! tell a deleted panel message (recoverable by re-creating) from an outage.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flow::FlowState;

/// High-level category of a transport error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Target resource (channel, message, interaction) no longer exists.
    NotFound,
    /// Insufficient bot permissions for the requested action.
    PermissionDenied,
    /// Rate limit hit.
    RateLimit,
    /// Malformed or semantically invalid payload.
    InvalidInput,
    /// Network or I/O error.
    Network,
    /// Unknown or uncategorised error.
    Unknown,
}

/// Discord JSON error codes the panel cares about
/// (<https://discord.com/developers/docs/topics/opcodes-and-status-codes#json>).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiscordErrorCode {
    /// 10003
    UnknownChannel,
    /// 10008: the panel message was deleted.
    UnknownMessage,
    /// 10062: interaction token expired or already acknowledged.
    UnknownInteraction,
    /// 50001
    MissingAccess,
    /// 50013
    MissingPermissions,
    /// HTTP 429
    RateLimited,
    /// 50035
    InvalidFormBody,
    /// 130000
    ApiOverloaded,
    /// Client-side network failure.
    NetworkError,
    Unknown,
}

impl DiscordErrorCode {
    pub fn from_raw(code: u32) -> Self {
        match code {
            10003 => Self::UnknownChannel,
            10008 => Self::UnknownMessage,
            10062 => Self::UnknownInteraction,
            50001 => Self::MissingAccess,
            50013 => Self::MissingPermissions,
            50035 => Self::InvalidFormBody,
            130000 => Self::ApiOverloaded,
            _ => Self::Unknown,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownChannel | Self::UnknownMessage | Self::UnknownInteraction => {
                ErrorCategory::NotFound
            }
            Self::MissingAccess | Self::MissingPermissions => ErrorCategory::PermissionDenied,
            Self::RateLimited => ErrorCategory::RateLimit,
            Self::InvalidFormBody => ErrorCategory::InvalidInput,
            Self::NetworkError => ErrorCategory::Network,
            Self::ApiOverloaded | Self::Unknown => ErrorCategory::Unknown,
        }
    }
}

/// A failed outbound call to the messaging transport.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq)]
#[error("{message} ({code:?}, HTTP {http_status})")]
pub struct TransportError {
    pub code: DiscordErrorCode,
    pub category: ErrorCategory,
    pub message: String,
    /// 0 when the failure never reached the HTTP layer.
    pub http_status: u16,
}

impl TransportError {
    pub fn new(code: DiscordErrorCode, message: impl Into<String>, http_status: u16) -> Self {
        Self {
            code,
            category: code.category(),
            message: message.into(),
            http_status,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(DiscordErrorCode::UnknownMessage, message, 404)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(DiscordErrorCode::NetworkError, message, 0)
    }

    pub fn is_not_found(&self) -> bool {
        self.category == ErrorCategory::NotFound
    }
}

/// Errors surfaced by panel operations.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("persistence failure: {0}")]
    Persistence(String),

    #[error("invalid flow transition {from:?} -> {to:?}")]
    InvalidTransition { from: FlowState, to: FlowState },
}
