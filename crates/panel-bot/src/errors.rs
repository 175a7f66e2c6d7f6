//! Discord-specific error handling for the bot.
//!
//! Converts serenity errors into `TransportError`s so the controller can tell
//! a deleted panel message from an outage, and provides a `log_error` helper
//! that logs at the right level for the error's category.

use panel_types::{DiscordErrorCode, ErrorCategory, TransportError};
use serenity::http::HttpError;
use tracing::{debug, error, warn};

/// Classify a serenity `Error` into a `TransportError`.
pub fn classify(err: &serenity::Error) -> TransportError {
    match err {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(resp)) => classify_response(
            resp.status_code.as_u16(),
            resp.error.code as u32,
            &resp.error.message,
        ),
        serenity::Error::Http(http_err) => {
            debug!("Network-level HTTP error: {}", http_err);
            TransportError::network(http_err.to_string())
        }
        _ => {
            debug!("Non-HTTP serenity error: {}", err);
            TransportError::network(err.to_string())
        }
    }
}

/// Classify an unsuccessful Discord response by HTTP status and JSON error code.
pub fn classify_response(status: u16, raw_code: u32, message: &str) -> TransportError {
    if status == 429 {
        return TransportError::new(DiscordErrorCode::RateLimited, message, status);
    }

    let code = match DiscordErrorCode::from_raw(raw_code) {
        // A bare 404 without a JSON code still means the target is gone.
        DiscordErrorCode::Unknown if status == 404 => DiscordErrorCode::UnknownMessage,
        code => code,
    };
    TransportError::new(code, message, status)
}

/// Log a transport error at the level its category deserves.
///
/// - Permission problems → `error!` (needs operator attention)
/// - Missing targets → `debug!` (expected after manual deletes)
/// - Everything else → `warn!`
pub fn log_error(context: &str, err: &TransportError) {
    match err.category {
        ErrorCategory::PermissionDenied => {
            error!("{} [{:?}]: {}", context, err.code, err.message);
        }
        ErrorCategory::NotFound => {
            debug!("{} [{:?}]: {}", context, err.code, err.message);
        }
        _ => {
            warn!(
                "{} [{:?}, HTTP {}]: {}",
                context, err.code, err.http_status, err.message
            );
        }
    }
}
