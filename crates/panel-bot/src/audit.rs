//! Audit log sink: one line per action in the log channel.
//!
//! Best-effort. Failures are logged here and never reach the caller.

use std::sync::Arc;

use panel_types::{ActionKind, Actor, AuditEntry, MessageContent};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::transport::PanelTransport;

pub struct AuditLog<T, C> {
    transport: Arc<T>,
    log_channel_id: Option<u64>,
    clock: C,
}

impl<T: PanelTransport, C: Clock> AuditLog<T, C> {
    pub fn new(transport: Arc<T>, log_channel_id: Option<u64>, clock: C) -> Self {
        Self {
            transport,
            log_channel_id,
            clock,
        }
    }

    /// Stamp an entry with the current local time.
    pub fn entry(&self, actor: &Actor, action: ActionKind, extra: Option<&str>) -> AuditEntry {
        AuditEntry {
            actor: actor.display_name().to_string(),
            action,
            extra: extra.map(str::to_string),
            timestamp: self.clock.local_now(),
        }
    }

    pub async fn append(&self, entry: &AuditEntry) {
        info!(
            actor = %entry.actor,
            action = %entry.action,
            extra = entry.extra.as_deref().unwrap_or(""),
            "Audit: {}",
            entry.formatted_timestamp()
        );

        let Some(channel_id) = self.log_channel_id else {
            debug!("No log channel configured; audit entry kept local");
            return;
        };

        let line = MessageContent::text(entry.to_string());
        if let Err(e) = self.transport.send_message(channel_id, &line).await {
            warn!(
                "Failed to append audit entry for {} to channel {}: {}",
                entry.action, channel_id, e
            );
        }
    }
}
