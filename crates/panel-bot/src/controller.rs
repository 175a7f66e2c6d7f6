//! Panel lifecycle: create-or-recover, explicit recreate, and render.
//!
//! `ensure_panel` and `recreate` run single-flight so concurrent reconnects
//! never create two panels. `render` only reads a snapshot of the record and
//! is not serialized; concurrent renders resolve last-write-wins.

#[path = "controller_tests.rs"]
mod controller_tests;

use std::sync::Arc;

use panel_types::view::panel_message;
use panel_types::{ActionKind, PanelError};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::store::PanelStore;
use crate::transport::PanelTransport;

/// Durable panel record. Only `panel_message_id` is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelRecord {
    pub controller_channel_id: Option<u64>,
    pub panel_message_id: Option<u64>,
}

pub struct PanelController<T, S> {
    transport: Arc<T>,
    store: S,
    record: RwLock<PanelRecord>,
    single_flight: Mutex<()>,
}

impl<T: PanelTransport, S: PanelStore> PanelController<T, S> {
    /// Build the controller, reading the stored message id once.
    pub async fn load(transport: Arc<T>, store: S, controller_channel_id: Option<u64>) -> Self {
        let panel_message_id = store.load().await;
        if let Some(id) = panel_message_id {
            info!("Loaded stored panel message id {}", id);
        }
        Self {
            transport,
            store,
            record: RwLock::new(PanelRecord {
                controller_channel_id,
                panel_message_id,
            }),
            single_flight: Mutex::new(()),
        }
    }

    pub async fn record(&self) -> PanelRecord {
        *self.record.read().await
    }

    pub async fn controller_channel_id(&self) -> Option<u64> {
        self.record.read().await.controller_channel_id
    }

    /// True when a render has somewhere to go.
    pub async fn can_render(&self) -> bool {
        let record = self.record().await;
        record.controller_channel_id.is_some() && record.panel_message_id.is_some()
    }

    /// Make sure a live panel exists, reusing the stored one when reachable.
    ///
    /// Returns the live panel id, or `None` when no controller channel is configured.
    /// Only a NotFound-class fetch failure triggers a new panel; other transport
    /// errors are returned so an outage never duplicates the panel.
    pub async fn ensure_panel(&self) -> Result<Option<u64>, PanelError> {
        let _guard = self.single_flight.lock().await;
        let record = self.record().await;

        let Some(channel_id) = record.controller_channel_id else {
            warn!("Controller channel not configured; skipping control panel");
            return Ok(None);
        };

        if let Some(message_id) = record.panel_message_id {
            match self.transport.fetch_message(channel_id, message_id).await {
                Ok(()) => {
                    debug!("Control panel {} is live", message_id);
                    return Ok(Some(message_id));
                }
                Err(e) if e.is_not_found() => {
                    info!(
                        "Control panel {} no longer exists, creating a new one",
                        message_id
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.create_panel(channel_id).await.map(Some)
    }

    /// Force a brand-new panel. Only allowed from the controller channel.
    pub async fn recreate(&self, origin_channel_id: u64) -> Result<u64, PanelError> {
        let channel_id = match self.controller_channel_id().await {
            Some(id) if id == origin_channel_id => id,
            _ => {
                return Err(PanelError::PermissionDenied(format!(
                    "control command used in channel {}",
                    origin_channel_id
                )))
            }
        };

        let _guard = self.single_flight.lock().await;
        self.create_panel(channel_id).await
    }

    /// Show `kind`'s illustration on the panel.
    ///
    /// Returns `Ok(false)` when there is no panel to update.
    pub async fn render(&self, kind: ActionKind) -> Result<bool, PanelError> {
        let record = self.record().await;
        let (Some(channel_id), Some(message_id)) =
            (record.controller_channel_id, record.panel_message_id)
        else {
            debug!("No control panel to render {}", kind);
            return Ok(false);
        };

        match self.transport.fetch_message(channel_id, message_id).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                debug!("Control panel {} is gone; skipping render", message_id);
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        }

        self.transport
            .edit_message(channel_id, message_id, &panel_message(kind))
            .await?;
        debug!("Control panel {} now shows {}", message_id, kind);
        Ok(true)
    }

    async fn create_panel(&self, channel_id: u64) -> Result<u64, PanelError> {
        let message_id = self
            .transport
            .send_message(channel_id, &panel_message(ActionKind::Online))
            .await?;

        self.record.write().await.panel_message_id = Some(message_id);
        info!("Created control panel {} in channel {}", message_id, channel_id);

        // The panel stays usable for this process even if the id cannot be stored.
        if let Err(e) = self.store.save(message_id).await {
            warn!("Control panel {} may be duplicated after restart: {}", message_id, e);
        }

        Ok(message_id)
    }
}
