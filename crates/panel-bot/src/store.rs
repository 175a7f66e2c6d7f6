//! Persistence of the panel message id.
//!
//! The only durable state: one decimal id in a small file. A missing file,
//! empty content or garbage all mean "no panel exists yet".

use std::future::Future;
use std::path::PathBuf;

use panel_types::PanelError;
use tracing::{debug, warn};

pub const DEFAULT_STATE_FILE: &str = "control_panel_msgid.txt";

pub trait PanelStore: Send + Sync + 'static {
    /// Read the stored id. Never fails: unreadable state is reported as `None`.
    fn load(&self) -> impl Future<Output = Option<u64>> + Send;

    /// Overwrite the stored id.
    fn save(&self, message_id: u64) -> impl Future<Output = Result<(), PanelError>> + Send;
}

/// Parse stored content; anything but a positive decimal id is `None`.
pub fn parse_message_id(content: &str) -> Option<u64> {
    content.trim().parse::<u64>().ok().filter(|id| *id != 0)
}

/// File-backed store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sibling file the id is staged in before being renamed over `path`.
    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        PathBuf::from(staging)
    }
}

impl PanelStore for FileStore {
    async fn load(&self) -> Option<u64> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let id = parse_message_id(&content);
                if id.is_none() {
                    warn!(
                        "Ignoring unparsable panel state in {}",
                        self.path.display()
                    );
                }
                id
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No panel state at {}", self.path.display());
                None
            }
            Err(e) => {
                warn!(
                    "Failed to read panel state from {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    async fn save(&self, message_id: u64) -> Result<(), PanelError> {
        // Stage then rename: the state file always holds a complete id.
        let staging = self.staging_path();
        tokio::fs::write(&staging, message_id.to_string())
            .await
            .map_err(|e| {
                PanelError::Persistence(format!("failed to write {}: {}", staging.display(), e))
            })?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| {
                PanelError::Persistence(format!(
                    "failed to replace {}: {}",
                    self.path.display(),
                    e
                ))
            })
    }
}

#[cfg(test)]
pub use mem::MemStore;
