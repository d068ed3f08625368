use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Settings store unavailable: {0}")]
    Unavailable(String),
}

/// User preferences backing the seek engine, persisted by the host.
///
/// Values are read asynchronously right before each use; the engine keeps
/// no cached copy. A failed read degrades to the engine's built-in
/// defaults rather than failing the operation.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Step size for plain seek forward/back requests.
    async fn seek_time(&self) -> Result<Duration, SettingsError>;

    /// How far to rewind when resuming from pause, so the listener
    /// regains context. Zero disables auto-rewind.
    async fn auto_rewind_amount(&self) -> Result<Duration, SettingsError>;
}
