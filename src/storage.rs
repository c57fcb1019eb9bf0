//! Durable cart slot.
//!
//! One named JSON entry holds the serialized `CartState` between sessions.
//! There is no versioning or migration scheme: older entries saved before the
//! scent dimension existed load with the field unset.

use std::future::Future;
use std::path::{Path, PathBuf};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::aggregates::cart::CartState;
use crate::{Result, StorefrontError};

pub trait CartSlot {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> impl Future<Output = Result<Option<CartState>>> + Send;
    fn save(&self, state: &CartState) -> impl Future<Output = Result<()>> + Send;
}

/// File-backed slot: the durable client-side storage for the cart.
#[derive(Clone, Debug)]
pub struct JsonFileSlot {
    path: PathBuf,
}

impl JsonFileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path { &self.path }
}

impl CartSlot for JsonFileSlot {
    async fn load(&self) -> Result<Option<CartState>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorefrontError::Storage(format!("read {}: {e}", self.path.display())))
            }
        };
        let state = serde_json::from_slice(&raw)
            .map_err(|e| StorefrontError::Storage(format!("parse {}: {e}", self.path.display())))?;
        Ok(Some(state))
    }

    async fn save(&self, state: &CartState) -> Result<()> {
        let raw = serde_json::to_vec_pretty(state)
            .map_err(|e| StorefrontError::Storage(e.to_string()))?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| StorefrontError::Storage(format!("write {}: {e}", self.path.display())))?;
        Ok(())
    }
}

/// Drains cart snapshots and writes each newest one to the slot. The watch
/// channel coalesces intermediate states, so writes land in mutation order
/// with last-writer-wins. Save failures are logged and skipped; the task ends
/// when the store (the sender side) is dropped.
pub fn spawn_persister<S>(slot: S, mut snapshots: watch::Receiver<CartState>) -> JoinHandle<()>
where
    S: CartSlot + Send + Sync + 'static,
{
    tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let state = snapshots.borrow_and_update().clone();
            if let Err(e) = slot.save(&state).await {
                tracing::warn!(error = %e, "cart persistence write failed");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let slot = JsonFileSlot::new(dir.path().join("marivelas-cart.json"));
        assert!(slot.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marivelas-cart.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();
        let slot = JsonFileSlot::new(path);
        assert!(matches!(slot.load().await, Err(StorefrontError::Storage(_))));
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let slot = JsonFileSlot::new(dir.path().join("marivelas-cart.json"));
        let state = CartState::default();
        slot.save(&state).await.unwrap();
        assert_eq!(slot.load().await.unwrap(), Some(state));
    }
}
