//! Background dataset reload.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::info;

use super::{
    loader::{DatasetLoader, Snapshot},
    state::SnapshotSlot,
};
use crate::error::DatasetError;

/// Events emitted by a reload attempt.
#[derive(Debug)]
pub enum LoadEvent {
    /// The attempt produced a snapshot.
    Success {
        /// The assembled snapshot.
        snapshot: Arc<Snapshot>,
        /// Attempt tag issued by the slot.
        generation: u64,
        /// `false` when a newer attempt superseded this one and the
        /// result was discarded without installing.
        installed: bool,
    },
    /// The attempt failed; the previously installed snapshot is untouched.
    Error {
        /// What went wrong.
        error: DatasetError,
        /// Attempt tag issued by the slot.
        generation: u64,
    },
}

/// Runs one tagged load attempt and reports the outcome over a channel.
///
/// Spawned once at startup and again for every manual reload; overlapping
/// attempts are resolved by the slot's generation guard.
pub struct DatasetSync {
    loader: DatasetLoader,
    slot: SnapshotSlot,
}

impl DatasetSync {
    /// Pair a loader with the slot that load results install into.
    pub fn new(loader: DatasetLoader, slot: SnapshotSlot) -> Self {
        Self { loader, slot }
    }

    /// Perform the attempt, sending the outcome to `sender`.
    pub async fn run(self, sender: mpsc::Sender<LoadEvent>) -> Result<()> {
        let generation = self.slot.begin();
        match self.loader.load_all().await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                let installed = self.slot.install(generation, snapshot.clone());
                if installed {
                    info!(
                        generation,
                        units = snapshot.units.len(),
                        warbands = snapshot.warbands.len(),
                        "snapshot installed"
                    );
                } else {
                    info!(generation, "load attempt superseded; result discarded");
                }
                sender
                    .send(LoadEvent::Success {
                        snapshot,
                        generation,
                        installed,
                    })
                    .await
                    .context("failed to send load success event")?;
            }
            Err(error) => {
                let _ = sender.send(LoadEvent::Error { error, generation }).await;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::dataset::testing::{default_routes, serve};

    fn loader_for(base_url: String) -> DatasetLoader {
        let config = AppConfig {
            api_base_url: base_url,
            ..AppConfig::default()
        };
        DatasetLoader::new(&config).expect("build loader")
    }

    #[tokio::test]
    async fn successful_run_installs_and_reports() {
        let base = serve(default_routes()).await;
        let slot = SnapshotSlot::new();
        let (tx, mut rx) = mpsc::channel(1);

        DatasetSync::new(loader_for(base), slot.clone())
            .run(tx)
            .await
            .expect("run");

        match rx.recv().await.expect("event") {
            LoadEvent::Success {
                snapshot,
                generation,
                installed,
            } => {
                assert!(installed);
                assert_eq!(generation, 1);
                assert_eq!(snapshot.units.len(), 2);
            }
            other => panic!("expected success event, got {other:?}"),
        }
        assert!(slot.current().is_some());
    }

    #[tokio::test]
    async fn failed_run_reports_error_and_installs_nothing() {
        let mut routes = default_routes();
        routes.remove("index.json");
        let base = serve(routes).await;
        let slot = SnapshotSlot::new();
        let (tx, mut rx) = mpsc::channel(1);

        DatasetSync::new(loader_for(base), slot.clone())
            .run(tx)
            .await
            .expect("run");

        match rx.recv().await.expect("event") {
            LoadEvent::Error { error, generation } => {
                assert_eq!(generation, 1);
                assert!(matches!(error, DatasetError::Load { meta: 404, .. }));
            }
            other => panic!("expected error event, got {other:?}"),
        }
        assert!(slot.current().is_none());
    }
}
