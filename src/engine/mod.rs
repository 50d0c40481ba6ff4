mod conflict;
mod dispatch;
mod edit;
mod error;
mod insertion;
mod mutations;
mod neighbors;
mod queries;
mod resize;
mod store;

pub use dispatch::{check_gesture, validate_gesture, Gesture, GesturePolicy, ResizePolicy};
pub use edit::{remove_item, update_item};
pub use error::EngineError;
pub use insertion::{commit_insertion, plan_insertion};
pub use neighbors::{find_neighbors, LaneView};
pub use resize::{clamp_resize, commit_resize};
pub use store::Snapshot;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::EngineConfig;
use crate::model::*;
use crate::notify::NotifyHub;

/// Authoritative item store in front of the stateless engine functions.
///
/// Every mutation runs read snapshot → compute → swap under the write lock,
/// so concurrent edits of one lane never clamp against a stale neighbor set.
/// Readers get the current `Arc<Snapshot>` and never block a writer for long.
pub struct Board {
    snapshot: RwLock<Arc<Snapshot>>,
    config: EngineConfig,
    pub notify: Arc<NotifyHub>,
}

impl Board {
    pub fn new(config: EngineConfig, notify: Arc<NotifyHub>) -> Self {
        Self::with_snapshot(config, notify, Snapshot::new())
    }

    pub fn with_snapshot(config: EngineConfig, notify: Arc<NotifyHub>, snapshot: Snapshot) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(snapshot)),
            config,
            notify,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute + swap + notify in one serialized step. `f` sees the current
    /// snapshot and returns its replacement plus the events to broadcast; on
    /// error nothing changes.
    pub(super) async fn commit<T, E>(
        &self,
        op: &'static str,
        f: impl FnOnce(&Snapshot) -> Result<(Snapshot, T, E), EngineError>,
    ) -> Result<T, EngineError>
    where
        E: IntoIterator<Item = Event>,
    {
        let mut guard = self.snapshot.write().await;
        match f(&**guard) {
            Ok((next, out, events)) => {
                *guard = Arc::new(next);
                // Sent under the lock so subscribers see commit order.
                for event in events {
                    self.notify.send(event.group(), &event);
                }
                drop(guard);
                metrics::counter!(crate::observability::MUTATIONS_TOTAL, "op" => op, "status" => "ok")
                    .increment(1);
                Ok(out)
            }
            Err(e) => {
                metrics::counter!(crate::observability::MUTATIONS_TOTAL, "op" => op, "status" => e.kind())
                    .increment(1);
                tracing::debug!("{op} rejected: {e}");
                Err(e)
            }
        }
    }
}
