use std::sync::Arc;

use crate::model::*;

use super::dispatch::validate_gesture;
use super::insertion::plan_insertion;
use super::{Board, EngineError, Gesture, LaneView, Snapshot};

impl Board {
    /// Current snapshot. Cheap: clones an `Arc`.
    pub async fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.read().await.clone()
    }

    pub async fn get_item(&self, id: ItemId) -> Option<Item> {
        self.snapshot.read().await.get(id).cloned()
    }

    pub async fn lane_items(&self, group: GroupId) -> Vec<Item> {
        self.snapshot.read().await.lane_items(group).to_vec()
    }

    /// Where the dragged edge may go right now; `None` if the gesture is refused.
    pub async fn validate(&self, gesture: Gesture) -> Option<Ms> {
        let snap = self.snapshot().await;
        let adjusted = validate_gesture(&snap, &self.config.policy, &gesture);
        metrics::counter!(
            crate::observability::VALIDATIONS_TOTAL,
            "status" => if adjusted.is_some() { "ok" } else { "rejected" }
        )
        .increment(1);
        adjusted
    }

    /// The interval a click at `at` would create, without creating it.
    pub async fn preview_insertion(&self, group: GroupId, at: Ms) -> Result<Span, EngineError> {
        let snap = self.snapshot().await;
        let empty = Lane::new();
        plan_insertion(
            snap.lane(group).unwrap_or(&empty),
            group,
            at,
            self.config.default_duration,
            self.config.min_duration,
        )
    }

    /// Owned neighbors of `reference` in `group`.
    pub async fn neighbors(
        &self,
        group: GroupId,
        reference: Reference,
        exclude: Option<ItemId>,
    ) -> (Option<Item>, Option<Item>) {
        let snap = self.snapshot().await;
        let found = match snap.lane(group) {
            Some(lane) => LaneView::neighbors(lane, reference, exclude),
            None => Neighbors::default(),
        };
        (found.previous.cloned(), found.next.cloned())
    }
}
