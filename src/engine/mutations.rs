use std::collections::BTreeSet;

use tracing::info;
use ulid::Ulid;

use crate::config::EngineConfig;
use crate::model::*;

use super::dispatch::check_gesture;
use super::insertion::{commit_insertion, plan_insertion};
use super::{edit, resize, Board, EngineError, Gesture, Snapshot};

impl Board {
    /// Replace the whole board with `items`. Fails without touching the
    /// current snapshot if the items overlap within a lane.
    ///
    /// Every lane whose contents changed, including lanes the import empties,
    /// gets one `LaneReplaced` event.
    pub async fn import(&self, items: Vec<Item>) -> Result<usize, EngineError> {
        let (count, lanes) = self
            .commit("import", |snap| {
                let next = Snapshot::from_items(items)?;
                let touched: BTreeSet<GroupId> = snap.groups().chain(next.groups()).collect();
                let events: Vec<Event> = touched
                    .into_iter()
                    .filter(|group| snap.lane_items(*group) != next.lane_items(*group))
                    .map(|group| Event::LaneReplaced {
                        group,
                        items: next.lane_items(group).to_vec(),
                    })
                    .collect();
                let counts = (next.len(), next.lane_count());
                Ok((next, counts, events))
            })
            .await?;
        info!("imported {count} items across {lanes} lanes");
        Ok(count)
    }

    /// Create an item where the user clicked an empty part of `group`.
    pub async fn create_at(&self, group: GroupId, at: Ms, payload: ItemPayload) -> Result<Item, EngineError> {
        let cfg = self.config;
        let item = self
            .commit("create", |snap| {
                let empty = Lane::new();
                let lane = snap.lane(group).unwrap_or(&empty);
                let span = plan_insertion(lane, group, at, cfg.default_duration, cfg.min_duration)?;
                let item = Item::new(Ulid::new(), group, span, payload);
                let next = commit_insertion(snap, item.clone())?;
                Ok((next, item.clone(), [Event::ItemCreated { item }]))
            })
            .await?;
        info!("created item {} in lane {group} at [{}, {})", item.id, item.span.start, item.span.end);
        Ok(item)
    }

    /// Commit a finished resize drag. The edge is clamped against its neighbor.
    pub async fn resize(&self, item_id: ItemId, time: Ms, edge: Edge) -> Result<Item, EngineError> {
        let EngineConfig { policy, min_duration, .. } = self.config;
        let item = self
            .commit("resize", |snap| {
                check_gesture(&policy, &Gesture::Resize { item: item_id, time, edge })?;
                let (next, item) = resize::commit_resize(snap, item_id, time, edge, min_duration)?;
                let event = Event::ItemResized {
                    id: item.id,
                    group: item.group,
                    span: item.span,
                };
                Ok((next, item, [event]))
            })
            .await?;
        if (edge == Edge::End && item.span.end != time) || (edge == Edge::Start && item.span.start != time) {
            metrics::counter!(crate::observability::CLAMPS_TOTAL, "edge" => edge_label(edge)).increment(1);
        }
        info!("resized item {item_id} to [{}, {})", item.span.start, item.span.end);
        Ok(item)
    }

    /// Always rejected: items only change position through resize.
    pub fn move_item(&self, item_id: ItemId, time: Ms) -> Result<Item, EngineError> {
        let err = match check_gesture(&self.config.policy, &Gesture::Move { item: item_id, time }) {
            Err(e) => e,
            Ok(()) => EngineError::MoveRejected(item_id),
        };
        metrics::counter!(crate::observability::MUTATIONS_TOTAL, "op" => "move", "status" => err.kind())
            .increment(1);
        tracing::debug!("move rejected for {item_id}");
        Err(err)
    }

    /// Apply a form edit (payload and interval) to an existing item.
    pub async fn update(&self, item: Item) -> Result<Item, EngineError> {
        let item = self
            .commit("update", |snap| {
                let (next, item) = edit::update_item(snap, item)?;
                Ok((next, item.clone(), [Event::ItemUpdated { item }]))
            })
            .await?;
        info!("updated item {}", item.id);
        Ok(item)
    }

    pub async fn remove(&self, item_id: ItemId) -> Result<Item, EngineError> {
        let item = self
            .commit("remove", |snap| {
                let (next, item) = edit::remove_item(snap, item_id)?;
                let event = Event::ItemRemoved {
                    id: item.id,
                    group: item.group,
                };
                Ok((next, item, [event]))
            })
            .await?;
        info!("removed item {item_id} from lane {}", item.group);
        Ok(item)
    }
}

fn edge_label(edge: Edge) -> &'static str {
    match edge {
        Edge::Start => "start",
        Edge::End => "end",
    }
}
