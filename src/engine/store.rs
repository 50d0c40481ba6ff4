use std::collections::BTreeMap;
use std::sync::Arc;

use im::OrdMap;

use crate::limits::*;
use crate::model::*;

use super::conflict::{check_no_conflict, validate_payload, validate_span};
use super::EngineError;

/// Immutable point-in-time view of every item, grouped by lane.
///
/// Cloning copies only the lane table; lanes are shared until a mutation
/// touches one, which then gets its own copy. The id index is a persistent
/// map, so a clone shares it and an edit copies one path.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    lanes: BTreeMap<GroupId, Arc<Lane>>,
    /// Lane of every item.
    ids: OrdMap<ItemId, GroupId>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from a flat item list, rejecting anything that breaks
    /// the per-lane non-overlap invariant.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Result<Self, EngineError> {
        let mut lanes: BTreeMap<GroupId, Lane> = BTreeMap::new();
        let mut ids = OrdMap::new();

        for (count, item) in items.into_iter().enumerate() {
            if count >= MAX_IMPORT_SIZE {
                return Err(EngineError::LimitExceeded("import too large"));
            }
            validate_span(&item.span)?;
            validate_payload(&item.payload)?;
            if ids.insert(item.id, item.group).is_some() {
                return Err(EngineError::AlreadyExists(item.id));
            }
            if !lanes.contains_key(&item.group) && lanes.len() >= MAX_LANES {
                return Err(EngineError::LimitExceeded("too many lanes"));
            }
            let lane = lanes.entry(item.group).or_default();
            if lane.len() >= MAX_ITEMS_PER_LANE {
                return Err(EngineError::LimitExceeded("too many items in lane"));
            }
            check_no_conflict(&*lane, &item.span, None)?;
            lane.insert_item(item);
        }

        Ok(Self {
            lanes: lanes
                .into_iter()
                .map(|(group, lane)| (group, Arc::new(lane)))
                .collect(),
            ids,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn lane(&self, group: GroupId) -> Option<&Lane> {
        self.lanes.get(&group).map(|l| &**l)
    }

    /// Items of one lane in `(start, id)` order. Empty for an unknown group.
    pub fn lane_items(&self, group: GroupId) -> &[Item] {
        self.lane(group).map(|l| l.items()).unwrap_or(&[])
    }

    pub fn groups(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.lanes.keys().copied()
    }

    /// Every item, lane by lane.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.lanes.values().flat_map(|l| l.items().iter())
    }

    /// Lane holding `id`, if any.
    pub fn lane_of(&self, id: ItemId) -> Option<&Lane> {
        self.ids.get(&id).and_then(|group| self.lane(*group))
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.lane_of(id).and_then(|l| l.get(id))
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.ids.contains_key(&id)
    }

    /// Whether `group` can take one more item.
    pub(crate) fn check_room(&self, group: GroupId) -> Result<(), EngineError> {
        match self.lanes.get(&group) {
            Some(lane) if lane.len() >= MAX_ITEMS_PER_LANE => {
                Err(EngineError::LimitExceeded("too many items in lane"))
            }
            None if self.lanes.len() >= MAX_LANES => Err(EngineError::LimitExceeded("too many lanes")),
            _ => Ok(()),
        }
    }

    /// New snapshot holding `item`, replacing any item with the same id.
    /// Conflicts are the caller's to check.
    pub(crate) fn with_item(&self, item: Item) -> Self {
        let mut next = self.clone();
        if let Some(old) = next.ids.insert(item.id, item.group) {
            if old != item.group {
                next.edit_lane(old, |lane| {
                    lane.remove_item(item.id);
                });
            }
        }
        next.edit_lane(item.group, |lane| lane.insert_item(item));
        next
    }

    /// New snapshot without `id`. Lanes left empty are dropped.
    pub(crate) fn without_item(&self, id: ItemId) -> Self {
        let mut next = self.clone();
        if let Some(group) = next.ids.remove(&id) {
            next.edit_lane(group, |lane| {
                lane.remove_item(id);
            });
        }
        next
    }

    fn edit_lane(&mut self, group: GroupId, f: impl FnOnce(&mut Lane)) {
        let lane = self.lanes.entry(group).or_default();
        f(Arc::make_mut(lane));
        if lane.is_empty() {
            self.lanes.remove(&group);
        }
    }
}
