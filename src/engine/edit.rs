use crate::model::*;

use super::conflict::{check_no_conflict, validate_payload, validate_span};
use super::store::Snapshot;
use super::EngineError;

/// Replace an existing item's payload and interval (a form edit).
///
/// Unlike a resize nothing is clamped: the new interval must already fit
/// between the other items of the lane, or the edit fails with `Conflict`.
pub fn update_item(snapshot: &Snapshot, item: Item) -> Result<(Snapshot, Item), EngineError> {
    let current = snapshot.get(item.id).ok_or(EngineError::NotFound(item.id))?;
    if current.group != item.group {
        return Err(EngineError::GroupMismatch(item.id));
    }
    validate_span(&item.span)?;
    validate_payload(&item.payload)?;
    if let Some(lane) = snapshot.lane(item.group) {
        check_no_conflict(lane, &item.span, Some(item.id))?;
    }

    Ok((snapshot.with_item(item.clone()), item))
}

/// Drop an item. Removal never needs conflict resolution.
pub fn remove_item(snapshot: &Snapshot, id: ItemId) -> Result<(Snapshot, Item), EngineError> {
    let removed = snapshot.get(id).cloned().ok_or(EngineError::NotFound(id))?;
    Ok((snapshot.without_item(id), removed))
}
