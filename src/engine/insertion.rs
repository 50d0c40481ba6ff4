use crate::model::*;

use super::conflict::{check_no_conflict, validate_payload, validate_span};
use super::neighbors::LaneView;
use super::store::Snapshot;
use super::EngineError;

/// Interval for a new item created by clicking `group` at `at`.
///
/// The start is always `at`. The end is `at + default_duration`, pulled back
/// to the next item's start when that item begins earlier. The previous item
/// is never consulted, so a new item may sit flush against it.
///
/// Fails with `NoRoomAtPoint` when `at` lies inside an existing item or the
/// gap up to the next item is shorter than `min_duration`.
pub fn plan_insertion<L: LaneView + ?Sized>(
    lane: &L,
    group: GroupId,
    at: Ms,
    default_duration: Ms,
    min_duration: Ms,
) -> Result<Span, EngineError> {
    if default_duration < min_duration.max(1) {
        return Err(EngineError::LimitExceeded("default duration below minimum"));
    }
    if lane.covering(at).is_some() {
        return Err(EngineError::NoRoomAtPoint { group, at });
    }
    let candidate_end = at
        .checked_add(default_duration)
        .ok_or(EngineError::LimitExceeded("timestamp out of range"))?;

    let end = match lane.neighbors(Reference::Point(at), None).next {
        Some(next) if next.span.start < candidate_end => next.span.start,
        _ => candidate_end,
    };
    if end - at < min_duration.max(1) {
        return Err(EngineError::NoRoomAtPoint { group, at });
    }
    Ok(Span::new(at, end))
}

/// Add a fully formed item to its lane, returning the new snapshot.
pub fn commit_insertion(snapshot: &Snapshot, item: Item) -> Result<Snapshot, EngineError> {
    validate_span(&item.span)?;
    validate_payload(&item.payload)?;
    if snapshot.contains(item.id) {
        return Err(EngineError::AlreadyExists(item.id));
    }
    if let Some(lane) = snapshot.lane(item.group) {
        check_no_conflict(lane, &item.span, None)?;
    }
    snapshot.check_room(item.group)?;

    Ok(snapshot.with_item(item))
}
