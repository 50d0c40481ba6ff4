use crate::model::*;

use super::conflict::validate_span;
use super::neighbors::LaneView;
use super::store::Snapshot;
use super::EngineError;

/// Bound a proposed edge position by the adjacent neighbor on that side.
///
/// The neighbors are taken relative to the item's current interval with the
/// item itself excluded. An unknown `item_id` leaves `proposed` unchanged.
pub fn clamp_resize<L: LaneView + ?Sized>(lane: &L, item_id: ItemId, proposed: Ms, edge: Edge) -> Ms {
    let Some(item) = lane.find(item_id) else {
        return proposed;
    };
    let neighbors = lane.neighbors(Reference::Span(item.span), Some(item_id));
    match edge {
        Edge::End => neighbors
            .next
            .map_or(proposed, |next| proposed.min(next.span.start)),
        Edge::Start => neighbors
            .previous
            .map_or(proposed, |prev| proposed.max(prev.span.end)),
    }
}

/// Span after moving one edge of `item` to `clamped`. The opposite edge stays put.
///
/// An edge past the opposite one collapses the item; an edge outside the
/// representable timestamp range is a `LimitExceeded`.
pub(crate) fn resized_span(item: &Item, clamped: Ms, edge: Edge, min_duration: Ms) -> Result<Span, EngineError> {
    let (start, end) = match edge {
        Edge::Start => (clamped, item.span.end),
        Edge::End => (item.span.start, clamped),
    };
    let collapsed = EngineError::IntervalCollapsed {
        id: item.id,
        start,
        end,
    };
    let span = Span::try_new(start, end).ok_or_else(|| collapsed.clone())?;
    validate_span(&span)?;
    if span.duration_ms() < min_duration {
        return Err(collapsed);
    }
    Ok(span)
}

/// Clamp and apply a resize, returning the new snapshot and the updated item.
///
/// Rejected with `IntervalCollapsed` when the clamped edge would leave an
/// interval shorter than `min_duration`, and with `LimitExceeded` when it
/// leaves the timestamp range. `snapshot` is never modified.
pub fn commit_resize(
    snapshot: &Snapshot,
    item_id: ItemId,
    proposed: Ms,
    edge: Edge,
    min_duration: Ms,
) -> Result<(Snapshot, Item), EngineError> {
    let lane = snapshot.lane_of(item_id).ok_or(EngineError::NotFound(item_id))?;
    let item = lane.get(item_id).ok_or(EngineError::NotFound(item_id))?;

    let clamped = clamp_resize(lane, item_id, proposed, edge);
    let span = resized_span(item, clamped, edge, min_duration)?;

    let updated = item.with_span(span);
    Ok((snapshot.with_item(updated.clone()), updated))
}
