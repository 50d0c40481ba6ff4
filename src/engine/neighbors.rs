use std::cmp::Reverse;

use crate::model::*;

/// Read access to the items of a single lane.
///
/// Implemented for plain slices (linear scans, any order) and for [`Lane`]
/// (ordered indexes). Both must select the same neighbors for the same input.
pub trait LaneView {
    fn find(&self, id: ItemId) -> Option<&Item>;

    fn neighbors(&self, reference: Reference, exclude: Option<ItemId>) -> Neighbors<'_>;

    /// First item whose span contains `t`.
    fn covering(&self, t: Ms) -> Option<&Item>;

    /// First item other than `exclude` overlapping `span`.
    fn first_overlap(&self, span: &Span, exclude: Option<ItemId>) -> Option<&Item>;
}

impl LaneView for [Item] {
    fn find(&self, id: ItemId) -> Option<&Item> {
        self.iter().find(|i| i.id == id)
    }

    fn neighbors(&self, reference: Reference, exclude: Option<ItemId>) -> Neighbors<'_> {
        find_neighbors(self, reference, exclude)
    }

    fn covering(&self, t: Ms) -> Option<&Item> {
        self.iter().find(|i| i.span.contains_instant(t))
    }

    fn first_overlap(&self, span: &Span, exclude: Option<ItemId>) -> Option<&Item> {
        self.iter()
            .find(|i| Some(i.id) != exclude && i.span.overlaps(span))
    }
}

impl LaneView for Lane {
    fn find(&self, id: ItemId) -> Option<&Item> {
        self.get(id)
    }

    fn neighbors(&self, reference: Reference, exclude: Option<ItemId>) -> Neighbors<'_> {
        Lane::neighbors(self, reference, exclude)
    }

    fn covering(&self, t: Ms) -> Option<&Item> {
        Lane::covering(self, t)
    }

    fn first_overlap(&self, span: &Span, exclude: Option<ItemId>) -> Option<&Item> {
        self.overlapping(span).find(|i| Some(i.id) != exclude)
    }
}

/// Nearest preceding and following items around `reference`.
///
/// - previous: max `end` among items with `end <= reference.start`
/// - next: min `start` among items with `start >= reference.end`
///
/// Ties go to the lowest id, so repeated calls on an unchanged lane agree.
/// `exclude` is dropped before selection. Input order does not matter.
pub fn find_neighbors(
    lane_items: &[Item],
    reference: Reference,
    exclude: Option<ItemId>,
) -> Neighbors<'_> {
    let mut previous: Option<&Item> = None;
    let mut next: Option<&Item> = None;

    for item in lane_items {
        if Some(item.id) == exclude {
            continue;
        }
        if item.span.end <= reference.start()
            && previous.is_none_or(|p| {
                (item.span.end, Reverse(item.id)) > (p.span.end, Reverse(p.id))
            })
        {
            previous = Some(item);
        }
        if item.span.start >= reference.end()
            && next.is_none_or(|n| (item.span.start, item.id) < (n.span.start, n.id))
        {
            next = Some(item);
        }
    }

    Neighbors { previous, next }
}
