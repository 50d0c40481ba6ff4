use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unix milliseconds, the only time type.
pub type Ms = i64;

/// Identifier of a scheduled item. Allocated by the creator, never by the engine.
pub type ItemId = Ulid;

/// Identifier of a lane (the `group` an item belongs to).
pub type GroupId = Ulid;

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: Ms,
    pub end: Ms,
}

impl Span {
    pub fn new(start: Ms, end: Ms) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    /// Checked constructor for computed or untrusted bounds.
    pub fn try_new(start: Ms, end: Ms) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// Saturates for spans wider than `Ms` can express.
    pub fn duration_ms(&self) -> Ms {
        self.end.saturating_sub(self.start)
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains_instant(&self, t: Ms) -> bool {
        self.start <= t && t < self.end
    }
}

/// Which boundary of an item a resize drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    #[serde(alias = "left")]
    Start,
    #[serde(alias = "right")]
    End,
}

/// What neighbors are measured against: an existing item's interval, or a bare
/// timestamp treated as a zero-width point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Span(Span),
    Point(Ms),
}

impl Reference {
    pub fn start(&self) -> Ms {
        match self {
            Reference::Span(span) => span.start,
            Reference::Point(t) => *t,
        }
    }

    pub fn end(&self) -> Ms {
        match self {
            Reference::Span(span) => span.end,
            Reference::Point(t) => *t,
        }
    }
}

impl From<Span> for Reference {
    fn from(span: Span) -> Self {
        Reference::Span(span)
    }
}

/// Display fields carried by an item. The engine never reads them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ItemPayload {
    /// Payload given to items created by clicking an empty lane.
    pub fn placeholder() -> Self {
        Self {
            title: "new task".into(),
            location: "location".into(),
            description: String::new(),
            color: None,
        }
    }
}

/// A scheduled unit of work on one lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub group: GroupId,
    #[serde(flatten)]
    pub span: Span,
    #[serde(flatten)]
    pub payload: ItemPayload,
}

impl Item {
    pub fn new(id: ItemId, group: GroupId, span: Span, payload: ItemPayload) -> Self {
        Self { id, group, span, payload }
    }

    /// Same item with a different interval; payload passes through untouched.
    pub fn with_span(&self, span: Span) -> Self {
        Self { span, ..self.clone() }
    }
}

/// The nearest non-overlapping items on either side of a reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Neighbors<'a> {
    /// Latest-ending item with `end <= reference.start`.
    pub previous: Option<&'a Item>,
    /// Earliest-starting item with `start >= reference.end`.
    pub next: Option<&'a Item>,
}

/// All items of one group, kept in interval order.
#[derive(Debug, Clone, Default)]
pub struct Lane {
    /// Sorted by `(span.start, id)`.
    items: Vec<Item>,
    /// `(end, Reverse(id)) -> start`. The last key at or below a bound is the
    /// latest-ending item, lowest id first among equal ends.
    ends: BTreeMap<(Ms, Reverse<ItemId>), Ms>,
    /// `id -> start`, to find an item's slot without a scan.
    starts: BTreeMap<ItemId, Ms>,
}

impl Lane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    fn index_of(&self, start: Ms, id: ItemId) -> Result<usize, usize> {
        self.items
            .binary_search_by(|i| (i.span.start, i.id).cmp(&(start, id)))
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        let start = *self.starts.get(&id)?;
        self.index_of(start, id).ok().map(|pos| &self.items[pos])
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.starts.contains_key(&id)
    }

    /// Insert item maintaining `(start, id)` order. An item with the same id
    /// is replaced.
    pub fn insert_item(&mut self, item: Item) {
        self.remove_item(item.id);
        let pos = self
            .index_of(item.span.start, item.id)
            .unwrap_or_else(|e| e);
        self.ends
            .insert((item.span.end, Reverse(item.id)), item.span.start);
        self.starts.insert(item.id, item.span.start);
        self.items.insert(pos, item);
    }

    /// Remove item by id.
    pub fn remove_item(&mut self, id: ItemId) -> Option<Item> {
        let start = self.starts.remove(&id)?;
        let pos = self.index_of(start, id).ok()?;
        let item = self.items.remove(pos);
        self.ends.remove(&(item.span.end, Reverse(item.id)));
        Some(item)
    }

    /// Indexed neighbor lookup, O(log n) plus the skipped `exclude`.
    pub fn neighbors(&self, reference: Reference, exclude: Option<ItemId>) -> Neighbors<'_> {
        let from = self
            .items
            .partition_point(|i| i.span.start < reference.end());
        let next = self.items[from..]
            .iter()
            .find(|i| Some(i.id) != exclude);

        // Reverse(nil) sorts last, so the bound admits every id ending at reference.start.
        let previous = self
            .ends
            .range(..=(reference.start(), Reverse(Ulid::nil())))
            .rev()
            .find(|((_, Reverse(id)), _)| Some(*id) != exclude)
            .and_then(|((_, Reverse(id)), start)| {
                self.index_of(*start, *id).ok().map(|pos| &self.items[pos])
            });

        Neighbors { previous, next }
    }

    /// Return only items whose span overlaps the query window.
    /// Uses binary search to skip items starting at or after `query.end`.
    pub fn overlapping(&self, query: &Span) -> impl Iterator<Item = &Item> {
        let right_bound = self
            .items
            .partition_point(|i| i.span.start < query.end);
        self.items[..right_bound]
            .iter()
            .filter(move |i| i.span.end > query.start)
    }

    /// First item whose span contains the instant `t`.
    pub fn covering(&self, t: Ms) -> Option<&Item> {
        let right_bound = self.items.partition_point(|i| i.span.start <= t);
        self.items[..right_bound]
            .iter()
            .find(|i| i.span.contains_instant(t))
    }
}

/// Committed change to the board. Broadcast per lane after every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    ItemCreated { item: Item },
    ItemResized { id: ItemId, group: GroupId, span: Span },
    ItemUpdated { item: Item },
    ItemRemoved { id: ItemId, group: GroupId },
    /// A bulk import changed the lane; `items` is its full new contents.
    LaneReplaced { group: GroupId, items: Vec<Item> },
}

impl Event {
    pub fn group(&self) -> GroupId {
        match self {
            Event::ItemCreated { item } | Event::ItemUpdated { item } => item.group,
            Event::ItemResized { group, .. }
            | Event::ItemRemoved { group, .. }
            | Event::LaneReplaced { group, .. } => *group,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u128, start: Ms, end: Ms) -> Item {
        Item::new(
            Ulid::from(id),
            Ulid::from(1000u128),
            Span::new(start, end),
            ItemPayload::default(),
        )
    }

    fn lane(items: Vec<Item>) -> Lane {
        let mut lane = Lane::new();
        for i in items {
            lane.insert_item(i);
        }
        lane
    }

    #[test]
    fn span_basics() {
        let s = Span::new(100, 200);
        assert_eq!(s.duration_ms(), 100);
        assert!(s.contains_instant(100));
        assert!(s.contains_instant(199));
        assert!(!s.contains_instant(200)); // half-open
    }

    #[test]
    fn span_overlap() {
        let a = Span::new(100, 200);
        let b = Span::new(150, 250);
        let c = Span::new(200, 300);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c)); // adjacent, not overlapping
    }

    #[test]
    fn span_try_new_rejects_degenerate() {
        assert!(Span::try_new(100, 100).is_none());
        assert!(Span::try_new(100, 50).is_none());
        assert_eq!(Span::try_new(1, 2), Some(Span::new(1, 2)));
    }

    #[test]
    fn point_reference_has_equal_bounds() {
        let r = Reference::Point(1000);
        assert_eq!(r.start(), 1000);
        assert_eq!(r.end(), 1000);
        let s: Reference = Span::new(5, 9).into();
        assert_eq!((s.start(), s.end()), (5, 9));
    }

    #[test]
    fn lane_keeps_start_order() {
        let l = lane(vec![item(1, 300, 400), item(2, 100, 200), item(3, 200, 300)]);
        let starts: Vec<Ms> = l.items().iter().map(|i| i.span.start).collect();
        assert_eq!(starts, vec![100, 200, 300]);
    }

    #[test]
    fn lane_remove_keeps_indexes_consistent() {
        let mut l = lane(vec![item(1, 0, 100), item(2, 200, 300), item(3, 400, 500)]);
        assert_eq!(l.remove_item(Ulid::from(2u128)).map(|i| i.span.start), Some(200));
        assert!(l.remove_item(Ulid::from(2u128)).is_none());
        assert_eq!(l.len(), 2);

        let n = l.neighbors(Reference::Point(350), None);
        assert_eq!(n.previous.map(|i| i.id), Some(Ulid::from(1u128)));
        assert_eq!(n.next.map(|i| i.id), Some(Ulid::from(3u128)));
    }

    #[test]
    fn lane_get_follows_reinsert() {
        let mut l = lane(vec![item(1, 0, 100), item(2, 200, 300)]);
        l.insert_item(item(1, 500, 600));
        assert_eq!(l.len(), 2);
        assert_eq!(l.get(Ulid::from(1u128)).map(|i| i.span), Some(Span::new(500, 600)));
        assert!(l.contains(Ulid::from(2u128)));
        assert!(l.get(Ulid::from(3u128)).is_none());
        let starts: Vec<Ms> = l.items().iter().map(|i| i.span.start).collect();
        assert_eq!(starts, vec![200, 500]);
    }

    #[test]
    fn span_duration_saturates() {
        let wide = Span { start: Ms::MIN, end: Ms::MAX };
        assert_eq!(wide.duration_ms(), Ms::MAX);
    }

    #[test]
    fn lane_neighbors_adjacent_bounds_qualify() {
        let l = lane(vec![item(1, 0, 100), item(2, 100, 200), item(3, 200, 300)]);
        let n = l.neighbors(Reference::Span(Span::new(100, 200)), Some(Ulid::from(2u128)));
        assert_eq!(n.previous.map(|i| i.id), Some(Ulid::from(1u128)));
        assert_eq!(n.next.map(|i| i.id), Some(Ulid::from(3u128)));
    }

    #[test]
    fn lane_neighbors_equal_end_prefers_lowest_id() {
        // Overlapping input is the caller's fault, but selection must stay deterministic.
        let l = lane(vec![item(7, 10, 100), item(3, 50, 100), item(9, 0, 100)]);
        let n = l.neighbors(Reference::Point(150), None);
        assert_eq!(n.previous.map(|i| i.id), Some(Ulid::from(3u128)));
    }

    #[test]
    fn lane_neighbors_equal_start_prefers_lowest_id() {
        let l = lane(vec![item(8, 500, 600), item(4, 500, 550)]);
        let n = l.neighbors(Reference::Point(100), None);
        assert_eq!(n.next.map(|i| i.id), Some(Ulid::from(4u128)));
    }

    #[test]
    fn lane_neighbors_exclude_falls_through() {
        let l = lane(vec![item(1, 0, 100), item(2, 0, 100)]);
        let n = l.neighbors(Reference::Point(100), Some(Ulid::from(1u128)));
        assert_eq!(n.previous.map(|i| i.id), Some(Ulid::from(2u128)));
        assert!(n.next.is_none());
    }

    #[test]
    fn lane_neighbors_empty() {
        let l = Lane::new();
        assert_eq!(l.neighbors(Reference::Point(0), None), Neighbors::default());
    }

    #[test]
    fn overlapping_adjacent_not_included() {
        let l = lane(vec![item(1, 100, 200)]);
        assert_eq!(l.overlapping(&Span::new(200, 300)).count(), 0);
        assert_eq!(l.overlapping(&Span::new(199, 300)).count(), 1);
    }

    #[test]
    fn covering_finds_item_containing_instant() {
        let l = lane(vec![item(1, 100, 200), item(2, 300, 400)]);
        assert_eq!(l.covering(150).map(|i| i.id), Some(Ulid::from(1u128)));
        assert_eq!(l.covering(300).map(|i| i.id), Some(Ulid::from(2u128)));
        assert!(l.covering(200).is_none());
        assert!(l.covering(50).is_none());
    }

    #[test]
    fn item_json_is_flat() {
        let i = item(1, 10, 20);
        let v = serde_json::to_value(&i).unwrap();
        assert_eq!(v["start"], 10);
        assert_eq!(v["end"], 20);
        assert_eq!(v["title"], "");
        let back: Item = serde_json::from_value(v).unwrap();
        assert_eq!(back, i);
    }

    #[test]
    fn edge_accepts_widget_names() {
        let e: Edge = serde_json::from_str("\"left\"").unwrap();
        assert_eq!(e, Edge::Start);
        let e: Edge = serde_json::from_str("\"end\"").unwrap();
        assert_eq!(e, Edge::End);
    }

    #[test]
    fn event_group() {
        let i = item(1, 0, 10);
        let g = i.group;
        assert_eq!(Event::ItemCreated { item: i }.group(), g);
        assert_eq!(
            Event::ItemRemoved { id: Ulid::from(1u128), group: g }.group(),
            g
        );
        assert_eq!(
            Event::LaneReplaced { group: g, items: Vec::new() }.group(),
            g
        );
    }
}
