use crate::model::{GroupId, ItemId, Ms};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    NotFound(ItemId),
    AlreadyExists(ItemId),
    /// Clamping moved one edge across the opposite edge of the same item.
    IntervalCollapsed {
        id: ItemId,
        start: Ms,
        end: Ms,
    },
    /// The gap at a click point is shorter than the minimum item duration.
    NoRoomAtPoint {
        group: GroupId,
        at: Ms,
    },
    MoveRejected(ItemId),
    ResizeRejected(ItemId),
    Conflict(ItemId),
    GroupMismatch(ItemId),
    InvalidSpan {
        start: Ms,
        end: Ms,
    },
    LimitExceeded(&'static str),
}

impl EngineError {
    /// Short stable name, used as a metrics label and in script replies.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::NotFound(_) => "not_found",
            EngineError::AlreadyExists(_) => "already_exists",
            EngineError::IntervalCollapsed { .. } => "interval_collapsed",
            EngineError::NoRoomAtPoint { .. } => "no_room_at_point",
            EngineError::MoveRejected(_) => "move_rejected",
            EngineError::ResizeRejected(_) => "resize_rejected",
            EngineError::Conflict(_) => "conflict",
            EngineError::GroupMismatch(_) => "group_mismatch",
            EngineError::InvalidSpan { .. } => "invalid_span",
            EngineError::LimitExceeded(_) => "limit_exceeded",
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::NotFound(id) => write!(f, "not found: {id}"),
            EngineError::AlreadyExists(id) => write!(f, "already exists: {id}"),
            EngineError::IntervalCollapsed { id, start, end } => {
                write!(f, "interval collapsed for {id}: [{start}, {end}) is empty")
            }
            EngineError::NoRoomAtPoint { group, at } => {
                write!(f, "no room at {at} in lane {group}")
            }
            EngineError::MoveRejected(id) => write!(f, "move rejected for {id}: moving is disabled"),
            EngineError::ResizeRejected(id) => {
                write!(f, "resize rejected for {id}: edge is not resizable")
            }
            EngineError::Conflict(id) => write!(f, "conflict with item: {id}"),
            EngineError::GroupMismatch(id) => write!(f, "item {id} cannot change lanes"),
            EngineError::InvalidSpan { start, end } => {
                write!(f, "invalid span [{start}, {end}): start must be before end")
            }
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
