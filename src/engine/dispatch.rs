use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::*;

use super::resize::clamp_resize;
use super::store::Snapshot;
use super::EngineError;

/// Which edges of an item the board lets a user drag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizePolicy {
    None,
    #[serde(alias = "left")]
    Start,
    #[serde(alias = "right")]
    End,
    #[default]
    Both,
}

impl ResizePolicy {
    pub fn allows(self, edge: Edge) -> bool {
        matches!(
            (self, edge),
            (ResizePolicy::Both, _) | (ResizePolicy::Start, Edge::Start) | (ResizePolicy::End, Edge::End)
        )
    }
}

impl FromStr for ResizePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "false" => Ok(ResizePolicy::None),
            "start" | "left" => Ok(ResizePolicy::Start),
            "end" | "right" => Ok(ResizePolicy::End),
            "both" | "true" => Ok(ResizePolicy::Both),
            other => Err(format!("unknown resize policy: {other}")),
        }
    }
}

/// Capability flags consulted before a gesture reaches the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GesturePolicy {
    pub can_resize: ResizePolicy,
}

impl GesturePolicy {
    /// Moving an item (both edges at once) is never offered by the board.
    pub const fn can_move(&self) -> bool {
        false
    }
}

/// A drag in progress, as reported by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Gesture {
    Move { item: ItemId, time: Ms },
    Resize { item: ItemId, time: Ms, edge: Edge },
}

impl Gesture {
    pub fn item(&self) -> ItemId {
        match self {
            Gesture::Move { item, .. } | Gesture::Resize { item, .. } => *item,
        }
    }
}

/// Reject gestures the policy does not allow, without looking at the lane.
pub fn check_gesture(policy: &GesturePolicy, gesture: &Gesture) -> Result<(), EngineError> {
    match *gesture {
        // No move path exists behind the policy; see `GesturePolicy::can_move`.
        Gesture::Move { item, .. } => Err(EngineError::MoveRejected(item)),
        Gesture::Resize { item, edge, .. } if !policy.can_resize.allows(edge) => {
            Err(EngineError::ResizeRejected(item))
        }
        Gesture::Resize { .. } => Ok(()),
    }
}

/// Live validation while dragging: the position the dragged edge may take,
/// or `None` when the gesture is not allowed at all.
///
/// An unknown item passes `time` through unchanged.
pub fn validate_gesture(snapshot: &Snapshot, policy: &GesturePolicy, gesture: &Gesture) -> Option<Ms> {
    check_gesture(policy, gesture).ok()?;
    let Gesture::Resize { item, time, edge } = *gesture else {
        return None;
    };
    Some(match snapshot.lane_of(item) {
        Some(lane) => clamp_resize(lane, item, time, edge),
        None => time,
    })
}
