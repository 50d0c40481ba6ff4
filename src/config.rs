use crate::engine::{GesturePolicy, ResizePolicy};
use crate::model::Ms;

/// Length of an item created by clicking an empty lane: three hours.
pub const DEFAULT_DURATION_MS: Ms = 3 * 3_600_000;

/// Shortest interval the engine will create or leave behind after a resize.
pub const MIN_DURATION_MS: Ms = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub default_duration: Ms,
    pub min_duration: Ms,
    pub policy: GesturePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_duration: DEFAULT_DURATION_MS,
            min_duration: MIN_DURATION_MS,
            policy: GesturePolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Read overrides from `TIMELANE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let min_duration: Ms = lookup("TIMELANE_MIN_DURATION_MS")
            .and_then(|s| s.parse().ok())
            .filter(|ms| *ms >= MIN_DURATION_MS)
            .unwrap_or(defaults.min_duration);
        let default_duration: Ms = lookup("TIMELANE_DEFAULT_DURATION_MS")
            .and_then(|s| s.parse().ok())
            .filter(|ms| *ms >= min_duration)
            .unwrap_or_else(|| defaults.default_duration.max(min_duration));
        let can_resize: ResizePolicy = lookup("TIMELANE_CAN_RESIZE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.policy.can_resize);

        Self {
            default_duration,
            min_duration,
            policy: GesturePolicy { can_resize },
        }
    }
}
