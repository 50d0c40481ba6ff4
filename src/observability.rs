use crate::script::Command;

// ── Board metrics ───────────────────────────────────────────────

/// Counter: committed or rejected board mutations. Labels: op, status.
pub const MUTATIONS_TOTAL: &str = "timelane_mutations_total";

/// Counter: resizes whose edge was pulled back by a neighbor. Labels: edge.
pub const CLAMPS_TOTAL: &str = "timelane_clamps_total";

/// Counter: live drag validations. Labels: status.
pub const VALIDATIONS_TOTAL: &str = "timelane_validations_total";

// ── Script metrics ──────────────────────────────────────────────

/// Counter: script commands executed. Labels: command, status.
pub const COMMANDS_TOTAL: &str = "timelane_commands_total";

/// Histogram: command latency in seconds. Labels: command.
pub const COMMAND_DURATION_SECONDS: &str = "timelane_command_duration_seconds";

/// Map a Command variant to a short label for metrics.
pub fn command_label(cmd: &Command) -> &'static str {
    match cmd {
        Command::Import { .. } => "import",
        Command::Click { .. } => "click",
        Command::Preview { .. } => "preview",
        Command::Resize { .. } => "resize",
        Command::Validate { .. } => "validate",
        Command::Move { .. } => "move",
        Command::Update { .. } => "update",
        Command::Remove { .. } => "remove",
        Command::List { .. } => "list",
    }
}
