use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use timelane::config::EngineConfig;
use timelane::engine::Board;
use timelane::notify::NotifyHub;
use timelane::observability::{command_label, COMMANDS_TOTAL, COMMAND_DURATION_SECONDS};
use timelane::script::{self, ScriptError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries replies, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = EngineConfig::from_env();
    info!("timelane replay");
    info!("  default_duration_ms: {}", config.default_duration);
    info!("  min_duration_ms: {}", config.min_duration);
    info!("  can_resize: {:?}", config.policy.can_resize);

    let board = Board::new(config, Arc::new(NotifyHub::new()));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut executed = 0u64;

    while let Some(line) = lines.next_line().await? {
        if line.trim_start().starts_with('#') {
            continue;
        }
        let cmd = match script::parse_command(&line) {
            Ok(cmd) => cmd,
            Err(ScriptError::Empty) => continue,
            Err(e) => {
                tracing::warn!("skipping line: {e}");
                let reply = serde_json::json!({ "error": { "kind": "parse", "message": e.to_string() } });
                stdout.write_all(format!("{reply}\n").as_bytes()).await?;
                continue;
            }
        };

        let label = command_label(&cmd);
        let started = std::time::Instant::now();
        let result = script::execute(&board, cmd).await;
        metrics::histogram!(COMMAND_DURATION_SECONDS, "command" => label)
            .record(started.elapsed().as_secs_f64());
        let status = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        metrics::counter!(COMMANDS_TOTAL, "command" => label, "status" => status).increment(1);

        let reply = script::render(&result);
        stdout.write_all(format!("{reply}\n").as_bytes()).await?;
        executed += 1;
    }

    stdout.flush().await?;
    let snapshot = board.snapshot().await;
    info!(
        "replay finished: {executed} commands, {} items in {} lanes",
        snapshot.len(),
        snapshot.lane_count()
    );
    Ok(())
}
