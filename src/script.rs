use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::engine::{Board, EngineError, Gesture};
use crate::model::*;

/// One line of a replay script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Import {
        items: Vec<Item>,
    },
    Click {
        group: GroupId,
        at: Ms,
        #[serde(default)]
        payload: Option<ItemPayload>,
    },
    Preview {
        group: GroupId,
        at: Ms,
    },
    Resize {
        item: ItemId,
        time: Ms,
        edge: Edge,
    },
    /// Live drag check. Without `edge` the drag is a move.
    Validate {
        item: ItemId,
        time: Ms,
        #[serde(default)]
        edge: Option<Edge>,
    },
    Move {
        item: ItemId,
        time: Ms,
    },
    Update {
        item: Item,
    },
    Remove {
        id: ItemId,
    },
    List {
        #[serde(default)]
        group: Option<GroupId>,
    },
}

#[derive(Debug)]
pub enum ScriptError {
    Empty,
    Parse(String),
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptError::Empty => write!(f, "empty command"),
            ScriptError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ScriptError {}

pub fn parse_command(line: &str) -> Result<Command, ScriptError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(ScriptError::Empty);
    }
    serde_json::from_str(trimmed).map_err(|e| ScriptError::Parse(e.to_string()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reply {
    Imported(usize),
    Item(Item),
    Span(Span),
    Time(Option<Ms>),
    Items(Vec<Item>),
}

pub async fn execute(board: &Board, cmd: Command) -> Result<Reply, EngineError> {
    match cmd {
        Command::Import { items } => board.import(items).await.map(Reply::Imported),
        Command::Click { group, at, payload } => board
            .create_at(group, at, payload.unwrap_or_else(ItemPayload::placeholder))
            .await
            .map(Reply::Item),
        Command::Preview { group, at } => board.preview_insertion(group, at).await.map(Reply::Span),
        Command::Resize { item, time, edge } => board.resize(item, time, edge).await.map(Reply::Item),
        Command::Validate { item, time, edge } => {
            let gesture = match edge {
                Some(edge) => Gesture::Resize { item, time, edge },
                None => Gesture::Move { item, time },
            };
            Ok(Reply::Time(board.validate(gesture).await))
        }
        Command::Move { item, time } => board.move_item(item, time).map(Reply::Item),
        Command::Update { item } => board.update(item).await.map(Reply::Item),
        Command::Remove { id } => board.remove(id).await.map(Reply::Item),
        Command::List { group } => {
            let snap = board.snapshot().await;
            let items = match group {
                Some(group) => snap.lane_items(group).to_vec(),
                None => snap.items().cloned().collect(),
            };
            Ok(Reply::Items(items))
        }
    }
}

/// JSON line written back for one command.
pub fn render(result: &Result<Reply, EngineError>) -> Value {
    match result {
        Ok(reply) => json!({ "ok": reply }),
        Err(e) => json!({ "error": { "kind": e.kind(), "message": e.to_string() } }),
    }
}
