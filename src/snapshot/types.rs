//! Snapshot types and payload normalization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::NormalizeError;

/// Latest player list reported by the game server.
///
/// `game_id` and `place_id` are opaque producer values kept exactly as
/// received. Player records are never inspected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Producer game identifier.
    pub game_id: Value,
    /// Producer place identifier.
    pub place_id: Value,
    /// Producer clock, seconds since epoch.
    pub timestamp: Option<i64>,
    /// Player records in producer order.
    pub players: Vec<Value>,
}

impl Snapshot {
    /// Number of stored player records.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}

/// Coerce an inbound JSON payload into a [`Snapshot`].
///
/// Missing fields take their defaults: identifiers become `null`,
/// `timestamp` becomes `None`, `players` becomes empty.
pub fn normalize(payload: &Value) -> Result<Snapshot, NormalizeError> {
    let fields = match payload {
        Value::Object(map) => map,
        other => return Err(NormalizeError::NotAnObject(kind(other))),
    };

    Ok(Snapshot {
        game_id: field(fields, "gameId"),
        place_id: field(fields, "placeId"),
        timestamp: normalize_timestamp(fields.get("timestamp"))?,
        players: normalize_players(fields.get("players"))?,
    })
}

fn field(fields: &Map<String, Value>, key: &str) -> Value {
    fields.get(key).cloned().unwrap_or(Value::Null)
}

fn normalize_timestamp(value: Option<&Value>) -> Result<Option<i64>, NormalizeError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            if let Some(secs) = n.as_i64() {
                return Ok(Some(secs));
            }
            // Fractional seconds truncate toward zero.
            match n.as_f64() {
                Some(f) if f.is_finite() && f.abs() < i64::MAX as f64 => Ok(Some(f.trunc() as i64)),
                _ => Err(NormalizeError::TimestampOutOfRange(n.to_string())),
            }
        }
        Some(other) => Err(NormalizeError::InvalidTimestamp(kind(other))),
    }
}

fn normalize_players(value: Option<&Value>) -> Result<Vec<Value>, NormalizeError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(other) => Err(NormalizeError::InvalidPlayers(kind(other))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
