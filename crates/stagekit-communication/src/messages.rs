//! Wire names and payload shapes
//!
//! Outbound calls carry a positional argument array. Inbound signals carry a
//! JSON payload whose shape depends on the signal.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use stagekit_core::{Fov, Intent, MessageError, Rect, TileRecord, WorldPoint};

/// Move the stage: `[x, y]`
pub const CALL_MOVE: &str = "move";
/// Set one ROI landmark: `[handle, x, y]`
pub const CALL_SET_ROI: &str = "set_roi";
/// Ask for a `new_position` signal
pub const CALL_POLL_POSITION: &str = "poll_position";
/// Ask for a `config_changed` signal
pub const CALL_FETCH_CONFIG: &str = "fetch_config";

pub const SIGNAL_NEW_POSITION: &str = "new_position";
pub const SIGNAL_CONFIG_CHANGED: &str = "config_changed";
pub const SIGNAL_NEW_TILE: &str = "new_tile.connect";

/// Montage section of the remote config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MontageConfig {
    #[serde(default)]
    pub roi: Option<Rect>,
    #[serde(default)]
    pub fov: Option<Fov>,
}

/// The parts of a `config_changed` payload the viewport uses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub montage: MontageConfig,
    #[serde(default, alias = "slotCenter")]
    pub slot_center: Option<WorldPoint>,
}

/// What a `new_tile.connect` payload asks for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TileSignal {
    Append(TileRecord),
    /// An empty tile clears the trail
    Clear,
}

fn malformed(signal: &str, reason: impl ToString) -> MessageError {
    MessageError::Malformed {
        signal: signal.to_string(),
        reason: reason.to_string(),
    }
}

/// Outbound call name and arguments for an intent
pub fn intent_call(intent: &Intent) -> (&'static str, Value) {
    match intent {
        Intent::Move { x, y } => (CALL_MOVE, json!([x, y])),
        Intent::SetRoi { handle, x, y } => (CALL_SET_ROI, json!([handle.as_str(), x, y])),
    }
}

/// `new_position`: `{"x": .., "y": ..}`
pub fn parse_position(payload: &Value) -> Result<WorldPoint, MessageError> {
    WorldPoint::deserialize(payload).map_err(|e| malformed(SIGNAL_NEW_POSITION, e))
}

/// `config_changed`: `{"montage": {"roi": {..}, "fov": [w, h]}, "slot_center": {..}}`
pub fn parse_config(payload: &Value) -> Result<ConfigSnapshot, MessageError> {
    ConfigSnapshot::deserialize(payload).map_err(|e| malformed(SIGNAL_CONFIG_CHANGED, e))
}

/// `new_tile.connect`: the tile sits at `payload[0][0]`
pub fn parse_tile(payload: &Value) -> Result<TileSignal, MessageError> {
    let tile = payload
        .get(0)
        .and_then(|args| args.get(0))
        .ok_or_else(|| malformed(SIGNAL_NEW_TILE, "expected [[tile]]"))?;

    let empty = match tile {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    };
    if empty {
        return Ok(TileSignal::Clear);
    }
    TileRecord::deserialize(tile)
        .map(TileSignal::Append)
        .map_err(|e| malformed(SIGNAL_NEW_TILE, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagekit_core::{RoiHandle, TileMeta};

    #[test]
    fn test_intent_calls() {
        let (name, args) = intent_call(&Intent::Move { x: 1.0, y: -2.0 });
        assert_eq!(name, "move");
        assert_eq!(args, json!([1.0, -2.0]));

        let (name, args) = intent_call(&Intent::SetRoi {
            handle: RoiHandle::TopRight,
            x: 3.0,
            y: 4.0,
        });
        assert_eq!(name, "set_roi");
        assert_eq!(args, json!(["top_right", 3.0, 4.0]));
    }

    #[test]
    fn test_parse_config() {
        let payload = json!({
            "montage": {"roi": {"left": 0, "right": 10, "top": 0, "height": 5}, "fov": [20, 30]},
            "slot_center": {"x": 1, "y": 2},
            "other": true
        });
        let config = parse_config(&payload).unwrap();
        assert_eq!(config.montage.fov, Some(Fov::new(20.0, 30.0)));
        assert_eq!(config.montage.roi.unwrap().right, Some(10.0));
        assert_eq!(config.slot_center, Some(WorldPoint::new(1.0, 2.0)));

        let camel = json!({"montage": {}, "slotCenter": {"x": 5, "y": 6}});
        assert_eq!(
            parse_config(&camel).unwrap().slot_center,
            Some(WorldPoint::new(5.0, 6.0))
        );

        assert!(parse_config(&json!({"slot_center": {}})).is_err());
    }

    #[test]
    fn test_parse_tile() {
        let payload = json!([[{"meta": {"x": 1, "y": 2}, "regrabs": true}]]);
        assert_eq!(
            parse_tile(&payload).unwrap(),
            TileSignal::Append(TileRecord {
                meta: TileMeta { x: 1.0, y: 2.0 },
                vetoed: false,
                regrabs: true,
            })
        );
        assert_eq!(parse_tile(&json!([[[]]])).unwrap(), TileSignal::Clear);
        assert_eq!(parse_tile(&json!([[{}]])).unwrap(), TileSignal::Clear);
        assert!(parse_tile(&json!([])).is_err());
        assert!(parse_tile(&json!([["tile"]])).is_err());
    }

    #[test]
    fn test_parse_position() {
        assert_eq!(
            parse_position(&json!({"x": 3.5, "y": -1})).unwrap(),
            WorldPoint::new(3.5, -1.0)
        );
        let err = parse_position(&json!({"x": 1})).unwrap_err();
        assert!(err.to_string().contains("new_position"));
    }
}
