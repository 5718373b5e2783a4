//! One-line JSON frames for `--json` mode.

use serde_json::json;
use tuner_core::{Tick, View};

pub fn encode_view(view: &View) -> String {
    json!({ "type": "view", "view": view }).to_string()
}

/// Heartbeat frame, `{"type":"tick","t":...}`.
pub fn encode_tick(tick: &Tick) -> String {
    json!({ "type": "tick", "t": tick.t }).to_string()
}

pub fn encode_failure(reason: &str, message: &str) -> String {
    json!({ "type": "error", "reason": reason, "message": message }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_single_lines() {
        let tick: serde_json::Value = serde_json::from_str(&encode_tick(&Tick { t: 12.5 })).unwrap();
        assert_eq!(tick["type"], "tick");
        assert_eq!(tick["t"], 12.5);
        let err = encode_failure("InvalidInput", "bad\nvalue");
        assert!(!err.contains('\n'));
        let v: serde_json::Value = serde_json::from_str(&err).unwrap();
        assert_eq!(v["message"], "bad\nvalue");
    }
}
