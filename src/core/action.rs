//! Actions returned by a delegated command engine
//!
//! Wire format is a JSON array of objects tagged by `kind`:
//!
//! ```text
//! [{"kind":"print","text":"hello"},{"kind":"theme","value":"light"}]
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Action {
    /// Append an output line
    Print { text: String },
    /// Empty the transcript
    Clear,
    /// Open a URL in the browser
    Open { url: String },
    /// Switch theme; unknown values are ignored when applied
    Theme { value: String },
}

/// Decode an engine response. Anything but an array is an empty action list,
/// and array items that are not a known action are skipped.
pub fn decode_actions(response: Value) -> Vec<Action> {
    let Value::Array(items) = response else {
        debug!("engine response is not an array, ignoring");
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(action) => Some(action),
            Err(e) => {
                debug!("skipping malformed action: {}", e);
                None
            }
        })
        .collect()
}

/// Decode an engine's command list, keeping only string entries
pub fn decode_names(response: Value) -> Vec<String> {
    match response {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(name) => Some(name),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_all_kinds() {
        let actions = decode_actions(json!([
            {"kind": "print", "text": "hi"},
            {"kind": "clear"},
            {"kind": "open", "url": "https://example.com"},
            {"kind": "theme", "value": "light"},
        ]));

        assert_eq!(
            actions,
            vec![
                Action::Print { text: "hi".to_string() },
                Action::Clear,
                Action::Open { url: "https://example.com".to_string() },
                Action::Theme { value: "light".to_string() },
            ]
        );
    }

    #[test]
    fn test_non_array_is_empty() {
        assert!(decode_actions(json!({"kind": "clear"})).is_empty());
        assert!(decode_actions(Value::Null).is_empty());
        assert!(decode_actions(json!("print")).is_empty());
    }

    #[test]
    fn test_malformed_items_are_skipped() {
        let actions = decode_actions(json!([
            {"kind": "explode"},
            {"kind": "print"},
            42,
            {"kind": "print", "text": "kept"},
        ]));
        assert_eq!(actions, vec![Action::Print { text: "kept".to_string() }]);
    }

    #[test]
    fn test_wire_format() {
        let text = serde_json::to_string(&Action::Theme { value: "classic".to_string() }).unwrap();
        assert_eq!(text, r#"{"kind":"theme","value":"classic"}"#);
    }

    #[test]
    fn test_decode_names() {
        assert_eq!(decode_names(json!(["help", 3, "ls"])), ["help", "ls"]);
        assert!(decode_names(json!({"help": true})).is_empty());
    }
}
