// ── List response normalization ──
//
// List endpoints answer either with a bare JSON array or with a
// HAL-style envelope (`{"_embedded": {"usuarioList": [...]}}`). Some
// deployments flatten the envelope and put the list at the top level.
// Everything else is treated as an empty collection.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Extract the item list from a collection response.
///
/// Order of precedence: bare array, `_embedded[key]`, top-level `key`.
/// Never fails; anything unrecognized yields an empty list.
pub fn normalize(body: Value, embedded_key: &str) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let embedded = map
                .get_mut("_embedded")
                .and_then(|e| e.get_mut(embedded_key))
                .map(Value::take);
            if let Some(Value::Array(items)) = embedded {
                return items;
            }
            match map.remove(embedded_key) {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            }
        }
        _ => Vec::new(),
    }
}

/// Normalize and decode a collection response. Items that fail to decode
/// are dropped with a warning instead of failing the whole list.
pub fn decode_items<T: DeserializeOwned>(body: Value, embedded_key: &str) -> Vec<T> {
    normalize(body, embedded_key)
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!(index, key = embedded_key, error = %e, "skipping undecodable item");
                None
            }
        })
        .collect()
}
