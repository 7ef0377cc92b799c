//! Overlay merge of JSON mappings

use serde_json::{Map, Value};

/// Union of `base` and `overlay` keys; `overlay` wins on collisions.
///
/// Keys keep their first-seen position: base keys in base order (even when
/// overwritten), then keys only present in `overlay`, in overlay order.
pub fn overlay(base: Map<String, Value>, overlay: Map<String, Value>) -> Map<String, Value> {
    let mut merged = base;
    for (key, value) in overlay {
        merged.insert(key, value);
    }
    merged
}
