//! Deep traversal of structured values
//!
//! Applies a string transform to every string leaf of a `serde_json::Value`,
//! returning a new value of the same shape. Shared by the vault and the
//! sanitizer for their deep-object forms.

use serde_json::Value;

/// Maximum container nesting the walker will descend into.
///
/// `serde_json::Value` cannot contain reference cycles, so re-entrancy shows
/// up only as pathological nesting depth; containers at the cap are returned
/// unchanged rather than failing the pipeline.
pub const MAX_DEPTH: usize = 128;

/// Apply `f` to every string leaf of `value`, returning a new value.
///
/// Arrays preserve order and length; objects preserve key insertion order.
/// Non-string, non-container leaves pass through unchanged. The input is
/// never mutated.
pub fn walk_strings<F>(value: &Value, f: &mut F) -> Value
where
    F: FnMut(&str) -> String,
{
    walk(value, f, 0)
}

fn walk<F>(value: &Value, f: &mut F, depth: usize) -> Value
where
    F: FnMut(&str) -> String,
{
    match value {
        Value::String(s) => Value::String(f(s)),
        Value::Array(items) => {
            if depth >= MAX_DEPTH {
                return value.clone();
            }
            Value::Array(items.iter().map(|v| walk(v, f, depth + 1)).collect())
        }
        Value::Object(map) => {
            if depth >= MAX_DEPTH {
                return value.clone();
            }
            Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), walk(v, f, depth + 1)))
                    .collect(),
            )
        }
        other => other.clone(),
    }
}
