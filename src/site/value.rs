//! Loosely typed site config values.
//!
//! Site configs are arbitrary YAML documents. They are held as
//! `serde_json::Value` trees (insertion-ordered maps) so merging and
//! normalization never depend on the YAML library.

use serde_json::Value;

/// A site config document or nested mapping.
pub type Mapping = serde_json::Map<String, Value>;

/// Key holding the parent sites of a config.
pub const EXTENDS_KEY: &str = "extends";

/// Replace null and empty values with `""`, recursing into nested mappings.
///
/// The generator infers its data schema from the JSON snapshot and drops
/// fields it only ever sees as null. Sequences are kept as they are.
pub fn nulls_to_blanks(config: Mapping) -> Mapping {
    config
        .into_iter()
        .map(|(key, value)| (key, blank_value(value)))
        .collect()
}

fn blank_value(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(nulls_to_blanks(map)),
        Value::Null => Value::String(String::new()),
        other => other,
    }
}

/// Parent sites listed under `extends`.
///
/// Accepts a list of names or a single name. `Ok(None)` when the key is
/// absent or blank; `Err` carries a description of the bad shape.
pub fn extends_of(config: &Mapping) -> Result<Option<Vec<String>>, String> {
    match config.get(EXTENDS_KEY) {
        None => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(vec![s.clone()])),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) if !s.is_empty() => Ok(s.clone()),
                other => Err(format!("`extends` entries must be site names, got {other}")),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(other) => Err(format!("`extends` must be a list of site names, got {other}")),
    }
}
