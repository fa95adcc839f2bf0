//! Deep merge of a mixin chain into one effective config.
//!
//! - Mappings: merged key by key (recursive)
//! - Sequences: replaced wholesale, never concatenated
//! - Scalars: the later (more specific) value wins

use serde_json::Value;

use super::error::Result;
use super::mixin::resolve_chain;
use super::store::ConfigStore;
use super::value::Mapping;

/// Merge `overlay` onto `base`.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            Value::Object(merge_mappings(base_map, overlay_map))
        }
        (_, overlay) => overlay,
    }
}

/// Union of two mappings, conflicting keys merged with [`deep_merge`].
pub fn merge_mappings(mut base: Mapping, overlay: Mapping) -> Mapping {
    for (key, overlay_value) in overlay {
        match base.get_mut(&key) {
            Some(slot) => *slot = deep_merge(std::mem::take(slot), overlay_value),
            None => {
                base.insert(key, overlay_value);
            }
        }
    }
    base
}

/// Load every config of `chain` and fold them left to right.
pub fn merge_chain(store: &ConfigStore, chain: &[String]) -> Result<Mapping> {
    chain.iter().try_fold(Mapping::new(), |merged, site| {
        Ok(merge_mappings(merged, store.load(site)?))
    })
}

/// Resolve the mixin chain of `site` and merge it.
pub fn effective_config(store: &ConfigStore, site: &str) -> Result<Mapping> {
    let chain = resolve_chain(store, site)?;
    merge_chain(store, &chain)
}
