//! Deep merge of devcontainer documents.
//!
//! Combination rules, applied key by key on the union of both documents:
//! 1. A key present on one side only is copied as-is.
//! 2. Two objects merge recursively.
//! 3. Two arrays at a concatenation path become base followed by overlay,
//!    exact duplicates dropped (first occurrence kept).
//! 4. Two arrays anywhere else: the overlay replaces the base.
//! 5. Any other pairing, including mismatched types: the overlay replaces
//!    the base. This is never an error.
//!
//! Base keys keep their order; keys new in the overlay are appended.

mod policy;

use serde_json::{Map, Value};

use crate::document::ConfigDocument;

pub use policy::{DEFAULT_CONCAT_KEYS, MergePolicy};

/// Merge `overlay` onto `base` with the default policy.
pub fn merge(base: &ConfigDocument, overlay: &ConfigDocument) -> ConfigDocument {
    MergePolicy::default().merge(base, overlay)
}

/// Fold documents from lowest to highest precedence with the default policy.
pub fn fold<'a, I>(documents: I) -> ConfigDocument
where
    I: IntoIterator<Item = &'a ConfigDocument>,
{
    MergePolicy::default().fold(documents)
}

impl MergePolicy {
    /// Merge `overlay` onto `base`, returning a new document.
    pub fn merge(&self, base: &ConfigDocument, overlay: &ConfigDocument) -> ConfigDocument {
        let mut path = Vec::new();
        self.merge_maps(base, overlay, &mut path)
    }

    /// Left-to-right fold; later documents take precedence.
    pub fn fold<'a, I>(&self, documents: I) -> ConfigDocument
    where
        I: IntoIterator<Item = &'a ConfigDocument>,
    {
        documents
            .into_iter()
            .fold(Map::new(), |acc, doc| self.merge(&acc, doc))
    }

    fn merge_maps<'a>(
        &self,
        base: &Map<String, Value>,
        overlay: &'a Map<String, Value>,
        path: &mut Vec<&'a str>,
    ) -> Map<String, Value> {
        let mut result = base.clone();

        for (key, overlay_value) in overlay {
            path.push(key.as_str());
            let merged = match result.get(key) {
                Some(base_value) => self.merge_values(base_value, overlay_value, path),
                None => overlay_value.clone(),
            };
            path.pop();
            result.insert(key.clone(), merged);
        }

        result
    }

    fn merge_values<'a>(
        &self,
        base: &Value,
        overlay: &'a Value,
        path: &mut Vec<&'a str>,
    ) -> Value {
        match (base, overlay) {
            (Value::Object(base_map), Value::Object(overlay_map)) => {
                Value::Object(self.merge_maps(base_map, overlay_map, path))
            }
            (Value::Array(base_items), Value::Array(overlay_items))
                if self.is_concat_path(path) =>
            {
                Value::Array(concat_unique(base_items, overlay_items))
            }
            (Value::Array(_), Value::Array(_)) => overlay.clone(),
            (_, overlay) => overlay.clone(),
        }
    }
}

/// Base items then overlay items, keeping only the first of any exact duplicates.
pub(crate) fn concat_unique(base: &[Value], overlay: &[Value]) -> Vec<Value> {
    let mut combined: Vec<Value> = Vec::with_capacity(base.len() + overlay.len());
    for item in base.iter().chain(overlay) {
        if !combined.contains(item) {
            combined.push(item.clone());
        }
    }
    combined
}
