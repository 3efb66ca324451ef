/*!
 * Key dialects of BetterQuesting documents.
 *
 * Quest files come in two encodings of the same schema: the standard one
 * uses plain field names (`name`), the NBT export suffixes every key with its
 * NBT type id (`name:8`, `questDatabase:9`). A [`BagLayout`] is computed once
 * per JSON object and answers "which actual key holds field X" for either
 * dialect.
 */

use std::collections::HashMap;

use serde_json::{Map, Value};

/// Key naming dialect of a document or object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Plain field names
    #[default]
    Standard,
    /// Field names carrying a `:<typeId>` suffix
    Tagged,
}

/// Split `name:8` into `("name", Some("8"))`; plain keys have no tag
pub fn split_tag(key: &str) -> (&str, Option<&str>) {
    match key.rsplit_once(':') {
        Some((base, tag)) if !base.is_empty() && !tag.is_empty() && tag.bytes().all(|b| b.is_ascii_digit()) => {
            (base, Some(tag))
        }
        _ => (key, None),
    }
}

/// Strip a type tag from a key, if it has one
pub fn strip_tag(key: &str) -> &str {
    split_tag(key).0
}

/// Resolved key names of one JSON object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BagLayout {
    dialect: Dialect,
    /// Logical field name to the actual keys present, plain before tagged
    fields: HashMap<String, Vec<String>>,
}

impl BagLayout {
    /// Inspect the keys of `map` once
    pub fn detect(map: &Map<String, Value>) -> Self {
        let mut layout = Self::default();

        for key in map.keys() {
            let (base, tag) = split_tag(key);
            if tag.is_some() {
                layout.dialect = Dialect::Tagged;
            }
            layout.fields.entry(base.to_string()).or_default().push(key.clone());
        }

        for keys in layout.fields.values_mut() {
            keys.sort_by_key(|k| split_tag(k).1.is_some());
        }
        layout
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Actual keys holding `field`, in either dialect
    pub fn keys(&self, field: &str) -> &[String] {
        self.fields.get(field).map_or(&[], Vec::as_slice)
    }

    /// Check whether `field` is present in either dialect
    pub fn has(&self, field: &str) -> bool {
        !self.keys(field).is_empty()
    }

    /// First value stored under `field`, with the key it was found under
    pub fn get<'a>(&self, map: &'a Map<String, Value>, field: &str) -> Option<(&'a str, &'a Value)> {
        self.keys(field)
            .iter()
            .find_map(|key| map.get_key_value(key.as_str()))
            .map(|(k, v)| (k.as_str(), v))
    }

    /// First object stored under `field`, with its key
    pub fn object<'a>(
        &self,
        map: &'a Map<String, Value>,
        field: &str,
    ) -> Option<(&'a str, &'a Map<String, Value>)> {
        self.keys(field)
            .iter()
            .find_map(|key| map.get_key_value(key.as_str()))
            .and_then(|(k, v)| v.as_object().map(|obj| (k.as_str(), obj)))
    }

    /// All keys under `field` that hold strings, and the first non-empty one of them
    pub fn strings<'a>(&self, map: &'a Map<String, Value>, field: &str) -> (Vec<&'a str>, Option<&'a str>) {
        let mut keys = Vec::new();
        let mut text = None;

        for key in self.keys(field) {
            if let Some((k, Value::String(s))) = map.get_key_value(key.as_str()) {
                keys.push(k.as_str());
                if text.is_none() && !s.is_empty() {
                    text = Some(s.as_str());
                }
            }
        }
        (keys, text)
    }
}
