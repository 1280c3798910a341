//! Structured key/value fields attached to log events

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// Ordered set of caller-supplied structured fields.
///
/// Rendered as a compact JSON object so the same value reads well in both
/// console and JSON output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Fields(Map<String, Value>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Copy every entry of `other` into `self`, overwriting on key collision.
    pub fn merge(&mut self, other: &Fields) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

impl From<Map<String, Value>> for Fields {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Build [`Fields`] inline: `fields! { "user_id" => 42, "dry_run" => true }`.
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $(fields.insert($key, $value);)+
        fields
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_compact_json() {
        let fields = Fields::new().with("user_id", 42).with("name", "ada");
        assert_eq!(fields.to_string(), r#"{"name":"ada","user_id":42}"#);
    }

    #[test]
    fn empty_fields_render_as_empty_object() {
        assert_eq!(Fields::new().to_string(), "{}");
    }

    #[test]
    fn macro_builds_fields() {
        let fields = fields! { "a" => 1, "b" => "two", };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("b"), Some(&Value::from("two")));
    }

    #[test]
    fn merge_overwrites_existing_keys() {
        let mut base = fields! { "a" => 1, "b" => 2 };
        base.merge(&fields! { "b" => 3 });
        assert_eq!(base.get("b"), Some(&Value::from(3)));
        assert_eq!(base.len(), 2);
    }
}
