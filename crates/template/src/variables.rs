use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Caller-supplied template variables, keyed by snake_case identifier.
///
/// Keys are unique. Iteration is in key order, which keeps substitution
/// deterministic even though insertion order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableMap {
    values: BTreeMap<String, String>,
}

impl VariableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous one for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Applies `overrides` on top of `self`. Keys present in both take the
    /// override's value, including an empty one.
    pub fn overlay(&mut self, overrides: &VariableMap) {
        for (key, value) in overrides.iter() {
            self.values.insert(key.to_string(), value.to_string());
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariableMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<BTreeMap<String, String>> for VariableMap {
    fn from(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_existing_value() {
        let mut vars = VariableMap::new();
        assert_eq!(vars.insert("city", "Berlin"), None);
        assert_eq!(vars.insert("city", "Hamburg"), Some("Berlin".to_string()));
        assert_eq!(vars.get("city"), Some("Hamburg"));
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn test_overlay_prefers_overrides() {
        let mut posting: VariableMap = [("company_name", "Acme"), ("city", "Berlin")]
            .into_iter()
            .collect();
        let custom = VariableMap::new().with("company_name", "Acme GmbH").with("job_title", "");

        posting.overlay(&custom);

        assert_eq!(posting.get("company_name"), Some("Acme GmbH"));
        assert_eq!(posting.get("city"), Some("Berlin"));
        assert_eq!(posting.get("job_title"), Some(""));
    }

    #[test]
    fn test_deserializes_from_flat_json_object() {
        let vars: VariableMap =
            serde_json::from_str(r#"{"company_name": "Acme", "zip_code": "10115"}"#).unwrap();
        assert_eq!(vars.get("zip_code"), Some("10115"));
        assert_eq!(vars.iter().count(), 2);
    }
}
