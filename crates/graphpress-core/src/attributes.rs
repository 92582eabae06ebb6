//! Ordered string attribute maps exported from nodes.
//!
//! Every node can be viewed as an [`AttributeMap`]. Maps keep insertion
//! order so that JSON output is stable across backends.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Attribute key that must never leave the service.
pub const PASSWORD_KEY: &str = "password";

/// Returns `true` if `key` names the password attribute, ignoring ASCII case.
pub fn is_sensitive_key(key: &str) -> bool {
    key.eq_ignore_ascii_case(PASSWORD_KEY)
}

/// An insertion-ordered map of attribute names to values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeMap(IndexMap<String, String>);

impl AttributeMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        AttributeMap(IndexMap::new())
    }

    /// Inserts or replaces a value, keeping the original position of the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns a copy without any password-like key.
    pub fn redacted(&self) -> AttributeMap {
        AttributeMap(
            self.0
                .iter()
                .filter(|(key, _)| !is_sensitive_key(key))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Returns a copy with every key lower-cased.
    ///
    /// If two keys collapse to the same lower-case form the later one wins,
    /// at the position of the first.
    pub fn with_lowercase_keys(&self) -> AttributeMap {
        let mut out = IndexMap::with_capacity(self.0.len());
        for (key, value) in &self.0 {
            out.insert(key.to_lowercase(), value.clone());
        }
        AttributeMap(out)
    }
}

impl FromIterator<(String, String)> for AttributeMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        AttributeMap(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> AttributeMap {
        let mut attrs = AttributeMap::new();
        attrs.insert("Username", "alice");
        attrs.insert("Email", "alice@example.com");
        attrs.insert("Password", "5f4dcc3b5aa765d61d8327deb882cf99");
        attrs.insert("About", "hi");
        attrs
    }

    #[test]
    fn redacted_drops_password_and_keeps_order() {
        let redacted = sample().redacted();
        let keys: Vec<&str> = redacted.keys().collect();
        assert_eq!(keys, vec!["Username", "Email", "About"]);
    }

    #[test]
    fn redaction_is_case_insensitive() {
        let mut attrs = AttributeMap::new();
        attrs.insert("PASSWORD", "x");
        attrs.insert("pAsSwOrD", "y");
        attrs.insert("passwords", "kept");
        let redacted = attrs.redacted();
        assert_eq!(redacted.len(), 1);
        assert!(redacted.contains_key("passwords"));
    }

    #[test]
    fn lowercase_keys() {
        let lowered = sample().redacted().with_lowercase_keys();
        assert_eq!(lowered.get("username"), Some("alice"));
        assert_eq!(lowered.get("Username"), None);
    }

    #[test]
    fn insert_existing_key_keeps_position() {
        let mut attrs = sample();
        attrs.insert("Username", "bob");
        assert_eq!(attrs.keys().next(), Some("Username"));
        assert_eq!(attrs.get("Username"), Some("bob"));
    }

    #[test]
    fn serializes_as_flat_object() {
        insta::assert_json_snapshot!(sample().redacted(), @r###"
        {
          "Username": "alice",
          "Email": "alice@example.com",
          "About": "hi"
        }
        "###);
    }

    proptest! {
        #[test]
        fn redacted_never_contains_password(
            keys in proptest::collection::vec("[A-Za-z]{1,10}", 0..8),
            upper in proptest::collection::vec(any::<bool>(), 8),
        ) {
            let mut attrs = AttributeMap::new();
            for (i, key) in keys.iter().enumerate() {
                attrs.insert(key.clone(), "v");
                let password: String = PASSWORD_KEY
                    .chars()
                    .zip(upper.iter().cycle().skip(i))
                    .map(|(c, up)| if *up { c.to_ascii_uppercase() } else { c })
                    .collect();
                attrs.insert(password, "secret");
            }
            let redacted = attrs.redacted();
            prop_assert!(redacted.keys().all(|k| !is_sensitive_key(k)));
        }
    }
}
