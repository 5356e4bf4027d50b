//! Canonical configuration node produced by extraction

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Value stored under a section key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeValue {
    /// A single scalar, e.g. a handler class
    Scalar(String),
    /// Ordered name/value pairs, e.g. request handler `defaults`
    Pairs(Vec<(String, String)>),
    /// Ordered bare values, e.g. `first_components`
    List(Vec<String>),
    /// A nested section, e.g. `commit_within`
    Node(ConfigNode),
}

/// Insertion-ordered mapping from section name to [`NodeValue`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigNode {
    entries: Vec<(String, NodeValue)>,
}

impl ConfigNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any existing value under the same key
    /// without changing its position
    pub fn insert(&mut self, key: impl Into<String>, value: NodeValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&NodeValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn scalar(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            NodeValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn pairs(&self, key: &str) -> Option<&[(String, String)]> {
        match self.get(key)? {
            NodeValue::Pairs(pairs) => Some(pairs),
            _ => None,
        }
    }

    pub fn list(&self, key: &str) -> Option<&[String]> {
        match self.get(key)? {
            NodeValue::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn node(&self, key: &str) -> Option<&ConfigNode> {
        match self.get(key)? {
            NodeValue::Node(node) => Some(node),
            _ => None,
        }
    }

    /// True when `key` holds a non-empty list
    pub(crate) fn has_values(&self, key: &str) -> bool {
        self.list(key).is_some_and(|values| !values.is_empty())
    }
}

/// Pairs serialize as a list of `{ name, value }` tables, the shape used for
/// request handler parameters in the declarative input.
struct PairEntry<'a>(&'a str, &'a str);

impl Serialize for PairEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("name", self.0)?;
        map.serialize_entry("value", self.1)?;
        map.end()
    }
}

impl Serialize for NodeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NodeValue::Scalar(value) => serializer.serialize_str(value),
            NodeValue::Pairs(pairs) => {
                let mut seq = serializer.serialize_seq(Some(pairs.len()))?;
                for (name, value) in pairs {
                    seq.serialize_element(&PairEntry(name, value))?;
                }
                seq.end()
            }
            NodeValue::List(values) => values.serialize(serializer),
            NodeValue::Node(node) => node.serialize(serializer),
        }
    }
}

impl Serialize for ConfigNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Convert a camelCase, dotted or hyphenated name to snake_case
///
/// `softCommit` -> `soft_commit`, `multipartUploadLimitInKB` ->
/// `multipart_upload_limit_in_kb`, `first-components` -> `first_components`
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == '.' || c == ' ' {
            if !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                _ => false,
            };
            if boundary && !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_position() {
        let mut node = ConfigNode::new();
        node.insert("name", NodeValue::Scalar("/select".into()));
        node.insert("class", NodeValue::Scalar("solr.SearchHandler".into()));
        node.insert("name", NodeValue::Scalar("/query".into()));

        assert_eq!(node.len(), 2);
        assert_eq!(node.keys().collect::<Vec<_>>(), ["name", "class"]);
        assert_eq!(node.scalar("name"), Some("/query"));
    }

    #[test]
    fn test_typed_accessors() {
        let mut node = ConfigNode::new();
        node.insert("defaults", NodeValue::Pairs(vec![("rows".into(), "10".into())]));
        node.insert("components", NodeValue::List(vec!["query".into()]));

        assert!(node.pairs("defaults").is_some());
        assert!(node.scalar("defaults").is_none());
        assert_eq!(node.list("components").unwrap(), ["query"]);
        assert!(node.has_values("components"));
        assert!(!node.has_values("first_components"));
        assert!(node.node("components").is_none());
    }

    #[test]
    fn test_serialize_shapes() {
        let mut inner = ConfigNode::new();
        inner.insert("soft_commit", NodeValue::Scalar("true".into()));

        let mut node = ConfigNode::new();
        node.insert("name", NodeValue::Scalar("/select".into()));
        node.insert("defaults", NodeValue::Pairs(vec![("rows".into(), "10".into())]));
        node.insert("last_components", NodeValue::List(vec!["spellcheck".into()]));
        node.insert("commit_within", NodeValue::Node(inner));

        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(
            json,
            r#"{"name":"/select","defaults":[{"name":"rows","value":"10"}],"last_components":["spellcheck"],"commit_within":{"soft_commit":"true"}}"#
        );
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("softCommit"), "soft_commit");
        assert_eq!(snake_case("maxTime"), "max_time");
        assert_eq!(snake_case("numVersionBuckets"), "num_version_buckets");
        assert_eq!(snake_case("multipartUploadLimitInKB"), "multipart_upload_limit_in_kb");
        assert_eq!(snake_case("first-components"), "first_components");
        assert_eq!(snake_case("QTime"), "q_time");
        assert_eq!(snake_case("dir"), "dir");
        assert_eq!(snake_case("never304"), "never304");
    }
}
