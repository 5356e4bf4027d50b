//! Declared configuration model
//!
//! Input blocks are deserialized from the operator file (snake_case keys)
//! and validated at load. Entities serialize to the camelCase payloads the
//! remote APIs expect.

pub mod config;
pub mod schema;

pub use config::{RequestHandler, SearchComponent, SolrConfig, SolrConfigBlock};
pub use schema::{
    AnalysisComponent, Analyzer, CopyField, DynamicField, Field, FieldProperties, FieldType,
    ManagedSchema, ManagedSchemaBlock,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Loose settings table (query, update handler, request dispatcher)
pub type Settings = serde_json::Map<String, Value>;

/// A single `name = value` request parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: Value,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Entities declared either as a list or as a table keyed by name.
///
/// Keyed tables come out in key order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Entries<T> {
    List(Vec<T>),
    Keyed(BTreeMap<String, T>),
}

impl<T> Default for Entries<T> {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl<T> Entries<T> {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::List(items) => items.is_empty(),
            Self::Keyed(items) => items.is_empty(),
        }
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        match self {
            Self::List(items) => Box::new(items.iter()),
            Self::Keyed(items) => Box::new(items.values()),
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::List(items) => items,
            Self::Keyed(items) => items.into_values().collect(),
        }
    }
}

/// Segments Solr spells as an upper-case acronym in property names
const ACRONYMS: &[(&str, &str)] = &[("kb", "KB")];

/// `max_time` -> `maxTime`, `multipart_upload_limit_in_kb` ->
/// `multipartUploadLimitInKB`
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());

    for segment in name.split('_').filter(|s| !s.is_empty()) {
        if out.is_empty() {
            out.push_str(segment);
        } else if let Some((_, acronym)) = ACRONYMS.iter().find(|(lower, _)| *lower == segment) {
            out.push_str(acronym);
        } else {
            let mut chars = segment.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }

    out
}

/// Rejects an empty required attribute
pub(crate) fn require(value: &str, what: &str, context: &str) -> crate::Result<()> {
    if value.trim().is_empty() {
        return Err(crate::Error::Validation(format!(
            "{context}: '{what}' must not be empty"
        )));
    }
    Ok(())
}
