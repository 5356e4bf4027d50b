//! Declared managed-schema entities

use super::{Entries, camel_case, require};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Boolean options shared by fields, dynamic fields and field types
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct FieldProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stored: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_values: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_valued: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_missing_first: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_missing_last: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uninvertible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omit_norms: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omit_term_freq_and_positions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omit_positions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_vectors: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_positions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_offsets: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_payloads: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_doc_values_as_stored: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<bool>,
}

/// A field or dynamic field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(flatten)]
    pub properties: FieldProperties,
}

/// Dynamic fields share the field shape; their name is a `*` pattern
pub type DynamicField = Field;

impl Field {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            ..Self::default()
        }
    }

    pub fn to_payload(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn validate(&self, what: &str) -> Result<()> {
        let context = format!("{what} '{}'", self.name);
        require(&self.name, "name", &context)?;
        require(&self.field_type, "type", &context)
    }
}

/// Tokenizer, filter or char filter with its factory arguments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisComponent {
    pub class: String,
    #[serde(flatten)]
    pub params: BTreeMap<String, Value>,
}

impl AnalysisComponent {
    fn to_payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("class".into(), Value::from(self.class.as_str()));
        for (key, value) in &self.params {
            payload.insert(camel_case(key), value.clone());
        }
        Value::Object(payload)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analyzer {
    /// `index`, `query` or `multiterm`; absent for a single shared analyzer
    #[serde(rename = "type", default)]
    pub analyzer_type: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub char_filters: Vec<AnalysisComponent>,
    #[serde(default)]
    pub tokenizer: Option<AnalysisComponent>,
    #[serde(default)]
    pub filters: Vec<AnalysisComponent>,
}

impl Analyzer {
    fn payload_key(&self) -> &'static str {
        match self.analyzer_type.as_deref() {
            Some("index") => "indexAnalyzer",
            Some("query") => "queryAnalyzer",
            Some("multiterm") => "multiTermAnalyzer",
            _ => "analyzer",
        }
    }

    fn to_payload(&self) -> Value {
        let mut payload = Map::new();
        if let Some(class) = &self.class {
            payload.insert("class".into(), Value::from(class.as_str()));
        }
        if !self.char_filters.is_empty() {
            let filters = self.char_filters.iter().map(AnalysisComponent::to_payload);
            payload.insert("charFilters".into(), Value::Array(filters.collect()));
        }
        if let Some(tokenizer) = &self.tokenizer {
            payload.insert("tokenizer".into(), tokenizer.to_payload());
        }
        if !self.filters.is_empty() {
            let filters = self.filters.iter().map(AnalysisComponent::to_payload);
            payload.insert("filters".into(), Value::Array(filters.collect()));
        }
        Value::Object(payload)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct FieldType {
    pub name: String,
    pub class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_increment_gap: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_generate_phrase_queries: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synonym_query_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_graph_queries: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_values_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postings_format: Option<String>,
    #[serde(flatten)]
    pub properties: FieldProperties,
    #[serde(default, skip_serializing)]
    pub analyzers: Vec<Analyzer>,
}

impl FieldType {
    pub fn new(name: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: class.into(),
            ..Self::default()
        }
    }

    /// Payload with analyzers placed under `analyzer`, `indexAnalyzer`,
    /// `queryAnalyzer` or `multiTermAnalyzer`
    pub fn to_payload(&self) -> Result<Value> {
        let mut payload = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut payload {
            for analyzer in &self.analyzers {
                map.insert(analyzer.payload_key().into(), analyzer.to_payload());
            }
        }
        Ok(payload)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct CopyField {
    pub source: String,
    pub dest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<u32>,
}

impl CopyField {
    pub fn new(source: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
            max_chars: None,
        }
    }

    pub fn to_payload(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// One `[[managed_schemas]]` block as written by the operator
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManagedSchemaBlock {
    #[serde(default)]
    pub cores: Vec<String>,
    #[serde(default)]
    pub unique_key: Option<String>,
    #[serde(default)]
    pub fields: Entries<Field>,
    #[serde(default)]
    pub dynamic_fields: Entries<DynamicField>,
    #[serde(default)]
    pub copy_fields: Vec<CopyField>,
    #[serde(default)]
    pub field_types: Entries<FieldType>,
}

impl ManagedSchemaBlock {
    pub fn validate(&self) -> Result<()> {
        let declares_entities = !self.fields.is_empty()
            || !self.dynamic_fields.is_empty()
            || !self.copy_fields.is_empty()
            || !self.field_types.is_empty();
        if self.cores.is_empty() && declares_entities {
            return Err(Error::Validation(
                "at least one core must be declared when schema entities are configured".into(),
            ));
        }

        for field in self.fields.iter() {
            field.validate("field")?;
        }
        for field in self.dynamic_fields.iter() {
            field.validate("dynamic field")?;
            if !field.name.contains('*') {
                return Err(Error::Validation(format!(
                    "dynamic field '{}': name must contain a '*' wildcard",
                    field.name
                )));
            }
        }
        for field_type in self.field_types.iter() {
            let context = format!("field type '{}'", field_type.name);
            require(&field_type.name, "name", &context)?;
            require(&field_type.class, "class", &context)?;
        }
        for copy_field in &self.copy_fields {
            let context = format!("copy field '{} -> {}'", copy_field.source, copy_field.dest);
            require(&copy_field.source, "source", &context)?;
            require(&copy_field.dest, "dest", &context)?;
        }
        Ok(())
    }
}

/// Denormalized schema for a set of cores
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManagedSchema {
    pub cores: Vec<String>,
    pub unique_key: Option<String>,
    pub fields: Vec<Field>,
    pub dynamic_fields: Vec<DynamicField>,
    pub copy_fields: Vec<CopyField>,
    pub field_types: Vec<FieldType>,
}

impl From<ManagedSchemaBlock> for ManagedSchema {
    fn from(block: ManagedSchemaBlock) -> Self {
        Self {
            cores: block.cores,
            unique_key: block.unique_key,
            fields: block.fields.into_vec(),
            dynamic_fields: block.dynamic_fields.into_vec(),
            copy_fields: block.copy_fields,
            field_types: block.field_types.into_vec(),
        }
    }
}

impl ManagedSchema {
    pub fn governs(&self, core: &str) -> bool {
        self.cores.iter().any(|c| c == core)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn block(toml_text: &str) -> ManagedSchemaBlock {
        toml::from_str(toml_text).unwrap()
    }

    #[test]
    fn test_field_payload_is_camel_case() {
        let field = Field {
            properties: FieldProperties {
                multi_valued: Some(true),
                term_payloads: Some(false),
                ..FieldProperties::default()
            },
            ..Field::new("title", "text_general")
        };

        assert_eq!(
            field.to_payload().unwrap(),
            json!({
                "name": "title",
                "type": "text_general",
                "multiValued": true,
                "termPayloads": false
            })
        );
    }

    #[test]
    fn test_field_reads_snake_case() {
        let schema = block(
            r#"
cores = ["foo"]
unique_key = "id"
fields = [{ name = "foo", type = "bar", term_payloads = false, doc_values = true }]
copy_fields = [{ source = "foo", dest = "bar", max_chars = 24 }]
"#,
        );

        let schema = ManagedSchema::from(schema);
        assert_eq!(schema.fields[0].properties.term_payloads, Some(false));
        assert_eq!(schema.fields[0].properties.doc_values, Some(true));
        assert_eq!(schema.copy_fields[0].max_chars, Some(24));
        assert_eq!(schema.unique_key.as_deref(), Some("id"));
    }

    #[test]
    fn test_field_type_payload_places_analyzers() {
        let schema = block(
            r#"
cores = ["foo"]

[[field_types]]
name = "text_ngram"
class = "solr.TextField"
position_increment_gap = 100

[[field_types.analyzers]]
type = "index"
tokenizer = { class = "solr.NGramTokenizerFactory", min_gram_size = 1, max_gram_size = 2 }
filters = [{ class = "solr.LowerCaseFilterFactory" }]

[[field_types.analyzers]]
type = "query"
tokenizer = { class = "solr.StandardTokenizerFactory" }
"#,
        );
        let field_type = ManagedSchema::from(schema).field_types.remove(0);

        assert_eq!(
            field_type.to_payload().unwrap(),
            json!({
                "name": "text_ngram",
                "class": "solr.TextField",
                "positionIncrementGap": 100,
                "indexAnalyzer": {
                    "tokenizer": {
                        "class": "solr.NGramTokenizerFactory",
                        "minGramSize": 1,
                        "maxGramSize": 2
                    },
                    "filters": [{"class": "solr.LowerCaseFilterFactory"}]
                },
                "queryAnalyzer": {
                    "tokenizer": {"class": "solr.StandardTokenizerFactory"}
                }
            })
        );
    }

    #[test]
    fn test_dynamic_field_needs_wildcard() {
        let schema = block(
            r#"
cores = ["foo"]
dynamic_fields = [{ name = "foo", type = "string" }]
"#,
        );
        assert!(matches!(schema.validate(), Err(Error::Validation(_))));

        let schema = block(
            r#"
cores = ["foo"]
dynamic_fields = [{ name = "*_s", type = "string" }]
"#,
        );
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_schema_requires_core() {
        let schema = block(r#"fields = [{ name = "title", type = "string" }]"#);
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_copy_field_payload() {
        let copy_field = CopyField {
            max_chars: Some(256),
            ..CopyField::new("title", "text")
        };

        assert_eq!(
            copy_field.to_payload().unwrap(),
            json!({"source": "title", "dest": "text", "maxChars": 256})
        );
    }
}
