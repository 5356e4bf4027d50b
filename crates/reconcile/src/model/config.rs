//! Declared solrconfig entities

use super::{Entries, Property, Settings, require};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchComponent {
    pub name: String,
    pub class: String,
    /// Extra initialization arguments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
}

impl SearchComponent {
    pub fn new(name: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: class.into(),
            properties: Vec::new(),
        }
    }

    pub fn to_payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("name".into(), Value::from(self.name.as_str()));
        payload.insert("class".into(), Value::from(self.class.as_str()));
        for property in &self.properties {
            payload.insert(property.name.clone(), property.value.clone());
        }
        Value::Object(payload)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestHandler {
    pub name: String,
    pub class: String,
    #[serde(default)]
    pub defaults: Vec<Property>,
    #[serde(default)]
    pub appends: Vec<Property>,
    #[serde(default)]
    pub invariants: Vec<Property>,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub first_components: Vec<String>,
    #[serde(default)]
    pub last_components: Vec<String>,
}

impl RequestHandler {
    pub fn new(name: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: class.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        let context = format!("request handler '{}'", self.name);
        require(&self.name, "name", &context)?;
        require(&self.class, "class", &context)?;

        if !self.components.is_empty()
            && (!self.first_components.is_empty() || !self.last_components.is_empty())
        {
            return Err(Error::Validation(format!(
                "{context}: first/last components are only valid if you do not declare 'components'"
            )));
        }
        Ok(())
    }

    /// Payload for `add-requesthandler`/`update-requesthandler`; parameter
    /// lists become objects and empty sections are left out
    pub fn to_payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("name".into(), Value::from(self.name.as_str()));
        payload.insert("class".into(), Value::from(self.class.as_str()));

        for (key, params) in [
            ("defaults", &self.defaults),
            ("appends", &self.appends),
            ("invariants", &self.invariants),
        ] {
            if !params.is_empty() {
                let params: Map<String, Value> = params
                    .iter()
                    .map(|p| (p.name.clone(), p.value.clone()))
                    .collect();
                payload.insert(key.into(), Value::Object(params));
            }
        }

        for (key, components) in [
            ("components", &self.components),
            ("first-components", &self.first_components),
            ("last-components", &self.last_components),
        ] {
            if !components.is_empty() {
                payload.insert(key.into(), Value::from(components.clone()));
            }
        }

        Value::Object(payload)
    }
}

/// One `[[solr_configs]]` block as written by the operator
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolrConfigBlock {
    #[serde(default)]
    pub cores: Vec<String>,
    #[serde(default)]
    pub search_components: Entries<SearchComponent>,
    #[serde(default)]
    pub request_handlers: Entries<RequestHandler>,
    #[serde(default)]
    pub query: Option<Settings>,
    #[serde(default)]
    pub update_handler: Option<Settings>,
    #[serde(default)]
    pub request_dispatcher: Option<Settings>,
}

impl SolrConfigBlock {
    pub fn validate(&self) -> Result<()> {
        if self.cores.is_empty()
            && (!self.search_components.is_empty() || !self.request_handlers.is_empty())
        {
            return Err(Error::Validation(
                "at least one core must be declared when search components or request handlers are configured"
                    .into(),
            ));
        }

        for component in self.search_components.iter() {
            let context = format!("search component '{}'", component.name);
            require(&component.name, "name", &context)?;
            require(&component.class, "class", &context)?;
        }
        for handler in self.request_handlers.iter() {
            handler.validate()?;
        }
        Ok(())
    }
}

/// Denormalized configuration for a set of cores
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolrConfig {
    pub cores: Vec<String>,
    pub search_components: Vec<SearchComponent>,
    pub request_handlers: Vec<RequestHandler>,
    pub query: Option<Settings>,
    pub update_handler: Option<Settings>,
    pub request_dispatcher: Option<Settings>,
}

impl From<SolrConfigBlock> for SolrConfig {
    fn from(block: SolrConfigBlock) -> Self {
        Self {
            cores: block.cores,
            search_components: block.search_components.into_vec(),
            request_handlers: block.request_handlers.into_vec(),
            query: non_empty(block.query),
            update_handler: non_empty(block.update_handler),
            request_dispatcher: non_empty(block.request_dispatcher),
        }
    }
}

impl SolrConfig {
    pub fn governs(&self, core: &str) -> bool {
        self.cores.iter().any(|c| c == core)
    }
}

fn non_empty(settings: Option<Settings>) -> Option<Settings> {
    settings.filter(|s| !s.is_empty())
}
