//! Config node descriptors
//!
//! A descriptor pairs an entity type and the remote sub-path holding its
//! current state with the declared entities (or settings) of that type for
//! one reconciliation pass.

use crate::Result;
use crate::command::Api;
use crate::model::{
    CopyField, DynamicField, Field, FieldType, ManagedSchema, RequestHandler, SearchComponent,
    Settings, SolrConfig,
};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    SearchComponent,
    RequestHandler,
    Query,
    UpdateHandler,
    RequestDispatcher,
    FieldType,
    Field,
    DynamicField,
    CopyField,
}

impl EntityType {
    pub fn name(self) -> &'static str {
        match self {
            Self::SearchComponent => "search_component",
            Self::RequestHandler => "request_handler",
            Self::Query => "query",
            Self::UpdateHandler => "update_handler",
            Self::RequestDispatcher => "request_dispatcher",
            Self::FieldType => "field_type",
            Self::Field => "field",
            Self::DynamicField => "dynamic_field",
            Self::CopyField => "copy_field",
        }
    }

    pub fn api(self) -> Api {
        match self {
            Self::SearchComponent
            | Self::RequestHandler
            | Self::Query
            | Self::UpdateHandler
            | Self::RequestDispatcher => Api::Config,
            Self::FieldType | Self::Field | Self::DynamicField | Self::CopyField => Api::Schema,
        }
    }

    /// Sub-path (relative to the API root) listing the current entities
    pub fn sub_path(self) -> &'static str {
        match self {
            Self::SearchComponent => "searchComponent",
            Self::RequestHandler => "requestHandler",
            Self::Query => "query",
            Self::UpdateHandler => "updateHandler",
            Self::RequestDispatcher => "requestDispatcher",
            Self::FieldType => "fieldtypes",
            Self::Field => "fields",
            Self::DynamicField => "dynamicfields",
            Self::CopyField => "copyfields",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A declared entity of any type
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    SearchComponent(SearchComponent),
    RequestHandler(RequestHandler),
    FieldType(FieldType),
    Field(Field),
    DynamicField(DynamicField),
    CopyField(CopyField),
}

impl Entity {
    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::SearchComponent(_) => EntityType::SearchComponent,
            Self::RequestHandler(_) => EntityType::RequestHandler,
            Self::FieldType(_) => EntityType::FieldType,
            Self::Field(_) => EntityType::Field,
            Self::DynamicField(_) => EntityType::DynamicField,
            Self::CopyField(_) => EntityType::CopyField,
        }
    }

    /// Name used to match the entity against current state; copy fields
    /// have no name and use their source
    pub fn name(&self) -> &str {
        match self {
            Self::SearchComponent(c) => &c.name,
            Self::RequestHandler(h) => &h.name,
            Self::FieldType(t) => &t.name,
            Self::Field(f) | Self::DynamicField(f) => &f.name,
            Self::CopyField(c) => &c.source,
        }
    }

    /// Body of the command that creates or updates this entity
    pub fn to_payload(&self) -> Result<Value> {
        match self {
            Self::SearchComponent(c) => Ok(c.to_payload()),
            Self::RequestHandler(h) => Ok(h.to_payload()),
            Self::FieldType(t) => t.to_payload(),
            Self::Field(f) | Self::DynamicField(f) => f.to_payload(),
            Self::CopyField(c) => c.to_payload(),
        }
    }
}

/// Declared entities of one type plus the sub-path of their current state
#[derive(Debug, Clone, PartialEq)]
pub struct IterableConfigNode {
    entity_type: EntityType,
    path: String,
    entities: Vec<Entity>,
}

impl IterableConfigNode {
    pub fn new(entity_type: EntityType, entities: Vec<Entity>) -> Self {
        Self {
            entity_type,
            path: entity_type.sub_path().to_string(),
            entities,
        }
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }
}

/// A single settings block (query, update handler, request dispatcher)
#[derive(Debug, Clone, PartialEq)]
pub struct ValueConfigNode {
    entity_type: EntityType,
    path: String,
    settings: Settings,
}

impl ValueConfigNode {
    pub fn new(entity_type: EntityType, settings: Settings) -> Self {
        Self {
            entity_type,
            path: entity_type.sub_path().to_string(),
            settings,
        }
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigNode {
    Iterable(IterableConfigNode),
    Value(ValueConfigNode),
}

impl ConfigNode {
    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::Iterable(node) => node.entity_type(),
            Self::Value(node) => node.entity_type(),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Iterable(node) => node.path(),
            Self::Value(node) => node.path(),
        }
    }

    /// Descriptor kind, used in shape mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Iterable(_) => "IterableConfigNode",
            Self::Value(_) => "ValueConfigNode",
        }
    }
}

/// Descriptors for a declared config, in the order they are built
///
/// Empty entity lists and absent settings produce no descriptor.
pub fn config_nodes(config: &SolrConfig) -> Vec<ConfigNode> {
    let mut nodes = Vec::new();

    push_iterable(
        &mut nodes,
        EntityType::SearchComponent,
        config.search_components.iter().cloned().map(Entity::SearchComponent),
    );
    push_iterable(
        &mut nodes,
        EntityType::RequestHandler,
        config.request_handlers.iter().cloned().map(Entity::RequestHandler),
    );

    for (entity_type, settings) in [
        (EntityType::Query, &config.query),
        (EntityType::UpdateHandler, &config.update_handler),
        (EntityType::RequestDispatcher, &config.request_dispatcher),
    ] {
        if let Some(settings) = settings {
            nodes.push(ConfigNode::Value(ValueConfigNode::new(
                entity_type,
                settings.clone(),
            )));
        }
    }

    nodes
}

/// Descriptors for a declared schema
pub fn schema_nodes(schema: &ManagedSchema) -> Vec<ConfigNode> {
    let mut nodes = Vec::new();

    push_iterable(
        &mut nodes,
        EntityType::FieldType,
        schema.field_types.iter().cloned().map(Entity::FieldType),
    );
    push_iterable(
        &mut nodes,
        EntityType::Field,
        schema.fields.iter().cloned().map(Entity::Field),
    );
    push_iterable(
        &mut nodes,
        EntityType::DynamicField,
        schema.dynamic_fields.iter().cloned().map(Entity::DynamicField),
    );
    push_iterable(
        &mut nodes,
        EntityType::CopyField,
        schema.copy_fields.iter().cloned().map(Entity::CopyField),
    );

    nodes
}

fn push_iterable(
    nodes: &mut Vec<ConfigNode>,
    entity_type: EntityType,
    entities: impl Iterator<Item = Entity>,
) {
    let entities: Vec<Entity> = entities.collect();
    if !entities.is_empty() {
        nodes.push(ConfigNode::Iterable(IterableConfigNode::new(
            entity_type,
            entities,
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CopyField;
    use serde_json::json;

    #[test]
    fn test_config_nodes() {
        let mut update_handler = Settings::new();
        update_handler.insert("class".into(), json!("solr.DirectUpdateHandler2"));

        let config = SolrConfig {
            cores: vec!["demo".into()],
            search_components: vec![SearchComponent::new("spellcheck", "solr.SpellCheckComponent")],
            update_handler: Some(update_handler),
            ..SolrConfig::default()
        };

        let nodes = config_nodes(&config);
        let types: Vec<EntityType> = nodes.iter().map(ConfigNode::entity_type).collect();
        assert_eq!(types, [EntityType::SearchComponent, EntityType::UpdateHandler]);
        assert_eq!(nodes[0].path(), "searchComponent");
        assert_eq!(nodes[0].kind(), "IterableConfigNode");
        assert_eq!(nodes[1].kind(), "ValueConfigNode");
    }

    #[test]
    fn test_schema_nodes() {
        let schema = ManagedSchema {
            cores: vec!["demo".into()],
            fields: vec![Field::new("title", "text_general")],
            copy_fields: vec![CopyField::new("title", "text")],
            ..ManagedSchema::default()
        };

        let nodes = schema_nodes(&schema);
        let paths: Vec<&str> = nodes.iter().map(ConfigNode::path).collect();
        assert_eq!(paths, ["fields", "copyfields"]);
        assert!(nodes.iter().all(|n| n.entity_type().api() == Api::Schema));
    }

    #[test]
    fn test_entity_identity() {
        let entity = Entity::DynamicField(Field::new("*_s", "string"));
        assert_eq!(entity.entity_type(), EntityType::DynamicField);
        assert_eq!(entity.name(), "*_s");
        assert_eq!(entity.to_payload().unwrap()["type"], "string");
    }
}
