//! Handlers for the config API

use super::{ConfigNodeHandler, expect_iterable, fetch, stage, stage_by_name, unexpected_response};
use crate::command::Command;
use crate::manager::SolrApiManager;
use crate::model::{Settings, camel_case};
use crate::node::{ConfigNode, EntityType};
use crate::response::Response;
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::collections::HashSet;

pub struct SearchComponentHandler;

impl ConfigNodeHandler for SearchComponentHandler {
    fn name(&self) -> &'static str {
        EntityType::SearchComponent.name()
    }

    fn supports(&self, node: &ConfigNode) -> bool {
        node.entity_type() == EntityType::SearchComponent
    }

    fn handle(&self, node: &ConfigNode, manager: &mut dyn SolrApiManager) -> Result<()> {
        let node = expect_iterable(node)?;
        let response = fetch(manager, node.path())?;
        let Response::Config(current) = &response else {
            return Err(unexpected_response("ConfigResponse", &response));
        };

        let names: HashSet<&str> = current
            .config
            .search_components
            .keys()
            .map(String::as_str)
            .collect();
        stage_by_name(node, &names, manager)
    }
}

pub struct RequestHandlerHandler;

impl ConfigNodeHandler for RequestHandlerHandler {
    fn name(&self) -> &'static str {
        EntityType::RequestHandler.name()
    }

    fn supports(&self, node: &ConfigNode) -> bool {
        node.entity_type() == EntityType::RequestHandler
    }

    fn handle(&self, node: &ConfigNode, manager: &mut dyn SolrApiManager) -> Result<()> {
        let node = expect_iterable(node)?;
        let response = fetch(manager, node.path())?;
        let Response::Config(current) = &response else {
            return Err(unexpected_response("ConfigResponse", &response));
        };

        let names: HashSet<&str> = current
            .config
            .request_handlers
            .keys()
            .map(String::as_str)
            .collect();
        stage_by_name(node, &names, manager)
    }
}

/// Stages `set-property` for a settings block (query, update handler or
/// request dispatcher).
///
/// Settings are flattened into `prefix.camelCaseKey` properties, e.g.
/// `auto_commit.max_time` under the update handler becomes
/// `updateHandler.autoCommit.maxTime`. The top-level `class` is not an
/// editable property and is left out.
pub struct PropertyHandler {
    entity_type: EntityType,
}

impl PropertyHandler {
    pub fn query() -> Self {
        Self {
            entity_type: EntityType::Query,
        }
    }

    pub fn update_handler() -> Self {
        Self {
            entity_type: EntityType::UpdateHandler,
        }
    }

    pub fn request_dispatcher() -> Self {
        Self {
            entity_type: EntityType::RequestDispatcher,
        }
    }
}

impl ConfigNodeHandler for PropertyHandler {
    fn name(&self) -> &'static str {
        self.entity_type.name()
    }

    fn supports(&self, node: &ConfigNode) -> bool {
        node.entity_type() == self.entity_type
    }

    fn handle(&self, node: &ConfigNode, manager: &mut dyn SolrApiManager) -> Result<()> {
        let ConfigNode::Value(node) = node else {
            return Err(Error::ShapeMismatch {
                expected: "ValueConfigNode",
                found: node.kind(),
            });
        };

        let mut properties = Map::new();
        flatten(node.path(), node.settings(), &mut properties, true);
        if properties.is_empty() {
            return Ok(());
        }

        stage(
            manager,
            Command::SetProperty,
            self.entity_type,
            Value::Object(properties),
        )
    }
}

fn flatten(prefix: &str, settings: &Settings, out: &mut Map<String, Value>, top_level: bool) {
    for (key, value) in settings {
        if top_level && key == "class" {
            continue;
        }
        let name = format!("{prefix}.{}", camel_case(key));
        match value {
            Value::Object(nested) => flatten(&name, nested, out, false),
            Value::Null => {}
            other => {
                out.insert(name, other.clone());
            }
        }
    }
}
