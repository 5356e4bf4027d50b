//! Config node handlers
//!
//! One handler per entity type. A handler fetches the current state of its
//! sub-path, diffs it against the declared entities by name and stages an
//! ADD or UPDATE command for each of them. The [`HandlerChain`] runs the
//! handlers in ascending priority.

pub mod config;
pub mod schema;

pub use config::{PropertyHandler, RequestHandlerHandler, SearchComponentHandler};
pub use schema::{CopyFieldHandler, DynamicFieldHandler, FieldHandler, FieldTypeHandler};

use crate::command::Command;
use crate::manager::SolrApiManager;
use crate::node::{ConfigNode, EntityType, IterableConfigNode};
use crate::response::Response;
use crate::{Error, Result};
use serde_json::Value;
use std::collections::HashSet;

/// Priority of every handler that does not override it
pub const DEFAULT_PRIORITY: i32 = 50;

pub trait ConfigNodeHandler {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Whether this handler processes the descriptor
    fn supports(&self, node: &ConfigNode) -> bool;

    /// Diff the descriptor against current state and stage commands
    fn handle(&self, node: &ConfigNode, manager: &mut dyn SolrApiManager) -> Result<()>;

    /// Lower runs first
    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }
}

/// Handlers ordered by ascending priority, ties in registration order
#[derive(Default)]
pub struct HandlerChain {
    handlers: Vec<Box<dyn ConfigNodeHandler>>,
}

impl HandlerChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain with a handler for every entity type
    pub fn with_default_handlers() -> Self {
        Self::new()
            .with_handler(Box::new(SearchComponentHandler))
            .with_handler(Box::new(RequestHandlerHandler))
            .with_handler(Box::new(PropertyHandler::query()))
            .with_handler(Box::new(PropertyHandler::update_handler()))
            .with_handler(Box::new(PropertyHandler::request_dispatcher()))
            .with_handler(Box::new(FieldTypeHandler))
            .with_handler(Box::new(FieldHandler))
            .with_handler(Box::new(DynamicFieldHandler))
            .with_handler(Box::new(CopyFieldHandler))
    }

    pub fn register(&mut self, handler: Box<dyn ConfigNodeHandler>) {
        self.handlers.push(handler);
        // stable: equal priorities keep registration order
        self.handlers.sort_by_key(|h| h.priority());
    }

    pub fn with_handler(mut self, handler: Box<dyn ConfigNodeHandler>) -> Self {
        self.register(handler);
        self
    }

    /// Handler names in execution order
    pub fn names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run every handler over the descriptors it supports.
    ///
    /// Stops at the first error. Returns the number of descriptors handled.
    pub fn run(&self, nodes: &[ConfigNode], manager: &mut dyn SolrApiManager) -> Result<usize> {
        let mut handled = 0;

        for handler in &self.handlers {
            for node in nodes.iter().filter(|node| handler.supports(node)) {
                log::debug!(
                    "{} handler processing {} ({})",
                    handler.name(),
                    node.path(),
                    node.entity_type()
                );
                handler.handle(node, manager)?;
                handled += 1;
            }
        }

        Ok(handled)
    }
}

pub(crate) fn expect_iterable(node: &ConfigNode) -> Result<&IterableConfigNode> {
    match node {
        ConfigNode::Iterable(node) => Ok(node),
        other => Err(Error::ShapeMismatch {
            expected: "IterableConfigNode",
            found: other.kind(),
        }),
    }
}

/// Fetch current state, wrapping failures with the sub-path
pub(crate) fn fetch(manager: &mut dyn SolrApiManager, path: &str) -> Result<Response> {
    manager.call(path).map_err(|e| Error::Lookup {
        path: path.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn unexpected_response(expected: &'static str, response: &Response) -> Error {
    Error::ShapeMismatch {
        expected,
        found: response.kind(),
    }
}

/// Stage a command, wrapping rejections with the command and entity type
pub(crate) fn stage(
    manager: &mut dyn SolrApiManager,
    command: Command,
    entity_type: EntityType,
    payload: Value,
) -> Result<()> {
    manager
        .add_command(command, payload)
        .map_err(|e| Error::Mutation {
            command: command.name().to_string(),
            entity_type: entity_type.name(),
            source: Box::new(e),
        })
}

/// ADD entities missing from `current`, UPDATE the others
pub(crate) fn stage_by_name(
    node: &IterableConfigNode,
    current: &HashSet<&str>,
    manager: &mut dyn SolrApiManager,
) -> Result<()> {
    for entity in node.entities() {
        let exists = current.contains(entity.name());
        let Some(command) = Command::for_entity(node.entity_type(), exists) else {
            continue;
        };
        stage(manager, command, node.entity_type(), entity.to_payload()?)?;
    }
    Ok(())
}
