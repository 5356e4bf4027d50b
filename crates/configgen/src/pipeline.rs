//! Extraction pipeline
//!
//! Runs the registered visitor sets against a parsed `solrconfig.xml` and
//! assembles one canonical node per section: one per search component, one
//! per request handler, and one each for the query settings, the update
//! handler and the request dispatcher.

use crate::document::{Document, Element};
use crate::error::{Error, Result};
use crate::node::{ConfigNode, NodeValue, snake_case};
use crate::prepare::{CollapseWhitespace, ValuePreparer};
use crate::visitor::request_handler::{COMPONENTS, FIRST_COMPONENTS, LAST_COMPONENTS};
use crate::visitor::{self, ConfigVisitor};
use serde::Serialize;

/// Every section extracted from one document, in the declarative input shape
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneratedConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub search_components: Vec<ConfigNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub request_handlers: Vec<ConfigNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<ConfigNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_handler: Option<ConfigNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_dispatcher: Option<ConfigNode>,
}

/// Visitor sets plus the value preparer shared by all of them
pub struct Pipeline {
    preparer: Box<dyn ValuePreparer>,
    request_handler: Vec<Box<dyn ConfigVisitor>>,
    update_handler: Vec<Box<dyn ConfigVisitor>>,
    request_dispatcher: Vec<Box<dyn ConfigVisitor>>,
    query: Vec<Box<dyn ConfigVisitor>>,
}

impl Pipeline {
    /// Pipeline with every built-in visitor registered
    pub fn new(preparer: impl ValuePreparer + 'static) -> Self {
        Self {
            preparer: Box::new(preparer),
            request_handler: visitor::request_handler::visitors(),
            update_handler: visitor::update_handler::visitors(),
            request_dispatcher: visitor::request_dispatcher::visitors(),
            query: visitor::query::visitors(),
        }
    }

    /// Pipeline with no visitors; sections only carry their attributes
    pub fn empty(preparer: impl ValuePreparer + 'static) -> Self {
        Self {
            preparer: Box::new(preparer),
            request_handler: Vec::new(),
            update_handler: Vec::new(),
            request_dispatcher: Vec::new(),
            query: Vec::new(),
        }
    }

    pub fn with_request_handler_visitor(mut self, visitor: Box<dyn ConfigVisitor>) -> Self {
        self.request_handler.push(visitor);
        self
    }

    pub fn with_update_handler_visitor(mut self, visitor: Box<dyn ConfigVisitor>) -> Self {
        self.update_handler.push(visitor);
        self
    }

    pub fn with_request_dispatcher_visitor(mut self, visitor: Box<dyn ConfigVisitor>) -> Self {
        self.request_dispatcher.push(visitor);
        self
    }

    pub fn with_query_visitor(mut self, visitor: Box<dyn ConfigVisitor>) -> Self {
        self.query.push(visitor);
        self
    }

    /// One node per `<searchComponent>` with its `name` and `class`
    pub fn search_components(&self, doc: &Document) -> Vec<ConfigNode> {
        doc.find_by_tag_and_attributes("searchComponent", &[])
            .into_iter()
            .map(|element| {
                let mut node = ConfigNode::new();
                copy_attribute(element, "name", &mut node);
                copy_attribute(element, "class", &mut node);
                node
            })
            .collect()
    }

    /// One node per `<requestHandler>`, validated before it is returned
    pub fn request_handlers(&self, doc: &Document) -> Result<Vec<ConfigNode>> {
        doc.find_by_tag_and_attributes("requestHandler", &[])
            .into_iter()
            .map(|element| {
                let mut node = ConfigNode::new();
                copy_attribute(element, "name", &mut node);
                copy_attribute(element, "class", &mut node);
                self.run(&self.request_handler, element, &mut node);
                validate_request_handler(&node)?;
                Ok(node)
            })
            .collect()
    }

    pub fn update_handler(&self, doc: &Document) -> Option<ConfigNode> {
        let element = doc.find_by_tag_and_attributes("updateHandler", &[]).into_iter().next()?;

        let mut node = ConfigNode::new();
        copy_attribute(element, "class", &mut node);
        self.run(&self.update_handler, element, &mut node);
        Some(node)
    }

    pub fn request_dispatcher(&self, doc: &Document) -> Option<ConfigNode> {
        let element = doc
            .find_by_tag_and_attributes("requestDispatcher", &[])
            .into_iter()
            .next()?;

        let mut node = ConfigNode::new();
        if let Some(value) = element.attr("handleSelect") {
            node.insert("handle_select", NodeValue::Scalar(value.to_string()));
        }
        self.run(&self.request_dispatcher, element, &mut node);
        Some(node)
    }

    /// Scalar query settings (`maxBooleanClauses`, ...) plus cache sections
    pub fn query(&self, doc: &Document) -> Option<ConfigNode> {
        let element = doc.find_by_tag_and_attributes("query", &[]).into_iter().next()?;

        let scalars: Vec<(String, String)> = element
            .children()
            .iter()
            .filter(|child| child.children().is_empty() && !visitor::query::is_cache(child.tag()))
            .filter(|child| !child.text().is_empty())
            .map(|child| (snake_case(child.tag()), child.text().to_string()))
            .collect();

        let mut node = ConfigNode::new();
        for (name, value) in self.preparer.prepare(scalars) {
            node.insert(name, NodeValue::Scalar(value));
        }
        self.run(&self.query, element, &mut node);
        Some(node)
    }

    /// Extract every section of the document
    pub fn generate(&self, doc: &Document) -> Result<GeneratedConfig> {
        let generated = GeneratedConfig {
            search_components: self.search_components(doc),
            request_handlers: self.request_handlers(doc)?,
            query: self.query(doc),
            update_handler: self.update_handler(doc),
            request_dispatcher: self.request_dispatcher(doc),
        };

        log::info!(
            "Extracted {} search components and {} request handlers",
            generated.search_components.len(),
            generated.request_handlers.len()
        );
        Ok(generated)
    }

    fn run(&self, visitors: &[Box<dyn ConfigVisitor>], scope: &Element, out: &mut ConfigNode) {
        for visitor in visitors {
            visitor.visit(scope, self.preparer.as_ref(), out);
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(CollapseWhitespace)
    }
}

fn copy_attribute(element: &Element, name: &str, node: &mut ConfigNode) {
    if let Some(value) = element.attr(name) {
        node.insert(name, NodeValue::Scalar(value.to_string()));
    }
}

/// `components` replaces the whole component chain, so it cannot be combined
/// with `first_components`/`last_components`
fn validate_request_handler(node: &ConfigNode) -> Result<()> {
    if node.has_values(COMPONENTS)
        && (node.has_values(FIRST_COMPONENTS) || node.has_values(LAST_COMPONENTS))
    {
        return Err(Error::Validation {
            section: "request handler",
            name: node.scalar("name").unwrap_or_default().to_string(),
            message: "first/last components are only valid without 'components'".to_string(),
        });
    }
    Ok(())
}
