//! Section visitors
//!
//! A visitor targets one fixed subsection of a document scope (a request
//! handler element, the update handler, ...) and, when that subsection is
//! present, writes a single key into the output node. Visitors are
//! independent: each owns a distinct output key and never reads what other
//! visitors wrote.

pub mod query;
pub mod request_dispatcher;
pub mod request_handler;
pub mod update_handler;

use crate::document::{AttributePredicate, Element};
use crate::node::{ConfigNode, NodeValue, snake_case};
use crate::prepare::{Pairs, ValuePreparer};

/// Where the name/value pairs of a matched section come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairSource {
    /// Direct children: name from the child's `name` attribute (or its tag
    /// when it has none), value from its text
    Children,
    /// Attributes of the matched element itself
    Attributes,
}

/// Shape of the value written to the output node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// [`NodeValue::Pairs`]
    Pairs,
    /// [`NodeValue::Node`] with one scalar per pair
    Node,
    /// [`NodeValue::List`] of the values only
    List,
}

/// How pair names are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStyle {
    /// As found in the document (request parameters such as `echoParams`)
    Verbatim,
    /// Converted with [`snake_case`]
    SnakeCase,
}

/// Immutable configuration of one visitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorConfig {
    /// Tag of the section element, or [`crate::document::ANY_TAG`]
    pub tag: &'static str,
    /// Predicates the section element must satisfy
    pub predicates: Vec<AttributePredicate>,
    pub source: PairSource,
    pub output: Output,
    pub key_style: KeyStyle,
    /// Key written to the output node
    pub key: &'static str,
}

impl VisitorConfig {
    /// Section selected by tag alone, pairs from children, written as a
    /// nested node with snake_case names
    pub fn tagged(tag: &'static str, key: &'static str) -> Self {
        Self {
            tag,
            predicates: Vec::new(),
            source: PairSource::Children,
            output: Output::Node,
            key_style: KeyStyle::SnakeCase,
            key,
        }
    }

    /// Section selected by its `name` attribute
    pub fn named(tag: &'static str, name: &'static str, key: &'static str) -> Self {
        Self {
            tag,
            predicates: vec![AttributePredicate::new("name", name)],
            source: PairSource::Children,
            output: Output::Pairs,
            key_style: KeyStyle::Verbatim,
            key,
        }
    }

    pub fn with_source(mut self, source: PairSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }
}

/// A unit that contributes one section of a canonical node
pub trait ConfigVisitor {
    /// The key this visitor writes
    fn key(&self) -> &str;

    /// Extract the section from `scope` into `out`; leaves `out` untouched
    /// when the section is absent
    fn visit(&self, scope: &Element, preparer: &dyn ValuePreparer, out: &mut ConfigNode);
}

/// Visitor driven entirely by a [`VisitorConfig`]
#[derive(Debug, Clone)]
pub struct SectionVisitor {
    config: VisitorConfig,
}

impl SectionVisitor {
    pub fn new(config: VisitorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VisitorConfig {
        &self.config
    }

    fn extract_pairs(&self, section: &Element) -> Pairs {
        let pairs = match self.config.source {
            PairSource::Children => section
                .children()
                .iter()
                .map(|child| {
                    let name = child.attr("name").unwrap_or(child.tag());
                    (name.to_string(), child.text().to_string())
                })
                .collect::<Pairs>(),
            PairSource::Attributes => section.attributes().to_vec(),
        };

        match self.config.key_style {
            KeyStyle::Verbatim => pairs,
            KeyStyle::SnakeCase => pairs
                .into_iter()
                .map(|(name, value)| (snake_case(&name), value))
                .collect(),
        }
    }
}

impl ConfigVisitor for SectionVisitor {
    fn key(&self) -> &str {
        self.config.key
    }

    fn visit(&self, scope: &Element, preparer: &dyn ValuePreparer, out: &mut ConfigNode) {
        let matches = scope.find_by_tag_and_attributes(self.config.tag, &self.config.predicates);
        let Some(section) = matches.first() else {
            return;
        };

        if matches.len() > 1 {
            log::debug!(
                "{} sections match '{}', using the first",
                matches.len(),
                self.config.key
            );
        }

        let pairs = preparer.prepare(self.extract_pairs(section));
        let value = match self.config.output {
            Output::Pairs => NodeValue::Pairs(pairs),
            Output::List => NodeValue::List(pairs.into_iter().map(|(_, value)| value).collect()),
            Output::Node => {
                let mut node = ConfigNode::new();
                for (name, value) in pairs {
                    node.insert(name, NodeValue::Scalar(value));
                }
                NodeValue::Node(node)
            }
        };

        out.insert(self.config.key, value);
    }
}

/// Box a list of configs as visitors
pub(crate) fn boxed(configs: Vec<VisitorConfig>) -> Vec<Box<dyn ConfigVisitor>> {
    configs
        .into_iter()
        .map(|config| Box::new(SectionVisitor::new(config)) as Box<dyn ConfigVisitor>)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::prepare::{CollapseWhitespace, Verbatim};

    fn scope(xml: &str) -> Document {
        Document::parse(xml).unwrap()
    }

    #[test]
    fn test_absent_section_is_noop() {
        let doc =
            scope(r#"<requestHandler name="/select"><lst name="defaults"/></requestHandler>"#);
        let visitor = SectionVisitor::new(VisitorConfig::named("lst", "appends", "appends"));

        let mut out = ConfigNode::new();
        out.insert("appends", NodeValue::Scalar("untouched".into()));
        visitor.visit(doc.root(), &Verbatim, &mut out);

        assert_eq!(out.scalar("appends"), Some("untouched"));

        let mut empty = ConfigNode::new();
        visitor.visit(doc.root(), &Verbatim, &mut empty);
        assert!(!empty.contains_key("appends"));
    }

    #[test]
    fn test_children_fall_back_to_tag_name() {
        let doc = scope(
            r#"<updateHandler><autoCommit><maxTime>15000</maxTime><str name="openSearcher">false</str></autoCommit></updateHandler>"#,
        );
        let visitor = SectionVisitor::new(VisitorConfig::tagged("autoCommit", "auto_commit"));

        let mut out = ConfigNode::new();
        visitor.visit(doc.root(), &Verbatim, &mut out);

        let section = out.node("auto_commit").unwrap();
        assert_eq!(section.scalar("max_time"), Some("15000"));
        assert_eq!(section.scalar("open_searcher"), Some("false"));
    }

    #[test]
    fn test_attribute_source() {
        let doc = scope(
            r#"<requestDispatcher><requestParsers enableRemoteStreaming="true" multipartUploadLimitInKB="-1"/></requestDispatcher>"#,
        );
        let visitor = SectionVisitor::new(
            VisitorConfig::tagged("requestParsers", "request_parsers")
                .with_source(PairSource::Attributes),
        );

        let mut out = ConfigNode::new();
        visitor.visit(doc.root(), &Verbatim, &mut out);

        let section = out.node("request_parsers").unwrap();
        assert_eq!(
            section.keys().collect::<Vec<_>>(),
            ["enable_remote_streaming", "multipart_upload_limit_in_kb"]
        );
    }

    #[test]
    fn test_preparer_is_applied() {
        let doc = scope(
            "<requestHandler><lst name=\"defaults\"><str name=\"fl\">id,\n   title</str></lst></requestHandler>",
        );
        let visitor = SectionVisitor::new(VisitorConfig::named("lst", "defaults", "defaults"));

        let mut out = ConfigNode::new();
        visitor.visit(doc.root(), &CollapseWhitespace, &mut out);

        assert_eq!(
            out.pairs("defaults").unwrap(),
            [("fl".to_string(), "id, title".to_string())]
        );
    }

    #[test]
    fn test_list_output() {
        let doc = scope(
            r#"<requestHandler><arr name="last-components"><str>spellcheck</str><str>elevator</str></arr></requestHandler>"#,
        );
        let visitor = SectionVisitor::new(
            VisitorConfig::named("arr", "last-components", "last_components")
                .with_output(Output::List),
        );

        let mut out = ConfigNode::new();
        visitor.visit(doc.root(), &Verbatim, &mut out);

        assert_eq!(out.list("last_components").unwrap(), ["spellcheck", "elevator"]);
    }
}
