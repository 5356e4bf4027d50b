//! Owned element tree for a live configuration document
//!
//! The tree is built once from the XML text with `quick-xml` and then
//! queried by tag name and attribute predicates, which is all the visitors
//! need. Nothing here knows about Solr sections.

use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Tag pattern that matches any element
pub const ANY_TAG: &str = "*";

/// Attribute predicate: matches when the attribute is present and its value
/// is one of `values`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePredicate {
    pub name: String,
    pub values: Vec<String>,
}

impl AttributePredicate {
    /// Predicate matching a single attribute value
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: vec![value.into()],
        }
    }

    /// Predicate matching any of several attribute values
    pub fn any_of<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    fn matches(&self, element: &Element) -> bool {
        element
            .attr(&self.name)
            .is_some_and(|value| self.values.iter().any(|v| v == value))
    }
}

/// A single element with its attributes, own text and child elements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Create an empty element (mostly useful in tests)
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Value of an attribute, if present
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// All attributes in document order
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Direct text content, trimmed
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Direct child elements in document order
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First direct child with the given tag
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// All descendants (not including `self`) whose tag matches `tag`
    /// (or any tag for [`ANY_TAG`]) and which satisfy every predicate,
    /// in document order.
    pub fn find_by_tag_and_attributes(
        &self,
        tag: &str,
        predicates: &[AttributePredicate],
    ) -> Vec<&Element> {
        let mut found = Vec::new();
        for child in &self.children {
            child.collect_matches(tag, predicates, &mut found);
        }
        found
    }

    fn collect_matches<'a>(
        &'a self,
        tag: &str,
        predicates: &[AttributePredicate],
        found: &mut Vec<&'a Element>,
    ) {
        if self.is_match(tag, predicates) {
            found.push(self);
        }
        for child in &self.children {
            child.collect_matches(tag, predicates, found);
        }
    }

    fn is_match(&self, tag: &str, predicates: &[AttributePredicate]) -> bool {
        (tag == ANY_TAG || self.tag == tag) && predicates.iter().all(|p| p.matches(self))
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();

        for attr in start.attributes() {
            let attr = attr
                .map_err(|e| Error::Malformed(format!("bad attribute on <{tag}>: {e}")))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| Error::Malformed(format!("bad attribute value on <{tag}>: {e}")))?
                .into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            tag,
            attributes,
            ..Self::default()
        })
    }
}

/// A parsed configuration document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parse a document from XML text
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => stack.push(Element::from_start(&e)?),
                Ok(Event::Empty(e)) => {
                    let element = Element::from_start(&e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| Error::Malformed("unbalanced closing tag".to_string()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape().map_err(|e| Error::Xml {
                        position: reader.buffer_position() as u64,
                        message: e.to_string(),
                    })?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(current) = stack.last_mut() {
                        current
                            .text
                            .push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml {
                        position: reader.buffer_position() as u64,
                        message: e.to_string(),
                    });
                }
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(Error::Malformed(format!(
                "unclosed element <{}>",
                stack.last().map(Element::tag).unwrap_or_default()
            )));
        }

        let root =
            root.ok_or_else(|| Error::Malformed("document has no root element".to_string()))?;
        log::debug!("Parsed document with root <{}>", root.tag);
        Ok(Self { root })
    }

    /// The document element
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Matching elements anywhere in the document, including the root
    pub fn find_by_tag_and_attributes(
        &self,
        tag: &str,
        predicates: &[AttributePredicate],
    ) -> Vec<&Element> {
        let mut found = Vec::new();
        self.root.collect_matches(tag, predicates, &mut found);
        found
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(Error::Malformed(format!(
                "second root element <{}>",
                element.tag
            )));
        }
    }
    Ok(())
}
