//! Configuration extraction for live Solr cores
//!
//! Reads a `solrconfig.xml` document and turns each section that the
//! declarative format cares about into a canonical [`ConfigNode`]:
//!
//! - [`document`]: the parsed element tree and tag/attribute lookups
//! - [`visitor`]: one visitor per subsection (defaults, commitWithin, ...)
//! - [`prepare`]: value preparation shared by every visitor
//! - [`pipeline`]: runs the visitor sets and assembles [`GeneratedConfig`]
//!
//! ```
//! use configgen::{Document, Pipeline};
//!
//! let doc = Document::parse(r#"<config><requestHandler name="/select" class="solr.SearchHandler"/></config>"#)?;
//! let generated = Pipeline::default().generate(&doc)?;
//! assert_eq!(generated.request_handlers[0].scalar("name"), Some("/select"));
//! # Ok::<(), configgen::Error>(())
//! ```

pub mod document;
pub mod error;
pub mod node;
pub mod pipeline;
pub mod prepare;
pub mod visitor;

pub use document::{ANY_TAG, AttributePredicate, Document, Element};
pub use error::{Error, Result};
pub use node::{ConfigNode, NodeValue, snake_case};
pub use pipeline::{GeneratedConfig, Pipeline};
pub use prepare::{CollapseWhitespace, Pairs, ValuePreparer, Verbatim};
pub use visitor::{ConfigVisitor, KeyStyle, Output, PairSource, SectionVisitor, VisitorConfig};
