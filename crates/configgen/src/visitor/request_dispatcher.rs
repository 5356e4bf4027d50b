//! Visitors scoped to the `<requestDispatcher>` element

use super::{ConfigVisitor, PairSource, VisitorConfig, boxed};

pub fn request_parsers() -> VisitorConfig {
    VisitorConfig::tagged("requestParsers", "request_parsers").with_source(PairSource::Attributes)
}

pub fn http_caching() -> VisitorConfig {
    VisitorConfig::tagged("httpCaching", "http_caching").with_source(PairSource::Attributes)
}

pub fn visitors() -> Vec<Box<dyn ConfigVisitor>> {
    boxed(vec![request_parsers(), http_caching()])
}
