//! Visitors scoped to the `<query>` element (cache definitions)

use super::{ConfigVisitor, PairSource, VisitorConfig, boxed};

/// Cache element tags and their output keys
pub const CACHES: [(&str, &str); 4] = [
    ("filterCache", "filter_cache"),
    ("queryResultCache", "query_result_cache"),
    ("documentCache", "document_cache"),
    ("fieldValueCache", "field_value_cache"),
];

pub fn visitors() -> Vec<Box<dyn ConfigVisitor>> {
    boxed(
        CACHES
            .iter()
            .map(|&(tag, key)| VisitorConfig::tagged(tag, key).with_source(PairSource::Attributes))
            .collect(),
    )
}

/// True for tags handled by a cache visitor
pub(crate) fn is_cache(tag: &str) -> bool {
    CACHES.iter().any(|&(cache, _)| cache == tag)
}
