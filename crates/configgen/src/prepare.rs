//! Value preparation applied to extracted name/value pairs
//!
//! Visitors hand every sequence of pairs they extract to a [`ValuePreparer`]
//! before storing it. Values are configuration text from the document; a
//! preparer may tidy them but never interprets them, so `${var:default}`
//! placeholders always survive untouched.

/// Ordered name/value pairs as extracted from a section
pub type Pairs = Vec<(String, String)>;

/// Strategy applied to every extracted pair sequence
pub trait ValuePreparer {
    fn prepare(&self, pairs: Pairs) -> Pairs;
}

/// Leaves pairs exactly as extracted
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl ValuePreparer for Verbatim {
    fn prepare(&self, pairs: Pairs) -> Pairs {
        pairs
    }
}

/// Collapses runs of whitespace inside values (multi-line element text) to a
/// single space and drops pairs with an empty name.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollapseWhitespace;

impl ValuePreparer for CollapseWhitespace {
    fn prepare(&self, pairs: Pairs) -> Pairs {
        pairs
            .into_iter()
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| {
                let value = value.split_whitespace().collect::<Vec<_>>().join(" ");
                (name, value)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Pairs {
        items
            .iter()
            .map(|(n, v)| ((*n).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_verbatim() {
        let input = pairs(&[("a", "  x  "), ("", "y")]);
        assert_eq!(Verbatim.prepare(input.clone()), input);
    }

    #[test]
    fn test_collapse_whitespace() {
        let input = pairs(&[
            ("spellcheck.dictionary", "default\n        wordbreak"),
            ("", "orphan"),
            ("softCommit", "${solr.commitwithin.softcommit:true}"),
        ]);

        assert_eq!(
            CollapseWhitespace.prepare(input),
            pairs(&[
                ("spellcheck.dictionary", "default wordbreak"),
                ("softCommit", "${solr.commitwithin.softcommit:true}"),
            ])
        );
    }
}
