//! Visitors scoped to the `<updateHandler>` element

use super::{ConfigVisitor, VisitorConfig, boxed};

pub fn update_log() -> VisitorConfig {
    VisitorConfig::tagged("updateLog", "update_log")
}

pub fn auto_commit() -> VisitorConfig {
    VisitorConfig::tagged("autoCommit", "auto_commit")
}

pub fn auto_soft_commit() -> VisitorConfig {
    VisitorConfig::tagged("autoSoftCommit", "auto_soft_commit")
}

pub fn commit_within() -> VisitorConfig {
    VisitorConfig::tagged("commitWithin", "commit_within")
}

pub fn visitors() -> Vec<Box<dyn ConfigVisitor>> {
    boxed(vec![
        update_log(),
        auto_commit(),
        auto_soft_commit(),
        commit_within(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::node::ConfigNode;
    use crate::prepare::CollapseWhitespace;
    use crate::visitor::SectionVisitor;

    const XML: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<config>
  <updateHandler class="solr.DirectUpdateHandler2" numVersionBuckets="2">
    <updateLog>
      <str name="dir">${solr.ulog.dir:}</str>
      <int name="numVersionBuckets">${solr.ulog.numVersionBuckets:65536}</int>
    </updateLog>
    <autoCommit>
      <maxTime>${solr.autoCommit.maxTime:15000}</maxTime>
      <openSearcher>false</openSearcher>
    </autoCommit>
    <autoSoftCommit>
      <maxTime>${solr.autoSoftCommit.maxTime:-1}</maxTime>
    </autoSoftCommit>
    <commitWithin>
      <softCommit>${solr.commitwithin.softcommit:true}</softCommit>
    </commitWithin>
  </updateHandler>
</config>"#;

    #[test]
    fn test_commit_within() {
        let doc = Document::parse(XML).unwrap();
        let mut node = ConfigNode::new();

        SectionVisitor::new(commit_within()).visit(doc.root(), &CollapseWhitespace, &mut node);

        let commit_within = node.node("commit_within").unwrap();
        assert_eq!(
            commit_within.scalar("soft_commit"),
            Some("${solr.commitwithin.softcommit:true}")
        );
        assert!(!commit_within.contains_key("max_size"));
        assert_eq!(node.len(), 1);
    }

    #[test]
    fn test_update_log_uses_name_attributes() {
        let doc = Document::parse(XML).unwrap();
        let mut node = ConfigNode::new();

        for visitor in visitors() {
            visitor.visit(doc.root(), &CollapseWhitespace, &mut node);
        }

        let update_log = node.node("update_log").unwrap();
        assert_eq!(update_log.scalar("dir"), Some("${solr.ulog.dir:}"));
        assert_eq!(
            update_log.scalar("num_version_buckets"),
            Some("${solr.ulog.numVersionBuckets:65536}")
        );
        assert_eq!(
            node.node("auto_soft_commit").unwrap().scalar("max_time"),
            Some("${solr.autoSoftCommit.maxTime:-1}")
        );
    }
}
