//! Declared configuration and schema, indexed by core
//!
//! Blocks are denormalized into entities on first lookup and the result is
//! reused for every later lookup.

use crate::Result;
use crate::model::{ManagedSchema, ManagedSchemaBlock, SolrConfig, SolrConfigBlock};
use std::sync::OnceLock;

#[derive(Debug)]
pub struct ConfigurationStore {
    schema_blocks: Vec<ManagedSchemaBlock>,
    config_blocks: Vec<SolrConfigBlock>,
    schemas: OnceLock<Vec<ManagedSchema>>,
    configs: OnceLock<Vec<SolrConfig>>,
}

impl ConfigurationStore {
    pub fn new(schemas: Vec<ManagedSchemaBlock>, configs: Vec<SolrConfigBlock>) -> Self {
        Self {
            schema_blocks: schemas,
            config_blocks: configs,
            schemas: OnceLock::new(),
            configs: OnceLock::new(),
        }
    }

    /// Validate every block; run before the first reconciliation pass
    pub fn validate(&self) -> Result<()> {
        for block in &self.config_blocks {
            block.validate()?;
        }
        for block in &self.schema_blocks {
            block.validate()?;
        }
        Ok(())
    }

    /// First config whose cores contain `core`
    pub fn config_for_core(&self, core: &str) -> Option<&SolrConfig> {
        self.configs().iter().find(|config| config.governs(core))
    }

    /// First schema whose cores contain `core`
    pub fn schema_for_core(&self, core: &str) -> Option<&ManagedSchema> {
        self.schemas().iter().find(|schema| schema.governs(core))
    }

    pub fn configs(&self) -> &[SolrConfig] {
        self.configs
            .get_or_init(|| generate_configs(&self.config_blocks))
    }

    pub fn schemas(&self) -> &[ManagedSchema] {
        self.schemas
            .get_or_init(|| generate_schemas(&self.schema_blocks))
    }

    /// Every core named by a config or schema, in declaration order
    pub fn cores(&self) -> Vec<&str> {
        let mut cores: Vec<&str> = Vec::new();
        let declared = self
            .configs()
            .iter()
            .flat_map(|c| c.cores.iter())
            .chain(self.schemas().iter().flat_map(|s| s.cores.iter()));

        for core in declared {
            if !cores.contains(&core.as_str()) {
                cores.push(core);
            }
        }
        cores
    }
}

pub fn generate_configs(blocks: &[SolrConfigBlock]) -> Vec<SolrConfig> {
    log::debug!("Generating {} solr configs", blocks.len());
    blocks.iter().cloned().map(SolrConfig::from).collect()
}

pub fn generate_schemas(blocks: &[ManagedSchemaBlock]) -> Vec<ManagedSchema> {
    log::debug!("Generating {} managed schemas", blocks.len());
    blocks.iter().cloned().map(ManagedSchema::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_block(cores: &[&str], handlers: usize) -> SolrConfigBlock {
        let handlers: Vec<String> = (0..handlers)
            .map(|i| {
                format!("[[request_handlers]]\nname = \"/h{i}\"\nclass = \"solr.SearchHandler\"\n")
            })
            .collect();
        let text = format!(
            "cores = {:?}\n{}",
            cores,
            handlers.join("\n")
        );
        toml::from_str(&text).unwrap()
    }

    fn schema_block(cores: &[&str], unique_key: &str) -> ManagedSchemaBlock {
        toml::from_str(&format!(
            "cores = {cores:?}\nunique_key = \"{unique_key}\"\nfields = [{{ name = \"foo\", type = \"bar\" }}]"
        ))
        .unwrap()
    }

    #[test]
    fn test_config_for_core() {
        let store = ConfigurationStore::new(
            Vec::new(),
            vec![config_block(&["foo"], 1), config_block(&["bar", "baz"], 2)],
        );

        assert_eq!(store.config_for_core("foo").unwrap().request_handlers.len(), 1);
        assert_eq!(store.config_for_core("baz").unwrap().request_handlers.len(), 2);
    }

    #[test]
    fn test_first_match_wins() {
        let store = ConfigurationStore::new(
            vec![schema_block(&["foo", "bar"], "id"), schema_block(&["bar"], "uuid")],
            Vec::new(),
        );

        let schema = store.schema_for_core("bar").unwrap();
        assert_eq!(schema.unique_key.as_deref(), Some("id"));
        assert_eq!(schema.fields.len(), 1);
    }

    #[test]
    fn test_not_found() {
        let store = ConfigurationStore::new(Vec::new(), Vec::new());

        assert!(store.config_for_core("foo").is_none());
        assert!(store.schema_for_core("foo").is_none());

        let store = ConfigurationStore::new(Vec::new(), vec![config_block(&["bar"], 0)]);
        assert!(store.config_for_core("foo").is_none());
    }

    #[test]
    fn test_generation_is_memoized() {
        let store = ConfigurationStore::new(
            vec![schema_block(&["foo"], "id")],
            vec![config_block(&["foo"], 1)],
        );

        let first = store.config_for_core("foo").unwrap();
        let second = store.config_for_core("foo").unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(std::ptr::eq(store.schemas().as_ptr(), store.schemas().as_ptr()));
    }

    #[test]
    fn test_cores_are_deduplicated() {
        let store = ConfigurationStore::new(
            vec![schema_block(&["foo", "qux"], "id")],
            vec![config_block(&["foo", "bar"], 1)],
        );

        assert_eq!(store.cores(), ["foo", "bar", "qux"]);
    }

    #[test]
    fn test_validate() {
        let store = ConfigurationStore::new(Vec::new(), vec![config_block(&[], 1)]);
        assert!(store.validate().is_err());

        let store = ConfigurationStore::new(Vec::new(), vec![config_block(&["foo"], 1)]);
        assert!(store.validate().is_ok());
    }

    #[test]
    fn test_debug_output_names_blocks() {
        let store = ConfigurationStore::new(
            vec![schema_block(&["foo"], "id")],
            vec![config_block(&["foo"], 1)],
        );

        let debug = format!("{store:?}");
        assert!(debug.starts_with("ConfigurationStore"));
        assert!(debug.contains("/h0"));
    }
}
