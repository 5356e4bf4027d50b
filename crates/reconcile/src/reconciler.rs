//! One reconciliation pass: run the handler chain, then submit

use crate::Result;
use crate::collection::CommandCollection;
use crate::command::Api;
use crate::handler::HandlerChain;
use crate::manager::SolrApiManager;
use crate::node::ConfigNode;

/// Outcome of a pass
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileReport {
    pub api: Api,
    /// Commands the pass staged, in submission order
    pub commands: CommandCollection,
    /// Payloads sent to the server (0 on a dry run)
    pub submitted: usize,
    pub dry_run: bool,
}

impl ReconcileReport {
    /// True when declared and current state already agree
    pub fn is_converged(&self) -> bool {
        self.commands.is_empty()
    }
}

pub struct Reconciler {
    chain: HandlerChain,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(HandlerChain::with_default_handlers())
    }
}

impl Reconciler {
    pub fn new(chain: HandlerChain) -> Self {
        Self { chain }
    }

    pub fn chain(&self) -> &HandlerChain {
        &self.chain
    }

    /// Run every handler over the descriptors belonging to the manager's
    /// API and submit the staged commands.
    ///
    /// The first handler error aborts the pass; staged commands are
    /// dropped and nothing is submitted. A dry run reports the staged
    /// commands without submitting them.
    pub fn reconcile(
        &self,
        nodes: &[ConfigNode],
        manager: &mut dyn SolrApiManager,
        dry_run: bool,
    ) -> Result<ReconcileReport> {
        let api = manager.api();
        let nodes: Vec<ConfigNode> = nodes
            .iter()
            .filter(|node| node.entity_type().api() == api)
            .cloned()
            .collect();

        if let Err(e) = self.chain.run(&nodes, manager) {
            manager.flush();
            return Err(e);
        }

        let commands = manager.commands().clone();
        let submitted = if dry_run {
            manager.flush();
            0
        } else {
            manager.persist()?
        };

        Ok(ReconcileReport {
            api,
            commands,
            submitted,
            dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::mock::MockManager;
    use crate::model::{Field, SearchComponent};
    use crate::node::{Entity, EntityType, IterableConfigNode};
    use crate::response::{ConfigResponse, FieldsResponse, NamedEntry, Response};

    fn nodes() -> Vec<ConfigNode> {
        vec![
            ConfigNode::Iterable(IterableConfigNode::new(
                EntityType::SearchComponent,
                vec![Entity::SearchComponent(SearchComponent::new(
                    "spellcheck",
                    "solr.SpellCheckComponent",
                ))],
            )),
            ConfigNode::Iterable(IterableConfigNode::new(
                EntityType::Field,
                vec![
                    Entity::Field(Field::new("id", "string")),
                    Entity::Field(Field::new("title", "text_general")),
                ],
            )),
        ]
    }

    fn schema_manager() -> MockManager {
        MockManager::new(Api::Schema).with(
            "fields",
            Response::Fields(FieldsResponse {
                fields: vec![NamedEntry { name: "id".into() }],
            }),
        )
    }

    #[test]
    fn test_only_nodes_of_manager_api_run() {
        let mut manager = schema_manager();

        let report = Reconciler::default()
            .reconcile(&nodes(), &mut manager, false)
            .unwrap();

        assert_eq!(manager.calls, ["fields"]);
        assert_eq!(report.submitted, 2);
        assert!(report.commands.contains("replace-field"));
        assert!(report.commands.contains("add-field"));
        assert!(!report.is_converged());
    }

    #[test]
    fn test_dry_run_submits_nothing() {
        let mut manager = schema_manager();

        let report = Reconciler::default()
            .reconcile(&nodes(), &mut manager, true)
            .unwrap();

        assert!(report.dry_run);
        assert_eq!(report.submitted, 0);
        assert_eq!(report.commands.payload_count(), 2);
        assert_eq!(manager.persisted, 0);
        assert!(manager.commands.is_empty());
    }

    #[test]
    fn test_failure_drops_staged_commands() {
        // field types succeed and stage, fields cannot be read
        let mut manager = MockManager::new(Api::Schema).with(
            "fieldtypes",
            Response::FieldTypes(Default::default()),
        );
        let nodes = vec![
            ConfigNode::Iterable(IterableConfigNode::new(
                EntityType::FieldType,
                vec![Entity::FieldType(crate::model::FieldType::new(
                    "text",
                    "solr.TextField",
                ))],
            )),
            ConfigNode::Iterable(IterableConfigNode::new(
                EntityType::Field,
                vec![Entity::Field(Field::new("title", "text"))],
            )),
        ];

        let err = Reconciler::default()
            .reconcile(&nodes, &mut manager, false)
            .unwrap_err();

        assert!(err.to_string().contains("sub path fields"));
        assert_eq!(manager.persisted, 0);
        assert!(manager.commands.is_empty());
    }

    #[test]
    fn test_converged_when_nothing_declared() {
        let mut manager = MockManager::new(Api::Config)
            .with("searchComponent", Response::Config(ConfigResponse::default()));

        let report = Reconciler::default()
            .reconcile(&[], &mut manager, false)
            .unwrap();

        assert!(report.is_converged());
        assert!(manager.calls.is_empty());
    }
}
