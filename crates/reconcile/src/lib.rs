//! # Reconcile
//!
//! Declarative Solr config and schema management.
//!
//! Declared entities are compared with the live state of a core and the
//! difference is staged as config/schema API commands, then submitted in
//! one batch.
//!
//! ## Core Concepts
//!
//! - **ConfigurationStore**: declared configs and schemas indexed by core
//! - **ConfigNode**: descriptor pairing an entity type and its sub-path with
//!   the declared entities of that type
//! - **ConfigNodeHandler**: diffs one entity type by name and stages ADD or
//!   UPDATE commands
//! - **HandlerChain**: runs handlers in ascending priority, failing fast
//! - **SolrApiManager**: reads current state, owns the [`CommandCollection`]
//!   and submits it
//!
//! ## Example
//!
//! ```ignore
//! use reconcile::{Api, ApiManager, ConfigurationStore, Reconciler, node};
//!
//! let store = ConfigurationStore::new(schemas, configs);
//! store.validate()?;
//!
//! let schema = store.schema_for_core("demo").expect("declared");
//! let mut manager = ApiManager::new(&transport, Api::Schema, "demo");
//! let report = Reconciler::default().reconcile(&node::schema_nodes(schema), &mut manager, false)?;
//! println!("submitted {} commands", report.submitted);
//! ```
//!
//! The transport is injected through the [`Transport`] trait, so the crate
//! has no dependency on an HTTP client.

pub mod collection;
pub mod command;
pub mod core_admin;
pub mod error;
pub mod handler;
pub mod manager;
pub mod model;
pub mod node;
pub mod reconciler;
pub mod response;
pub mod retry;
pub mod store;
pub mod transport;

pub use collection::CommandCollection;
pub use command::{Api, Command};
pub use core_admin::{CoreAction, CoreAdmin, CoreStatus, IndexStatus, StatusResponse};
pub use error::{Error, Result};
pub use handler::{ConfigNodeHandler, DEFAULT_PRIORITY, HandlerChain};
pub use manager::{ApiManager, SolrApiManager};
pub use model::{ManagedSchema, ManagedSchemaBlock, SolrConfig, SolrConfigBlock};
pub use node::{ConfigNode, Entity, EntityType, IterableConfigNode, ValueConfigNode};
pub use reconciler::{ReconcileReport, Reconciler};
pub use response::Response;
pub use retry::{LogCallback, RetryCallback, RetryConfig, with_retry};
pub use store::ConfigurationStore;
pub use transport::{Method, Request, Transport};
