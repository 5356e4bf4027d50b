//! Core admin actions (`/admin/cores?action=...`)

use crate::Result;
use crate::response::{CommandResponse, ResponseHeader};
use crate::transport::{Request, Transport};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Path of the core admin handler
pub const CORES_HANDLER: &str = "/admin/cores";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreAction {
    Status,
    Create,
    Reload,
    Unload,
    Rename,
    Swap,
    Split,
    MergeIndexes,
}

impl CoreAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Status => "STATUS",
            Self::Create => "CREATE",
            Self::Reload => "RELOAD",
            Self::Unload => "UNLOAD",
            Self::Rename => "RENAME",
            Self::Swap => "SWAP",
            Self::Split => "SPLIT",
            Self::MergeIndexes => "MERGEINDEXES",
        }
    }
}

impl fmt::Display for CoreAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IndexStatus {
    pub num_docs: u64,
    pub max_doc: u64,
    pub deleted_docs: u64,
    pub version: u64,
    pub segment_count: u64,
    pub current: bool,
    pub has_deletions: bool,
    pub directory: Option<String>,
    pub last_modified: Option<String>,
    pub size_in_bytes: u64,
    pub size: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoreStatus {
    pub name: String,
    pub instance_dir: Option<String>,
    pub data_dir: Option<String>,
    pub config: Option<String>,
    pub schema: Option<String>,
    pub start_time: Option<String>,
    /// Milliseconds since the core was loaded
    pub uptime: Option<u64>,
    pub index: Option<IndexStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatusResponse {
    #[serde(rename = "responseHeader")]
    pub header: ResponseHeader,
    pub status: BTreeMap<String, CoreStatus>,
    #[serde(rename = "initFailures")]
    pub init_failures: BTreeMap<String, Value>,
}

/// Issues core admin actions against the `cores` handler
pub struct CoreAdmin<T: Transport> {
    transport: T,
}

impl<T: Transport> CoreAdmin<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Status of one core, or of every core when `core` is `None`
    pub fn status(&self, core: Option<&str>) -> Result<StatusResponse> {
        let options: Vec<(&str, &str)> = core.map(|c| ("core", c)).into_iter().collect();
        let body = self.send(CoreAction::Status, &options)?;
        CommandResponse::deserialize(&body)?.into_result()?;
        Ok(StatusResponse::deserialize(body)?)
    }

    pub fn create(&self, core: &str, options: &[(&str, &str)]) -> Result<CommandResponse> {
        let mut params = vec![("name", core)];
        params.extend_from_slice(options);
        self.execute(CoreAction::Create, &params)
    }

    pub fn reload(&self, core: &str) -> Result<CommandResponse> {
        self.execute(CoreAction::Reload, &[("core", core)])
    }

    pub fn unload(&self, core: &str, options: &[(&str, &str)]) -> Result<CommandResponse> {
        let mut params = vec![("core", core)];
        params.extend_from_slice(options);
        self.execute(CoreAction::Unload, &params)
    }

    pub fn rename(&self, core: &str, other: &str) -> Result<CommandResponse> {
        self.execute(CoreAction::Rename, &[("core", core), ("other", other)])
    }

    pub fn swap(&self, core: &str, other: &str) -> Result<CommandResponse> {
        self.execute(CoreAction::Swap, &[("core", core), ("other", other)])
    }

    pub fn split(&self, core: &str, options: &[(&str, &str)]) -> Result<CommandResponse> {
        let mut params = vec![("core", core)];
        params.extend_from_slice(options);
        self.execute(CoreAction::Split, &params)
    }

    pub fn merge_indexes(&self, core: &str, options: &[(&str, &str)]) -> Result<CommandResponse> {
        let mut params = vec![("core", core)];
        params.extend_from_slice(options);
        self.execute(CoreAction::MergeIndexes, &params)
    }

    /// Run any action; `options` cannot override `action`
    pub fn execute(&self, action: CoreAction, options: &[(&str, &str)]) -> Result<CommandResponse> {
        let body = self.send(action, options)?;
        CommandResponse::deserialize(&body)?.into_result()
    }

    fn send(&self, action: CoreAction, options: &[(&str, &str)]) -> Result<Value> {
        let request = options
            .iter()
            .fold(Request::get(CORES_HANDLER), |request, (name, value)| {
                request.param(*name, *value)
            })
            .param("action", action.as_str())
            .param("wt", "json");

        log::debug!("Core admin {action}");
        self.transport.execute(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::json;
    use std::cell::RefCell;

    struct Canned {
        body: Value,
        requests: RefCell<Vec<Request>>,
    }

    impl Canned {
        fn new(body: Value) -> Self {
            Self {
                body,
                requests: RefCell::new(Vec::new()),
            }
        }

        fn param(&self, name: &str) -> Option<String> {
            self.requests.borrow()[0]
                .params
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone())
        }
    }

    impl Transport for Canned {
        fn execute(&self, request: &Request) -> Result<Value> {
            self.requests.borrow_mut().push(request.clone());
            Ok(self.body.clone())
        }
    }

    #[test]
    fn test_status() {
        let transport = Canned::new(json!({
            "responseHeader": {"status": 0, "QTime": 3},
            "initFailures": {},
            "status": {
                "demo": {
                    "name": "demo",
                    "instanceDir": "/var/solr/data/demo",
                    "uptime": 12345,
                    "index": {"numDocs": 42, "maxDoc": 44, "deletedDocs": 2, "hasDeletions": true, "size": "1.2 MB"}
                }
            }
        }));
        let admin = CoreAdmin::new(&transport);

        let status = admin.status(Some("demo")).unwrap();
        let demo = &status.status["demo"];
        assert_eq!(demo.uptime, Some(12345));
        let index = demo.index.as_ref().unwrap();
        assert_eq!(index.num_docs, 42);
        assert!(index.has_deletions);

        assert_eq!(transport.param("action").as_deref(), Some("STATUS"));
        assert_eq!(transport.param("core").as_deref(), Some("demo"));
        assert_eq!(transport.requests.borrow()[0].path, CORES_HANDLER);
    }

    #[test]
    fn test_action_cannot_be_overridden() {
        let transport = Canned::new(json!({"responseHeader": {"status": 0}}));
        let admin = CoreAdmin::new(&transport);

        admin
            .create("demo", &[("action", "UNLOAD"), ("configSet", "_default")])
            .unwrap();

        assert_eq!(transport.param("action").as_deref(), Some("CREATE"));
        assert_eq!(transport.param("name").as_deref(), Some("demo"));
        assert_eq!(transport.param("configSet").as_deref(), Some("_default"));
    }

    #[test]
    fn test_swap_and_rename_params() {
        let transport = Canned::new(json!({"responseHeader": {"status": 0}}));
        let admin = CoreAdmin::new(&transport);

        admin.swap("live", "staging").unwrap();
        assert_eq!(transport.param("other").as_deref(), Some("staging"));
        assert_eq!(transport.param("action").as_deref(), Some("SWAP"));
    }

    #[test]
    fn test_error_body() {
        let transport = Canned::new(json!({
            "responseHeader": {"status": 400},
            "error": {"msg": "Core with name 'demo' already exists.", "code": 400}
        }));
        let admin = CoreAdmin::new(&transport);

        let err = admin.create("demo", &[]).unwrap_err();
        assert!(matches!(err, Error::Remote { code: 400, .. }));
    }

    #[test]
    fn test_action_names() {
        assert_eq!(CoreAction::MergeIndexes.to_string(), "MERGEINDEXES");
        assert_eq!(CoreAction::Reload.as_str(), "RELOAD");
    }
}
