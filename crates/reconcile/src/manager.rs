//! Reconciliation manager
//!
//! Handlers read current state and stage commands through
//! [`SolrApiManager`]; the manager owns the staged [`CommandCollection`] and
//! submits it in one request.

use crate::collection::CommandCollection;
use crate::command::{Api, Command};
use crate::response::{CommandResponse, Response};
use crate::transport::{Request, Transport};
use crate::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

pub trait SolrApiManager {
    /// API this manager submits to
    fn api(&self) -> Api;

    /// Read the current state at a sub-path of the API
    fn call(&mut self, path: &str) -> Result<Response>;

    /// Stage a command
    fn add_command(&mut self, command: Command, payload: Value) -> Result<()>;

    /// Commands staged so far
    fn commands(&self) -> &CommandCollection;

    /// Submit the staged commands and clear them; returns how many payloads
    /// were sent
    fn persist(&mut self) -> Result<usize>;

    /// Drop staged commands without submitting them
    fn flush(&mut self);
}

/// [`SolrApiManager`] bound to one core and one API
pub struct ApiManager<T: Transport> {
    transport: T,
    api: Api,
    core: String,
    commands: CommandCollection,
}

impl<T: Transport> ApiManager<T> {
    pub fn new(transport: T, api: Api, core: impl Into<String>) -> Self {
        Self {
            transport,
            api,
            core: core.into(),
            commands: CommandCollection::new(),
        }
    }

    pub fn core(&self) -> &str {
        &self.core
    }

    fn url_path(&self, sub_path: &str) -> String {
        let base = self.api.path(&self.core);
        let sub_path = sub_path.trim_matches('/');
        if sub_path.is_empty() {
            base
        } else {
            format!("{base}/{sub_path}")
        }
    }
}

impl<T: Transport> SolrApiManager for ApiManager<T> {
    fn api(&self) -> Api {
        self.api
    }

    fn call(&mut self, path: &str) -> Result<Response> {
        let request = Request::get(self.url_path(path)).param("wt", "json");
        log::debug!("Fetching {}", request.path);

        let body = self.transport.execute(&request)?;
        Response::decode(path, body)
    }

    fn add_command(&mut self, command: Command, payload: Value) -> Result<()> {
        if command.api() != self.api {
            return Err(Error::UnsupportedCommand {
                command: command.name().to_string(),
                api: self.api.name(),
            });
        }

        log::debug!("Staging {command} for {}", self.core);
        self.commands.add(command.name(), payload);
        Ok(())
    }

    fn commands(&self) -> &CommandCollection {
        &self.commands
    }

    fn persist(&mut self) -> Result<usize> {
        if self.commands.is_empty() {
            log::debug!("Nothing to submit for {}", self.core);
            return Ok(0);
        }

        let commands = self.commands.drain();
        let count = commands.payload_count();
        let body = serde_json::to_value(&commands)?;

        let request = Request::post(self.url_path(""), body).param("wt", "json");
        let response = self.transport.execute(&request)?;
        CommandResponse::deserialize(&response)?.into_result()?;

        log::info!(
            "Submitted {count} {} command(s) to {}",
            self.api,
            self.core
        );
        Ok(count)
    }

    fn flush(&mut self) {
        self.commands.clear();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::transport::Method;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Transport answering from canned bodies keyed by path
    #[derive(Default)]
    pub(crate) struct MockTransport {
        pub responses: HashMap<String, Value>,
        pub requests: RefCell<Vec<Request>>,
    }

    impl MockTransport {
        pub fn with(mut self, path: &str, body: Value) -> Self {
            self.responses.insert(path.to_string(), body);
            self
        }
    }

    impl Transport for MockTransport {
        fn execute(&self, request: &Request) -> Result<Value> {
            self.requests.borrow_mut().push(request.clone());
            self.responses
                .get(&request.path)
                .cloned()
                .ok_or_else(|| Error::permanent(format!("no route for {}", request.path)))
        }
    }

    #[test]
    fn test_call_decodes_by_sub_path() {
        let transport = MockTransport::default().with(
            "/demo/schema/fields",
            json!({"responseHeader": {"status": 0}, "fields": [{"name": "id"}]}),
        );
        let mut manager = ApiManager::new(&transport, Api::Schema, "demo");

        let response = manager.call("fields").unwrap();
        assert_eq!(response.kind(), "FieldsResponse");

        let requests = transport.requests.borrow();
        assert_eq!(requests[0].method, Method::Get);
        assert_eq!(requests[0].params, [("wt".to_string(), "json".to_string())]);
    }

    #[test]
    fn test_rejects_command_for_other_api() {
        let transport = MockTransport::default();
        let mut manager = ApiManager::new(&transport, Api::Config, "demo");

        let err = manager
            .add_command(Command::AddField, json!({"name": "title"}))
            .unwrap_err();

        assert!(matches!(err, Error::UnsupportedCommand { api: "config", .. }));
        assert!(manager.commands().is_empty());
    }

    #[test]
    fn test_persist_posts_collection() {
        let transport = MockTransport::default()
            .with("/demo/schema", json!({"responseHeader": {"status": 0, "QTime": 5}}));
        let mut manager = ApiManager::new(&transport, Api::Schema, "demo");

        manager.add_command(Command::AddField, json!({"name": "a"})).unwrap();
        manager.add_command(Command::AddField, json!({"name": "b"})).unwrap();
        manager
            .add_command(Command::AddCopyField, json!({"source": "a", "dest": "b"}))
            .unwrap();

        assert_eq!(manager.persist().unwrap(), 3);
        assert!(manager.commands().is_empty());

        let requests = transport.requests.borrow();
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(
            requests[0].body,
            Some(json!({
                "add-field": [{"name": "a"}, {"name": "b"}],
                "add-copy-field": [{"source": "a", "dest": "b"}]
            }))
        );
    }

    #[test]
    fn test_persist_empty_is_noop() {
        let transport = MockTransport::default();
        let mut manager = ApiManager::new(&transport, Api::Config, "demo");

        assert_eq!(manager.persist().unwrap(), 0);
        assert!(transport.requests.borrow().is_empty());
    }

    #[test]
    fn test_persist_surfaces_remote_error() {
        let transport = MockTransport::default().with(
            "/demo/config",
            json!({
                "responseHeader": {"status": 400},
                "error": {"msg": "no such class", "code": 400}
            }),
        );
        let mut manager = ApiManager::new(&transport, Api::Config, "demo");
        manager
            .add_command(Command::AddSearchComponent, json!({"name": "x", "class": "y"}))
            .unwrap();

        let err = manager.persist().unwrap_err();
        assert!(matches!(err, Error::Remote { code: 400, .. }));
    }

    #[test]
    fn test_flush() {
        let transport = MockTransport::default();
        let mut manager = ApiManager::new(&transport, Api::Config, "demo");
        manager
            .add_command(Command::SetProperty, json!({"query.filterCache.size": 512}))
            .unwrap();

        manager.flush();
        assert!(manager.commands().is_empty());
    }
}
