//! HTTP transport over `ureq`

use crate::config::EndpointConfig;
use reconcile::{Error, LogCallback, Method, Request, RetryConfig, Transport, with_retry};
use serde_json::Value;

/// Blocking HTTP transport
///
/// Reads are retried on transient failures. Command submissions are sent
/// once: a POST that timed out may already have been applied, and sending
/// the batch again would fail on the entities it created.
pub struct HttpTransport {
    agent: ureq::Agent,
    base_url: String,
    retry: RetryConfig,
}

impl HttpTransport {
    pub fn new(endpoint: &EndpointConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(endpoint.timeout()))
            // Solr reports failures as JSON bodies; keep them readable
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: endpoint.url.trim_end_matches('/').to_string(),
            retry: endpoint.retry_config(),
        }
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn send(&self, request: &Request) -> reconcile::Result<Value> {
        let url = self.url(&request.path);
        log::trace!("{:?} {url}", request.method);

        let result = match request.method {
            Method::Get => {
                let mut builder = self.agent.get(&url);
                for (name, value) in &request.params {
                    builder = builder.query(name, value);
                }
                builder.call()
            }
            Method::Post => {
                let mut builder = self.agent.post(&url);
                for (name, value) in &request.params {
                    builder = builder.query(name, value);
                }
                match &request.body {
                    Some(body) => builder.send_json(body),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(classify)?;
        let status = response.status();
        response.body_mut().read_json::<Value>().map_err(|e| {
            let message = format!("HTTP {status} from {url}: {e}");
            if status.is_server_error() {
                Error::transient(message)
            } else {
                Error::permanent(message)
            }
        })
    }
}

impl HttpTransport {
    fn attempt<F>(&self, method: Method, mut op: F) -> reconcile::Result<Value>
    where
        F: FnMut() -> reconcile::Result<Value>,
    {
        match method {
            Method::Get => with_retry(&self.retry, Some(&LogCallback), op),
            Method::Post => op(),
        }
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &Request) -> reconcile::Result<Value> {
        self.attempt(request.method, || self.send(request))
    }
}

/// Connection-level failures are worth retrying; the rest are not
fn classify(err: ureq::Error) -> Error {
    match err {
        ureq::Error::Timeout(_)
        | ureq::Error::Io(_)
        | ureq::Error::ConnectionFailed
        | ureq::Error::HostNotFound => Error::transient(err.to_string()),
        other => Error::permanent(other.to_string()),
    }
}
