//! Remote client contract
//!
//! The engine never speaks HTTP itself: it hands a [`Request`] to a
//! [`Transport`] and gets the decoded JSON body back.

use crate::Result;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A request relative to the server base URL
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Path below the base URL, e.g. `/demo/schema/fields`
    pub path: String,
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Request {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            params: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            params: Vec::new(),
            body: Some(body),
        }
    }

    /// Add a query parameter; a later value for the same name wins
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.params.retain(|(n, _)| *n != name);
        self.params.push((name, value.into()));
        self
    }
}

/// Executes requests against a Solr server
pub trait Transport {
    /// Send the request and return the JSON body, including error bodies
    fn execute(&self, request: &Request) -> Result<Value>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &Request) -> Result<Value> {
        (**self).execute(request)
    }
}
