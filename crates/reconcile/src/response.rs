//! Typed responses of the config and schema APIs

use crate::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResponseHeader {
    #[serde(default)]
    pub status: i64,
    #[serde(rename = "QTime", default)]
    pub qtime: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResponseError {
    #[serde(rename = "msg", default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub metadata: Vec<Value>,
    /// Per-command failures reported by bulk updates
    #[serde(default)]
    pub details: Vec<Value>,
}

impl ResponseError {
    fn into_error(self) -> Error {
        let mut message = self.message.unwrap_or_else(|| "unknown error".to_string());
        for detail in &self.details {
            if let Some(messages) = detail.get("errorMessages") {
                message.push_str(&format!("; {messages}"));
            }
        }
        Error::Remote {
            code: self.code,
            message,
        }
    }
}

/// Header and optional error every response carries
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CommandResponse {
    #[serde(rename = "responseHeader", default)]
    pub header: ResponseHeader,
    #[serde(default)]
    pub error: Option<ResponseError>,
}

impl CommandResponse {
    /// Turn an error payload into [`Error::Remote`]
    pub fn into_result(self) -> Result<Self> {
        match self.error {
            Some(error) => Err(error.into_error()),
            None => Ok(self),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigSection {
    #[serde(rename = "searchComponent", default)]
    pub search_components: BTreeMap<String, Value>,
    #[serde(rename = "requestHandler", default)]
    pub request_handlers: BTreeMap<String, Value>,
}

/// `GET /{core}/config/{component}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigResponse {
    #[serde(rename = "responseHeader", default)]
    pub header: ResponseHeader,
    #[serde(default)]
    pub config: ConfigSection,
}

/// Any schema entry identified by `name`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedEntry {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CopyFieldEntry {
    pub source: String,
    pub dest: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FieldsResponse {
    #[serde(default)]
    pub fields: Vec<NamedEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DynamicFieldsResponse {
    #[serde(rename = "dynamicFields", default)]
    pub dynamic_fields: Vec<NamedEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FieldTypesResponse {
    #[serde(rename = "fieldTypes", default)]
    pub field_types: Vec<NamedEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CopyFieldsResponse {
    #[serde(rename = "copyFields", default)]
    pub copy_fields: Vec<CopyFieldEntry>,
}

/// A decoded response; the variant is picked from the sub-path requested
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Config(ConfigResponse),
    Fields(FieldsResponse),
    DynamicFields(DynamicFieldsResponse),
    FieldTypes(FieldTypesResponse),
    CopyFields(CopyFieldsResponse),
    Command(CommandResponse),
}

impl Response {
    /// Decode a body fetched from `path`, failing with [`Error::Remote`]
    /// when it carries an error
    pub fn decode(path: &str, body: Value) -> Result<Self> {
        let status = CommandResponse::deserialize(&body)?.into_result()?;

        let response = match path.trim_matches('/') {
            "searchComponent" | "requestHandler" => {
                Self::Config(ConfigResponse::deserialize(body)?)
            }
            "fields" => Self::Fields(FieldsResponse::deserialize(body)?),
            "dynamicfields" => Self::DynamicFields(DynamicFieldsResponse::deserialize(body)?),
            "fieldtypes" => Self::FieldTypes(FieldTypesResponse::deserialize(body)?),
            "copyfields" => Self::CopyFields(CopyFieldsResponse::deserialize(body)?),
            _ => Self::Command(status),
        };
        Ok(response)
    }

    /// Name of the variant, used in shape mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "ConfigResponse",
            Self::Fields(_) => "FieldsResponse",
            Self::DynamicFields(_) => "DynamicFieldsResponse",
            Self::FieldTypes(_) => "FieldTypesResponse",
            Self::CopyFields(_) => "CopyFieldsResponse",
            Self::Command(_) => "CommandResponse",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_config() {
        let body = json!({
            "responseHeader": {"status": 0, "QTime": 1},
            "config": {"searchComponent": {
                "spellcheck": {"name": "spellcheck", "class": "solr.SpellCheckComponent"}
            }}
        });

        let Response::Config(response) = Response::decode("searchComponent", body).unwrap() else {
            panic!("expected config response");
        };
        assert_eq!(response.header.qtime, 1);
        assert!(response.config.search_components.contains_key("spellcheck"));
        assert!(response.config.request_handlers.is_empty());
    }

    #[test]
    fn test_decode_schema_listings() {
        let fields = Response::decode(
            "fields",
            json!({"fields": [{"name": "id", "type": "string", "stored": true}]}),
        )
        .unwrap();
        assert!(matches!(fields, Response::Fields(ref f) if f.fields[0].name == "id"));

        let copy_fields = Response::decode(
            "copyfields",
            json!({"copyFields": [{"source": "title", "dest": "text"}]}),
        )
        .unwrap();
        assert_eq!(copy_fields.kind(), "CopyFieldsResponse");
    }

    #[test]
    fn test_decode_error() {
        let body = json!({
            "responseHeader": {"status": 400, "QTime": 2},
            "error": {
                "msg": "error processing commands",
                "code": 400,
                "metadata": ["error-class", "org.apache.solr.api.ApiBag$ExceptionWithErrObject"],
                "details": [{"add-field": {"name": "id"}, "errorMessages": ["Field 'id' already exists."]}]
            }
        });

        let err = Response::decode("", body).unwrap_err();
        let Error::Remote { code, message } = err else {
            panic!("expected remote error");
        };
        assert_eq!(code, 400);
        assert!(message.starts_with("error processing commands"));
        assert!(message.contains("already exists"));
    }

    #[test]
    fn test_unknown_path_is_command_response() {
        let response =
            Response::decode("overlay", json!({"responseHeader": {"status": 0}})).unwrap();
        assert_eq!(response.kind(), "CommandResponse");
    }
}
