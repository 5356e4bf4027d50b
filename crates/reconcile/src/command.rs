//! Command vocabulary of the config and schema APIs

use crate::node::EntityType;
use std::fmt;

/// Remote API a command is submitted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Api {
    Config,
    Schema,
}

impl Api {
    pub fn name(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Schema => "schema",
        }
    }

    /// Base path of this API for a core, e.g. `/demo/schema`
    pub fn path(self, core: &str) -> String {
        format!("/{core}/{}", self.name())
    }
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A mutation understood by the remote server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    AddSearchComponent,
    UpdateSearchComponent,
    AddRequestHandler,
    UpdateRequestHandler,
    SetProperty,
    AddField,
    ReplaceField,
    AddDynamicField,
    ReplaceDynamicField,
    AddFieldType,
    ReplaceFieldType,
    AddCopyField,
}

impl Command {
    /// Wire name of the command
    pub fn name(self) -> &'static str {
        match self {
            Self::AddSearchComponent => "add-searchcomponent",
            Self::UpdateSearchComponent => "update-searchcomponent",
            Self::AddRequestHandler => "add-requesthandler",
            Self::UpdateRequestHandler => "update-requesthandler",
            Self::SetProperty => "set-property",
            Self::AddField => "add-field",
            Self::ReplaceField => "replace-field",
            Self::AddDynamicField => "add-dynamic-field",
            Self::ReplaceDynamicField => "replace-dynamic-field",
            Self::AddFieldType => "add-field-type",
            Self::ReplaceFieldType => "replace-field-type",
            Self::AddCopyField => "add-copy-field",
        }
    }

    pub fn api(self) -> Api {
        match self {
            Self::AddSearchComponent
            | Self::UpdateSearchComponent
            | Self::AddRequestHandler
            | Self::UpdateRequestHandler
            | Self::SetProperty => Api::Config,
            Self::AddField
            | Self::ReplaceField
            | Self::AddDynamicField
            | Self::ReplaceDynamicField
            | Self::AddFieldType
            | Self::ReplaceFieldType
            | Self::AddCopyField => Api::Schema,
        }
    }

    /// Command that converges a named entity: ADD when no current entity
    /// carries the name, UPDATE otherwise.
    ///
    /// Returns `None` when there is nothing to send (an existing copy field)
    /// or the type is not a named entity.
    pub fn for_entity(entity_type: EntityType, exists: bool) -> Option<Self> {
        let command = match (entity_type, exists) {
            (EntityType::SearchComponent, false) => Self::AddSearchComponent,
            (EntityType::SearchComponent, true) => Self::UpdateSearchComponent,
            (EntityType::RequestHandler, false) => Self::AddRequestHandler,
            (EntityType::RequestHandler, true) => Self::UpdateRequestHandler,
            (EntityType::Field, false) => Self::AddField,
            (EntityType::Field, true) => Self::ReplaceField,
            (EntityType::DynamicField, false) => Self::AddDynamicField,
            (EntityType::DynamicField, true) => Self::ReplaceDynamicField,
            (EntityType::FieldType, false) => Self::AddFieldType,
            (EntityType::FieldType, true) => Self::ReplaceFieldType,
            (EntityType::CopyField, false) => Self::AddCopyField,
            (EntityType::CopyField, true)
            | (
                EntityType::Query | EntityType::UpdateHandler | EntityType::RequestDispatcher,
                _,
            ) => {
                return None;
            }
        };
        Some(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
