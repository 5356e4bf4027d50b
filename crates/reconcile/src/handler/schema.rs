//! Handlers for the schema API

use super::{ConfigNodeHandler, expect_iterable, fetch, stage, stage_by_name, unexpected_response};
use crate::command::Command;
use crate::manager::SolrApiManager;
use crate::node::{ConfigNode, Entity, EntityType};
use crate::response::Response;
use crate::{Error, Result};
use std::collections::HashSet;

/// Field types run before fields, which refer to them by name
pub const FIELD_TYPE_PRIORITY: i32 = 10;

/// Copy fields run after the fields they connect
pub const COPY_FIELD_PRIORITY: i32 = 60;

pub struct FieldTypeHandler;

impl ConfigNodeHandler for FieldTypeHandler {
    fn name(&self) -> &'static str {
        EntityType::FieldType.name()
    }

    fn supports(&self, node: &ConfigNode) -> bool {
        node.entity_type() == EntityType::FieldType
    }

    fn handle(&self, node: &ConfigNode, manager: &mut dyn SolrApiManager) -> Result<()> {
        let node = expect_iterable(node)?;
        let response = fetch(manager, node.path())?;
        let Response::FieldTypes(current) = &response else {
            return Err(unexpected_response("FieldTypesResponse", &response));
        };

        let names: HashSet<&str> = current.field_types.iter().map(|t| t.name.as_str()).collect();
        stage_by_name(node, &names, manager)
    }

    fn priority(&self) -> i32 {
        FIELD_TYPE_PRIORITY
    }
}

pub struct FieldHandler;

impl ConfigNodeHandler for FieldHandler {
    fn name(&self) -> &'static str {
        EntityType::Field.name()
    }

    fn supports(&self, node: &ConfigNode) -> bool {
        node.entity_type() == EntityType::Field
    }

    fn handle(&self, node: &ConfigNode, manager: &mut dyn SolrApiManager) -> Result<()> {
        let node = expect_iterable(node)?;
        let response = fetch(manager, node.path())?;
        let Response::Fields(current) = &response else {
            return Err(unexpected_response("FieldsResponse", &response));
        };

        let names: HashSet<&str> = current.fields.iter().map(|f| f.name.as_str()).collect();
        stage_by_name(node, &names, manager)
    }
}

pub struct DynamicFieldHandler;

impl ConfigNodeHandler for DynamicFieldHandler {
    fn name(&self) -> &'static str {
        EntityType::DynamicField.name()
    }

    fn supports(&self, node: &ConfigNode) -> bool {
        node.entity_type() == EntityType::DynamicField
    }

    fn handle(&self, node: &ConfigNode, manager: &mut dyn SolrApiManager) -> Result<()> {
        let node = expect_iterable(node)?;
        let response = fetch(manager, node.path())?;
        let Response::DynamicFields(current) = &response else {
            return Err(unexpected_response("DynamicFieldsResponse", &response));
        };

        let names: HashSet<&str> = current
            .dynamic_fields
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        stage_by_name(node, &names, manager)
    }
}

/// Copy fields have no name and no update command: a declared copy field is
/// added when no current copy field has the same source and destination,
/// otherwise nothing is sent.
pub struct CopyFieldHandler;

impl ConfigNodeHandler for CopyFieldHandler {
    fn name(&self) -> &'static str {
        EntityType::CopyField.name()
    }

    fn supports(&self, node: &ConfigNode) -> bool {
        node.entity_type() == EntityType::CopyField
    }

    fn handle(&self, node: &ConfigNode, manager: &mut dyn SolrApiManager) -> Result<()> {
        let node = expect_iterable(node)?;
        let response = fetch(manager, node.path())?;
        let Response::CopyFields(current) = &response else {
            return Err(unexpected_response("CopyFieldsResponse", &response));
        };

        let existing: HashSet<(&str, &str)> = current
            .copy_fields
            .iter()
            .map(|c| (c.source.as_str(), c.dest.as_str()))
            .collect();

        for entity in node.entities() {
            let Entity::CopyField(copy_field) = entity else {
                return Err(Error::ShapeMismatch {
                    expected: "CopyField",
                    found: entity.entity_type().name(),
                });
            };
            if existing.contains(&(copy_field.source.as_str(), copy_field.dest.as_str())) {
                log::debug!(
                    "Copy field {} -> {} already present",
                    copy_field.source,
                    copy_field.dest
                );
                continue;
            }
            stage(
                manager,
                Command::AddCopyField,
                EntityType::CopyField,
                copy_field.to_payload()?,
            )?;
        }
        Ok(())
    }

    fn priority(&self) -> i32 {
        COPY_FIELD_PRIORITY
    }
}
