//! Merge fetched rows into the denormalized action catalog.

use crate::fetch::{ParameterRow, SourceRows, ToolRow};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Compiled actions keyed by public identifier, in tool `rowId` order.
pub type ActionMap = IndexMap<String, CompiledAction>;

// ---------------------------------------------------------------------------
// Output model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub generated_at: String,
    pub locale: String,
    pub fallback_locale: Option<String>,
    pub source_database: String,
    pub action_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledDocument {
    pub metadata: Metadata,
    pub actions: ActionMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledAction {
    pub row_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub tool_type: String,
    pub source_action_provider: Value,
    pub source_container_id: Value,
    pub attribution_container_id: Value,
    pub flags: Option<i64>,
    pub visibility_flags: Option<i64>,
    pub authentication_policy: Value,
    pub deprecation_replacement_id: Value,
    #[serde(serialize_with = "crate::blob::serialize")]
    pub requirements: Option<Vec<u8>>,
    #[serde(serialize_with = "crate::blob::serialize")]
    pub output_type_instance: Option<Vec<u8>>,
    #[serde(serialize_with = "crate::blob::serialize")]
    pub custom_icon: Option<Vec<u8>>,
    pub arguments: Vec<CompiledArgument>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledArgument {
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub sort_order: Option<i64>,
    pub flags: Option<i64>,
    #[serde(serialize_with = "crate::blob::serialize")]
    pub relationships: Option<Vec<u8>>,
    #[serde(serialize_with = "crate::blob::serialize")]
    pub type_instance: Option<Vec<u8>>,
    #[serde(rename = "type")]
    pub value_type: ArgumentType,
}

/// Type columns of an argument. All null when the parameter has no type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentType {
    pub row_id: Option<i64>,
    pub kind: Value,
    pub runtime_flags: Value,
    #[serde(serialize_with = "crate::blob::serialize")]
    pub runtime_requirements: Option<Vec<u8>>,
    #[serde(serialize_with = "crate::blob::serialize")]
    pub encoded_id: Option<Vec<u8>>,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Build one record per tool, keyed by the tool's public identifier.
///
/// Entries keep the fetch order of the tools. A repeated identifier keeps its
/// first position and takes the later tool's record.
///
/// Never fails: missing localizations fall back to raw identifiers, missing
/// types produce null type fields, and tools without parameters get an
/// empty argument list.
pub fn build_actions(rows: &SourceRows) -> ActionMap {
    let mut arguments_by_tool: HashMap<i64, Vec<CompiledArgument>> = HashMap::new();
    for param in &rows.parameters {
        arguments_by_tool
            .entry(param.tool_id)
            .or_default()
            .push(build_argument(rows, param));
    }

    rows.tools
        .iter()
        .map(|tool| {
            let arguments = arguments_by_tool.remove(&tool.row_id).unwrap_or_default();
            (tool.id.clone(), build_action(rows, tool, arguments))
        })
        .collect()
}

fn build_argument(rows: &SourceRows, param: &ParameterRow) -> CompiledArgument {
    let localized = rows
        .parameter_localizations
        .get(&(param.tool_id, param.key.clone()));

    CompiledArgument {
        key: param.key.clone(),
        name: display_name(localized.and_then(|l| l.name.as_deref()), &param.key),
        description: localized.and_then(|l| l.description.clone()),
        sort_order: param.sort_order,
        flags: param.flags,
        relationships: param.relationships.clone(),
        type_instance: param.type_instance.clone(),
        value_type: ArgumentType {
            row_id: param.type_id,
            kind: param.type_kind.clone(),
            runtime_flags: param.type_runtime_flags.clone(),
            runtime_requirements: param.type_runtime_requirements.clone(),
            encoded_id: param.type_identifier.clone(),
        },
    }
}

fn build_action(
    rows: &SourceRows,
    tool: &ToolRow,
    arguments: Vec<CompiledArgument>,
) -> CompiledAction {
    let localized = rows.tool_localizations.get(&tool.row_id);

    CompiledAction {
        row_id: tool.row_id,
        name: display_name(localized.and_then(|l| l.name.as_deref()), &tool.id),
        description: localized.and_then(|l| l.description_summary.clone()),
        tool_type: tool.tool_type.clone(),
        source_action_provider: tool.source_action_provider.clone(),
        source_container_id: tool.source_container_id.clone(),
        attribution_container_id: tool.attribution_container_id.clone(),
        flags: tool.flags,
        visibility_flags: tool.visibility_flags,
        authentication_policy: tool.authentication_policy.clone(),
        deprecation_replacement_id: tool.deprecation_replacement_id.clone(),
        requirements: tool.requirements.clone(),
        output_type_instance: tool.output_type_instance.clone(),
        custom_icon: tool.custom_icon.clone(),
        arguments,
    }
}

// Empty localized names count as missing.
fn display_name(localized: Option<&str>, raw: &str) -> String {
    match localized {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => raw.to_string(),
    }
}
