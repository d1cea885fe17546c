//! Read-only row fetching from the raw action export.
//!
//! Four queries feed the compiler: action tools, tool localizations,
//! parameter localizations and parameters joined with their optional type.
//! Only rows belonging to tools whose `toolType` is `action` are ever read.

use crate::blob::encode_blob;
use crate::error::{CatalogError, Result};
use crate::locale::{self, LocaleChain};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags, Row};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

pub const ACTION_TOOL_TYPE: &str = "action";

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ToolRow {
    pub row_id: i64,
    pub id: String,
    pub tool_type: String,
    pub flags: Option<i64>,
    pub visibility_flags: Option<i64>,
    pub requirements: Option<Vec<u8>>,
    pub authentication_policy: Value,
    pub custom_icon: Option<Vec<u8>>,
    pub deprecation_replacement_id: Value,
    pub source_action_provider: Value,
    pub output_type_instance: Option<Vec<u8>>,
    pub source_container_id: Value,
    pub attribution_container_id: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolLocalization {
    pub tool_id: i64,
    pub locale: String,
    pub name: Option<String>,
    pub description_summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterLocalization {
    pub tool_id: i64,
    pub key: String,
    pub locale: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A parameter row with the columns of its referenced type, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRow {
    pub tool_id: i64,
    pub key: String,
    pub sort_order: Option<i64>,
    pub relationships: Option<Vec<u8>>,
    pub flags: Option<i64>,
    pub type_id: Option<i64>,
    pub type_instance: Option<Vec<u8>>,
    pub type_identifier: Option<Vec<u8>>,
    pub type_kind: Value,
    pub type_runtime_flags: Value,
    pub type_runtime_requirements: Option<Vec<u8>>,
}

pub type ParameterKey = (i64, String);

/// Everything one compilation needs, fetched over a single connection.
#[derive(Debug, Clone, Default)]
pub struct SourceRows {
    pub tools: Vec<ToolRow>,
    pub tool_localizations: HashMap<i64, ToolLocalization>,
    pub parameter_localizations: HashMap<ParameterKey, ParameterLocalization>,
    pub parameters: Vec<ParameterRow>,
}

impl SourceRows {
    pub fn load(conn: &Connection, chain: &LocaleChain) -> Result<Self> {
        let tools = fetch_tools(conn)?;
        let tool_localizations = locale::resolve(
            chain,
            |loc| fetch_tool_localizations(conn, loc),
            |row: &ToolLocalization| row.tool_id,
        )?;
        let parameter_localizations = locale::resolve(
            chain,
            |loc| fetch_parameter_localizations(conn, loc),
            |row: &ParameterLocalization| (row.tool_id, row.key.clone()),
        )?;
        let parameters = fetch_parameters(conn)?;

        tracing::debug!(
            tools = tools.len(),
            tool_localizations = tool_localizations.len(),
            parameter_localizations = parameter_localizations.len(),
            parameters = parameters.len(),
            "fetched source rows"
        );

        Ok(Self {
            tools,
            tool_localizations,
            parameter_localizations,
            parameters,
        })
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

pub fn open_read_only(path: &Path) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    Ok(Connection::open_with_flags(path, flags)?)
}

pub fn fetch_tools(conn: &Connection) -> Result<Vec<ToolRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT rowId, id, toolType, flags, visibilityFlags, requirements,
                    authenticationPolicy, customIcon, deprecationReplacementId,
                    sourceActionProvider, outputTypeInstance, sourceContainerId,
                    attributionContainerId
             FROM Tools
             WHERE toolType = ?1
             ORDER BY rowId",
        )
        .map_err(CatalogError::query("tools"))?;

    let rows = stmt
        .query_map(params![ACTION_TOOL_TYPE], |row| {
            Ok(ToolRow {
                row_id: row.get(0)?,
                id: row.get(1)?,
                tool_type: row.get(2)?,
                flags: row.get(3)?,
                visibility_flags: row.get(4)?,
                requirements: row.get(5)?,
                authentication_policy: dynamic(row, 6)?,
                custom_icon: row.get(7)?,
                deprecation_replacement_id: dynamic(row, 8)?,
                source_action_provider: dynamic(row, 9)?,
                output_type_instance: row.get(10)?,
                source_container_id: dynamic(row, 11)?,
                attribution_container_id: dynamic(row, 12)?,
            })
        })
        .map_err(CatalogError::query("tools"))?;

    let tools = rows
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(CatalogError::query("tools"))?;
    tracing::debug!(count = tools.len(), "fetched action tools");
    Ok(tools)
}

pub fn fetch_tool_localizations(conn: &Connection, locale: &str) -> Result<Vec<ToolLocalization>> {
    let mut stmt = conn
        .prepare(
            "SELECT toolId, locale, name, descriptionSummary
             FROM ToolLocalizations
             WHERE locale = ?1
               AND toolId IN (SELECT rowId FROM Tools WHERE toolType = ?2)",
        )
        .map_err(CatalogError::query("tool_localizations"))?;

    let rows = stmt
        .query_map(params![locale, ACTION_TOOL_TYPE], |row| {
            Ok(ToolLocalization {
                tool_id: row.get(0)?,
                locale: row.get(1)?,
                name: row.get(2)?,
                description_summary: row.get(3)?,
            })
        })
        .map_err(CatalogError::query("tool_localizations"))?;

    let localizations = rows
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(CatalogError::query("tool_localizations"))?;
    tracing::debug!(locale, count = localizations.len(), "fetched tool localizations");
    Ok(localizations)
}

pub fn fetch_parameter_localizations(
    conn: &Connection,
    locale: &str,
) -> Result<Vec<ParameterLocalization>> {
    let mut stmt = conn
        .prepare(
            "SELECT toolId, key, locale, name, description
             FROM ParameterLocalizations
             WHERE locale = ?1
               AND toolId IN (SELECT rowId FROM Tools WHERE toolType = ?2)",
        )
        .map_err(CatalogError::query("parameter_localizations"))?;

    let rows = stmt
        .query_map(params![locale, ACTION_TOOL_TYPE], |row| {
            Ok(ParameterLocalization {
                tool_id: row.get(0)?,
                key: row.get(1)?,
                locale: row.get(2)?,
                name: row.get(3)?,
                description: row.get(4)?,
            })
        })
        .map_err(CatalogError::query("parameter_localizations"))?;

    let localizations = rows
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(CatalogError::query("parameter_localizations"))?;
    tracing::debug!(
        locale,
        count = localizations.len(),
        "fetched parameter localizations"
    );
    Ok(localizations)
}

pub fn fetch_parameters(conn: &Connection) -> Result<Vec<ParameterRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT Parameters.toolId, Parameters.key, Parameters.sortOrder,
                    Parameters.relationships, Parameters.flags, Parameters.typeId,
                    Parameters.typeInstance, Types.id, Types.kind,
                    Types.runtimeFlags, Types.runtimeRequirements
             FROM Parameters
             JOIN Tools ON Tools.rowId = Parameters.toolId
             LEFT JOIN Types ON Types.rowId = Parameters.typeId
             WHERE Tools.toolType = ?1
             ORDER BY Parameters.toolId, Parameters.sortOrder, Parameters.key",
        )
        .map_err(CatalogError::query("parameters"))?;

    let rows = stmt
        .query_map(params![ACTION_TOOL_TYPE], |row| {
            Ok(ParameterRow {
                tool_id: row.get(0)?,
                key: row.get(1)?,
                sort_order: row.get(2)?,
                relationships: row.get(3)?,
                flags: row.get(4)?,
                type_id: row.get(5)?,
                type_instance: row.get(6)?,
                type_identifier: row.get(7)?,
                type_kind: dynamic(row, 8)?,
                type_runtime_flags: dynamic(row, 9)?,
                type_runtime_requirements: row.get(10)?,
            })
        })
        .map_err(CatalogError::query("parameters"))?;

    let parameters = rows
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(CatalogError::query("parameters"))?;
    tracing::debug!(count = parameters.len(), "fetched parameters");
    Ok(parameters)
}

/// Read a column of unknown storage class as a JSON value.
///
/// Blobs are base64-encoded so they survive the trip into JSON.
fn dynamic(row: &Row<'_>, idx: usize) -> rusqlite::Result<Value> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => encode_blob(Some(b)).map(Value::String).unwrap_or(Value::Null),
    })
}
