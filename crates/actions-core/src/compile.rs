//! End-to-end compilation: open the export, fetch, merge, stamp metadata.

use crate::config::CompileConfig;
use crate::error::{CatalogError, Result};
use crate::fetch::{self, SourceRows};
use crate::io;
use crate::payload::{build_actions, CompiledDocument, Metadata};
use chrono::{DateTime, Utc};

pub fn compile(cfg: &CompileConfig) -> Result<CompiledDocument> {
    compile_at(cfg, Utc::now())
}

pub fn compile_at(cfg: &CompileConfig, generated_at: DateTime<Utc>) -> Result<CompiledDocument> {
    if !cfg.db.exists() {
        return Err(CatalogError::SourceNotFound(cfg.db.clone()));
    }

    let chain = cfg.locale_chain();
    let rows = {
        let conn = fetch::open_read_only(&cfg.db)?;
        SourceRows::load(&conn, &chain)?
    };

    if rows.tools.is_empty() {
        return Err(CatalogError::NoActions);
    }

    let actions = build_actions(&rows);
    tracing::info!(
        actions = actions.len(),
        locale = %cfg.locale,
        "compiled action catalog"
    );

    Ok(CompiledDocument {
        metadata: Metadata {
            generated_at: generated_at.to_rfc3339(),
            locale: cfg.locale.clone(),
            fallback_locale: cfg.fallback_locale.clone(),
            source_database: cfg.db.display().to_string(),
            action_count: actions.len(),
        },
        actions,
    })
}

/// Compile and write the document to `cfg.output`. Nothing is written on error.
pub fn compile_to_file(cfg: &CompileConfig) -> Result<CompiledDocument> {
    let doc = compile(cfg)?;
    io::write_json(&cfg.output, &doc)?;
    tracing::info!(output = %cfg.output.display(), "wrote compiled catalog");
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::tests::SCHEMA;
    use chrono::TimeZone;
    use rusqlite::Connection;
    use std::path::Path;
    use tempfile::TempDir;

    fn make_db(path: &Path, inserts: &str) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch(inserts).unwrap();
    }

    fn config(dir: &TempDir, locale: &str, fallback: Option<&str>) -> CompileConfig {
        CompileConfig {
            db: dir.path().join("raw.sqlite"),
            output: dir.path().join("out/compiled.json"),
            locale: locale.to_string(),
            fallback_locale: fallback.map(str::to_string),
        }
    }

    #[test]
    fn missing_source_fails_without_output() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir, "en", Some("en"));
        assert!(matches!(
            compile_to_file(&cfg),
            Err(CatalogError::SourceNotFound(_))
        ));
        assert!(!cfg.output.exists());
    }

    #[test]
    fn empty_database_fails_without_output() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir, "en", Some("en"));
        make_db(
            &cfg.db,
            "INSERT INTO Tools (rowId, id, toolType) VALUES (1, 'not.an.action', 'query');",
        );
        assert!(matches!(compile_to_file(&cfg), Err(CatalogError::NoActions)));
        assert!(!cfg.output.exists());
    }

    #[test]
    fn corrupt_database_is_fatal() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir, "en", None);
        std::fs::write(&cfg.db, b"this is not a sqlite file at all").unwrap();
        assert!(compile_to_file(&cfg).is_err());
        assert!(!cfg.output.exists());
    }

    #[test]
    fn metadata_reflects_run() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir, "de", Some("en"));
        make_db(
            &cfg.db,
            "INSERT INTO Tools (rowId, id, toolType) VALUES (1, 'a', 'action'), (2, 'b', 'action');",
        );
        let at = Utc.with_ymd_and_hms(2025, 4, 1, 12, 0, 0).unwrap();
        let doc = compile_at(&cfg, at).unwrap();

        assert_eq!(doc.metadata.generated_at, "2025-04-01T12:00:00+00:00");
        assert_eq!(doc.metadata.locale, "de");
        assert_eq!(doc.metadata.fallback_locale.as_deref(), Some("en"));
        assert_eq!(doc.metadata.source_database, cfg.db.display().to_string());
        assert_eq!(doc.metadata.action_count, 2);
    }

    #[test]
    fn writes_document_with_expected_shape() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir, "de", Some("en"));
        make_db(
            &cfg.db,
            "INSERT INTO Tools (rowId, id, toolType) VALUES (1, 'com.example.action', 'action');
             INSERT INTO ToolLocalizations VALUES (1, 'en', 'English Name', NULL);
             INSERT INTO Parameters (toolId, key, sortOrder) VALUES (1, 'value', 0);",
        );

        let doc = compile_to_file(&cfg).unwrap();
        assert_eq!(doc.actions["com.example.action"].name, "English Name");

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&cfg.output).unwrap()).unwrap();
        assert_eq!(written["metadata"]["actionCount"], 1);
        assert_eq!(written["metadata"]["fallbackLocale"], "en");
        let action = &written["actions"]["com.example.action"];
        assert_eq!(action["name"], "English Name");
        assert!(action["description"].is_null());
        assert_eq!(action["arguments"][0]["name"], "value");
        assert!(action["arguments"][0]["type"]["kind"].is_null());
    }
}
