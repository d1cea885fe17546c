use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("database not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("no action tools found in the database")]
    NoActions,

    #[error("query '{query}' failed: {source}")]
    Query {
        query: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("invalid blob encoding: {0}")]
    InvalidBlob(String),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    pub(crate) fn query(query: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| CatalogError::Query { query, source }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
