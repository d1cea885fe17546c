//! Binary-safe text encoding for blob columns.
//!
//! Every raw byte payload that lands in the compiled document goes through
//! [`encode_blob`]. `None` stays `None`, an empty blob becomes `""`, anything
//! else becomes standard padded base64.

use crate::error::{CatalogError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serializer;

pub fn encode_blob(value: Option<&[u8]>) -> Option<String> {
    match value {
        None => None,
        Some([]) => Some(String::new()),
        Some(bytes) => Some(STANDARD.encode(bytes)),
    }
}

/// Inverse of [`encode_blob`].
pub fn decode_blob(value: Option<&str>) -> Result<Option<Vec<u8>>> {
    match value {
        None => Ok(None),
        Some("") => Ok(Some(Vec::new())),
        Some(text) => STANDARD
            .decode(text)
            .map(Some)
            .map_err(|e| CatalogError::InvalidBlob(e.to_string())),
    }
}

/// `serialize_with` adapter for `Option<Vec<u8>>` fields of the output model.
pub fn serialize<S>(
    value: &Option<Vec<u8>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match encode_blob(value.as_deref()) {
        Some(text) => serializer.serialize_some(&text),
        None => serializer.serialize_none(),
    }
}
