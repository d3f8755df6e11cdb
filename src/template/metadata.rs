//! Sidecar metadata loading
//!
//! A template `<dir>/<Name>.hbs` may ship with `<dir>/<key>.json`, where `key`
//! is the normalized template key. Problems with the sidecar are never fatal:
//! they are logged and the template gets empty metadata.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::types::TemplateMetadata;

/// Extension of sidecar metadata files
pub const METADATA_EXTENSION: &str = "json";

/// Path of the sidecar descriptor for `key` inside `dir`
pub fn metadata_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{}.{}", key, METADATA_EXTENSION))
}

/// Load the sidecar metadata for `key`, falling back to an empty document
pub async fn load_metadata(dir: &Path, key: &str) -> TemplateMetadata {
    let path = metadata_path(dir, key);

    let raw = match tokio::fs::read_to_string(&path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return TemplateMetadata::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read template metadata");
            return TemplateMetadata::new();
        }
    };

    parse_metadata(&raw).unwrap_or_else(|reason| {
        tracing::warn!(path = %path.display(), error = %reason, "Invalid JSON in template metadata");
        TemplateMetadata::new()
    })
}

fn parse_metadata(raw: &str) -> Result<TemplateMetadata, String> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => Ok(map.into()),
        Ok(other) => Err(format!("expected a JSON object, found {}", json_kind(&other))),
        Err(e) => Err(e.to_string()),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
