use std::path::Path;

use super::types::Document;

/// Load an OpenAPI document from a YAML or JSON file.
///
/// The format is chosen by file extension, the same way the rest of the
/// toolchain does it: `.yaml`/`.yml` is parsed as YAML, anything else as
/// JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not deserialize into
/// the supported OpenAPI subset.
pub fn load_document(path: &Path) -> anyhow::Result<Document> {
    let content = std::fs::read_to_string(path)?;
    let by_ext = path.extension().and_then(|e| e.to_str());
    let doc: Document = match by_ext {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };
    Ok(doc)
}
