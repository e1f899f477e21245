//! Files rendered on the client rather than by the server

use serde::Serialize;

use crate::application::dto::ExportFile;
use crate::application::error::ForgeError;

pub(crate) fn json_file<T: Serialize>(
    value: &T,
    filename: impl Into<String>,
) -> Result<ExportFile, ForgeError> {
    let bytes = serde_json::to_vec_pretty(value)?;
    Ok(ExportFile::new(filename, bytes).with_content_type("application/json"))
}

pub(crate) fn markdown_file(markdown: String, filename: impl Into<String>) -> ExportFile {
    ExportFile::new(filename, markdown.into_bytes()).with_content_type("text/markdown")
}
