//! YAML export
//!
//! Same document as the JSON export, for people who want to read it.

use std::io::Write;

use crate::error::{CycleError, CycleResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

/// Export the full database to YAML, preceded by a comment header
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> CycleResult<()> {
    let export = FullExport::from_storage(storage)?;

    let header = format!(
        "# cardcycle export\n# Generated: {}\n# App Version: {}\n\n",
        export.exported_at, export.app_version
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| CycleError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| CycleError::Export(e.to_string()))
}

/// Parse and validate a YAML export
pub fn read_yaml_export(yaml_str: &str) -> CycleResult<FullExport> {
    let export: FullExport =
        serde_yaml::from_str(yaml_str).map_err(|e| CycleError::Export(e.to_string()))?;
    export.validate().map_err(CycleError::Export)?;
    Ok(export)
}
