//! Storage initialization
//!
//! First-run setup: directories, default settings and empty data files.

use serde_json::json;

use crate::config::{CyclePaths, Settings};
use crate::error::CycleError;

use super::file_io::write_json_atomic;

/// Prepare a data directory for use
///
/// Existing files are left untouched. Returns true if the directory was not
/// initialized before the call.
pub fn initialize_storage(paths: &CyclePaths) -> Result<bool, CycleError> {
    let fresh = !paths.is_initialized();

    paths.ensure_directories()?;

    if fresh {
        Settings::default().save(paths)?;
    }

    for file in [
        paths.accounts_file(),
        paths.cards_file(),
        paths.series_file(),
        paths.transactions_file(),
    ] {
        if !file.exists() {
            write_json_atomic(&file, &json!({ "items": [] }))?;
        }
    }

    Ok(fresh)
}
