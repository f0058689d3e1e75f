//! Snapshot Import/Export.
//!
//! Two wire formats are understood:
//!
//! - **Legacy** (v1): a bare JSON array of company objects
//! - **Envelope** (v2): `{ version, exportedAt, companies, manualSharesOutstanding?, manualStockPrices? }`
//!
//! The shape is resolved once, at the parse boundary, into [`ImportedData`].
//! Exports always write the v2 envelope unless the legacy form is asked for.

pub mod export;
pub mod import;

pub use export::{export_file_name, export_legacy, ExportEnvelope, SNAPSHOT_VERSION};
pub use import::{
    get_new_tickers, parse_import, validate_import, ImportError, ImportedData, SnapshotFormat,
};

use mnav_common::{Error, Result, ResultExt};
use std::fs;
use std::path::Path;

/// Read and validate a snapshot file.
pub fn read_snapshot_file(path: &Path) -> Result<ImportedData> {
    let content = fs::read_to_string(path)
        .context(format!("Failed to read snapshot {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .context(format!("Failed to parse snapshot {}", path.display()))?;

    parse_import(&value).map_err(|e| {
        Error::InvalidInput(e.to_string())
            .with_context(format!("Snapshot {} is not importable", path.display()))
    })
}

/// Write an export envelope to disk, creating parent directories.
pub fn write_snapshot_file(path: &Path, envelope: &ExportEnvelope) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .context(format!("Failed to create {}", parent.display()))?;
    }
    let json = envelope.to_json_pretty()?;
    fs::write(path, json).context(format!("Failed to write snapshot {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        companies = envelope.companies.len(),
        "Snapshot written"
    );
    Ok(())
}
