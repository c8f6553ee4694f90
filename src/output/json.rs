//! JSON export of audit reports

use crate::audit::AuditReport;
use crate::output::{ensure_parent_dir, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Serializes a report as pretty-printed JSON
pub fn export_json(report: &AuditReport) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Writes the JSON export of `report` to `output_path`
pub fn write_json_report(report: &AuditReport, output_path: &Path) -> OutputResult<()> {
    let json = export_json(report)?;

    ensure_parent_dir(output_path)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;

    Ok(())
}
