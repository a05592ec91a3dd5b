use std::path::Path;

use anyhow::{Context, Result};
use periods::period::PeriodCalculator;
use periods::sheet::Timesheet;
use tracing::info;

/// Reads a timesheet document and checks it against the period it claims.
pub fn load(path: &Path, calculator: &PeriodCalculator) -> Result<Timesheet> {
    let text = fs_err::read_to_string(path)?;
    let mut sheet: Timesheet = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse timesheet {}", path.display()))?;
    sheet
        .conform(calculator)
        .with_context(|| format!("Malformed timesheet {}", path.display()))?;
    info!(path = %path.display(), entries = sheet.entries.len(), "loaded timesheet");
    Ok(sheet)
}

pub fn save(path: &Path, sheet: &Timesheet) -> Result<()> {
    let mut json = serde_json::to_string_pretty(sheet)?;
    json.push('\n');
    fs_err::write(path, json)?;
    info!(path = %path.display(), status = %sheet.status, "saved timesheet");
    Ok(())
}
