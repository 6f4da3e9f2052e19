use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::domain::record::Record;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub fn output_filename(prefix: &str, generated_at: &DateTime<Local>) -> String {
    format!("{}_{}.csv", prefix, generated_at.format(TIMESTAMP_FORMAT))
}

/// Writes `records` as CSV into `output_dir`, named after `prefix` and the
/// generation time.
///
/// Returns `None` without touching the filesystem when there is nothing to
/// write.
pub fn write_records(
    records: &[Record],
    output_dir: &Path,
    prefix: &str,
    generated_at: &DateTime<Local>,
) -> anyhow::Result<Option<PathBuf>> {
    if records.is_empty() {
        log::warn!("No data found to write to CSV");
        return Ok(None);
    }

    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(output_filename(prefix, generated_at));

    let mut writer = csv::Writer::from_path(&path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    log::info!("{}", "=".repeat(60));
    log::info!("✓ Data successfully saved to '{}'", path.display());
    log::info!("✓ Total records: {}", records.len());
    log::info!("{}", "=".repeat(60));

    Ok(Some(path))
}
