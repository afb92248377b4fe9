use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use trendstitch::TrendReport;

/// Write `report` as CSV with a header row to `dir/<report file name>`.
pub fn write_csv(report: &TrendReport, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;
    let path = dir.join(report.file_name());
    let mut w = csv::Writer::from_path(&path)
        .with_context(|| format!("opening {}", path.display()))?;
    for row in report.rows() {
        w.serialize(row)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    w.flush().with_context(|| format!("flushing {}", path.display()))?;
    Ok(path)
}
