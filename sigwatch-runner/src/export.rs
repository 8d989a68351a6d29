//! Equity curve export as CSV (`trade,balance`).

use std::path::Path;

use anyhow::{Context, Result};

/// Render an equity curve as CSV. Row 0 is the starting balance.
pub fn export_equity_csv(equity_curve: &[f64]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["trade", "balance"])?;
    for (i, balance) in equity_curve.iter().enumerate() {
        wtr.write_record([&i.to_string(), &format!("{balance:.2}")])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Write the equity curve CSV to `path`, creating parent directories.
pub fn write_equity_csv(path: &Path, equity_curve: &[f64]) -> Result<()> {
    let csv = export_equity_csv(equity_curve)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equity_rows_are_numbered_from_zero() {
        let csv = export_equity_csv(&[10_000.0, 9_900.0, 10_068.3]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, ["trade,balance", "0,10000.00", "1,9900.00", "2,10068.30"]);
    }

    #[test]
    fn empty_curve_has_header_only() {
        assert_eq!(export_equity_csv(&[]).unwrap(), "trade,balance\n");
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("equity.csv");
        write_equity_csv(&path, &[10_000.0]).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][1], "10000.00");
    }
}
