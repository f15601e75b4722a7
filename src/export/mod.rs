use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use anyhow::Context;
use csv::WriterBuilder;
use log::info;
use crate::report::MonthlySummary;

/// Write the monthly summary to a file. `.json` files get a JSON array, anything else CSV.
pub(crate) fn export_summary(summary: &[MonthlySummary], path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("unable to create directory {}", parent.display()))?;
    }

    let is_json = path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let file = File::create(path).with_context(|| format!("unable to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), summary)?;
    } else {
        let mut csv_writer = WriterBuilder::new().has_headers(true).from_path(path)?;
        for s in summary {
            csv_writer.serialize(s)?;
        }
        csv_writer.flush()?;
    }

    info!("Exported {} months to {}", summary.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use rust_decimal::Decimal;
    use crate::export::export_summary;
    use crate::report::{MonthKey, MonthlySummary};

    fn summary() -> Vec<MonthlySummary> {
        vec![MonthlySummary {
            month: MonthKey { year: 2024, month: 2 },
            total_in: Decimal::from_str("2500.00").unwrap(),
            total_out: Decimal::from_str("-84.20").unwrap(),
            net: Decimal::from_str("2415.80").unwrap(),
        }]
    }

    #[test]
    fn test_export_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("summary.csv");
        export_summary(&summary(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("month,total_in,total_out,net"));
        assert_eq!(lines.next(), Some("2024-02,2500.00,-84.20,2415.80"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_export_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        export_summary(&summary(), &path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["month"], "2024-02");
        assert_eq!(value.as_array().unwrap().len(), 1);
    }
}
