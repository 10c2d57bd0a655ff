use crate::error::{PipelineError, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Create the parent directory of `path` if it is missing. Safe to repeat.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Fail with `MissingColumn` for the first required header that is absent.
pub fn require_columns(headers: &StringRecord, required: &[&str]) -> Result<()> {
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(PipelineError::MissingColumn(column.to_string()));
        }
    }
    Ok(())
}

pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut records: Vec<T> = Vec::new();
    for result in rdr.deserialize() {
        let record: T = result?;
        records.push(record);
    }

    Ok(records)
}

pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut wtr = WriterBuilder::new().has_headers(true).from_path(path)?;

    for record in records {
        wtr.serialize(record)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GlobalTrend;
    use tempfile::TempDir;

    #[test]
    fn write_creates_nested_directories_and_reads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a").join("b").join("global.csv");
        let rows = vec![
            GlobalTrend { year: 2000, global_mean_inflation: Some(2.5), mean_global_gdp_growth: None },
            GlobalTrend { year: 2001, global_mean_inflation: None, mean_global_gdp_growth: Some(-1.0) },
        ];

        write_records(&path, &rows).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Year,global_mean_inflation,mean_global_gdp_growth\n"));
        assert!(text.contains("2000,2.5,\n"));

        let back: Vec<GlobalTrend> = read_records(&path).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn ensure_parent_dir_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("file.csv");
        ensure_parent_dir(&path).unwrap();
        ensure_parent_dir(&path).unwrap();
        assert!(dir.path().join("out").is_dir());
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let headers = StringRecord::from(vec!["Year", "GDP"]);
        assert!(require_columns(&headers, &["Year"]).is_ok());
        match require_columns(&headers, &["Year", "Inflation_CPI"]) {
            Err(PipelineError::MissingColumn(name)) => assert_eq!(name, "Inflation_CPI"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result: Result<Vec<GlobalTrend>> = read_records(&dir.path().join("nope.csv"));
        assert!(result.is_err());
    }
}
