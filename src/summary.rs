use crate::error::Result;
use crate::models::{CountrySummary, CountryYearRecord};
use crate::stats;
use crate::storage::{read_records, write_records};
use log::info;
use std::collections::BTreeMap;
use std::path::Path;

/// One summary row per country id, ordered by id. The name is the first one
/// seen for that id in input order.
pub fn summarize_countries(records: &[CountryYearRecord]) -> Vec<CountrySummary> {
    let mut groups: BTreeMap<&str, Vec<&CountryYearRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.country_id.as_str()).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|(country_id, rows)| {
            let inflation = || rows.iter().map(|r| r.inflation_cpi);
            CountrySummary {
                country_id: country_id.to_string(),
                country_name: rows[0].country.clone(),
                avg_inflation: stats::mean(inflation()),
                avg_gdp: stats::mean(rows.iter().map(|r| r.gdp)),
                avg_unemployment: stats::mean(rows.iter().map(|r| r.unemployment_rate)),
                max_inflation: stats::max(inflation()),
                min_inflation: stats::min(inflation()),
            }
        })
        .collect()
}

pub fn create_country_summary(input_path: &Path, output_path: &Path) -> Result<Vec<CountrySummary>> {
    let records: Vec<CountryYearRecord> = read_records(input_path)?;
    let summary = summarize_countries(&records);

    write_records(output_path, &summary)?;
    info!("Country summary saved to: {}", output_path.display());

    Ok(summary)
}
