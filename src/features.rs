use crate::error::{PipelineError, Result};
use crate::models::{CountryYearRecord, EnrichedRecord, Features};
use crate::partition::by_country;
use crate::stats::{pct_change, rolling_mean};
use crate::storage::{read_records, write_records};
use log::info;
use std::path::Path;

fn enrich_country(rows: Vec<CountryYearRecord>, rolling_window: usize) -> Vec<EnrichedRecord> {
    let gdp: Vec<Option<f64>> = rows.iter().map(|r| r.gdp).collect();
    let inflation: Vec<Option<f64>> = rows.iter().map(|r| r.inflation_cpi).collect();

    let gdp_growth = pct_change(&gdp);
    let inflation_change = pct_change(&inflation);
    let gdp_rolling = rolling_mean(&gdp, rolling_window);
    let inflation_rolling = rolling_mean(&inflation, rolling_window);

    rows.into_iter()
        .enumerate()
        .map(|(i, record)| {
            let features = Features {
                gdp_growth_pct: gdp_growth[i],
                inflation_pct_change: inflation_change[i],
                gdp_rolling_avg: gdp_rolling[i],
                inflation_rolling_avg: inflation_rolling[i],
            };
            EnrichedRecord::new(record, features)
        })
        .collect()
}

/// Attach growth rates and rolling averages, computed within each country.
pub fn enrich(records: Vec<CountryYearRecord>, rolling_window: usize) -> Result<Vec<EnrichedRecord>> {
    if rolling_window == 0 {
        return Err(PipelineError::InvalidParameter(
            "rolling window must be at least 1".to_string(),
        ));
    }

    Ok(by_country(records)
        .into_iter()
        .flat_map(|rows| enrich_country(rows, rolling_window))
        .collect())
}

pub fn create_intermediate_dataset(
    input_path: &Path,
    output_path: &Path,
    rolling_window: usize,
) -> Result<Vec<EnrichedRecord>> {
    let records: Vec<CountryYearRecord> = read_records(input_path)?;
    let enriched = enrich(records, rolling_window)?;

    write_records(output_path, &enriched)?;
    info!("Intermediate dataset saved to: {}", output_path.display());

    Ok(enriched)
}
