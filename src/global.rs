use crate::error::Result;
use crate::models::{EnrichedRecord, GlobalTrend};
use crate::stats;
use crate::storage::{read_records, write_records};
use log::info;
use std::collections::BTreeMap;
use std::path::Path;

/// Cross-country means for every year present, in year order.
pub fn global_trends(records: &[EnrichedRecord]) -> Vec<GlobalTrend> {
    let mut years: BTreeMap<i32, Vec<&EnrichedRecord>> = BTreeMap::new();
    for record in records {
        years.entry(record.year).or_default().push(record);
    }

    years
        .into_iter()
        .map(|(year, rows)| GlobalTrend {
            year,
            global_mean_inflation: stats::mean(rows.iter().map(|r| r.inflation_cpi)),
            mean_global_gdp_growth: stats::mean(rows.iter().map(|r| r.gdp_growth_pct)),
        })
        .collect()
}

pub fn analyze_global_trends(input_path: &Path, output_path: &Path) -> Result<Vec<GlobalTrend>> {
    let records: Vec<EnrichedRecord> = read_records(input_path)?;
    let global = global_trends(&records);

    write_records(output_path, &global)?;
    info!("Global trends saved to: {}", output_path.display());

    Ok(global)
}
