use crate::config::{CleanOptions, FillMethod};
use crate::error::Result;
use crate::iso::Iso3Lookup;
use crate::models::{CountryYearRecord, RawRecord, RAW_COLUMNS};
use crate::storage::{require_columns, write_records};
use csv::ReaderBuilder;
use log::{debug, info};
use std::path::Path;

pub const MIN_YEAR: f64 = 1900.0;
pub const MAX_YEAR: f64 = 2100.0;

/// Indicators a row cannot be analysed without.
#[derive(Debug, Clone, Copy)]
enum Critical {
    Gdp,
    InflationCpi,
    UnemploymentRate,
}

const CRITICAL: [Critical; 3] = [Critical::Gdp, Critical::InflationCpi, Critical::UnemploymentRate];

impl Critical {
    fn value(self, record: &CountryYearRecord) -> Option<f64> {
        match self {
            Critical::Gdp => record.gdp,
            Critical::InflationCpi => record.inflation_cpi,
            Critical::UnemploymentRate => record.unemployment_rate,
        }
    }

    fn slot(self, record: &mut CountryYearRecord) -> &mut Option<f64> {
        match self {
            Critical::Gdp => &mut record.gdp,
            Critical::InflationCpi => &mut record.inflation_cpi,
            Critical::UnemploymentRate => &mut record.unemployment_rate,
        }
    }
}

/// Parse a raw year cell; anything non-numeric or outside [1900, 2100] is rejected.
pub fn parse_year(raw: Option<&str>) -> Option<i32> {
    let year = raw?.trim().parse::<f64>().ok()?;
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Some(year.trunc() as i32)
    } else {
        None
    }
}

fn canonicalize(raw: RawRecord, year: i32, lookup: &dyn Iso3Lookup) -> CountryYearRecord {
    let country_iso3 = lookup.alpha3(&raw.country);
    CountryYearRecord {
        country: raw.country,
        country_id: raw.country_id,
        year,
        country_iso3,
        inflation_cpi: raw.inflation_cpi,
        gdp: raw.gdp,
        gdp_per_capita: raw.gdp_per_capita,
        unemployment_rate: raw.unemployment_rate,
        interest_rate: raw.interest_rate,
        inflation_gdp_deflator: raw.inflation_gdp_deflator,
        gdp_growth: raw.gdp_growth,
        current_account: raw.current_account,
        gov_expense: raw.gov_expense,
        gov_revenue: raw.gov_revenue,
        tax_revenue: raw.tax_revenue,
        gni: raw.gni,
        public_debt: raw.public_debt,
    }
}

fn fill_missing(records: &mut [CountryYearRecord], method: FillMethod) {
    for column in CRITICAL {
        let mut carried: Option<f64> = None;
        let mut fill_slot = |record: &mut CountryYearRecord| {
            let slot = column.slot(record);
            match *slot {
                Some(value) => carried = Some(value),
                None => *slot = carried,
            }
        };
        match method {
            FillMethod::Forward => records.iter_mut().for_each(&mut fill_slot),
            FillMethod::Backward => records.iter_mut().rev().for_each(&mut fill_slot),
        }
    }
}

/// Clean a raw panel CSV into canonical country-year records.
///
/// Rows with an unusable year or a blank country id are discarded, the ISO3
/// code is looked up by country name (unknown names yield `None`), missing
/// critical indicators are dropped and/or filled per `options`, and the
/// result is sorted by country name then year.
pub fn clean_data(
    file_path: &Path,
    output_file: &Path,
    options: &CleanOptions,
    lookup: &dyn Iso3Lookup,
) -> Result<Vec<CountryYearRecord>> {
    // Step 1: Load the dataset and check the raw schema
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(file_path)?;
    require_columns(rdr.headers()?, &RAW_COLUMNS)?;

    // Step 2: Keep rows with a usable year and country id
    let mut records: Vec<CountryYearRecord> = Vec::new();
    let mut rejected = 0usize;
    for result in rdr.deserialize() {
        let raw: RawRecord = result?;
        match parse_year(raw.year.as_deref()) {
            Some(year) if !raw.country_id.trim().is_empty() => {
                records.push(canonicalize(raw, year, lookup));
            }
            _ => rejected += 1,
        }
    }
    debug!("Discarded {} rows without a valid year or country id", rejected);

    // Step 3: Handle missing critical indicators
    if options.drop_missing {
        let before = records.len();
        records.retain(|r| CRITICAL.iter().all(|c| c.value(r).is_some()));
        debug!("Dropped {} rows missing critical indicators", before - records.len());
    }
    if let Some(method) = options.fill {
        fill_missing(&mut records, method);
    }

    // Step 4: Order by country and year
    records.sort_by(|a, b| a.country.cmp(&b.country).then(a.year.cmp(&b.year)));

    if options.save {
        write_records(output_file, &records)?;
        info!("Cleaned data saved to: {}", output_file.display());
    }

    Ok(records)
}
