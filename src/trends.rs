use crate::error::{PipelineError, Result};
use crate::models::{CountryTrend, EnrichedRecord, TrendDirection};
use crate::partition::by_country;
use crate::stats::{self, pct_change};
use crate::storage::{read_records, write_records};
use log::info;
use std::path::Path;

/// Trend indicators for one country's year-ordered rows.
fn country_trend(rows: &[EnrichedRecord], recent_years: usize) -> CountryTrend {
    let gdp: Vec<Option<f64>> = rows.iter().map(|r| r.gdp).collect();
    let growth = pct_change(&gdp);

    let recent_start = growth.len().saturating_sub(recent_years);
    let mean_recent_growth = stats::mean(growth[recent_start..].iter().copied());

    let first_inflation = rows.first().and_then(|r| r.inflation_cpi);
    let last_inflation = rows.last().and_then(|r| r.inflation_cpi);
    let inflation_change = match (first_inflation, last_inflation) {
        (Some(first), Some(last)) => last - first,
        _ => f64::NAN,
    };

    CountryTrend {
        country: rows.first().map(|r| r.country.clone()).unwrap_or_default(),
        mean_gdp_growth_last_years: mean_recent_growth,
        gdp_volatility_std: stats::sample_std_dev(gdp.iter().copied()),
        mean_inflation: stats::mean(rows.iter().map(|r| r.inflation_cpi)),
        inflation_trend_direction: TrendDirection::from_change(inflation_change),
        crisis_year_count: growth.iter().flatten().filter(|&&g| g < 0.0).count(),
    }
}

/// One trend row per country id, ordered by id.
pub fn country_trends(records: Vec<EnrichedRecord>, recent_years: usize) -> Result<Vec<CountryTrend>> {
    if recent_years == 0 {
        return Err(PipelineError::InvalidParameter(
            "recent years must be at least 1".to_string(),
        ));
    }

    Ok(by_country(records)
        .iter()
        .map(|rows| country_trend(rows, recent_years))
        .collect())
}

pub fn compute_country_trends(
    input_path: &Path,
    output_path: &Path,
    recent_years: usize,
) -> Result<Vec<CountryTrend>> {
    let records: Vec<EnrichedRecord> = read_records(input_path)?;
    let trends = country_trends(records, recent_years)?;

    write_records(output_path, &trends)?;
    info!("Country trends saved to: {}", output_path.display());

    Ok(trends)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CountryYearRecord, Features};

    fn row(id: &str, year: i32, gdp: f64, inflation: Option<f64>) -> EnrichedRecord {
        let record = CountryYearRecord {
            country: format!("{}-land", id),
            country_id: id.to_string(),
            year,
            country_iso3: None,
            inflation_cpi: inflation,
            gdp: Some(gdp),
            gdp_per_capita: None,
            unemployment_rate: Some(5.0),
            interest_rate: None,
            inflation_gdp_deflator: None,
            gdp_growth: None,
            current_account: None,
            gov_expense: None,
            gov_revenue: None,
            tax_revenue: None,
            gni: None,
            public_debt: None,
        };
        EnrichedRecord::new(record, Features::default())
    }

    fn close(a: Option<f64>, b: f64) -> bool {
        a.map_or(false, |a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn testland_has_no_crisis_years() {
        let rows = vec![
            row("tl", 2000, 100.0, Some(2.0)),
            row("tl", 2001, 110.0, Some(3.0)),
            row("tl", 2002, 121.0, Some(4.0)),
        ];

        let trends = country_trends(rows, 5).unwrap();

        assert_eq!(trends.len(), 1);
        let tl = &trends[0];
        assert_eq!(tl.country, "tl-land");
        assert_eq!(tl.crisis_year_count, 0);
        assert!(close(tl.mean_gdp_growth_last_years, 10.0));
        assert!(close(tl.mean_inflation, 3.0));
        assert_eq!(tl.inflation_trend_direction, TrendDirection::Upward);
        // sample std of [100, 110, 121]
        assert!(close(tl.gdp_volatility_std, (662.0f64 / 3.0 / 2.0).sqrt()));
    }

    #[test]
    fn crisis_years_count_strictly_negative_growth() {
        let rows = vec![
            row("cr", 2000, 100.0, Some(5.0)),
            row("cr", 2001, 90.0, Some(5.0)),
            row("cr", 2002, 90.0, Some(5.0)),
            row("cr", 2003, 80.0, Some(5.0)),
        ];

        let trends = country_trends(rows, 5).unwrap();

        assert_eq!(trends[0].crisis_year_count, 2);
        // unchanged inflation is not an upward trend
        assert_eq!(trends[0].inflation_trend_direction, TrendDirection::Downward);
    }

    #[test]
    fn recent_growth_uses_only_last_rows() {
        let rows = vec![
            row("rg", 2000, 100.0, None),
            row("rg", 2001, 200.0, None),
            row("rg", 2002, 220.0, None),
            row("rg", 2003, 242.0, None),
        ];

        let trends = country_trends(rows, 2).unwrap();

        assert!(close(trends[0].mean_gdp_growth_last_years, 10.0));
        assert_eq!(trends[0].mean_inflation, None);
        assert_eq!(trends[0].inflation_trend_direction, TrendDirection::Downward);
    }

    #[test]
    fn single_year_country_has_undefined_volatility() {
        let trends = country_trends(vec![row("one", 2000, 50.0, Some(1.0))], 5).unwrap();
        assert_eq!(trends[0].gdp_volatility_std, None);
        assert_eq!(trends[0].mean_gdp_growth_last_years, None);
        assert_eq!(trends[0].crisis_year_count, 0);
    }

    #[test]
    fn falling_inflation_is_downward() {
        let rows = vec![row("fi", 2000, 1.0, Some(9.0)), row("fi", 2001, 1.0, Some(3.0))];
        let trends = country_trends(rows, 5).unwrap();
        assert_eq!(trends[0].inflation_trend_direction, TrendDirection::Downward);
    }
}
