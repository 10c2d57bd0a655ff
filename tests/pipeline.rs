use econ_indicators::charts::{plot_country_gdp_trend, RenderOutcome};
use econ_indicators::clean::clean_data;
use econ_indicators::config::{ChartStyle, CleanOptions, PipelinePaths};
use econ_indicators::dashboard::build_dashboard;
use econ_indicators::features::create_intermediate_dataset;
use econ_indicators::global::analyze_global_trends;
use econ_indicators::models::{CountryTrend, EnrichedRecord, TrendDirection};
use econ_indicators::storage::read_records;
use econ_indicators::summary::create_country_summary;
use econ_indicators::trends::compute_country_trends;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const RAW: &str = r#"country_name,country_id,year,Inflation (CPI %),GDP (Current USD),GDP per Capita (Current USD),Unemployment Rate (%),"Interest Rate (Real, %)","Inflation (GDP Deflator, %)",GDP Growth (% Annual),Current Account Balance (% GDP),Government Expense (% of GDP),Government Revenue (% of GDP),Tax Revenue (% of GDP),Gross National Income (USD),Public Debt (% of GDP)
Testland,tl,2002,4.0,121,,6.0,,,,,,,,,
Testland,tl,2000,2.0,100,,6.0,,,,,,,,,
Testland,tl,2001,3.0,110,,6.0,,,,,,,,,
Germany,de,2000,1.5,2000,40000,8.0,1.0,1.2,1.1,3.0,44.0,45.0,23.0,2100,60.0
Germany,de,2001,1.0,1900,38000,8.5,1.0,1.2,-5.0,3.0,44.0,45.0,23.0,2000,61.0
Germany,de,2002,1.0,1950,,,,,,,,,,,
Germany,de,1776,1.0,1950,,8.0,,,,,,,,,
"#;

fn write_raw(base: &Path) -> PipelinePaths {
    let paths = PipelinePaths::under(base);
    fs::create_dir_all(paths.raw_data.parent().unwrap()).unwrap();
    fs::write(&paths.raw_data, RAW).unwrap();
    paths
}

fn run_tables(paths: &PipelinePaths) {
    clean_data(&paths.raw_data, &paths.cleaned_data, &CleanOptions::default(), &|name: &str| {
        match name {
            "Germany" => Some("DEU".to_string()),
            _ => None,
        }
    })
    .unwrap();
    create_intermediate_dataset(&paths.cleaned_data, &paths.intermediate_data, 5).unwrap();
    create_country_summary(&paths.cleaned_data, &paths.country_summary_csv).unwrap();
    compute_country_trends(&paths.intermediate_data, &paths.country_trends_csv, 5).unwrap();
    analyze_global_trends(&paths.intermediate_data, &paths.global_trends_csv).unwrap();
}

#[test]
fn tables_flow_from_raw_to_trends() {
    let dir = TempDir::new().unwrap();
    let paths = write_raw(dir.path());
    run_tables(&paths);

    let enriched: Vec<EnrichedRecord> = read_records(&paths.intermediate_data).unwrap();
    let testland: Vec<&EnrichedRecord> = enriched.iter().filter(|r| r.country_id == "tl").collect();
    assert_eq!(testland.len(), 3);
    assert_eq!(testland[0].gdp_growth_pct, None);
    assert!((testland[1].gdp_growth_pct.unwrap() - 10.0).abs() < 1e-9);
    assert!((testland[2].gdp_growth_pct.unwrap() - 10.0).abs() < 1e-9);
    assert!((testland[2].gdp_rolling_avg.unwrap() - 331.0 / 3.0).abs() < 1e-9);

    // Germany keeps 2000 and 2001 only: 2002 lacks unemployment, 1776 is out of range
    let germany: Vec<i32> = enriched.iter().filter(|r| r.country_id == "de").map(|r| r.year).collect();
    assert_eq!(germany, vec![2000, 2001]);
    assert_eq!(enriched[0].country_iso3.as_deref(), Some("DEU"));

    let trends: Vec<CountryTrend> = read_records(&paths.country_trends_csv).unwrap();
    assert_eq!(trends.len(), 2);
    let de = trends.iter().find(|t| t.country == "Germany").unwrap();
    let tl = trends.iter().find(|t| t.country == "Testland").unwrap();
    assert_eq!(de.crisis_year_count, 1);
    assert_eq!(de.inflation_trend_direction, TrendDirection::Downward);
    assert_eq!(tl.crisis_year_count, 0);
    assert_eq!(tl.inflation_trend_direction, TrendDirection::Upward);

    let summary = fs::read_to_string(&paths.country_summary_csv).unwrap();
    assert!(summary.starts_with("Country_ID,country_name,avg_inflation,avg_gdp,avg_unemployment,max_inflation,min_inflation\n"));
    assert_eq!(summary.lines().count(), 3);

    let global = fs::read_to_string(&paths.global_trends_csv).unwrap();
    assert!(global.starts_with("Year,global_mean_inflation,mean_global_gdp_growth\n"));
    assert_eq!(global.lines().count(), 4);
}

#[test]
fn stages_can_be_rerun_from_files_on_disk() {
    let dir = TempDir::new().unwrap();
    let paths = write_raw(dir.path());
    run_tables(&paths);
    let first = fs::read_to_string(&paths.country_trends_csv).unwrap();

    compute_country_trends(&paths.intermediate_data, &paths.country_trends_csv, 5).unwrap();

    assert_eq!(fs::read_to_string(&paths.country_trends_csv).unwrap(), first);
}

#[test]
fn absent_country_skips_render_and_dashboard_still_builds() {
    let dir = TempDir::new().unwrap();
    let paths = write_raw(dir.path());
    run_tables(&paths);
    let style = ChartStyle::default();

    let png = paths.png("country_gdp_trend_ZZ");
    let outcome = plot_country_gdp_trend(&paths.intermediate_data, "zz", &png, &style).unwrap();
    assert_eq!(outcome, RenderOutcome::NoData);
    assert!(!png.exists());

    let outcome = build_dashboard(
        &paths.intermediate_data,
        &paths.global_trends_csv,
        &paths.country_summary_csv,
        "zz",
        &paths.dashboard_html,
        &style,
    )
    .unwrap();
    assert_eq!(outcome, RenderOutcome::Saved(paths.dashboard_html.clone()));
    let html = fs::read_to_string(&paths.dashboard_html).unwrap();
    assert_eq!(html.matches("Plotly.newPlot(").count(), 6);
    assert!(html.contains("\"DEU\""));
}

#[test]
fn missing_raw_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let paths = PipelinePaths::under(dir.path());
    let result = clean_data(&paths.raw_data, &paths.cleaned_data, &CleanOptions::default(), &|_: &str| -> Option<String> { None });
    assert!(result.is_err());
    assert!(!paths.cleaned_data.exists());
}
