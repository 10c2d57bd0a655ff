use econ_indicators::charts::{
    plot_country_gdp_trend, plot_country_inflation_trend, plot_crisis_years_by_country,
    plot_global_gdp_growth_trend, plot_global_inflation_trend, plot_top_countries_by_avg_gdp,
};
use econ_indicators::clean::clean_data;
use econ_indicators::config::{AnalysisParams, ChartStyle, CleanOptions, PipelinePaths};
use econ_indicators::dashboard::build_dashboard;
use econ_indicators::features::create_intermediate_dataset;
use econ_indicators::global::analyze_global_trends;
use econ_indicators::iso::CountryTable;
use econ_indicators::summary::create_country_summary;
use econ_indicators::trends::compute_country_trends;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let paths = PipelinePaths::default();
    let params = AnalysisParams::default();
    let style = ChartStyle::default();
    let suffix = params.country_id.to_uppercase();

    // Tables
    clean_data(
        &paths.raw_data,
        &paths.cleaned_data,
        &CleanOptions::default(),
        &CountryTable::new(),
    )?;
    create_intermediate_dataset(&paths.cleaned_data, &paths.intermediate_data, params.rolling_window)?;
    create_country_summary(&paths.cleaned_data, &paths.country_summary_csv)?;
    compute_country_trends(&paths.intermediate_data, &paths.country_trends_csv, params.recent_years)?;
    analyze_global_trends(&paths.intermediate_data, &paths.global_trends_csv)?;

    // Charts
    plot_global_inflation_trend(&paths.global_trends_csv, &paths.png("global_inflation_trend"), &style)?;
    plot_global_gdp_growth_trend(&paths.global_trends_csv, &paths.png("global_gdp_growth_trend"), &style)?;
    plot_top_countries_by_avg_gdp(
        &paths.country_summary_csv,
        &paths.png("top_countries_avg_gdp"),
        params.top_n,
        &style,
    )?;
    plot_crisis_years_by_country(
        &paths.country_trends_csv,
        &paths.png("crisis_years_by_country"),
        params.top_n,
        &style,
    )?;
    plot_country_gdp_trend(
        &paths.intermediate_data,
        &params.country_id,
        &paths.png(&format!("country_gdp_trend_{}", suffix)),
        &style,
    )?;
    plot_country_inflation_trend(
        &paths.intermediate_data,
        &params.country_id,
        &paths.png(&format!("country_inflation_trend_{}", suffix)),
        &style,
    )?;

    build_dashboard(
        &paths.intermediate_data,
        &paths.global_trends_csv,
        &paths.country_summary_csv,
        &params.country_id,
        &paths.dashboard_html,
        &style,
    )?;

    Ok(())
}
