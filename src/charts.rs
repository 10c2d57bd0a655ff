use crate::config::ChartStyle;
use crate::error::{PipelineError, Result};
use crate::models::{CountrySummary, CountryTrend, EnrichedRecord, GlobalTrend};
use crate::storage::{ensure_parent_dir, read_records};
use log::{info, warn};
use ordered_float::NotNan;
use plotters::prelude::*;
use std::cmp::Reverse;
use std::error::Error;
use std::path::{Path, PathBuf};

const LINE_CHART_SIZE: (u32, u32) = (1000, 500);
const BAR_CHART_SIZE: (u32, u32) = (1000, 600);

#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    Saved(PathBuf),
    /// Nothing matched the requested data; no file was written.
    NoData,
}

struct Series<'a> {
    label: Option<&'a str>,
    points: Vec<(i32, f64)>,
    color: RGBColor,
    width: u32,
}

struct LineChart<'a> {
    title: String,
    y_desc: &'a str,
    series: Vec<Series<'a>>,
    zero_line: bool,
}

/// Descending by average GDP; countries without one sort last. Ties keep input order.
pub fn top_by_avg_gdp(mut summaries: Vec<CountrySummary>, top_n: usize) -> Vec<CountrySummary> {
    summaries.sort_by_key(|s| Reverse(s.avg_gdp.and_then(|v| NotNan::new(v).ok())));
    summaries.truncate(top_n);
    summaries
}

/// Descending by crisis year count. Ties keep input order.
pub fn top_by_crisis_years(mut trends: Vec<CountryTrend>, top_n: usize) -> Vec<CountryTrend> {
    trends.sort_by_key(|t| Reverse(t.crisis_year_count));
    trends.truncate(top_n);
    trends
}

/// Year-ordered rows of one country; empty if the id is unknown.
pub fn country_rows(records: Vec<EnrichedRecord>, country_id: &str) -> Vec<EnrichedRecord> {
    let mut rows: Vec<EnrichedRecord> = records
        .into_iter()
        .filter(|r| r.country_id == country_id)
        .collect();
    rows.sort_by_key(|r| r.year);
    rows
}

fn padded(min: f64, max: f64) -> std::ops::Range<f64> {
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let pad = if max > min { (max - min) * 0.05 } else { min.abs().max(1.0) * 0.05 };
    (min - pad)..(max + pad)
}

fn draw_line_chart(output: &Path, plan: &LineChart, style: &ChartStyle) -> std::result::Result<(), Box<dyn Error>> {
    let all_points = plan.series.iter().flat_map(|s| s.points.iter());
    let (mut min_year, mut max_year) = (i32::MAX, i32::MIN);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(year, value) in all_points {
        min_year = min_year.min(year);
        max_year = max_year.max(year);
        min_y = min_y.min(value);
        max_y = max_y.max(value);
    }
    if plan.zero_line {
        min_y = min_y.min(0.0);
        max_y = max_y.max(0.0);
    }
    let year_span = (max_year - min_year).max(1);

    let root = BitMapBackend::new(output, LINE_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&plan.title, ("sans-serif", 24).into_font().color(&style.dark))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(min_year..(min_year + year_span), padded(min_y, max_y))?;

    // one tick every second year
    chart
        .configure_mesh()
        .x_labels((year_span / 2 + 1) as usize)
        .x_label_formatter(&|year| year.to_string())
        .light_line_style(&style.grid)
        .bold_line_style(&style.grid)
        .axis_style(&style.border)
        .x_desc("Year")
        .y_desc(plan.y_desc)
        .draw()?;

    if plan.zero_line {
        chart.draw_series(LineSeries::new(
            vec![(min_year, 0.0), (min_year + year_span, 0.0)],
            &style.reference_line,
        ))?;
    }

    let mut labelled = false;
    for series in &plan.series {
        let color = series.color;
        let drawn = chart.draw_series(LineSeries::new(
            series.points.iter().copied(),
            color.stroke_width(series.width),
        ))?;
        if let Some(label) = series.label {
            labelled = true;
            drawn
                .label(label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }
    }

    if labelled {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

fn draw_bar_chart(
    output: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    bars: &[(String, f64)],
    color: RGBColor,
    style: &ChartStyle,
) -> std::result::Result<(), Box<dyn Error>> {
    let max_value = bars.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    let y_max = if max_value > 0.0 { max_value * 1.1 } else { 1.0 };

    let root = BitMapBackend::new(output, BAR_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24).into_font().color(&style.dark))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d((0u32..bars.len() as u32).into_segmented(), 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len())
        .x_label_formatter(&|segment| match segment {
            SegmentValue::CenterOf(i) => bars
                .get(*i as usize)
                .map(|(name, _)| name.clone())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .light_line_style(&style.grid)
        .bold_line_style(&style.grid)
        .axis_style(&style.border)
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(color.filled())
            .margin(8)
            .data(bars.iter().enumerate().map(|(i, (_, v))| (i as u32, *v))),
    )?;

    root.present()?;
    Ok(())
}

fn render(output: &Path, draw: impl FnOnce() -> std::result::Result<(), Box<dyn Error>>) -> Result<RenderOutcome> {
    ensure_parent_dir(output)?;
    draw().map_err(|e| PipelineError::Plot(e.to_string()))?;
    info!("Chart saved to: {}", output.display());
    Ok(RenderOutcome::Saved(output.to_path_buf()))
}

fn global_series(rows: &[GlobalTrend], value: impl Fn(&GlobalTrend) -> Option<f64>) -> Vec<(i32, f64)> {
    rows.iter().filter_map(|r| value(r).map(|v| (r.year, v))).collect()
}

fn country_series(rows: &[EnrichedRecord], value: impl Fn(&EnrichedRecord) -> Option<f64>) -> Vec<(i32, f64)> {
    rows.iter().filter_map(|r| value(r).map(|v| (r.year, v))).collect()
}

fn read_global(input_path: &Path) -> Result<Vec<GlobalTrend>> {
    let mut rows: Vec<GlobalTrend> = read_records(input_path)?;
    rows.sort_by_key(|r| r.year);
    Ok(rows)
}

pub fn plot_global_inflation_trend(input_path: &Path, output_path: &Path, style: &ChartStyle) -> Result<RenderOutcome> {
    let rows = read_global(input_path)?;
    let points = global_series(&rows, |r| r.global_mean_inflation);
    if points.is_empty() {
        warn!("No global inflation data in {}", input_path.display());
        return Ok(RenderOutcome::NoData);
    }

    let plan = LineChart {
        title: "Global Inflation Trend Over Time".to_string(),
        y_desc: "Inflation (%)",
        series: vec![Series { label: None, points, color: style.main, width: 2 }],
        zero_line: false,
    };
    render(output_path, || draw_line_chart(output_path, &plan, style))
}

pub fn plot_global_gdp_growth_trend(input_path: &Path, output_path: &Path, style: &ChartStyle) -> Result<RenderOutcome> {
    let rows = read_global(input_path)?;
    let points = global_series(&rows, |r| r.mean_global_gdp_growth);
    if points.is_empty() {
        warn!("No global GDP growth data in {}", input_path.display());
        return Ok(RenderOutcome::NoData);
    }

    let plan = LineChart {
        title: "Global GDP Growth Trend".to_string(),
        y_desc: "GDP Growth (%)",
        series: vec![Series { label: None, points, color: style.main, width: 2 }],
        zero_line: true,
    };
    render(output_path, || draw_line_chart(output_path, &plan, style))
}

pub fn plot_top_countries_by_avg_gdp(
    input_path: &Path,
    output_path: &Path,
    top_n: usize,
    style: &ChartStyle,
) -> Result<RenderOutcome> {
    let summaries: Vec<CountrySummary> = read_records(input_path)?;
    let bars: Vec<(String, f64)> = top_by_avg_gdp(summaries, top_n)
        .into_iter()
        .map(|s| (s.country_name, s.avg_gdp.unwrap_or(0.0)))
        .collect();
    if bars.is_empty() {
        warn!("No country summaries in {}", input_path.display());
        return Ok(RenderOutcome::NoData);
    }

    let title = format!("Top {} Countries by Average GDP", top_n);
    render(output_path, || {
        draw_bar_chart(output_path, &title, "Country", "Average GDP", &bars, style.light, style)
    })
}

pub fn plot_crisis_years_by_country(
    input_path: &Path,
    output_path: &Path,
    top_n: usize,
    style: &ChartStyle,
) -> Result<RenderOutcome> {
    let trends: Vec<CountryTrend> = read_records(input_path)?;
    let bars: Vec<(String, f64)> = top_by_crisis_years(trends, top_n)
        .into_iter()
        .map(|t| (t.country, t.crisis_year_count as f64))
        .collect();
    if bars.is_empty() {
        warn!("No country trends in {}", input_path.display());
        return Ok(RenderOutcome::NoData);
    }

    render(output_path, || {
        draw_bar_chart(
            output_path,
            "Countries with Most Crisis Years",
            "Country",
            "Number of Crisis Years",
            &bars,
            style.dark,
            style,
        )
    })
}

fn plot_country_trend(
    input_path: &Path,
    country_id: &str,
    output_path: &Path,
    style: &ChartStyle,
    metric: &str,
    y_desc: &str,
    raw: fn(&EnrichedRecord) -> Option<f64>,
    rolling: fn(&EnrichedRecord) -> Option<f64>,
) -> Result<RenderOutcome> {
    let records: Vec<EnrichedRecord> = read_records(input_path)?;
    let rows = country_rows(records, country_id);
    if rows.is_empty() {
        warn!("No data found for country_id: {}", country_id);
        return Ok(RenderOutcome::NoData);
    }

    let plan = LineChart {
        title: format!("{} Trend for {}", metric, country_id),
        y_desc,
        series: vec![
            Series { label: Some(metric), points: country_series(&rows, raw), color: style.light, width: 2 },
            Series { label: Some("Rolling Average"), points: country_series(&rows, rolling), color: style.main, width: 3 },
        ],
        zero_line: false,
    };
    if plan.series.iter().all(|s| s.points.is_empty()) {
        warn!("No {} values for country_id: {}", metric, country_id);
        return Ok(RenderOutcome::NoData);
    }
    render(output_path, || draw_line_chart(output_path, &plan, style))
}

pub fn plot_country_gdp_trend(
    input_path: &Path,
    country_id: &str,
    output_path: &Path,
    style: &ChartStyle,
) -> Result<RenderOutcome> {
    plot_country_trend(input_path, country_id, output_path, style, "GDP", "GDP", |r| r.gdp, |r| r.gdp_rolling_avg)
}

pub fn plot_country_inflation_trend(
    input_path: &Path,
    country_id: &str,
    output_path: &Path,
    style: &ChartStyle,
) -> Result<RenderOutcome> {
    plot_country_trend(
        input_path,
        country_id,
        output_path,
        style,
        "Inflation",
        "Inflation (%)",
        |r| r.inflation_cpi,
        |r| r.inflation_rolling_avg,
    )
}
