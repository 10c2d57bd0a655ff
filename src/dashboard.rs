//! Single-page HTML dashboard with interactive plotly.js figures.
//!
//! Figures are assembled as plotly JSON; the page loads the plotly.js runtime
//! once and then embeds one `<div>` plus `Plotly.newPlot` call per figure.

use crate::charts::{country_rows, top_by_avg_gdp, RenderOutcome};
use crate::config::{hex, ChartStyle};
use crate::error::Result;
use crate::models::{CountrySummary, EnrichedRecord, GlobalTrend};
use crate::storage::{ensure_parent_dir, read_records};
use log::info;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const TOP_COUNTRIES: usize = 10;

#[derive(Debug, Serialize)]
pub struct Figure {
    pub data: Vec<Value>,
    pub layout: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frames: Option<Vec<Value>>,
}

/// log10 colour bounds over every strictly positive GDP value.
pub fn gdp_color_range(records: &[EnrichedRecord]) -> Option<(f64, f64)> {
    let positive = records.iter().filter_map(|r| r.gdp).filter(|&g| g > 0.0);
    let (min, max) = positive.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), g| (lo.min(g), hi.max(g)));
    if min.is_finite() {
        Some((min.log10(), max.log10()))
    } else {
        None
    }
}

fn standard_layout(title: &str, y_title: &str, style: &ChartStyle) -> Value {
    let axis = |title: Option<&str>| {
        json!({
            "showgrid": true,
            "gridcolor": hex(style.grid),
            "showline": true,
            "linecolor": hex(style.border),
            "linewidth": 1,
            "mirror": true,
            "title": { "text": title },
        })
    };
    let mut xaxis = axis(None);
    xaxis["tickangle"] = json!(45);

    json!({
        "title": { "text": title, "font": { "color": hex(style.dark) } },
        "plot_bgcolor": "white",
        "paper_bgcolor": "white",
        "font": { "color": hex(style.dark) },
        "xaxis": xaxis,
        "yaxis": axis(Some(y_title)),
        "shapes": [{
            "type": "rect",
            "xref": "paper", "yref": "paper",
            "x0": 0, "y0": 0, "x1": 1, "y1": 1,
            "line": { "color": hex(style.border), "width": 1 },
        }],
    })
}

fn line_trace(name: &str, x: Vec<i32>, y: Vec<Option<f64>>, color: &str, width: f64) -> Value {
    json!({
        "type": "scatter",
        "mode": "lines",
        "name": name,
        "x": x,
        "y": y,
        "line": { "color": color, "width": width },
    })
}

fn gdp_map(records: &[EnrichedRecord], style: &ChartStyle) -> Figure {
    let mut years: BTreeMap<i32, Vec<&EnrichedRecord>> = BTreeMap::new();
    for record in records.iter().filter(|r| r.gdp.map_or(false, |g| g > 0.0)) {
        years.entry(record.year).or_default().push(record);
    }
    let range = gdp_color_range(records);

    let frames: Vec<Value> = years
        .iter()
        .map(|(year, rows)| {
            let rows: Vec<&&EnrichedRecord> = rows.iter().filter(|r| r.country_iso3.is_some()).collect();
            json!({
                "name": year.to_string(),
                "data": [{
                    "type": "choropleth",
                    "locationmode": "ISO-3",
                    "locations": rows.iter().map(|r| r.country_iso3.clone()).collect::<Vec<_>>(),
                    "z": rows.iter().map(|r| r.gdp.map(f64::log10)).collect::<Vec<_>>(),
                    "text": rows.iter().map(|r| r.country.clone()).collect::<Vec<_>>(),
                    "coloraxis": "coloraxis",
                    "hovertemplate": "<b>%{text}</b><br>GDP (log scale)=%{z:.2f}<extra></extra>",
                }],
            })
        })
        .collect();

    let steps: Vec<Value> = years
        .keys()
        .map(|year| {
            json!({
                "method": "animate",
                "label": year.to_string(),
                "args": [[year.to_string()], {
                    "mode": "immediate",
                    "frame": { "duration": 300, "redraw": true },
                    "transition": { "duration": 0 },
                }],
            })
        })
        .collect();

    let data = frames
        .first()
        .and_then(|f| f["data"].as_array().cloned())
        .unwrap_or_default();

    let layout = json!({
        "title": { "text": "Global GDP Distribution Over Time" },
        "font": { "color": hex(style.dark) },
        "margin": { "t": 60, "b": 0 },
        "geo": {
            "showframe": false,
            "showcoastlines": false,
            "projection": { "type": "natural earth" },
        },
        "coloraxis": {
            "cmin": range.map(|r| r.0),
            "cmax": range.map(|r| r.1),
            "colorscale": [[0.0, hex(style.grid)], [0.5, hex(style.light)], [1.0, hex(style.main)]],
            "colorbar": { "title": { "text": "GDP (log scale)" } },
        },
        "sliders": [{ "active": 0, "currentvalue": { "prefix": "Year=" }, "steps": steps }],
        "updatemenus": [{
            "type": "buttons",
            "showactive": false,
            "buttons": [
                {
                    "label": "Play",
                    "method": "animate",
                    "args": [null, { "frame": { "duration": 500, "redraw": true }, "fromcurrent": true }],
                },
                {
                    "label": "Pause",
                    "method": "animate",
                    "args": [[null], { "mode": "immediate", "frame": { "duration": 0, "redraw": false } }],
                },
            ],
        }],
    });

    Figure { data, layout, frames: Some(frames) }
}

fn global_line(
    rows: &[GlobalTrend],
    title: &str,
    y_title: &str,
    value: fn(&GlobalTrend) -> Option<f64>,
    zero_line: bool,
    style: &ChartStyle,
) -> Figure {
    let trace = line_trace(
        y_title,
        rows.iter().map(|r| r.year).collect(),
        rows.iter().map(value).collect(),
        &hex(style.main),
        2.0,
    );
    let mut layout = standard_layout(title, y_title, style);
    if zero_line {
        if let Some(shapes) = layout["shapes"].as_array_mut() {
            shapes.push(json!({
                "type": "line",
                "xref": "paper", "yref": "y",
                "x0": 0, "x1": 1, "y0": 0, "y1": 0,
                "line": { "color": hex(style.reference_line), "dash": "dash" },
            }));
        }
    }
    Figure { data: vec![trace], layout, frames: None }
}

fn top_countries_bar(summaries: Vec<CountrySummary>, style: &ChartStyle) -> Figure {
    let top = top_by_avg_gdp(summaries, TOP_COUNTRIES);
    let trace = json!({
        "type": "bar",
        "x": top.iter().map(|s| s.country_name.clone()).collect::<Vec<_>>(),
        "y": top.iter().map(|s| s.avg_gdp).collect::<Vec<_>>(),
        "marker": { "color": hex(style.light) },
    });
    Figure {
        data: vec![trace],
        layout: standard_layout("Top Countries by Average GDP", "Average GDP", style),
        frames: None,
    }
}

fn country_line(
    rows: &[EnrichedRecord],
    title: String,
    metric: &str,
    y_title: &str,
    raw: fn(&EnrichedRecord) -> Option<f64>,
    rolling: fn(&EnrichedRecord) -> Option<f64>,
    style: &ChartStyle,
) -> Figure {
    let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
    let data = vec![
        line_trace(metric, years.clone(), rows.iter().map(raw).collect(), &hex(style.light), 1.8),
        line_trace("Rolling Average", years, rows.iter().map(rolling).collect(), &hex(style.main), 2.5),
    ];
    Figure { data, layout: standard_layout(&title, y_title, style), frames: None }
}

fn chart_markup(index: usize, figure: &Figure) -> Result<String> {
    // keep "</script>" inside string values from closing the tag early
    let payload = serde_json::to_string(figure)?.replace("</", "<\\/");
    Ok(format!(
        "<div id=\"chart-{i}\" style=\"width:100%;height:520px;\"></div>\n\
         <script>Plotly.newPlot(\"chart-{i}\", {payload});</script>\n",
        i = index,
        payload = payload,
    ))
}

/// Assemble the dashboard page. An unknown `country_id` leaves the two
/// country figures empty rather than failing.
pub fn build_dashboard(
    intermediate_csv: &Path,
    global_trends_csv: &Path,
    country_summary_csv: &Path,
    country_id: &str,
    output_html_path: &Path,
    style: &ChartStyle,
) -> Result<RenderOutcome> {
    let records: Vec<EnrichedRecord> = read_records(intermediate_csv)?;
    let mut global: Vec<GlobalTrend> = read_records(global_trends_csv)?;
    global.sort_by_key(|g| g.year);
    let summaries: Vec<CountrySummary> = read_records(country_summary_csv)?;

    let map = gdp_map(&records, style);
    let country = country_rows(records, country_id);
    let label = country_id.to_uppercase();

    let figures = vec![
        map,
        global_line(
            &global,
            "Global Inflation Trend Over Time",
            "Inflation (%)",
            |g| g.global_mean_inflation,
            false,
            style,
        ),
        global_line(
            &global,
            "Global GDP Growth Trend",
            "GDP Growth (%)",
            |g| g.mean_global_gdp_growth,
            true,
            style,
        ),
        top_countries_bar(summaries, style),
        country_line(
            &country,
            format!("GDP Trend for {}", label),
            "GDP",
            "GDP",
            |r| r.gdp,
            |r| r.gdp_rolling_avg,
            style,
        ),
        country_line(
            &country,
            format!("Inflation Trend for {}", label),
            "Inflation",
            "Inflation (%)",
            |r| r.inflation_cpi,
            |r| r.inflation_rolling_avg,
            style,
        ),
    ];

    let mut html = String::new();
    html.push_str("<html><head><meta charset=\"utf-8\"><title>Global Economic Indicators Dashboard</title></head><body>\n");
    html.push_str(&format!(
        "<h1 style='color:{}'>Global Economic Indicators Analysis</h1>\n",
        hex(style.dark)
    ));
    html.push_str(&format!("<script src=\"{}\" charset=\"utf-8\"></script>\n", PLOTLY_CDN));
    for (i, figure) in figures.iter().enumerate() {
        html.push_str(&chart_markup(i, figure)?);
    }
    html.push_str("</body></html>\n");

    ensure_parent_dir(output_html_path)?;
    fs::write(output_html_path, html)?;
    info!("Dashboard saved to: {}", output_html_path.display());

    Ok(RenderOutcome::Saved(output_html_path.to_path_buf()))
}
