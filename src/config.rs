use plotters::style::RGBColor;
use std::path::{Path, PathBuf};

/// File layout of one pipeline run, rooted at a base directory.
#[derive(Debug, Clone)]
pub struct PipelinePaths {
    pub raw_data: PathBuf,
    pub cleaned_data: PathBuf,
    pub intermediate_data: PathBuf,
    pub country_summary_csv: PathBuf,
    pub country_trends_csv: PathBuf,
    pub global_trends_csv: PathBuf,
    pub png_dir: PathBuf,
    pub dashboard_html: PathBuf,
}

impl PipelinePaths {
    pub fn under(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        let data_dir = base.join("data");
        let csv_dir = base.join("outputs").join("csv");

        PipelinePaths {
            raw_data: data_dir.join("raw").join("dataset.csv"),
            cleaned_data: data_dir.join("cleaned").join("cleaned_data.csv"),
            intermediate_data: data_dir.join("intermediate").join("intermediate_data.csv"),
            country_summary_csv: csv_dir.join("country_summary.csv"),
            country_trends_csv: csv_dir.join("country_trends.csv"),
            global_trends_csv: csv_dir.join("global_trends.csv"),
            png_dir: base.join("outputs").join("png"),
            dashboard_html: base.join("docs").join("index.html"),
        }
    }

    pub fn png(&self, name: &str) -> PathBuf {
        self.png_dir.join(format!("{}.png", name))
    }
}

impl Default for PipelinePaths {
    fn default() -> Self {
        PipelinePaths::under(".")
    }
}

/// How missing critical indicators are filled during cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMethod {
    /// Carry the previous row's value forward.
    Forward,
    /// Pull the next row's value backward.
    Backward,
}

#[derive(Debug, Clone, Copy)]
pub struct CleanOptions {
    pub drop_missing: bool,
    pub fill: Option<FillMethod>,
    pub save: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        CleanOptions {
            drop_missing: true,
            fill: None,
            save: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisParams {
    pub rolling_window: usize,
    pub recent_years: usize,
    pub top_n: usize,
    pub country_id: String,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        AnalysisParams {
            rolling_window: 5,
            recent_years: 5,
            top_n: 10,
            country_id: "tr".to_string(),
        }
    }
}

/// Pastel turquoise palette shared by the PNG charts and the dashboard.
#[derive(Debug, Clone, Copy)]
pub struct ChartStyle {
    pub main: RGBColor,
    pub light: RGBColor,
    pub dark: RGBColor,
    pub grid: RGBColor,
    pub reference_line: RGBColor,
    pub border: RGBColor,
}

impl Default for ChartStyle {
    fn default() -> Self {
        ChartStyle {
            main: RGBColor(0x5F, 0xA8, 0xA8),
            light: RGBColor(0x9E, 0xD6, 0xD6),
            dark: RGBColor(0x3E, 0x7C, 0x7C),
            grid: RGBColor(0xE6, 0xF2, 0xF2),
            reference_line: RGBColor(0x7A, 0x7A, 0x7A),
            border: RGBColor(0x00, 0x00, 0x00),
        }
    }
}

/// `#RRGGBB` form of a palette color, for HTML and plotly layouts.
pub fn hex(color: RGBColor) -> String {
    let RGBColor(r, g, b) = color;
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_expected_files() {
        let paths = PipelinePaths::under("/tmp/run");
        assert_eq!(paths.raw_data, PathBuf::from("/tmp/run/data/raw/dataset.csv"));
        assert_eq!(
            paths.global_trends_csv,
            PathBuf::from("/tmp/run/outputs/csv/global_trends.csv")
        );
        assert_eq!(
            paths.png("country_gdp_trend_TR"),
            PathBuf::from("/tmp/run/outputs/png/country_gdp_trend_TR.png")
        );
    }

    #[test]
    fn palette_renders_as_hex() {
        let style = ChartStyle::default();
        assert_eq!(hex(style.main), "#5FA8A8");
        assert_eq!(hex(style.grid), "#E6F2F2");
        assert_eq!(hex(style.border), "#000000");
    }
}
