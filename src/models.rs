use serde::{Deserialize, Deserializer, Serialize};

/// Lenient numeric cell: unparseable text, `NaN` and infinities all read as missing.
fn finite_option<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f64> = csv::invalid_option(de)?;
    Ok(value.filter(|v| v.is_finite()))
}

/// One row of the raw panel, keyed by the data source's own column names.
#[derive(Debug, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "country_name")]
    pub country: String,
    #[serde(rename = "country_id")]
    pub country_id: String,
    #[serde(rename = "year")]
    pub year: Option<String>,
    #[serde(rename = "Inflation (CPI %)", deserialize_with = "finite_option")]
    pub inflation_cpi: Option<f64>,
    #[serde(rename = "GDP (Current USD)", deserialize_with = "finite_option")]
    pub gdp: Option<f64>,
    #[serde(rename = "GDP per Capita (Current USD)", deserialize_with = "finite_option")]
    pub gdp_per_capita: Option<f64>,
    #[serde(rename = "Unemployment Rate (%)", deserialize_with = "finite_option")]
    pub unemployment_rate: Option<f64>,
    #[serde(rename = "Interest Rate (Real, %)", deserialize_with = "finite_option")]
    pub interest_rate: Option<f64>,
    #[serde(rename = "Inflation (GDP Deflator, %)", deserialize_with = "finite_option")]
    pub inflation_gdp_deflator: Option<f64>,
    #[serde(rename = "GDP Growth (% Annual)", deserialize_with = "finite_option")]
    pub gdp_growth: Option<f64>,
    #[serde(rename = "Current Account Balance (% GDP)", deserialize_with = "finite_option")]
    pub current_account: Option<f64>,
    #[serde(rename = "Government Expense (% of GDP)", deserialize_with = "finite_option")]
    pub gov_expense: Option<f64>,
    #[serde(rename = "Government Revenue (% of GDP)", deserialize_with = "finite_option")]
    pub gov_revenue: Option<f64>,
    #[serde(rename = "Tax Revenue (% of GDP)", deserialize_with = "finite_option")]
    pub tax_revenue: Option<f64>,
    #[serde(rename = "Gross National Income (USD)", deserialize_with = "finite_option")]
    pub gni: Option<f64>,
    #[serde(rename = "Public Debt (% of GDP)", deserialize_with = "finite_option")]
    pub public_debt: Option<f64>,
}

/// Raw header names, in the order the cleaner expects to find them.
pub const RAW_COLUMNS: [&str; 16] = [
    "country_name",
    "country_id",
    "year",
    "Inflation (CPI %)",
    "GDP (Current USD)",
    "GDP per Capita (Current USD)",
    "Unemployment Rate (%)",
    "Interest Rate (Real, %)",
    "Inflation (GDP Deflator, %)",
    "GDP Growth (% Annual)",
    "Current Account Balance (% GDP)",
    "Government Expense (% of GDP)",
    "Government Revenue (% of GDP)",
    "Tax Revenue (% of GDP)",
    "Gross National Income (USD)",
    "Public Debt (% of GDP)",
];

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CountryYearRecord {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Country_ID")]
    pub country_id: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Country_ISO3")]
    pub country_iso3: Option<String>,
    #[serde(rename = "Inflation_CPI")]
    pub inflation_cpi: Option<f64>,
    #[serde(rename = "GDP")]
    pub gdp: Option<f64>,
    #[serde(rename = "GDP_per_Capita")]
    pub gdp_per_capita: Option<f64>,
    #[serde(rename = "Unemployment_Rate")]
    pub unemployment_rate: Option<f64>,
    #[serde(rename = "Interest_Rate")]
    pub interest_rate: Option<f64>,
    #[serde(rename = "Inflation_GDP_Deflator")]
    pub inflation_gdp_deflator: Option<f64>,
    #[serde(rename = "GDP_Growth")]
    pub gdp_growth: Option<f64>,
    #[serde(rename = "Current_Account")]
    pub current_account: Option<f64>,
    #[serde(rename = "Gov_Expense")]
    pub gov_expense: Option<f64>,
    #[serde(rename = "Gov_Revenue")]
    pub gov_revenue: Option<f64>,
    #[serde(rename = "Tax_Revenue")]
    pub tax_revenue: Option<f64>,
    #[serde(rename = "GNI")]
    pub gni: Option<f64>,
    #[serde(rename = "Public_Debt")]
    pub public_debt: Option<f64>,
}

/// Derived per-country time-series features for one row.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Features {
    pub gdp_growth_pct: Option<f64>,
    pub inflation_pct_change: Option<f64>,
    pub gdp_rolling_avg: Option<f64>,
    pub inflation_rolling_avg: Option<f64>,
}

// csv cannot flatten nested structs, so the cleaned columns are repeated here.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EnrichedRecord {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Country_ID")]
    pub country_id: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Country_ISO3")]
    pub country_iso3: Option<String>,
    #[serde(rename = "Inflation_CPI")]
    pub inflation_cpi: Option<f64>,
    #[serde(rename = "GDP")]
    pub gdp: Option<f64>,
    #[serde(rename = "GDP_per_Capita")]
    pub gdp_per_capita: Option<f64>,
    #[serde(rename = "Unemployment_Rate")]
    pub unemployment_rate: Option<f64>,
    #[serde(rename = "Interest_Rate")]
    pub interest_rate: Option<f64>,
    #[serde(rename = "Inflation_GDP_Deflator")]
    pub inflation_gdp_deflator: Option<f64>,
    #[serde(rename = "GDP_Growth")]
    pub gdp_growth: Option<f64>,
    #[serde(rename = "Current_Account")]
    pub current_account: Option<f64>,
    #[serde(rename = "Gov_Expense")]
    pub gov_expense: Option<f64>,
    #[serde(rename = "Gov_Revenue")]
    pub gov_revenue: Option<f64>,
    #[serde(rename = "Tax_Revenue")]
    pub tax_revenue: Option<f64>,
    #[serde(rename = "GNI")]
    pub gni: Option<f64>,
    #[serde(rename = "Public_Debt")]
    pub public_debt: Option<f64>,
    #[serde(rename = "GDP_growth_pct")]
    pub gdp_growth_pct: Option<f64>,
    #[serde(rename = "Inflation_pct_change")]
    pub inflation_pct_change: Option<f64>,
    #[serde(rename = "GDP_rolling_avg")]
    pub gdp_rolling_avg: Option<f64>,
    #[serde(rename = "Inflation_rolling_avg")]
    pub inflation_rolling_avg: Option<f64>,
}

impl EnrichedRecord {
    pub fn new(record: CountryYearRecord, features: Features) -> Self {
        EnrichedRecord {
            country: record.country,
            country_id: record.country_id,
            year: record.year,
            country_iso3: record.country_iso3,
            inflation_cpi: record.inflation_cpi,
            gdp: record.gdp,
            gdp_per_capita: record.gdp_per_capita,
            unemployment_rate: record.unemployment_rate,
            interest_rate: record.interest_rate,
            inflation_gdp_deflator: record.inflation_gdp_deflator,
            gdp_growth: record.gdp_growth,
            current_account: record.current_account,
            gov_expense: record.gov_expense,
            gov_revenue: record.gov_revenue,
            tax_revenue: record.tax_revenue,
            gni: record.gni,
            public_debt: record.public_debt,
            gdp_growth_pct: features.gdp_growth_pct,
            inflation_pct_change: features.inflation_pct_change,
            gdp_rolling_avg: features.gdp_rolling_avg,
            inflation_rolling_avg: features.inflation_rolling_avg,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CountrySummary {
    #[serde(rename = "Country_ID")]
    pub country_id: String,
    pub country_name: String,
    pub avg_inflation: Option<f64>,
    pub avg_gdp: Option<f64>,
    pub avg_unemployment: Option<f64>,
    pub max_inflation: Option<f64>,
    pub min_inflation: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum TrendDirection {
    Upward,
    Downward,
}

impl TrendDirection {
    /// `Upward` only for a strictly positive change; zero or undefined is `Downward`.
    pub fn from_change(change: f64) -> Self {
        if change > 0.0 {
            TrendDirection::Upward
        } else {
            TrendDirection::Downward
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CountryTrend {
    #[serde(rename = "Country")]
    pub country: String,
    pub mean_gdp_growth_last_years: Option<f64>,
    pub gdp_volatility_std: Option<f64>,
    pub mean_inflation: Option<f64>,
    pub inflation_trend_direction: TrendDirection,
    pub crisis_year_count: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GlobalTrend {
    #[serde(rename = "Year")]
    pub year: i32,
    pub global_mean_inflation: Option<f64>,
    pub mean_global_gdp_growth: Option<f64>,
}

/// Row of a country-by-year panel, keyed for per-country partitioning.
pub trait PanelRow {
    fn country_id(&self) -> &str;
    fn year(&self) -> i32;
}

impl PanelRow for CountryYearRecord {
    fn country_id(&self) -> &str {
        &self.country_id
    }

    fn year(&self) -> i32 {
        self.year
    }
}

impl PanelRow for EnrichedRecord {
    fn country_id(&self) -> &str {
        &self.country_id
    }

    fn year(&self) -> i32 {
        self.year
    }
}
