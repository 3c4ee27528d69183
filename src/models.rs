use serde::{Deserialize, Serialize};

/// Structured stock data as returned by the AI service.
///
/// Everything except the chart values is display-ready text; the upstream
/// formats numbers itself ("$1.2T", "+3.45%") so we never reformat here.
/// Field names follow the camelCase wire contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StockData {
    pub symbol: String,
    pub name: String,
    pub price: String,
    pub change: String,
    pub change_percent: String,
    pub market_cap: String,
    pub pe_ratio: String,
    pub description: String,
    pub sector: String,
    #[serde(rename = "high52")]
    pub high_52: String,
    #[serde(rename = "low52")]
    pub low_52: String,
    /// Chronological price points, oldest first. May be empty when no
    /// historical data is available.
    pub chart_data: Vec<ChartPoint>,
}

impl StockData {
    /// True when the change text reads as a loss ("-1.23", "-0.5%").
    pub fn is_losing(&self) -> bool {
        self.change.trim_start().starts_with('-')
    }
}

/// One point of the price chart: a display label plus the numeric value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub time: String,
    pub value: f64,
}

/// Where a piece of AI analysis was grounded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub uri: String,
    pub title: String,
}

/// Everything one search returns. `data` is None when the AI could not
/// resolve the query to a concrete instrument (ambiguous or non-financial
/// input); `analysis` is still populated in that case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub data: Option<StockData>,
    pub analysis: String,
    pub sources: Vec<SourceRef>,
}
