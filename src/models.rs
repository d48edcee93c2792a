use chrono::NaiveDate;
use serde::Serialize;
use std::{collections::HashMap, sync::Arc};

/// One location row of a wide time-series table.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionRow {
    pub country: String,
    pub state: Option<String>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    /// Cumulative counts, one per date column.
    pub values: Vec<i64>,
}

impl RegionRow {
    /// The value of the final date column.
    pub fn latest(&self) -> i64 {
        self.values.last().copied().unwrap_or(0)
    }
}

/// The `M/D/YY` date column labels of a table and their positions.
#[derive(Debug, Clone, Default)]
pub struct Columns {
    labels: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Columns {
    pub fn new(labels: Vec<String>) -> Self {
        let positions = labels
            .iter()
            .enumerate()
            .map(|(idx, label)| (label.clone(), idx))
            .collect();
        Self { labels, positions }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.positions.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct TimeSeriesTable {
    pub name: String,
    pub columns: Arc<Columns>,
    pub rows: Vec<RegionRow>,
}

/// Which rows of a table a location covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationQuery {
    Country(String),
    OutsideCountry(String),
    State(String),
    Global,
}

impl LocationQuery {
    pub fn matches(&self, row: &RegionRow) -> bool {
        match self {
            LocationQuery::Country(name) => row.country == *name,
            LocationQuery::OutsideCountry(name) => row.country != *name,
            LocationQuery::State(name) => row.state.as_deref() == Some(name.as_str()),
            LocationQuery::Global => true,
        }
    }

    /// Sub-regions are read from their single row; everything else is summed.
    pub fn aggregated(&self) -> bool {
        !matches!(self, LocationQuery::State(_))
    }

    pub fn describe(&self) -> String {
        match self {
            LocationQuery::Country(name) => name.clone(),
            LocationQuery::OutsideCountry(name) => format!("outside {name}"),
            LocationQuery::State(name) => format!("state {name}"),
            LocationQuery::Global => "global".to_string(),
        }
    }
}

/// Rows of one table matching a query, plus their column-wise sum.
#[derive(Debug, Clone)]
pub struct LocationSlice {
    pub table: String,
    pub query: LocationQuery,
    pub columns: Arc<Columns>,
    pub rows: Vec<RegionRow>,
    pub total: Vec<i64>,
}

impl LocationSlice {
    pub fn latest_total(&self) -> i64 {
        self.total.last().copied().unwrap_or(0)
    }
}

/// The same query applied to the confirmed, deaths and recovered tables.
#[derive(Debug, Clone)]
pub struct LocationSlices {
    pub confirmed: LocationSlice,
    pub deaths: LocationSlice,
    pub recovered: LocationSlice,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySeries {
    pub values: Vec<i64>,
}

impl DailySeries {
    /// Day-over-day change; the first day counts from zero.
    pub fn increments(&self) -> Vec<i64> {
        let mut previous = 0;
        self.values
            .iter()
            .map(|&value| {
                let delta = value - previous;
                previous = value;
                delta
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregateTotals {
    pub confirmed: i64,
    pub deaths: i64,
    pub recovered: i64,
}

impl AggregateTotals {
    /// `recovered / (recovered + deaths)`, undefined when both are zero.
    pub fn recovery_rate(&self) -> Option<f64> {
        let closed = self.recovered + self.deaths;
        if closed == 0 {
            return None;
        }
        Some(self.recovered as f64 / closed as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryCases {
    pub country: String,
    pub cases: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionCases {
    pub region: String,
    pub cases: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub country: String,
    pub state: Option<String>,
    pub lat: f64,
    pub long: f64,
    pub cases: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesPoint {
    pub cumulative: Vec<i64>,
    pub daily: Vec<i64>,
}

impl From<&DailySeries> for SeriesPoint {
    fn from(series: &DailySeries) -> Self {
        Self {
            cumulative: series.values.clone(),
            daily: series.increments(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TotalsResponse {
    pub label: String,
    pub confirmed: i64,
    pub deaths: i64,
    pub recovered: i64,
    pub recovery_rate: Option<f64>,
}

impl TotalsResponse {
    pub fn new(label: impl Into<String>, totals: AggregateTotals) -> Self {
        Self {
            label: label.into(),
            confirmed: totals.confirmed,
            deaths: totals.deaths,
            recovered: totals.recovered,
            recovery_rate: totals.recovery_rate(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub updated: Option<NaiveDate>,
    pub global: TotalsResponse,
    pub headline: TotalsResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationEntry {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationResponse {
    pub key: String,
    pub totals: TotalsResponse,
    pub dates: Vec<NaiveDate>,
    pub confirmed: SeriesPoint,
    pub deaths: SeriesPoint,
    pub recovered: SeriesPoint,
}

#[derive(Debug, Clone, Serialize)]
pub struct CountriesResponse {
    pub excluded_country: String,
    pub upper_threshold: i64,
    pub lower_threshold: i64,
    pub high_infection: Vec<CountryCases>,
    pub low_infection: Vec<CountryCases>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionsResponse {
    pub country: String,
    pub regions: Vec<RegionCases>,
}
