use crate::models::{
    AggregateTotals, CountryCases, LocationSlices, MapPoint, RegionCases, TimeSeriesTable,
};
use std::collections::BTreeMap;

/// Latest totals of each of the three slices.
pub fn totals(slices: &LocationSlices) -> AggregateTotals {
    AggregateTotals {
        confirmed: slices.confirmed.latest_total(),
        deaths: slices.deaths.latest_total(),
        recovered: slices.recovered.latest_total(),
    }
}

/// Latest totals summed per country, ordered by country name.
pub fn cases_by_country(table: &TimeSeriesTable) -> Vec<CountryCases> {
    let mut grouped: BTreeMap<&str, i64> = BTreeMap::new();
    for row in &table.rows {
        *grouped.entry(row.country.as_str()).or_default() += row.latest();
    }

    grouped
        .into_iter()
        .map(|(country, cases)| CountryCases {
            country: country.to_string(),
            cases,
        })
        .collect()
}

pub fn high_infection(grouped: &[CountryCases], upper: i64, excluded: &str) -> Vec<CountryCases> {
    grouped
        .iter()
        .filter(|entry| entry.cases > upper && entry.country != excluded)
        .cloned()
        .collect()
}

pub fn low_infection(grouped: &[CountryCases], lower: i64) -> Vec<CountryCases> {
    grouped
        .iter()
        .filter(|entry| entry.cases < lower)
        .cloned()
        .collect()
}

/// Per-province latest totals of one country, in table order. Rows without a
/// province are labelled with the country name.
pub fn region_breakdown(table: &TimeSeriesTable, country: &str) -> Vec<RegionCases> {
    table
        .rows
        .iter()
        .filter(|row| row.country == country)
        .map(|row| RegionCases {
            region: row.state.clone().unwrap_or_else(|| row.country.clone()),
            cases: row.latest(),
        })
        .collect()
}

pub fn map_points(table: &TimeSeriesTable) -> Vec<MapPoint> {
    table
        .rows
        .iter()
        .filter(|row| row.latest() > 0)
        .filter_map(|row| {
            Some(MapPoint {
                country: row.country.clone(),
                state: row.state.clone(),
                lat: row.lat?,
                long: row.long?,
                cases: row.latest(),
            })
        })
        .collect()
}
