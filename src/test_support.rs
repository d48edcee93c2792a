use crate::models::{Columns, RegionRow, TimeSeriesTable};
use std::sync::Arc;

/// Three rows (CountryA/StateX, CountryA/StateY, CountryB) over 1/22/20..1/24/20.
pub fn sample_table(name: &str, values: [[i64; 3]; 3]) -> TimeSeriesTable {
    let identities = [
        ("CountryA", Some("StateX")),
        ("CountryA", Some("StateY")),
        ("CountryB", None),
    ];
    let rows = identities
        .iter()
        .zip(values)
        .map(|((country, state), values)| RegionRow {
            country: country.to_string(),
            state: state.map(str::to_string),
            lat: Some(1.0),
            long: Some(2.0),
            values: values.to_vec(),
        })
        .collect();

    TimeSeriesTable {
        name: name.to_string(),
        columns: Arc::new(Columns::new(vec![
            "1/22/20".to_string(),
            "1/23/20".to_string(),
            "1/24/20".to_string(),
        ])),
        rows,
    }
}
