use crate::models::{LocationQuery, LocationSlice, LocationSlices, TimeSeriesTable};
use crate::state::Snapshot;

/// Selects the rows of `table` covered by `query` and sums them column-wise.
///
/// Matching is exact and case-sensitive. A query that matches nothing yields
/// an empty slice whose total row is all zeros.
pub fn filter(table: &TimeSeriesTable, query: &LocationQuery) -> LocationSlice {
    let rows: Vec<_> = table
        .rows
        .iter()
        .filter(|row| query.matches(row))
        .cloned()
        .collect();

    let mut total = vec![0i64; table.columns.len()];
    for row in &rows {
        for (sum, value) in total.iter_mut().zip(&row.values) {
            *sum += value;
        }
    }

    LocationSlice {
        table: table.name.clone(),
        query: query.clone(),
        columns: table.columns.clone(),
        rows,
        total,
    }
}

pub fn filter_by_country(table: &TimeSeriesTable, name: &str, negate: bool) -> LocationSlice {
    let query = if negate {
        LocationQuery::OutsideCountry(name.to_string())
    } else {
        LocationQuery::Country(name.to_string())
    };
    filter(table, &query)
}

pub fn filter_by_state(table: &TimeSeriesTable, name: &str) -> LocationSlice {
    filter(table, &LocationQuery::State(name.to_string()))
}

/// Applies one query to all three tables of the snapshot.
pub fn filter_all(snapshot: &Snapshot, query: &LocationQuery) -> LocationSlices {
    LocationSlices {
        confirmed: filter(&snapshot.confirmed, query),
        deaths: filter(&snapshot.deaths, query),
        recovered: filter(&snapshot.recovered, query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_table;

    #[test]
    fn country_slice_sums_matching_rows() {
        let table = sample_table("confirmed", [[1, 2, 3], [10, 20, 30], [100, 200, 300]]);
        let slice = filter_by_country(&table, "CountryA", false);

        assert_eq!(slice.rows.len(), 2);
        assert_eq!(slice.total, vec![11, 22, 33]);
        assert_eq!(slice.latest_total(), 33);
    }

    #[test]
    fn unknown_country_is_all_zero() {
        let table = sample_table("confirmed", [[1, 2, 3], [10, 20, 30], [100, 200, 300]]);
        let slice = filter_by_country(&table, "NoSuchCountry", false);

        assert!(slice.rows.is_empty());
        assert_eq!(slice.total, vec![0, 0, 0]);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let table = sample_table("confirmed", [[1, 2, 3], [10, 20, 30], [100, 200, 300]]);
        assert!(filter_by_country(&table, "countrya", false).rows.is_empty());
        assert!(filter_by_state(&table, "statex").rows.is_empty());
    }

    #[test]
    fn negated_filter_is_the_complement() {
        let table = sample_table("confirmed", [[1, 2, 3], [10, 20, 30], [100, 200, 300]]);
        let inside = filter_by_country(&table, "CountryA", false);
        let outside = filter_by_country(&table, "CountryA", true);

        assert_eq!(inside.rows.len() + outside.rows.len(), table.rows.len());
        for row in &table.rows {
            let in_inside = inside.rows.contains(row);
            let in_outside = outside.rows.contains(row);
            assert!(in_inside != in_outside, "row {row:?} must be in exactly one side");
        }
        assert_eq!(outside.total, vec![100, 200, 300]);
    }

    #[test]
    fn state_filter_matches_sub_region_only() {
        let table = sample_table("confirmed", [[1, 2, 3], [10, 20, 30], [100, 200, 300]]);
        let slice = filter_by_state(&table, "StateX");

        assert_eq!(slice.rows.len(), 1);
        assert_eq!(slice.total, vec![1, 2, 3]);
        assert!(filter_by_state(&table, "CountryB").rows.is_empty());
    }
}
