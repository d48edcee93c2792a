use crate::dashboard::Dashboard;
use crate::errors::DataError;
use crate::models::TimeSeriesTable;
use crate::series::{epoch, parse_date_label, DateAxis};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};

/// The three source tables plus the date axis every series is aligned to.
///
/// Built once at startup; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub confirmed: TimeSeriesTable,
    pub deaths: TimeSeriesTable,
    pub recovered: TimeSeriesTable,
    pub axis: DateAxis,
}

impl Snapshot {
    /// The axis runs from the epoch through `today` or the newest confirmed
    /// column, whichever is earlier. Every table must carry every axis date.
    pub fn new(
        confirmed: TimeSeriesTable,
        deaths: TimeSeriesTable,
        recovered: TimeSeriesTable,
        today: NaiveDate,
    ) -> Result<Self, DataError> {
        let latest = confirmed
            .columns
            .labels()
            .last()
            .and_then(|label| parse_date_label(label))
            .unwrap_or(today);
        let axis = DateAxis::between(epoch(), latest.min(today));

        for table in [&confirmed, &deaths, &recovered] {
            if let Some(label) = axis.labels().iter().find(|l| !table.columns.contains(l)) {
                return Err(DataError::MissingDate {
                    table: table.name.clone(),
                    label: label.clone(),
                });
            }
        }

        let rows = confirmed.rows.len();
        if deaths.rows.len() != rows || recovered.rows.len() != rows {
            warn!(
                "source tables disagree on row count: confirmed={}, deaths={}, recovered={}",
                confirmed.rows.len(),
                deaths.rows.len(),
                recovered.rows.len()
            );
        }

        match (axis.dates().first(), axis.last()) {
            (Some(first), Some(last)) => info!("date axis {first} .. {last} ({} days)", axis.len()),
            _ => warn!("date axis is empty"),
        }

        Ok(Self {
            confirmed,
            deaths,
            recovered,
            axis,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
}

impl AppState {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Columns;
    use crate::test_support::sample_table;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tables() -> [TimeSeriesTable; 3] {
        [
            sample_table("confirmed", [[1, 2, 3], [10, 20, 30], [100, 200, 300]]),
            sample_table("deaths", [[0, 0, 1], [0, 1, 2], [1, 2, 3]]),
            sample_table("recovered", [[0, 1, 1], [2, 4, 8], [10, 20, 30]]),
        ]
    }

    #[test]
    fn axis_stops_at_latest_source_date() {
        let [c, d, r] = tables();
        let snapshot = Snapshot::new(c, d, r, day(2026, 1, 1)).unwrap();
        assert_eq!(snapshot.axis.labels(), ["1/22/20", "1/23/20", "1/24/20"]);
    }

    #[test]
    fn axis_stops_at_today_when_source_runs_ahead() {
        let [c, d, r] = tables();
        let snapshot = Snapshot::new(c, d, r, day(2020, 1, 23)).unwrap();
        assert_eq!(snapshot.axis.len(), 2);
    }

    #[test]
    fn table_missing_an_axis_date_fails_startup() {
        let [c, mut d, r] = tables();
        d.columns = Arc::new(Columns::new(
            ["1/22/20", "1/24/20", "1/25/20"].map(str::to_string).to_vec(),
        ));

        let err = Snapshot::new(c, d, r, day(2026, 1, 1)).unwrap_err();
        assert!(matches!(
            err,
            DataError::MissingDate { ref table, ref label } if table == "deaths" && label == "1/23/20"
        ));
    }
}
