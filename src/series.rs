use crate::errors::DataError;
use crate::models::{DailySeries, LocationSlice};
use chrono::{Datelike, Duration, NaiveDate};

/// First day covered by the source tables.
pub fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 22).expect("valid epoch date")
}

/// Formats a date the way the source tables label their columns: `M/D/YY`,
/// without zero padding on month or day.
pub fn date_label(date: NaiveDate) -> String {
    format!(
        "{}/{}/{:02}",
        date.month(),
        date.day(),
        date.year().rem_euclid(100)
    )
}

/// Inverse of [`date_label`]. Two-digit years are read as 20YY.
pub fn parse_date_label(label: &str) -> Option<NaiveDate> {
    let mut parts = label.trim().split('/');
    let month = parts.next()?.parse::<u32>().ok()?;
    let day = parts.next()?.parse::<u32>().ok()?;
    let year = parts.next()?;
    if parts.next().is_some() || year.len() != 2 {
        return None;
    }
    let year = 2000 + year.parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Consecutive calendar days, paired with their column labels.
#[derive(Debug, Clone, Default)]
pub struct DateAxis {
    dates: Vec<NaiveDate>,
    labels: Vec<String>,
}

impl DateAxis {
    /// Every day from `start` through `end`, inclusive. Empty when `end` is
    /// before `start`.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        let days = (end - start).num_days();
        let dates: Vec<NaiveDate> = (0..=days).map(|offset| start + Duration::days(offset)).collect();
        let labels = dates.iter().copied().map(date_label).collect();
        Self { dates, labels }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Reads one value per axis date out of a slice.
///
/// With `aggregated` the synthetic total row is used; otherwise the slice must
/// hold exactly one row.
pub fn build_series(
    slice: &LocationSlice,
    axis: &DateAxis,
    aggregated: bool,
) -> Result<DailySeries, DataError> {
    let source = if aggregated {
        &slice.total
    } else {
        match slice.rows.as_slice() {
            [row] => &row.values,
            rows => {
                return Err(DataError::AmbiguousLocation {
                    location: slice.query.describe(),
                    matches: rows.len(),
                });
            }
        }
    };

    let values = axis
        .labels()
        .iter()
        .map(|label| {
            slice
                .columns
                .position(label)
                .and_then(|idx| source.get(idx).copied())
                .ok_or_else(|| DataError::MissingDate {
                    table: slice.table.clone(),
                    label: label.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DailySeries { values })
}
