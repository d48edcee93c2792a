use crate::config::Settings;
use crate::errors::DataError;
use crate::models::{Columns, RegionRow, TimeSeriesTable};
use crate::series::parse_date_label;
use crate::state::Snapshot;
use chrono::{Local, NaiveDate};
use std::{path::Path, sync::Arc};
use tokio::fs;
use tracing::info;

const COUNTRY_COLUMN: &str = "Country/Region";
const STATE_COLUMN: &str = "Province/State";
const LAT_COLUMN: &str = "Lat";
const LONG_COLUMN: &str = "Long";

/// Fetches the three tables concurrently and assembles the startup snapshot.
pub async fn load_snapshot(settings: &Settings) -> Result<Snapshot, DataError> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("outbreak-dashboard/", env!("CARGO_PKG_VERSION")))
        .timeout(settings.fetch_timeout)
        .build()
        .map_err(|err| DataError::fetch("http client", err))?;

    let sources = &settings.sources;
    let (confirmed, deaths, recovered) = tokio::try_join!(
        load_table(&client, "confirmed", &sources.confirmed),
        load_table(&client, "deaths", &sources.deaths),
        load_table(&client, "recovered", &sources.recovered),
    )?;

    Snapshot::new(confirmed, deaths, recovered, Local::now().date_naive())
}

async fn load_table(
    client: &reqwest::Client,
    name: &str,
    location: &str,
) -> Result<TimeSeriesTable, DataError> {
    let text = fetch_text(client, location).await?;
    let table = parse_table(name, &text).map_err(|reason| DataError::fetch(location, reason))?;
    info!(
        "loaded {name} table from {location}: {} rows, {} date columns",
        table.rows.len(),
        table.columns.len()
    );
    Ok(table)
}

async fn fetch_text(client: &reqwest::Client, location: &str) -> Result<String, DataError> {
    if !is_remote(location) {
        return fs::read_to_string(Path::new(location))
            .await
            .map_err(|err| DataError::fetch(location, err));
    }

    let response = client
        .get(location)
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(|err| DataError::fetch(location, describe_http_error(&err)))?;
    response
        .text()
        .await
        .map_err(|err| DataError::fetch(location, err))
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

fn describe_http_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("timed out: {err}")
    } else {
        err.to_string()
    }
}

/// Parses a wide CSV table: identity columns followed by one `M/D/YY` column
/// per day. Columns that are neither are ignored.
pub fn parse_table(name: &str, text: &str) -> Result<TimeSeriesTable, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|err| format!("unreadable header: {err}"))?
        .clone();
    let find = |column: &str| headers.iter().position(|h| h == column);
    let require = |column: &str| find(column).ok_or_else(|| format!("missing column {column}"));

    let country_idx = require(COUNTRY_COLUMN)?;
    let lat_idx = require(LAT_COLUMN)?;
    let long_idx = require(LONG_COLUMN)?;
    let state_idx = find(STATE_COLUMN);

    let mut dated: Vec<(usize, NaiveDate, String)> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, h)| parse_date_label(h).map(|date| (idx, date, h.to_string())))
        .collect();
    if dated.is_empty() {
        return Err("no date columns".to_string());
    }
    dated.sort_by_key(|(_, date, _)| *date);

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|err| format!("row {}: {err}", line + 1))?;
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let values = dated
            .iter()
            .map(|(idx, _, label)| {
                parse_count(field(*idx))
                    .map_err(|err| format!("row {} column {label}: {err}", line + 1))
            })
            .collect::<Result<Vec<_>, _>>()?;

        rows.push(RegionRow {
            country: field(country_idx).to_string(),
            state: state_idx
                .map(field)
                .filter(|state| !state.is_empty())
                .map(str::to_string),
            lat: field(lat_idx).parse().ok(),
            long: field(long_idx).parse().ok(),
            values,
        });
    }

    Ok(TimeSeriesTable {
        name: name.to_string(),
        columns: Arc::new(Columns::new(
            dated.into_iter().map(|(_, _, label)| label).collect(),
        )),
        rows,
    })
}

/// Counts are integers, but some revisions of the dataset publish them as
/// `123.0`; blanks count as zero.
fn parse_count(raw: &str) -> Result<i64, String> {
    if raw.is_empty() {
        return Ok(0);
    }
    if let Ok(value) = raw.parse::<i64>() {
        return Ok(value);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => Ok(value as i64),
        _ => Err(format!("invalid count {raw:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const SAMPLE: &str = "\
Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,1/24/20
StateX,CountryA,10.5,20.25,1,2,3
StateY,CountryA,11,21,10,20,30
,CountryB,,,100,200,300
,\"Korea, South\",35.9,127.7,1,1,2
";

    #[test]
    fn parses_identity_and_date_columns() {
        let table = parse_table("confirmed", SAMPLE).unwrap();

        assert_eq!(table.columns.labels(), ["1/22/20", "1/23/20", "1/24/20"]);
        assert_eq!(table.rows.len(), 4);

        let first = &table.rows[0];
        assert_eq!(first.country, "CountryA");
        assert_eq!(first.state.as_deref(), Some("StateX"));
        assert_eq!(first.lat, Some(10.5));
        assert_eq!(first.values, vec![1, 2, 3]);
        assert_eq!(first.latest(), 3);

        let b = &table.rows[2];
        assert_eq!(b.state, None);
        assert_eq!(b.lat, None);

        assert_eq!(table.rows[3].country, "Korea, South");
    }

    #[test]
    fn state_column_is_optional() {
        let text = "Country/Region,Lat,Long,1/22/20\nCountryA,1,2,5\n";
        let table = parse_table("deaths", text).unwrap();
        assert_eq!(table.rows[0].state, None);
        assert_eq!(table.rows[0].values, vec![5]);
    }

    #[test]
    fn date_columns_are_put_in_calendar_order() {
        let text = "Country/Region,Lat,Long,1/23/20,1/22/20\nCountryA,1,2,7,5\n";
        let table = parse_table("deaths", text).unwrap();
        assert_eq!(table.columns.labels(), ["1/22/20", "1/23/20"]);
        assert_eq!(table.rows[0].values, vec![5, 7]);
    }

    #[test]
    fn rejects_missing_identity_columns() {
        let err = parse_table("confirmed", "Country,Lat,Long,1/22/20\nA,1,2,3\n").unwrap_err();
        assert!(err.contains("Country/Region"));

        let err = parse_table("confirmed", "Country/Region,Lat,1/22/20\nA,1,3\n").unwrap_err();
        assert!(err.contains("Long"));
    }

    #[test]
    fn rejects_tables_without_dates_or_bad_counts() {
        let err = parse_table("confirmed", "Country/Region,Lat,Long\nA,1,2\n").unwrap_err();
        assert_eq!(err, "no date columns");

        let err =
            parse_table("confirmed", "Country/Region,Lat,Long,1/22/20\nA,1,2,lots\n").unwrap_err();
        assert!(err.contains("invalid count"));
    }

    #[test]
    fn counts_accept_blank_and_float_forms() {
        assert_eq!(parse_count(""), Ok(0));
        assert_eq!(parse_count("42"), Ok(42));
        assert_eq!(parse_count("42.0"), Ok(42));
        assert!(parse_count("42.5").is_err());
    }

    #[tokio::test]
    async fn missing_local_source_is_a_fetch_error() {
        let client = reqwest::Client::new();
        let err = load_table(&client, "confirmed", "/nonexistent/confirmed.csv")
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Fetch { ref origin, .. } if origin == "/nonexistent/confirmed.csv"));
    }

    #[tokio::test]
    async fn unresponsive_remote_source_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            std::future::pending::<()>().await;
        });

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        let location = format!("http://{addr}/confirmed.csv");
        let err = load_table(&client, "confirmed", &location).await.unwrap_err();

        assert!(matches!(
            err,
            DataError::Fetch { ref origin, ref reason } if *origin == location && reason.starts_with("timed out")
        ));
    }

    #[tokio::test]
    async fn remote_error_status_is_a_fetch_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                .await
                .unwrap();
        });

        let client = reqwest::Client::new();
        let location = format!("http://{addr}/deaths.csv");
        let err = load_table(&client, "deaths", &location).await.unwrap_err();

        assert!(matches!(
            err,
            DataError::Fetch { ref origin, ref reason } if *origin == location && reason.contains("404")
        ));
    }
}
