use crate::config::Settings;
use crate::errors::DataError;
use crate::filter::filter_all;
use crate::models::{
    CountriesResponse, LocationEntry, LocationQuery, LocationResponse, MapPoint, RegionsResponse,
    SummaryResponse, TotalsResponse,
};
use crate::series::build_series;
use crate::state::Snapshot;
use crate::stats::{cases_by_country, high_infection, low_infection, map_points, region_breakdown, totals};
use tracing::{info, warn};

const HEADLINE_COUNTRY: &str = "Spain";
const HEADLINE_STATE: &str = "Hubei";

#[derive(Debug, Clone)]
pub struct TrackedLocation {
    pub key: String,
    pub label: String,
    pub query: LocationQuery,
}

impl TrackedLocation {
    fn new(label: impl Into<String>, query: LocationQuery) -> Self {
        let label = label.into();
        Self {
            key: slug(&label),
            label,
            query,
        }
    }
}

/// The fixed set of locations the page has tabs and charts for.
pub fn tracked_locations(excluded_country: &str) -> Vec<TrackedLocation> {
    vec![
        TrackedLocation::new("World", LocationQuery::Global),
        TrackedLocation::new(excluded_country, LocationQuery::Country(excluded_country.to_string())),
        TrackedLocation::new(HEADLINE_STATE, LocationQuery::State(HEADLINE_STATE.to_string())),
        TrackedLocation::new(HEADLINE_COUNTRY, LocationQuery::Country(HEADLINE_COUNTRY.to_string())),
        TrackedLocation::new(
            format!("Outside {excluded_country}"),
            LocationQuery::OutsideCountry(excluded_country.to_string()),
        ),
        TrackedLocation::new("Italy", LocationQuery::Country("Italy".to_string())),
        TrackedLocation::new("US", LocationQuery::Country("US".to_string())),
    ]
}

fn slug(label: &str) -> String {
    label
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Everything the page shows, computed once from the snapshot.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub summary: SummaryResponse,
    pub locations: Vec<LocationResponse>,
    pub countries: CountriesResponse,
    pub regions: RegionsResponse,
    pub map: Vec<MapPoint>,
}

impl Dashboard {
    pub fn build(snapshot: &Snapshot, settings: &Settings) -> Result<Self, DataError> {
        let excluded = settings.excluded_country.as_str();

        let locations = tracked_locations(excluded)
            .iter()
            .map(|tracked| location_report(snapshot, tracked))
            .collect::<Result<Vec<_>, _>>()?;

        let global = totals(&filter_all(snapshot, &LocationQuery::Global));
        let headline = totals(&filter_all(
            snapshot,
            &LocationQuery::Country(HEADLINE_COUNTRY.to_string()),
        ));

        let grouped = cases_by_country(&snapshot.confirmed);
        let countries = CountriesResponse {
            excluded_country: excluded.to_string(),
            upper_threshold: settings.upper_threshold,
            lower_threshold: settings.lower_threshold,
            high_infection: high_infection(&grouped, settings.upper_threshold, excluded),
            low_infection: low_infection(&grouped, settings.lower_threshold),
        };

        info!(
            "dashboard ready: {} locations, {} countries above {}, {} below {}",
            locations.len(),
            countries.high_infection.len(),
            settings.upper_threshold,
            countries.low_infection.len(),
            settings.lower_threshold
        );

        Ok(Self {
            summary: SummaryResponse {
                updated: snapshot.axis.last(),
                global: TotalsResponse::new("World", global),
                headline: TotalsResponse::new(HEADLINE_COUNTRY, headline),
            },
            locations,
            countries,
            regions: RegionsResponse {
                country: excluded.to_string(),
                regions: region_breakdown(&snapshot.confirmed, excluded),
            },
            map: map_points(&snapshot.confirmed),
        })
    }

    pub fn location(&self, key: &str) -> Option<&LocationResponse> {
        self.locations.iter().find(|location| location.key == key)
    }

    pub fn location_entries(&self) -> Vec<LocationEntry> {
        self.locations
            .iter()
            .map(|location| LocationEntry {
                key: location.key.clone(),
                label: location.totals.label.clone(),
            })
            .collect()
    }
}

fn location_report(
    snapshot: &Snapshot,
    tracked: &TrackedLocation,
) -> Result<LocationResponse, DataError> {
    let slices = filter_all(snapshot, &tracked.query);
    if slices.confirmed.rows.is_empty() {
        warn!("{} matches no rows; reporting zeros", tracked.query.describe());
    }

    let aggregated = tracked.query.aggregated();
    let confirmed = build_series(&slices.confirmed, &snapshot.axis, aggregated)?;
    let deaths = build_series(&slices.deaths, &snapshot.axis, aggregated)?;
    let recovered = build_series(&slices.recovered, &snapshot.axis, aggregated)?;

    Ok(LocationResponse {
        key: tracked.key.clone(),
        totals: TotalsResponse::new(tracked.label.clone(), totals(&slices)),
        dates: snapshot.axis.dates().to_vec(),
        confirmed: (&confirmed).into(),
        deaths: (&deaths).into(),
        recovered: (&recovered).into(),
    })
}
