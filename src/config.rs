use std::{env, time::Duration};
use tracing::warn;

const CONFIRMED_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_covid19_confirmed_global.csv";
const DEATHS_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_covid19_deaths_global.csv";
const RECOVERED_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_covid19_recovered_global.csv";

#[derive(Debug, Clone)]
pub struct Sources {
    pub confirmed: String,
    pub deaths: String,
    pub recovered: String,
}

/// Runtime parameters, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub sources: Sources,
    pub upper_threshold: i64,
    pub lower_threshold: i64,
    pub excluded_country: String,
    pub fetch_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 8080,
            sources: Sources {
                confirmed: CONFIRMED_URL.to_string(),
                deaths: DEATHS_URL.to_string(),
                recovered: RECOVERED_URL.to_string(),
            },
            upper_threshold: 30_000,
            lower_threshold: 100,
            excluded_country: "China".to_string(),
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup so tests never touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str, default: String| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(default)
        };

        Self {
            port: parsed(&lookup, "PORT", defaults.port),
            sources: Sources {
                confirmed: text("DASHBOARD_CONFIRMED_SOURCE", defaults.sources.confirmed),
                deaths: text("DASHBOARD_DEATHS_SOURCE", defaults.sources.deaths),
                recovered: text("DASHBOARD_RECOVERED_SOURCE", defaults.sources.recovered),
            },
            upper_threshold: parsed(&lookup, "DASHBOARD_UPPER_THRESHOLD", defaults.upper_threshold),
            lower_threshold: parsed(&lookup, "DASHBOARD_LOWER_THRESHOLD", defaults.lower_threshold),
            excluded_country: text("DASHBOARD_EXCLUDED_COUNTRY", defaults.excluded_country),
            fetch_timeout: Duration::from_secs(parsed(
                &lookup,
                "DASHBOARD_FETCH_TIMEOUT_SECS",
                defaults.fetch_timeout.as_secs(),
            )),
        }
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("ignoring invalid {key}={raw:?}, using {default}");
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_public_dataset() {
        let settings = settings_from(&[]);
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.upper_threshold, 30_000);
        assert_eq!(settings.lower_threshold, 100);
        assert_eq!(settings.excluded_country, "China");
        assert!(settings.sources.deaths.ends_with("deaths_global.csv"));
    }

    #[test]
    fn overrides_and_invalid_values() {
        let settings = settings_from(&[
            ("PORT", "9000"),
            ("DASHBOARD_UPPER_THRESHOLD", "not-a-number"),
            ("DASHBOARD_LOWER_THRESHOLD", " 5 "),
            ("DASHBOARD_EXCLUDED_COUNTRY", "US"),
            ("DASHBOARD_CONFIRMED_SOURCE", "/tmp/confirmed.csv"),
            ("DASHBOARD_FETCH_TIMEOUT_SECS", "2"),
        ]);
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.upper_threshold, 30_000);
        assert_eq!(settings.lower_threshold, 5);
        assert_eq!(settings.excluded_country, "US");
        assert_eq!(settings.sources.confirmed, "/tmp/confirmed.csv");
        assert_eq!(settings.fetch_timeout, Duration::from_secs(2));
    }
}
