use crate::fleet::{Component, ComponentError, DEFAULT_NEARBY_THRESHOLD_KM};
use crate::orbit::GeodeticPosition;
use std::{collections::BTreeSet, env, str::FromStr, time::Duration};
use strum_macros::Display;

const DEFAULT_BASE_URL: &str = "https://celestrak.org";
const DEFAULT_SOURCE: &str = "/NORAD/elements/gp.php?GROUP=stations&FORMAT=tle";
const DEFAULT_SOURCE_TAG: &str = "Stations";
const DEFAULT_TICK_MS: u64 = 1000;
const DEFAULT_HTTP_TIMEOUT_S: u64 = 10;

/// A configuration variable held a value that could not be interpreted.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum ConfigError {
    /// `FLEET_SOURCES` is set but names no source.
    MissingSources,
    /// A source entry is not of the form `address|tag,tag`.
    BadSource(String),
    /// `FLEET_GROUND_STATION` is not `lat,lon[,height]` or out of range.
    BadGroundStation(String),
    /// A numeric variable does not parse or is out of range.
    BadNumber { var: &'static str, value: String },
    /// `FLEET_COMPONENTS` names an unknown component.
    Component(ComponentError),
}

impl std::error::Error for ConfigError {}

impl From<ComponentError> for ConfigError {
    fn from(value: ComponentError) -> Self { ConfigError::Component(value) }
}

/// One element source together with the tags its records get.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub address: String,
    pub tags: Vec<String>,
}

/// Startup configuration of the fleet service.
#[derive(Debug, Clone, PartialEq)]
pub struct FleetConfig {
    pub base_url: String,
    pub sources: Vec<SourceEntry>,
    pub enabled_tags: Vec<String>,
    pub enabled_names: Vec<String>,
    pub monitored_names: Vec<String>,
    pub components: BTreeSet<Component>,
    pub track: Option<String>,
    pub ground_station: Option<GeodeticPosition>,
    pub tick: Duration,
    pub nearby_km: f64,
    pub http_timeout: Duration,
    pub dump_snapshots: bool,
}

impl FleetConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> { Self::from_lookup(|var| env::var(var).ok()) }

    /// Reads the configuration through `lookup`, falling back to defaults for absent variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let sources = match get("FLEET_SOURCES") {
            Some(raw) => Self::parse_sources(&raw)?,
            None => vec![SourceEntry {
                address: DEFAULT_SOURCE.to_string(),
                tags: vec![DEFAULT_SOURCE_TAG.to_string()],
            }],
        };
        let components = match get("FLEET_COMPONENTS") {
            Some(raw) => Component::parse_all(split_list(&raw).as_slice())?,
            None => Component::default_set(),
        };
        let ground_station = get("FLEET_GROUND_STATION").map(|raw| Self::parse_ground_station(&raw)).transpose()?;

        Ok(Self {
            base_url: get("FLEET_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            sources,
            enabled_tags: get("FLEET_ENABLED_TAGS").map(|r| split_list(&r)).unwrap_or_default(),
            enabled_names: get("FLEET_ENABLED_NAMES").map(|r| split_list(&r)).unwrap_or_default(),
            monitored_names: get("FLEET_MONITORED_NAMES").map(|r| split_list(&r)).unwrap_or_default(),
            components,
            track: get("FLEET_TRACK"),
            ground_station,
            tick: Duration::from_millis(parse_number("FLEET_TICK_MS", get("FLEET_TICK_MS"), DEFAULT_TICK_MS, |v| {
                *v > 0
            })?),
            nearby_km: parse_number("FLEET_NEARBY_KM", get("FLEET_NEARBY_KM"), DEFAULT_NEARBY_THRESHOLD_KM, |v| {
                v.is_finite() && *v >= 0.0
            })?,
            http_timeout: Duration::from_secs(parse_number(
                "FLEET_HTTP_TIMEOUT_S",
                get("FLEET_HTTP_TIMEOUT_S"),
                DEFAULT_HTTP_TIMEOUT_S,
                |v| *v > 0,
            )?),
            dump_snapshots: get("FLEET_DUMP_SNAPSHOTS").is_some(),
        })
    }

    /// Parses `address|tag,tag;address|tag` into source specs.
    fn parse_sources(raw: &str) -> Result<Vec<SourceEntry>, ConfigError> {
        let sources = raw
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|entry| {
                let (raw_address, tags) = entry.split_once('|').unwrap_or((entry, ""));
                let address = raw_address.trim();
                if address.is_empty() || address.contains(char::is_whitespace) {
                    return Err(ConfigError::BadSource(entry.to_string()));
                }
                Ok(SourceEntry { address: address.to_string(), tags: split_list(tags) })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if sources.is_empty() {
            return Err(ConfigError::MissingSources);
        }
        Ok(sources)
    }

    /// Parses `lat,lon[,height]`, height in kilometers.
    fn parse_ground_station(raw: &str) -> Result<GeodeticPosition, ConfigError> {
        let bad = || ConfigError::BadGroundStation(raw.to_string());
        let values =
            raw.split(',').map(|v| v.trim().parse::<f64>()).collect::<Result<Vec<_>, _>>().map_err(|_| bad())?;
        let (lat, lon, height) = match values.as_slice() {
            [lat, lon] => (*lat, *lon, 0.0),
            [lat, lon, height] => (*lat, *lon, *height),
            _ => return Err(bad()),
        };
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(bad());
        }
        Ok(GeodeticPosition::new(lat, lon, height))
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

/// Parses `value` or falls back to `default`. Parsed values must satisfy `valid`.
fn parse_number<T: FromStr>(
    var: &'static str,
    value: Option<String>,
    default: T,
    valid: impl Fn(&T) -> bool,
) -> Result<T, ConfigError> {
    let Some(raw) = value else { return Ok(default) };
    match raw.parse::<T>() {
        Ok(parsed) if valid(&parsed) => Ok(parsed),
        _ => Err(ConfigError::BadNumber { var, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = FleetConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.sources, vec![SourceEntry {
            address: DEFAULT_SOURCE.to_string(),
            tags: vec!["Stations".to_string()]
        }]);
        assert_eq!(config.components, Component::default_set());
        assert_eq!(config.tick, Duration::from_secs(1));
        assert!((config.nearby_km - 250.0).abs() < f64::EPSILON);
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert!(config.track.is_none());
        assert!(config.ground_station.is_none());
        assert!(!config.dump_snapshots);
    }

    #[test]
    fn test_full_configuration() {
        let config = FleetConfig::from_lookup(lookup(&[
            ("FLEET_SOURCES", "/a.txt|Weather, NOAA ; https://example.org/b.txt|Starlink;/c.txt"),
            ("FLEET_ENABLED_TAGS", "Weather,NOAA"),
            ("FLEET_ENABLED_NAMES", "ISS (ZARYA)"),
            ("FLEET_MONITORED_NAMES", "NOAA 19, NOAA 18"),
            ("FLEET_COMPONENTS", "Point, Orbit track"),
            ("FLEET_TRACK", "ISS (ZARYA)"),
            ("FLEET_GROUND_STATION", "48.1, 11.6"),
            ("FLEET_TICK_MS", "250"),
            ("FLEET_NEARBY_KM", "100.5"),
        ]))
        .unwrap();
        assert_eq!(config.sources.len(), 3);
        assert_eq!(config.sources[0].tags, vec!["Weather".to_string(), "NOAA".to_string()]);
        assert_eq!(config.sources[1].address, "https://example.org/b.txt");
        assert!(config.sources[2].tags.is_empty());
        assert_eq!(config.enabled_names, vec!["ISS (ZARYA)".to_string()]);
        assert_eq!(config.monitored_names, vec!["NOAA 19".to_string(), "NOAA 18".to_string()]);
        assert_eq!(config.components, BTreeSet::from([Component::Point, Component::OrbitTrack]));
        assert_eq!(config.track.as_deref(), Some("ISS (ZARYA)"));
        assert_eq!(config.ground_station, Some(GeodeticPosition::new(48.1, 11.6, 0.0)));
        assert_eq!(config.tick, Duration::from_millis(250));
        assert!((config.nearby_km - 100.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            FleetConfig::from_lookup(lookup(&[("FLEET_SOURCES", ";;")])),
            Err(ConfigError::MissingSources)
        );
        assert!(matches!(
            FleetConfig::from_lookup(lookup(&[("FLEET_SOURCES", "|Weather")])),
            Err(ConfigError::BadSource(_))
        ));
        assert!(matches!(
            FleetConfig::from_lookup(lookup(&[("FLEET_GROUND_STATION", "91,0")])),
            Err(ConfigError::BadGroundStation(_))
        ));
        assert!(matches!(
            FleetConfig::from_lookup(lookup(&[("FLEET_GROUND_STATION", "1,2,3,4")])),
            Err(ConfigError::BadGroundStation(_))
        ));
        assert_eq!(
            FleetConfig::from_lookup(lookup(&[("FLEET_TICK_MS", "fast")])),
            Err(ConfigError::BadNumber { var: "FLEET_TICK_MS", value: "fast".to_string() })
        );
        assert_eq!(
            FleetConfig::from_lookup(lookup(&[("FLEET_TICK_MS", "0")])),
            Err(ConfigError::BadNumber { var: "FLEET_TICK_MS", value: "0".to_string() })
        );
        for value in ["-5", "NaN", "inf"] {
            assert_eq!(
                FleetConfig::from_lookup(lookup(&[("FLEET_NEARBY_KM", value)])),
                Err(ConfigError::BadNumber { var: "FLEET_NEARBY_KM", value: value.to_string() })
            );
        }
        assert!(matches!(
            FleetConfig::from_lookup(lookup(&[("FLEET_HTTP_TIMEOUT_S", "0")])),
            Err(ConfigError::BadNumber { var: "FLEET_HTTP_TIMEOUT_S", .. })
        ));
        assert_eq!(
            FleetConfig::from_lookup(lookup(&[("FLEET_COMPONENTS", "Point,Laser")])),
            Err(ConfigError::Component(ComponentError::Unknown("Laser".to_string())))
        );
    }
}
