//! # Observation
//! The validated input record for one classification call, plus the raw
//! (all-optional) shape it is built from.
//!
//! `ObservationInput` is what callers deserialize or build by hand;
//! `validate()` turns it into an immutable `Observation` or fails with
//! `ClassifyError::InvalidObservation`. Coordinates never fail validation:
//! anything unparsable is treated as absent.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ClassifyError;

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Returns `None` unless both values are finite and within
    /// `[-90, 90]` / `[-180, 180]`.
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        let ok = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        ok.then_some(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

static COORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\(?\s*([-+]?\d+(?:\.\d+)?)\s*,\s*([-+]?\d+(?:\.\d+)?)\s*\)?\s*$")
        .expect("coordinate regex")
});

/// Parse `"lat, lon"` (optionally wrapped in parentheses).
/// Any failure yields `None`, never an error.
pub fn parse_coordinate(text: &str) -> Option<Coordinate> {
    let caps = COORD_RE.captures(text)?;
    let lat = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let lon = caps.get(2)?.as_str().parse::<f64>().ok()?;
    Coordinate::new(lat, lon)
}

/// Location as supplied by a caller: free text or a `[lat, lon]` pair.
/// Any other shape (a lone number, a short array, an object) is kept as
/// `Other` and resolves to no location instead of failing the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationInput {
    Pair([f64; 2]),
    Text(String),
    Other(serde_json::Value),
}

impl LocationInput {
    pub fn resolve(&self) -> Option<Coordinate> {
        match self {
            LocationInput::Pair([lat, lon]) => Coordinate::new(*lat, *lon),
            LocationInput::Text(s) => parse_coordinate(s),
            LocationInput::Other(_) => None,
        }
    }
}

/// Raw, unvalidated observation. Every field is optional so that a missing
/// required field can be reported instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationInput {
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub storm_location: Option<LocationInput>,
    #[serde(default)]
    pub user_location: Option<LocationInput>,
}

impl ObservationInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wind_speed(mut self, mph: f64) -> Self {
        self.wind_speed = Some(mph);
        self
    }

    pub fn pressure(mut self, hpa: f64) -> Self {
        self.pressure = Some(hpa);
        self
    }

    pub fn temperature(mut self, celsius: f64) -> Self {
        self.temperature = Some(celsius);
        self
    }

    pub fn humidity(mut self, percent: f64) -> Self {
        self.humidity = Some(percent);
        self
    }

    pub fn storm_at(mut self, lat: f64, lon: f64) -> Self {
        self.storm_location = Some(LocationInput::Pair([lat, lon]));
        self
    }

    pub fn user_at(mut self, lat: f64, lon: f64) -> Self {
        self.user_location = Some(LocationInput::Pair([lat, lon]));
        self
    }

    /// Check required fields and value sanity, resolving coordinates.
    pub fn validate(&self) -> Result<Observation, ClassifyError> {
        let wind_speed = required(self.wind_speed, "wind_speed")?;
        let pressure = required(self.pressure, "pressure")?;
        let temperature = optional(self.temperature, "temperature")?;
        let humidity = optional(self.humidity, "humidity")?;
        if let Some(h) = humidity {
            if !(0.0..=100.0).contains(&h) {
                return Err(ClassifyError::invalid(
                    "humidity",
                    format!("{h} is outside 0..=100"),
                ));
            }
        }

        Ok(Observation {
            wind_speed,
            pressure,
            temperature,
            humidity,
            storm_location: self.storm_location.as_ref().and_then(LocationInput::resolve),
            user_location: self.user_location.as_ref().and_then(LocationInput::resolve),
        })
    }
}

fn required(v: Option<f64>, field: &'static str) -> Result<f64, ClassifyError> {
    match v {
        None => Err(ClassifyError::invalid(field, "missing required value")),
        Some(x) if !x.is_finite() => Err(ClassifyError::invalid(field, "value is not finite")),
        Some(x) => Ok(x),
    }
}

fn optional(v: Option<f64>, field: &'static str) -> Result<Option<f64>, ClassifyError> {
    match v {
        Some(x) if !x.is_finite() => Err(ClassifyError::invalid(field, "value is not finite")),
        other => Ok(other),
    }
}

/// Validated facts for one classification call. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    wind_speed: f64,
    pressure: f64,
    temperature: Option<f64>,
    humidity: Option<f64>,
    storm_location: Option<Coordinate>,
    user_location: Option<Coordinate>,
}

impl Observation {
    /// mph
    pub fn wind_speed(&self) -> f64 {
        self.wind_speed
    }

    /// hPa
    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    /// °C
    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    /// %
    pub fn humidity(&self) -> Option<f64> {
        self.humidity
    }

    pub fn storm_location(&self) -> Option<Coordinate> {
        self.storm_location
    }

    pub fn user_location(&self) -> Option<Coordinate> {
        self.user_location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_parenthesized_coordinates() {
        let c = parse_coordinate("34.0522, -118.2437").unwrap();
        assert_eq!(c.lat(), 34.0522);
        assert_eq!(c.lon(), -118.2437);

        let c2 = parse_coordinate(" (40.7,-74) ").unwrap();
        assert_eq!(c2.lat(), 40.7);
        assert_eq!(c2.lon(), -74.0);
    }

    #[test]
    fn bad_coordinates_are_absent() {
        assert!(parse_coordinate("").is_none());
        assert!(parse_coordinate("34.05").is_none());
        assert!(parse_coordinate("north, west").is_none());
        assert!(parse_coordinate("95.0, 10.0").is_none());
        assert!(parse_coordinate("10.0, 181.0").is_none());
        assert!(Coordinate::new(f64::NAN, 0.0).is_none());
    }

    #[test]
    fn missing_required_fields_fail() {
        let err = ObservationInput::new().pressure(1000.0).validate().unwrap_err();
        assert!(matches!(
            err,
            ClassifyError::InvalidObservation { field: "wind_speed", .. }
        ));

        let err = ObservationInput::new().wind_speed(10.0).validate().unwrap_err();
        assert!(matches!(
            err,
            ClassifyError::InvalidObservation { field: "pressure", .. }
        ));
    }

    #[test]
    fn non_finite_and_out_of_range_values_fail() {
        let err = ObservationInput::new()
            .wind_speed(f64::INFINITY)
            .pressure(1000.0)
            .validate()
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_observation");

        let err = ObservationInput::new()
            .wind_speed(10.0)
            .pressure(1000.0)
            .humidity(120.0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ClassifyError::InvalidObservation { field: "humidity", .. }
        ));
    }

    #[test]
    fn optional_fields_stay_distinct_from_zero() {
        let obs = ObservationInput::new()
            .wind_speed(10.0)
            .pressure(1000.0)
            .validate()
            .unwrap();
        assert_eq!(obs.temperature(), None);
        assert_eq!(obs.humidity(), None);

        let obs = ObservationInput::new()
            .wind_speed(10.0)
            .pressure(1000.0)
            .humidity(0.0)
            .validate()
            .unwrap();
        assert_eq!(obs.humidity(), Some(0.0));
    }

    #[test]
    fn locations_deserialize_from_text_or_pair() {
        let raw = r#"{
            "wind_speed": 50, "pressure": 995,
            "storm_location": "25.76, -80.19",
            "user_location": [26.12, -80.14]
        }"#;
        let input: ObservationInput = serde_json::from_str(raw).unwrap();
        let obs = input.validate().unwrap();
        assert!(obs.storm_location().is_some());
        assert!(obs.user_location().is_some());
    }

    #[test]
    fn unparsable_location_is_absent_not_error() {
        let input = ObservationInput {
            storm_location: Some(LocationInput::Text("somewhere offshore".into())),
            ..ObservationInput::new().wind_speed(50.0).pressure(995.0).user_at(26.1, -80.1)
        };
        let obs = input.validate().unwrap();
        assert!(obs.storm_location().is_none());
        assert!(obs.user_location().is_some());
    }

    #[test]
    fn partial_location_shapes_are_absent_not_error() {
        for storm in [r#"[25.0]"#, r#"{"lat": 25.0}"#, r#"[25.0, -80.0, 3.0]"#, r#"42"#] {
            let raw = format!(
                r#"{{"wind_speed": 50, "pressure": 995, "storm_location": {storm}, "user_location": [26.1, -80.1]}}"#
            );
            let input: ObservationInput = serde_json::from_str(&raw).unwrap();
            assert!(matches!(input.storm_location, Some(LocationInput::Other(_))), "{storm}");
            let obs = input.validate().unwrap();
            assert!(obs.storm_location().is_none(), "{storm}");
            assert!(obs.user_location().is_some());
        }
    }
}
