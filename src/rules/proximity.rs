//! Proximity rule: great-circle distance between storm and observer mapped
//! onto four urgency tiers.
//!
//! Distance uses the haversine formula on a sphere with the IUGG mean Earth
//! radius. It is closed-form; no lookup service is involved.

use serde::{Deserialize, Serialize};

use crate::observation::{Coordinate, Observation};
use crate::result::{AdvisoryEntry, AdvisoryKind};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

pub const MISSING_COORDINATES: &str =
    "Please enter the coordinates for both storm and user locations.";

/// Weight carried by every location advisory.
const LOCATION_WEIGHT: f64 = 1.0;

pub fn great_circle_km(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lat2) = (a.lat().to_radians(), b.lat().to_radians());
    let dlat = lat2 - lat1;
    let dlon = (b.lon() - a.lon()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points.
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProximityTier {
    /// < 50 km
    Immediate,
    /// [50, 100) km
    Evacuate,
    /// [100, 200) km
    Alert,
    /// >= 200 km
    Safe,
}

impl ProximityTier {
    pub fn from_distance_km(d: f64) -> Self {
        if d < 50.0 {
            ProximityTier::Immediate
        } else if d < 100.0 {
            ProximityTier::Evacuate
        } else if d < 200.0 {
            ProximityTier::Alert
        } else {
            ProximityTier::Safe
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            ProximityTier::Immediate => "Move away immediately!",
            ProximityTier::Evacuate => "Prepare to evacuate.",
            ProximityTier::Alert => "Stay alert and monitor the situation.",
            ProximityTier::Safe => "You are safe for now.",
        }
    }
}

/// What the proximity rule concluded for one observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProximityOutcome {
    Located { distance_km: f64, tier: ProximityTier },
    MissingCoordinates,
}

impl ProximityOutcome {
    pub fn assess(obs: &Observation) -> Self {
        match (obs.storm_location(), obs.user_location()) {
            (Some(storm), Some(user)) => {
                let distance_km = great_circle_km(storm, user);
                ProximityOutcome::Located {
                    distance_km,
                    tier: ProximityTier::from_distance_km(distance_km),
                }
            }
            _ => ProximityOutcome::MissingCoordinates,
        }
    }

    /// Tier advice first, then the literal distance; or the single
    /// missing-coordinates notice.
    pub fn advisories(&self) -> Vec<AdvisoryEntry> {
        match *self {
            ProximityOutcome::Located { distance_km, tier } => vec![
                AdvisoryEntry::new(tier.advice(), LOCATION_WEIGHT, AdvisoryKind::Proximity),
                AdvisoryEntry::new(
                    format!("Distance to storm: {distance_km:.2} km"),
                    LOCATION_WEIGHT,
                    AdvisoryKind::Distance,
                ),
            ],
            ProximityOutcome::MissingCoordinates => vec![AdvisoryEntry::new(
                MISSING_COORDINATES,
                LOCATION_WEIGHT,
                AdvisoryKind::MissingCoordinates,
            )],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::ObservationInput;
    use approx::assert_relative_eq;

    fn c(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn tier_boundaries_are_exact() {
        assert_eq!(ProximityTier::from_distance_km(49.9), ProximityTier::Immediate);
        assert_eq!(ProximityTier::from_distance_km(50.0), ProximityTier::Evacuate);
        assert_eq!(ProximityTier::from_distance_km(99.9), ProximityTier::Evacuate);
        assert_eq!(ProximityTier::from_distance_km(100.0), ProximityTier::Alert);
        assert_eq!(ProximityTier::from_distance_km(199.9), ProximityTier::Alert);
        assert_eq!(ProximityTier::from_distance_km(200.0), ProximityTier::Safe);
    }

    #[test]
    fn zero_distance_for_same_point() {
        assert_eq!(great_circle_km(c(25.0, -80.0), c(25.0, -80.0)), 0.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        // 2πR / 360
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
        assert_relative_eq!(
            great_circle_km(c(10.0, 30.0), c(11.0, 30.0)),
            expected,
            max_relative = 1e-9
        );
    }

    #[test]
    fn los_angeles_to_new_york() {
        // ~3936 km on the sphere
        let d = great_circle_km(c(34.0522, -118.2437), c(40.7128, -74.0060));
        assert!((3900.0..3980.0).contains(&d), "got {d}");
    }

    #[test]
    fn antipodes_are_half_circumference() {
        let d = great_circle_km(c(0.0, 0.0), c(0.0, 180.0));
        assert_relative_eq!(d, EARTH_RADIUS_KM * std::f64::consts::PI, max_relative = 1e-12);
    }

    #[test]
    fn missing_either_location_emits_single_notice() {
        let only_storm = ObservationInput::new()
            .wind_speed(80.0)
            .pressure(970.0)
            .storm_at(25.0, -80.0)
            .validate()
            .unwrap();
        let out = ProximityOutcome::assess(&only_storm);
        assert_eq!(out, ProximityOutcome::MissingCoordinates);
        let adv = out.advisories();
        assert_eq!(adv.len(), 1);
        assert_eq!(adv[0].text, MISSING_COORDINATES);
    }

    #[test]
    fn located_emits_tier_then_distance() {
        let obs = ObservationInput::new()
            .wind_speed(80.0)
            .pressure(970.0)
            .storm_at(25.0, -80.0)
            .user_at(25.2, -80.0)
            .validate()
            .unwrap();
        let adv = ProximityOutcome::assess(&obs).advisories();
        assert_eq!(adv.len(), 2);
        assert_eq!(adv[0].text, "Move away immediately!");
        assert_eq!(adv[0].kind, AdvisoryKind::Proximity);
        assert!(adv[1].text.starts_with("Distance to storm: 22."));
        assert!(adv[1].text.ends_with(" km"));
    }
}
