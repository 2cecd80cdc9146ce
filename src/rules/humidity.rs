//! Humidity tiers. These are advisories, not storm categories: they never
//! enter the category softmax. At most one tier fires per observation, and
//! none when humidity is absent.

use serde::{Deserialize, Serialize};

use super::predicate::{Field, RangePredicate};
use crate::observation::Observation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HumidityTier {
    #[serde(rename = "High Humidity")]
    High,
    #[serde(rename = "Moderate Humidity")]
    Moderate,
    #[serde(rename = "Low Humidity")]
    Low,
}

impl HumidityTier {
    pub fn label(self) -> &'static str {
        match self {
            HumidityTier::High => "High Humidity",
            HumidityTier::Moderate => "Moderate Humidity",
            HumidityTier::Low => "Low Humidity",
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            HumidityTier::High => "Stay hydrated and avoid outdoor activities.",
            HumidityTier::Moderate => "Be cautious of heat exhaustion.",
            HumidityTier::Low => "Moisturize and stay hydrated.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HumidityTierRule {
    pub tier: HumidityTier,
    pub when: RangePredicate,
    pub confidence: f64,
}

impl HumidityTierRule {
    pub fn fires(&self, obs: &Observation) -> bool {
        self.when.holds(obs)
    }
}

pub fn canonical() -> Vec<HumidityTierRule> {
    vec![
        HumidityTierRule {
            tier: HumidityTier::High,
            when: RangePredicate::above(Field::Humidity, 80.0),
            confidence: 0.90,
        },
        HumidityTierRule {
            tier: HumidityTier::Moderate,
            when: RangePredicate::closed(Field::Humidity, 60.0, 80.0),
            confidence: 0.80,
        },
        HumidityTierRule {
            tier: HumidityTier::Low,
            when: RangePredicate::below(Field::Humidity, 60.0),
            confidence: 0.70,
        },
    ]
}
