//! Threshold rules: when every predicate holds, the named category's
//! log-probability gets `ln(confidence)` added.
//!
//! Rules are independent of each other; addition commutes, so firing order
//! does not change the final scores.

use serde::{Deserialize, Serialize};

use super::predicate::{Field, RangePredicate};
use crate::observation::Observation;
use crate::profile::Category;

/// Smallest confidence accepted before taking a logarithm.
const MIN_CONFIDENCE: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub name: String,
    pub when: Vec<RangePredicate>,
    pub category: Category,
    /// In `(0, 1]`.
    pub confidence: f64,
}

impl ThresholdRule {
    pub fn new(
        name: impl Into<String>,
        category: Category,
        confidence: f64,
        when: impl Into<Vec<RangePredicate>>,
    ) -> Self {
        Self {
            name: name.into(),
            when: when.into(),
            category,
            confidence,
        }
    }

    pub fn fires(&self, obs: &Observation) -> bool {
        self.when.iter().all(|p| p.holds(obs))
    }

    /// Additive log-space adjustment applied when the rule fires.
    pub fn log_boost(&self) -> f64 {
        self.confidence.clamp(MIN_CONFIDENCE, 1.0).ln()
    }
}

/// The ten canonical storm rules, one per category.
pub fn canonical() -> Vec<ThresholdRule> {
    use Field::{Pressure, Temperature, WindSpeed};
    use RangePredicate as R;

    vec![
        ThresholdRule::new(
            "hurricane_mild",
            Category::MildHurricane,
            0.80,
            [R::half_open(WindSpeed, 74.0, 96.0), R::at_most(Pressure, 980.0)],
        ),
        ThresholdRule::new(
            "hurricane_moderate",
            Category::ModerateHurricane,
            0.90,
            [R::half_open(WindSpeed, 96.0, 111.0), R::at_most(Pressure, 970.0)],
        ),
        ThresholdRule::new(
            "hurricane_severe",
            Category::SevereHurricane,
            0.95,
            [R::at_least(WindSpeed, 111.0), R::at_most(Pressure, 950.0)],
        ),
        ThresholdRule::new(
            "thunderstorm_mild",
            Category::MildThunderstorm,
            0.70,
            [
                R::below(WindSpeed, 74.0),
                R::above(Temperature, 20.0),
                R::above(Pressure, 980.0),
            ],
        ),
        ThresholdRule::new(
            "thunderstorm_moderate",
            Category::ModerateThunderstorm,
            0.80,
            [
                R::half_open(WindSpeed, 40.0, 60.0),
                R::above(Temperature, 20.0),
                R::at_most(Pressure, 1000.0),
            ],
        ),
        ThresholdRule::new(
            "thunderstorm_severe",
            Category::SevereThunderstorm,
            0.85,
            [
                R::at_least(WindSpeed, 60.0),
                R::above(Temperature, 20.0),
                R::at_most(Pressure, 990.0),
            ],
        ),
        ThresholdRule::new(
            "winter_storm_mild",
            Category::MildWinterStorm,
            0.75,
            [
                R::half_open(WindSpeed, 40.0, 60.0),
                R::at_most(Pressure, 1000.0),
                R::at_most(Temperature, 0.0),
            ],
        ),
        ThresholdRule::new(
            "winter_storm_moderate",
            Category::ModerateWinterStorm,
            0.85,
            [
                R::half_open(WindSpeed, 60.0, 80.0),
                R::at_most(Pressure, 980.0),
                R::at_most(Temperature, -5.0),
            ],
        ),
        ThresholdRule::new(
            "winter_storm_severe",
            Category::SevereWinterStorm,
            0.90,
            [
                R::at_least(WindSpeed, 80.0),
                R::at_most(Pressure, 960.0),
                R::at_most(Temperature, -10.0),
            ],
        ),
        ThresholdRule::new(
            "calm",
            Category::Calm,
            1.00,
            [R::below(WindSpeed, 30.0), R::above(Pressure, 1000.0)],
        ),
    ]
}
