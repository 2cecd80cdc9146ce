// src/rules/mod.rs
//! Rule set evaluated once per classification call.
//!
//! Four kinds of rule, as tagged variants:
//! - `BaseRate`:     Gaussian log-likelihood per category (must run first)
//! - `Threshold`:    range predicates that add `ln(confidence)` to one category
//! - `HumidityTier`: range predicate on humidity, emits an advisory only
//! - `Proximity`:    distance-derived urgency advisory
//!
//! Rules are plain data so they can be listed, serialized and unit-tested
//! one at a time; the engine interprets them in a single loop.

pub mod humidity;
pub mod predicate;
pub mod proximity;
pub mod threshold;

use serde::{Deserialize, Serialize};

pub use humidity::{HumidityTier, HumidityTierRule};
pub use predicate::{Bound, Field, RangePredicate};
pub use proximity::{great_circle_km, ProximityOutcome, ProximityTier};
pub use threshold::ThresholdRule;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rule {
    BaseRate,
    Threshold(ThresholdRule),
    HumidityTier(HumidityTierRule),
    Proximity,
}

impl Rule {
    pub fn name(&self) -> String {
        match self {
            Rule::BaseRate => "base_rate".to_string(),
            Rule::Threshold(r) => r.name.clone(),
            Rule::HumidityTier(r) => r.tier.label().to_ascii_lowercase().replace(' ', "_"),
            Rule::Proximity => "proximity".to_string(),
        }
    }
}

/// Ordered list of rules. The base-rate rule comes first so threshold
/// boosts always land on an initialized accumulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
}

impl RuleSet {
    /// Base rate, the ten storm thresholds, the three humidity tiers, proximity.
    pub fn canonical() -> Self {
        let mut rules = vec![Rule::BaseRate];
        rules.extend(threshold::canonical().into_iter().map(Rule::Threshold));
        rules.extend(humidity::canonical().into_iter().map(Rule::HumidityTier));
        rules.push(Rule::Proximity);
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.rules.iter().map(Rule::name).collect()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::canonical()
    }
}
