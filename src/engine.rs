//! # Inference Engine
//! Single-pass forward chaining over one observation.
//!
//! Every call owns a fresh `InferenceContext` (score and advisory lists), so
//! concurrent calls never share partial state. The only shared data are the
//! read-only profile table and rule set.
//!
//! Per call: `Init -> FactsBound -> RulesEvaluated -> Normalized -> ResultsReady`.
//! A failure before `ResultsReady` ends the call with no partial result.

use once_cell::sync::Lazy;
use std::f64::consts::PI;
use std::time::Instant;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::ClassifyError;
use crate::normalize::{normalize_advisories, normalize_scores, NormalizeError};
use crate::observation::{Observation, ObservationInput};
use crate::profile::{DimensionStats, PROFILES};
use crate::result::{assemble, AdvisoryEntry, AdvisoryKind, ClassificationResult, ScoreEntry};
use crate::rules::{ProximityOutcome, Rule, RuleSet};

static CANONICAL_RULES: Lazy<RuleSet> = Lazy::new(RuleSet::canonical);

/// Normal probability density at `x`.
pub fn gaussian_density(x: f64, stats: DimensionStats) -> f64 {
    let z = (x - stats.mean) / stats.stddev;
    (-0.5 * z * z).exp() / (stats.stddev * (2.0 * PI).sqrt())
}

/// `ln(max(pdf, floor))`; never `-inf`.
pub fn log_density(x: f64, stats: DimensionStats, floor: f64) -> f64 {
    gaussian_density(x, stats).max(floor).ln()
}

/// Base-rate rule: summed log-densities over the dimensions the observation
/// actually carries. Absent optional dimensions contribute nothing.
pub fn base_rate_scores(obs: &Observation, floor: f64) -> Vec<ScoreEntry> {
    PROFILES
        .iter()
        .map(|(category, prof)| {
            let terms = [
                Some((obs.wind_speed(), prof.wind_speed)),
                Some((obs.pressure(), prof.pressure)),
                obs.temperature().map(|t| (t, prof.temperature)),
                obs.humidity().map(|h| (h, prof.humidity)),
            ];
            let log_probability = terms
                .into_iter()
                .flatten()
                .map(|(x, stats)| log_density(x, stats, floor))
                .sum();
            ScoreEntry {
                category: *category,
                log_probability,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Init,
    FactsBound,
    RulesEvaluated,
    Normalized,
    ResultsReady,
}

/// Mutable working state of a single classification call.
#[derive(Debug)]
pub struct InferenceContext<'a> {
    stage: Stage,
    config: EngineConfig,
    facts: Option<&'a Observation>,
    scores: Vec<ScoreEntry>,
    advisories: Vec<AdvisoryEntry>,
    base_rate_applied: bool,
}

impl<'a> InferenceContext<'a> {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            stage: Stage::Init,
            config,
            facts: None,
            scores: Vec::new(),
            advisories: Vec::new(),
            base_rate_applied: false,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn scores(&self) -> &[ScoreEntry] {
        &self.scores
    }

    pub fn advisories(&self) -> &[AdvisoryEntry] {
        &self.advisories
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(next > self.stage, "stage must move forward");
        debug!(from = ?self.stage, to = ?next, "inference stage");
        self.stage = next;
    }

    /// Bind the working-memory facts for this call.
    /// Scores start at zero for every category so that every rule,
    /// the base rate included, contributes by addition.
    pub fn bind(&mut self, obs: &'a Observation) {
        self.facts = Some(obs);
        self.scores = PROFILES
            .iter()
            .map(|(category, _)| ScoreEntry {
                category: *category,
                log_probability: 0.0,
            })
            .collect();
        self.advance(Stage::FactsBound);
    }

    /// Evaluate every rule once, in order. Rules never re-trigger.
    pub fn run(&mut self, rules: &RuleSet) {
        let Some(obs) = self.facts else {
            return;
        };
        for rule in &rules.rules {
            self.apply(rule, obs);
        }
        self.advance(Stage::RulesEvaluated);
    }

    fn apply(&mut self, rule: &Rule, obs: &Observation) {
        match rule {
            Rule::BaseRate => {
                let base = base_rate_scores(obs, self.config.density_floor);
                for (entry, b) in self.scores.iter_mut().zip(base) {
                    debug_assert_eq!(entry.category, b.category);
                    entry.log_probability += b.log_probability;
                }
                self.base_rate_applied = true;
            }
            Rule::Threshold(r) => {
                if !r.fires(obs) {
                    return;
                }
                let boost = r.log_boost();
                if let Some(entry) = self.scores.iter_mut().find(|s| s.category == r.category) {
                    entry.log_probability += boost;
                    debug!(rule = %r.name, category = %r.category, boost, "threshold rule fired");
                }
            }
            Rule::HumidityTier(r) => {
                if self.config.humidity_advisories && r.fires(obs) {
                    self.advisories.push(AdvisoryEntry::new(
                        r.tier.advice(),
                        r.confidence,
                        AdvisoryKind::Humidity,
                    ));
                    debug!(tier = r.tier.label(), "humidity tier fired");
                }
            }
            Rule::Proximity => {
                let outcome = ProximityOutcome::assess(obs);
                debug!(?outcome, "proximity assessed");
                self.advisories.extend(outcome.advisories());
            }
        }
    }

    /// Normalize scores, attach category advice, normalize the advisory
    /// channel on its own, and build the ranked result.
    ///
    /// Without a base rate there is no likelihood to rank, so the call ends
    /// with `NoClassification`.
    pub fn finish(mut self) -> Result<ClassificationResult, ClassifyError> {
        if !self.base_rate_applied {
            return Err(ClassifyError::NoClassification);
        }
        let normalized = normalize_scores(&self.scores).map_err(|e| match e {
            NormalizeError::Empty | NormalizeError::NonFinite => ClassifyError::NoClassification,
        })?;

        if self.config.category_advisories {
            self.advisories.extend(normalized.iter().map(|r| {
                AdvisoryEntry::new(r.category.advice(), r.probability, AdvisoryKind::Category)
            }));
        }
        let advisories = normalize_advisories(
            std::mem::take(&mut self.advisories),
            self.config.density_floor,
        );
        self.advance(Stage::Normalized);

        let result = assemble(normalized, advisories, self.config.visibility_threshold);
        self.advance(Stage::ResultsReady);
        Ok(result)
    }
}

/// Classify with the canonical rules and default configuration.
pub fn classify(input: &ObservationInput) -> Result<ClassificationResult, ClassifyError> {
    classify_with(input, &CANONICAL_RULES, EngineConfig::default())
}

/// Validate `input` and classify it against `rules`.
pub fn classify_with(
    input: &ObservationInput,
    rules: &RuleSet,
    config: EngineConfig,
) -> Result<ClassificationResult, ClassifyError> {
    let started = Instant::now();
    let outcome = input
        .validate()
        .and_then(|obs| classify_observation(&obs, rules, config));

    match &outcome {
        Ok(res) => {
            let top = res.top().map(|r| r.category.name()).unwrap_or("none");
            ::metrics::counter!("storm_classifications_total", "category" => top).increment(1);
        }
        Err(e) => {
            ::metrics::counter!("storm_classification_errors_total", "kind" => e.kind())
                .increment(1);
        }
    }
    ::metrics::histogram!("storm_classification_duration_us")
        .record(started.elapsed().as_secs_f64() * 1e6);
    outcome
}

/// Classify an already validated observation.
pub fn classify_observation(
    obs: &Observation,
    rules: &RuleSet,
    config: EngineConfig,
) -> Result<ClassificationResult, ClassifyError> {
    let mut ctx = InferenceContext::new(config);
    ctx.bind(obs);
    ctx.run(rules);
    ctx.finish()
}

/// The shared canonical rule set.
pub fn canonical_rules() -> &'static RuleSet {
    &CANONICAL_RULES
}
