//! # Normalizer
//! Numerically stable softmax over log-weights (log-sum-exp trick).
//!
//! The maximum log-weight is subtracted before exponentiating, so even
//! strongly negative log-likelihoods (e.g. -60) normalize without underflow
//! to an all-zero vector.

use thiserror::Error;

use crate::result::{AdvisoryEntry, Ranking, ScoreEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// Nothing to normalize ("no data").
    #[error("cannot normalize an empty vector")]
    Empty,
    /// The largest log-weight is NaN or infinite.
    #[error("log-weights contain no finite maximum")]
    NonFinite,
}

/// Convert log-weights into probabilities summing to 1.
pub fn softmax(log_weights: &[f64]) -> Result<Vec<f64>, NormalizeError> {
    if log_weights.is_empty() {
        return Err(NormalizeError::Empty);
    }

    let max = log_weights
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return Err(NormalizeError::NonFinite);
    }

    let exps: Vec<f64> = log_weights.iter().map(|w| (w - max).exp()).collect();
    // The max term contributes exp(0) = 1, so total >= 1.
    let total: f64 = exps.iter().sum();
    Ok(exps.into_iter().map(|e| e / total).collect())
}

/// Replace a score vector by its normalized distribution.
pub fn normalize_scores(scores: &[ScoreEntry]) -> Result<Vec<Ranking>, NormalizeError> {
    let logs: Vec<f64> = scores.iter().map(|s| s.log_probability).collect();
    let probs = softmax(&logs)?;
    Ok(scores
        .iter()
        .zip(probs)
        .map(|(s, probability)| Ranking {
            category: s.category,
            probability,
        })
        .collect())
}

/// Rescale advisory weights into their own distribution, keeping order
/// and relative size. Weights are floored before the log; an empty list
/// stays empty.
pub fn normalize_advisories(advisories: Vec<AdvisoryEntry>, floor: f64) -> Vec<AdvisoryEntry> {
    let logs: Vec<f64> = advisories.iter().map(|a| a.weight.max(floor).ln()).collect();
    match softmax(&logs) {
        Ok(weights) => advisories
            .into_iter()
            .zip(weights)
            .map(|(a, weight)| AdvisoryEntry { weight, ..a })
            .collect(),
        Err(_) => advisories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Category;
    use crate::result::AdvisoryKind;
    use approx::assert_abs_diff_eq;

    #[test]
    fn uniform_input_gives_uniform_output() {
        for n in [1usize, 2, 5, 10, 37] {
            let out = softmax(&vec![-3.5; n]).unwrap();
            assert_eq!(out.len(), n);
            for p in &out {
                assert_abs_diff_eq!(*p, 1.0 / n as f64, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn very_negative_logs_do_not_underflow() {
        let out = softmax(&[-1000.0, -1001.0, -1002.0]).unwrap();
        assert_abs_diff_eq!(out.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert!(out[0] > out[1] && out[1] > out[2]);
        assert!(out[2] > 0.0);
    }

    #[test]
    fn large_logs_do_not_overflow() {
        let out = softmax(&[800.0, 799.0]).unwrap();
        assert!(out.iter().all(|p| p.is_finite()));
        assert_abs_diff_eq!(out[0] / out[1], std::f64::consts::E, epsilon = 1e-9);
    }

    #[test]
    fn empty_and_non_finite_are_errors() {
        assert_eq!(softmax(&[]), Err(NormalizeError::Empty));
        assert_eq!(
            softmax(&[f64::NEG_INFINITY, f64::NEG_INFINITY]),
            Err(NormalizeError::NonFinite)
        );
        assert_eq!(normalize_scores(&[]), Err(NormalizeError::Empty));
    }

    #[test]
    fn keeps_category_order() {
        let scores = [
            ScoreEntry {
                category: Category::Calm,
                log_probability: 0.0,
            },
            ScoreEntry {
                category: Category::MildHurricane,
                log_probability: 2f64.ln(),
            },
        ];
        let out = normalize_scores(&scores).unwrap();
        assert_eq!(out[0].category, Category::Calm);
        assert_abs_diff_eq!(out[0].probability, 1.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[1].probability, 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn advisories_become_a_distribution() {
        let adv = vec![
            AdvisoryEntry::new("near", 1.0, AdvisoryKind::Proximity),
            AdvisoryEntry::new("humid", 0.9, AdvisoryKind::Humidity),
            AdvisoryEntry::new("calm", 0.6, AdvisoryKind::Category),
            AdvisoryEntry::new("gone", 0.0, AdvisoryKind::Category),
        ];
        let out = normalize_advisories(adv, 1e-10);
        assert_eq!(out.len(), 4);
        assert_abs_diff_eq!(out.iter().map(|a| a.weight).sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[0].weight, 1.0 / 2.5, epsilon = 1e-9);
        assert_abs_diff_eq!(out[1].weight / out[2].weight, 1.5, epsilon = 1e-9);
        assert!(out[3].weight > 0.0 && out[3].weight < 1e-9);
        assert_eq!(out[1].text, "humid");
        assert!(normalize_advisories(Vec::new(), 1e-10).is_empty());
    }
}
