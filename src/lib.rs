// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod normalize;
pub mod observation;
pub mod profile;
pub mod result;
pub mod rules;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::config::EngineConfig;
pub use crate::engine::{classify, classify_observation, classify_with};
pub use crate::error::ClassifyError;
pub use crate::observation::{parse_coordinate, Coordinate, Observation, ObservationInput};
pub use crate::profile::Category;
pub use crate::result::{AdvisoryEntry, AdvisoryKind, ClassificationResult, Ranking};
pub use crate::rules::RuleSet;
