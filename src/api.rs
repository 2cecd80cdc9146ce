use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::config::{EngineConfig, HotReloadConfig};
use crate::engine;
use crate::error::ClassifyError;
use crate::observation::ObservationInput;
use crate::profile::{Category, CategoryProfile};
use crate::result::ClassificationResult;
use crate::rules::RuleSet;

#[derive(Clone)]
pub struct AppState {
    config: Arc<HotReloadConfig>,
    rules: Arc<RuleSet>,
}

impl AppState {
    pub fn new(config: HotReloadConfig, rules: RuleSet) -> Self {
        Self {
            config: Arc::new(config),
            rules: Arc::new(rules),
        }
    }

    /// Canonical rules, config from `$STORM_CONFIG_PATH` or `config/`.
    pub fn from_env() -> Self {
        Self::new(HotReloadConfig::from_env(), RuleSet::canonical())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/classify", post(classify))
        .route("/categories", get(categories))
        .route("/rules", get(rules))
        .route("/config", get(config))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// JSON error body for failed classifications.
#[derive(Debug)]
pub struct ApiError(ClassifyError);

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            ClassifyError::InvalidObservation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ClassifyError::NoClassification => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.0.to_string(),
            kind: self.0.kind(),
        };
        (status, Json(body)).into_response()
    }
}

/// The hot-reload check stats the config file, so it runs on the blocking pool.
async fn current_config(state: &AppState) -> EngineConfig {
    let config = Arc::clone(&state.config);
    match tokio::task::spawn_blocking(move || config.current()).await {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(target: "api", error = %e, "config refresh task failed, using defaults");
            EngineConfig::default()
        }
    }
}

async fn classify(
    State(state): State<AppState>,
    Json(input): Json<ObservationInput>,
) -> Result<Json<ClassificationResult>, ApiError> {
    let cfg = current_config(&state).await;
    match engine::classify_with(&input, &state.rules, cfg) {
        Ok(res) => {
            info!(
                target: "api",
                top = res.top().map(|r| r.category.name()).unwrap_or("none"),
                rankings = res.rankings.len(),
                advisories = res.advisories.len(),
                "classified observation"
            );
            Ok(Json(res))
        }
        Err(e) => {
            warn!(target: "api", error = %e, "classification rejected");
            Err(ApiError(e))
        }
    }
}

#[derive(Serialize)]
struct CategoryOut {
    name: Category,
    advice: &'static str,
    profile: CategoryProfile,
}

async fn categories() -> Json<Vec<CategoryOut>> {
    let out = Category::ALL
        .iter()
        .map(|&c| CategoryOut {
            name: c,
            advice: c.advice(),
            profile: *c.profile(),
        })
        .collect();
    Json(out)
}

async fn rules(State(state): State<AppState>) -> Json<RuleSet> {
    Json(state.rules.as_ref().clone())
}

async fn config(State(state): State<AppState>) -> Json<EngineConfig> {
    Json(current_config(&state).await)
}
