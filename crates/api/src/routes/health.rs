use axum::extract::State;
use axum::{routing::get, Json, Router};
use devices_core::validation::source::ReloadMode;
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// `per_request` or `cached`.
    pub rules_reload_mode: &'static str,
    /// Group count of the last published rule catalog, if one was ever loaded.
    pub rule_groups: Option<usize>,
}

/// GET /health -- returns service and rule catalog health.
///
/// In cached mode a service that has never published a catalog reports
/// `degraded`.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let source = state.validator.source();
    let rule_groups = source.current().await.map(|catalog| catalog.len());

    let (rules_reload_mode, status) = match source.mode() {
        ReloadMode::PerRequest => ("per_request", "ok"),
        ReloadMode::Cached if rule_groups.is_some() => ("cached", "ok"),
        ReloadMode::Cached => ("cached", "degraded"),
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        rules_reload_mode,
        rule_groups,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
