//! Liveness probe.

use super::HttpState;
use axum::Json;
use axum::extract::State;
use serde::Serialize;

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    /// Always `"ok"` while the server accepts requests.
    pub status: &'static str,
    /// Service name of the loaded catalog.
    pub service: String,
    /// Transport serving the probe.
    pub transport: &'static str,
}

pub(super) async fn health(State(state): State<HttpState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        service: state.service_name.as_ref().to_owned(),
        transport: "http",
    })
}
