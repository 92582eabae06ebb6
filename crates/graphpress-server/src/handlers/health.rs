use axum::Json;

use crate::schema::common::Envelope;
use crate::schema::health::HealthResponse;

/// `GET /health`
pub async fn health() -> Json<Envelope<HealthResponse>> {
    Json(Envelope::ok(HealthResponse { status: "ok" }))
}
