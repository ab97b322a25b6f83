use axum::{http::StatusCode, Json};

/// Liveness check. Doesn't touch the database
pub async fn ping() -> (StatusCode, Json<&'static str>) {
    (StatusCode::OK, Json("pong"))
}
