use axum::{http::StatusCode, response::IntoResponse};

/// Every path answers 200; uptime monitors only look at the status.
pub async fn ping() -> impl IntoResponse {
    (StatusCode::OK, "Pong")
}
