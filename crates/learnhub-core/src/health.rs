use axum::http::StatusCode;

/// `GET /healthz`. Answers 200 whenever the process is serving at all.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// `GET /readyz`. Same as liveness for now; a service with real startup
/// dependencies wires its own probe instead.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}
