use axum::response::{IntoResponse, Json};

#[utoipa::path(
    get,
    path= "/",
    responses (
        (status = 200, description = "Service banner", body = String, content_type = "application/json"),
    ),
    tag= "taskflow"
)]
// axum handler for root
pub async fn root() -> impl IntoResponse {
    Json("taskflow")
}

#[utoipa::path(
    get,
    path= "/test",
    responses (
        (status = 200, description = "Smoke test", body = String, content_type = "application/json"),
    ),
    tag= "taskflow"
)]
// axum handler for test
pub async fn test() -> impl IntoResponse {
    Json("tested")
}
