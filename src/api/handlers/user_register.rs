use crate::api::registration::{RegisterError, RegisterRequest, RegisterResponse, Registration};
use axum::{extract::Extension, http::StatusCode, Json};
use std::sync::Arc;
use tracing::{debug, instrument};

#[utoipa::path(
    post,
    path= "/register",
    request_body = RegisterRequest,
    responses (
        (status = 201, description = "Registration successful", body = RegisterResponse, content_type = "application/json"),
        (status = 400, description = "A field is missing or the email is already registered"),
        (status = 500, description = "The user could not be stored"),
    ),
    tag= "auth"
)]
// axum handler for user registration
#[instrument(skip(registration, payload))]
pub async fn register(
    registration: Extension<Arc<Registration>>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<(StatusCode, Json<RegisterResponse>), RegisterError> {
    // a body that is not a JSON object counts as an empty one
    let request = payload.map(|Json(payload)| payload).unwrap_or_default();

    debug!("request: {:?}", request);

    let user = registration.register(request).await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse::registered(user))))
}
