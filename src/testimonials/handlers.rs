use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{extractors::AuthUser, handlers::json_body},
    error::AppError,
    state::AppState,
    testimonials::{dto::CreateTestimonialRequest, repo_types::Testimonial},
};

pub fn testimonial_routes() -> Router<AppState> {
    Router::new()
        .route("/testimonials", get(list_testimonials))
        .route("/testimonial", post(add_testimonial))
}

#[instrument(skip(state))]
pub async fn list_testimonials(
    State(state): State<AppState>,
) -> Result<Json<Vec<Testimonial>>, AppError> {
    let rows = state
        .testimonials
        .list()
        .await
        .map_err(|e| AppError::persistence("Failed to fetch testimonials", e))?;
    Ok(Json(rows))
}

#[instrument(skip(state, payload))]
pub async fn add_testimonial(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<CreateTestimonialRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Testimonial>), AppError> {
    let text = json_body(payload)?
        .testimonial
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::validation("All fields are required"))?;

    let created = state
        .testimonials
        .create(user_id, &text)
        .await
        .map_err(|e| AppError::persistence("Failed to add testimonial", e))?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    info!(user_id, testimonial_id = created.id, "testimonial added");
    Ok((StatusCode::CREATED, Json(created)))
}
