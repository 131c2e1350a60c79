use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    error::AppError,
    state::AppState,
    stats::{
        dto::{InvalidIdResponse, SuicidesFilter, SuicidesQuery},
        repo_types::{Resource, SuicideRecord},
    },
};

/// Country codes identifying a resource group are ISO alpha-3.
const RESOURCE_ID_LEN: usize = 3;

pub fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_suicides))
        .route("/data", get(suicides_data))
}

pub fn resource_routes() -> Router<AppState> {
    Router::new()
        .route("/resources", get(list_resources))
        .route("/resources/:id", get(country_resources))
}

#[instrument(skip(state))]
pub async fn list_suicides(
    State(state): State<AppState>,
) -> Result<Json<Vec<SuicideRecord>>, AppError> {
    let rows = state
        .stats
        .all_suicides()
        .await
        .map_err(|e| AppError::persistence("Failed to fetch suicides data", e))?;
    Ok(Json(rows))
}

#[instrument(skip(state, query))]
pub async fn suicides_data(
    State(state): State<AppState>,
    query: Result<Query<SuicidesQuery>, QueryRejection>,
) -> Result<Json<Vec<SuicideRecord>>, AppError> {
    let Query(query) = query.map_err(|r| AppError::validation(r.body_text()))?;
    let filter = SuicidesFilter::try_from(query)?;
    let rows = state
        .stats
        .suicides_data(&filter)
        .await
        .map_err(|e| AppError::persistence("Failed to fetch suicides data", e))?;
    Ok(Json(rows))
}

#[instrument(skip(state))]
pub async fn list_resources(State(state): State<AppState>) -> Result<Json<Vec<Resource>>, AppError> {
    let rows = state
        .stats
        .all_resources()
        .await
        .map_err(|e| AppError::persistence("Internal server error", e))?;
    Ok(Json(rows))
}

#[instrument(skip(state))]
pub async fn country_resources(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    if id.chars().count() != RESOURCE_ID_LEN {
        warn!(%id, "invalid resource id");
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(InvalidIdResponse {
                error: "Invalid ID format",
                id,
            }),
        )
            .into_response());
    }
    let rows = state
        .stats
        .resources_by_country(&id.to_uppercase())
        .await
        .map_err(|e| AppError::persistence("Internal server error", e))?;
    Ok(Json(rows).into_response())
}
