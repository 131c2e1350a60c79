use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{
            AuthResponse, LoginRequest, LoginResponse, MessageResponse, SignupRequest,
            UpdateUserRequest,
        },
        extractors::{AuthUser, MaybeAuthUser},
        repo_types::User,
        services::Session,
        session::{clear_session_cookie, session_cookie},
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/user", get(get_user).put(update_user))
}

/// Unwraps a JSON body, turning malformed input into a 400 with a JSON error.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::validation(rejection.body_text()))
}

fn with_session_cookie(state: &AppState, session: &Session) -> Result<HeaderMap, AppError> {
    let cookie = session_cookie(
        &session.token,
        state.keys.ttl(),
        state.config.cookie_secure,
    )
    .map_err(|e| AppError::persistence("Failed to set session cookie", e))?;
    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, cookie);
    Ok(headers)
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, HeaderMap, Json<AuthResponse>), AppError> {
    let session = state.auth.signup(json_body(payload)?).await?;
    let headers =
        with_session_cookie(&state, &session).map_err(|e| e.with_context("Failed to register user"))?;
    Ok((
        StatusCode::CREATED,
        headers,
        Json(AuthResponse {
            user: session.user,
            token: session.token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(HeaderMap, Json<LoginResponse>), AppError> {
    let session = state.auth.login(json_body(payload)?).await?;
    let headers =
        with_session_cookie(&state, &session).map_err(|e| e.with_context("Failed to log in"))?;
    Ok((
        headers,
        Json(LoginResponse {
            user: session.user,
            token: session.token,
            message: "Login successful",
        }),
    ))
}

/// Always succeeds; a missing or stale session is not an error.
#[instrument(skip(state, user))]
pub async fn logout(
    State(state): State<AppState>,
    user: MaybeAuthUser,
) -> (HeaderMap, Json<MessageResponse>) {
    if let MaybeAuthUser(Some(user_id)) = user {
        info!(user_id, "user logged out");
    }
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        clear_session_cookie(state.config.cookie_secure),
    );
    (
        headers,
        Json(MessageResponse {
            message: "User logged out successfully",
        }),
    )
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<User>, AppError> {
    Ok(Json(state.auth.profile(user_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<User>, AppError> {
    let req = json_body(payload)?;
    Ok(Json(state.auth.update_profile(user_id, req).await?))
}
