use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{CredentialsRequest, PublicUser, TokenResponse},
        extractors::AuthUser,
        services::CredentialStore,
    },
    error::Result,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>> {
    let Json(payload) = payload?;
    let creds = CredentialStore::from_ref(&state);
    let token = creds.register(&payload.email, &payload.password).await?;
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>> {
    let Json(payload) = payload?;
    let creds = CredentialStore::from_ref(&state);
    let token = creds.authenticate(&payload.email, &payload.password).await?;
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>> {
    let creds = CredentialStore::from_ref(&state);
    Ok(Json(creds.profile(user_id).await?))
}
