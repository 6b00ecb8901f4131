//! User account routes.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};

use crate::error::Result;
use crate::extractors::ApiJson;
use crate::middleware::RequireUser;
use crate::models::{LoginUser, RegisterUser, TokenResponse, UpdateUser, UserResponse};
use crate::response::ApiResponse;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/users/register", post(register))
        .route("/api/users/login", post(login))
        .route(
            "/api/users/current",
            get(current).patch(update).delete(logout),
        )
}

async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterUser>,
) -> Result<ApiResponse<TokenResponse>> {
    let token = state.users().register(request).await?;
    Ok(ApiResponse::created(token))
}

async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginUser>,
) -> Result<ApiResponse<TokenResponse>> {
    let token = state.users().login(request).await?;
    Ok(ApiResponse::ok(token))
}

async fn current(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> ApiResponse<UserResponse> {
    ApiResponse::ok(state.users().current(&user))
}

async fn update(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ApiJson(request): ApiJson<UpdateUser>,
) -> Result<ApiResponse<UserResponse>> {
    let profile = state.users().update(user, request).await?;
    Ok(ApiResponse::ok(profile))
}

async fn logout(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<ApiResponse<&'static str>> {
    state.users().logout(user).await?;
    Ok(ApiResponse::ok("Logout successful"))
}
