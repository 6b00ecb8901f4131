//! Contact routes.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};

use rolodex_core::ContactId;

use crate::error::Result;
use crate::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::RequireUser;
use crate::models::{
    ContactResponse, ContactSearch, ContactSearchResult, CreateContact, UpdateContact,
};
use crate::response::ApiResponse;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/contacts", post(create).get(search))
        .route(
            "/api/contacts/{contact_id}",
            get(show).patch(update).delete(delete),
        )
}

async fn create(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ApiJson(request): ApiJson<CreateContact>,
) -> Result<ApiResponse<ContactResponse>> {
    let contact = state.contacts().create(&user, request).await?;
    Ok(ApiResponse::created(contact))
}

async fn search(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ApiQuery(query): ApiQuery<ContactSearch>,
) -> Result<ApiResponse<ContactSearchResult>> {
    let result = state.contacts().search(&user, query).await?;
    Ok(ApiResponse::ok(result))
}

async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ApiPath(contact_id): ApiPath<ContactId>,
) -> Result<ApiResponse<ContactResponse>> {
    let contact = state.contacts().get(&user, contact_id).await?;
    Ok(ApiResponse::ok(contact))
}

async fn update(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ApiPath(contact_id): ApiPath<ContactId>,
    ApiJson(request): ApiJson<UpdateContact>,
) -> Result<ApiResponse<ContactResponse>> {
    let contact = state.contacts().update(&user, contact_id, request).await?;
    Ok(ApiResponse::ok(contact))
}

async fn delete(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ApiPath(contact_id): ApiPath<ContactId>,
) -> Result<ApiResponse<&'static str>> {
    state.contacts().delete(&user, contact_id).await?;
    Ok(ApiResponse::ok("Contact deleted successfully"))
}
