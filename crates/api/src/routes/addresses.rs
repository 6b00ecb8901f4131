//! Address routes, nested under a contact.

use axum::{Router, extract::State, routing::get};

use rolodex_core::{AddressId, ContactId};

use crate::error::Result;
use crate::extractors::{ApiJson, ApiPath};
use crate::middleware::RequireUser;
use crate::models::{AddressResponse, CreateAddress, UpdateAddress};
use crate::response::ApiResponse;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/contacts/{contact_id}/addresses",
            get(list).post(create),
        )
        .route(
            "/api/contacts/{contact_id}/addresses/{address_id}",
            get(show).patch(update).delete(delete),
        )
}

async fn create(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ApiPath(contact_id): ApiPath<ContactId>,
    ApiJson(request): ApiJson<CreateAddress>,
) -> Result<ApiResponse<AddressResponse>> {
    let address = state
        .addresses()
        .create(&user, contact_id, request)
        .await?;
    Ok(ApiResponse::created(address))
}

async fn list(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ApiPath(contact_id): ApiPath<ContactId>,
) -> Result<ApiResponse<Vec<AddressResponse>>> {
    let addresses = state.addresses().list(&user, contact_id).await?;
    Ok(ApiResponse::ok(addresses))
}

async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ApiPath((contact_id, address_id)): ApiPath<(ContactId, AddressId)>,
) -> Result<ApiResponse<AddressResponse>> {
    let address = state
        .addresses()
        .get(&user, contact_id, address_id)
        .await?;
    Ok(ApiResponse::ok(address))
}

async fn update(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ApiPath((contact_id, address_id)): ApiPath<(ContactId, AddressId)>,
    ApiJson(request): ApiJson<UpdateAddress>,
) -> Result<ApiResponse<AddressResponse>> {
    let address = state
        .addresses()
        .update(&user, contact_id, address_id, request)
        .await?;
    Ok(ApiResponse::ok(address))
}

async fn delete(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ApiPath((contact_id, address_id)): ApiPath<(ContactId, AddressId)>,
) -> Result<ApiResponse<&'static str>> {
    state
        .addresses()
        .delete(&user, contact_id, address_id)
        .await?;
    Ok(ApiResponse::ok("Address deleted successfully"))
}
