use axum::{
    body::Bytes,
    extract::{Path, State},
};
use serde_json::{json, Value};

use crate::api::body::{restaurant_for_create, restaurant_for_update, RequestBody};
use crate::app::AppState;
use crate::auth::{require_scope, scopes, Claims};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

use super::parse_id;

fn not_found(id: i32) -> ApiError {
    ApiError::not_found(format!("Restaurant {} not found", id))
}

/// GET /restaurants - List all restaurants ordered by id
pub async fn list(
    State(state): State<AppState>,
    claims: Claims,
) -> ApiResult<Value> {
    require_scope(&claims, scopes::READ_RESTAURANTS)?;

    let restaurants = state.store.list_restaurants().await?;
    Ok(ApiResponse::success(json!({ "restaurants": restaurants })))
}

/// GET /restaurants/:id - Get a single restaurant
pub async fn get(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    require_scope(&claims, scopes::READ_RESTAURANTS)?;
    let id = parse_id(&id, "restaurant")?;

    let restaurant = state.store.get_restaurant(id).await?.ok_or_else(|| not_found(id))?;
    Ok(ApiResponse::success(json!({ "restaurant": restaurant })))
}

/// POST /restaurants/create - Create a restaurant from a JSON body
pub async fn create(
    State(state): State<AppState>,
    claims: Claims,
    body: Bytes,
) -> ApiResult<Value> {
    require_scope(&claims, scopes::CREATE_RESTAURANTS)?;

    let body = RequestBody::parse(&body)?;
    let fields = restaurant_for_create(&body)?;
    let restaurant = state.store.create_restaurant(fields).await?;

    tracing::info!(
        id = restaurant.id,
        creator = %restaurant.creator,
        "Created restaurant"
    );
    Ok(ApiResponse::success(json!({
        "id": restaurant.id,
        "message": format!("Restaurant {} was successfully created", restaurant.name),
    })))
}

/// PUT /restaurants/:id - Apply the fields present in the body to a restaurant
pub async fn update(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Value> {
    require_scope(&claims, scopes::UPDATE_RESTAURANTS)?;
    let id = parse_id(&id, "restaurant")?;

    let existing = state.store.get_restaurant(id).await?.ok_or_else(|| not_found(id))?;
    let body = RequestBody::parse(&body)?;
    let fields = restaurant_for_update(&body, &existing)?;

    let restaurant = state
        .store
        .update_restaurant(id, fields)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(id, "Updated restaurant");
    Ok(ApiResponse::success(json!({
        "id": restaurant.id,
        "message": format!("Restaurant {} was successfully updated", restaurant.name),
    })))
}

/// DELETE /restaurants/:id - Delete a restaurant and its reviews
pub async fn delete(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    require_scope(&claims, scopes::DELETE_RESTAURANTS)?;
    let id = parse_id(&id, "restaurant")?;

    let existing = state.store.get_restaurant(id).await?.ok_or_else(|| not_found(id))?;
    if !state.store.delete_restaurant(id).await? {
        return Err(not_found(id));
    }

    tracing::info!(id, "Deleted restaurant");
    Ok(ApiResponse::success(json!({
        "id": id,
        "message": format!("Restaurant {} was successfully deleted", existing.name),
    })))
}
