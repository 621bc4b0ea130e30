use axum::{
    body::Bytes,
    extract::{Path, State},
};
use serde_json::{json, Value};

use crate::api::body::{review_for_create, review_for_update, RequestBody};
use crate::app::AppState;
use crate::auth::{require_scope, scopes, Claims};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

use super::parse_id;

fn not_found(id: i32) -> ApiError {
    ApiError::not_found(format!("Review {} not found", id))
}

/// GET /reviews - List all reviews ordered by id
pub async fn list(
    State(state): State<AppState>,
    claims: Claims,
) -> ApiResult<Value> {
    require_scope(&claims, scopes::READ_REVIEWS)?;

    let reviews = state.store.list_reviews().await?;
    Ok(ApiResponse::success(json!({ "reviews": reviews })))
}

/// GET /restaurants/:id/reviews - List one restaurant's reviews
pub async fn list_for_restaurant(
    State(state): State<AppState>,
    claims: Claims,
    Path(restaurant_id): Path<String>,
) -> ApiResult<Value> {
    require_scope(&claims, scopes::READ_REVIEWS)?;
    let restaurant_id = parse_id(&restaurant_id, "restaurant")?;

    if state.store.get_restaurant(restaurant_id).await?.is_none() {
        return Err(ApiError::not_found(format!(
            "Restaurant {} not found",
            restaurant_id
        )));
    }
    let reviews = state.store.list_reviews_for_restaurant(restaurant_id).await?;
    Ok(ApiResponse::success(json!({ "reviews": reviews })))
}

/// GET /reviews/:id
pub async fn get(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    require_scope(&claims, scopes::READ_REVIEWS)?;
    let id = parse_id(&id, "review")?;

    let review = state.store.get_review(id).await?.ok_or_else(|| not_found(id))?;
    Ok(ApiResponse::success(json!({ "review": review })))
}

/// POST /reviews/create
pub async fn create(
    State(state): State<AppState>,
    claims: Claims,
    body: Bytes,
) -> ApiResult<Value> {
    require_scope(&claims, scopes::CREATE_REVIEWS)?;

    let body = RequestBody::parse(&body)?;
    let fields = review_for_create(&body)?;
    let review = state.store.create_review(fields).await?;

    tracing::info!(id = review.id, restaurant_id = review.restaurant_id, "Created review");
    Ok(ApiResponse::success(json!({
        "id": review.id,
        "message": format!("Review by {} was successfully created", review.author),
    })))
}

/// PUT /reviews/:id
pub async fn update(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Value> {
    require_scope(&claims, scopes::UPDATE_REVIEWS)?;
    let id = parse_id(&id, "review")?;

    let existing = state.store.get_review(id).await?.ok_or_else(|| not_found(id))?;
    let body = RequestBody::parse(&body)?;
    let fields = review_for_update(&body, &existing)?;

    let review = state
        .store
        .update_review(id, fields)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(id, "Updated review");
    Ok(ApiResponse::success(json!({
        "id": review.id,
        "message": format!("Review by {} was successfully updated", review.author),
    })))
}

/// DELETE /reviews/:id
pub async fn delete(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    require_scope(&claims, scopes::DELETE_REVIEWS)?;
    let id = parse_id(&id, "review")?;

    if !state.store.delete_review(id).await? {
        return Err(not_found(id));
    }

    tracing::info!(id, "Deleted review");
    Ok(ApiResponse::success(json!({
        "id": id,
        "message": format!("Review {} was successfully deleted", id),
    })))
}
