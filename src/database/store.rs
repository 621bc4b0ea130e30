//! DataStore trait definition.

use async_trait::async_trait;

use super::manager::DatabaseResult;
use super::models::{Restaurant, RestaurantFields, Review, ReviewFields};

/// Persistence interface for restaurants and reviews.
///
/// Listings are ordered by id. Lookups of a missing id return `Ok(None)` (or
/// `Ok(false)` for deletes); writing a review that references a missing
/// restaurant fails with [`DatabaseError::Constraint`](super::DatabaseError::Constraint).
/// Deleting a restaurant also deletes its reviews.
#[async_trait]
pub trait DataStore: Send + Sync + 'static {
    async fn health_check(&self) -> DatabaseResult<()>;

    // Restaurants

    async fn list_restaurants(&self) -> DatabaseResult<Vec<Restaurant>>;

    async fn get_restaurant(&self, id: i32) -> DatabaseResult<Option<Restaurant>>;

    async fn create_restaurant(&self, fields: RestaurantFields) -> DatabaseResult<Restaurant>;

    /// Overwrite every column of restaurant `id`
    async fn update_restaurant(
        &self,
        id: i32,
        fields: RestaurantFields,
    ) -> DatabaseResult<Option<Restaurant>>;

    async fn delete_restaurant(&self, id: i32) -> DatabaseResult<bool>;

    // Reviews

    async fn list_reviews(&self) -> DatabaseResult<Vec<Review>>;

    async fn list_reviews_for_restaurant(&self, restaurant_id: i32) -> DatabaseResult<Vec<Review>>;

    async fn get_review(&self, id: i32) -> DatabaseResult<Option<Review>>;

    async fn create_review(&self, fields: ReviewFields) -> DatabaseResult<Review>;

    async fn update_review(&self, id: i32, fields: ReviewFields) -> DatabaseResult<Option<Review>>;

    async fn delete_review(&self, id: i32) -> DatabaseResult<bool>;
}

pub(crate) fn missing_restaurant(restaurant_id: i32) -> super::DatabaseError {
    super::DatabaseError::Constraint(format!("Restaurant {} does not exist", restaurant_id))
}
