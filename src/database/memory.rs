//! In-memory storage implementation for testing and local development.
//!
//! Mirrors the PostgreSQL schema semantics: serial ids starting at 1, id-ordered
//! listings, the review → restaurant foreign key and its cascading delete.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::manager::DatabaseResult;
use super::models::{Restaurant, RestaurantFields, Review, ReviewFields};
use super::store::{missing_restaurant, DataStore};

#[derive(Debug, Default)]
struct Tables {
    restaurants: BTreeMap<i32, Restaurant>,
    reviews: BTreeMap<i32, Review>,
    restaurant_seq: i32,
    review_seq: i32,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn health_check(&self) -> DatabaseResult<()> {
        Ok(())
    }

    async fn list_restaurants(&self) -> DatabaseResult<Vec<Restaurant>> {
        Ok(self.tables.read().await.restaurants.values().cloned().collect())
    }

    async fn get_restaurant(&self, id: i32) -> DatabaseResult<Option<Restaurant>> {
        Ok(self.tables.read().await.restaurants.get(&id).cloned())
    }

    async fn create_restaurant(&self, fields: RestaurantFields) -> DatabaseResult<Restaurant> {
        let mut tables = self.tables.write().await;
        tables.restaurant_seq += 1;
        let restaurant = Restaurant::from_fields(tables.restaurant_seq, fields);
        tables.restaurants.insert(restaurant.id, restaurant.clone());
        Ok(restaurant)
    }

    async fn update_restaurant(
        &self,
        id: i32,
        fields: RestaurantFields,
    ) -> DatabaseResult<Option<Restaurant>> {
        let mut tables = self.tables.write().await;
        Ok(tables.restaurants.get_mut(&id).map(|existing| {
            *existing = Restaurant::from_fields(id, fields);
            existing.clone()
        }))
    }

    async fn delete_restaurant(&self, id: i32) -> DatabaseResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.restaurants.remove(&id).is_none() {
            return Ok(false);
        }
        tables.reviews.retain(|_, review| review.restaurant_id != id);
        Ok(true)
    }

    async fn list_reviews(&self) -> DatabaseResult<Vec<Review>> {
        Ok(self.tables.read().await.reviews.values().cloned().collect())
    }

    async fn list_reviews_for_restaurant(&self, restaurant_id: i32) -> DatabaseResult<Vec<Review>> {
        Ok(self
            .tables
            .read()
            .await
            .reviews
            .values()
            .filter(|review| review.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    async fn get_review(&self, id: i32) -> DatabaseResult<Option<Review>> {
        Ok(self.tables.read().await.reviews.get(&id).cloned())
    }

    async fn create_review(&self, fields: ReviewFields) -> DatabaseResult<Review> {
        let mut tables = self.tables.write().await;
        if !tables.restaurants.contains_key(&fields.restaurant_id) {
            return Err(missing_restaurant(fields.restaurant_id));
        }
        tables.review_seq += 1;
        let review = Review::from_fields(tables.review_seq, fields);
        tables.reviews.insert(review.id, review.clone());
        Ok(review)
    }

    async fn update_review(&self, id: i32, fields: ReviewFields) -> DatabaseResult<Option<Review>> {
        let mut tables = self.tables.write().await;
        if !tables.reviews.contains_key(&id) {
            return Ok(None);
        }
        if !tables.restaurants.contains_key(&fields.restaurant_id) {
            return Err(missing_restaurant(fields.restaurant_id));
        }
        let review = Review::from_fields(id, fields);
        tables.reviews.insert(id, review.clone());
        Ok(Some(review))
    }

    async fn delete_review(&self, id: i32) -> DatabaseResult<bool> {
        Ok(self.tables.write().await.reviews.remove(&id).is_some())
    }
}
