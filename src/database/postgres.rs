//! PostgreSQL implementation of [`DataStore`].

use async_trait::async_trait;
use sqlx::PgPool;

use super::manager::{DatabaseError, DatabaseManager, DatabaseResult};
use super::models::{Restaurant, RestaurantFields, Review, ReviewFields};
use super::store::{missing_restaurant, DataStore};

const RESTAURANT_COLUMNS: &str = "id, name, creator, street, suite, city, state, zip_code, \
     phone_num, website, email, date_established";

const REVIEW_COLUMNS: &str = "id, author, date, rating, comment, restaurant_id";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translate a foreign key violation on `review.restaurant_id` into a constraint error
fn review_write_error(err: sqlx::Error, restaurant_id: i32) -> DatabaseError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            return missing_restaurant(restaurant_id);
        }
    }
    err.into()
}

#[async_trait]
impl DataStore for PgStore {
    async fn health_check(&self) -> DatabaseResult<()> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn list_restaurants(&self) -> DatabaseResult<Vec<Restaurant>> {
        let sql = format!("SELECT {} FROM restaurant ORDER BY id", RESTAURANT_COLUMNS);
        let rows = sqlx::query_as::<_, Restaurant>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_restaurant(&self, id: i32) -> DatabaseResult<Option<Restaurant>> {
        let sql = format!("SELECT {} FROM restaurant WHERE id = $1", RESTAURANT_COLUMNS);
        let row = sqlx::query_as::<_, Restaurant>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_restaurant(&self, fields: RestaurantFields) -> DatabaseResult<Restaurant> {
        let sql = format!(
            "INSERT INTO restaurant (name, creator, street, suite, city, state, zip_code, \
             phone_num, website, email, date_established) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {}",
            RESTAURANT_COLUMNS
        );
        let row = sqlx::query_as::<_, Restaurant>(&sql)
            .bind(fields.name)
            .bind(fields.creator)
            .bind(fields.street)
            .bind(fields.suite)
            .bind(fields.city)
            .bind(fields.state)
            .bind(fields.zip_code)
            .bind(fields.phone_num)
            .bind(fields.website)
            .bind(fields.email)
            .bind(fields.date_established)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_restaurant(
        &self,
        id: i32,
        fields: RestaurantFields,
    ) -> DatabaseResult<Option<Restaurant>> {
        let sql = format!(
            "UPDATE restaurant SET name = $2, creator = $3, street = $4, suite = $5, city = $6, \
             state = $7, zip_code = $8, phone_num = $9, website = $10, email = $11, \
             date_established = $12 WHERE id = $1 RETURNING {}",
            RESTAURANT_COLUMNS
        );
        let row = sqlx::query_as::<_, Restaurant>(&sql)
            .bind(id)
            .bind(fields.name)
            .bind(fields.creator)
            .bind(fields.street)
            .bind(fields.suite)
            .bind(fields.city)
            .bind(fields.state)
            .bind(fields.zip_code)
            .bind(fields.phone_num)
            .bind(fields.website)
            .bind(fields.email)
            .bind(fields.date_established)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_restaurant(&self, id: i32) -> DatabaseResult<bool> {
        // review rows go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM restaurant WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_reviews(&self) -> DatabaseResult<Vec<Review>> {
        let sql = format!("SELECT {} FROM review ORDER BY id", REVIEW_COLUMNS);
        let rows = sqlx::query_as::<_, Review>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn list_reviews_for_restaurant(&self, restaurant_id: i32) -> DatabaseResult<Vec<Review>> {
        let sql = format!(
            "SELECT {} FROM review WHERE restaurant_id = $1 ORDER BY id",
            REVIEW_COLUMNS
        );
        let rows = sqlx::query_as::<_, Review>(&sql)
            .bind(restaurant_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_review(&self, id: i32) -> DatabaseResult<Option<Review>> {
        let sql = format!("SELECT {} FROM review WHERE id = $1", REVIEW_COLUMNS);
        let row = sqlx::query_as::<_, Review>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_review(&self, fields: ReviewFields) -> DatabaseResult<Review> {
        let sql = format!(
            "INSERT INTO review (author, date, rating, comment, restaurant_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            REVIEW_COLUMNS
        );
        let restaurant_id = fields.restaurant_id;
        sqlx::query_as::<_, Review>(&sql)
            .bind(fields.author)
            .bind(fields.date)
            .bind(fields.rating)
            .bind(fields.comment)
            .bind(fields.restaurant_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| review_write_error(e, restaurant_id))
    }

    async fn update_review(&self, id: i32, fields: ReviewFields) -> DatabaseResult<Option<Review>> {
        let sql = format!(
            "UPDATE review SET author = $2, date = $3, rating = $4, comment = $5, \
             restaurant_id = $6 WHERE id = $1 RETURNING {}",
            REVIEW_COLUMNS
        );
        let restaurant_id = fields.restaurant_id;
        sqlx::query_as::<_, Review>(&sql)
            .bind(id)
            .bind(fields.author)
            .bind(fields.date)
            .bind(fields.rating)
            .bind(fields.comment)
            .bind(fields.restaurant_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| review_write_error(e, restaurant_id))
    }

    async fn delete_review(&self, id: i32) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM review WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
