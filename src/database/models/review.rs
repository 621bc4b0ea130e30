use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: i32,
    pub author: String,
    pub date: NaiveDate,
    pub rating: i16,
    pub comment: Option<String>,
    pub restaurant_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewFields {
    pub author: String,
    pub date: NaiveDate,
    pub rating: i16,
    pub comment: Option<String>,
    pub restaurant_id: i32,
}

impl Review {
    pub fn from_fields(id: i32, fields: ReviewFields) -> Self {
        Self {
            id,
            author: fields.author,
            date: fields.date,
            rating: fields.rating,
            comment: fields.comment,
            restaurant_id: fields.restaurant_id,
        }
    }

    pub fn fields(&self) -> ReviewFields {
        ReviewFields {
            author: self.author.clone(),
            date: self.date,
            rating: self.rating,
            comment: self.comment.clone(),
            restaurant_id: self.restaurant_id,
        }
    }
}
