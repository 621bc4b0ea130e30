use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Restaurant {
    pub id: i32,
    pub name: String,
    pub creator: String,
    pub street: Option<String>,
    pub suite: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone_num: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub date_established: Option<String>,
}

/// Every column of a restaurant except its id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestaurantFields {
    pub name: String,
    pub creator: String,
    pub street: Option<String>,
    pub suite: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone_num: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub date_established: Option<String>,
}

impl RestaurantFields {
    /// Fields for a restaurant with only the required columns set
    pub fn new(name: impl Into<String>, creator: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            creator: creator.into(),
            ..Default::default()
        }
    }
}

impl Restaurant {
    pub fn from_fields(id: i32, fields: RestaurantFields) -> Self {
        Self {
            id,
            name: fields.name,
            creator: fields.creator,
            street: fields.street,
            suite: fields.suite,
            city: fields.city,
            state: fields.state,
            zip_code: fields.zip_code,
            phone_num: fields.phone_num,
            website: fields.website,
            email: fields.email,
            date_established: fields.date_established,
        }
    }

    pub fn fields(&self) -> RestaurantFields {
        RestaurantFields {
            name: self.name.clone(),
            creator: self.creator.clone(),
            street: self.street.clone(),
            suite: self.suite.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip_code: self.zip_code.clone(),
            phone_num: self.phone_num.clone(),
            website: self.website.clone(),
            email: self.email.clone(),
            date_established: self.date_established.clone(),
        }
    }
}
