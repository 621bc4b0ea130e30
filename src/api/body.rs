//! Request body normalization
//!
//! Pulls entity attributes out of a JSON object body. Present string values are
//! truncated to their column bound; absent (or `null`) values fall back to a
//! caller-supplied default, which gives create its required-field checks and
//! update its partial-update behaviour.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::database::{Restaurant, RestaurantFields, Review, ReviewFields};

/// Maximum length, in characters, of ordinary string fields
pub const DEF_MAX_STR_LEN: usize = 80;

/// Maximum length, in characters, of a review comment
pub const MAX_COMMENT_LEN: usize = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BodyError {
    #[error("Malformed JSON body: {0}")]
    Malformed(String),

    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("Restaurant name cannot be blank")]
    BlankName,

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Truncate `value` to at most `max_len` characters
pub fn truncate(value: &str, max_len: usize) -> String {
    match value.char_indices().nth(max_len) {
        Some((byte_idx, _)) => value[..byte_idx].to_string(),
        None => value.to_string(),
    }
}

/// A request body that parsed as a JSON object
#[derive(Debug, Clone, Default)]
pub struct RequestBody(Map<String, Value>);

impl RequestBody {
    pub fn parse(bytes: &[u8]) -> Result<Self, BodyError> {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(_) => Err(BodyError::Malformed("expected a JSON object".to_string())),
            Err(e) => Err(BodyError::Malformed(e.to_string())),
        }
    }

    fn present(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|v| !v.is_null())
    }

    /// The field's string value truncated to `max_len`, else `default`
    pub fn string(
        &self,
        field: &'static str,
        max_len: usize,
        default: Option<String>,
    ) -> Result<Option<String>, BodyError> {
        match self.present(field) {
            None => Ok(default),
            Some(Value::String(s)) => Ok(Some(truncate(s, max_len))),
            Some(other) => Err(invalid(field, format!("expected a string, got {}", other))),
        }
    }

    /// The field's integer value, checked against the range of `T`, else `default`
    pub fn integer<T>(&self, field: &'static str, default: Option<T>) -> Result<Option<T>, BodyError>
    where
        T: TryFrom<i64>,
    {
        match self.present(field) {
            None => Ok(default),
            Some(value) => {
                let n = value
                    .as_i64()
                    .ok_or_else(|| invalid(field, format!("expected an integer, got {}", value)))?;
                T::try_from(n)
                    .map(Some)
                    .map_err(|_| invalid(field, format!("{} is out of range", n)))
            }
        }
    }

    /// The field's `YYYY-MM-DD` date value, else `default`
    pub fn date(
        &self,
        field: &'static str,
        default: Option<NaiveDate>,
    ) -> Result<Option<NaiveDate>, BodyError> {
        match self.present(field) {
            None => Ok(default),
            Some(Value::String(s)) => s
                .parse::<NaiveDate>()
                .map(Some)
                .map_err(|_| invalid(field, format!("'{}' is not a YYYY-MM-DD date", s))),
            Some(other) => Err(invalid(field, format!("expected a date string, got {}", other))),
        }
    }
}

fn invalid(field: &'static str, reason: String) -> BodyError {
    BodyError::InvalidField { field, reason }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Optional restaurant columns, each defaulting to `base`'s value
fn restaurant_optionals(
    body: &RequestBody,
    base: &RestaurantFields,
) -> Result<RestaurantFields, BodyError> {
    let s = |field: &'static str, default: &Option<String>| {
        body.string(field, DEF_MAX_STR_LEN, default.clone())
    };
    Ok(RestaurantFields {
        name: base.name.clone(),
        creator: base.creator.clone(),
        street: s("street", &base.street)?,
        suite: s("suite", &base.suite)?,
        city: s("city", &base.city)?,
        state: s("state", &base.state)?,
        zip_code: s("zip_code", &base.zip_code)?,
        phone_num: s("phone_num", &base.phone_num)?,
        website: s("website", &base.website)?,
        email: s("email", &base.email)?,
        date_established: s("date_established", &base.date_established)?,
    })
}

/// Fields for a new restaurant; `name` and `creator` are required
pub fn restaurant_for_create(body: &RequestBody) -> Result<RestaurantFields, BodyError> {
    let name = non_blank(body.string("name", DEF_MAX_STR_LEN, None)?)
        .ok_or(BodyError::MissingRequiredField("name"))?;
    let creator = non_blank(body.string("creator", DEF_MAX_STR_LEN, None)?)
        .ok_or(BodyError::MissingRequiredField("creator"))?;

    let mut fields = restaurant_optionals(body, &RestaurantFields::default())?;
    fields.name = name;
    fields.creator = creator;
    Ok(fields)
}

/// `existing` with the fields present in `body` applied on top
pub fn restaurant_for_update(
    body: &RequestBody,
    existing: &Restaurant,
) -> Result<RestaurantFields, BodyError> {
    let base = existing.fields();
    let name = body
        .string("name", DEF_MAX_STR_LEN, Some(base.name.clone()))?
        .unwrap_or_default();
    if name.trim().is_empty() {
        return Err(BodyError::BlankName);
    }
    let creator = non_blank(body.string("creator", DEF_MAX_STR_LEN, Some(base.creator.clone()))?)
        .ok_or(BodyError::MissingRequiredField("creator"))?;

    let mut fields = restaurant_optionals(body, &base)?;
    fields.name = name;
    fields.creator = creator;
    Ok(fields)
}

/// Fields for a new review; everything except `comment` is required
pub fn review_for_create(body: &RequestBody) -> Result<ReviewFields, BodyError> {
    Ok(ReviewFields {
        author: non_blank(body.string("author", DEF_MAX_STR_LEN, None)?)
            .ok_or(BodyError::MissingRequiredField("author"))?,
        date: body
            .date("date", None)?
            .ok_or(BodyError::MissingRequiredField("date"))?,
        rating: body
            .integer::<i16>("rating", None)?
            .ok_or(BodyError::MissingRequiredField("rating"))?,
        comment: body.string("comment", MAX_COMMENT_LEN, None)?,
        restaurant_id: body
            .integer::<i32>("restaurant_id", None)?
            .ok_or(BodyError::MissingRequiredField("restaurant_id"))?,
    })
}

/// `existing` with the fields present in `body` applied on top
pub fn review_for_update(body: &RequestBody, existing: &Review) -> Result<ReviewFields, BodyError> {
    let base = existing.fields();
    Ok(ReviewFields {
        author: non_blank(body.string("author", DEF_MAX_STR_LEN, Some(base.author))?)
            .ok_or(BodyError::MissingRequiredField("author"))?,
        date: body.date("date", Some(base.date))?.unwrap_or(base.date),
        rating: body.integer("rating", Some(base.rating))?.unwrap_or(base.rating),
        comment: body.string("comment", MAX_COMMENT_LEN, base.comment)?,
        restaurant_id: body
            .integer("restaurant_id", Some(base.restaurant_id))?
            .unwrap_or(base.restaurant_id),
    })
}
