//! Records persisted in the LightBnB schema.
//!
//! Prices are stored as an integer count of cents (`cost_per_night`); callers
//! supply whole currency units and the conversion happens on the way in.

use crate::error::{StoreError, StoreResult};
use crate::row::{FromRow, RowExt};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// Minor units per major currency unit.
pub const MINOR_UNITS_PER_MAJOR: i32 = 100;

/// Convert a whole-unit price to minor units, rejecting overflow.
pub fn to_minor_units(major: i32) -> StoreResult<i32> {
    major.checked_mul(MINOR_UNITS_PER_MAJOR).ok_or_else(|| {
        StoreError::validation(format!("price {major} overflows when converted to minor units"))
    })
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Opaque credential string; hashing happens in the web layer.
    pub password: String,
}

impl FromRow for User {
    fn from_row(row: &Row) -> StoreResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            name: row.try_get_column("name")?,
            email: row.try_get_column("email")?,
            password: row.try_get_column("password")?,
        })
    }
}

/// Input for [`crate::users::add_user`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A rental property as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    /// Price in minor units (cents).
    pub cost_per_night: i32,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
}

/// Column list shared by every statement that returns a [`Property`].
pub(crate) const PROPERTY_COLUMNS: &str = "properties.id, properties.owner_id, properties.title, \
     properties.description, properties.thumbnail_photo_url, properties.cover_photo_url, \
     properties.cost_per_night, properties.parking_spaces, properties.number_of_bathrooms, \
     properties.number_of_bedrooms, properties.country, properties.street, properties.city, \
     properties.province, properties.post_code";

impl FromRow for Property {
    fn from_row(row: &Row) -> StoreResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            owner_id: row.try_get_column("owner_id")?,
            title: row.try_get_column("title")?,
            description: row.try_get_column("description")?,
            thumbnail_photo_url: row.try_get_column("thumbnail_photo_url")?,
            cover_photo_url: row.try_get_column("cover_photo_url")?,
            cost_per_night: row.try_get_column("cost_per_night")?,
            parking_spaces: row.try_get_column("parking_spaces")?,
            number_of_bathrooms: row.try_get_column("number_of_bathrooms")?,
            number_of_bedrooms: row.try_get_column("number_of_bedrooms")?,
            country: row.try_get_column("country")?,
            street: row.try_get_column("street")?,
            city: row.try_get_column("city")?,
            province: row.try_get_column("province")?,
            post_code: row.try_get_column("post_code")?,
        })
    }
}

/// Input for [`crate::properties::add_property`].
///
/// `cost_per_night` is in whole currency units here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProperty {
    pub owner_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    pub cost_per_night: i32,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
}

/// A property search result with its average review rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyListing {
    #[serde(flatten)]
    pub property: Property,
    pub average_rating: f64,
}

impl FromRow for PropertyListing {
    fn from_row(row: &Row) -> StoreResult<Self> {
        Ok(Self {
            property: Property::from_row(row)?,
            average_rating: row.try_get_column("average_rating")?,
        })
    }
}

/// A booking of a property by a guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i32,
    pub property_id: i32,
    pub guest_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// An upcoming reservation joined with the reserved property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationListing {
    pub reservation: Reservation,
    #[serde(flatten)]
    pub property: Property,
    pub average_rating: f64,
}

impl FromRow for ReservationListing {
    fn from_row(row: &Row) -> StoreResult<Self> {
        // `id` belongs to the property; the reservation's id is aliased.
        let reservation = Reservation {
            id: row.try_get_column("reservation_id")?,
            property_id: row.try_get_column("property_id")?,
            guest_id: row.try_get_column("guest_id")?,
            start_date: row.try_get_column("start_date")?,
            end_date: row.try_get_column("end_date")?,
        };
        Ok(Self {
            reservation,
            property: Property::from_row(row)?,
            average_rating: row.try_get_column("average_rating")?,
        })
    }
}
