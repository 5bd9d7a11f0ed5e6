//! Property search and creation.

use super::resolve_limit;
use crate::client::GenericClient;
use crate::error::{StoreError, StoreResult};
use crate::model::{NewProperty, PROPERTY_COLUMNS, Property, PropertyListing, to_minor_units};
use crate::sql::{Sql, query, sql};
use serde::Deserialize;

/// Optional, independently applied search criteria.
///
/// A field filters only when it is `Some`; `Some(0)` and `Some("")` are real
/// filters, not "absent".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PropertyFilter {
    /// Case-insensitive substring of the property's city.
    pub city: Option<String>,
    /// Exact owner.
    pub owner_id: Option<i32>,
    /// Lowest nightly price, in whole currency units.
    pub minimum_price_per_night: Option<i32>,
    /// Highest nightly price, in whole currency units.
    pub maximum_price_per_night: Option<i32>,
    /// Lowest average review rating, applied after grouping.
    pub minimum_rating: Option<f64>,
}

impl PropertyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn owner_id(mut self, owner_id: i32) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn minimum_price_per_night(mut self, price: i32) -> Self {
        self.minimum_price_per_night = Some(price);
        self
    }

    pub fn maximum_price_per_night(mut self, price: i32) -> Self {
        self.maximum_price_per_night = Some(price);
        self
    }

    pub fn minimum_rating(mut self, rating: f64) -> Self {
        self.minimum_rating = Some(rating);
        self
    }

    /// Build the search statement without running it.
    ///
    /// Parameters are bound in a fixed order: city, owner, minimum price,
    /// maximum price, rating, limit; each one only when present.
    pub fn to_sql(&self, limit: i64) -> StoreResult<Sql> {
        let mut q = sql(format!(
            "SELECT {PROPERTY_COLUMNS}, avg(property_reviews.rating)::float8 AS average_rating \
             FROM properties \
             JOIN property_reviews ON properties.id = property_reviews.property_id"
        ));
        q.tag("properties.search");

        let mut filters = q.where_clause();
        if let Some(city) = &self.city {
            filters.and_bind("properties.city ILIKE ", format!("%{city}%"));
        }
        if let Some(owner_id) = self.owner_id {
            filters.and_bind("properties.owner_id = ", owner_id);
        }
        if let Some(min) = self.minimum_price_per_night {
            filters.and_bind("properties.cost_per_night >= ", to_minor_units(min)?);
        }
        if let Some(max) = self.maximum_price_per_night {
            filters.and_bind("properties.cost_per_night <= ", to_minor_units(max)?);
        }

        q.push(" GROUP BY properties.id");

        if let Some(rating) = self.minimum_rating {
            if !rating.is_finite() {
                return Err(StoreError::validation(format!(
                    "minimum_rating must be a finite number, got {rating}"
                )));
            }
            q.push(" HAVING avg(property_reviews.rating)::float8 >= ")
                .push_bind(rating);
        }

        q.push(" ORDER BY properties.cost_per_night, properties.id");
        q.limit(limit);
        Ok(q)
    }
}

/// Search properties with their average rating, cheapest first.
///
/// `limit` defaults to [`DEFAULT_LIMIT`](super::DEFAULT_LIMIT). Properties
/// without any review are not listed.
pub async fn get_all_properties(
    conn: &impl GenericClient,
    filter: &PropertyFilter,
    limit: Option<i64>,
) -> StoreResult<Vec<PropertyListing>> {
    let limit = resolve_limit(limit)?;
    let q = filter.to_sql(limit)?;
    tracing::debug!(target: "lightbnb_db", ?filter, limit, "searching properties");
    q.fetch_all_as(conn).await
}

/// Insert a property and return the stored row.
///
/// `cost_per_night` is converted from whole units to cents before insert.
pub async fn add_property(
    conn: &impl GenericClient,
    property: &NewProperty,
) -> StoreResult<Property> {
    let cost_per_night = to_minor_units(property.cost_per_night)?;
    let returning = PROPERTY_COLUMNS.replace("properties.", "");

    query(format!(
        "INSERT INTO properties (owner_id, title, description, thumbnail_photo_url, \
         cover_photo_url, cost_per_night, parking_spaces, number_of_bathrooms, \
         number_of_bedrooms, country, street, city, province, post_code) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
         RETURNING {returning}"
    ))
    .tag("properties.insert")
    .bind(property.owner_id)
    .bind(property.title.clone())
    .bind(property.description.clone())
    .bind(property.thumbnail_photo_url.clone())
    .bind(property.cover_photo_url.clone())
    .bind(cost_per_night)
    .bind(property.parking_spaces)
    .bind(property.number_of_bathrooms)
    .bind(property.number_of_bedrooms)
    .bind(property.country.clone())
    .bind(property.street.clone())
    .bind(property.city.clone())
    .bind(property.province.clone())
    .bind(property.post_code.clone())
    .fetch_one_as(conn)
    .await
}
