//! Guest reservations.

use super::resolve_limit;
use crate::client::GenericClient;
use crate::error::StoreResult;
use crate::model::{PROPERTY_COLUMNS, ReservationListing};
use crate::sql::query;

/// Upcoming reservations for a guest, soonest first.
///
/// Only reservations starting after today's date (as the database sees it)
/// are returned, each joined with its property and that property's average
/// rating. `limit` defaults to [`DEFAULT_LIMIT`](super::DEFAULT_LIMIT).
pub async fn get_all_reservations(
    conn: &impl GenericClient,
    guest_id: i32,
    limit: Option<i64>,
) -> StoreResult<Vec<ReservationListing>> {
    let limit = resolve_limit(limit)?;

    query(format!(
        "SELECT {PROPERTY_COLUMNS}, \
         reservations.id AS reservation_id, reservations.property_id, reservations.guest_id, \
         reservations.start_date, reservations.end_date, \
         avg(property_reviews.rating)::float8 AS average_rating \
         FROM reservations \
         JOIN properties ON properties.id = reservations.property_id \
         JOIN property_reviews ON properties.id = property_reviews.property_id \
         WHERE reservations.guest_id = $1 AND reservations.start_date > CURRENT_DATE \
         GROUP BY properties.id, reservations.id \
         ORDER BY reservations.start_date \
         LIMIT $2"
    ))
    .tag("reservations.upcoming_for_guest")
    .bind(guest_id)
    .bind(limit)
    .fetch_all_as(conn)
    .await
}
