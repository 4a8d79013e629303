//! Read operations for the `gmb_locations` table.

use sqlx::PgPool;

use super::types::GmbLocationRow;

const SELECT_COLUMNS: &str = "id, business_name, website_uri, address_lines, \
     locality, sublocality, administrative_area, postal_code, \
     regular_hours, primary_phone";

/// Query locations eligible for website verification: those with a
/// non-null, non-empty `website_uri`.
///
/// `limit` caps the number of rows returned; `None` returns every eligible
/// location. Results are ordered by `business_name` so repeated runs walk
/// the set in a stable order.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_locations_to_verify(
    pool: &PgPool,
    limit: Option<i64>,
) -> Result<Vec<GmbLocationRow>, sqlx::Error> {
    if let Some(limit) = limit {
        sqlx::query_as::<_, GmbLocationRow>(&format!(
            "SELECT {SELECT_COLUMNS} \
             FROM gmb_locations \
             WHERE website_uri IS NOT NULL AND website_uri != '' \
             ORDER BY business_name ASC \
             LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(pool)
        .await
    } else {
        sqlx::query_as::<_, GmbLocationRow>(&format!(
            "SELECT {SELECT_COLUMNS} \
             FROM gmb_locations \
             WHERE website_uri IS NOT NULL AND website_uri != '' \
             ORDER BY business_name ASC"
        ))
        .fetch_all(pool)
        .await
    }
}
