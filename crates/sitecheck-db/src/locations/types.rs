//! Row types for the `gmb_locations` table.

use sitecheck_core::{HoursPeriod, Location};
use uuid::Uuid;

/// A verifiable row from the `gmb_locations` table.
///
/// The verification flag columns are omitted — they are write-only from the
/// pipeline's point of view and never read back into a run.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GmbLocationRow {
    pub id: Uuid,
    pub business_name: String,
    pub website_uri: Option<String>,
    pub address_lines: Vec<String>,
    pub locality: Option<String>,
    pub sublocality: Option<String>,
    pub administrative_area: Option<String>,
    pub postal_code: Option<String>,
    /// Stored listing JSON: `{"periods": [{"openDay": …}, …]}`.
    pub regular_hours: Option<serde_json::Value>,
    pub primary_phone: Option<String>,
}

impl GmbLocationRow {
    /// Convert the row into the pipeline's `Location`.
    ///
    /// Malformed `regular_hours` JSON degrades to an empty schedule with a
    /// warning rather than failing the run — hours matching then simply has
    /// no target periods to compare.
    #[must_use]
    pub fn into_location(self) -> Location {
        let regular_hours = self
            .regular_hours
            .as_ref()
            .map(|value| decode_hours(self.id, value))
            .unwrap_or_default();

        Location {
            id: self.id,
            business_name: self.business_name,
            website_uri: self.website_uri,
            address_lines: self.address_lines,
            locality: self.locality,
            sublocality: self.sublocality,
            administrative_area: self.administrative_area,
            postal_code: self.postal_code,
            regular_hours,
            primary_phone: self.primary_phone,
        }
    }
}

/// Decode stored hours JSON into periods.
///
/// Accepts either the listing shape (`{"periods": [...]}`)
/// or a bare period array.
fn decode_hours(id: Uuid, value: &serde_json::Value) -> Vec<HoursPeriod> {
    let periods_value = value.get("periods").unwrap_or(value);
    match serde_json::from_value::<Vec<HoursPeriod>>(periods_value.clone()) {
        Ok(periods) => periods,
        Err(e) => {
            tracing::warn!(location = %id, error = %e, "malformed regular_hours JSON — treating as no schedule");
            Vec::new()
        }
    }
}
