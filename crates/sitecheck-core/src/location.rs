//! Domain types for a business location and its verification outcome.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::facts::FactCheck;

/// A business location as read from the store.
///
/// Immutable input to the verification pipeline; the store owns the data.
#[derive(Debug, Clone)]
pub struct Location {
    pub id: Uuid,
    pub business_name: String,
    pub website_uri: Option<String>,
    /// Street-level address lines in display order.
    pub address_lines: Vec<String>,
    pub locality: Option<String>,
    pub sublocality: Option<String>,
    pub administrative_area: Option<String>,
    pub postal_code: Option<String>,
    pub regular_hours: Vec<HoursPeriod>,
    pub primary_phone: Option<String>,
}

impl Location {
    /// Whether this location has a usable website URI to verify.
    #[must_use]
    pub fn has_website(&self) -> bool {
        self.website_uri
            .as_deref()
            .is_some_and(|uri| !uri.trim().is_empty())
    }
}

/// One span of regular operating hours, Google-listing style.
///
/// Serialized in camelCase to match the stored JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursPeriod {
    pub open_day: String,
    #[serde(default)]
    pub open_time: TimePoint,
    pub close_day: String,
    #[serde(default)]
    pub close_time: TimePoint,
}

/// A time of day within an hours period.
///
/// An empty object (`{}`) denotes midnight; `hours = 24` denotes end-of-day,
/// so a `{} .. {hours: 24}` period spans the whole day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<u32>,
}

/// Reachability probe outcome for a website URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    /// The final response status over some transport was below 400.
    pub is_accessible: bool,
    /// The encrypted-transport attempt itself succeeded.
    pub supports_https: bool,
}

/// The pipeline's terminal artifact for one location, handed to persistence.
///
/// `probe` is `None` when no network check was attempted (the location has
/// no website URI).
#[derive(Debug, Clone)]
pub struct VerificationRecord {
    pub id: Uuid,
    pub business_name: String,
    pub website_uri: Option<String>,
    pub probe: Option<ProbeResult>,
    pub address: FactCheck,
    pub hours: FactCheck,
    pub phone: FactCheck,
}
