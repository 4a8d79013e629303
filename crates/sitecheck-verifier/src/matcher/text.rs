//! Deterministic windowed-text address matcher.
//!
//! The lower-cost, fully explainable alternative to the AI matcher. Checks
//! the address only; hours and phone are left unattempted.

use sitecheck_core::{FactCheck, Location};

use super::FactReport;
use crate::normalize::{case_variants, full_address};

/// Characters searched on either side of the postal code when looking for
/// the remaining address components. A real address listing is compact, so
/// its parts sit close to the ZIP.
const WINDOW_RADIUS: usize = 100;

/// Deterministic matcher: literal and windowed substring search over the
/// extracted page text.
#[derive(Debug, Default)]
pub struct TextMatcher;

impl TextMatcher {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Check the location's address against the page text.
    #[must_use]
    pub fn check(&self, location: &Location, page_text: &str) -> FactReport {
        FactReport {
            address: check_address(location, page_text),
            hours: FactCheck::unattempted(),
            phone: FactCheck::unattempted(),
        }
    }
}

/// Windowed component search for the full address.
///
/// 1. Any case variant of the complete address appearing verbatim is the
///    strongest and cheapest signal — matched immediately.
/// 2. Otherwise the postal code anchors the search; without it the address
///    is treated as absent (street-name tokens alone false-positive too
///    easily).
/// 3. Every whitespace-delimited component of the address must then appear
///    (in any case variant) within the window around the postal code.
///    Partial address matches are not address matches.
fn check_address(location: &Location, page_text: &str) -> FactCheck {
    let address = full_address(location);
    if address.is_empty() {
        return FactCheck::not_found("no address on record");
    }

    for variant in case_variants(&address) {
        if page_text.contains(&variant) {
            return FactCheck::matched();
        }
    }

    let Some(postal_code) = location
        .postal_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
    else {
        return FactCheck::not_found("no postal code on record to anchor the search");
    };

    let Some(anchor) = page_text.find(postal_code) else {
        return FactCheck::not_found("postal code not found in page text");
    };

    let window = search_window(page_text, anchor, postal_code.len());

    let missing: Vec<&str> = address
        .split_whitespace()
        .filter(|component| {
            !case_variants(component)
                .iter()
                .any(|variant| window.contains(variant.as_str()))
        })
        .collect();

    if missing.is_empty() {
        FactCheck::matched()
    } else {
        FactCheck::found_only(format!(
            "address components missing near postal code: {}",
            missing.join(", ")
        ))
    }
}

/// Slice the page text from `WINDOW_RADIUS` characters before the anchor to
/// `WINDOW_RADIUS` characters past its end, clamped to UTF-8 boundaries.
fn search_window(text: &str, anchor: usize, anchor_len: usize) -> &str {
    let mut start = anchor.saturating_sub(WINDOW_RADIUS);
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (anchor + anchor_len + WINDOW_RADIUS).min(text.len());
    while !text.is_char_boundary(end) {
        end += 1;
    }
    &text[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitecheck_core::FactStatus;
    use uuid::Uuid;

    fn estero_location() -> Location {
        Location {
            id: Uuid::new_v4(),
            business_name: "Estero Garage Door Repair Services".to_string(),
            website_uri: Some("http://esterogaragedoorrepair.com/".to_string()),
            address_lines: vec!["9200 ESTERO PARK COMMONS BLVD #6".to_string()],
            locality: Some("ESTERO".to_string()),
            sublocality: None,
            administrative_area: Some("FL".to_string()),
            postal_code: Some("33928".to_string()),
            regular_hours: vec![],
            primary_phone: None,
        }
    }

    #[test]
    fn exact_address_matches_immediately() {
        let page = "Visit us: 9200 ESTERO PARK COMMONS BLVD #6 ESTERO FL 33928 today";
        let check = check_address(&estero_location(), page);
        assert_eq!(check.status, FactStatus::Matched);
        assert!(check.error.is_none());
    }

    #[test]
    fn lowercased_address_matches_via_variant() {
        let page = "find us at 9200 estero park commons blvd #6 estero fl 33928";
        let check = check_address(&estero_location(), page);
        assert_eq!(check.status, FactStatus::Matched);
    }

    #[test]
    fn prose_address_with_punctuation_matches_component_wise() {
        // Not a verbatim variant hit (commas, mixed case), so the postal-code
        // window path has to assemble the match from components.
        let page = "Estero Garage Door Repair Services is located at \
                    9200 Estero Park Commons Blvd #6, Estero, FL 33928. Call today!";
        let check = check_address(&estero_location(), page);
        assert_eq!(check.status, FactStatus::Matched);
    }

    #[test]
    fn postal_code_alone_is_found_but_not_matched() {
        let page = "Serving the greater 33928 area since 1998";
        let check = check_address(&estero_location(), page);
        assert_eq!(check.status, FactStatus::FoundOnly);
        assert!(check.error.is_some());
        assert_eq!(check.is_match(), Some(false));
    }

    #[test]
    fn missing_postal_code_means_address_not_found() {
        let page = "9200 Estero Park Commons Blvd #6, Estero, FL";
        let check = check_address(&estero_location(), page);
        assert_eq!(check.status, FactStatus::NotFound);
        assert_eq!(check.is_found(), Some(false));
    }

    #[test]
    fn components_outside_the_window_do_not_count() {
        // Push the street line more than 100 characters before the ZIP.
        let filler = "x".repeat(150);
        let page = format!("9200 Estero Park Commons Blvd #6 {filler} Estero FL 33928");
        let check = check_address(&estero_location(), &page);
        assert_eq!(check.status, FactStatus::FoundOnly);
        let error = check.error.unwrap();
        assert!(error.contains("9200"), "unexpected error: {error}");
    }

    #[test]
    fn location_without_postal_code_cannot_be_anchored() {
        let mut location = estero_location();
        location.postal_code = None;
        let page = "9200 Estero Park Commons Blvd #6, Estero, FL";
        let check = check_address(&location, page);
        assert_eq!(check.status, FactStatus::NotFound);
    }

    #[test]
    fn location_without_any_address_is_not_found() {
        let mut location = estero_location();
        location.address_lines.clear();
        location.locality = None;
        location.administrative_area = None;
        location.postal_code = None;
        let check = check_address(&location, "anything");
        assert_eq!(check.status, FactStatus::NotFound);
    }

    #[test]
    fn multibyte_text_near_window_edges_does_not_panic() {
        let filler = "é".repeat(120);
        let page = format!("{filler}33928{filler}");
        let check = check_address(&estero_location(), &page);
        assert_eq!(check.status, FactStatus::FoundOnly);
    }

    #[test]
    fn hours_and_phone_are_unattempted() {
        let matcher = TextMatcher::new();
        let report = matcher.check(&estero_location(), "no address here");
        assert_eq!(report.hours.status, FactStatus::Undetermined);
        assert!(report.hours.error.is_none());
        assert_eq!(report.phone.status, FactStatus::Undetermined);
        assert_eq!(report.phone.is_found(), None);
    }

    #[test]
    fn empty_page_text_is_not_found() {
        let check = check_address(&estero_location(), "");
        assert_eq!(check.status, FactStatus::NotFound);
    }
}
