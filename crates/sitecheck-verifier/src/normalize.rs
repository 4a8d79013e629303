//! Pure canonicalization helpers for the facts being verified.
//!
//! These functions turn a location's stored address, hours, and phone values
//! into comparable forms and surface variants. See [`crate::matcher`] for how
//! they compose into fact matching.

use sitecheck_core::Location;

/// Produce the candidate surface forms of an address token or phrase:
/// the original, fully uppercase, fully lowercase, and title-case.
///
/// Purely numeric tokens (street numbers, ZIPs) are returned unchanged as a
/// single variant — case transforms are meaningless for digits and checking
/// them four times would be wasted comparisons.
#[must_use]
pub fn case_variants(token: &str) -> Vec<String> {
    if token.is_empty() {
        return Vec::new();
    }
    if token.parse::<f64>().is_ok() {
        return vec![token.to_string()];
    }
    vec![
        token.to_string(),
        token.to_uppercase(),
        token.to_lowercase(),
        title_case(token),
    ]
}

/// Assemble the canonical full address: lines, locality, sublocality,
/// administrative area, and postal code, space-joined and trimmed — the
/// address as it would plausibly appear in prose.
#[must_use]
pub fn full_address(location: &Location) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for line in &location.address_lines {
        parts.push(line.as_str());
    }
    for field in [
        &location.locality,
        &location.sublocality,
        &location.administrative_area,
        &location.postal_code,
    ] {
        if let Some(value) = field.as_deref() {
            parts.push(value);
        }
    }

    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reduce a free-form phone number to its comparable digit string.
///
/// Strips all non-digit characters; an 11-digit result starting with the US
/// country code `1` has that prefix dropped, yielding the 10-digit form.
/// Unparseable input normalizes to an empty string ("no target phone").
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 11 && digits.starts_with('1') {
        digits[1..].to_string()
    } else {
        digits
    }
}

/// Capitalize the first letter of each whitespace-delimited word,
/// lowercasing the rest.
fn title_case(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitecheck_core::Location;
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

    // -----------------------------------------------------------------------
    // case_variants
    // -----------------------------------------------------------------------

    #[test]
    fn variants_cover_all_case_forms() {
        let variants = case_variants("MAIN street");
        assert_eq!(
            variants,
            vec!["MAIN street", "MAIN STREET", "main street", "Main Street"]
        );
    }

    #[test]
    fn numeric_token_is_a_single_variant() {
        assert_eq!(case_variants("33928"), vec!["33928"]);
    }

    #[test]
    fn unit_token_is_not_numeric() {
        // "#6" has a non-digit character, so it gets the full variant set.
        assert_eq!(case_variants("#6").len(), 4);
    }

    #[test]
    fn empty_token_has_no_variants() {
        assert!(case_variants("").is_empty());
    }

    // -----------------------------------------------------------------------
    // full_address
    // -----------------------------------------------------------------------

    #[test]
    fn full_address_joins_in_prose_order() {
        assert_eq!(
            full_address(&estero_location()),
            "9200 ESTERO PARK COMMONS BLVD #6 ESTERO FL 33928"
        );
    }

    #[test]
    fn full_address_includes_sublocality_after_locality() {
        let mut location = estero_location();
        location.address_lines = vec!["104 w 40 st".to_string(), "Unit: Concourse 2".to_string()];
        location.locality = Some("new york".to_string());
        location.sublocality = Some("Manhattan".to_string());
        location.administrative_area = Some("NY".to_string());
        location.postal_code = Some("10018".to_string());
        assert_eq!(
            full_address(&location),
            "104 w 40 st Unit: Concourse 2 new york Manhattan NY 10018"
        );
    }

    #[test]
    fn full_address_skips_blank_fields() {
        let mut location = estero_location();
        location.locality = Some("  ".to_string());
        assert_eq!(
            full_address(&location),
            "9200 ESTERO PARK COMMONS BLVD #6 FL 33928"
        );
    }

    #[test]
    fn full_address_of_bare_location_is_empty() {
        let mut location = estero_location();
        location.address_lines.clear();
        location.locality = None;
        location.administrative_area = None;
        location.postal_code = None;
        assert_eq!(full_address(&location), "");
    }

    // -----------------------------------------------------------------------
    // normalize_phone
    // -----------------------------------------------------------------------

    #[test]
    fn phone_formats_normalize_to_same_digits() {
        assert_eq!(normalize_phone("+1 (555) 123-4567"), "5551234567");
        assert_eq!(normalize_phone("555-123-4567"), "5551234567");
    }

    #[test]
    fn phone_without_country_code_keeps_all_digits() {
        assert_eq!(normalize_phone("5551234567"), "5551234567");
    }

    #[test]
    fn eleven_digits_not_starting_with_one_are_kept() {
        assert_eq!(normalize_phone("25551234567"), "25551234567");
    }

    #[test]
    fn unparseable_phone_is_empty() {
        assert_eq!(normalize_phone("call us!"), "");
        assert_eq!(normalize_phone(""), "");
    }

    // -----------------------------------------------------------------------
    // title_case
    // -----------------------------------------------------------------------

    #[test]
    fn title_case_capitalizes_each_word() {
        assert_eq!(title_case("eSTERO pARK commons"), "Estero Park Commons");
    }
}
