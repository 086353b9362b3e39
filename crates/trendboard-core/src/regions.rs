//! Static city → region lookup used to bucket headquarter locations.
//!
//! The table is scanned top to bottom and the first city whose name occurs
//! (case-insensitively) anywhere in the headquarter string wins, so the
//! order of [`CITY_REGIONS`] is part of the contract: Bay Area cities come
//! first, then the rest of California, Washington, New York and the other
//! US states.

/// Label used when a record has no headquarter at all.
pub const UNKNOWN_REGION: &str = "Unknown";

/// Ordered `(city, region)` pairs. Do not reorder without updating tests.
pub static CITY_REGIONS: &[(&str, &str)] = &[
    ("San Francisco", "SF Bay Area"),
    ("Palo Alto", "SF Bay Area"),
    ("Menlo Park", "SF Bay Area"),
    ("Sunnyvale", "SF Bay Area"),
    ("Mountain View", "SF Bay Area"),
    ("Redwood City", "SF Bay Area"),
    ("Santa Clara", "SF Bay Area"),
    ("San Jose", "SF Bay Area"),
    ("Oakland", "SF Bay Area"),
    ("Fremont", "SF Bay Area"),
    ("Los Angeles", "California (Other)"),
    ("San Diego", "California (Other)"),
    ("Seattle", "Washington"),
    ("Bellevue", "Washington"),
    ("Redmond", "Washington"),
    ("New York City", "New York"),
    ("New York", "New York"),
    ("Atlanta", "Georgia"),
    ("Austin", "Texas"),
    ("Dallas", "Texas"),
    ("Houston", "Texas"),
    ("Chicago", "Illinois"),
    ("Denver", "Colorado"),
    ("Boston", "Massachusetts"),
    ("Cambridge", "Massachusetts"),
    ("Washington D.C.", "Washington D.C."),
    ("Midland", "Michigan"),
    ("Detroit", "Michigan"),
    ("Portland", "Oregon"),
];

/// Map a headquarter string to its region label.
///
/// * `None` or blank → [`UNKNOWN_REGION`]
/// * first table hit → the table's region
/// * otherwise → the trimmed headquarter itself
pub fn classify(headquarter: Option<&str>) -> String {
    let Some(raw) = headquarter else {
        return UNKNOWN_REGION.to_string();
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return UNKNOWN_REGION.to_string();
    }

    let haystack = trimmed.to_lowercase();
    CITY_REGIONS
        .iter()
        .find(|(city, _)| haystack.contains(&city.to_lowercase()))
        .map(|(_, region)| (*region).to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_bay_area_cities() {
        assert_eq!(classify(Some("San Francisco")), "SF Bay Area");
        assert_eq!(classify(Some("Menlo Park, CA")), "SF Bay Area");
        assert_eq!(classify(Some("  mountain view ")), "SF Bay Area");
    }

    #[test]
    fn test_classify_states() {
        assert_eq!(classify(Some("Seattle")), "Washington");
        assert_eq!(classify(Some("Austin, TX")), "Texas");
        assert_eq!(classify(Some("Cambridge")), "Massachusetts");
        assert_eq!(classify(Some("Washington D.C.")), "Washington D.C.");
    }

    #[test]
    fn test_classify_first_match_wins() {
        assert_eq!(classify(Some("New York City")), "New York");
        // Both "San Jose" and "Los Angeles" occur; the Bay Area entry is earlier.
        assert_eq!(classify(Some("Los Angeles / San Jose")), "SF Bay Area");
    }

    #[test]
    fn test_classify_fallback_to_raw() {
        assert_eq!(classify(Some("  London ")), "London");
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify(None), UNKNOWN_REGION);
        assert_eq!(classify(Some("   ")), UNKNOWN_REGION);
    }

    #[test]
    fn test_every_region_label_is_a_fixed_point() {
        for (_, region) in CITY_REGIONS {
            assert_eq!(classify(Some(region)), *region, "region {region}");
        }
        assert_eq!(classify(Some(UNKNOWN_REGION)), UNKNOWN_REGION);
    }
}
