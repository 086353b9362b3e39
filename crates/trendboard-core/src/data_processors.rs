use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

// ── CountParser ───────────────────────────────────────────────────────────────

/// Largest headcount accepted for a single event.
pub const MAX_COUNT: u64 = u32::MAX as u64;

/// Parses headcount cells such as `"1,500"`, `"300"` or `"1500.0"`.
pub struct CountParser;

impl CountParser {
    /// Parse a headcount cell into an integer.
    ///
    /// Thousands separators (`,`) and surrounding whitespace are stripped
    /// first. Returns `None` for empty cells, negative or fractional values,
    /// values above [`MAX_COUNT`] and anything that is not a number. Never
    /// panics on malformed input.
    pub fn parse(raw: &str) -> Option<u64> {
        Self::parse_unbounded(raw).filter(|n| *n <= MAX_COUNT)
    }

    fn parse_unbounded(raw: &str) -> Option<u64> {
        let cleaned: String = raw
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .collect();
        if cleaned.is_empty() {
            return None;
        }

        if let Ok(n) = cleaned.parse::<u64>() {
            return Some(n);
        }

        // Spreadsheet exports sometimes write integral counts as "1500.0".
        let value = cleaned.parse::<f64>().ok()?;
        if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 {
            Some(value as u64)
        } else {
            None
        }
    }

    /// Parse a headcount cell, mapping anything unparseable to `0`.
    pub fn parse_or_zero(raw: &str) -> u64 {
        Self::parse(raw).unwrap_or(0)
    }
}

// ── DateParser ────────────────────────────────────────────────────────────────

/// Parses the date column into a calendar date.
///
/// The accepted formats are fixed and tried in this order:
/// RFC 3339 timestamps, ISO `2023-01-15`, US short-year `1/15/23`,
/// US `1/15/2023`, `2023/01/15`, `January 15, 2023`, `Jan 15, 2023`,
/// `15 January 2023` and naive `2023-01-15 10:00:00` timestamps.
pub struct DateParser;

impl DateParser {
    // Slash formats with a two-digit year come first: `%Y` accepts "23" as
    // the year 23.
    const DATE_FORMATS: &'static [&'static str] = &[
        "%Y-%m-%d",
        "%m/%d/%y",
        "%m/%d/%Y",
        "%Y/%m/%d",
        "%B %d, %Y",
        "%b %d, %Y",
        "%d %B %Y",
        "%d %b %Y",
    ];

    const DATETIME_FORMATS: &'static [&'static str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
    ];

    /// Parse `raw` into a [`NaiveDate`], or `None` when no format matches.
    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.date_naive());
        }

        for fmt in Self::DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return Some(date);
            }
        }

        for fmt in Self::DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive.date());
            }
        }

        debug!("DateParser: could not parse date string \"{}\"", s);
        None
    }
}

// ── Text helpers ──────────────────────────────────────────────────────────────

/// Trim a cell and turn blank values into `None`.
pub fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
