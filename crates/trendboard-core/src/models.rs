use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single layoff event parsed from one row of the source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Company name, trimmed and never empty.
    pub company: String,
    /// Headquarter location as written in the source, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headquarter: Option<String>,
    /// Number of people laid off. Always greater than zero.
    pub laid_off: u64,
    /// Calendar date of the event.
    pub date: NaiveDate,
    /// Industry the company belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    /// Country of the headquarter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Record {
    /// Minimal constructor for the three required fields.
    pub fn new(company: impl Into<String>, laid_off: u64, date: NaiveDate) -> Self {
        Self {
            company: company.into(),
            headquarter: None,
            laid_off,
            date,
            industry: None,
            country: None,
        }
    }

    /// Builder-style setter for the headquarter field.
    pub fn with_headquarter(mut self, headquarter: impl Into<String>) -> Self {
        self.headquarter = Some(headquarter.into());
        self
    }

    /// Builder-style setter for the industry field.
    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    /// Builder-style setter for the country field.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

/// One bucket produced by grouping records on a derived key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedGroup {
    /// Company name, `YYYY-MM`, `YYYY-MM-DD` or region label.
    pub key: String,
    /// Sum of `laid_off` over every record mapped to `key`.
    pub measure: u64,
    /// Distinct companies contributing to the bucket (region view only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_count: Option<usize>,
}

impl AggregatedGroup {
    pub fn new(key: impl Into<String>, measure: u64) -> Self {
        Self {
            key: key.into(),
            measure,
            member_count: None,
        }
    }
}

/// Year / category selection applied before every view is computed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    /// Keep only events in this calendar year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Keep only events whose industry matches (case-insensitive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

impl RecordFilter {
    /// `true` when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.industry.is_none()
    }

    /// `true` when `record` satisfies every configured criterion.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(year) = self.year {
            if record.date.year() != year {
                return false;
            }
        }
        if let Some(wanted) = self.industry.as_deref() {
            match record.industry.as_deref() {
                Some(industry) if industry.trim().eq_ignore_ascii_case(wanted.trim()) => {}
                _ => return false,
            }
        }
        true
    }

    /// Clone the matching records, preserving input order.
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

/// Headline figures shown above the charts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_laid_off: u64,
    pub events: usize,
    pub companies: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_date: Option<NaiveDate>,
}
