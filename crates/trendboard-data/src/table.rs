//! Row shaping and pagination for the table view.

use serde::Serialize;
use trendboard_core::models::Record;

/// Rows shown per table page unless overridden.
pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

/// Shown in the location column when a record has no headquarter.
pub const DEFAULT_LOCATION: &str = "US";

/// A record flattened for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    /// ISO `YYYY-MM-DD`.
    pub date: String,
    pub company: String,
    pub location: String,
    pub laid_off: u64,
    pub industry: String,
    pub country: String,
}

impl From<&Record> for TableRow {
    fn from(record: &Record) -> Self {
        Self {
            date: record.date.format("%Y-%m-%d").to_string(),
            company: record.company.clone(),
            location: record
                .headquarter
                .clone()
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            laid_off: record.laid_off,
            industry: record.industry.clone().unwrap_or_default(),
            country: record.country.clone().unwrap_or_default(),
        }
    }
}

/// One page of table rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually served.
    pub page: usize,
    pub total_pages: usize,
    pub per_page: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Flatten `records` into table rows, keeping their order.
pub fn table_rows(records: &[Record]) -> Vec<TableRow> {
    records.iter().map(TableRow::from).collect()
}

/// Slice page `page` (1-based) out of `items`.
///
/// Out-of-range page numbers are clamped to the first or last page. A
/// `per_page` of zero is treated as one.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_pages = items.len().div_ceil(per_page);
    let page = page.clamp(1, total_pages.max(1));

    let start = (page - 1) * per_page;
    let end = (start + per_page).min(items.len());
    let slice = items.get(start..end).unwrap_or_default();

    Page {
        items: slice.to_vec(),
        page,
        total_pages,
        per_page,
        total_items: items.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn numbers(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    #[test]
    fn test_row_defaults_location_to_us() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap();
        let row = TableRow::from(&Record::new("Acme", 100, date));
        assert_eq!(row.location, "US");
        assert_eq!(row.date, "2023-01-15");
        assert_eq!(row.industry, "");
    }

    #[test]
    fn test_row_keeps_headquarter() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap();
        let record = Record::new("Acme", 100, date)
            .with_headquarter("Austin")
            .with_industry("Retail")
            .with_country("United States");
        let row = TableRow::from(&record);
        assert_eq!(row.location, "Austin");
        assert_eq!(row.industry, "Retail");
        assert_eq!(row.country, "United States");
    }

    #[test]
    fn test_paginate_first_and_last_page() {
        let items = numbers(25);

        let first = paginate(&items, 1, DEFAULT_ROWS_PER_PAGE);
        assert_eq!(first.items, numbers(10));
        assert_eq!(first.total_pages, 3);
        assert!(!first.has_previous());
        assert!(first.has_next());

        let last = paginate(&items, 3, DEFAULT_ROWS_PER_PAGE);
        assert_eq!(last.items, vec![21, 22, 23, 24, 25]);
        assert!(last.has_previous());
        assert!(!last.has_next());
    }

    #[test]
    fn test_paginate_clamps_page() {
        let items = numbers(12);
        assert_eq!(paginate(&items, 0, 10).page, 1);
        let beyond = paginate(&items, 99, 10);
        assert_eq!(beyond.page, 2);
        assert_eq!(beyond.items, vec![11, 12]);
    }

    #[test]
    fn test_paginate_empty() {
        let page = paginate::<usize>(&[], 1, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.page, 1);
        assert!(!page.has_next());
    }

    #[test]
    fn test_paginate_zero_per_page() {
        let page = paginate(&numbers(3), 2, 0);
        assert_eq!(page.per_page, 1);
        assert_eq!(page.items, vec![2]);
    }
}
