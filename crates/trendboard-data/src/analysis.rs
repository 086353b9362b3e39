//! View queries for Trendboard.
//!
//! The three ranked/period queries handed to the presentation layer, the
//! headline summary, and [`DashboardViews`] which computes all of them for
//! one filter selection.

use std::collections::{BTreeSet, HashSet};

use chrono::Datelike;
use serde::Serialize;
use trendboard_core::formatting::percentage;
use trendboard_core::models::{AggregatedGroup, Record, RecordFilter, Summary};

use crate::aggregator::{Aggregator, GroupBy, Granularity};
use crate::ranker::{self, TOP_15, TOP_5};

// ── Public types ──────────────────────────────────────────────────────────────

/// Time series of layoffs per period, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSeries {
    pub granularity: Granularity,
    pub groups: Vec<AggregatedGroup>,
}

/// A ranked region with its share of all layoffs in the selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionShare {
    pub region: String,
    pub laid_off: u64,
    /// Percent of the selection total, one decimal place.
    pub share: f64,
    pub companies: usize,
}

/// Top-N window per ranked view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewLimits {
    pub companies: usize,
    pub regions: usize,
    /// How many period peaks get labelled.
    pub peaks: usize,
}

impl Default for ViewLimits {
    fn default() -> Self {
        Self {
            companies: TOP_15,
            regions: TOP_15,
            peaks: TOP_5,
        }
    }
}

/// Every derived view for one filter selection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardViews {
    pub filter: RecordFilter,
    /// Filtered records, newest first.
    pub records: Vec<Record>,
    pub summary: Summary,
    pub periods: PeriodSeries,
    pub peak_measures: Vec<u64>,
    pub top_companies: Vec<AggregatedGroup>,
    pub top_regions: Vec<AggregatedGroup>,
}

impl DashboardViews {
    /// Apply `filter` to `records` and compute every view from the result.
    pub fn compute(records: &[Record], filter: &RecordFilter, limits: &ViewLimits) -> Self {
        let filtered = filter.apply(records);

        let periods = group_by_period(&filtered);
        let peak_measures = ranker::peak_measures(&periods.groups, limits.peaks);

        Self {
            filter: filter.clone(),
            summary: summarize(&filtered),
            top_companies: group_by_company_top_n(&filtered, limits.companies),
            top_regions: group_by_region_top_n(&filtered, limits.regions),
            periods,
            peak_measures,
            records: newest_first(filtered),
        }
    }

    /// Ranked regions with their share of [`Summary::total_laid_off`].
    pub fn region_shares(&self) -> Vec<RegionShare> {
        region_shares(&self.top_regions, self.summary.total_laid_off)
    }

    /// `true` when the filtered selection holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ── Queries ───────────────────────────────────────────────────────────────────

/// Companies ranked by total layoffs, top `n`.
pub fn group_by_company_top_n(records: &[Record], n: usize) -> Vec<AggregatedGroup> {
    ranker::top_n(Aggregator::aggregate(records, GroupBy::Company), n)
}

/// Layoffs per day or per month (see [`Granularity::for_records`]),
/// sorted chronologically.
pub fn group_by_period(records: &[Record]) -> PeriodSeries {
    let granularity = Granularity::for_records(records);
    let mut groups = Aggregator::aggregate(records, granularity.group_by());
    // Zero-padded keys sort chronologically.
    groups.sort_by(|a, b| a.key.cmp(&b.key));
    PeriodSeries {
        granularity,
        groups,
    }
}

/// Regions ranked by total layoffs, top `n`, with distinct company counts.
pub fn group_by_region_top_n(records: &[Record], n: usize) -> Vec<AggregatedGroup> {
    let groups = Aggregator::aggregate_with_members(records, |r| GroupBy::Region.key_of(r));
    ranker::top_n(groups, n)
}

/// Attach percent-of-`total` to region groups.
///
/// `total` is the selection total, not the sum of `groups`, so a truncated
/// top-N list does not add up to 100%.
pub fn region_shares(groups: &[AggregatedGroup], total: u64) -> Vec<RegionShare> {
    groups
        .iter()
        .map(|g| RegionShare {
            region: g.key.clone(),
            laid_off: g.measure,
            share: percentage(g.measure, total, 1),
            companies: g.member_count.unwrap_or(0),
        })
        .collect()
}

/// Headline figures for `records`.
pub fn summarize(records: &[Record]) -> Summary {
    let companies: HashSet<&str> = records.iter().map(|r| r.company.as_str()).collect();
    Summary {
        total_laid_off: records
            .iter()
            .fold(0, |acc: u64, r| acc.saturating_add(r.laid_off)),
        events: records.len(),
        companies: companies.len(),
        first_date: records.iter().map(|r| r.date).min(),
        last_date: records.iter().map(|r| r.date).max(),
    }
}

/// Calendar years present in `records`, newest first.
pub fn available_years(records: &[Record]) -> Vec<i32> {
    let years: BTreeSet<i32> = records.iter().map(|r| r.date.year()).collect();
    years.into_iter().rev().collect()
}

/// Distinct industries present in `records`, alphabetical.
pub fn available_industries(records: &[Record]) -> Vec<String> {
    let industries: BTreeSet<&str> = records
        .iter()
        .filter_map(|r| r.industry.as_deref())
        .collect();
    industries.into_iter().map(str::to_string).collect()
}

/// Stable sort by date, newest first.
fn newest_first(mut records: Vec<Record>) -> Vec<Record> {
    records.sort_by(|a, b| b.date.cmp(&a.date));
    records
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Record> {
        vec![
            Record::new("Acme", 100, date(2023, 1, 15))
                .with_headquarter("San Francisco")
                .with_industry("Retail"),
            Record::new("Beta", 90, date(2023, 2, 20))
                .with_headquarter("Seattle")
                .with_industry("Finance"),
            Record::new("Gamma", 90, date(2024, 2, 1))
                .with_headquarter("Menlo Park")
                .with_industry("Retail"),
            Record::new("Delta", 10, date(2024, 3, 9)),
            Record::new("Acme", 5, date(2024, 3, 10)).with_headquarter("Palo Alto"),
        ]
    }

    fn keys(groups: &[AggregatedGroup]) -> Vec<&str> {
        groups.iter().map(|g| g.key.as_str()).collect()
    }

    #[test]
    fn test_group_by_company_top_n() {
        let top = group_by_company_top_n(&sample(), 3);
        assert_eq!(keys(&top), vec!["Acme", "Beta", "Gamma"]);
        assert_eq!(top[0].measure, 105);
    }

    #[test]
    fn test_group_by_period_daily_for_few_dates() {
        let series = group_by_period(&sample());
        assert_eq!(series.granularity, Granularity::Day);
        assert_eq!(
            keys(&series.groups),
            vec![
                "2023-01-15",
                "2023-02-20",
                "2024-02-01",
                "2024-03-09",
                "2024-03-10"
            ]
        );
    }

    #[test]
    fn test_group_by_period_monthly_beyond_threshold() {
        let start = date(2023, 1, 1);
        let records: Vec<Record> = (0..31)
            .map(|i| Record::new("Acme", 2, start + chrono::Duration::days(i)))
            .collect();

        let series = group_by_period(&records);
        assert_eq!(series.granularity, Granularity::Month);
        assert_eq!(keys(&series.groups), vec!["2023-01"]);
        assert_eq!(series.groups[0].measure, 62);
    }

    #[test]
    fn test_group_by_period_sorted_chronologically() {
        let records = vec![
            Record::new("A", 1, date(2024, 3, 1)),
            Record::new("B", 1, date(2023, 12, 1)),
        ];
        let series = group_by_period(&records);
        assert_eq!(keys(&series.groups), vec!["2023-12-01", "2024-03-01"]);
    }

    #[test]
    fn test_group_by_region_top_n() {
        let top = group_by_region_top_n(&sample(), 15);
        assert_eq!(keys(&top), vec!["SF Bay Area", "Washington", "Unknown"]);
        assert_eq!(top[0].measure, 195);
        assert_eq!(top[0].member_count, Some(2));
        assert_eq!(top[2].member_count, Some(1));
    }

    #[test]
    fn test_region_shares() {
        let limits = ViewLimits {
            regions: 2,
            ..ViewLimits::default()
        };
        let views = DashboardViews::compute(&sample(), &RecordFilter::default(), &limits);
        let shares = views.region_shares();

        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].region, "SF Bay Area");
        assert_eq!(shares[0].companies, 2);
        // 195 of 295
        assert!((shares[0].share - 66.1).abs() < 1e-9);
        assert!((shares[1].share - 30.5).abs() < 1e-9);
    }

    #[test]
    fn test_region_shares_zero_total() {
        let shares = region_shares(&[AggregatedGroup::new("Texas", 0)], 0);
        assert_eq!(shares[0].share, 0.0);
        assert_eq!(shares[0].companies, 0);
    }

    #[test]
    fn test_queries_on_empty_input() {
        assert!(group_by_company_top_n(&[], 10).is_empty());
        assert!(group_by_region_top_n(&[], 10).is_empty());
        assert!(group_by_period(&[]).groups.is_empty());
        assert_eq!(summarize(&[]), Summary::default());
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&sample());
        assert_eq!(summary.total_laid_off, 295);
        assert_eq!(summary.events, 5);
        assert_eq!(summary.companies, 4);
        assert_eq!(summary.first_date, Some(date(2023, 1, 15)));
        assert_eq!(summary.last_date, Some(date(2024, 3, 10)));
    }

    #[test]
    fn test_available_filters() {
        assert_eq!(available_years(&sample()), vec![2024, 2023]);
        assert_eq!(
            available_industries(&sample()),
            vec!["Finance".to_string(), "Retail".to_string()]
        );
    }

    #[test]
    fn test_dashboard_views_apply_filter() {
        let filter = RecordFilter {
            year: Some(2024),
            industry: None,
        };
        let views = DashboardViews::compute(&sample(), &filter, &ViewLimits::default());

        assert_eq!(views.summary.events, 3);
        assert_eq!(views.summary.total_laid_off, 105);
        assert_eq!(
            views.records.iter().map(|r| r.date).collect::<Vec<_>>(),
            vec![date(2024, 3, 10), date(2024, 3, 9), date(2024, 2, 1)]
        );
        assert_eq!(keys(&views.top_companies), vec!["Gamma", "Delta", "Acme"]);
        assert_eq!(views.peak_measures, vec![90, 10, 5]);
        assert!(!views.is_empty());
    }

    #[test]
    fn test_dashboard_views_measure_conservation() {
        let views = DashboardViews::compute(
            &sample(),
            &RecordFilter::default(),
            &ViewLimits {
                companies: 100,
                regions: 100,
                peaks: 5,
            },
        );
        let total = views.summary.total_laid_off;
        assert_eq!(Aggregator::total(&views.top_companies), total);
        assert_eq!(Aggregator::total(&views.top_regions), total);
        assert_eq!(Aggregator::total(&views.periods.groups), total);
    }

    #[test]
    fn test_oversized_count_row_is_dropped_before_views() {
        use crate::reader::{parse_records, ParseOptions};

        let text = "Company,# Laid Off,Date\n\
            A,18446744073709551615,2023-01-01\n\
            B,10,2023-01-02\n\
            C,4294967296,2023-01-03\n";
        let records = parse_records(text, &ParseOptions::default()).unwrap();
        assert_eq!(records.len(), 1);

        let views =
            DashboardViews::compute(&records, &RecordFilter::default(), &ViewLimits::default());
        assert_eq!(views.summary.total_laid_off, 10);
        assert_eq!(Aggregator::total(&views.top_companies), 10);
    }

    #[test]
    fn test_summarize_saturates() {
        let records = vec![
            Record::new("A", u64::MAX, date(2023, 1, 1)),
            Record::new("B", 10, date(2023, 1, 2)),
        ];
        let views =
            DashboardViews::compute(&records, &RecordFilter::default(), &ViewLimits::default());
        assert_eq!(views.summary.total_laid_off, u64::MAX);
    }

    #[test]
    fn test_dashboard_views_empty_selection() {
        let filter = RecordFilter {
            year: Some(1999),
            industry: None,
        };
        let views = DashboardViews::compute(&sample(), &filter, &ViewLimits::default());
        assert!(views.is_empty());
        assert!(views.top_companies.is_empty());
        assert!(views.peak_measures.is_empty());
    }
}
