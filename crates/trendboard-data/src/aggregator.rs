//! Grouping of layoff records by company, period or region.
//!
//! Every view uses the same driver, [`Aggregator::aggregate_by`],
//! parameterised by a key function. [`GroupBy`] provides the built-in keys.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use trendboard_core::models::{AggregatedGroup, Record};
use trendboard_core::regions;

/// Up to this many distinct dates the period view is day-level.
pub const DAILY_GRANULARITY_MAX_DATES: usize = 30;

// ── GroupBy ───────────────────────────────────────────────────────────────────

/// Built-in grouping keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// Exact company name.
    Company,
    /// `"YYYY-MM"`.
    Month,
    /// `"YYYY-MM-DD"`.
    Day,
    /// Region label from the headquarter (see [`regions::classify`]).
    Region,
}

impl GroupBy {
    /// Derive the bucket key for `record`.
    pub fn key_of(self, record: &Record) -> String {
        match self {
            GroupBy::Company => record.company.clone(),
            GroupBy::Month => record.date.format("%Y-%m").to_string(),
            GroupBy::Day => record.date.format("%Y-%m-%d").to_string(),
            GroupBy::Region => regions::classify(record.headquarter.as_deref()),
        }
    }
}

// ── Granularity ───────────────────────────────────────────────────────────────

/// Resolution of the period view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Month,
}

impl Granularity {
    /// Day-level when `records` span at most
    /// [`DAILY_GRANULARITY_MAX_DATES`] distinct dates, month-level otherwise.
    pub fn for_records(records: &[Record]) -> Self {
        let distinct: HashSet<NaiveDate> = records.iter().map(|r| r.date).collect();
        if distinct.len() <= DAILY_GRANULARITY_MAX_DATES {
            Granularity::Day
        } else {
            Granularity::Month
        }
    }

    /// The grouping key matching this granularity.
    pub fn group_by(self) -> GroupBy {
        match self {
            Granularity::Day => GroupBy::Day,
            Granularity::Month => GroupBy::Month,
        }
    }
}

// ── Aggregator ────────────────────────────────────────────────────────────────

/// Stateless helper that sums `laid_off` per key.
pub struct Aggregator;

impl Aggregator {
    /// Group `records` with one of the built-in keys.
    pub fn aggregate(records: &[Record], group_by: GroupBy) -> Vec<AggregatedGroup> {
        Self::aggregate_by(records, |r| group_by.key_of(r))
    }

    /// Group `records` by an arbitrary key function.
    ///
    /// Groups come back in the order their key was first encountered, which
    /// is what the ranker's tie-break relies on. `member_count` is `None`.
    pub fn aggregate_by<F>(records: &[Record], key_fn: F) -> Vec<AggregatedGroup>
    where
        F: Fn(&Record) -> String,
    {
        Self::drive(records, key_fn, false)
    }

    /// Like [`aggregate_by`](Self::aggregate_by) but also counts the distinct
    /// companies contributing to each group.
    pub fn aggregate_with_members<F>(records: &[Record], key_fn: F) -> Vec<AggregatedGroup>
    where
        F: Fn(&Record) -> String,
    {
        Self::drive(records, key_fn, true)
    }

    /// Sum of `measure` over `groups`.
    pub fn total(groups: &[AggregatedGroup]) -> u64 {
        groups.iter().fold(0, |acc, g| acc.saturating_add(g.measure))
    }

    // ── Private ───────────────────────────────────────────────────────────────

    fn drive<F>(records: &[Record], key_fn: F, track_members: bool) -> Vec<AggregatedGroup>
    where
        F: Fn(&Record) -> String,
    {
        let mut groups: Vec<AggregatedGroup> = Vec::new();
        let mut members: Vec<HashSet<&str>> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for record in records {
            let key = key_fn(record);
            let slot = match index.get(&key) {
                Some(&i) => i,
                None => {
                    let i = groups.len();
                    groups.push(AggregatedGroup::new(key.clone(), 0));
                    members.push(HashSet::new());
                    index.insert(key, i);
                    i
                }
            };
            let group = &mut groups[slot];
            group.measure = group.measure.saturating_add(record.laid_off);
            if track_members {
                members[slot].insert(record.company.as_str());
            }
        }

        if track_members {
            for (group, companies) in groups.iter_mut().zip(&members) {
                group.member_count = Some(companies.len());
            }
        }

        groups
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
