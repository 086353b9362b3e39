//! Top-N ranking of aggregated groups.

use trendboard_core::models::AggregatedGroup;

/// Ranking window used by the pie chart view.
pub const TOP_5: usize = 5;
/// Ranking window used by the bar chart view.
pub const TOP_10: usize = 10;
/// Ranking window used by the company and region charts.
pub const TOP_15: usize = 15;

/// Sort `groups` by descending measure and keep the first `n`.
///
/// The sort is stable: groups with equal measure keep their relative input
/// order, i.e. the order in which the aggregator first met their key.
pub fn top_n(mut groups: Vec<AggregatedGroup>, n: usize) -> Vec<AggregatedGroup> {
    groups.sort_by(|a, b| b.measure.cmp(&a.measure));
    groups.truncate(n);
    groups
}

/// The `n` largest measures, largest first. Used to label chart peaks.
pub fn peak_measures(groups: &[AggregatedGroup], n: usize) -> Vec<u64> {
    let mut measures: Vec<u64> = groups.iter().map(|g| g.measure).collect();
    measures.sort_unstable_by(|a, b| b.cmp(a));
    measures.truncate(n);
    measures
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(pairs: &[(&str, u64)]) -> Vec<AggregatedGroup> {
        pairs
            .iter()
            .map(|(k, m)| AggregatedGroup::new(*k, *m))
            .collect()
    }

    fn keys(groups: &[AggregatedGroup]) -> Vec<&str> {
        groups.iter().map(|g| g.key.as_str()).collect()
    }

    #[test]
    fn test_top_three_with_tie() {
        let ranked = top_n(groups(&[("A", 100), ("B", 90), ("C", 90), ("D", 10)]), 3);
        assert_eq!(keys(&ranked), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_tie_keeps_input_order_across_calls() {
        let input = groups(&[("C", 90), ("A", 100), ("B", 90)]);
        let first = top_n(input.clone(), 3);
        let second = top_n(input, 3);
        assert_eq!(keys(&first), vec!["A", "C", "B"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_length_is_min_of_n_and_distinct() {
        let input = groups(&[("A", 1), ("B", 2)]);
        assert_eq!(top_n(input.clone(), 5).len(), 2);
        assert_eq!(top_n(input.clone(), 1).len(), 1);
        assert!(top_n(input, 0).is_empty());
    }

    #[test]
    fn test_output_non_increasing() {
        let ranked = top_n(
            groups(&[("A", 5), ("B", 50), ("C", 7), ("D", 50), ("E", 1)]),
            TOP_15,
        );
        assert!(ranked.windows(2).all(|w| w[0].measure >= w[1].measure));
    }

    #[test]
    fn test_empty_input() {
        assert!(top_n(Vec::new(), TOP_10).is_empty());
    }

    #[test]
    fn test_peak_measures() {
        let input = groups(&[("a", 3), ("b", 9), ("c", 1), ("d", 9), ("e", 4)]);
        assert_eq!(peak_measures(&input, 3), vec![9, 9, 4]);
        assert_eq!(peak_measures(&input, TOP_5).len(), 5);
    }
}
