//! Pure trend computations over the metric and category collections.
//!
//! Nothing in here is persisted. Summaries are recomputed from the raw
//! collections on every invocation.

pub mod dashboard;

use std::fmt::Display;

use chrono::{DateTime, Duration, Utc};
use clap::ValueEnum;

use crate::storage::entities::{Category, Metric};

/// Time range selector used to filter metrics before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Window {
    #[value(name = "7d")]
    Week,
    #[value(name = "30d")]
    Month,
    #[value(name = "90d")]
    Quarter,
    #[value(name = "all")]
    All,
}

impl Window {
    /// Earliest timestamp still inside the window. All-time uses the Unix
    /// epoch as a sentinel older than any real entry, so it goes through the
    /// same filter as the day-bounded windows.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Window::Week => now - Duration::days(7),
            Window::Month => now - Duration::days(30),
            Window::Quarter => now - Duration::days(90),
            Window::All => DateTime::UNIX_EPOCH,
        }
    }
}

impl Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Window::Week => write!(f, "last 7 days"),
            Window::Month => write!(f, "last 30 days"),
            Window::Quarter => write!(f, "last 90 days"),
            Window::All => write!(f, "all time"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Up => write!(f, "up"),
            Trend::Down => write!(f, "down"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

/// Per-category aggregate over one window. Only categories with at least one
/// matching entry are ever emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub category_id: String,
    pub total_entries: usize,
    pub average: f64,
    pub best: f64,
    pub worst: f64,
    pub trend: Trend,
    /// Absolute percentage difference between the late and early half
    /// averages. Display code shows "Stable" instead of the number whenever
    /// [Self::trend] is stable.
    pub improvement: f64,
    /// Up to five entries in the window, newest first.
    pub recent_entries: Vec<Metric>,
}

const RECENT_ENTRY_LIMIT: usize = 5;

/// Improvement percentage beyond which a category counts as moving.
const TREND_THRESHOLD: f64 = 5.0;

/// Summarizes every category against the metrics inside `window`, in the
/// order of the categories collection. Categories with no matching entries
/// are omitted entirely.
pub fn generate_analytics(
    metrics: &[Metric],
    categories: &[Category],
    window: Window,
    now: DateTime<Utc>,
) -> Vec<CategorySummary> {
    let cutoff = window.cutoff(now);
    let filtered: Vec<&Metric> = metrics.iter().filter(|m| m.date >= cutoff).collect();

    categories
        .iter()
        .filter_map(|category| {
            let matched: Vec<&Metric> = filtered
                .iter()
                .copied()
                .filter(|m| m.category.id == category.id)
                .collect();
            if matched.is_empty() {
                return None;
            }

            let values: Vec<f64> = matched.iter().map(|m| m.value).collect();
            let average = values.iter().sum::<f64>() / values.len() as f64;
            let best = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let worst = values.iter().copied().fold(f64::INFINITY, f64::min);

            let (trend, improvement) = classify_trend(&matched);

            let mut recent_entries: Vec<Metric> =
                matched.iter().map(|m| (*m).clone()).collect();
            recent_entries.sort_by(|a, b| b.date.cmp(&a.date));
            recent_entries.truncate(RECENT_ENTRY_LIMIT);

            Some(CategorySummary {
                category_id: category.id.clone(),
                total_entries: matched.len(),
                average,
                best,
                worst,
                trend,
                improvement,
                recent_entries,
            })
        })
        .collect()
}

/// Compares the early half of the matched entries against the late half.
///
/// The halves are split over the stored order of the collection, not over
/// time order. Sorting before the split would change every reported trend
/// for users whose entries were edited out of sequence, so the stored-order
/// split stays until there is a product decision to move off it.
fn classify_trend(matched: &[&Metric]) -> (Trend, f64) {
    let midpoint = matched.len() / 2;
    let (first_half, second_half) = matched.split_at(midpoint);

    let first_avg = mean(first_half);
    let second_avg = mean(second_half);

    let mut trend = Trend::Stable;
    let mut improvement = 0.0;

    // A single entry leaves the first half empty, which forces a stable
    // trend instead of dividing by zero.
    if first_avg > 0.0 {
        improvement = (second_avg - first_avg) / first_avg * 100.0;
        if improvement > TREND_THRESHOLD {
            trend = Trend::Up;
        } else if improvement < -TREND_THRESHOLD {
            trend = Trend::Down;
        }
    }

    (trend, improvement.abs())
}

fn mean(metrics: &[&Metric]) -> f64 {
    if metrics.is_empty() {
        return 0.0;
    }
    metrics.iter().map(|m| m.value).sum::<f64>() / metrics.len() as f64
}

/// Header line numbers for the analytics view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverallStats {
    pub total_entries: usize,
    pub categories_tracked: usize,
    pub improving_categories: usize,
}

pub fn overall_stats(summaries: &[CategorySummary]) -> OverallStats {
    OverallStats {
        total_entries: summaries.iter().map(|s| s.total_entries).sum(),
        categories_tracked: summaries.len(),
        improving_categories: summaries
            .iter()
            .filter(|s| s.trend == Trend::Up)
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::storage::entities::{default_categories, Category, Metric};

    use super::{generate_analytics, overall_stats, Trend, Window};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
    }

    fn category(id: &str) -> Category {
        Category {
            id: id.into(),
            name: id.into(),
            icon: "circle".into(),
            color: "#FFFFFF".into(),
            unit: "reps".into(),
            description: String::new(),
            is_custom: None,
        }
    }

    fn metric(category_id: &str, value: f64, date: DateTime<Utc>) -> Metric {
        let mut metric = Metric::new(category(category_id), value, date, None, None);
        metric.id = format!("{category_id}-{value}-{date}");
        metric
    }

    #[test]
    fn test_four_entry_split_reports_upward_trend() {
        // Encounter order [10, 20, 30, 40] splits 2/2: early mean 15, late
        // mean 35, improvement (35-15)/15*100.
        let metrics: Vec<Metric> = [10., 20., 30., 40.]
            .iter()
            .enumerate()
            .map(|(i, v)| metric("fitness", *v, now() - Duration::days(3 - i as i64)))
            .collect();

        let summaries =
            generate_analytics(&metrics, &[category("fitness")], Window::Week, now());

        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];
        assert_eq!(summary.total_entries, 4);
        assert_eq!(summary.average, 25.);
        assert_eq!(summary.best, 40.);
        assert_eq!(summary.worst, 10.);
        assert_eq!(summary.trend, Trend::Up);
        assert!((summary.improvement - 400. / 3.).abs() < 1e-9);
    }

    #[test]
    fn test_single_entry_is_stable_with_zero_improvement() {
        let metrics = vec![metric("fitness", 50., now() - Duration::days(1))];

        let summaries =
            generate_analytics(&metrics, &[category("fitness")], Window::Week, now());

        assert_eq!(summaries[0].trend, Trend::Stable);
        assert_eq!(summaries[0].improvement, 0.);
    }

    #[test]
    fn test_categories_without_entries_are_omitted() {
        let metrics = vec![metric("fitness", 50., now() - Duration::days(1))];
        let categories = default_categories();

        let summaries = generate_analytics(&metrics, &categories, Window::Week, now());

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].category_id, "fitness");
    }

    #[test]
    fn test_all_time_equals_any_window_older_than_oldest_entry() {
        let metrics: Vec<Metric> = (0..6)
            .map(|i| metric("fitness", 10. + i as f64, now() - Duration::days(i)))
            .collect();

        let all = generate_analytics(&metrics, &[category("fitness")], Window::All, now());
        let week = generate_analytics(&metrics, &[category("fitness")], Window::Week, now());

        assert_eq!(all, week);
    }

    #[test]
    fn test_window_filter_cutoff_is_inclusive() {
        let exactly_on_cutoff = metric("fitness", 5., now() - Duration::days(7));
        let older = metric("fitness", 9., now() - Duration::days(8));

        let summaries = generate_analytics(
            &[exactly_on_cutoff, older],
            &[category("fitness")],
            Window::Week,
            now(),
        );

        assert_eq!(summaries[0].total_entries, 1);
        assert_eq!(summaries[0].best, 5.);
    }

    #[test]
    fn test_recent_entries_sorted_newest_first_and_capped_at_five() {
        let metrics: Vec<Metric> = (0..8)
            .map(|i| metric("fitness", i as f64, now() - Duration::days(i)))
            .collect();

        let summaries =
            generate_analytics(&metrics, &[category("fitness")], Window::Month, now());

        let recent = &summaries[0].recent_entries;
        assert_eq!(recent.len(), 5);
        assert!(recent.windows(2).all(|pair| pair[0].date >= pair[1].date));
        assert_eq!(recent[0].value, 0.);
    }

    #[test]
    fn test_trend_split_uses_stored_order_not_time_order() {
        // Values rise in stored order but fall chronologically. The split
        // follows stored order, so this still reports an upward trend.
        let metrics: Vec<Metric> = [10., 20., 30., 40.]
            .iter()
            .enumerate()
            .map(|(i, v)| metric("fitness", *v, now() - Duration::days(i as i64)))
            .collect();

        let summaries =
            generate_analytics(&metrics, &[category("fitness")], Window::Week, now());

        assert_eq!(summaries[0].trend, Trend::Up);
        // Newest-first recent entries still follow time order.
        assert_eq!(summaries[0].recent_entries[0].value, 10.);
    }

    #[test]
    fn test_small_movement_within_threshold_is_stable() {
        let metrics = vec![
            metric("fitness", 100., now() - Duration::days(2)),
            metric("fitness", 104., now() - Duration::days(1)),
        ];

        let summaries =
            generate_analytics(&metrics, &[category("fitness")], Window::Week, now());

        assert_eq!(summaries[0].trend, Trend::Stable);
        assert_eq!(summaries[0].improvement, 4.);
    }

    #[test]
    fn test_output_follows_category_collection_order() {
        let metrics = vec![
            metric("habits", 1., now() - Duration::days(1)),
            metric("fitness", 2., now() - Duration::days(1)),
        ];
        let categories = default_categories();

        let summaries = generate_analytics(&metrics, &categories, Window::Week, now());

        assert_eq!(
            summaries.iter().map(|s| s.category_id.as_str()).collect::<Vec<_>>(),
            vec!["fitness", "habits"]
        );
    }

    #[test]
    fn test_overall_stats_counts_improving_categories() {
        let metrics = vec![
            metric("fitness", 10., now() - Duration::days(2)),
            metric("fitness", 30., now() - Duration::days(1)),
            metric("habits", 5., now() - Duration::days(1)),
        ];
        let categories = default_categories();

        let summaries = generate_analytics(&metrics, &categories, Window::Week, now());
        let stats = overall_stats(&summaries);

        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.categories_tracked, 2);
        assert_eq!(stats.improving_categories, 1);
    }

    #[test]
    fn test_all_time_cutoff_is_unix_epoch() {
        assert_eq!(Window::All.cutoff(now()), DateTime::UNIX_EPOCH);
    }
}
