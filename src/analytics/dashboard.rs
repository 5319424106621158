//! Stateless derivations for the landing view.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::storage::entities::{Category, Metric};

const RECENT_METRIC_LIMIT: usize = 10;

/// The most recent entries across all categories, newest first.
pub fn recent_metrics(metrics: &[Metric]) -> Vec<Metric> {
    let mut recent = metrics.to_vec();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(RECENT_METRIC_LIMIT);
    recent
}

/// Running count and average per category, irrespective of any window.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStat {
    pub category: Category,
    pub count: usize,
    /// `None` when the category has no entries (or they average to zero),
    /// letting the display fall back to a placeholder.
    pub average: Option<f64>,
}

pub fn category_stats(metrics: &[Metric], categories: &[Category]) -> Vec<CategoryStat> {
    categories
        .iter()
        .map(|category| {
            let values: Vec<f64> = metrics
                .iter()
                .filter(|m| m.category.id == category.id)
                .map(|m| m.value)
                .collect();
            let average = if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            };

            CategoryStat {
                category: category.clone(),
                count: values.len(),
                average: (average > 0.0).then_some(average),
            }
        })
        .collect()
}

/// Entries logged on the current calendar day, matched by the date prefix of
/// the RFC 3339 timestamp.
pub fn todays_metrics(metrics: &[Metric], now: DateTime<Utc>) -> Vec<Metric> {
    let today = now.format("%Y-%m-%d").to_string();
    metrics
        .iter()
        .filter(|m| {
            m.date
                .to_rfc3339_opts(SecondsFormat::Secs, true)
                .starts_with(&today)
        })
        .cloned()
        .collect()
}
