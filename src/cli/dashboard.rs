use ansi_term::Style;
use anyhow::Result;
use chrono::{DateTime, Local, Utc};

use crate::{
    analytics::dashboard::{category_stats, recent_metrics, todays_metrics, CategoryStat},
    storage::{facade::PerformanceStore, kv::KeyValueStore},
    utils::format::format_value,
};

/// Prints the landing view: today's tally, the latest entries and running
/// per-category stats.
pub async fn process_dashboard_command<S: KeyValueStore>(
    store: &PerformanceStore<S>,
    now: DateTime<Utc>,
) -> Result<()> {
    let metrics = store.metrics().await;
    let categories = store.categories().await;

    let todays = todays_metrics(&metrics, now);
    let heading = Style::new().bold();

    println!("{}", heading.paint("Today"));
    match todays.len() {
        0 => println!("  No entries today. Use `perftrack log` to record one."),
        1 => println!("  1 entry logged today."),
        n => println!("  {n} entries logged today."),
    }
    println!();

    let recent = recent_metrics(&metrics);
    println!("{}", heading.paint("Recent entries"));
    if recent.is_empty() {
        println!("  Nothing logged yet.");
    }
    for metric in &recent {
        println!(
            "  {}\t{}\t{}\t{}{}",
            metric.date.with_timezone(&Local).format("%x %H:%M"),
            format_value(metric.value, &metric.unit),
            metric.category.name,
            metric.id,
            metric
                .notes
                .as_deref()
                .map(|n| format!("\t{n}"))
                .unwrap_or_default()
        );
    }
    println!();

    println!("{}", heading.paint("Categories"));
    for stat in category_stats(&metrics, &categories) {
        println!("  {}", category_line(&stat));
    }
    Ok(())
}

/// The count always shows; only the average degrades to a placeholder when
/// there is nothing meaningful to report.
fn category_line(stat: &CategoryStat) -> String {
    let average = stat
        .average
        .map(|average| format_value(average, &stat.category.unit))
        .unwrap_or_else(|| "-".into());
    format!("{}\t{} entries\tavg {}", stat.category.name, stat.count, average)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::{
        analytics::dashboard::category_stats,
        storage::entities::{default_categories, Metric},
    };

    use super::category_line;

    #[test]
    fn test_category_line_keeps_count_when_values_average_to_zero() {
        let date = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();
        let metrics = vec![
            Metric::new(default_categories().remove(0), 0., date, None, None),
            Metric::new(default_categories().remove(0), 0., date, None, None),
        ];

        let stats = category_stats(&metrics, &default_categories());

        let line = category_line(&stats[0]);
        assert_eq!(line, "Fitness\t2 entries\tavg -");
    }

    #[test]
    fn test_category_line_formats_average_in_category_unit() {
        let date = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();
        let metrics = vec![
            Metric::new(default_categories().remove(4), 5., date, None, None),
            Metric::new(default_categories().remove(4), 10., date, None, None),
        ];

        let stats = category_stats(&metrics, &default_categories());

        let line = category_line(&stats[4]);
        assert_eq!(line, "Finance\t2 entries\tavg $7.50");
    }

    #[test]
    fn test_category_line_for_untouched_category() {
        let stats = category_stats(&[], &default_categories());

        assert_eq!(category_line(&stats[0]), "Fitness\t0 entries\tavg -");
    }
}
