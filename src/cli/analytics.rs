use ansi_term::{Colour, Style};
use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use clap::Parser;

use crate::{
    analytics::{generate_analytics, overall_stats, CategorySummary, Trend, Window},
    storage::{entities::Category, facade::PerformanceStore, kv::KeyValueStore},
    utils::format::format_value,
};

#[derive(Debug, Parser)]
pub struct AnalyticsCommand {
    #[arg(
        short,
        long,
        value_enum,
        default_value = "30d",
        help = "Time window to aggregate over"
    )]
    window: Window,
}

/// Prints one block per category with entries in the window, in category
/// order, followed by an overall line.
pub async fn process_analytics_command<S: KeyValueStore>(
    store: &PerformanceStore<S>,
    AnalyticsCommand { window }: AnalyticsCommand,
    now: DateTime<Utc>,
) -> Result<()> {
    let metrics = store.metrics().await;
    let categories = store.categories().await;

    let summaries = generate_analytics(&metrics, &categories, window, now);

    if summaries.is_empty() {
        println!("No entries in {window}.");
        return Ok(());
    }

    for summary in &summaries {
        // Summaries come from the categories collection, so the lookup only
        // misses if the collection changed mid-flight. Skipping is fine.
        let Some(category) = categories.iter().find(|c| c.id == summary.category_id) else {
            continue;
        };
        print_summary(summary, category);
    }

    let overall = overall_stats(&summaries);
    println!(
        "{} entries across {} categories, {} improving",
        overall.total_entries, overall.categories_tracked, overall.improving_categories
    );
    Ok(())
}

fn print_summary(summary: &CategorySummary, category: &Category) {
    let unit = category.unit.as_str();

    println!(
        "{}\t{} entries",
        Style::new().bold().paint(&category.name),
        summary.total_entries
    );
    println!(
        "  average {}\tbest {}\tworst {}",
        format_value(summary.average, unit),
        format_value(summary.best, unit),
        format_value(summary.worst, unit)
    );
    println!("  trend {}", trend_label(summary));
    for metric in &summary.recent_entries {
        println!(
            "  {}\t{}",
            metric.date.with_timezone(&Local).format("%x %H:%M"),
            format_value(metric.value, &metric.unit)
        );
    }
    println!();
}

/// Stable trends always render as "Stable", whatever the residual
/// percentage was.
fn trend_label(summary: &CategorySummary) -> String {
    match summary.trend {
        Trend::Up => Colour::Green
            .paint(format!("↑ {:.1}%", summary.improvement))
            .to_string(),
        Trend::Down => Colour::Red
            .paint(format!("↓ {:.1}%", summary.improvement))
            .to_string(),
        Trend::Stable => Colour::Yellow.paint("→ Stable").to_string(),
    }
}
