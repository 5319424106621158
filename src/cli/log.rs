use std::fmt::Display;

use anyhow::Result;
use chrono::{Local, Utc};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};

use crate::{
    storage::{entities::Metric, facade::PerformanceStore, kv::KeyValueStore},
    utils::format::format_value,
};

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct LogCommand {
    #[arg(
        short,
        long,
        help = "Category id of the entry. See `perftrack category list`"
    )]
    category: String,
    #[arg(short, long, help = "Numeric value of the observation")]
    value: f64,
    #[arg(
        long,
        help = "Moment of the observation. Examples are \"yesterday\", \"2 hours ago\", \"15/03/2025\". Defaults to now"
    )]
    date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
    #[arg(long, help = "Free-text note attached to the entry")]
    notes: Option<String>,
    #[arg(long = "tag", help = "Tag for the entry. Can be repeated")]
    tags: Vec<String>,
}

/// Records one metric. The category must already exist; its snapshot is
/// embedded into the saved entry so later category edits don't rewrite
/// history. Nothing is written when validation fails.
pub async fn process_log_command<S: KeyValueStore>(
    store: &PerformanceStore<S>,
    LogCommand {
        category,
        value,
        date,
        date_style,
        notes,
        tags,
    }: LogCommand,
) -> Result<()> {
    let categories = store.categories().await;
    let Some(category) = categories.into_iter().find(|c| c.id == category) else {
        return Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!(
                    "Unknown category \"{category}\". Use `perftrack category list` to see available ids"
                ),
            )
            .into());
    };

    let date = match date.map(|s| parse_date_string(&s, Local::now(), date_style.into())) {
        Some(Ok(v)) => v.with_timezone(&Utc),
        Some(Err(e)) => {
            return Err(Args::command()
                .error(
                    clap::error::ErrorKind::ValueValidation,
                    format!("Failed to validate date {e}"),
                )
                .into());
        }
        None => Utc::now(),
    };

    let metric = Metric::new(
        category,
        value,
        date,
        notes,
        (!tags.is_empty()).then_some(tags),
    );

    let formatted = format_value(metric.value, &metric.unit);
    let id = metric.id.clone();
    let name = metric.category.name.clone();
    store.save_metric(metric).await?;

    println!("Logged {formatted} for {name} (id {id})");
    Ok(())
}
