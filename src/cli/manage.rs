use anyhow::Result;
use chrono::{Local, Utc};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Subcommand};

use crate::storage::{
    entities::{Category, Goal},
    facade::PerformanceStore,
    kv::KeyValueStore,
};

use super::{log::DateStyle, Args};

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    #[command(about = "List categories with their units")]
    List {},
    #[command(about = "Add or update a custom category")]
    Add {
        #[arg(long, help = "Stable id, used when logging entries")]
        id: String,
        #[arg(long, help = "Display name")]
        name: String,
        #[arg(long, default_value = "circle", help = "Icon reference")]
        icon: String,
        #[arg(long, default_value = "#4ECDC4", help = "Display color, hex")]
        color: String,
        #[arg(long, help = "Unit label, copied into every logged entry")]
        unit: String,
        #[arg(long, default_value = "", help = "Short description")]
        description: String,
    },
    #[command(
        about = "Delete a category. Entries that reference it keep their logged snapshot"
    )]
    Delete { id: String },
}

pub async fn process_category_command<S: KeyValueStore>(
    store: &PerformanceStore<S>,
    command: CategoryCommand,
) -> Result<()> {
    match command {
        CategoryCommand::List {} => {
            for category in store.categories().await {
                println!(
                    "{}\t{}\t[{}]\t{}",
                    category.id, category.name, category.unit, category.description
                );
            }
            Ok(())
        }
        CategoryCommand::Add {
            id,
            name,
            icon,
            color,
            unit,
            description,
        } => {
            let category = Category {
                id: id.clone(),
                name,
                icon,
                color,
                unit,
                description,
                is_custom: Some(true),
            };
            store.save_category(category).await?;
            println!("Saved category {id}");
            Ok(())
        }
        CategoryCommand::Delete { id } => {
            store.delete_category(&id).await?;
            println!("Deleted category {id}");
            Ok(())
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum GoalCommand {
    #[command(about = "List goals")]
    List {},
    #[command(about = "Create a goal, or update one by passing its id")]
    Set {
        #[arg(long, help = "Goal id. Omit to create a new goal")]
        id: Option<String>,
        #[arg(long, help = "Category id the goal applies to")]
        category: String,
        #[arg(long, help = "Target value in the category's unit")]
        target: f64,
        #[arg(
            long,
            help = "Deadline. Examples are \"next friday\", \"15/06/2025\". Omit for an open-ended goal"
        )]
        deadline: Option<String>,
        #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
        date_style: DateStyle,
        #[arg(long, default_value = "", help = "Short description")]
        description: String,
        #[arg(long, help = "Create the goal in an inactive state")]
        inactive: bool,
    },
    #[command(about = "Delete a goal by id")]
    Delete { id: String },
}

pub async fn process_goal_command<S: KeyValueStore>(
    store: &PerformanceStore<S>,
    command: GoalCommand,
) -> Result<()> {
    match command {
        GoalCommand::List {} => {
            for goal in store.goals().await {
                println!(
                    "{}\t{}\t{} {}\t{}\t{}",
                    goal.id,
                    goal.category.name,
                    goal.target_value,
                    goal.unit,
                    goal.deadline
                        .map(|d| d.with_timezone(&Local).format("%x").to_string())
                        .unwrap_or_else(|| "no deadline".into()),
                    if goal.is_active { "active" } else { "inactive" }
                );
            }
            Ok(())
        }
        GoalCommand::Set {
            id,
            category,
            target,
            deadline,
            date_style,
            description,
            inactive,
        } => {
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

            let deadline =
                match deadline.map(|s| parse_date_string(&s, Local::now(), date_style.into())) {
                    Some(Ok(v)) => Some(v.with_timezone(&Utc)),
                    Some(Err(e)) => {
                        return Err(Args::command()
                            .error(
                                clap::error::ErrorKind::ValueValidation,
                                format!("Failed to validate deadline {e}"),
                            )
                            .into());
                    }
                    None => None,
                };

            let unit = category.unit.clone();
            let goal = Goal {
                id: id.unwrap_or_else(|| Utc::now().timestamp_millis().to_string()),
                category,
                target_value: target,
                unit,
                deadline,
                description,
                is_active: !inactive,
            };
            let id = goal.id.clone();
            store.save_goal(goal).await?;
            println!("Saved goal {id}");
            Ok(())
        }
        GoalCommand::Delete { id } => {
            store.delete_goal(&id).await?;
            println!("Deleted goal {id}");
            Ok(())
        }
    }
}
