use anyhow::Result;
use clap::Subcommand;

use crate::storage::{
    entities::{DefaultView, Theme},
    facade::PerformanceStore,
    kv::KeyValueStore,
};

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    #[command(about = "Show current settings")]
    Show {},
    #[command(about = "Change one or more settings")]
    Set {
        #[arg(long, value_enum, help = "Color theme")]
        theme: Option<Theme>,
        #[arg(long, value_enum, help = "View opened on launch")]
        default_view: Option<DefaultView>,
        #[arg(long, help = "Haptic feedback on supported devices")]
        haptics: Option<bool>,
        #[arg(long, help = "Reminder notifications")]
        notifications: Option<bool>,
        #[arg(long, help = "Data retention window in days")]
        retention_days: Option<u32>,
    },
}

/// Settings persist as one record, so `Set` always reads the current record,
/// patches it in memory and writes the whole thing back.
pub async fn process_settings_command<S: KeyValueStore>(
    store: &PerformanceStore<S>,
    command: SettingsCommand,
) -> Result<()> {
    match command {
        SettingsCommand::Show {} => {
            let settings = store.settings().await;
            println!("theme         {:?}", settings.theme);
            println!("default view  {:?}", settings.default_view);
            println!("haptics       {}", on_off(settings.haptic_feedback));
            println!("notifications {}", on_off(settings.notifications));
            println!("retention     {} days", settings.data_retention);
            Ok(())
        }
        SettingsCommand::Set {
            theme,
            default_view,
            haptics,
            notifications,
            retention_days,
        } => {
            let mut settings = store.settings().await;
            if let Some(theme) = theme {
                settings.theme = theme;
            }
            if let Some(default_view) = default_view {
                settings.default_view = default_view;
            }
            if let Some(haptics) = haptics {
                settings.haptic_feedback = haptics;
            }
            if let Some(notifications) = notifications {
                settings.notifications = notifications;
            }
            if let Some(retention_days) = retention_days {
                settings.data_retention = retention_days;
            }
            store.save_settings(&settings).await?;
            println!("Settings saved.");
            Ok(())
        }
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}
