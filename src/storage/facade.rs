use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use super::{
    entities::{default_categories, AppSettings, Category, Goal, Metric},
    kv::KeyValueStore,
};

pub const METRICS_KEY: &str = "performance_metrics";
pub const GOALS_KEY: &str = "performance_goals";
pub const CATEGORIES_KEY: &str = "performance_categories";
pub const SETTINGS_KEY: &str = "app_settings";

const ALL_KEYS: [&str; 4] = [METRICS_KEY, GOALS_KEY, CATEGORIES_KEY, SETTINGS_KEY];

/// Collection-level persistence over a [KeyValueStore]. Each collection is
/// one JSON blob under a fixed key, replaced wholesale on every write.
///
/// Reads fail open: an unreadable or unparsable blob degrades to the same
/// default the key would have before first use, with a warning. Writes
/// propagate their errors so callers can report them.
///
/// There is deliberately no locking across the read-modify-write sequence of
/// an upsert. Two overlapping upserts against the same collection race and
/// the last write wins. With a single user and hand-paced writes that is an
/// accepted limitation rather than a reason to grow a transaction layer.
pub struct PerformanceStore<S> {
    store: S,
}

impl<S: KeyValueStore> PerformanceStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Reads and parses a key. Absence is `None`; read and parse failures
    /// propagate. Used directly by the export path.
    async fn read_strict<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.store.set(key, &serde_json::to_string(value)?).await
    }

    pub async fn metrics(&self) -> Vec<Metric> {
        self.read_lenient(METRICS_KEY).await
    }

    pub async fn save_metric(&self, metric: Metric) -> Result<()> {
        let mut metrics = self.metrics().await;
        upsert_by_id(&mut metrics, metric, |m| &m.id);
        self.write(METRICS_KEY, &metrics).await
    }

    pub async fn delete_metric(&self, id: &str) -> Result<()> {
        let mut metrics = self.metrics().await;
        metrics.retain(|m| m.id != id);
        self.write(METRICS_KEY, &metrics).await
    }

    pub async fn goals(&self) -> Vec<Goal> {
        self.read_lenient(GOALS_KEY).await
    }

    pub async fn save_goal(&self, goal: Goal) -> Result<()> {
        let mut goals = self.goals().await;
        upsert_by_id(&mut goals, goal, |g| &g.id);
        self.write(GOALS_KEY, &goals).await
    }

    pub async fn delete_goal(&self, id: &str) -> Result<()> {
        let mut goals = self.goals().await;
        goals.retain(|g| g.id != id);
        self.write(GOALS_KEY, &goals).await
    }

    /// Loads the category collection, seeding the built-in defaults on first
    /// read so subsequent reads observe them. The seed write is best-effort:
    /// failing to persist defaults still returns them.
    pub async fn categories(&self) -> Vec<Category> {
        match self.read_strict(CATEGORIES_KEY).await {
            Ok(Some(categories)) => categories,
            Ok(None) => {
                let defaults = default_categories();
                if let Err(e) = self.write(CATEGORIES_KEY, &defaults).await {
                    warn!("Failed to seed default categories: {e}");
                }
                defaults
            }
            Err(e) => {
                warn!("Failed to load {CATEGORIES_KEY}, using defaults: {e}");
                default_categories()
            }
        }
    }

    pub async fn save_category(&self, category: Category) -> Result<()> {
        let mut categories = self.categories().await;
        upsert_by_id(&mut categories, category, |c| &c.id);
        self.write(CATEGORIES_KEY, &categories).await
    }

    /// Removes a category without touching metrics that embed it. Orphaned
    /// snapshots inside existing metrics stay valid on their own.
    pub async fn delete_category(&self, id: &str) -> Result<()> {
        let mut categories = self.categories().await;
        categories.retain(|c| c.id != id);
        self.write(CATEGORIES_KEY, &categories).await
    }

    pub async fn settings(&self) -> AppSettings {
        match self.read_strict(SETTINGS_KEY).await {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                let defaults = AppSettings::default();
                if let Err(e) = self.write(SETTINGS_KEY, &defaults).await {
                    warn!("Failed to seed default settings: {e}");
                }
                defaults
            }
            Err(e) => {
                warn!("Failed to load {SETTINGS_KEY}, using defaults: {e}");
                AppSettings::default()
            }
        }
    }

    pub async fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        self.write(SETTINGS_KEY, settings).await
    }

    /// Serializes all four collections into one export document. Unlike the
    /// lenient getters, read failures propagate here so a broken store never
    /// masquerades as an empty export.
    pub async fn export_all(&self, now: DateTime<Utc>) -> Result<String> {
        let (metrics, goals, categories, settings) = tokio::try_join!(
            self.read_strict::<Vec<Metric>>(METRICS_KEY),
            self.read_strict::<Vec<Goal>>(GOALS_KEY),
            self.read_strict::<Vec<Category>>(CATEGORIES_KEY),
            self.read_strict::<AppSettings>(SETTINGS_KEY),
        )?;

        let document = ExportDocument {
            metrics: metrics.unwrap_or_default(),
            goals: goals.unwrap_or_default(),
            categories: categories.unwrap_or_else(default_categories),
            settings: settings.unwrap_or_default(),
            export_date: now,
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Removes all four keys in one batch. Category and settings defaults
    /// re-seed on the next read.
    pub async fn clear_all(&self) -> Result<()> {
        self.store.remove_many(&ALL_KEYS).await
    }

    async fn read_lenient<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.read_strict(key).await {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                warn!("Failed to load {key}, using empty collection: {e}");
                T::default()
            }
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument {
    metrics: Vec<Metric>,
    goals: Vec<Goal>,
    categories: Vec<Category>,
    settings: AppSettings,
    export_date: DateTime<Utc>,
}

/// Replaces the first element with a matching id in place, else appends.
fn upsert_by_id<T>(items: &mut Vec<T>, item: T, id_of: impl Fn(&T) -> &str) {
    if let Some(index) = items.iter().position(|existing| id_of(existing) == id_of(&item)) {
        items[index] = item;
    } else {
        items.push(item);
    }
}
