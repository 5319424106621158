use chrono::DateTime;
use chrono::Utc;

use serde::Deserialize;
use serde::Serialize;

/// A named bucket of metrics with display styling and a unit label.
///
/// Categories are embedded by value inside every [Metric] and [Goal] so that
/// historical entries keep the name/color/unit the category had at logging
/// time, even if the category is later edited or deleted.
#[derive(PartialEq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub unit: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_custom: Option<bool>,
}

/// A single logged numeric observation.
#[derive(PartialEq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub id: String,
    pub date: DateTime<Utc>,
    pub category: Category,
    pub value: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Metric {
    /// Builds a new metric against a category snapshot. The unit is copied
    /// from the category here and never re-validated afterwards. The id is
    /// derived from the creation moment in milliseconds.
    pub fn new(
        category: Category,
        value: f64,
        date: DateTime<Utc>,
        notes: Option<String>,
        tags: Option<Vec<String>>,
    ) -> Self {
        let unit = category.unit.clone();
        Self {
            id: Utc::now().timestamp_millis().to_string(),
            date,
            category,
            value,
            unit,
            notes,
            tags,
        }
    }
}

/// A target the user sets for a category. Stored and managed, but never
/// consulted by the analytics computations.
#[derive(PartialEq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub category: Category,
    pub target_value: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    pub description: String,
    pub is_active: bool,
}

#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone, Copy, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    System,
    Light,
    Dark,
}

#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone, Copy, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DefaultView {
    Dashboard,
    Add,
    Analytics,
}

/// Singleton settings record. Overwritten wholesale on every save, so
/// callers must read-modify-write the full record.
#[derive(PartialEq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub theme: Theme,
    pub default_view: DefaultView,
    pub haptic_feedback: bool,
    pub notifications: bool,
    /// Retention window in days. Persisted and displayed, nothing prunes by
    /// it yet.
    pub data_retention: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            default_view: DefaultView::Dashboard,
            haptic_feedback: true,
            notifications: true,
            data_retention: 365,
        }
    }
}

/// Built-in categories seeded on first read of the categories collection.
pub fn default_categories() -> Vec<Category> {
    fn builtin(
        id: &str,
        name: &str,
        icon: &str,
        color: &str,
        unit: &str,
        description: &str,
    ) -> Category {
        Category {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
            unit: unit.into(),
            description: description.into(),
            is_custom: None,
        }
    }

    vec![
        builtin(
            "fitness",
            "Fitness",
            "figure.run",
            "#FF6B6B",
            "reps/min/lbs",
            "Track workout performance, strength, and endurance",
        ),
        builtin(
            "productivity",
            "Productivity",
            "checkmark.circle",
            "#4ECDC4",
            "tasks/hours",
            "Monitor work efficiency and task completion",
        ),
        builtin(
            "learning",
            "Learning",
            "book",
            "#45B7D1",
            "hours/pages",
            "Track study time and knowledge acquisition",
        ),
        builtin(
            "health",
            "Health",
            "heart",
            "#96CEB4",
            "various",
            "Monitor health metrics like sleep, water intake, etc.",
        ),
        builtin(
            "finance",
            "Finance",
            "dollarsign.circle",
            "#FFEAA7",
            "$",
            "Track financial goals and spending habits",
        ),
        builtin(
            "habits",
            "Habits",
            "calendar",
            "#DDA0DD",
            "streak/count",
            "Monitor daily habits and consistency",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn metric_copies_unit_from_category() {
        let category = default_categories().remove(4);
        assert_eq!(category.unit, "$");
        let metric = Metric::new(
            category,
            12.5,
            Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap(),
            None,
            None,
        );
        assert_eq!(metric.unit, metric.category.unit);
    }

    #[test]
    fn wire_format_is_camel_case() {
        let settings = AppSettings::default();
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["theme"], "system");
        assert_eq!(json["defaultView"], "dashboard");
        assert_eq!(json["hapticFeedback"], true);
        assert_eq!(json["dataRetention"], 365);
    }

    #[test]
    fn optional_metric_fields_are_omitted() {
        let metric = Metric::new(
            default_categories().remove(0),
            3.0,
            Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap(),
            None,
            None,
        );
        let json = serde_json::to_value(&metric).unwrap();
        assert!(json.get("notes").is_none());
        assert!(json.get("tags").is_none());
    }
}
