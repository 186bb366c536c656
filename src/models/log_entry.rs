//! Log Entry model
//!
//! A logged consumption of an ingredient, food or recipe, attached to a
//! calendar day either explicitly (`intakeDate`) or through its timestamp.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{FoodItem, NutritionTotals, Recipe};
use crate::nutrition::UnitWarning;

/// What was eaten
///
/// Externally tagged, so a payload names its source kind as a key:
/// `{"food": {...}, "quantity": 1}` or `{"recipe": {...}, "quantity": 2}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSource {
    Ingredient(FoodItem),
    Food(FoodItem),
    Recipe(Recipe),
}

impl LogSource {
    pub fn kind(&self) -> &'static str {
        match self {
            LogSource::Ingredient(_) => "ingredient",
            LogSource::Food(_) => "food",
            LogSource::Recipe(_) => "recipe",
        }
    }

    /// Display name of the logged item
    pub fn label(&self) -> &str {
        match self {
            LogSource::Ingredient(item) | LogSource::Food(item) => &item.name,
            LogSource::Recipe(recipe) => &recipe.name,
        }
    }
}

/// A single intake log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(flatten)]
    pub source: LogSource,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Explicit calendar day; wins over `consumed_at`
    #[serde(
        default,
        alias = "intake_date",
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub intake_date: Option<NaiveDate>,
    #[serde(
        default,
        alias = "consumed_at",
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub consumed_at: Option<DateTime<Utc>>,
}

fn default_quantity() -> f64 {
    1.0
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value {
        serde_json::Value::String(s) => {
            parse_day(&s).or_else(|| parse_timestamp(&s).map(|at| at.date_naive()))
        }
        serde_json::Value::Number(n) => from_epoch_millis(&n).map(|at| at.date_naive()),
        _ => None,
    }))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value {
        serde_json::Value::String(s) => parse_timestamp(&s),
        serde_json::Value::Number(n) => from_epoch_millis(&n),
        _ => None,
    }))
}

/// Milliseconds since the Unix epoch, as browser clients send them
fn from_epoch_millis(n: &serde_json::Number) -> Option<DateTime<Utc>> {
    let millis = n
        .as_i64()
        .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))?;
    DateTime::<Utc>::from_timestamp_millis(millis)
}

/// Parse a `YYYY-MM-DD` day, tolerating surrounding whitespace
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Parse an RFC 3339 timestamp; offset-less timestamps are taken as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| naive.and_utc())
}

impl LogEntry {
    pub fn new(source: LogSource, quantity: f64, unit: Option<String>) -> Self {
        Self {
            id: None,
            source,
            quantity,
            unit,
            intake_date: None,
            consumed_at: None,
        }
    }

    pub fn on(mut self, day: NaiveDate) -> Self {
        self.intake_date = Some(day);
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.consumed_at = Some(timestamp);
        self
    }

    /// Calendar day the entry belongs to, reading timestamps in `tz`
    pub fn calendar_day_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<NaiveDate> {
        calendar_day(self.intake_date, self.consumed_at, tz)
    }
}

/// An explicit day wins; otherwise the timestamp's date in `tz`.
/// `None` when there is neither.
fn calendar_day<Tz: TimeZone>(
    intake_date: Option<NaiveDate>,
    consumed_at: Option<DateTime<Utc>>,
    tz: &Tz,
) -> Option<NaiveDate> {
    intake_date.or_else(|| consumed_at.map(|at| at.with_timezone(tz).date_naive()))
}

/// A log entry with its resolved unit and computed nutrition
#[derive(Debug, Clone, Serialize)]
pub struct FormattedLogEntry {
    pub label: String,
    pub kind: &'static str,
    pub quantity: f64,
    /// Entered unit, or the item's native unit when none was given
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intake_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_at: Option<DateTime<Utc>>,
    pub nutrition: NutritionTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_warning: Option<UnitWarning>,
}

impl FormattedLogEntry {
    pub fn calendar_day_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<NaiveDate> {
        calendar_day(self.intake_date, self.consumed_at, tz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn oats_json() -> &'static str {
        r#"{"name": "Oats", "unit": "100g", "calories": 389}"#
    }

    #[test]
    fn test_deserialize_tagged_source() {
        let json = format!(
            r#"{{"ingredient": {}, "quantity": 50, "unit": "g", "intakeDate": "2024-03-01"}}"#,
            oats_json()
        );
        let entry: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry.source.kind(), "ingredient");
        assert_eq!(entry.source.label(), "Oats");
        assert_eq!(entry.quantity, 50.0);
        assert_eq!(entry.intake_date, NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[test]
    fn test_quantity_defaults_to_one_and_bad_dates_are_dropped() {
        let json = format!(
            r#"{{"food": {}, "intakeDate": "yesterday", "consumedAt": "not a time"}}"#,
            oats_json()
        );
        let entry: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry.quantity, 1.0);
        assert_eq!(entry.intake_date, None);
        assert_eq!(entry.consumed_at, None);
        assert_eq!(entry.calendar_day_in(&Utc), None);
    }

    #[test]
    fn test_numeric_timestamps_are_epoch_millis() {
        let json = format!(
            r#"{{"food": {}, "consumedAt": 1709294400000, "intakeDate": 1709294400000}}"#,
            oats_json()
        );
        let entry: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry.consumed_at, parse_timestamp("2024-03-01T12:00:00Z"));
        assert_eq!(entry.intake_date, NaiveDate::from_ymd_opt(2024, 3, 1));

        let json = format!(r#"{{"food": {}, "consumedAt": true, "intakeDate": {{}}}}"#, oats_json());
        let entry: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry.consumed_at, None);
        assert_eq!(entry.intake_date, None);
    }

    #[test]
    fn test_intake_date_wins_over_timestamp() {
        let entry = LogEntry::new(LogSource::Food(FoodItem::default()), 1.0, None)
            .on(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
            .at(parse_timestamp("2024-03-05T12:00:00Z").unwrap());
        assert_eq!(entry.calendar_day_in(&Utc), NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[test]
    fn test_timestamp_day_depends_on_zone() {
        let entry = LogEntry::new(LogSource::Food(FoodItem::default()), 1.0, None)
            .at(parse_timestamp("2024-03-01T23:30:00Z").unwrap());
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(entry.calendar_day_in(&Utc), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(entry.calendar_day_in(&east), NaiveDate::from_ymd_opt(2024, 3, 2));
    }

    #[test]
    fn test_parse_timestamp_variants() {
        assert!(parse_timestamp("2024-03-01T08:15:00+01:00").is_some());
        assert!(parse_timestamp("2024-03-01T08:15:00").is_some());
        assert!(parse_timestamp("2024-03-01 08:15:00").is_some());
        assert!(parse_timestamp("08:15").is_none());
    }
}
