//! Log impact preview
//!
//! Projects a pending log entry onto a day's totals and checks the result
//! against the day's targets, without recording anything.

use chrono::{NaiveDate, TimeZone};
use serde::Serialize;

use super::aggregate::{calculate_day_nutrition_in, format_log_entry, UnitWarning};
use crate::models::{
    format_number, DailyTargets, FormattedLogEntry, LogEntry, NutrientKey, NutritionTotals, Target,
};

/// Day totals plus the pending entry's totals
pub fn project_totals(current: &NutritionTotals, impact: &NutritionTotals) -> NutritionTotals {
    current.add(impact)
}

/// Whether `total` breaks the target for a key
///
/// Missing, zero and allow-over targets are never flagged.
pub fn is_over_target(target: Option<&Target>, total: f64) -> bool {
    target.is_some_and(|t| t.is_exceeded_by(total))
}

/// Percentage of `target` reached by `value`, clamped to 0..=100
pub fn progress_percent(value: f64, target: f64) -> f64 {
    Target::new(target).progress_percent(value)
}

/// Signed display of an impact amount, e.g. `"+300 kcal"` or `"+2.5 g"`
pub fn format_impact_value(key: NutrientKey, value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{}{} {}", sign, format_number(value, key.precision()), key.unit())
}

/// Keys whose projected totals break their targets, in catalog order
pub fn over_target_keys(projected: &NutritionTotals, targets: &DailyTargets) -> Vec<NutrientKey> {
    targets
        .iter()
        .filter(|(key, target)| target.is_exceeded_by(projected.get(*key)))
        .map(|(key, _)| key)
        .collect()
}

/// Per-key view of a pending entry against one target
#[derive(Debug, Clone, Serialize)]
pub struct NutrientImpact {
    pub key: NutrientKey,
    pub label: &'static str,
    pub unit: &'static str,
    pub current: f64,
    pub impact: f64,
    pub projected: f64,
    pub target: f64,
    pub allow_over: bool,
    pub current_percent: f64,
    pub projected_percent: f64,
    /// The day is already over before the pending entry
    pub already_over: bool,
    /// The day would be over with the pending entry
    pub over_target: bool,
    pub display: String,
}

impl NutrientImpact {
    fn new(key: NutrientKey, target: &Target, current: f64, impact: f64) -> Self {
        let projected = current + impact;
        Self {
            key,
            label: key.label(),
            unit: key.unit(),
            current,
            impact,
            projected,
            target: target.value,
            allow_over: target.allow_over,
            current_percent: target.progress_percent(current),
            projected_percent: target.progress_percent(projected),
            already_over: target.is_exceeded_by(current),
            over_target: target.is_exceeded_by(projected),
            display: format_impact_value(key, impact),
        }
    }
}

/// Result of previewing a pending log entry
#[derive(Debug, Clone, Serialize)]
pub struct ImpactPreview {
    pub date: NaiveDate,
    pub entry: FormattedLogEntry,
    pub current: NutritionTotals,
    pub impact: NutritionTotals,
    pub projected: NutritionTotals,
    /// One row per targeted nutrient, in catalog order
    pub nutrients: Vec<NutrientImpact>,
    pub over_targets: Vec<NutrientKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_warning: Option<UnitWarning>,
}

impl ImpactPreview {
    pub fn is_over(&self) -> bool {
        !self.over_targets.is_empty()
    }
}

/// Preview what logging `pending` on `day` would do to that day's totals
///
/// `day_entries` are the already formatted entries; only those on `day`
/// (read in `tz`) count toward the current totals.
pub fn preview_log_impact_in<Tz: TimeZone>(
    day_entries: &[FormattedLogEntry],
    day: NaiveDate,
    pending: &LogEntry,
    targets: &DailyTargets,
    tz: &Tz,
) -> ImpactPreview {
    let current = calculate_day_nutrition_in(day_entries, day, tz);
    let entry = format_log_entry(pending);
    let impact = entry.nutrition;
    let projected = project_totals(&current, &impact);

    let nutrients = targets
        .iter()
        .map(|(key, target)| NutrientImpact::new(key, target, current.get(key), impact.get(key)))
        .collect();
    let over_targets = over_target_keys(&projected, targets);
    if !over_targets.is_empty() {
        tracing::info!(
            "Logging '{}' on {} would exceed targets: {:?}",
            entry.label,
            day,
            over_targets
        );
    }

    ImpactPreview {
        date: day,
        unit_warning: entry.unit_warning.clone(),
        entry,
        current,
        impact,
        projected,
        nutrients,
        over_targets,
    }
}

/// Preview with timestamps read in local time
pub fn preview_log_impact(
    day_entries: &[FormattedLogEntry],
    day: NaiveDate,
    pending: &LogEntry,
    targets: &DailyTargets,
) -> ImpactPreview {
    preview_log_impact_in(day_entries, day, pending, targets, &chrono::Local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FoodItem, LogSource, NutrientProfile};
    use chrono::Utc;

    fn food(calories: f64, protein: f64) -> FoodItem {
        FoodItem::new(
            "Meal",
            "serving",
            NutrientProfile::default()
                .with(NutrientKey::Calories, calories)
                .with(NutrientKey::Protein, protein),
        )
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn logged(calories: f64, protein: f64) -> Vec<FormattedLogEntry> {
        vec![format_log_entry(
            &LogEntry::new(LogSource::Food(food(calories, protein)), 1.0, None).on(day()),
        )]
    }

    #[test]
    fn test_format_impact_value() {
        assert_eq!(format_impact_value(NutrientKey::Calories, 300.0), "+300 kcal");
        assert_eq!(format_impact_value(NutrientKey::Protein, 2.5), "+2.5 g");
        assert_eq!(format_impact_value(NutrientKey::Protein, 0.0), "+0 g");
        assert_eq!(format_impact_value(NutrientKey::SodiumMg, -12.0), "-12 mg");
        assert_eq!(format_impact_value(NutrientKey::Fat, f64::INFINITY), "+0 g");
    }

    #[test]
    fn test_is_over_target() {
        assert!(is_over_target(Some(&Target::new(2000.0)), 2100.0));
        assert!(!is_over_target(Some(&Target::allowing_over(2000.0)), 2100.0));
        assert!(!is_over_target(Some(&Target::new(0.0)), 2100.0));
        assert!(!is_over_target(None, 2100.0));
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(1800.0, 2000.0), 90.0);
        assert_eq!(progress_percent(2100.0, 2000.0), 100.0);
        assert_eq!(progress_percent(50.0, 0.0), 0.0);
    }

    #[test]
    fn test_preview_flags_projected_overage() {
        let targets = DailyTargets::new().with(NutrientKey::Calories, Target::new(2000.0));
        let pending = LogEntry::new(LogSource::Food(food(300.0, 20.0)), 1.0, None);
        let preview = preview_log_impact_in(&logged(1800.0, 0.0), day(), &pending, &targets, &Utc);

        assert_eq!(preview.current.calories, 1800.0);
        assert_eq!(preview.impact.calories, 300.0);
        assert_eq!(preview.projected.calories, 2100.0);
        assert_eq!(preview.over_targets, vec![NutrientKey::Calories]);
        assert!(preview.is_over());

        let calories = &preview.nutrients[0];
        assert!(!calories.already_over);
        assert!(calories.over_target);
        assert_eq!(calories.current_percent, 90.0);
        assert_eq!(calories.projected_percent, 100.0);
        assert_eq!(calories.display, "+300 kcal");
    }

    #[test]
    fn test_preview_respects_allow_over() {
        let targets = DailyTargets::new()
            .with(NutrientKey::Calories, Target::allowing_over(2000.0))
            .with(NutrientKey::Protein, Target::new(0.0));
        let pending = LogEntry::new(LogSource::Food(food(300.0, 20.0)), 1.0, None);
        let preview = preview_log_impact_in(&logged(1800.0, 5.0), day(), &pending, &targets, &Utc);

        assert!(!preview.is_over());
        assert_eq!(preview.nutrients.len(), 2);
        assert_eq!(preview.projected.protein, 25.0);
    }

    #[test]
    fn test_preview_ignores_other_days() {
        let targets = DailyTargets::new().with(NutrientKey::Calories, Target::new(2000.0));
        let other_day = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let pending = LogEntry::new(LogSource::Food(food(300.0, 0.0)), 1.0, None);
        let preview =
            preview_log_impact_in(&logged(1800.0, 0.0), other_day, &pending, &targets, &Utc);

        assert_eq!(preview.current.calories, 0.0);
        assert!(!preview.is_over());
    }
}
