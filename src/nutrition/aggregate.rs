//! Nutrition aggregation
//!
//! Converts entered quantities into multiples of an item's native unit, then
//! scales and sums nutrient profiles for items, recipes, log entries and days.

use chrono::{Local, NaiveDate, TimeZone};
use serde::Serialize;
use tracing::{debug, warn};

use super::converter::unit_multiplier;
use crate::models::{
    FoodItem, FormattedLogEntry, LogEntry, LogSource, NutrientAmounts, NutrientSource,
    NutritionTotals, Recipe, RecipeNutrition, RecipePerServing,
};

/// Native unit of a recipe's per-serving nutrition
pub const RECIPE_SERVING_UNIT: &str = "serving";

/// A quantity expressed in a target unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedQuantity {
    pub quantity: f64,
    pub unit: String,
}

/// The entered unit cannot be converted into the target unit
///
/// Carries the unconverted quantity so callers can proceed with it.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("Unit {entry_unit} is not compatible with {target_unit}.")]
pub struct UnitMismatch {
    pub quantity: f64,
    pub entry_unit: String,
    pub target_unit: String,
}

impl UnitMismatch {
    /// The quantity as entered, in the entered unit
    pub fn unconverted(&self) -> NormalizedQuantity {
        NormalizedQuantity {
            quantity: self.quantity,
            unit: self.entry_unit.clone(),
        }
    }
}

pub type NormalizeResult = Result<NormalizedQuantity, UnitMismatch>;

/// A unit mismatch that was absorbed by counting the quantity unconverted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitWarning {
    pub item: String,
    pub quantity: f64,
    pub entry_unit: String,
    pub target_unit: String,
    pub message: String,
}

impl UnitWarning {
    fn from_mismatch(item: &str, mismatch: &UnitMismatch) -> Self {
        Self {
            item: item.to_string(),
            quantity: mismatch.quantity,
            entry_unit: mismatch.entry_unit.clone(),
            target_unit: mismatch.target_unit.clone(),
            message: mismatch.to_string(),
        }
    }
}

/// Only an empty label counts as "no unit"; whitespace is a real (unknown) unit
fn non_empty(unit: Option<&str>) -> Option<&str> {
    unit.filter(|u| !u.is_empty())
}

fn normalize_to(quantity: f64, entry_unit: &str, target_unit: &str) -> NormalizeResult {
    match unit_multiplier(entry_unit, target_unit).filter(|m| m.is_finite()) {
        Some(multiplier) => Ok(NormalizedQuantity {
            quantity: quantity * multiplier,
            unit: target_unit.to_string(),
        }),
        None => Err(UnitMismatch {
            quantity,
            entry_unit: entry_unit.to_string(),
            target_unit: target_unit.to_string(),
        }),
    }
}

/// Express `quantity` of `unit` in multiples of the item's native unit
///
/// Without an item, or when either side has no unit, the quantity passes
/// through unchanged. An omitted entry unit means the native unit.
pub fn normalize_item_quantity(
    item: Option<&dyn NutrientSource>,
    quantity: f64,
    unit: Option<&str>,
) -> NormalizeResult {
    let Some(item) = item else {
        return Ok(NormalizedQuantity {
            quantity,
            unit: unit.unwrap_or_default().to_string(),
        });
    };

    let native_unit = non_empty(Some(item.native_unit()));
    let entry_unit = non_empty(unit).or(native_unit);
    match (entry_unit, native_unit) {
        (Some(entry_unit), Some(native_unit)) => normalize_to(quantity, entry_unit, native_unit),
        _ => Ok(NormalizedQuantity {
            quantity,
            unit: entry_unit.or(native_unit).unwrap_or_default().to_string(),
        }),
    }
}

/// Express a recipe quantity in servings; the entry unit defaults to "serving"
pub fn normalize_recipe_serving_quantity(quantity: f64, unit: Option<&str>) -> NormalizeResult {
    let entry_unit = non_empty(unit).unwrap_or(RECIPE_SERVING_UNIT);
    normalize_to(quantity, entry_unit, RECIPE_SERVING_UNIT)
}

/// Quantity to scale by, counting a mismatched quantity unconverted
fn resolve_quantity(label: &str, result: NormalizeResult) -> (NormalizedQuantity, Option<UnitWarning>) {
    match result {
        Ok(normalized) => (normalized, None),
        Err(mismatch) => {
            warn!(
                "{} for '{}', counting {} unconverted",
                mismatch, label, mismatch.quantity
            );
            let warning = UnitWarning::from_mismatch(label, &mismatch);
            (mismatch.unconverted(), Some(warning))
        }
    }
}

/// Every nutrient of `profile` multiplied by `multiple`; missing values count as 0
pub fn scale_nutrient_profile<S: NutrientAmounts + ?Sized>(profile: &S, multiple: f64) -> NutritionTotals {
    NutritionTotals::from_profile(profile, multiple)
}

/// Add `source * multiplier` into `totals`
pub fn accumulate<S: NutrientAmounts + ?Sized>(totals: &mut NutritionTotals, source: &S, multiplier: f64) {
    totals.accumulate(source, multiplier);
}

/// Nutrition for a quantity of a single item
#[derive(Debug, Clone, Serialize)]
pub struct ItemNutrition {
    /// Quantity in the item's native unit (or unconverted on mismatch)
    pub normalized: NormalizedQuantity,
    pub totals: NutritionTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_warning: Option<UnitWarning>,
}

fn source_nutrition(
    label: &str,
    source: &dyn NutrientSource,
    normalized: NormalizeResult,
) -> ItemNutrition {
    let (normalized, unit_warning) = resolve_quantity(label, normalized);
    let totals = scale_nutrient_profile(source.profile(), normalized.quantity);
    ItemNutrition {
        normalized,
        totals,
        unit_warning,
    }
}

/// Nutrition of `quantity` `unit` of an ingredient or food
pub fn compute_item_nutrition(item: &FoodItem, quantity: f64, unit: Option<&str>) -> ItemNutrition {
    let normalized = normalize_item_quantity(Some(item), quantity, unit);
    source_nutrition(&item.name, item, normalized)
}

/// Whole servings a recipe's totals are divided by
///
/// Rounds the entered servings and never goes below one.
pub fn recipe_servings_divisor(servings: f64) -> f64 {
    if !servings.is_finite() {
        return 1.0;
    }
    servings.round().max(1.0)
}

/// Total and per-serving nutrition of a recipe
pub fn compute_recipe_nutrition(recipe: &Recipe) -> RecipeNutrition {
    let mut totals = NutritionTotals::zero();
    let mut unit_warnings = Vec::new();

    for item in &recipe.items {
        let normalized = normalize_item_quantity(Some(&item.ingredient), item.quantity, item.unit.as_deref());
        let (normalized, warning) = resolve_quantity(&item.ingredient.name, normalized);
        accumulate(&mut totals, item.ingredient.profile(), normalized.quantity);
        unit_warnings.extend(warning);
    }

    let servings_divisor = recipe_servings_divisor(recipe.servings);
    debug!(
        "Recipe '{}': {} items, {} kcal over {} servings",
        recipe.name,
        recipe.items.len(),
        totals.calories,
        servings_divisor
    );

    RecipeNutrition {
        totals,
        per_serving: totals.divide(servings_divisor),
        servings_divisor,
        unit_warnings,
    }
}

/// Resolve a log entry's label, unit and nutrition
pub fn format_log_entry(entry: &LogEntry) -> FormattedLogEntry {
    let label = entry.source.label().to_string();
    let (unit, nutrition) = match &entry.source {
        LogSource::Ingredient(item) | LogSource::Food(item) => {
            let unit = non_empty(entry.unit.as_deref()).unwrap_or(&item.unit).to_string();
            let nutrition = compute_item_nutrition(item, entry.quantity, Some(unit.as_str()));
            (unit, nutrition)
        }
        LogSource::Recipe(recipe) => {
            let per_serving = RecipePerServing::new(&recipe.name, &recipe.nutrition().per_serving);
            let normalized = normalize_recipe_serving_quantity(entry.quantity, entry.unit.as_deref());
            let unit = non_empty(entry.unit.as_deref())
                .unwrap_or(RECIPE_SERVING_UNIT)
                .to_string();
            (unit, source_nutrition(&label, &per_serving, normalized))
        }
    };

    FormattedLogEntry {
        label,
        kind: entry.source.kind(),
        quantity: entry.quantity,
        unit,
        intake_date: entry.intake_date,
        consumed_at: entry.consumed_at,
        nutrition: nutrition.totals,
        unit_warning: nutrition.unit_warning,
    }
}

/// Sum the nutrition of entries that fall on `day`, reading timestamps in `tz`
pub fn calculate_day_nutrition_in<Tz: TimeZone>(
    entries: &[FormattedLogEntry],
    day: NaiveDate,
    tz: &Tz,
) -> NutritionTotals {
    let mut totals = NutritionTotals::zero();
    let mut matched = 0;
    for entry in entries {
        if entry.calendar_day_in(tz) == Some(day) {
            accumulate(&mut totals, &entry.nutrition, 1.0);
            matched += 1;
        }
    }
    debug!("Day {}: {} of {} entries, {} kcal", day, matched, entries.len(), totals.calories);
    totals
}

/// Sum the nutrition of entries that fall on `day` in local time
pub fn calculate_day_nutrition(entries: &[FormattedLogEntry], day: NaiveDate) -> NutritionTotals {
    calculate_day_nutrition_in(entries, day, &Local)
}
