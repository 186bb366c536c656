//! Unit types and conversion constants
//!
//! Canonical unit spellings, the mass and volume conversion tables, and the
//! standalone mass/energy converters used for nutrient amounts.

use serde::{Deserialize, Serialize};

/// Measurement system a canonical unit belongs to
///
/// Units outside both tables (serving, slice, scoop, ...) have no system
/// and only convert to themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Base unit: gram
    Mass,
    /// Base unit: millilitre
    Volume,
}

impl UnitSystem {
    pub fn base_unit(&self) -> &'static str {
        match self {
            UnitSystem::Mass => "g",
            UnitSystem::Volume => "ml",
        }
    }
}

/// A canonical unit resolved against the conversion tables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitInfo {
    pub system: UnitSystem,
    /// Base units (g or ml) per one of this unit
    pub factor: f64,
    /// Canonical spelling
    pub unit: String,
}

// ============================================================================
// Weight Conversion Constants (to grams)
// ============================================================================

/// Grams per microgram
pub const G_PER_MCG: f64 = 1e-6;
/// Grams per milligram
pub const G_PER_MG: f64 = 1e-3;
/// Grams per kilogram
pub const G_PER_KG: f64 = 1000.0;
/// Grams per avoirdupois ounce
pub const G_PER_OZ: f64 = 28.349523125;
/// Grams per pound
pub const G_PER_LB: f64 = 453.59237;

// ============================================================================
// Volume Conversion Constants (to milliliters)
// ============================================================================

/// Milliliters per liter
pub const ML_PER_LITER: f64 = 1000.0;
/// Milliliters per US fluid ounce
pub const ML_PER_FL_OZ: f64 = 29.5735295625;
/// Milliliters per teaspoon
pub const ML_PER_TSP: f64 = 4.92892159375;
/// Milliliters per tablespoon
pub const ML_PER_TBSP: f64 = 14.78676478125;
/// Milliliters per cup (nutrition labelling cup)
pub const ML_PER_CUP: f64 = 240.0;

/// Kilojoules per kilocalorie
pub const KJ_PER_KCAL: f64 = 4.184;

/// Mass units by canonical spelling
pub static MASS_UNITS: &[(&str, f64)] = &[
    ("mcg", G_PER_MCG),
    ("mg", G_PER_MG),
    ("g", 1.0),
    ("kg", G_PER_KG),
    ("oz", G_PER_OZ),
    ("lb", G_PER_LB),
];

/// Volume units by canonical spelling
pub static VOLUME_UNITS: &[(&str, f64)] = &[
    ("ml", 1.0),
    ("l", ML_PER_LITER),
    ("fl oz", ML_PER_FL_OZ),
    ("tsp", ML_PER_TSP),
    ("tbsp", ML_PER_TBSP),
    ("cup", ML_PER_CUP),
];

// ============================================================================
// Unit Recognition
// ============================================================================

/// Canonical spelling for a known synonym of an already cleaned unit
fn canonical_unit(cleaned: &str) -> Option<&'static str> {
    let canonical = match cleaned {
        "g" | "gram" | "grams" => "g",
        "kg" | "kilogram" | "kilograms" => "kg",
        "mg" | "milligram" | "milligrams" => "mg",
        "mcg" | "ug" | "microgram" | "micrograms" => "mcg",
        "lb" | "lbs" | "pound" | "pounds" => "lb",
        "ml" | "milliliter" | "milliliters" => "ml",
        "l" | "liter" | "liters" => "l",
        "fl oz" | "floz" | "fluid ounce" | "fluid ounces" => "fl oz",
        "oz" | "ounce" | "ounces" => "oz",
        "tbsp" | "tablespoon" | "tablespoons" => "tbsp",
        "tsp" | "teaspoon" | "teaspoons" => "tsp",
        "cup" | "cups" => "cup",
        "serving" | "servings" => "serving",
        "piece" | "pieces" => "piece",
        "slice" | "slices" => "slice",
        "pack" | "packs" => "pack",
        "packet" | "packets" => "packet",
        "stick" | "sticks" => "stick",
        "can" | "cans" => "can",
        "bottle" | "bottles" => "bottle",
        "bar" | "bars" => "bar",
        _ => return None,
    };
    Some(canonical)
}

/// Normalize a serving unit spelling to its canonical form
///
/// Lower-cases, drops periods and collapses whitespace; known synonyms map
/// to their short form, anything else is returned cleaned but otherwise
/// untouched. Blank input yields `None`.
pub fn normalize_serving_unit(raw: &str) -> Option<String> {
    let lower = raw.to_lowercase().replace('.', "");
    let cleaned = lower.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return None;
    }
    match canonical_unit(&cleaned) {
        Some(canonical) => Some(canonical.to_string()),
        None => Some(cleaned),
    }
}

fn table_lookup(table: &[(&str, f64)], unit: &str) -> Option<f64> {
    table
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, factor)| *factor)
}

/// Get the conversion factor to grams for a weight unit
pub fn grams_per_unit(unit: &str) -> Option<f64> {
    normalize_serving_unit(unit).and_then(|canonical| table_lookup(MASS_UNITS, &canonical))
}

/// Get the conversion factor to milliliters for a volume unit
pub fn ml_per_unit(unit: &str) -> Option<f64> {
    normalize_serving_unit(unit).and_then(|canonical| table_lookup(VOLUME_UNITS, &canonical))
}

/// Resolve a unit spelling against the mass and volume tables
pub fn unit_info(unit: &str) -> Option<UnitInfo> {
    let canonical = normalize_serving_unit(unit)?;
    let (system, factor) = if let Some(factor) = table_lookup(MASS_UNITS, &canonical) {
        (UnitSystem::Mass, factor)
    } else if let Some(factor) = table_lookup(VOLUME_UNITS, &canonical) {
        (UnitSystem::Volume, factor)
    } else {
        return None;
    };
    Some(UnitInfo {
        system,
        factor,
        unit: canonical,
    })
}

// ============================================================================
// Nutrient Amount Conversion
// ============================================================================

/// Normalize a nutrient amount unit (`"µg"` → `"mcg"`, `"Kilojoules"` → `"kj"`)
pub fn normalize_unit(unit: &str) -> String {
    let normalized = unit.trim().to_lowercase().replace(['µ', 'μ'], "mc");
    match normalized.as_str() {
        "ug" => "mcg".to_string(),
        "kilojoules" => "kj".to_string(),
        "kilocalories" => "kcal".to_string(),
        _ => normalized,
    }
}

fn grams_for_mass_unit(unit: &str) -> Option<f64> {
    table_lookup(MASS_UNITS, unit)
}

/// Convert a mass amount between units
///
/// Blank or identical units return the value unchanged. An unknown source
/// unit is read as grams and an unknown target unit returns the value as
/// given.
pub fn convert_mass(value: f64, from: &str, to: &str) -> f64 {
    let from = normalize_unit(from);
    let to = normalize_unit(to);
    if from.is_empty() || to.is_empty() || from == to {
        return value;
    }

    let grams = match grams_for_mass_unit(&from) {
        Some(factor) => value * factor,
        None => value,
    };
    match grams_for_mass_unit(&to) {
        Some(factor) => grams / factor,
        None => value,
    }
}

/// Convert an energy amount between kcal and kJ
///
/// Any other pair returns the value unchanged.
pub fn convert_energy(value: f64, from: &str, to: &str) -> f64 {
    let from = normalize_unit(from);
    let to = normalize_unit(to);
    match (from.as_str(), to.as_str()) {
        ("kj", "kcal") => value / KJ_PER_KCAL,
        ("kcal", "kj") => value * KJ_PER_KCAL,
        _ => value,
    }
}
