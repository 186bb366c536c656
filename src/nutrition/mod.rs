//! Nutrition calculation module
//!
//! Handles serving-unit parsing, unit conversions and nutrition aggregation.

pub mod aggregate;
pub mod converter;
pub mod impact;
pub mod units;

pub use aggregate::{
    accumulate, calculate_day_nutrition, calculate_day_nutrition_in, compute_item_nutrition,
    compute_recipe_nutrition, format_log_entry, normalize_item_quantity,
    normalize_recipe_serving_quantity, recipe_servings_divisor, scale_nutrient_profile,
    ItemNutrition, NormalizeResult, NormalizedQuantity, UnitMismatch, UnitWarning,
    RECIPE_SERVING_UNIT,
};
pub use converter::{parse_quantity, parse_serving_label, unit_multiplier, ParsedServingLabel};
pub use impact::{
    format_impact_value, is_over_target, over_target_keys, preview_log_impact,
    preview_log_impact_in, progress_percent, project_totals, ImpactPreview, NutrientImpact,
};
pub use units::{
    convert_energy, convert_mass, grams_per_unit, ml_per_unit, normalize_serving_unit,
    normalize_unit, unit_info, UnitInfo, UnitSystem,
};
