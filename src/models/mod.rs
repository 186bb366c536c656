//! Data models
//!
//! Nutrient catalog, item profiles, recipes, log entries and daily targets.

mod food_item;
mod log_entry;
mod nutrient;
mod nutrition;
mod recipe;
mod target;

pub use food_item::{FoodItem, FoodKind, NutrientSource};
pub use log_entry::{parse_day, parse_timestamp, FormattedLogEntry, LogEntry, LogSource};
pub use nutrient::{format_number, NutrientKey, UnknownNutrientKey};
pub use nutrition::{NutrientAmounts, NutrientProfile, NutritionTotals};
pub use recipe::{Recipe, RecipeItem, RecipeNutrition, RecipePerServing};
pub use target::{parse_target_input, DailyTargets, Target, TargetParseError};
