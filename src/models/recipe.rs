//! Recipe model
//!
//! A recipe is a list of ingredient quantities plus the number of servings it
//! produces. Its nutrition is always derived, never stored.

use serde::{Deserialize, Serialize};

use super::{FoodItem, NutrientProfile, NutrientSource, NutritionTotals};
use crate::nutrition::{compute_recipe_nutrition, UnitWarning, RECIPE_SERVING_UNIT};

/// One ingredient line of a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeItem {
    pub ingredient: FoodItem,
    pub quantity: f64,
    /// Unit the quantity is entered in; falls back to the ingredient's native unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl RecipeItem {
    pub fn new(ingredient: FoodItem, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            ingredient,
            quantity,
            unit: Some(unit.into()),
        }
    }
}

/// A recipe composed from ingredients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    /// Servings produced, as entered (may be fractional)
    #[serde(default = "default_servings")]
    pub servings: f64,
    #[serde(default)]
    pub items: Vec<RecipeItem>,
}

fn default_servings() -> f64 {
    1.0
}

impl Recipe {
    pub fn new(name: impl Into<String>, servings: f64, items: Vec<RecipeItem>) -> Self {
        Self {
            id: None,
            name: name.into(),
            servings,
            items,
        }
    }

    /// Total and per-serving nutrition of this recipe
    pub fn nutrition(&self) -> RecipeNutrition {
        compute_recipe_nutrition(self)
    }

    /// Per-serving view of this recipe, loggable in "serving" units
    pub fn per_serving(&self) -> RecipePerServing {
        RecipePerServing::new(&self.name, &self.nutrition().per_serving)
    }
}

/// Derived nutrition for a recipe
#[derive(Debug, Clone, Serialize)]
pub struct RecipeNutrition {
    pub totals: NutritionTotals,
    pub per_serving: NutritionTotals,
    /// Whole servings the totals were divided by
    pub servings_divisor: f64,
    /// Items whose unit could not be converted and were counted unconverted
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unit_warnings: Vec<UnitWarning>,
}

/// A recipe's per-serving nutrition as a loggable source
#[derive(Debug, Clone, Serialize)]
pub struct RecipePerServing {
    pub name: String,
    pub profile: NutrientProfile,
}

impl RecipePerServing {
    pub fn new(name: &str, per_serving: &NutritionTotals) -> Self {
        Self {
            name: name.to_string(),
            profile: NutrientProfile::from(per_serving),
        }
    }
}

impl NutrientSource for RecipePerServing {
    fn native_unit(&self) -> &str {
        RECIPE_SERVING_UNIT
    }

    fn profile(&self) -> &NutrientProfile {
        &self.profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NutrientKey;

    #[test]
    fn test_deserialize_defaults() {
        let recipe: Recipe = serde_json::from_str(
            r#"{"name": "Porridge", "items": [{"ingredient": {"name": "Oats", "unit": "100g", "calories": 389}, "quantity": 50, "unit": "g"}]}"#,
        )
        .unwrap();
        assert_eq!(recipe.servings, 1.0);
        assert_eq!(recipe.items.len(), 1);
        assert_eq!(recipe.items[0].unit.as_deref(), Some("g"));
    }

    #[test]
    fn test_per_serving_source_uses_serving_unit() {
        let oats = FoodItem::new(
            "Oats",
            "100g",
            NutrientProfile::default().with(NutrientKey::Calories, 400.0),
        );
        let recipe = Recipe::new("Porridge", 2.0, vec![RecipeItem::new(oats, 100.0, "g")]);
        let source = recipe.per_serving();
        assert_eq!(source.native_unit(), "serving");
        assert_eq!(source.profile().get(NutrientKey::Calories), Some(200.0));
    }
}
