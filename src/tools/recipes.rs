//! Item and Recipe MCP Tools
//!
//! Nutrition for a quantity of one item and for whole recipes.

use serde::Serialize;

use crate::models::{FoodItem, FoodKind, NutritionTotals, Recipe};
use crate::nutrition::{compute_item_nutrition, UnitWarning};

use super::{check_quantity, parse_payload};

/// Response for calculate_item_nutrition
#[derive(Debug, Serialize)]
pub struct ItemNutritionResponse {
    pub name: String,
    pub kind: FoodKind,
    pub native_unit: String,
    pub quantity: f64,
    pub unit: String,
    /// Quantity in multiples of the native unit
    pub normalized_quantity: f64,
    pub nutrition: NutritionTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_warning: Option<UnitWarning>,
}

pub fn calculate_item_nutrition(
    item: serde_json::Value,
    quantity: f64,
    unit: Option<String>,
) -> Result<ItemNutritionResponse, String> {
    let item: FoodItem = parse_payload("item", item)?;
    let quantity = check_quantity(quantity)?;
    let unit = unit
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| item.unit.clone());

    let result = compute_item_nutrition(&item, quantity, Some(unit.as_str()));

    Ok(ItemNutritionResponse {
        name: item.name,
        kind: item.kind,
        native_unit: item.unit,
        quantity,
        unit,
        normalized_quantity: result.normalized.quantity,
        nutrition: result.totals,
        unit_warning: result.unit_warning,
    })
}

/// Response for calculate_recipe_nutrition
#[derive(Debug, Serialize)]
pub struct RecipeNutritionResponse {
    pub name: String,
    pub servings: f64,
    pub servings_divisor: f64,
    pub item_count: usize,
    pub totals: NutritionTotals,
    pub per_serving: NutritionTotals,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unit_warnings: Vec<UnitWarning>,
}

pub fn calculate_recipe_nutrition(recipe: serde_json::Value) -> Result<RecipeNutritionResponse, String> {
    let recipe: Recipe = parse_payload("recipe", recipe)?;
    if let Some(item) = recipe.items.iter().find(|i| check_quantity(i.quantity).is_err()) {
        return Err(format!(
            "Invalid quantity {} for ingredient '{}'",
            item.quantity, item.ingredient.name
        ));
    }

    let nutrition = recipe.nutrition();

    Ok(RecipeNutritionResponse {
        name: recipe.name,
        servings: recipe.servings,
        servings_divisor: nutrition.servings_divisor,
        item_count: recipe.items.len(),
        totals: nutrition.totals,
        per_serving: nutrition.per_serving,
        unit_warnings: nutrition.unit_warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_calculate_item_nutrition_tool() {
        let item = json!({"name": "Chicken", "unit": "100g", "calories": 200, "protein": 10});
        let response = calculate_item_nutrition(item, 50.0, Some("g".to_string())).unwrap();
        assert!((response.normalized_quantity - 0.5).abs() < 1e-12);
        assert!((response.nutrition.calories - 100.0).abs() < 1e-9);
        assert!((response.nutrition.protein - 5.0).abs() < 1e-9);
        assert!(response.unit_warning.is_none());
    }

    #[test]
    fn test_calculate_item_nutrition_defaults_unit() {
        let item = json!({"name": "Bar", "kind": "food", "unit": "bar", "calories": 180});
        let response = calculate_item_nutrition(item, 2.0, None).unwrap();
        assert_eq!(response.unit, "bar");
        assert_eq!(response.kind, FoodKind::Food);
        assert_eq!(response.nutrition.calories, 360.0);
    }

    #[test]
    fn test_calculate_item_nutrition_rejects_bad_input() {
        assert!(calculate_item_nutrition(json!({"unit": "g"}), 1.0, None).is_err());
        let item = json!({"name": "Oats", "unit": "100g"});
        assert!(calculate_item_nutrition(item, f64::NAN, None).is_err());
    }

    #[test]
    fn test_calculate_recipe_nutrition_tool() {
        let recipe = json!({
            "name": "Mix",
            "servings": 2,
            "items": [
                {"ingredient": {"name": "A", "unit": "100g", "calories": 100}, "quantity": 200, "unit": "g"},
                {"ingredient": {"name": "B", "unit": "serving", "calories": 50}, "quantity": 1, "unit": "serving"}
            ]
        });
        let response = calculate_recipe_nutrition(recipe).unwrap();
        assert_eq!(response.item_count, 2);
        assert!((response.totals.calories - 250.0).abs() < 1e-9);
        assert!((response.per_serving.calories - 125.0).abs() < 1e-9);
    }

    #[test]
    fn test_calculate_recipe_nutrition_rejects_negative_quantity() {
        let recipe = json!({
            "name": "Broken",
            "items": [{"ingredient": {"name": "A", "unit": "g"}, "quantity": -5}]
        });
        assert!(calculate_recipe_nutrition(recipe).is_err());
    }
}
