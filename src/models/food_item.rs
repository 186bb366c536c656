//! Food Item model
//!
//! Ingredients and packaged foods: a nutrient profile expressed per a native
//! serving unit such as `"100g"`, `"1 serving"` or `"slice"`.

use serde::{Deserialize, Serialize};

use super::NutrientProfile;

/// Something a quantity can be logged against
///
/// The native unit is the aggregation basis: every logged quantity is
/// converted into multiples of it before the profile is scaled.
pub trait NutrientSource {
    /// Unit label the profile is expressed per
    fn native_unit(&self) -> &str;

    /// Amounts per one native unit
    fn profile(&self) -> &NutrientProfile;
}

/// Which library an item lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FoodKind {
    /// Raw ingredient, usable in recipes
    #[default]
    Ingredient,
    /// Packaged or prepared food, logged directly
    Food,
}

impl FoodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodKind::Ingredient => "ingredient",
            FoodKind::Food => "food",
        }
    }
}

/// An ingredient or food with nutritional information
///
/// The profile is flattened so stored rows (`{"name": .., "unit": "100g",
/// "calories": 200, ...}`) deserialize directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodItem {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub kind: FoodKind,
    /// Native serving unit label, e.g. "100g"
    #[serde(default)]
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(flatten)]
    pub nutrition: NutrientProfile,
}

impl FoodItem {
    pub fn new(name: impl Into<String>, unit: impl Into<String>, nutrition: NutrientProfile) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind: FoodKind::Ingredient,
            unit: unit.into(),
            barcode: None,
            nutrition,
        }
    }

    /// Same item, marked as a packaged food
    pub fn into_food(mut self) -> Self {
        self.kind = FoodKind::Food;
        self
    }
}

impl NutrientSource for FoodItem {
    fn native_unit(&self) -> &str {
        &self.unit
    }

    fn profile(&self) -> &NutrientProfile {
        &self.nutrition
    }
}
