//! Shared nutrition data structures
//!
//! `NutrientProfile` is what an item row carries (amounts per native serving,
//! any of which may be missing). `NutritionTotals` is the dense accumulator
//! produced by every aggregation.

use serde::{Deserialize, Deserializer, Serialize};

use super::NutrientKey;

/// Anything that can report an amount per nutrient key
pub trait NutrientAmounts {
    /// Amount for `key`; missing or non-finite values read as 0
    fn amount(&self, key: NutrientKey) -> f64;
}

/// Nutrient amounts per native serving unit of an item
///
/// Every field is optional. Deserialization is lenient: numbers and numeric
/// strings are accepted, anything else (including `null`) becomes `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientProfile {
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub saturated_fat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub trans_fat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub cholesterol_mg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub sodium_mg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub dietary_fiber: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub total_sugars: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub added_sugars: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub vitamin_d_mcg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub calcium_mg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub iron_mg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub potassium_mg: Option<f64>,
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let amount = value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    });
    Ok(amount.filter(|a| a.is_finite()))
}

impl NutrientProfile {
    /// Raw stored value for `key`
    pub fn get(&self, key: NutrientKey) -> Option<f64> {
        match key {
            NutrientKey::Calories => self.calories,
            NutrientKey::Protein => self.protein,
            NutrientKey::Carbs => self.carbs,
            NutrientKey::Fat => self.fat,
            NutrientKey::SaturatedFat => self.saturated_fat,
            NutrientKey::TransFat => self.trans_fat,
            NutrientKey::CholesterolMg => self.cholesterol_mg,
            NutrientKey::SodiumMg => self.sodium_mg,
            NutrientKey::DietaryFiber => self.dietary_fiber,
            NutrientKey::TotalSugars => self.total_sugars,
            NutrientKey::AddedSugars => self.added_sugars,
            NutrientKey::VitaminDMcg => self.vitamin_d_mcg,
            NutrientKey::CalciumMg => self.calcium_mg,
            NutrientKey::IronMg => self.iron_mg,
            NutrientKey::PotassiumMg => self.potassium_mg,
        }
    }

    pub fn set(&mut self, key: NutrientKey, value: Option<f64>) {
        let slot = match key {
            NutrientKey::Calories => &mut self.calories,
            NutrientKey::Protein => &mut self.protein,
            NutrientKey::Carbs => &mut self.carbs,
            NutrientKey::Fat => &mut self.fat,
            NutrientKey::SaturatedFat => &mut self.saturated_fat,
            NutrientKey::TransFat => &mut self.trans_fat,
            NutrientKey::CholesterolMg => &mut self.cholesterol_mg,
            NutrientKey::SodiumMg => &mut self.sodium_mg,
            NutrientKey::DietaryFiber => &mut self.dietary_fiber,
            NutrientKey::TotalSugars => &mut self.total_sugars,
            NutrientKey::AddedSugars => &mut self.added_sugars,
            NutrientKey::VitaminDMcg => &mut self.vitamin_d_mcg,
            NutrientKey::CalciumMg => &mut self.calcium_mg,
            NutrientKey::IronMg => &mut self.iron_mg,
            NutrientKey::PotassiumMg => &mut self.potassium_mg,
        };
        *slot = value;
    }

    /// Builder-style setter, handy for constructing fixtures
    pub fn with(mut self, key: NutrientKey, value: f64) -> Self {
        self.set(key, Some(value));
        self
    }
}

impl From<&NutritionTotals> for NutrientProfile {
    fn from(totals: &NutritionTotals) -> Self {
        let mut profile = NutrientProfile::default();
        for (key, value) in totals.iter() {
            profile.set(key, Some(value));
        }
        profile
    }
}

impl NutrientAmounts for NutrientProfile {
    fn amount(&self, key: NutrientKey) -> f64 {
        self.get(key).filter(|v| v.is_finite()).unwrap_or(0.0)
    }
}

/// Accumulated nutrition over the full catalog
///
/// Every aggregation starts from `NutritionTotals::zero()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein: f64,      // grams
    pub carbs: f64,        // grams
    pub fat: f64,          // grams
    pub saturated_fat: f64,
    pub trans_fat: f64,
    pub cholesterol_mg: f64,
    pub sodium_mg: f64,
    pub dietary_fiber: f64,
    pub total_sugars: f64,
    pub added_sugars: f64,
    pub vitamin_d_mcg: f64,
    pub calcium_mg: f64,
    pub iron_mg: f64,
    pub potassium_mg: f64,
}

impl NutritionTotals {
    /// Create totals with every key at zero
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(&self, key: NutrientKey) -> f64 {
        match key {
            NutrientKey::Calories => self.calories,
            NutrientKey::Protein => self.protein,
            NutrientKey::Carbs => self.carbs,
            NutrientKey::Fat => self.fat,
            NutrientKey::SaturatedFat => self.saturated_fat,
            NutrientKey::TransFat => self.trans_fat,
            NutrientKey::CholesterolMg => self.cholesterol_mg,
            NutrientKey::SodiumMg => self.sodium_mg,
            NutrientKey::DietaryFiber => self.dietary_fiber,
            NutrientKey::TotalSugars => self.total_sugars,
            NutrientKey::AddedSugars => self.added_sugars,
            NutrientKey::VitaminDMcg => self.vitamin_d_mcg,
            NutrientKey::CalciumMg => self.calcium_mg,
            NutrientKey::IronMg => self.iron_mg,
            NutrientKey::PotassiumMg => self.potassium_mg,
        }
    }

    pub fn get_mut(&mut self, key: NutrientKey) -> &mut f64 {
        match key {
            NutrientKey::Calories => &mut self.calories,
            NutrientKey::Protein => &mut self.protein,
            NutrientKey::Carbs => &mut self.carbs,
            NutrientKey::Fat => &mut self.fat,
            NutrientKey::SaturatedFat => &mut self.saturated_fat,
            NutrientKey::TransFat => &mut self.trans_fat,
            NutrientKey::CholesterolMg => &mut self.cholesterol_mg,
            NutrientKey::SodiumMg => &mut self.sodium_mg,
            NutrientKey::DietaryFiber => &mut self.dietary_fiber,
            NutrientKey::TotalSugars => &mut self.total_sugars,
            NutrientKey::AddedSugars => &mut self.added_sugars,
            NutrientKey::VitaminDMcg => &mut self.vitamin_d_mcg,
            NutrientKey::CalciumMg => &mut self.calcium_mg,
            NutrientKey::IronMg => &mut self.iron_mg,
            NutrientKey::PotassiumMg => &mut self.potassium_mg,
        }
    }

    /// Fresh totals equal to `source` scaled by `multiple`
    ///
    /// Missing source values count as zero, so the result never holds `NaN`
    /// unless `multiple` itself is not finite.
    pub fn from_profile<S: NutrientAmounts + ?Sized>(source: &S, multiple: f64) -> Self {
        let mut totals = Self::zero();
        totals.accumulate(source, multiple);
        totals
    }

    /// Add `source * multiplier` into these totals, key by key
    pub fn accumulate<S: NutrientAmounts + ?Sized>(&mut self, source: &S, multiplier: f64) {
        for key in NutrientKey::ALL {
            *self.get_mut(key) += source.amount(key) * multiplier;
        }
    }

    /// Scale nutrition values by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self::from_profile(self, multiplier)
    }

    /// Divide every value by `divisor`
    pub fn divide(&self, divisor: f64) -> Self {
        let mut result = Self::zero();
        for key in NutrientKey::ALL {
            *result.get_mut(key) = self.amount(key) / divisor;
        }
        result
    }

    /// Add another set of totals to this one
    pub fn add(&self, other: &NutritionTotals) -> Self {
        let mut result = *self;
        result.accumulate(other, 1.0);
        result
    }

    /// Iterate `(key, value)` pairs in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (NutrientKey, f64)> + '_ {
        NutrientKey::ALL.into_iter().map(move |key| (key, self.get(key)))
    }

    pub fn is_zero(&self) -> bool {
        self.iter().all(|(_, value)| value == 0.0)
    }
}

impl NutrientAmounts for NutritionTotals {
    fn amount(&self, key: NutrientKey) -> f64 {
        let value = self.get(key);
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }
}

impl std::ops::Add for NutritionTotals {
    type Output = NutritionTotals;

    fn add(self, other: NutritionTotals) -> NutritionTotals {
        NutritionTotals::add(&self, &other)
    }
}

impl std::ops::AddAssign for NutritionTotals {
    fn add_assign(&mut self, other: NutritionTotals) {
        self.accumulate(&other, 1.0);
    }
}

impl std::ops::Mul<f64> for NutritionTotals {
    type Output = NutritionTotals;

    fn mul(self, multiplier: f64) -> NutritionTotals {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for NutritionTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(NutritionTotals::zero(), |acc, n| acc + n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> NutrientProfile {
        NutrientProfile::default()
            .with(NutrientKey::Calories, 200.0)
            .with(NutrientKey::Protein, 10.0)
            .with(NutrientKey::SodiumMg, 140.0)
    }

    #[test]
    fn test_from_profile_scales_and_zero_fills() {
        let totals = NutritionTotals::from_profile(&sample_profile(), 0.5);
        assert_eq!(totals.calories, 100.0);
        assert_eq!(totals.protein, 5.0);
        assert_eq!(totals.sodium_mg, 70.0);
        assert_eq!(totals.fat, 0.0);
        assert_eq!(totals.potassium_mg, 0.0);
    }

    #[test]
    fn test_zero_profile_scales_to_zero() {
        for multiple in [0.0, 1.0, 2.5, 1000.0] {
            let totals = NutritionTotals::from_profile(&NutrientProfile::default(), multiple);
            assert!(totals.is_zero());
        }
    }

    #[test]
    fn test_zero_multiplier_yields_zero() {
        let totals = NutritionTotals::from_profile(&sample_profile(), 0.0);
        assert!(totals.is_zero());
    }

    #[test]
    fn test_accumulate_sums_in_place() {
        let mut totals = NutritionTotals::zero();
        totals.accumulate(&sample_profile(), 1.0);
        totals.accumulate(&sample_profile(), 2.0);
        assert_eq!(totals.calories, 600.0);
        assert_eq!(totals.protein, 30.0);
    }

    #[test]
    fn test_non_finite_profile_values_read_as_zero() {
        let mut profile = sample_profile();
        profile.set(NutrientKey::Fat, Some(f64::NAN));
        let totals = NutritionTotals::from_profile(&profile, 3.0);
        assert_eq!(totals.fat, 0.0);
        assert_eq!(totals.calories, 600.0);
    }

    #[test]
    fn test_lenient_deserialize() {
        let profile: NutrientProfile = serde_json::from_str(
            r#"{"calories": "120", "protein": null, "fat": "n/a", "sodiumMg": 5, "vitaminDMcg": 2.5, "name": "ignored"}"#,
        )
        .unwrap();
        assert_eq!(profile.calories, Some(120.0));
        assert_eq!(profile.protein, None);
        assert_eq!(profile.fat, None);
        assert_eq!(profile.sodium_mg, Some(5.0));
        assert_eq!(profile.vitamin_d_mcg, Some(2.5));
    }

    #[test]
    fn test_totals_serialize_every_key() {
        let json = serde_json::to_value(NutritionTotals::zero()).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), NutrientKey::ALL.len());
        for key in NutrientKey::ALL {
            assert!(object.contains_key(key.as_str()), "missing {}", key);
        }
    }

    #[test]
    fn test_sum_and_divide() {
        let a = NutritionTotals::from_profile(&sample_profile(), 1.0);
        let b = NutritionTotals::from_profile(&sample_profile(), 0.25);
        let total: NutritionTotals = vec![a, b].into_iter().sum();
        assert_eq!(total.calories, 250.0);
        assert_eq!(total.divide(2.0).calories, 125.0);
    }
}
