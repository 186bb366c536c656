//! Nutrient catalog
//!
//! The fixed set of nutrient keys every profile, total and target is keyed by.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A tracked nutrient
///
/// Serialized with the camelCase names used by stored item rows and
/// client payloads (`saturatedFat`, `sodiumMg`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NutrientKey {
    Calories,
    Protein,
    Carbs,
    Fat,
    SaturatedFat,
    TransFat,
    CholesterolMg,
    SodiumMg,
    DietaryFiber,
    TotalSugars,
    AddedSugars,
    VitaminDMcg,
    CalciumMg,
    IronMg,
    PotassiumMg,
}

impl NutrientKey {
    /// Every key, in catalog order
    pub const ALL: [NutrientKey; 15] = [
        NutrientKey::Calories,
        NutrientKey::Protein,
        NutrientKey::Carbs,
        NutrientKey::Fat,
        NutrientKey::SaturatedFat,
        NutrientKey::TransFat,
        NutrientKey::CholesterolMg,
        NutrientKey::SodiumMg,
        NutrientKey::DietaryFiber,
        NutrientKey::TotalSugars,
        NutrientKey::AddedSugars,
        NutrientKey::VitaminDMcg,
        NutrientKey::CalciumMg,
        NutrientKey::IronMg,
        NutrientKey::PotassiumMg,
    ];

    /// Calories and the three macros
    pub const PRIMARY: [NutrientKey; 4] = [
        NutrientKey::Calories,
        NutrientKey::Protein,
        NutrientKey::Carbs,
        NutrientKey::Fat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientKey::Calories => "calories",
            NutrientKey::Protein => "protein",
            NutrientKey::Carbs => "carbs",
            NutrientKey::Fat => "fat",
            NutrientKey::SaturatedFat => "saturatedFat",
            NutrientKey::TransFat => "transFat",
            NutrientKey::CholesterolMg => "cholesterolMg",
            NutrientKey::SodiumMg => "sodiumMg",
            NutrientKey::DietaryFiber => "dietaryFiber",
            NutrientKey::TotalSugars => "totalSugars",
            NutrientKey::AddedSugars => "addedSugars",
            NutrientKey::VitaminDMcg => "vitaminDMcg",
            NutrientKey::CalciumMg => "calciumMg",
            NutrientKey::IronMg => "ironMg",
            NutrientKey::PotassiumMg => "potassiumMg",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            NutrientKey::Calories => "Calories",
            NutrientKey::Protein => "Protein",
            NutrientKey::Carbs => "Carbs",
            NutrientKey::Fat => "Fat",
            NutrientKey::SaturatedFat => "Saturated fat",
            NutrientKey::TransFat => "Trans fat",
            NutrientKey::CholesterolMg => "Cholesterol",
            NutrientKey::SodiumMg => "Sodium",
            NutrientKey::DietaryFiber => "Dietary fiber",
            NutrientKey::TotalSugars => "Total sugars",
            NutrientKey::AddedSugars => "Added sugars",
            NutrientKey::VitaminDMcg => "Vitamin D",
            NutrientKey::CalciumMg => "Calcium",
            NutrientKey::IronMg => "Iron",
            NutrientKey::PotassiumMg => "Potassium",
        }
    }

    /// Unit amounts of this nutrient are expressed in
    pub fn unit(&self) -> &'static str {
        match self {
            NutrientKey::Calories => "kcal",
            NutrientKey::CholesterolMg
            | NutrientKey::SodiumMg
            | NutrientKey::CalciumMg
            | NutrientKey::IronMg
            | NutrientKey::PotassiumMg => "mg",
            NutrientKey::VitaminDMcg => "mcg",
            _ => "g",
        }
    }

    pub fn is_primary(&self) -> bool {
        Self::PRIMARY.contains(self)
    }

    /// Display precision: whole calories, one decimal for everything else
    pub fn precision(&self) -> usize {
        match self {
            NutrientKey::Calories => 0,
            _ => 1,
        }
    }

    /// Format an amount for display, e.g. `"12.5 g"` or `"250 kcal"`
    ///
    /// Non-finite values render as `"0"` and a trailing `.0` is dropped.
    pub fn format_amount(&self, value: f64) -> String {
        format!("{} {}", format_number(value, self.precision()), self.unit())
    }
}

/// Format a number with a fixed precision, dropping a trailing `.0`
pub fn format_number(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let formatted = format!("{:.*}", precision, value);
    match formatted.strip_suffix(".0") {
        Some(trimmed) => trimmed.to_string(),
        None => formatted,
    }
}

impl fmt::Display for NutrientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized nutrient key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown nutrient key: {0}")]
pub struct UnknownNutrientKey(pub String);

impl FromStr for NutrientKey {
    type Err = UnknownNutrientKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownNutrientKey(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_and_size() {
        assert_eq!(NutrientKey::ALL.len(), 15);
        assert_eq!(NutrientKey::ALL[0], NutrientKey::Calories);
        assert_eq!(NutrientKey::ALL[14], NutrientKey::PotassiumMg);
    }

    #[test]
    fn test_from_str_round_trips_names() {
        for key in NutrientKey::ALL {
            assert_eq!(key.as_str().parse::<NutrientKey>(), Ok(key));
        }
        assert_eq!("SODIUMMG".parse::<NutrientKey>(), Ok(NutrientKey::SodiumMg));
        assert!("vitaminC".parse::<NutrientKey>().is_err());
    }

    #[test]
    fn test_serde_names_match_as_str() {
        let json = serde_json::to_string(&NutrientKey::VitaminDMcg).unwrap();
        assert_eq!(json, "\"vitaminDMcg\"");
        let key: NutrientKey = serde_json::from_str("\"saturatedFat\"").unwrap();
        assert_eq!(key, NutrientKey::SaturatedFat);
    }

    #[test]
    fn test_units() {
        assert_eq!(NutrientKey::Calories.unit(), "kcal");
        assert_eq!(NutrientKey::Protein.unit(), "g");
        assert_eq!(NutrientKey::SodiumMg.unit(), "mg");
        assert_eq!(NutrientKey::VitaminDMcg.unit(), "mcg");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(NutrientKey::Calories.format_amount(249.6), "250 kcal");
        assert_eq!(NutrientKey::Protein.format_amount(12.0), "12 g");
        assert_eq!(NutrientKey::Protein.format_amount(12.34), "12.3 g");
        assert_eq!(NutrientKey::SodiumMg.format_amount(f64::NAN), "0 mg");
    }
}
