//! Unit MCP Tools
//!
//! Serving label parsing, unit conversion and the nutrient catalog.

use serde::Serialize;

use crate::models::NutrientKey;
use crate::nutrition::{
    convert_energy, convert_mass, normalize_unit, parse_serving_label as parse_label,
    unit_multiplier, UnitSystem,
};

/// Response for parse_serving_label
#[derive(Debug, Serialize)]
pub struct ParseServingLabelResponse {
    pub label: String,
    pub parsed: bool,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    /// Mass or volume; absent for opaque units like "slice"
    pub system: Option<UnitSystem>,
    /// Amount in grams or millilitres
    pub base_amount: Option<f64>,
    pub base_unit: Option<&'static str>,
}

pub fn parse_serving_label(label: &str) -> Result<ParseServingLabelResponse, String> {
    let parsed = parse_label(label);
    let info = parsed.as_ref().and_then(|p| p.unit_info());

    Ok(ParseServingLabelResponse {
        label: label.to_string(),
        parsed: parsed.is_some(),
        amount: parsed.as_ref().map(|p| p.amount),
        base_amount: parsed.as_ref().and_then(|p| p.base_amount()),
        unit: parsed.map(|p| p.unit),
        system: info.as_ref().map(|i| i.system),
        base_unit: info.as_ref().map(|i| i.system.base_unit()),
    })
}

/// Response for convert_units
#[derive(Debug, Serialize)]
pub struct ConvertUnitsResponse {
    pub from: String,
    pub to: String,
    pub compatible: bool,
    pub multiplier: Option<f64>,
    pub quantity: f64,
    pub converted_quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Convert `quantity` of `from` labels into `to` labels
pub fn convert_units(from: &str, to: &str, quantity: Option<f64>) -> Result<ConvertUnitsResponse, String> {
    let quantity = super::check_quantity(quantity.unwrap_or(1.0))?;
    let multiplier = unit_multiplier(from, to);

    Ok(ConvertUnitsResponse {
        from: from.to_string(),
        to: to.to_string(),
        compatible: multiplier.is_some(),
        multiplier,
        quantity,
        converted_quantity: multiplier.map(|m| quantity * m),
        message: multiplier
            .is_none()
            .then(|| format!("Unit {} is not compatible with {}.", from, to)),
    })
}

/// Response for convert_nutrient_amount
#[derive(Debug, Serialize)]
pub struct ConvertNutrientAmountResponse {
    pub value: f64,
    pub from_unit: String,
    pub to_unit: String,
    /// "energy" for kcal/kJ pairs, otherwise "mass"
    pub kind: &'static str,
    pub converted: f64,
}

fn is_energy_unit(unit: &str) -> bool {
    matches!(normalize_unit(unit).as_str(), "kcal" | "kj")
}

/// Convert a nutrient amount between mass units or between kcal and kJ
pub fn convert_nutrient_amount(
    value: f64,
    from_unit: &str,
    to_unit: &str,
) -> Result<ConvertNutrientAmountResponse, String> {
    if !value.is_finite() {
        return Err(format!("Value must be a finite number, got {}", value));
    }

    let energy = is_energy_unit(from_unit) || is_energy_unit(to_unit);
    let converted = if energy {
        convert_energy(value, from_unit, to_unit)
    } else {
        convert_mass(value, from_unit, to_unit)
    };

    Ok(ConvertNutrientAmountResponse {
        value,
        from_unit: normalize_unit(from_unit),
        to_unit: normalize_unit(to_unit),
        kind: if energy { "energy" } else { "mass" },
        converted,
    })
}

/// One row of the nutrient catalog
#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    pub key: NutrientKey,
    pub label: &'static str,
    pub unit: &'static str,
    pub primary: bool,
    pub precision: usize,
}

/// Response for nutrient_catalog
#[derive(Debug, Serialize)]
pub struct NutrientCatalogResponse {
    pub nutrients: Vec<CatalogEntry>,
}

pub fn nutrient_catalog() -> NutrientCatalogResponse {
    let nutrients = NutrientKey::ALL
        .into_iter()
        .map(|key| CatalogEntry {
            key,
            label: key.label(),
            unit: key.unit(),
            primary: key.is_primary(),
            precision: key.precision(),
        })
        .collect();
    NutrientCatalogResponse { nutrients }
}
