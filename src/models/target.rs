//! Daily nutrient targets
//!
//! Targets are entered as text: `"2000"` caps calories at 2000 while
//! `"2000+"` sets a goal that may be exceeded without being flagged.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{NutrientKey, UnknownNutrientKey};
use super::nutrient::format_number;

/// Errors for target text and target maps
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TargetParseError {
    #[error("Invalid target '{0}': expected a non-negative number, optionally followed by '+'")]
    Invalid(String),

    #[error(transparent)]
    UnknownKey(#[from] UnknownNutrientKey),
}

/// A daily target for one nutrient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub value: f64,
    /// Exceeding the value is fine (a minimum rather than a cap)
    #[serde(default, alias = "allow_over")]
    pub allow_over: bool,
}

impl Target {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            allow_over: false,
        }
    }

    pub fn allowing_over(value: f64) -> Self {
        Self {
            value,
            allow_over: true,
        }
    }

    /// Whether `total` breaks this target
    ///
    /// Zero targets and allow-over targets are never exceeded.
    pub fn is_exceeded_by(&self, total: f64) -> bool {
        self.value > 0.0 && total > self.value && !self.allow_over
    }

    /// Progress toward the target as a percentage clamped to 100
    pub fn progress_percent(&self, total: f64) -> f64 {
        if self.value <= 0.0 || !total.is_finite() {
            return 0.0;
        }
        (total / self.value * 100.0).clamp(0.0, 100.0)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_number(self.value, 1))?;
        if self.allow_over {
            f.write_str("+")?;
        }
        Ok(())
    }
}

/// Parse target text as entered by a user
///
/// Blank input clears the target (`Ok(None)`). A trailing `+` allows
/// overage; the remaining text must be a finite, non-negative number.
pub fn parse_target_input(raw: &str) -> Result<Option<Target>, TargetParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let (numeric, allow_over) = match trimmed.strip_suffix('+') {
        Some(rest) => (rest.trim(), true),
        None => (trimmed, false),
    };
    if numeric.is_empty() {
        return Err(TargetParseError::Invalid(trimmed.to_string()));
    }

    match numeric.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(Some(Target { value, allow_over })),
        _ => Err(TargetParseError::Invalid(trimmed.to_string())),
    }
}

/// Accepted shapes for a single target in JSON
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TargetRepr {
    Number(f64),
    Text(String),
    Full(Target),
}

impl TargetRepr {
    fn into_target(self) -> Result<Option<Target>, TargetParseError> {
        match self {
            TargetRepr::Number(value) => parse_target_input(&value.to_string()),
            TargetRepr::Text(text) => parse_target_input(&text),
            TargetRepr::Full(target) => {
                if target.value.is_finite() && target.value >= 0.0 {
                    Ok(Some(target))
                } else {
                    Err(TargetParseError::Invalid(target.value.to_string()))
                }
            }
        }
    }
}

/// Targets for a day, keyed by nutrient
///
/// Deserializes from `{"calories": "2000", "protein": "120+", "fat": 70}`;
/// null and blank values are skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Option<TargetRepr>>",
    into = "BTreeMap<NutrientKey, Target>"
)]
pub struct DailyTargets {
    targets: BTreeMap<NutrientKey, Target>,
}

impl TryFrom<BTreeMap<String, Option<TargetRepr>>> for DailyTargets {
    type Error = TargetParseError;

    fn try_from(raw: BTreeMap<String, Option<TargetRepr>>) -> Result<Self, Self::Error> {
        let mut targets = DailyTargets::new();
        for (name, repr) in raw {
            let key: NutrientKey = name.parse()?;
            if let Some(target) = repr.map(TargetRepr::into_target).transpose()?.flatten() {
                targets.set(key, target);
            }
        }
        Ok(targets)
    }
}

impl From<DailyTargets> for BTreeMap<NutrientKey, Target> {
    fn from(targets: DailyTargets) -> Self {
        targets.targets
    }
}

impl DailyTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: NutrientKey) -> Option<&Target> {
        self.targets.get(&key)
    }

    pub fn set(&mut self, key: NutrientKey, target: Target) {
        self.targets.insert(key, target);
    }

    /// Builder-style setter
    pub fn with(mut self, key: NutrientKey, target: Target) -> Self {
        self.set(key, target);
        self
    }

    /// Targets in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (NutrientKey, &Target)> + '_ {
        self.targets.iter().map(|(key, target)| (*key, target))
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
