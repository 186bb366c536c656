//! Unit conversion functions
//!
//! Parsing of free-form quantities and serving labels, and the multiplier
//! between two serving labels.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::units::{normalize_serving_unit, unit_info, UnitInfo};

/// Amount then unit phrase, e.g. "2 tbsp", "1 1/2 cups", "1/2 cup", "slice"
static SERVING_LABEL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+(?:\.[0-9]+)?(?:\s+[0-9]+/[0-9]+)?|[0-9]+/[0-9]+)?\s*([a-zA-Z]+(?:\s+[a-zA-Z]+)*)")
        .ok()
});

/// Longest decimal prefix of `s`, ignoring leading whitespace
///
/// Accepts an optional sign, digits with an optional fraction and an
/// optional exponent, so `"100g"` reads as 100 and `"2.5e1x"` as 25.
fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a free-form quantity: `"2"`, `"0.5"`, `"3/4"`, `"1 1/2"`
///
/// Returns `None` for blank or non-numeric input. Never panics.
pub fn parse_quantity(input: &str) -> Option<f64> {
    let cleaned = input.trim();
    if cleaned.is_empty() {
        return None;
    }

    // Mixed number: whole part plus the rest parsed recursively
    if cleaned.contains(' ') {
        let mut parts = cleaned.split_whitespace();
        let whole = parts.next().and_then(leading_float);
        let rest = parts.collect::<Vec<_>>().join(" ");
        if let (Some(whole), Some(fraction)) = (whole, parse_quantity(&rest)) {
            let sum = whole + fraction;
            if sum.is_finite() {
                return Some(sum);
            }
        }
    }

    if cleaned.contains('/') {
        let mut parts = cleaned.split('/');
        let numerator = parts.next().and_then(leading_float);
        let denominator = parts.next().and_then(leading_float);
        if let (Some(numerator), Some(denominator)) = (numerator, denominator) {
            if denominator != 0.0 {
                return Some(numerator / denominator);
            }
        }
    }

    leading_float(cleaned)
}

/// A serving label split into amount and canonical unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedServingLabel {
    pub amount: f64,
    pub unit: String,
}

impl ParsedServingLabel {
    /// Table entry for the unit, if it is a mass or volume unit
    pub fn unit_info(&self) -> Option<UnitInfo> {
        unit_info(&self.unit)
    }

    /// Amount expressed in grams or millilitres
    pub fn base_amount(&self) -> Option<f64> {
        self.unit_info().map(|info| self.amount * info.factor)
    }
}

/// Parse a serving label such as `"2 tbsp"`, `"1/2 cup (120ml)"` or `"slice"`
///
/// Anything after the first `(` is ignored. A missing amount means 1.
/// Labels without a unit word, or whose amount parses to zero, yield `None`.
pub fn parse_serving_label(text: &str) -> Option<ParsedServingLabel> {
    let head = text.split('(').next().unwrap_or_default().trim();
    if head.is_empty() {
        return None;
    }

    let pattern = SERVING_LABEL.as_ref()?;
    let captures = pattern.captures(head)?;
    let amount_text = captures.get(1).map_or("1", |m| m.as_str());
    let amount = parse_quantity(amount_text).filter(|a| *a != 0.0)?;
    let unit = normalize_serving_unit(captures.get(2)?.as_str())?;

    Some(ParsedServingLabel { amount, unit })
}

/// Multiplier that turns a quantity of `from` labels into `to` labels
///
/// `unit_multiplier("g", "100g")` is 0.01: one gram is a hundredth of the
/// "100g" serving. Returns `None` when the labels are incompatible (different
/// measurement systems, or distinct opaque units).
pub fn unit_multiplier(from: &str, to: &str) -> Option<f64> {
    if from.is_empty() || to.is_empty() {
        return None;
    }

    let (from_parsed, to_parsed) = match (parse_serving_label(from), parse_serving_label(to)) {
        (Some(from_parsed), Some(to_parsed)) => (from_parsed, to_parsed),
        _ => {
            let from_raw = from.trim().to_lowercase();
            let to_raw = to.trim().to_lowercase();
            return (!from_raw.is_empty() && from_raw == to_raw).then_some(1.0);
        }
    };

    if from_parsed.unit == to_parsed.unit {
        return Some(from_parsed.amount / to_parsed.amount);
    }

    let from_info = from_parsed.unit_info()?;
    let to_info = to_parsed.unit_info()?;
    if from_info.system != to_info.system {
        return None;
    }

    let from_base = from_parsed.amount * from_info.factor;
    let to_base = to_parsed.amount * to_info.factor;
    if !from_base.is_finite() || !to_base.is_finite() || to_base == 0.0 {
        return None;
    }
    Some(from_base / to_base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn test_leading_float() {
        assert_eq!(leading_float("100g"), Some(100.0));
        assert_eq!(leading_float("  2.5 cups"), Some(2.5));
        assert_eq!(leading_float(".5"), Some(0.5));
        assert_eq!(leading_float("3."), Some(3.0));
        assert_eq!(leading_float("-4x"), Some(-4.0));
        assert_eq!(leading_float("2.5e1x"), Some(25.0));
        assert_eq!(leading_float("7e"), Some(7.0));
        assert_eq!(leading_float("abc"), None);
        assert_eq!(leading_float("."), None);
        assert_eq!(leading_float("-"), None);
        assert_eq!(leading_float(""), None);
    }

    #[test]
    fn test_parse_quantity_basic() {
        assert_eq!(parse_quantity("2"), Some(2.0));
        assert_eq!(parse_quantity(" 0.5 "), Some(0.5));
        assert_eq!(parse_quantity("3/4"), Some(0.75));
        assert_eq!(parse_quantity("1 1/2"), Some(1.5));
        assert_eq!(parse_quantity("2 3/4"), Some(2.75));
    }

    #[test]
    fn test_parse_quantity_invalid() {
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("   "), None);
        assert_eq!(parse_quantity("abc"), None);
        assert_eq!(parse_quantity("/"), None);
    }

    #[test]
    fn test_parse_quantity_prefix_semantics() {
        // zero denominator falls through to the leading number
        assert_eq!(parse_quantity("1/0"), Some(1.0));
        assert_eq!(parse_quantity("100g"), Some(100.0));
        // the rest of a mixed number must parse for the sum to apply
        assert_eq!(parse_quantity("2 cups"), Some(2.0));
    }

    #[test]
    fn test_parse_serving_label() {
        let label = parse_serving_label("2 tbsp").unwrap();
        assert_eq!(label.amount, 2.0);
        assert_eq!(label.unit, "tbsp");

        let label = parse_serving_label("cup").unwrap();
        assert_eq!(label.amount, 1.0);
        assert_eq!(label.unit, "cup");

        let label = parse_serving_label("100g").unwrap();
        assert_eq!(label.amount, 100.0);
        assert_eq!(label.unit, "g");
    }

    #[test]
    fn test_parse_serving_label_fractions_and_parens() {
        let label = parse_serving_label("1/2 cup (120ml)").unwrap();
        assert_eq!(label.amount, 0.5);
        assert_eq!(label.unit, "cup");

        let label = parse_serving_label("1 1/2 Cups").unwrap();
        assert_eq!(label.amount, 1.5);
        assert_eq!(label.unit, "cup");

        let label = parse_serving_label("2 Fluid Ounces").unwrap();
        assert_eq!(label.unit, "fl oz");

        let label = parse_serving_label("1 large egg").unwrap();
        assert_eq!(label.unit, "large egg");
    }

    #[test]
    fn test_parse_serving_label_rejects() {
        assert_eq!(parse_serving_label(""), None);
        assert_eq!(parse_serving_label("(30g)"), None);
        assert_eq!(parse_serving_label("100"), None);
        assert_eq!(parse_serving_label("0 g"), None);
        assert_eq!(parse_serving_label("- cup"), None);
    }

    #[test]
    fn test_base_amount() {
        let label = parse_serving_label("2 tbsp").unwrap();
        assert!(approx(label.base_amount().unwrap(), 29.5735295625));
        assert_eq!(parse_serving_label("slice").unwrap().base_amount(), None);
    }

    #[test]
    fn test_multiplier_same_unit() {
        assert!(approx(unit_multiplier("g", "100g").unwrap(), 0.01));
        assert!(approx(unit_multiplier("100g", "g").unwrap(), 100.0));
        assert_eq!(unit_multiplier("serving", "serving"), Some(1.0));
        assert_eq!(unit_multiplier("2 servings", "serving"), Some(2.0));
        assert_eq!(unit_multiplier("scoop", "scoop"), Some(1.0));
    }

    #[test]
    fn test_multiplier_across_units() {
        assert!(approx(unit_multiplier("mg", "g").unwrap(), 0.001));
        assert!(approx(unit_multiplier("ml", "l").unwrap(), 0.001));
        assert!(approx(unit_multiplier("1 cup", "tbsp").unwrap(), 240.0 / 14.78676478125));
        assert!(approx(unit_multiplier("1 oz", "100g").unwrap(), 0.28349523125));
    }

    #[test]
    fn test_multiplier_incompatible() {
        assert_eq!(unit_multiplier("serving", "g"), None);
        assert_eq!(unit_multiplier("scoop", "g"), None);
        assert_eq!(unit_multiplier("cup", "g"), None);
        assert_eq!(unit_multiplier("", "g"), None);
        assert_eq!(unit_multiplier("g", ""), None);
    }

    #[test]
    fn test_multiplier_unparseable_labels_compare_raw() {
        assert_eq!(unit_multiplier("(each)", " (EACH) "), Some(1.0));
        assert_eq!(unit_multiplier("(each)", "(pc)"), None);
        assert_eq!(unit_multiplier("   ", "   "), None);
    }

    #[test]
    fn test_mass_round_trip() {
        let units = ["mcg", "mg", "g", "kg", "oz", "lb", "100g", "2 oz"];
        for a in units {
            for b in units {
                let there = unit_multiplier(a, b).unwrap();
                let back = unit_multiplier(b, a).unwrap();
                assert!(approx(there * back, 1.0), "{} <-> {}", a, b);
            }
        }
    }
}
