//! Tools module
//!
//! Stateless MCP tool implementations. Each tool receives its whole input
//! and returns a serializable response or an error message.

pub mod days;
pub mod recipes;
pub mod status;
pub mod units;

use serde::de::DeserializeOwned;

/// Decode a JSON payload into a model, naming the payload in the error
pub(crate) fn parse_payload<T: DeserializeOwned>(what: &str, value: serde_json::Value) -> Result<T, String> {
    serde_json::from_value(value).map_err(|e| format!("Invalid {}: {}", what, e))
}

/// Reject quantities that cannot be scaled by
pub(crate) fn check_quantity(quantity: f64) -> Result<f64, String> {
    if quantity.is_finite() && quantity >= 0.0 {
        Ok(quantity)
    } else {
        Err(format!("Quantity must be a non-negative number, got {}", quantity))
    }
}
