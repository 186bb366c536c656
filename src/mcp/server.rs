//! macrotrack MCP Server Implementation
//!
//! Exposes the unit and nutrition engine as stateless MCP tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::tools::days;
use crate::tools::recipes;
use crate::tools::status::StatusTracker;
use crate::tools::units;

/// macrotrack MCP Service
#[derive(Clone)]
pub struct MacrotrackService {
    status_tracker: Arc<StatusTracker>,
    config: Arc<Config>,
    tool_router: ToolRouter<MacrotrackService>,
}

impl MacrotrackService {
    pub fn new(config: Config) -> Self {
        Self {
            status_tracker: Arc::new(StatusTracker::new(&config)),
            config: Arc::new(config),
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Unit Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ParseServingLabelParams {
    /// Serving label such as "2 tbsp", "1 1/2 cups" or "1 slice (28g)"
    pub label: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertUnitsParams {
    /// Label the quantity is entered in (e.g. "g", "2 tbsp")
    pub from: String,
    /// Label to express the quantity in (e.g. "100g", "cup")
    pub to: String,
    /// Quantity of `from` labels (defaults to 1)
    pub quantity: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertNutrientAmountParams {
    /// Amount to convert
    pub value: f64,
    /// Source unit: mcg, µg, mg, g, kg, oz, lb, kcal or kJ
    pub from_unit: String,
    /// Target unit
    pub to_unit: String,
}

// ============================================================================
// Item and Recipe Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateItemNutritionParams {
    /// Ingredient or food: {"name", "unit" (native serving, e.g. "100g"), "kind"?, and nutrient
    /// amounts per native unit keyed calories, protein, carbs, fat, saturatedFat, sodiumMg, ...}
    pub item: serde_json::Value,
    /// Quantity consumed
    pub quantity: f64,
    /// Unit of the quantity (defaults to the item's native unit)
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateRecipeNutritionParams {
    /// Recipe: {"name", "servings", "items": [{"ingredient": {...item...}, "quantity", "unit"?}]}
    pub recipe: serde_json::Value,
}

// ============================================================================
// Day Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SummarizeDayParams {
    /// Day to summarize (YYYY-MM-DD)
    pub date: String,
    /// Log entries: {"ingredient"|"food"|"recipe": {...}, "quantity", "unit"?, "intakeDate"?, "consumedAt"?}
    #[serde(default)]
    pub entries: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PreviewLogImpactParams {
    /// Day the entry would be logged on (YYYY-MM-DD)
    pub date: String,
    /// Entries already logged, same shape as summarize_day
    #[serde(default)]
    pub entries: Vec<serde_json::Value>,
    /// Entry to preview, same shape as a log entry
    pub pending: serde_json::Value,
    /// Targets keyed by nutrient, e.g. {"calories": "2000", "protein": "120+"}.
    /// Defaults to the configured targets.
    pub targets: Option<serde_json::Value>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl MacrotrackService {
    // --- Status ---

    #[tool(description = "Get the current status of the macrotrack service including build info, configured default targets, and process information")]
    fn macrotrack_status(&self) -> Result<CallToolResult, McpError> {
        to_json(&self.status_tracker.get_status())
    }

    // --- Units ---

    #[tool(description = "Parse a serving label like '2 tbsp' or '1 1/2 cups' into amount and canonical unit, with its measurement system")]
    fn parse_serving_label(&self, Parameters(p): Parameters<ParseServingLabelParams>) -> Result<CallToolResult, McpError> {
        let result = units::parse_serving_label(&p.label).map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Convert a quantity between two serving labels (e.g. 50 of 'g' into '100g' servings). Reports when the units are incompatible.")]
    fn convert_units(&self, Parameters(p): Parameters<ConvertUnitsParams>) -> Result<CallToolResult, McpError> {
        let result = units::convert_units(&p.from, &p.to, p.quantity).map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Convert a nutrient amount between mass units (mcg, mg, g, kg, oz, lb) or between kcal and kJ")]
    fn convert_nutrient_amount(&self, Parameters(p): Parameters<ConvertNutrientAmountParams>) -> Result<CallToolResult, McpError> {
        let result = units::convert_nutrient_amount(p.value, &p.from_unit, &p.to_unit)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List the tracked nutrients with their keys, labels, and display units")]
    fn nutrient_catalog(&self) -> Result<CallToolResult, McpError> {
        to_json(&units::nutrient_catalog())
    }

    // --- Items and Recipes ---

    #[tool(description = "Calculate nutrition for a quantity of an ingredient or food, converting the unit to the item's native serving")]
    fn calculate_item_nutrition(&self, Parameters(p): Parameters<CalculateItemNutritionParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::calculate_item_nutrition(p.item, p.quantity, p.unit)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Calculate total and per-serving nutrition for a recipe. Per-serving divides by the servings rounded to a whole number (at least 1).")]
    fn calculate_recipe_nutrition(&self, Parameters(p): Parameters<CalculateRecipeNutritionParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::calculate_recipe_nutrition(p.recipe).map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    // --- Days ---

    #[tool(description = "Summarize a day's nutrition from log entries. Entries belong to a day by intakeDate, or by the local date of consumedAt.")]
    fn summarize_day(&self, Parameters(p): Parameters<SummarizeDayParams>) -> Result<CallToolResult, McpError> {
        let result = days::summarize_day(&p.date, p.entries).map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Preview how logging an entry would change a day's totals, flagging nutrients that would exceed their targets")]
    fn preview_log_impact(&self, Parameters(p): Parameters<PreviewLogImpactParams>) -> Result<CallToolResult, McpError> {
        let result = days::preview_log_impact(&p.date, p.entries, p.pending, p.targets, &self.config.default_targets)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for MacrotrackService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "macrotrack".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("macrotrack nutrition engine".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "macrotrack - serving-unit normalization and nutrition aggregation. \
                 All tools are stateless: pass items, recipes, and log entries in full. \
                 Units: parse_serving_label, convert_units, convert_nutrient_amount, nutrient_catalog. \
                 Nutrition: calculate_item_nutrition, calculate_recipe_nutrition. \
                 Days: summarize_day, preview_log_impact (targets like \"2000\" cap a nutrient, \"2000+\" allow going over). \
                 Nutrient keys are camelCase: calories, protein, carbs, fat, saturatedFat, transFat, cholesterolMg, \
                 sodiumMg, dietaryFiber, totalSugars, addedSugars, vitaminDMcg, calciumMg, ironMg, potassiumMg."
                    .into(),
            ),
        }
    }
}
