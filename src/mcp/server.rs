//! Scrapless MCP Server Implementation
//!
//! Implements the MCP server with all Scrapless tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::tools::status::StatusTracker;
use crate::tools::{conversions, pantry, today, waste};

/// Scrapless MCP Service
#[derive(Clone)]
pub struct ScraplessService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<ScraplessService>,
}

impl ScraplessService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

/// Serialize a tool response as pretty JSON
fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Report an invalid request back to the caller
fn invalid(message: String) -> McpError {
    McpError::invalid_params(message, None)
}

// ============================================================================
// Conversion Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NormalizeQuantityParams {
    /// Item name, e.g. "garlic" or "jasmine rice"
    pub item_name: String,
    /// Numeric quantity
    pub quantity: f64,
    /// Unit, e.g. "cups", "kg", "bulb"
    pub unit: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DenormalizeQuantityParams {
    /// Item name
    pub item_name: String,
    /// Quantity in the base unit
    pub quantity: f64,
    /// Base unit: g, ml, piece, clove or leaf
    pub base_unit: String,
    /// Unit to express the quantity in
    pub target_unit: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertQuantityParams {
    /// Item name
    pub item_name: String,
    /// Quantity in from_unit
    pub quantity: f64,
    /// Unit the quantity is given in
    pub from_unit: String,
    /// Unit to convert into (same kind: mass, volume or count)
    pub to_unit: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupImpactParams {
    /// Item name, matched case-insensitively against food keywords
    pub item_name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EstimateImpactParams {
    /// Item name
    pub item_name: String,
    /// Amount with unit, e.g. "2 kg", "1 1/2 cups", "3"
    pub amount: String,
}

// ============================================================================
// Waste Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogWasteParams {
    /// Item name
    pub item_name: String,
    /// Amount with unit, e.g. "2 kg", "1 1/2 cups", "3"
    pub amount: String,
    /// Reason: spoiled, leftover, expired, overcooked, other (default other)
    pub reason: Option<String>,
    /// Date wasted, YYYY-MM-DD (defaults to today)
    pub wasted_on: Option<String>,
    /// Optional notes
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WasteEntryIdParams {
    /// Waste entry ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListWasteEntriesParams {
    /// Start date, YYYY-MM-DD (inclusive, optional)
    pub start_date: Option<String>,
    /// End date, YYYY-MM-DD (inclusive, optional)
    pub end_date: Option<String>,
    /// Maximum results (default 50, max 200)
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    /// Offset for pagination (default 0)
    #[serde(default)]
    pub offset: i64,
}

fn default_list_limit() -> i64 { 50 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WasteSummaryParams {
    /// Start date, YYYY-MM-DD (inclusive, optional)
    pub start_date: Option<String>,
    /// End date, YYYY-MM-DD (inclusive, optional)
    pub end_date: Option<String>,
    /// Number of top items to include (default 5)
    #[serde(default = "default_top_n")]
    pub top_n: i64,
}

fn default_top_n() -> i64 { 5 }

// ============================================================================
// Pantry Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddPantryItemParams {
    /// Item name
    pub item_name: String,
    /// Amount with unit, e.g. "5 kg", "1 dozen", "2"
    pub amount: String,
    /// Date stored, YYYY-MM-DD (defaults to today)
    pub stored_on: Option<String>,
    /// Expiration date, YYYY-MM-DD (predicted from shelf life when omitted)
    pub expires_on: Option<String>,
    /// Optional notes
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PantryItemIdParams {
    /// Pantry item ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListPantryItemsParams {
    /// Filter by item name (optional)
    pub query: Option<String>,
    /// Maximum results (default 50, max 200)
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    /// Offset for pagination (default 0)
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListExpiringPantryItemsParams {
    /// Days ahead to look (default 3); expired items are always included
    #[serde(default = "default_within_days")]
    pub within_days: i64,
}

fn default_within_days() -> i64 { 3 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConsumePantryItemParams {
    /// Pantry item ID
    pub id: i64,
    /// Amount used, in any unit of the same kind, e.g. "500 g"
    pub amount: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DiscardPantryItemParams {
    /// Pantry item ID
    pub id: i64,
    /// Reason (defaults to expired when past expiry, otherwise other)
    pub reason: Option<String>,
    /// Optional notes for the waste entry
    pub notes: Option<String>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl ScraplessService {
    // --- Status ---

    #[tool(description = "Get the current status of the Scrapless service including build info, database status, and process information")]
    async fn scrapless_status(&self) -> Result<CallToolResult, McpError> {
        let mut tracker = self.status_tracker.lock().await;
        json_result(&tracker.get_status(&self.database))
    }

    #[tool(description = "Get instructions for logging waste and pantry items, including accepted amount formats and units. Call this before the first logging call in a session.")]
    fn waste_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::WASTE_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(WASTE_INSTRUCTIONS)]))
    }

    // --- Conversions ---

    #[tool(description = "Convert a quantity and unit into the item's base unit (g, ml, piece, clove or leaf)")]
    fn normalize_quantity(&self, Parameters(p): Parameters<NormalizeQuantityParams>) -> Result<CallToolResult, McpError> {
        let result = conversions::normalize_quantity(&p.item_name, p.quantity, &p.unit).map_err(invalid)?;
        json_result(&result)
    }

    #[tool(description = "Convert a base-unit quantity (g, ml, piece, clove, leaf) into a display unit")]
    fn denormalize_quantity(&self, Parameters(p): Parameters<DenormalizeQuantityParams>) -> Result<CallToolResult, McpError> {
        let result = conversions::denormalize_quantity(&p.item_name, p.quantity, &p.base_unit, &p.target_unit)
            .map_err(invalid)?;
        json_result(&result)
    }

    #[tool(description = "Convert a quantity between two units of the same kind, e.g. cups to tbsp or lb to kg")]
    fn convert_quantity(&self, Parameters(p): Parameters<ConvertQuantityParams>) -> Result<CallToolResult, McpError> {
        let result = conversions::convert_quantity(&p.item_name, p.quantity, &p.from_unit, &p.to_unit)
            .map_err(invalid)?;
        json_result(&result)
    }

    #[tool(description = "Look up per-portion value (PHP), carbon footprint (kg CO2e) and shelf life for an item. Never fails; unmatched items get defaults.")]
    fn lookup_impact(&self, Parameters(p): Parameters<LookupImpactParams>) -> Result<CallToolResult, McpError> {
        json_result(&conversions::lookup_impact(&p.item_name))
    }

    #[tool(description = "Estimate the total value, carbon footprint and predicted expiry for an amount of an item")]
    fn estimate_impact(&self, Parameters(p): Parameters<EstimateImpactParams>) -> Result<CallToolResult, McpError> {
        let result = conversions::estimate_impact(&p.item_name, &p.amount, today()).map_err(invalid)?;
        json_result(&result)
    }

    // --- Waste ---

    #[tool(description = "Log wasted food. Value and carbon are estimated from the amount.")]
    fn log_waste(&self, Parameters(p): Parameters<LogWasteParams>) -> Result<CallToolResult, McpError> {
        let result = waste::log_waste(
            &self.database,
            &p.item_name,
            &p.amount,
            p.reason.as_deref(),
            p.wasted_on.as_deref(),
            p.notes,
            today(),
        )
        .map_err(invalid)?;
        json_result(&result)
    }

    #[tool(description = "Get a waste entry by ID")]
    fn get_waste_entry(&self, Parameters(p): Parameters<WasteEntryIdParams>) -> Result<CallToolResult, McpError> {
        let result = waste::get_waste_entry(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(entry) => json_result(&entry),
            None => json_result(&serde_json::json!({ "error": "Waste entry not found", "id": p.id })),
        }
    }

    #[tool(description = "List waste entries, newest first, with optional date range and pagination")]
    fn list_waste_entries(&self, Parameters(p): Parameters<ListWasteEntriesParams>) -> Result<CallToolResult, McpError> {
        let result = waste::list_waste_entries(
            &self.database,
            p.start_date.as_deref(),
            p.end_date.as_deref(),
            p.limit,
            p.offset,
        )
        .map_err(invalid)?;
        json_result(&result)
    }

    #[tool(description = "Delete a waste entry")]
    fn delete_waste_entry(&self, Parameters(p): Parameters<WasteEntryIdParams>) -> Result<CallToolResult, McpError> {
        let result = waste::delete_waste_entry(&self.database, p.id).map_err(invalid)?;
        json_result(&result)
    }

    #[tool(description = "Summarize wasted value and carbon over a date range, grouped by reason, with the most costly items")]
    fn waste_summary(&self, Parameters(p): Parameters<WasteSummaryParams>) -> Result<CallToolResult, McpError> {
        let result = waste::waste_summary(&self.database, p.start_date.as_deref(), p.end_date.as_deref(), p.top_n)
            .map_err(invalid)?;
        json_result(&result)
    }

    // --- Pantry ---

    #[tool(description = "Add a pantry item. Expiry is predicted from the item's shelf life unless given.")]
    fn add_pantry_item(&self, Parameters(p): Parameters<AddPantryItemParams>) -> Result<CallToolResult, McpError> {
        let result = pantry::add_pantry_item(
            &self.database,
            &p.item_name,
            &p.amount,
            p.stored_on.as_deref(),
            p.expires_on.as_deref(),
            p.notes,
            today(),
        )
        .map_err(invalid)?;
        json_result(&result)
    }

    #[tool(description = "Get a pantry item by ID, including days until expiry")]
    fn get_pantry_item(&self, Parameters(p): Parameters<PantryItemIdParams>) -> Result<CallToolResult, McpError> {
        let result = pantry::get_pantry_item(&self.database, p.id, today())
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(item) => json_result(&item),
            None => json_result(&serde_json::json!({ "error": "Pantry item not found", "id": p.id })),
        }
    }

    #[tool(description = "List pantry items, soonest expiry first, with optional name filter and pagination")]
    fn list_pantry_items(&self, Parameters(p): Parameters<ListPantryItemsParams>) -> Result<CallToolResult, McpError> {
        let result = pantry::list_pantry_items(&self.database, p.query.as_deref(), p.limit, p.offset, today())
            .map_err(invalid)?;
        json_result(&result)
    }

    #[tool(description = "List pantry items expiring within the given number of days (expired items included), with the value at risk")]
    fn list_expiring_pantry_items(&self, Parameters(p): Parameters<ListExpiringPantryItemsParams>) -> Result<CallToolResult, McpError> {
        let result = pantry::list_expiring_pantry_items(&self.database, p.within_days, today())
            .map_err(invalid)?;
        json_result(&result)
    }

    #[tool(description = "Use up part of a pantry item. The amount may be in any unit of the same kind; the item is removed when nothing is left.")]
    fn consume_pantry_item(&self, Parameters(p): Parameters<ConsumePantryItemParams>) -> Result<CallToolResult, McpError> {
        let result = pantry::consume_pantry_item(&self.database, p.id, &p.amount).map_err(invalid)?;
        json_result(&result)
    }

    #[tool(description = "Move a pantry item into the waste log")]
    fn discard_pantry_item(&self, Parameters(p): Parameters<DiscardPantryItemParams>) -> Result<CallToolResult, McpError> {
        let result = pantry::discard_pantry_item(&self.database, p.id, p.reason.as_deref(), p.notes, today())
            .map_err(invalid)?;
        json_result(&result)
    }

    #[tool(description = "Delete a pantry item without logging it as waste")]
    fn delete_pantry_item(&self, Parameters(p): Parameters<PantryItemIdParams>) -> Result<CallToolResult, McpError> {
        let result = pantry::delete_pantry_item(&self.database, p.id).map_err(invalid)?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for ScraplessService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "scrapless".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Scrapless".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Scrapless - food waste and pantry valuation. \
                 IMPORTANT: Call waste_instructions before logging. \
                 Units: normalize_quantity/denormalize_quantity/convert_quantity. \
                 Impact: lookup_impact/estimate_impact. \
                 Waste: log_waste/get_waste_entry/list_waste_entries/delete_waste_entry, waste_summary. \
                 Pantry: add/get/list/delete_pantry_item, list_expiring_pantry_items, \
                 consume_pantry_item, discard_pantry_item (moves to waste)."
                    .into(),
            ),
        }
    }
}
