//! Property search server backed by the in-process listing generator.

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::path::Path;

use crate::mcp::ToolAnnotations;
use crate::mcp::envelope::ToolReply;
use crate::mcp::error::ToolError;
use crate::mcp::registry::{ToolDefinition, ToolRegistry};
use crate::mcp::schema::{FieldSpec, InputSchema, ValidatedArgs};
use crate::mcp::server::McpServer;
use crate::mcp::widget::{WidgetCatalog, WidgetSpec};
use crate::providers::properties::{
    FilterOption, PropertyData, PropertyFilters, available_locations, search,
};

pub const SERVER_NAME: &str = "property-finder";

const WIDGETS: &[WidgetSpec] = &[WidgetSpec {
    identifier: "search_properties",
    title: "Property Finder - Search Properties",
    template_uri: "ui://widget/property-finder.html",
    invoking: "Searching for properties...",
    invoked: "Found properties",
    asset: "property-finder",
}];

#[derive(Debug, Deserialize)]
struct SearchInput {
    purpose: Option<String>,
    location: Option<String>,
    property_type: Option<String>,
    bedrooms: Option<u32>,
    min_price: Option<f64>,
    max_price: Option<f64>,
}

#[derive(Debug, Serialize)]
struct SearchOutput {
    properties: Vec<PropertyData>,
    total_count: usize,
    filters_applied: Map<String, Value>,
    available_locations: Vec<FilterOption>,
}

fn search_schema() -> InputSchema {
    InputSchema::new()
        .field(
            "purpose",
            FieldSpec::one_of(
                "Property purpose: 'rent' for rental properties or 'buy' for properties for \
                 sale. If not specified, returns both.",
                &["rent", "buy"],
            ),
        )
        .field(
            "location",
            FieldSpec::string(
                "Dubai area name (e.g., 'Dubai Marina', 'Downtown Dubai', 'JBR', \
                 'Palm Jumeirah', 'Dubai South', 'Business Bay')",
            ),
        )
        .field(
            "property_type",
            FieldSpec::one_of(
                "Property type: 'apartment', 'villa', 'townhouse', or 'commercial'",
                &["apartment", "villa", "townhouse", "commercial"],
            ),
        )
        .field(
            "bedrooms",
            FieldSpec::integer("Number of bedrooms (1-5)").bounds(1, 5),
        )
        .field("min_price", FieldSpec::number("Minimum price in AED"))
        .field("max_price", FieldSpec::number("Maximum price in AED"))
}

pub fn build(assets_dir: &Path) -> Result<McpServer> {
    let widgets = WidgetCatalog::load(assets_dir, WIDGETS)?;
    let mut registry = ToolRegistry::new();

    registry.register(
        ToolDefinition {
            name: "search_properties",
            title: "Property Finder - Search Properties",
            description: "Search for properties in Dubai for rent or sale. Filter by location \
                          (Dubai Marina, Downtown Dubai, JBR, Palm Jumeirah, Dubai South, \
                          Business Bay, etc.), property type (apartment, villa, townhouse, \
                          commercial), number of bedrooms, and price range.",
            schema: search_schema(),
            widget: widgets.get("search_properties").cloned(),
            annotations: Some(ToolAnnotations::READ_ONLY),
        },
        |args| async move { search_properties(args).await },
    )?;

    Ok(McpServer::new(SERVER_NAME, registry, widgets))
}

async fn search_properties(args: ValidatedArgs) -> Result<ToolReply, ToolError> {
    let input: SearchInput = args.parse()?;

    let filters = PropertyFilters {
        purpose: input.purpose.clone(),
        location: input.location.clone(),
        property_type: input.property_type.clone(),
        bedrooms: input.bedrooms,
        min_price: input.min_price,
        max_price: input.max_price,
    };
    let properties = search(&filters);

    let mut filters_applied = Map::new();
    if let Some(purpose) = &input.purpose {
        filters_applied.insert("purpose".to_string(), json!(purpose));
    }
    if let Some(location) = &input.location {
        filters_applied.insert("location".to_string(), json!(location));
    }
    if let Some(property_type) = &input.property_type {
        filters_applied.insert("property_type".to_string(), json!(property_type));
    }
    if let Some(bedrooms) = input.bedrooms {
        filters_applied.insert("bedrooms".to_string(), json!(bedrooms));
    }

    let purpose_text = match input.purpose.as_deref() {
        Some("rent") => "rental",
        Some(_) => "for sale",
        None => "for rent and sale",
    };
    let location_text = input
        .location
        .as_deref()
        .map(|location| format!(" in {location}"))
        .unwrap_or_else(|| " in Dubai".to_string());
    let type_text = input
        .property_type
        .as_deref()
        .map(|property_type| format!(" {property_type}s"))
        .unwrap_or_else(|| " properties".to_string());

    let text = format!(
        "Found {}{} {}{}",
        properties.len(),
        type_text,
        purpose_text,
        location_text
    );
    let output = SearchOutput {
        total_count: properties.len(),
        filters_applied: filters_applied.clone(),
        available_locations: available_locations(),
        properties,
    };

    Ok(ToolReply::new(text, serde_json::to_value(output)?)
        .meta_entry("filters", Value::Object(filters_applied))
        .meta_entry("lastSyncedAt", json!(Utc::now().to_rfc3339())))
}
