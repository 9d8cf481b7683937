//! Vendor discovery server: a thin pass-through over the remote vendor
//! API, reshaping its verbose records into the simplified schema the
//! widget renders.

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

use crate::mcp::ToolAnnotations;
use crate::mcp::envelope::ToolReply;
use crate::mcp::error::ToolError;
use crate::mcp::registry::{ToolDefinition, ToolRegistry};
use crate::mcp::schema::{FieldSpec, InputSchema, ValidatedArgs};
use crate::mcp::server::McpServer;
use crate::mcp::widget::{WidgetCatalog, WidgetSpec};
use crate::providers::vendors::{Vendor, VendorApi, upstream_error_message};

pub const SERVER_NAME: &str = "vendor-discovery";

const WIDGETS: &[WidgetSpec] = &[WidgetSpec {
    identifier: "vendors-list",
    title: "List Vendors",
    template_uri: "ui://widget/vendors-list.html",
    invoking: "Loading vendors...",
    invoked: "Vendors loaded",
    asset: "vendors-list",
}];

#[derive(Debug, Deserialize)]
struct ListVendorsInput {
    lat: f64,
    long: f64,
    page: u32,
    size: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimplifiedCuisine {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// Vendor record reshaped for the widget: readable names instead of the
/// upstream's abbreviated keys.
#[derive(Debug, Clone, Serialize)]
pub struct SimplifiedVendor {
    pub id: i64,
    pub name: String,
    pub business_name: String,
    pub rating: f64,
    pub rating_text: String,
    pub delivery_time: String,
    pub time_estimation: String,
    pub cuisines: Vec<SimplifiedCuisine>,
    pub is_talabat_pro: bool,
    pub logo: String,
    pub cover_image: String,
    pub latitude: String,
    pub longitude: String,
}

impl From<&Vendor> for SimplifiedVendor {
    fn from(vendor: &Vendor) -> Self {
        Self {
            id: vendor.id,
            name: vendor.na.clone(),
            business_name: vendor.bna.clone(),
            rating: vendor.rat,
            rating_text: vendor.rtxt.clone(),
            delivery_time: vendor.avd.clone(),
            time_estimation: vendor.time_estimation.clone(),
            cuisines: vendor
                .cus
                .iter()
                .map(|cuisine| SimplifiedCuisine {
                    id: cuisine.id,
                    name: cuisine.na.clone(),
                    slug: cuisine.sl.clone(),
                })
                .collect(),
            is_talabat_pro: vendor.is_tpro,
            logo: vendor.lg.clone(),
            cover_image: vendor.gtl.clone(),
            latitude: vendor.lat.clone(),
            longitude: vendor.lon.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct VendorsOutput {
    vendors: Vec<SimplifiedVendor>,
    total_vendors: i64,
    base_url: Option<String>,
}

fn vendors_schema() -> InputSchema {
    InputSchema::new()
        .field(
            "lat",
            FieldSpec::number("Latitude coordinate for vendor search").required(),
        )
        .field(
            "long",
            FieldSpec::number("Longitude coordinate for vendor search").required(),
        )
        .field(
            "page",
            FieldSpec::integer("Page number for pagination (default: 1)")
                .at_least(1)
                .default_value(json!(1)),
        )
        .field(
            "size",
            FieldSpec::integer("Number of results per page (default: 5)")
                .at_least(1)
                .default_value(json!(5)),
        )
}

pub fn build(assets_dir: &Path, api: Arc<dyn VendorApi>) -> Result<McpServer> {
    let widgets = WidgetCatalog::load(assets_dir, WIDGETS)?;
    let mut registry = ToolRegistry::new();

    registry.register(
        ToolDefinition {
            name: "list_vendors",
            title: "List Vendors",
            description: "List all available vendors/restaurants with filtering by location \
                          and pagination",
            schema: vendors_schema(),
            widget: widgets.get("vendors-list").cloned(),
            annotations: Some(ToolAnnotations::READ_ONLY),
        },
        move |args| {
            let api = api.clone();
            async move { list_vendors(api, args).await }
        },
    )?;

    Ok(McpServer::new(SERVER_NAME, registry, widgets))
}

async fn list_vendors(
    api: Arc<dyn VendorApi>,
    args: ValidatedArgs,
) -> Result<ToolReply, ToolError> {
    let input: ListVendorsInput = args.parse()?;

    let response = api
        .list_vendors(input.lat, input.long, input.page, input.size)
        .await?;

    let result = match response.result {
        Some(result) if !response.hasserror => result,
        _ => {
            let message = upstream_error_message(response.error.as_ref());
            return Err(ToolError::Upstream(format!("Vendor API error: {message}")));
        }
    };

    let vendors: Vec<SimplifiedVendor> =
        result.restaurants.iter().map(SimplifiedVendor::from).collect();

    let text = format!(
        "Found {} vendors ({} total available)",
        vendors.len(),
        result.total_vendors
    );
    let output = VendorsOutput {
        vendors,
        total_vendors: result.total_vendors,
        base_url: response.base_url,
    };

    Ok(ToolReply::new(text, serde_json::to_value(output)?)
        .meta_entry("location", json!({"lat": input.lat, "long": input.long}))
        .meta_entry("pagination", json!({"page": input.page, "size": input.size}))
        .meta_entry("lastSyncedAt", json!(Utc::now().to_rfc3339())))
}
