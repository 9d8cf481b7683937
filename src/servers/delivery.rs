//! Food and grocery delivery server: nearby restaurants plus quick
//! commerce items, both backed by local data providers.

use anyhow::Result;
use chrono::Utc;
use rand::Rng;
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
use crate::providers::location::area_name;
use crate::providers::products::{CategoryData, ProductData, ProductProvider};
use crate::providers::restaurants::{RestaurantData, RestaurantProvider};

pub const SERVER_NAME: &str = "delivery-ae";

const WIDGETS: &[WidgetSpec] = &[
    WidgetSpec {
        identifier: "list_nearby_restaurants",
        title: "Nearby Restaurants",
        template_uri: "ui://widget/delivery-restaurants.html",
        invoking: "Finding restaurants near you...",
        invoked: "Found nearby restaurants",
        asset: "delivery-restaurants",
    },
    WidgetSpec {
        identifier: "list_quick_delivery_items",
        title: "Quick Delivery - Grocery & Essentials",
        template_uri: "ui://widget/delivery-quick.html",
        invoking: "Loading available items...",
        invoked: "Items loaded successfully",
        asset: "delivery-quick",
    },
];

#[derive(Debug, Deserialize)]
struct RestaurantsInput {
    lat: f64,
    lng: f64,
    page: u32,
    size: u32,
    cuisine: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuickInput {
    lat: f64,
    lng: f64,
    category: Option<String>,
}

#[derive(Debug, Serialize)]
struct LocationInfo {
    lat: f64,
    lng: f64,
    area_name: String,
}

#[derive(Debug, Serialize)]
struct RestaurantsOutput {
    restaurants: Vec<RestaurantData>,
    total_count: u32,
    page: u32,
    has_more: bool,
    location: LocationInfo,
}

#[derive(Debug, Serialize)]
struct QuickOutput {
    products: Vec<ProductData>,
    categories: Vec<CategoryData>,
    total_count: usize,
    store_name: String,
    delivery_time_min: u32,
    location: LocationInfo,
}

/// Whether another page exists beyond `page`, given the provider's
/// authoritative total.
pub fn has_more(page: u32, size: u32, total_count: u32) -> bool {
    page.saturating_mul(size) < total_count
}

fn restaurants_schema() -> InputSchema {
    InputSchema::new()
        .field(
            "lat",
            FieldSpec::number("Latitude coordinate for restaurant search").required(),
        )
        .field(
            "lng",
            FieldSpec::number("Longitude coordinate for restaurant search").required(),
        )
        .field(
            "page",
            FieldSpec::integer("Page number for pagination (default: 1)")
                .at_least(1)
                .default_value(json!(1)),
        )
        .field(
            "size",
            FieldSpec::integer("Number of results per page (default: 10)")
                .at_least(1)
                .default_value(json!(10)),
        )
        .field(
            "cuisine",
            FieldSpec::string("Filter by cuisine type (optional)"),
        )
}

fn quick_schema() -> InputSchema {
    InputSchema::new()
        .field(
            "lat",
            FieldSpec::number("Latitude coordinate for store search").required(),
        )
        .field(
            "lng",
            FieldSpec::number("Longitude coordinate for store search").required(),
        )
        .field(
            "category",
            FieldSpec::string("Filter by category (optional)"),
        )
}

pub fn build(
    assets_dir: &Path,
    restaurants: Arc<dyn RestaurantProvider>,
    products: Arc<dyn ProductProvider>,
) -> Result<McpServer> {
    let widgets = WidgetCatalog::load(assets_dir, WIDGETS)?;
    let mut registry = ToolRegistry::new();

    registry.register(
        ToolDefinition {
            name: "list_nearby_restaurants",
            title: "Nearby Restaurants",
            description: "Find nearby restaurants for food delivery. Returns a list of \
                          restaurants with ratings, delivery times, cuisines, and special offers.",
            schema: restaurants_schema(),
            widget: widgets.get("list_nearby_restaurants").cloned(),
            annotations: Some(ToolAnnotations::READ_ONLY),
        },
        move |args| {
            let provider = restaurants.clone();
            async move { list_restaurants(provider, args).await }
        },
    )?;

    registry.register(
        ToolDefinition {
            name: "list_quick_delivery_items",
            title: "Quick Delivery - Grocery & Essentials",
            description: "Browse grocery and essential items for quick delivery. Filter by \
                          category to find what you need.",
            schema: quick_schema(),
            widget: widgets.get("list_quick_delivery_items").cloned(),
            annotations: Some(ToolAnnotations::READ_ONLY),
        },
        move |args| {
            let provider = products.clone();
            async move { list_quick_items(provider, args).await }
        },
    )?;

    Ok(McpServer::new(SERVER_NAME, registry, widgets))
}

async fn list_restaurants(
    provider: Arc<dyn RestaurantProvider>,
    args: ValidatedArgs,
) -> Result<ToolReply, ToolError> {
    let input: RestaurantsInput = args.parse()?;

    let restaurants = provider.restaurants(
        input.lat,
        input.lng,
        input.page,
        input.size,
        input.cuisine.as_deref(),
    );
    let area = area_name(input.lat, input.lng);
    let total_count = provider.total_count();

    let text = format!(
        "Found {} restaurants near {} ({} total available)",
        restaurants.len(),
        area,
        total_count
    );
    let output = RestaurantsOutput {
        total_count,
        page: input.page,
        has_more: has_more(input.page, input.size, total_count),
        location: LocationInfo {
            lat: input.lat,
            lng: input.lng,
            area_name: area,
        },
        restaurants,
    };

    Ok(ToolReply::new(text, serde_json::to_value(output)?)
        .meta_entry("location", json!({"lat": input.lat, "lng": input.lng}))
        .meta_entry("pagination", json!({"page": input.page, "size": input.size}))
        .meta_entry("lastSyncedAt", json!(Utc::now().to_rfc3339())))
}

async fn list_quick_items(
    provider: Arc<dyn ProductProvider>,
    args: ValidatedArgs,
) -> Result<ToolReply, ToolError> {
    let input: QuickInput = args.parse()?;

    let (products, categories) =
        provider.products(input.lat, input.lng, input.category.as_deref());
    let area = area_name(input.lat, input.lng);
    let delivery_time_min = rand::thread_rng().gen_range(10..=20);

    let text = format!(
        "Found {} items - {} min delivery to {}",
        products.len(),
        delivery_time_min,
        area
    );
    let output = QuickOutput {
        total_count: products.len(),
        store_name: "Quick Delivery".to_string(),
        delivery_time_min,
        location: LocationInfo {
            lat: input.lat,
            lng: input.lng,
            area_name: area,
        },
        products,
        categories,
    };

    Ok(ToolReply::new(text, serde_json::to_value(output)?)
        .meta_entry("location", json!({"lat": input.lat, "lng": input.lng}))
        .meta_entry("category", json!(input.category))
        .meta_entry("lastSyncedAt", json!(Utc::now().to_rfc3339())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_more_boundary() {
        // 15 * 10 == 150, not < 150
        assert!(!has_more(15, 10, 150));
        assert!(has_more(14, 10, 150));
    }

    #[test]
    fn test_has_more_does_not_overflow() {
        assert!(!has_more(u32::MAX, u32::MAX, 150));
    }
}
