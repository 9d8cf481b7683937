//! The four tool servers, each a thin composition of schemas, handlers
//! and widgets over the shared protocol adapter.

pub mod delivery;
pub mod ideas;
pub mod properties;
pub mod vendors;

use anyhow::{Result, bail};
use std::str::FromStr;
use std::sync::Arc;

use crate::config::Config;
use crate::mcp::server::McpServer;
use crate::providers::ideate::HttpIdeateApi;
use crate::providers::products::MockProductProvider;
use crate::providers::restaurants::MockRestaurantProvider;
use crate::providers::vendors::HttpVendorApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerKind {
    Delivery,
    Vendors,
    Properties,
    Ideas,
}

impl FromStr for ServerKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "delivery" => Ok(Self::Delivery),
            "vendors" => Ok(Self::Vendors),
            "properties" => Ok(Self::Properties),
            "ideas" => Ok(Self::Ideas),
            other => bail!(
                "unknown server '{other}' (expected delivery, vendors, properties, or ideas)"
            ),
        }
    }
}

impl ServerKind {
    /// Construct the chosen server. Providers are built here and passed
    /// in explicitly; nothing is reached through globals.
    pub fn build(self, config: &Config) -> Result<McpServer> {
        match self {
            Self::Delivery => delivery::build(
                &config.assets_dir,
                Arc::new(MockRestaurantProvider::new()),
                Arc::new(MockProductProvider::new()),
            ),
            Self::Vendors => vendors::build(
                &config.assets_dir,
                Arc::new(HttpVendorApi::new(&config.vendor_api_url)?),
            ),
            Self::Properties => properties::build(&config.assets_dir),
            Self::Ideas => ideas::build(
                &config.assets_dir,
                Arc::new(HttpIdeateApi::new(&config.ideate_api_url)?),
            ),
        }
    }
}
