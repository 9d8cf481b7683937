use std::env;
use std::path::PathBuf;

pub const DEFAULT_VENDOR_API_URL: &str = "https://vendors.talabat.com/api/v3/vendors";
pub const DEFAULT_IDEATE_API_URL: &str = "http://localhost:5055";

/// Process configuration, resolved once at startup from the environment
/// and handed to the server builders by reference.
#[derive(Debug, Clone)]
pub struct Config {
    pub vendor_api_url: String,
    pub ideate_api_url: String,
    pub assets_dir: PathBuf,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            vendor_api_url: env::var("VENDOR_API_URL")
                .unwrap_or_else(|_| DEFAULT_VENDOR_API_URL.to_string()),
            ideate_api_url: env::var("IDEATE_API_URL")
                .unwrap_or_else(|_| DEFAULT_IDEATE_API_URL.to_string()),
            assets_dir: env::var("SOUK_ASSETS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./assets")),
            port: env::var("PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(8000),
        }
    }
}
