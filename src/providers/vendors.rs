//! Remote vendor-discovery API client.
//!
//! The upstream wraps results in its own envelope with an embedded error
//! flag; both transport failures and embedded errors surface as typed
//! `ToolError`s, never as panics.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use url::Url;

use crate::mcp::error::ToolError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorCuisine {
    pub id: i64,
    pub na: String,
    pub sl: String,
}

/// Raw upstream vendor record. The fields this server consumes are typed;
/// every other upstream key is preserved verbatim in the passthrough bag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub id: i64,
    pub na: String,
    #[serde(default)]
    pub bna: String,
    #[serde(default)]
    pub rat: f64,
    #[serde(default)]
    pub rtxt: String,
    #[serde(default)]
    pub avd: String,
    #[serde(default)]
    pub time_estimation: String,
    #[serde(default)]
    pub cus: Vec<VendorCuisine>,
    #[serde(default)]
    pub is_tpro: bool,
    #[serde(default)]
    pub lg: String,
    #[serde(default)]
    pub gtl: String,
    #[serde(rename = "Lat", default)]
    pub lat: String,
    #[serde(rename = "Lon", default)]
    pub lon: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VendorsResult {
    pub total_vendors: i64,
    #[serde(default)]
    pub restaurants: Vec<Vendor>,
}

/// Upstream response envelope. `hasserror` set or `result` absent means
/// the call failed even when the HTTP status was 2xx.
#[derive(Debug, Clone, Deserialize)]
pub struct VendorsResponse {
    #[serde(default)]
    pub hasserror: bool,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub result: Option<VendorsResult>,
}

#[async_trait]
pub trait VendorApi: Send + Sync {
    async fn list_vendors(
        &self,
        lat: f64,
        long: f64,
        page: u32,
        size: u32,
    ) -> Result<VendorsResponse, ToolError>;
}

pub struct HttpVendorApi {
    client: Client,
    endpoint: Url,
}

impl HttpVendorApi {
    /// `endpoint` is the full vendors URL, e.g.
    /// `https://vendors.example.com/api/v3/vendors`.
    pub fn new(endpoint: &str) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            endpoint: Url::parse(endpoint)?,
        })
    }
}

#[async_trait]
impl VendorApi for HttpVendorApi {
    async fn list_vendors(
        &self,
        lat: f64,
        long: f64,
        page: u32,
        size: u32,
    ) -> Result<VendorsResponse, ToolError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("lat", &lat.to_string())
            .append_pair("lon", &long.to_string())
            .append_pair("page", &page.to_string())
            .append_pair("size", &size.to_string());

        let response = self.client.get(url).send().await?.error_for_status()?;
        response
            .json::<VendorsResponse>()
            .await
            .map_err(|e| ToolError::Upstream(format!("malformed vendor response: {e}")))
    }
}

/// Best-effort extraction of the upstream's human-readable error message.
pub fn upstream_error_message(error: Option<&Value>) -> String {
    match error {
        Some(Value::Object(map)) => map
            .get("msg")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| Value::Object(map.clone()).to_string()),
        Some(Value::String(message)) => message.clone(),
        Some(other) => other.to_string(),
        None => "Unknown error".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vendor_preserves_unknown_upstream_fields() {
        let vendor: Vendor = serde_json::from_value(json!({
            "id": 42,
            "na": "Grill House",
            "bna": "Grill House LLC",
            "rat": 4.4,
            "rtxt": "4.4",
            "avd": "30-45 min",
            "time_estimation": "35 min",
            "cus": [{"id": 1, "na": "Arabic", "sl": "arabic"}],
            "is_tpro": true,
            "lg": "logo.png",
            "gtl": "cover.png",
            "Lat": "25.2",
            "Lon": "55.3",
            "spd": {"cat": "a", "type": "b", "token": "c"},
            "finalRank": 1.5
        }))
        .unwrap();

        assert_eq!(vendor.na, "Grill House");
        assert_eq!(vendor.lat, "25.2");
        assert_eq!(vendor.extra["finalRank"], json!(1.5));
        assert_eq!(vendor.extra["spd"]["token"], "c");
    }

    #[test]
    fn test_response_tolerates_missing_optional_envelope_fields() {
        let response: VendorsResponse =
            serde_json::from_value(json!({"hasserror": true, "error": {"msg": "rate limited"}}))
                .unwrap();
        assert!(response.hasserror);
        assert!(response.result.is_none());
    }

    #[test]
    fn test_error_message_extraction_prefers_msg_field() {
        assert_eq!(
            upstream_error_message(Some(&json!({"msg": "rate limited"}))),
            "rate limited"
        );
        assert_eq!(
            upstream_error_message(Some(&json!("boom"))),
            "boom"
        );
        assert_eq!(upstream_error_message(None), "Unknown error");
    }
}
