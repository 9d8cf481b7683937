//! Remote idea-tracker API client: plain JSON CRUD over HTTP.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use url::Url;

use crate::mcp::error::ToolError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub text: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Idea {
    pub id: String,
    pub title: String,
    pub description: String,
    pub urgency: i64,
    pub archived: bool,
    pub created_date: String,
    pub updated_date: String,
    #[serde(default)]
    pub notes: Vec<Note>,
}

/// Partial update; only the populated fields are sent upstream. `notes`
/// entries are appended by the backend, not replaced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IdeaPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
}

#[async_trait]
pub trait IdeateApi: Send + Sync {
    async fn create_idea(
        &self,
        title: &str,
        description: &str,
        urgency: i64,
    ) -> Result<Idea, ToolError>;
    async fn get_idea(&self, id: &str) -> Result<Idea, ToolError>;
    async fn list_ideas(
        &self,
        include_archived: bool,
        archived_only: bool,
    ) -> Result<Vec<Idea>, ToolError>;
    async fn update_idea(&self, id: &str, patch: &IdeaPatch) -> Result<Idea, ToolError>;
    async fn archive_idea(&self, id: &str) -> Result<(), ToolError>;
    async fn restore_idea(&self, id: &str) -> Result<(), ToolError>;
    async fn delete_idea(&self, id: &str) -> Result<(), ToolError>;
}

pub struct HttpIdeateApi {
    client: Client,
    base_url: Url,
}

impl HttpIdeateApi {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ToolError> {
        self.base_url
            .join(path)
            .map_err(|e| ToolError::Internal(anyhow::anyhow!("invalid endpoint path {path}: {e}")))
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ToolError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ToolError::Upstream(format!("malformed idea-tracker response: {e}")))
}

#[async_trait]
impl IdeateApi for HttpIdeateApi {
    async fn create_idea(
        &self,
        title: &str,
        description: &str,
        urgency: i64,
    ) -> Result<Idea, ToolError> {
        let response = self
            .client
            .post(self.endpoint("ideas")?)
            .json(&json!({
                "title": title,
                "description": description,
                "urgency": urgency,
            }))
            .send()
            .await?
            .error_for_status()?;
        decode(response).await
    }

    async fn get_idea(&self, id: &str) -> Result<Idea, ToolError> {
        let response = self
            .client
            .get(self.endpoint(&format!("ideas/{id}"))?)
            .send()
            .await?
            .error_for_status()?;
        decode(response).await
    }

    async fn list_ideas(
        &self,
        include_archived: bool,
        archived_only: bool,
    ) -> Result<Vec<Idea>, ToolError> {
        let mut url = self.endpoint("ideas")?;
        {
            let mut query = url.query_pairs_mut();
            if include_archived {
                query.append_pair("includeArchived", "true");
            }
            if archived_only {
                query.append_pair("archivedOnly", "true");
            }
        }

        let response = self.client.get(url).send().await?.error_for_status()?;
        decode(response).await
    }

    async fn update_idea(&self, id: &str, patch: &IdeaPatch) -> Result<Idea, ToolError> {
        let response = self
            .client
            .put(self.endpoint(&format!("ideas/{id}"))?)
            .json(patch)
            .send()
            .await?
            .error_for_status()?;
        decode(response).await
    }

    async fn archive_idea(&self, id: &str) -> Result<(), ToolError> {
        self.client
            .post(self.endpoint(&format!("ideas/{id}/archive"))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn restore_idea(&self, id: &str) -> Result<(), ToolError> {
        self.client
            .post(self.endpoint(&format!("ideas/{id}/restore"))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete_idea(&self, id: &str) -> Result<(), ToolError> {
        self.client
            .delete(self.endpoint(&format!("ideas/{id}"))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_serializes_only_populated_fields() {
        let patch = IdeaPatch {
            urgency: Some(5),
            notes: Some(vec!["follow up".to_string()]),
            ..Default::default()
        };
        let wire = serde_json::to_value(&patch).unwrap();
        assert_eq!(wire, serde_json::json!({"urgency": 5, "notes": ["follow up"]}));
    }

    #[test]
    fn test_idea_tolerates_missing_notes() {
        let idea: Idea = serde_json::from_value(serde_json::json!({
            "id": "i1",
            "title": "t",
            "description": "d",
            "urgency": 3,
            "archived": false,
            "created_date": "2026-01-01T00:00:00Z",
            "updated_date": "2026-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(idea.notes.is_empty());
    }
}
