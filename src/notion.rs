//! Write side: create-only export of records as Notion database pages.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::ClassificationRecord;

/// Destination for assembled records
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Write one record. There is no lookup or update: every call creates a row.
    async fn export(&self, record: &ClassificationRecord) -> Result<()>;
}

fn rich_text(content: &str) -> Value {
    json!({ "rich_text": [{ "text": { "content": content } }] })
}

fn select(name: &str) -> Value {
    json!({ "select": { "name": name } })
}

fn multi_select<S: AsRef<str>>(names: &[S]) -> Value {
    let options: Vec<Value> = names
        .iter()
        .map(|n| n.as_ref().trim())
        .filter(|n| !n.is_empty())
        .map(|n| json!({ "name": n }))
        .collect();
    json!({ "multi_select": options })
}

fn date(start: &str) -> Value {
    json!({ "date": { "start": start } })
}

/// Map a record onto the database's property schema.
///
/// Legislation type, action date and final action date are left out when
/// empty; Notion rejects blank selects and dates.
pub fn page_properties(record: &ClassificationRecord) -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "Title".into(),
        json!({ "title": [{ "text": { "content": record.title } }] }),
    );
    properties.insert("Matter ID".into(), json!({ "number": record.matter_id }));
    properties.insert("File Number".into(), rich_text(&record.file_number));
    properties.insert("Priority".into(), select(record.priority.as_str()));
    properties.insert("Department".into(), rich_text(&record.department));
    properties.insert("In Control".into(), rich_text(&record.in_control));
    properties.insert("Action".into(), rich_text(&record.action));
    properties.insert("Primary Sponsor".into(), rich_text(&record.primary_sponsor));
    properties.insert(
        "Secondary Sponsors".into(),
        multi_select(&record.secondary_sponsors),
    );
    properties.insert("Committees".into(), multi_select(&record.committees));
    properties.insert("Keyword Groups".into(), multi_select(&record.keyword_groups));
    properties.insert("Status".into(), select(&record.status));
    properties.insert("Legistar URL".into(), json!({ "url": record.url }));
    properties.insert("Date Checked".into(), date(&record.date_checked));

    if !record.legislation_type.is_empty() {
        properties.insert("Type of Legislation".into(), select(&record.legislation_type));
    }
    if !record.action_date.is_empty() {
        properties.insert("Action Date".into(), date(&record.action_date));
    }
    if !record.final_action_date.is_empty() {
        properties.insert("Final Action".into(), date(&record.final_action_date));
    }

    properties
}

/// Full create-page request body
pub fn page_payload(record: &ClassificationRecord, database_id: &str) -> Value {
    json!({
        "parent": { "database_id": database_id },
        "properties": page_properties(record),
    })
}

/// Notion pages API client bound to one database
pub struct NotionClient {
    client: reqwest::Client,
    api_url: String,
    version: String,
    token: SecretString,
    database_id: String,
}

impl NotionClient {
    pub fn new(
        api_url: impl Into<String>,
        version: impl Into<String>,
        token: SecretString,
        database_id: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            version: version.into(),
            token,
            database_id: database_id.into(),
        }
    }

    /// Build a client from validated configuration, taking ownership of the token
    pub fn from_config(config: &mut Config) -> Result<Self> {
        let token = config
            .notion_token
            .take()
            .ok_or_else(|| Error::Config("Missing NOTION_TOKEN".to_string()))?;
        let database_id = config
            .notion_database_id
            .clone()
            .ok_or_else(|| Error::Config("Missing NOTION_DATABASE_ID".to_string()))?;
        Ok(Self::new(
            config.notion_api_url.clone(),
            config.notion_version.clone(),
            token,
            database_id,
        ))
    }

    pub fn database_id(&self) -> &str {
        &self.database_id
    }
}

#[async_trait]
impl RecordSink for NotionClient {
    async fn export(&self, record: &ClassificationRecord) -> Result<()> {
        let payload = page_payload(record, &self.database_id);
        debug!(matter_id = record.matter_id, "creating Notion page");

        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(self.token.expose_secret())
            .header("Notion-Version", self.version.as_str())
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Export {
                matter_id: record.matter_id,
                status: status.as_u16(),
                body,
            });
        }

        info!(
            matter_id = record.matter_id,
            priority = %record.priority,
            "exported matter to Notion"
        );
        Ok(())
    }
}
