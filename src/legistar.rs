//! Read side: the Legistar Web API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::types::{HistoryEntry, Matter, Sponsor};

/// Where matters and their per-matter details come from
#[async_trait]
pub trait MatterSource: Send + Sync {
    /// The full matter list. Any failure here is fatal for the run.
    async fn fetch_matters(&self) -> Result<Vec<Matter>>;

    /// Recorded actions for one matter; empty when the lookup fails
    async fn fetch_history(&self, matter_id: i64) -> Vec<HistoryEntry>;

    /// Sponsors of one matter; empty when the lookup fails
    async fn fetch_sponsors(&self, matter_id: i64) -> Vec<Sponsor>;
}

/// HTTP client for one Legistar client API root
pub struct LegistarClient {
    client: reqwest::Client,
    base_url: String,
}

impl LegistarClient {
    /// `base_url` is the client root, like `https://webapi.legistar.com/v1/sfgov`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn matters_url(&self) -> String {
        format!("{}/matters", self.base_url)
    }

    fn history_url(&self, matter_id: i64) -> String {
        format!("{}/matters/{}/history", self.base_url, matter_id)
    }

    fn sponsors_url(&self, matter_id: i64) -> String {
        format!("{}/matters/{}/sponsors", self.base_url, matter_id)
    }

    /// GET a per-matter list, degrading every failure to an empty list
    async fn fetch_optional_list<T: DeserializeOwned>(&self, url: &str, what: &str) -> Vec<T> {
        let resp = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(url = %url, error = %e, "{} request failed, treating as empty", what);
                return Vec::new();
            }
        };

        let status = resp.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "{} lookup returned non-success, treating as empty", what);
            return Vec::new();
        }

        match resp.json::<Vec<T>>().await {
            Ok(items) => items,
            Err(e) => {
                warn!(url = %url, error = %e, "{} response was not a list, treating as empty", what);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl MatterSource for LegistarClient {
    async fn fetch_matters(&self) -> Result<Vec<Matter>> {
        let url = self.matters_url();
        info!(url = %url, "fetching matters from Legistar");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::ListFetch {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        let matters: Vec<Matter> = serde_json::from_str(&body)?;
        info!(count = matters.len(), "fetched matters");
        Ok(matters)
    }

    async fn fetch_history(&self, matter_id: i64) -> Vec<HistoryEntry> {
        self.fetch_optional_list(&self.history_url(matter_id), "history")
            .await
    }

    async fn fetch_sponsors(&self, matter_id: i64) -> Vec<Sponsor> {
        self.fetch_optional_list(&self.sponsors_url(matter_id), "sponsors")
            .await
    }
}
