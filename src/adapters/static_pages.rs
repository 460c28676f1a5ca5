use crate::adapters::http::ensure_success;
use crate::core::entries::static_entry;
use crate::domain::model::{ChangeFreq, Priority, SitemapEntry, SourceKind};
use crate::domain::ports::EntrySource;
use crate::utils::error::{Result, SitemapError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// One element of the static pages JSON array.
#[derive(Debug, Clone, Deserialize)]
pub struct StaticPageRecord {
    pub loc: String,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub changefreq: Option<ChangeFreq>,
}

/// Page descriptors served as a JSON array from a fixed URL.
pub struct StaticPageSource {
    client: Client,
    url: String,
}

impl StaticPageSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl EntrySource for StaticPageSource {
    fn kind(&self) -> SourceKind {
        SourceKind::StaticPages
    }

    async fn fetch(&self) -> Result<Vec<SitemapEntry>> {
        tracing::debug!("Fetching static pages from: {}", self.url);
        let response = ensure_success(self.client.get(&self.url).send().await?)?;
        let body: serde_json::Value = response.json().await?;

        let serde_json::Value::Array(items) = body else {
            return Err(SitemapError::MalformedResponse {
                message: format!("static pages at {} is not a JSON array", self.url),
            });
        };

        Ok(records_to_entries(items))
    }
}

/// Validates each record on its own; invalid records are skipped.
fn records_to_entries(items: Vec<serde_json::Value>) -> Vec<SitemapEntry> {
    let total = items.len();
    let entries: Vec<SitemapEntry> = items
        .into_iter()
        .enumerate()
        .filter_map(
            |(index, item)| match serde_json::from_value::<StaticPageRecord>(item) {
                Ok(record) => Some(static_entry(record.loc, record.priority, record.changefreq)),
                Err(e) => {
                    tracing::warn!("Skipping static page record #{}: {}", index, e);
                    None
                }
            },
        )
        .collect();

    if entries.len() < total {
        tracing::warn!(
            "Kept {} of {} static page records",
            entries.len(),
            total
        );
    }
    entries
}
