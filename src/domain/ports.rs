use crate::domain::model::{
    FailurePolicy, SitemapDocument, SitemapEntry, SourceEntries, SourceKind,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn store_domain(&self) -> &str;
    fn access_token(&self) -> &str;
    fn api_version(&self) -> &str;
    fn api_endpoint_override(&self) -> Option<&str>;
    fn site_url_override(&self) -> Option<&str>;
    fn static_source_url(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn product_page_size(&self) -> usize;
    fn collection_page_size(&self) -> usize;
    fn image_page_size(&self) -> usize;
    fn static_failure_policy(&self) -> FailurePolicy;
    fn catalog_failure_policy(&self) -> FailurePolicy;

    fn graphql_endpoint(&self) -> String {
        match self.api_endpoint_override() {
            Some(endpoint) => endpoint.to_string(),
            None => format!(
                "https://{}/api/{}/graphql.json",
                self.store_domain(),
                self.api_version()
            ),
        }
    }

    /// Root that product and collection paths are appended to.
    fn site_url(&self) -> String {
        match self.site_url_override() {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.store_domain()),
        }
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds())
    }
}

/// A single origin of sitemap entries.
#[async_trait]
pub trait EntrySource: Send + Sync {
    fn kind(&self) -> SourceKind;
    async fn fetch(&self) -> Result<Vec<SitemapEntry>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SourceEntries>;
    async fn transform(&self, sources: SourceEntries) -> Result<SitemapDocument>;
    async fn load(&self, document: SitemapDocument) -> Result<String>;
}
