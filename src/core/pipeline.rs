use crate::adapters::http::build_client;
use crate::adapters::static_pages::StaticPageSource;
use crate::adapters::storefront::{
    CollectionSource, ProductSource, StorefrontClient, StorefrontSettings,
};
use crate::core::sitemap::{assemble, render, report_duplicates};
use crate::core::{
    ConfigProvider, EntrySource, FailurePolicy, Pipeline, SitemapDocument, SourceEntries,
    SourceOutcome, Storage,
};
use crate::utils::error::{Result, SitemapError};
use std::sync::Arc;

/// Fetches one source and applies its failure policy.
pub async fn fetch_with_policy<E: EntrySource + ?Sized>(
    source: &E,
    policy: FailurePolicy,
) -> Result<SourceOutcome> {
    let kind = source.kind();
    println!("Fetching {}...", kind);

    match source.fetch().await {
        Ok(entries) => {
            tracing::info!("Fetched {} {} entries", entries.len(), kind);
            Ok(SourceOutcome::Fetched(entries))
        }
        Err(e) => match policy {
            FailurePolicy::Degrade => {
                tracing::warn!("Failed to fetch {}, continuing without them: {}", kind, e);
                println!("Failed to fetch {}: {}", kind, e);
                Ok(SourceOutcome::Degraded {
                    error: e.to_string(),
                })
            }
            FailurePolicy::Abort => Err(SitemapError::SourceFailed {
                kind,
                cause: Box::new(e),
            }),
        },
    }
}

pub struct SitemapPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    static_pages: Option<StaticPageSource>,
    collections: CollectionSource,
    products: ProductSource,
}

impl<S: Storage, C: ConfigProvider> SitemapPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = build_client(config.request_timeout())?;
        let site_url = config.site_url();

        let storefront = Arc::new(StorefrontClient::new(
            client.clone(),
            StorefrontSettings {
                endpoint: config.graphql_endpoint(),
                access_token: config.access_token().to_string(),
                product_page_size: config.product_page_size(),
                collection_page_size: config.collection_page_size(),
                image_page_size: config.image_page_size(),
            },
        ));

        let static_pages = config
            .static_source_url()
            .map(|url| StaticPageSource::new(client, url));

        Ok(Self {
            storage,
            collections: CollectionSource::new(storefront.clone(), site_url.clone()),
            products: ProductSource::new(storefront, site_url),
            static_pages,
            config,
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SitemapPipeline<S, C> {
    async fn extract(&self) -> Result<SourceEntries> {
        let static_pages = match &self.static_pages {
            Some(source) => fetch_with_policy(source, self.config.static_failure_policy()).await?,
            None => {
                tracing::info!("No static pages source configured, skipping");
                SourceOutcome::Fetched(Vec::new())
            }
        };

        let catalog_policy = self.config.catalog_failure_policy();
        let collections = fetch_with_policy(&self.collections, catalog_policy).await?;
        let products = fetch_with_policy(&self.products, catalog_policy).await?;

        Ok(SourceEntries {
            static_pages,
            collections,
            products,
        })
    }

    async fn transform(&self, sources: SourceEntries) -> Result<SitemapDocument> {
        let degraded = sources.degraded();
        let entries = assemble(
            sources.static_pages.into_entries(),
            sources.collections.into_entries(),
            sources.products.into_entries(),
        );

        let duplicates = report_duplicates(&entries);
        if duplicates > 0 {
            tracing::warn!("Sitemap contains {} duplicate URLs", duplicates);
        }
        if entries.is_empty() {
            tracing::warn!("Sitemap has no entries");
        }

        let xml = render(&entries)?;
        tracing::debug!("Rendered sitemap: {} entries, {} bytes", entries.len(), xml.len());

        Ok(SitemapDocument {
            entries,
            xml,
            degraded,
        })
    }

    async fn load(&self, document: SitemapDocument) -> Result<String> {
        let output_path = self.config.output_path();
        self.storage
            .write_file(output_path, document.xml.as_bytes())
            .await?;
        Ok(output_path.to_string())
    }
}
