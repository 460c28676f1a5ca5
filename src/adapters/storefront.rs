//! Shopify Storefront API client.
//!
//! Products and collections are paged with `first`/`after` cursors until
//! `pageInfo.hasNextPage` is false. Product images come back with the first
//! product page; products with more images than one image page get the rest
//! through `product(handle:)` follow-up queries.

use crate::adapters::http::ensure_success;
use crate::core::entries::{collection_entry, product_entry};
use crate::domain::model::{ImageRef, SitemapEntry, SourceKind};
use crate::domain::ports::EntrySource;
use crate::utils::error::{Result, SitemapError};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;

pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

const PRODUCTS_QUERY: &str = r#"
query SitemapProducts($first: Int!, $after: String, $imagesFirst: Int!) {
  products(first: $first, after: $after) {
    pageInfo { hasNextPage endCursor }
    edges {
      node {
        handle
        images(first: $imagesFirst) {
          pageInfo { hasNextPage endCursor }
          edges { node { originalSrc altText } }
        }
      }
    }
  }
}
"#;

const PRODUCT_IMAGES_QUERY: &str = r#"
query SitemapProductImages($handle: String!, $first: Int!, $after: String) {
  product(handle: $handle) {
    images(first: $first, after: $after) {
      pageInfo { hasNextPage endCursor }
      edges { node { originalSrc altText } }
    }
  }
}
"#;

const COLLECTIONS_QUERY: &str = r#"
query SitemapCollections($first: Int!, $after: String) {
  collections(first: $first, after: $after) {
    pageInfo { hasNextPage endCursor }
    edges { node { handle } }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Connection<N> {
    // Absent when a query does not ask for it; treated as a single page.
    #[serde(default, rename = "pageInfo")]
    page_info: PageInfo,
    edges: Vec<Edge<N>>,
}

#[derive(Debug, Deserialize)]
struct Edge<N> {
    node: N,
}

#[derive(Debug, Deserialize)]
struct ProductsData {
    products: Connection<ProductNode>,
}

#[derive(Debug, Deserialize)]
struct ProductNode {
    handle: String,
    images: Connection<ImageNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageNode {
    original_src: String,
    alt_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProductImagesData {
    product: Option<ProductImagesNode>,
}

#[derive(Debug, Deserialize)]
struct ProductImagesNode {
    images: Connection<ImageNode>,
}

#[derive(Debug, Deserialize)]
struct CollectionsData {
    collections: Connection<HandleNode>,
}

#[derive(Debug, Deserialize)]
struct HandleNode {
    handle: String,
}

/// A product handle with every image the API reported for it.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogProduct {
    pub handle: String,
    pub images: Vec<ImageRef>,
}

#[derive(Debug, Clone)]
pub struct StorefrontSettings {
    pub endpoint: String,
    pub access_token: String,
    pub product_page_size: usize,
    pub collection_page_size: usize,
    pub image_page_size: usize,
}

pub struct StorefrontClient {
    client: Client,
    settings: StorefrontSettings,
}

impl StorefrontClient {
    pub fn new(client: Client, settings: StorefrontSettings) -> Self {
        Self { client, settings }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        tracing::debug!("POST {} variables={}", self.settings.endpoint, variables);
        let body = serde_json::json!({ "query": query, "variables": variables });

        let response = self
            .client
            .post(&self.settings.endpoint)
            .header(ACCESS_TOKEN_HEADER, &self.settings.access_token)
            .json(&body)
            .send()
            .await?;
        let response: GraphQlResponse<T> = ensure_success(response)?.json().await?;

        if !response.errors.is_empty() {
            let messages = response
                .errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(SitemapError::GraphQlError { messages });
        }

        response.data.ok_or_else(|| SitemapError::MalformedResponse {
            message: "GraphQL response has neither data nor errors".to_string(),
        })
    }

    pub async fn collection_handles(&self) -> Result<Vec<String>> {
        let mut handles = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let data: CollectionsData = self
                .execute(
                    COLLECTIONS_QUERY,
                    serde_json::json!({
                        "first": self.settings.collection_page_size,
                        "after": after,
                    }),
                )
                .await?;

            let page = data.collections;
            handles.extend(page.edges.into_iter().map(|edge| edge.node.handle));
            tracing::debug!("Fetched collection page, {} handles so far", handles.len());

            match next_cursor(page.page_info, after.as_deref(), "collections")? {
                Some(cursor) => after = Some(cursor),
                None => break,
            }
        }

        Ok(handles)
    }

    pub async fn products(&self) -> Result<Vec<CatalogProduct>> {
        let mut products = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let data: ProductsData = self
                .execute(
                    PRODUCTS_QUERY,
                    serde_json::json!({
                        "first": self.settings.product_page_size,
                        "after": after,
                        "imagesFirst": self.settings.image_page_size,
                    }),
                )
                .await?;

            let page = data.products;
            for edge in page.edges {
                let product = edge.node;
                let mut images = to_image_refs(product.images.edges);

                if let Some(cursor) = next_cursor(product.images.page_info, None, "product images")? {
                    images.extend(self.remaining_images(&product.handle, cursor).await?);
                }

                products.push(CatalogProduct {
                    handle: product.handle,
                    images,
                });
            }
            tracing::debug!("Fetched product page, {} products so far", products.len());

            match next_cursor(page.page_info, after.as_deref(), "products")? {
                Some(cursor) => after = Some(cursor),
                None => break,
            }
        }

        Ok(products)
    }

    async fn remaining_images(&self, handle: &str, cursor: String) -> Result<Vec<ImageRef>> {
        let mut images = Vec::new();
        let mut after = cursor;

        loop {
            let data: ProductImagesData = self
                .execute(
                    PRODUCT_IMAGES_QUERY,
                    serde_json::json!({
                        "handle": handle,
                        "first": self.settings.image_page_size,
                        "after": after,
                    }),
                )
                .await?;

            let Some(product) = data.product else {
                // Removed between pages; keep what was already collected.
                tracing::warn!("Product '{}' disappeared while paging images", handle);
                break;
            };

            images.extend(to_image_refs(product.images.edges));

            match next_cursor(product.images.page_info, Some(&after), "product images")? {
                Some(cursor) => after = cursor,
                None => break,
            }
        }

        Ok(images)
    }
}

fn to_image_refs(edges: Vec<Edge<ImageNode>>) -> Vec<ImageRef> {
    edges
        .into_iter()
        .map(|edge| ImageRef::new(edge.node.original_src, edge.node.alt_text.as_deref()))
        .collect()
}

/// Cursor for the next page, given the cursor that fetched this one.
/// A missing or repeated cursor would page forever, so both are rejected.
fn next_cursor(
    page_info: PageInfo,
    previous: Option<&str>,
    what: &str,
) -> Result<Option<String>> {
    if !page_info.has_next_page {
        return Ok(None);
    }
    match page_info.end_cursor {
        Some(cursor) if previous == Some(cursor.as_str()) => {
            Err(SitemapError::MalformedResponse {
                message: format!("{} page repeated cursor '{}'", what, cursor),
            })
        }
        Some(cursor) => Ok(Some(cursor)),
        None => Err(SitemapError::MalformedResponse {
            message: format!("{} page reports hasNextPage without endCursor", what),
        }),
    }
}

pub struct CollectionSource {
    client: Arc<StorefrontClient>,
    site_url: String,
}

impl CollectionSource {
    pub fn new(client: Arc<StorefrontClient>, site_url: impl Into<String>) -> Self {
        Self {
            client,
            site_url: site_url.into(),
        }
    }
}

#[async_trait]
impl EntrySource for CollectionSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Collections
    }

    async fn fetch(&self) -> Result<Vec<SitemapEntry>> {
        let handles = self.client.collection_handles().await?;
        Ok(handles
            .iter()
            .map(|handle| collection_entry(&self.site_url, handle))
            .collect())
    }
}

pub struct ProductSource {
    client: Arc<StorefrontClient>,
    site_url: String,
}

impl ProductSource {
    pub fn new(client: Arc<StorefrontClient>, site_url: impl Into<String>) -> Self {
        Self {
            client,
            site_url: site_url.into(),
        }
    }
}

#[async_trait]
impl EntrySource for ProductSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Products
    }

    async fn fetch(&self) -> Result<Vec<SitemapEntry>> {
        let products = self.client.products().await?;
        Ok(products
            .into_iter()
            .map(|product| product_entry(&self.site_url, &product.handle, product.images))
            .collect())
    }
}
