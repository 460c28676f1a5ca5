use anyhow::Result;
use httpmock::prelude::*;
use storefront_sitemap::core::sitemap::parse_sitemap;
use storefront_sitemap::core::{ChangeFreq, FailurePolicy, Priority};
use storefront_sitemap::{CliConfig, LocalStorage, SitemapEngine, SitemapError, SitemapPipeline};
use tempfile::TempDir;

const GRAPHQL_PATH: &str = "/api/2023-07/graphql.json";
const STATIC_PATH: &str = "/static-pages.json";

fn config_for(server: &MockServer, output_path: String) -> CliConfig {
    CliConfig {
        store_domain: "site".to_string(),
        access_token: "integration-token".to_string(),
        api_version: "2023-07".to_string(),
        api_endpoint: Some(server.url(GRAPHQL_PATH)),
        site_url: Some("https://site".to_string()),
        static_source_url: Some(server.url(STATIC_PATH)),
        output_path,
        timeout_seconds: 5,
        product_page_size: 250,
        collection_page_size: 100,
        image_page_size: 10,
        on_static_failure: FailurePolicy::Degrade,
        on_catalog_failure: FailurePolicy::Abort,
        dry_run: false,
        verbose: false,
        json_logs: false,
    }
}

fn mock_collections(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(POST)
            .path(GRAPHQL_PATH)
            .header("x-shopify-storefront-access-token", "integration-token")
            .body_contains("collections(");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "data": {"collections": {
                    "pageInfo": {"hasNextPage": false, "endCursor": null},
                    "edges": [{"node": {"handle": "summer"}}]
                }}
            }));
    })
}

fn mock_products(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(POST)
            .path(GRAPHQL_PATH)
            .header("x-shopify-storefront-access-token", "integration-token")
            .body_contains("products(");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "data": {"products": {
                    "pageInfo": {"hasNextPage": false, "endCursor": null},
                    "edges": [{"node": {
                        "handle": "shoe-1",
                        "images": {
                            "pageInfo": {"hasNextPage": false, "endCursor": null},
                            "edges": [{"node": {"originalSrc": "https://cdn/img1.jpg", "altText": ""}}]
                        }
                    }}]
                }}
            }));
    })
}

async fn run_engine(server: &MockServer, temp_dir: &TempDir) -> storefront_sitemap::Result<String> {
    let storage = LocalStorage::new(temp_dir.path());
    let pipeline = SitemapPipeline::new(storage, config_for(server, "sitemap.xml".to_string()))?;
    SitemapEngine::new(pipeline).run().await
}

#[tokio::test]
async fn test_end_to_end_three_source_scenario() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    let static_mock = server.mock(|when, then| {
        when.method(GET).path(STATIC_PATH);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([{"loc": "https://site/about"}]));
    });
    let collections_mock = mock_collections(&server);
    let products_mock = mock_products(&server);

    let output_path = run_engine(&server, &temp_dir).await?;

    static_mock.assert();
    collections_mock.assert();
    products_mock.assert();
    assert_eq!(output_path, "sitemap.xml");

    let xml = std::fs::read_to_string(temp_dir.path().join("sitemap.xml"))?;
    assert!(xml.starts_with("<?xml version=\"1.0\" ?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\" xmlns:image=\"http://www.google.com/schemas/sitemap-image/1.1\">"));

    let entries = parse_sitemap(&xml)?;
    assert_eq!(entries.len(), 3);

    assert_eq!(entries[0].loc, "https://site/about");
    assert_eq!(entries[0].priority, Priority::STATIC_PAGE);
    assert_eq!(entries[0].changefreq, ChangeFreq::Monthly);
    assert!(entries[0].images.is_empty());

    assert_eq!(entries[1].loc, "https://site/collections/summer");
    assert_eq!(entries[1].priority, Priority::COLLECTION);
    assert_eq!(entries[1].changefreq, ChangeFreq::Weekly);
    assert!(entries[1].images.is_empty());

    assert_eq!(entries[2].loc, "https://site/products/shoe-1");
    assert_eq!(entries[2].priority, Priority::PRODUCT);
    assert_eq!(entries[2].changefreq, ChangeFreq::Weekly);
    assert_eq!(entries[2].images.len(), 1);
    assert_eq!(entries[2].images[0].src, "https://cdn/img1.jpg");
    assert_eq!(entries[2].images[0].title, "Product Image");

    Ok(())
}

#[tokio::test]
async fn test_static_failure_still_writes_catalog_entries() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    let static_mock = server.mock(|when, then| {
        when.method(GET).path(STATIC_PATH);
        then.status(500);
    });
    mock_collections(&server);
    mock_products(&server);

    run_engine(&server, &temp_dir).await?;

    static_mock.assert();
    let xml = std::fs::read_to_string(temp_dir.path().join("sitemap.xml"))?;
    let locs: Vec<String> = parse_sitemap(&xml)?.into_iter().map(|e| e.loc).collect();
    assert_eq!(
        locs,
        vec![
            "https://site/collections/summer".to_string(),
            "https://site/products/shoe-1".to_string()
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_product_failure_writes_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path(STATIC_PATH);
        then.status(200)
            .json_body(serde_json::json!([{"loc": "https://site/about"}]));
    });
    mock_collections(&server);
    server.mock(|when, then| {
        when.method(POST)
            .path(GRAPHQL_PATH)
            .body_contains("products(");
        then.status(502);
    });

    let result = run_engine(&server, &temp_dir).await;

    assert!(matches!(result, Err(SitemapError::SourceFailed { .. })));
    assert!(!temp_dir.path().join("sitemap.xml").exists());

    Ok(())
}

#[tokio::test]
async fn test_failed_run_leaves_previous_sitemap_untouched() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let previous = "<?xml version=\"1.0\" ?>\n<urlset/>\n";
    std::fs::write(temp_dir.path().join("sitemap.xml"), previous)?;

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(STATIC_PATH);
        then.status(200).json_body(serde_json::json!([]));
    });
    server.mock(|when, then| {
        when.method(POST).path(GRAPHQL_PATH);
        then.status(200).json_body(serde_json::json!({
            "errors": [{"message": "Throttled"}]
        }));
    });

    let result = run_engine(&server, &temp_dir).await;

    assert!(result.is_err());
    assert_eq!(
        std::fs::read_to_string(temp_dir.path().join("sitemap.xml"))?,
        previous
    );

    Ok(())
}

#[tokio::test]
async fn test_products_are_paged_until_exhausted() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path(STATIC_PATH);
        then.status(200).json_body(serde_json::json!([]));
    });
    mock_collections(&server);
    let first_page = server.mock(|when, then| {
        when.method(POST)
            .path(GRAPHQL_PATH)
            .body_contains("products(")
            .body_contains("\"after\":null");
        then.status(200).json_body(serde_json::json!({
            "data": {"products": {
                "pageInfo": {"hasNextPage": true, "endCursor": "page-2"},
                "edges": [
                    {"node": {"handle": "a", "images": {"edges": []}}},
                    {"node": {"handle": "b", "images": {"edges": []}}}
                ]
            }}
        }));
    });
    let second_page = server.mock(|when, then| {
        when.method(POST)
            .path(GRAPHQL_PATH)
            .body_contains("products(")
            .body_contains("\"after\":\"page-2\"");
        then.status(200).json_body(serde_json::json!({
            "data": {"products": {
                "pageInfo": {"hasNextPage": false, "endCursor": "page-3"},
                "edges": [{"node": {"handle": "c", "images": {"edges": []}}}]
            }}
        }));
    });

    run_engine(&server, &temp_dir).await?;

    first_page.assert();
    second_page.assert();
    let xml = std::fs::read_to_string(temp_dir.path().join("sitemap.xml"))?;
    let locs: Vec<String> = parse_sitemap(&xml)?.into_iter().map(|e| e.loc).collect();
    assert_eq!(
        locs,
        vec![
            "https://site/collections/summer",
            "https://site/products/a",
            "https://site/products/b",
            "https://site/products/c"
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_preview_does_not_write() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path(STATIC_PATH);
        then.status(200)
            .json_body(serde_json::json!([{"loc": "https://site/about", "priority": 0.7}]));
    });
    mock_collections(&server);
    mock_products(&server);

    let storage = LocalStorage::new(temp_dir.path());
    let pipeline = SitemapPipeline::new(storage, config_for(&server, "sitemap.xml".to_string()))?;
    let document = SitemapEngine::new(pipeline).preview().await?;

    assert_eq!(document.entries.len(), 3);
    assert!(document.xml.contains("<priority>0.7</priority>"));
    assert!(!temp_dir.path().join("sitemap.xml").exists());

    Ok(())
}
