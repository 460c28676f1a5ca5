pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::{ConfigProvider, FailurePolicy};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_provider, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

/// Flags with environment fallbacks; the access token is only read from the
/// flag or `SHOPIFY_STOREFRONT_TOKEN`, never from a default.
#[cfg(feature = "cli")]
#[derive(Clone, Parser)]
#[command(name = "storefront-sitemap")]
#[command(about = "Generate sitemap.xml for a Shopify storefront")]
pub struct CliConfig {
    #[arg(long, env = "SHOPIFY_DOMAIN")]
    pub store_domain: String,

    #[arg(long, env = "SHOPIFY_STOREFRONT_TOKEN", hide_env_values = true)]
    pub access_token: String,

    #[arg(long, env = "SHOPIFY_API_VERSION", default_value = "2023-07")]
    pub api_version: String,

    #[arg(long, help = "Full GraphQL endpoint, overrides domain and API version")]
    pub api_endpoint: Option<String>,

    #[arg(long, help = "Site root for product and collection URLs [default: https://<store-domain>]")]
    pub site_url: Option<String>,

    #[arg(long, env = "STATIC_URL_JSON")]
    pub static_source_url: Option<String>,

    #[arg(long, default_value = "sitemap.xml")]
    pub output_path: String,

    #[arg(long, default_value = "30")]
    pub timeout_seconds: u64,

    #[arg(long, default_value = "250")]
    pub product_page_size: usize,

    #[arg(long, default_value = "100")]
    pub collection_page_size: usize,

    #[arg(long, default_value = "10")]
    pub image_page_size: usize,

    #[arg(long, value_enum, default_value = "degrade")]
    pub on_static_failure: FailurePolicy,

    #[arg(long, value_enum, default_value = "abort")]
    pub on_catalog_failure: FailurePolicy,

    #[arg(long, help = "Print the sitemap instead of writing it")]
    pub dry_run: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("store_domain", &self.store_domain)
            .field("access_token", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("api_endpoint", &self.api_endpoint)
            .field("site_url", &self.site_url)
            .field("static_source_url", &self.static_source_url)
            .field("output_path", &self.output_path)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("product_page_size", &self.product_page_size)
            .field("collection_page_size", &self.collection_page_size)
            .field("image_page_size", &self.image_page_size)
            .field("on_static_failure", &self.on_static_failure)
            .field("on_catalog_failure", &self.on_catalog_failure)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn store_domain(&self) -> &str {
        &self.store_domain
    }

    fn access_token(&self) -> &str {
        &self.access_token
    }

    fn api_version(&self) -> &str {
        &self.api_version
    }

    fn api_endpoint_override(&self) -> Option<&str> {
        self.api_endpoint.as_deref()
    }

    fn site_url_override(&self) -> Option<&str> {
        self.site_url.as_deref()
    }

    fn static_source_url(&self) -> Option<&str> {
        self.static_source_url.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn product_page_size(&self) -> usize {
        self.product_page_size
    }

    fn collection_page_size(&self) -> usize {
        self.collection_page_size
    }

    fn image_page_size(&self) -> usize {
        self.image_page_size
    }

    fn static_failure_policy(&self) -> FailurePolicy {
        self.on_static_failure
    }

    fn catalog_failure_policy(&self) -> FailurePolicy {
        self.on_catalog_failure
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
